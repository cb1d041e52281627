use std::path::Path;

use setdesk_core::ActionKind;

use crate::context;
use crate::output::print_json;

/// Run one quick action kind over the given settings, the same way the
/// HTTP trigger endpoints do.
pub fn run(
    config_path: Option<&Path>,
    kind: &str,
    ids: Vec<String>,
    requested_by: &str,
    json: bool,
) -> anyhow::Result<()> {
    let kind: ActionKind = kind.parse()?;
    if ids.is_empty() {
        anyhow::bail!("at least one --id is required");
    }
    let requested_by = requested_by.trim();
    if requested_by.is_empty() {
        anyhow::bail!("--by must not be empty");
    }

    let config = context::load_config(config_path)?;
    let store = context::open_store(&config)?;
    let executor = context::build_executor(&config, store)?;

    let batch = executor.execute_many(&ids, kind, requested_by);

    if json {
        return print_json(&batch);
    }
    println!(
        "{kind}: {} succeeded, {} failed",
        batch.success_count, batch.failed_count
    );
    for name in &batch.failed {
        println!("  failed: {name}");
    }
    Ok(())
}
