use std::path::Path;

use anyhow::Context;
use setdesk_core::sync::sync_setting_computers;

use crate::context;
use crate::output::print_json;

pub fn run(config_path: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let config = context::load_config(config_path)?;
    let store = context::open_store(&config)?;

    let created = sync_setting_computers(store.as_ref()).context("inventory sync failed")?;

    if json {
        print_json(&serde_json::json!({ "created": created }))?;
    } else {
        println!("Created {created} setting(s) from inventory.");
    }
    Ok(())
}
