use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Subcommand;
use serde::de::DeserializeOwned;
use setdesk_core::computer::Computer;
use setdesk_core::employee::Employee;

use crate::context;
use crate::output::print_json;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ImportSubcommand {
    /// Load employee directory records from a JSON array (`-` for stdin)
    Employees { file: PathBuf },

    /// Load inventory computers from a JSON array (`-` for stdin)
    Computers { file: PathBuf },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(config_path: Option<&Path>, subcmd: ImportSubcommand, json: bool) -> anyhow::Result<()> {
    let config = context::load_config(config_path)?;
    let store = context::open_store(&config)?;

    let (what, count) = match subcmd {
        ImportSubcommand::Employees { file } => {
            let records: Vec<Employee> = read_json(&file)?;
            for e in &records {
                store.put_employee(e)?;
            }
            ("employees", records.len())
        }
        ImportSubcommand::Computers { file } => {
            let records: Vec<Computer> = read_json(&file)?;
            for c in &records {
                store.put_computer(c)?;
            }
            ("computers", records.len())
        }
    };
    tracing::info!(kind = what, count, "import finished");

    if json {
        print_json(&serde_json::json!({ "imported": count, "kind": what }))?;
    } else {
        println!("Imported {count} {what}.");
    }
    Ok(())
}

/// Parse JSON from `path`, or stdin when `path` is `-`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let data = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };
    serde_json::from_str(&data).with_context(|| format!("invalid JSON in {}", path.display()))
}
