use std::path::{Path, PathBuf};

use clap::Subcommand;
use setdesk_core::setting::{BulkUpdateEntry, NewSetting};
use setdesk_core::types::{OnboardingType, SettingStatus};
use setdesk_core::{ActionKind, Setting};

use crate::cmd::import::read_json;
use crate::context;
use crate::output::{date, print_json, print_table};

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum SettingSubcommand {
    /// List settings, oldest first
    List {
        /// Only settings in this status (pending, shipped, setting, completed)
        #[arg(long)]
        status: Option<String>,
        /// Only settings with this onboarding type
        #[arg(long = "type", value_name = "ONBOARDING_TYPE")]
        onboarding_type: Option<String>,
    },

    /// Show one setting with its quick actions
    Show { id: String },

    /// Create a setting from a JSON document (`-` for stdin)
    Create { file: PathBuf },

    /// Apply a JSON array of `{id, data}` patches (`-` for stdin)
    Update { file: PathBuf },

    /// Delete a setting
    Delete { id: String },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(config_path: Option<&Path>, subcmd: SettingSubcommand, json: bool) -> anyhow::Result<()> {
    let config = context::load_config(config_path)?;
    let store = context::open_store(&config)?;
    let store = store.as_ref();

    match subcmd {
        SettingSubcommand::List {
            status,
            onboarding_type,
        } => {
            let status: Option<SettingStatus> = status.map(|s| s.parse()).transpose()?;
            let onboarding: Option<OnboardingType> =
                onboarding_type.map(|s| s.parse()).transpose()?;
            let mut settings = store.list_settings()?;
            settings.retain(|s| {
                status.map_or(true, |st| s.status == st)
                    && onboarding.map_or(true, |t| s.onboarding_type == t)
            });
            list(&settings, json)
        }
        SettingSubcommand::Show { id } => show(&Setting::load(store, &id)?, json),
        SettingSubcommand::Create { file } => {
            let input: NewSetting = read_json(&file)?;
            let id = Setting::create(store, input)?;
            if json {
                print_json(&serde_json::json!({ "id": id }))
            } else {
                println!("Created setting {id}");
                Ok(())
            }
        }
        SettingSubcommand::Update { file } => {
            let updates: Vec<BulkUpdateEntry> = read_json(&file)?;
            let report = Setting::bulk_update(store, updates);
            if json {
                return print_json(&report);
            }
            println!(
                "Updated {} of {} setting(s).",
                report.updated_count, report.requested_count
            );
            for r in report.results.iter().filter(|r| !r.updated) {
                println!("  {}: {}", r.id, r.reason.as_deref().unwrap_or("rejected"));
            }
            Ok(())
        }
        SettingSubcommand::Delete { id } => {
            Setting::delete(store, &id)?;
            if json {
                print_json(&serde_json::json!({ "message": "deleted" }))
            } else {
                println!("Deleted setting {id}");
                Ok(())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn list(settings: &[Setting], json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&settings);
    }
    if settings.is_empty() {
        println!("No settings.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = settings
        .iter()
        .map(|s| {
            vec![
                s.id.clone(),
                s.user_name.clone(),
                s.serial.clone(),
                s.os.clone(),
                s.onboarding_type.to_string(),
                s.status.to_string(),
                date(s.requested_date),
            ]
        })
        .collect();
    print_table(
        &["ID", "USER", "SERIAL", "OS", "ONBOARDING", "STATUS", "REQUESTED"],
        &rows,
    );
    Ok(())
}

fn show(setting: &Setting, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(setting);
    }
    println!("Setting:    {}", setting.id);
    println!("User:       {} <{}>", setting.user_name, setting.user_email);
    println!("Device:     {} {} ({})", setting.os, setting.model, setting.serial);
    println!("Onboarding: {}", setting.onboarding_type);
    println!("Status:     {}", setting.status);
    println!("Manual:     {}", setting.is_manual);
    println!();

    let rows: Vec<Vec<String>> = ActionKind::all()
        .iter()
        .map(|&k| {
            let qa = setting.quick_actions.get(k);
            vec![
                k.to_string(),
                qa.status().to_string(),
                qa.requested_by().unwrap_or("-").to_string(),
                date(qa.requested_at()),
                qa.error_message().unwrap_or("").to_string(),
            ]
        })
        .collect();
    print_table(&["ACTION", "STATUS", "BY", "AT", "ERROR"], &rows);
    Ok(())
}
