use serde::Serialize;
use setdesk_core::{ActionKind, OnboardingType, QuickActions};

use crate::output::{print_json, print_table};

/// OS labels shown in the catalog. Anything but Windows behaves like macOS.
const OS_SAMPLES: &[&str] = &["Windows", "macOS"];

#[derive(Serialize)]
struct CatalogRow {
    onboarding_type: OnboardingType,
    os: &'static str,
    quick_actions: QuickActions,
}

/// Print the initial quick action statuses for every onboarding type and OS.
pub fn run(json: bool) -> anyhow::Result<()> {
    let rows: Vec<CatalogRow> = OnboardingType::all()
        .iter()
        .flat_map(|&onboarding_type| {
            OS_SAMPLES.iter().map(move |&os| CatalogRow {
                onboarding_type,
                os,
                quick_actions: QuickActions::generate(onboarding_type, os),
            })
        })
        .collect();

    if json {
        return print_json(&rows);
    }

    let mut headers = vec!["ONBOARDING", "OS"];
    headers.extend(ActionKind::all().iter().map(|k| k.as_str()));
    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            let mut cells = vec![r.onboarding_type.to_string(), r.os.to_string()];
            cells.extend(
                ActionKind::all()
                    .iter()
                    .map(|&k| r.quick_actions.get(k).status().to_string()),
            );
            cells
        })
        .collect();
    print_table(&headers, &table);
    Ok(())
}
