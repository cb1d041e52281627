use std::collections::HashSet;

use crate::error::Result;
use crate::setting::Setting;
use crate::store::RecordStore;
use crate::types::{ComputerStatus, OnboardingType, SettingStatus};

/// Create a derived setting for every inventory computer in `SETTING`
/// status that has none yet. Returns how many were created.
///
/// A computer whose user has no employee record is skipped with a warning
/// and picked up again on a later run.
pub fn sync_setting_computers(store: &dyn RecordStore) -> Result<usize> {
    let existing: HashSet<String> = store
        .list_settings()?
        .into_iter()
        .map(|s| s.serial)
        .collect();

    let mut created = 0;
    for computer in store.list_computers()? {
        if computer.status != ComputerStatus::Setting || existing.contains(&computer.serial) {
            continue;
        }
        let Some(employee) = store.get_employee(&computer.user_email)? else {
            tracing::warn!(
                serial = %computer.serial,
                email = %computer.user_email,
                "no employee for computer, sync skipped"
            );
            continue;
        };

        let setting = Setting::from_computer(
            &computer,
            employee.role,
            employee.company,
            OnboardingType::Pending,
            SettingStatus::Setting,
        );
        store.put_setting(&setting)?;
        created += 1;
    }

    tracing::info!(created, "inventory sync finished");
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::testing::{computer, employee};
    use crate::types::{ActionStatus, Company};

    #[test]
    fn creates_pending_settings_once() {
        let store = MemoryStore::new();
        let mut kim = employee("kim@example.com");
        kim.company = Company::Bank;
        store.put_employee(&kim).unwrap();
        store.put_computer(&computer("SN-1", "kim@example.com", "Windows")).unwrap();

        let mut in_use = computer("SN-2", "kim@example.com", "macOS");
        in_use.status = ComputerStatus::Use;
        store.put_computer(&in_use).unwrap();

        assert_eq!(sync_setting_computers(&store).unwrap(), 1);
        assert_eq!(sync_setting_computers(&store).unwrap(), 0);

        let all = store.list_settings().unwrap();
        assert_eq!(all.len(), 1);
        let s = &all[0];
        assert_eq!(s.serial, "SN-1");
        assert!(!s.is_manual);
        assert_eq!(s.company, Company::Bank);
        assert_eq!(s.onboarding_type, OnboardingType::Pending);
        assert_eq!(s.status, SettingStatus::Setting);
        assert!(s.requested_date.is_some());
        assert!(s
            .quick_actions
            .iter()
            .all(|qa| qa.status() == ActionStatus::NotApplicable));
    }

    #[test]
    fn computer_without_employee_is_skipped() {
        let store = MemoryStore::new();
        store.put_computer(&computer("SN-1", "nobody@example.com", "Windows")).unwrap();
        assert_eq!(sync_setting_computers(&store).unwrap(), 0);
        assert!(store.list_settings().unwrap().is_empty());
    }
}
