use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::computer::Computer;
use crate::error::{Result, SetdeskError};
use crate::catalog::active_kinds;
use crate::quick_action::{QuickAction, QuickActions};
use crate::store::RecordStore;
use crate::types::{
    Company, ComputerStatus, DeviceType, NetworkType, OnboardingType, Role, SettingStatus,
};

// ---------------------------------------------------------------------------
// CheckListItem
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckListItem {
    pub label: String,
    #[serde(default)]
    pub checked: bool,
}

// ---------------------------------------------------------------------------
// Setting
// ---------------------------------------------------------------------------

/// A PC setting request: one device being prepared for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setting {
    pub id: String,

    pub user_name: String,
    pub user_email: String,
    pub role: Role,
    #[serde(default)]
    pub collaborators: Option<String>,

    pub os: String,
    pub model: String,
    pub serial: String,
    pub device_type: DeviceType,
    pub network_type: NetworkType,

    /// Rush request.
    pub urgency: bool,
    pub onboarding_type: OnboardingType,
    pub status: SettingStatus,

    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub checklist: Vec<CheckListItem>,
    pub quick_actions: QuickActions,

    #[serde(default)]
    pub assignee_name: Option<String>,
    pub company: Company,

    #[serde(default)]
    pub requested_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_date: Option<DateTime<Utc>>,

    /// Created by an operator rather than derived from an inventory record.
    #[serde(default)]
    pub is_manual: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Setting {
    /// A non-manual setting derived from an inventory computer.
    pub fn from_computer(
        computer: &Computer,
        role: Role,
        company: Company,
        onboarding_type: OnboardingType,
        status: SettingStatus,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_name: computer.user_name.clone(),
            user_email: computer.user_email.clone(),
            role,
            collaborators: None,
            os: computer.os.clone(),
            model: computer.model.clone(),
            serial: computer.serial.clone(),
            device_type: computer.device_type,
            network_type: computer.network_type,
            urgency: false,
            onboarding_type,
            status,
            memo: None,
            checklist: Vec::new(),
            quick_actions: QuickActions::generate(onboarding_type, &computer.os),
            assignee_name: None,
            company,
            requested_date: Some(now),
            due_date: None,
            completed_date: None,
            is_manual: false,
            created_at: now,
            updated_at: now,
        }
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    /// Create a setting from operator input. Returns the new id.
    pub fn create(store: &dyn RecordStore, input: NewSetting) -> Result<String> {
        let mut setting = if input.is_computer {
            let computer = store
                .get_computer(&input.serial)?
                .ok_or_else(|| SetdeskError::ComputerNotFound(input.serial.clone()))?;
            let employee = store
                .get_employee(&computer.user_email)?
                .ok_or_else(|| SetdeskError::EmployeeNotFound(computer.user_email.clone()))?;

            let mut s = Setting::from_computer(
                &computer,
                employee.role,
                input.company,
                input.onboarding_type,
                input.status,
            );
            s.urgency = input.urgency;
            s.memo = input.memo;
            s.requested_date = input.requested_date;
            s.due_date = input.due_date;
            s
        } else {
            let employee = store
                .get_employee(&input.user_email)?
                .ok_or_else(|| SetdeskError::EmployeeNotFound(input.user_email.clone()))?;
            input.into_setting(employee.role)?
        };

        setting.is_manual = true;
        store.put_setting(&setting)?;
        tracing::info!(setting_id = %setting.id, serial = %setting.serial, "setting created");
        Ok(setting.id)
    }

    pub fn load(store: &dyn RecordStore, id: &str) -> Result<Self> {
        store
            .get_setting(id)?
            .ok_or_else(|| SetdeskError::SettingNotFound(id.to_string()))
    }

    pub fn delete(store: &dyn RecordStore, id: &str) -> Result<()> {
        if store.delete_setting(id)? {
            Ok(())
        } else {
            Err(SetdeskError::SettingNotFound(id.to_string()))
        }
    }

    // ---------------------------------------------------------------------------
    // Updates
    // ---------------------------------------------------------------------------

    /// Apply a patch in place. Quick actions are regenerated, with history,
    /// when the OS or onboarding type actually changes.
    pub fn apply_patch(&mut self, patch: SettingPatch) {
        let os_changed = patch.os.as_ref().is_some_and(|os| *os != self.os);
        let onboarding_changed = patch
            .onboarding_type
            .is_some_and(|t| t != self.onboarding_type);

        if let Some(v) = patch.user_name {
            self.user_name = v;
        }
        if let Some(v) = patch.user_email {
            self.user_email = v;
        }
        if let Some(v) = patch.role {
            self.role = v;
        }
        if let Some(v) = patch.collaborators {
            self.collaborators = Some(v);
        }
        if let Some(v) = patch.os {
            self.os = v;
        }
        if let Some(v) = patch.model {
            self.model = v;
        }
        if let Some(v) = patch.serial {
            self.serial = v;
        }
        if let Some(v) = patch.device_type {
            self.device_type = v;
        }
        if let Some(v) = patch.network_type {
            self.network_type = v;
        }
        if let Some(v) = patch.urgency {
            self.urgency = v;
        }
        if let Some(v) = patch.onboarding_type {
            self.onboarding_type = v;
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
        if let Some(v) = patch.memo {
            self.memo = Some(v);
        }
        if let Some(v) = patch.checklist {
            self.checklist = v;
        }
        if let Some(v) = patch.assignee_name {
            self.assignee_name = Some(v);
        }
        if let Some(v) = patch.company {
            self.company = v;
        }
        if let Some(v) = patch.requested_date {
            self.requested_date = Some(v);
        }
        if let Some(v) = patch.due_date {
            self.due_date = Some(v);
        }
        if let Some(v) = patch.completed_date {
            self.completed_date = Some(v);
        }

        if os_changed || onboarding_changed {
            self.quick_actions = QuickActions::regenerate(
                self.onboarding_type,
                &self.os,
                Some(&self.quick_actions),
            );
        }
        self.updated_at = Utc::now();
    }

    /// Store one quick action record. A kind that is inactive for the
    /// current onboarding type and OS is kept as `not-applicable`, whatever
    /// status the record carries.
    pub fn record_quick_action(&mut self, mut action: QuickAction) {
        if !active_kinds(self.onboarding_type, &self.os).contains(&action.action()) {
            action.deactivate();
        }
        self.quick_actions.replace(action);
        self.updated_at = Utc::now();
    }

    /// Apply each `{id, data}` entry independently.
    pub fn bulk_update(store: &dyn RecordStore, updates: Vec<BulkUpdateEntry>) -> BulkUpdateReport {
        let requested_count = updates.len();
        let mut results = Vec::new();

        for entry in updates {
            let (Some(id), Some(data)) = (entry.id, entry.data) else {
                continue;
            };
            results.push(update_one(store, id, data));
        }

        BulkUpdateReport {
            requested_count,
            updated_count: results.iter().filter(|r| r.updated).count(),
            results,
        }
    }
}

fn update_one(store: &dyn RecordStore, id: String, data: serde_json::Value) -> BulkUpdateResult {
    let patch: SettingPatch = match serde_json::from_value(data) {
        Ok(p) => p,
        Err(e) => return BulkUpdateResult::rejected(id, format!("invalid: {e}")),
    };

    // Patch the stored record in place so a concurrent quick action write is
    // neither lost nor left behind on a kind that just became inactive.
    let mut patch = Some(patch);
    let mut completed_serial = None;
    let found = store.modify_setting(&id, &mut |setting| {
        let Some(patch) = patch.take() else {
            return;
        };
        let completes = !setting.is_manual
            && patch
                .status
                .is_some_and(|s| s == SettingStatus::Completed && setting.status != s);
        setting.apply_patch(patch);
        if completes {
            completed_serial = Some(setting.serial.clone());
        }
    });

    match found {
        Ok(true) => {
            if let Some(serial) = completed_serial {
                mark_computer_in_use(store, &serial);
            }
            BulkUpdateResult {
                id,
                updated: true,
                reason: None,
            }
        }
        Ok(false) => BulkUpdateResult::rejected(id, "not_found"),
        Err(e) => {
            tracing::error!(setting_id = %id, error = %e, "failed to update setting");
            BulkUpdateResult::rejected(id, format!("store: {e}"))
        }
    }
}

/// A derived setting reaching `completed` puts its computer in use.
fn mark_computer_in_use(store: &dyn RecordStore, serial: &str) {
    let result = store.get_computer(serial).and_then(|found| match found {
        Some(mut computer) => {
            computer.set_status(ComputerStatus::Use);
            store.put_computer(&computer).map(|_| true)
        }
        None => Ok(false),
    });
    match result {
        Ok(true) => tracing::info!(%serial, "computer marked in use"),
        Ok(false) => tracing::warn!(%serial, "completed setting has no inventory computer"),
        Err(e) => tracing::error!(%serial, error = %e, "failed to update computer status"),
    }
}

// ---------------------------------------------------------------------------
// Input shapes
// ---------------------------------------------------------------------------

/// Operator input for a new setting.
///
/// With `is_computer` set, the user and device fields come from the
/// inventory computer named by `serial` and the ones given here are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSetting {
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub user_email: String,
    #[serde(default)]
    pub collaborators: Option<String>,

    #[serde(default)]
    pub os: String,
    #[serde(default)]
    pub model: String,
    pub serial: String,
    #[serde(default)]
    pub device_type: Option<DeviceType>,
    #[serde(default)]
    pub network_type: Option<NetworkType>,

    pub urgency: bool,
    pub onboarding_type: OnboardingType,
    pub status: SettingStatus,

    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub checklist: Option<Vec<CheckListItem>>,
    #[serde(default)]
    pub assignee_name: Option<String>,
    pub company: Company,

    #[serde(default)]
    pub requested_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub is_computer: bool,
}

impl NewSetting {
    fn into_setting(self, role: Role) -> Result<Setting> {
        for (field, value) in [
            ("user_name", &self.user_name),
            ("user_email", &self.user_email),
            ("os", &self.os),
            ("model", &self.model),
            ("serial", &self.serial),
        ] {
            if value.trim().is_empty() {
                return Err(missing(field));
            }
        }
        let device_type = self.device_type.ok_or_else(|| missing("device_type"))?;
        let network_type = self.network_type.ok_or_else(|| missing("network_type"))?;

        let now = Utc::now();
        Ok(Setting {
            id: Uuid::new_v4().to_string(),
            quick_actions: QuickActions::generate(self.onboarding_type, &self.os),
            user_name: self.user_name,
            user_email: self.user_email,
            role,
            collaborators: self.collaborators,
            os: self.os,
            model: self.model,
            serial: self.serial,
            device_type,
            network_type,
            urgency: self.urgency,
            onboarding_type: self.onboarding_type,
            status: self.status,
            memo: self.memo,
            checklist: self.checklist.unwrap_or_default(),
            assignee_name: self.assignee_name,
            company: self.company,
            requested_date: self.requested_date,
            due_date: self.due_date,
            completed_date: self.completed_date,
            is_manual: true,
            created_at: now,
            updated_at: now,
        })
    }
}

fn missing(field: &str) -> SetdeskError {
    SetdeskError::InvalidField {
        field: field.to_string(),
        reason: "required".to_string(),
    }
}

/// Partial update. Absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingPatch {
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub role: Option<Role>,
    pub collaborators: Option<String>,
    pub os: Option<String>,
    pub model: Option<String>,
    pub serial: Option<String>,
    pub device_type: Option<DeviceType>,
    pub network_type: Option<NetworkType>,
    pub urgency: Option<bool>,
    pub onboarding_type: Option<OnboardingType>,
    pub status: Option<SettingStatus>,
    pub memo: Option<String>,
    pub checklist: Option<Vec<CheckListItem>>,
    pub assignee_name: Option<String>,
    pub company: Option<Company>,
    pub requested_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub completed_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BulkUpdateEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkUpdateResult {
    pub id: String,
    pub updated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl BulkUpdateResult {
    fn rejected(id: String, reason: impl Into<String>) -> Self {
        Self {
            id,
            updated: false,
            reason: Some(reason.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkUpdateReport {
    pub requested_count: usize,
    pub updated_count: usize,
    pub results: Vec<BulkUpdateResult>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::testing::{computer, employee, manual_setting};
    use crate::types::{ActionKind, ActionStatus};
    use serde_json::json;

    fn store_with_kim() -> MemoryStore {
        let store = MemoryStore::new();
        store.put_employee(&employee("kim@example.com")).unwrap();
        store
    }

    fn new_setting_json() -> serde_json::Value {
        json!({
            "user_name": "Kim",
            "user_email": "kim@example.com",
            "os": "Windows",
            "model": "ThinkPad X1",
            "serial": "SN-001",
            "device_type": "EDP001",
            "network_type": "team",
            "urgency": false,
            "onboarding_type": "new",
            "status": "pending",
            "company": "core"
        })
    }

    #[test]
    fn create_generates_quick_actions() {
        let store = store_with_kim();
        let input: NewSetting = serde_json::from_value(new_setting_json()).unwrap();
        let id = Setting::create(&store, input).unwrap();

        let s = Setting::load(&store, &id).unwrap();
        assert!(s.is_manual);
        assert_eq!(
            s.quick_actions.get(ActionKind::WinSetting).status(),
            ActionStatus::Pending
        );
        assert_eq!(
            s.quick_actions.get(ActionKind::OktaActivate).status(),
            ActionStatus::NotApplicable
        );
    }

    #[test]
    fn create_requires_known_employee() {
        let store = MemoryStore::new();
        let input: NewSetting = serde_json::from_value(new_setting_json()).unwrap();
        assert!(matches!(
            Setting::create(&store, input),
            Err(SetdeskError::EmployeeNotFound(_))
        ));
    }

    #[test]
    fn create_rejects_missing_device_fields() {
        let store = store_with_kim();
        let mut body = new_setting_json();
        body.as_object_mut().unwrap().remove("device_type");
        let input: NewSetting = serde_json::from_value(body).unwrap();
        assert!(matches!(
            Setting::create(&store, input),
            Err(SetdeskError::InvalidField { field, .. }) if field == "device_type"
        ));
    }

    #[test]
    fn create_from_computer_copies_inventory_fields() {
        let store = store_with_kim();
        store.put_computer(&computer("SN-777", "kim@example.com", "macOS")).unwrap();
        let input: NewSetting = serde_json::from_value(json!({
            "serial": "SN-777",
            "urgency": true,
            "onboarding_type": "replace",
            "status": "setting",
            "company": "bank",
            "is_computer": true
        }))
        .unwrap();

        let id = Setting::create(&store, input).unwrap();
        let s = Setting::load(&store, &id).unwrap();
        assert_eq!(s.os, "macOS");
        assert_eq!(s.user_email, "kim@example.com");
        assert!(s.urgency);
        assert_eq!(
            s.quick_actions.get(ActionKind::PickupNotice).status(),
            ActionStatus::Pending
        );
    }

    #[test]
    fn create_from_unknown_computer_fails() {
        let store = store_with_kim();
        let input: NewSetting = serde_json::from_value(json!({
            "serial": "nope",
            "urgency": false,
            "onboarding_type": "new",
            "status": "pending",
            "company": "core",
            "is_computer": true
        }))
        .unwrap();
        assert!(matches!(
            Setting::create(&store, input),
            Err(SetdeskError::ComputerNotFound(_))
        ));
    }

    #[test]
    fn patch_regenerates_only_on_classification_change() {
        let mut s = manual_setting("kim@example.com", OnboardingType::Replace, "macOS");
        s.quick_actions
            .get_mut(ActionKind::PasswordNotice)
            .begin("admin", Utc::now());
        s.quick_actions.get_mut(ActionKind::PasswordNotice).succeed();
        let before = s.quick_actions.clone();

        s.apply_patch(SettingPatch {
            memo: Some("charger missing".into()),
            os: Some("macOS".into()),
            ..Default::default()
        });
        assert_eq!(s.quick_actions, before);

        s.apply_patch(SettingPatch {
            onboarding_type: Some(OnboardingType::New),
            ..Default::default()
        });
        let notice = s.quick_actions.get(ActionKind::PasswordNotice);
        assert_eq!(notice.status(), ActionStatus::NotApplicable);
        assert_eq!(notice.requested_by(), Some("admin"));
    }

    #[test]
    fn bulk_update_reports_each_entry() {
        let store = store_with_kim();
        let s = manual_setting("kim@example.com", OnboardingType::New, "macOS");
        store.put_setting(&s).unwrap();

        let updates: Vec<BulkUpdateEntry> = serde_json::from_value(json!([
            { "id": s.id, "data": { "os": "Windows" } },
            { "id": "missing", "data": { "status": "shipped" } },
            { "id": s.id },
            { "id": s.id, "data": { "quick_actions": [] } }
        ]))
        .unwrap();

        let report = Setting::bulk_update(&store, updates);
        assert_eq!(report.requested_count, 4);
        assert_eq!(report.updated_count, 1);
        assert_eq!(report.results.len(), 3);
        assert_eq!(report.results[1].reason.as_deref(), Some("not_found"));
        assert!(report.results[2].reason.as_deref().unwrap().starts_with("invalid"));

        let saved = Setting::load(&store, &s.id).unwrap();
        assert_eq!(
            saved.quick_actions.get(ActionKind::O365Intune).status(),
            ActionStatus::Pending
        );
    }

    #[test]
    fn completing_derived_setting_puts_computer_in_use() {
        let store = store_with_kim();
        let c = computer("SN-9", "kim@example.com", "Windows");
        store.put_computer(&c).unwrap();
        let s = Setting::from_computer(
            &c,
            Role::Team,
            Company::Core,
            OnboardingType::Pending,
            SettingStatus::Setting,
        );
        store.put_setting(&s).unwrap();

        let updates = vec![BulkUpdateEntry {
            id: Some(s.id.clone()),
            data: Some(json!({ "status": "shipped" })),
        }];
        Setting::bulk_update(&store, updates);
        assert_eq!(
            store.get_computer("SN-9").unwrap().unwrap().status,
            ComputerStatus::Setting
        );

        let updates = vec![BulkUpdateEntry {
            id: Some(s.id.clone()),
            data: Some(json!({ "status": "completed" })),
        }];
        Setting::bulk_update(&store, updates);
        assert_eq!(
            store.get_computer("SN-9").unwrap().unwrap().status,
            ComputerStatus::Use
        );
    }

    #[test]
    fn completing_manual_setting_leaves_computer_alone() {
        let store = store_with_kim();
        store.put_computer(&computer("SN-1", "kim@example.com", "Windows")).unwrap();
        let mut s = manual_setting("kim@example.com", OnboardingType::New, "Windows");
        s.serial = "SN-1".into();
        store.put_setting(&s).unwrap();

        let updates = vec![BulkUpdateEntry {
            id: Some(s.id.clone()),
            data: Some(json!({ "status": "completed" })),
        }];
        let report = Setting::bulk_update(&store, updates);
        assert_eq!(report.updated_count, 1);
        assert_eq!(
            store.get_computer("SN-1").unwrap().unwrap().status,
            ComputerStatus::Setting
        );
    }

    #[test]
    fn delete_missing_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            Setting::delete(&store, "x"),
            Err(SetdeskError::SettingNotFound(_))
        ));
    }
}
