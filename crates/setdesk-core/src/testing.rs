//! Fixtures and recording collaborators for tests.
//!
//! Compiled for this crate's unit tests and, through the `testkit`
//! feature, for other crates' tests.

use std::sync::Mutex;

use crate::collab::{CallResult, CollabError, IdentityProvider, Messenger, PasswordSource};
use crate::computer::Computer;
use crate::employee::Employee;
use crate::notice::Notice;
use crate::setting::Setting;
use crate::types::{
    Company, ComputerStatus, DeviceType, NetworkType, OnboardingType, Role, SettingStatus,
};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// An employee with identity and messaging handles derived from `email`.
pub fn employee(email: &str) -> Employee {
    let local = email.split('@').next().unwrap_or(email);
    let mut e = Employee::new(local, email);
    e.role = Role::Team;
    e.okta_user_id = Some(format!("okta-{local}"));
    e.slack_id = Some(format!("U-{local}"));
    e
}

/// An inventory computer in `SETTING` status.
pub fn computer(serial: &str, email: &str, os: &str) -> Computer {
    let local = email.split('@').next().unwrap_or(email);
    Computer {
        serial: serial.to_string(),
        user_name: local.to_string(),
        user_email: email.to_string(),
        user_slack_key: String::new(),
        user_ldap_name: String::new(),
        os: os.to_string(),
        model: "ThinkPad X1".to_string(),
        device_id: String::new(),
        ip_address: String::new(),
        mac_address: String::new(),
        os_version: String::new(),
        device_type: DeviceType::Edp001,
        network_type: NetworkType::Team,
        status: ComputerStatus::Setting,
        notes: None,
        updated_at: chrono::Utc::now(),
    }
}

/// A manual setting with freshly generated quick actions and a unique serial.
pub fn manual_setting(email: &str, onboarding: OnboardingType, os: &str) -> Setting {
    let mut c = computer(&format!("SN-{}", uuid::Uuid::new_v4()), email, os);
    c.model = "MacBook Pro".to_string();
    let mut s = Setting::from_computer(
        &c,
        Role::Team,
        Company::Core,
        onboarding,
        SettingStatus::Pending,
    );
    s.is_manual = true;
    s
}

// ---------------------------------------------------------------------------
// Collaborators
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityCall {
    AddToGroup { group_id: String, user_id: String },
    ResetPassword { user_id: String, password: String },
    Activate { user_id: String },
}

/// Records every call. Fails every call when built with [`failing`].
///
/// [`failing`]: RecordingIdentity::failing
#[derive(Default)]
pub struct RecordingIdentity {
    calls: Mutex<Vec<IdentityCall>>,
    fail_with: Option<String>,
}

impl RecordingIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_with: Some(message.to_string()),
        }
    }

    pub fn calls(&self) -> Vec<IdentityCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: IdentityCall) -> CallResult {
        self.calls.lock().unwrap().push(call);
        match &self.fail_with {
            Some(msg) => Err(CollabError::new(msg.clone())),
            None => Ok(()),
        }
    }
}

impl IdentityProvider for RecordingIdentity {
    fn add_to_group(&self, group_id: &str, user_id: &str) -> CallResult {
        self.record(IdentityCall::AddToGroup {
            group_id: group_id.to_string(),
            user_id: user_id.to_string(),
        })
    }

    fn reset_password(&self, user_id: &str, new_password: &str) -> CallResult {
        self.record(IdentityCall::ResetPassword {
            user_id: user_id.to_string(),
            password: new_password.to_string(),
        })
    }

    fn activate(&self, user_id: &str) -> CallResult {
        self.record(IdentityCall::Activate {
            user_id: user_id.to_string(),
        })
    }
}

#[derive(Default)]
pub struct RecordingMessenger {
    sent: Mutex<Vec<(String, Notice)>>,
    fail_with: Option<String>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: &str) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_with: Some(message.to_string()),
        }
    }

    /// `(handle, fallback text)` per message, in send order.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(h, n)| (h.clone(), n.text.clone()))
            .collect()
    }

    pub fn sent_notices(&self) -> Vec<Notice> {
        self.sent.lock().unwrap().iter().map(|(_, n)| n.clone()).collect()
    }
}

impl Messenger for RecordingMessenger {
    fn send_direct_message(&self, handle: &str, notice: &Notice) -> CallResult {
        if let Some(msg) = &self.fail_with {
            return Err(CollabError::new(msg.clone()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((handle.to_string(), notice.clone()));
        Ok(())
    }
}

/// Always returns the same password.
pub struct FixedPassword(pub String);

impl PasswordSource for FixedPassword {
    fn current_password(&self) -> String {
        self.0.clone()
    }
}
