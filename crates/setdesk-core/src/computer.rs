use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ComputerStatus, DeviceType, NetworkType};

/// An inventory computer, keyed by serial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Computer {
    pub serial: String,
    pub user_name: String,
    pub user_email: String,
    #[serde(default)]
    pub user_slack_key: String,
    #[serde(default)]
    pub user_ldap_name: String,
    pub os: String,
    pub model: String,
    #[serde(default)]
    pub device_id: String,
    #[serde(default)]
    pub ip_address: String,
    #[serde(default)]
    pub mac_address: String,
    #[serde(default)]
    pub os_version: String,
    pub device_type: DeviceType,
    pub network_type: NetworkType,
    #[serde(default)]
    pub status: ComputerStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Computer {
    pub fn set_status(&mut self, status: ComputerStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}
