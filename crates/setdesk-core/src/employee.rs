use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Company, Role};

/// A person in the directory, keyed by email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub okta_user_id: Option<String>,
    #[serde(default)]
    pub ldap_id: Option<String>,
    #[serde(default)]
    pub slack_id: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub company: Company,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub joined_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub resigned_at: Option<DateTime<Utc>>,
}

fn default_status() -> String {
    "ACTIVE".to_string()
}

impl Employee {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            okta_user_id: None,
            ldap_id: None,
            slack_id: None,
            role: Role::default(),
            company: Company::default(),
            status: default_status(),
            joined_at: None,
            resigned_at: None,
        }
    }

    /// Identity-provider user id, or the failure message used on the action.
    pub fn okta_id(&self) -> std::result::Result<&str, String> {
        self.okta_user_id
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| format!("Okta user id missing for {}", self.email))
    }

    /// Messaging handle, or the failure message used on the action.
    pub fn slack_handle(&self) -> std::result::Result<&str, String> {
        self.slack_id
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| format!("Slack id missing for {}", self.email))
    }
}
