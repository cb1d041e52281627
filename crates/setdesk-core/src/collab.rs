//! External collaborators the executor drives.
//!
//! Each trait is object safe and shared as `Arc<dyn ...>`. Calls are
//! blocking; timeouts belong to the implementation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::notice::Notice;

/// Failure detail from an external call. The message is stored verbatim
/// as the quick action's `error_message`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct CollabError(pub String);

impl CollabError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub type CallResult = std::result::Result<(), CollabError>;

pub trait IdentityProvider: Send + Sync {
    fn add_to_group(&self, group_id: &str, user_id: &str) -> CallResult;

    fn reset_password(&self, user_id: &str, new_password: &str) -> CallResult;

    fn activate(&self, user_id: &str) -> CallResult;
}

pub trait Messenger: Send + Sync {
    /// Send `notice` as a direct message to the user behind `handle`.
    fn send_direct_message(&self, handle: &str, notice: &Notice) -> CallResult;
}

/// Supplies the password for the current rotation cycle.
pub trait PasswordSource: Send + Sync {
    fn current_password(&self) -> String;
}

/// Identity-provider group ids targeted by the group-assignment kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OktaGroups {
    /// Every user being set up.
    pub all_setting: String,
    /// Windows device users.
    pub win_setting: String,
    pub o365_intune: String,
}

impl Default for OktaGroups {
    fn default() -> Self {
        Self {
            all_setting: "your_setting_group_id".to_string(),
            win_setting: "your_win_setting_group_id".to_string(),
            o365_intune: "your_o365_setting_group_id".to_string(),
        }
    }
}

impl OktaGroups {
    /// True while any group id is still the shipped placeholder.
    pub fn has_placeholders(&self) -> bool {
        [&self.all_setting, &self.win_setting, &self.o365_intune]
            .iter()
            .any(|id| id.starts_with("your_"))
    }
}
