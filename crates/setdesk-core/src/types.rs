use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SetdeskError;

// ---------------------------------------------------------------------------
// OnboardingType
// ---------------------------------------------------------------------------

/// Why a device or account is being provisioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingType {
    /// Not decided yet.
    Pending,
    /// New hire.
    New,
    /// Device replacement.
    Replace,
    /// Returning from leave.
    Rejoin,
    /// Transfer between companies.
    Switch,
}

impl OnboardingType {
    pub fn all() -> &'static [OnboardingType] {
        &[
            OnboardingType::Pending,
            OnboardingType::New,
            OnboardingType::Replace,
            OnboardingType::Rejoin,
            OnboardingType::Switch,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OnboardingType::Pending => "pending",
            OnboardingType::New => "new",
            OnboardingType::Replace => "replace",
            OnboardingType::Rejoin => "rejoin",
            OnboardingType::Switch => "switch",
        }
    }
}

impl fmt::Display for OnboardingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OnboardingType {
    type Err = SetdeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OnboardingType::Pending),
            "new" => Ok(OnboardingType::New),
            "replace" => Ok(OnboardingType::Replace),
            "rejoin" => Ok(OnboardingType::Rejoin),
            "switch" => Ok(OnboardingType::Switch),
            _ => Err(SetdeskError::InvalidOnboardingType(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// SettingStatus
// ---------------------------------------------------------------------------

/// Overall progress of a setting request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingStatus {
    /// Not shipped yet.
    Pending,
    Shipped,
    /// Setup in progress.
    Setting,
    Completed,
}

impl SettingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SettingStatus::Pending => "pending",
            SettingStatus::Shipped => "shipped",
            SettingStatus::Setting => "setting",
            SettingStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for SettingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SettingStatus {
    type Err = SetdeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(SettingStatus::Pending),
            "shipped" => Ok(SettingStatus::Shipped),
            "setting" => Ok(SettingStatus::Setting),
            "completed" => Ok(SettingStatus::Completed),
            _ => Err(SetdeskError::InvalidSettingStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// ActionKind
// ---------------------------------------------------------------------------

/// One remote operation in the provisioning workflow.
///
/// Declaration order is the fixed catalog order; `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActionKind {
    #[serde(rename = "okta-setting")]
    OktaSetting,
    #[serde(rename = "win-setting")]
    WinSetting,
    #[serde(rename = "o365-intune")]
    O365Intune,
    #[serde(rename = "password-notice")]
    PasswordNotice,
    #[serde(rename = "pickup-notice")]
    PickupNotice,
    #[serde(rename = "okta-activate")]
    OktaActivate,
}

impl ActionKind {
    /// The full catalog in emission order.
    pub fn all() -> &'static [ActionKind] {
        &[
            ActionKind::OktaSetting,
            ActionKind::WinSetting,
            ActionKind::O365Intune,
            ActionKind::PasswordNotice,
            ActionKind::PickupNotice,
            ActionKind::OktaActivate,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::OktaSetting => "okta-setting",
            ActionKind::WinSetting => "win-setting",
            ActionKind::O365Intune => "o365-intune",
            ActionKind::PasswordNotice => "password-notice",
            ActionKind::PickupNotice => "pickup-notice",
            ActionKind::OktaActivate => "okta-activate",
        }
    }

    /// Pure notification kinds only talk to the messenger.
    pub fn is_notice(self) -> bool {
        matches!(self, ActionKind::PasswordNotice | ActionKind::PickupNotice)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActionKind {
    type Err = SetdeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| SetdeskError::InvalidActionKind(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// ActionStatus
// ---------------------------------------------------------------------------

/// Execution status of a single quick action.
///
/// `n/a` and `progress` are accepted on input for records written by older
/// deployments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionStatus {
    #[serde(rename = "not-applicable", alias = "n/a")]
    NotApplicable,
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "in-progress", alias = "progress")]
    InProgress,
    #[serde(rename = "done")]
    Done,
    #[serde(rename = "error")]
    Error,
}

impl ActionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionStatus::NotApplicable => "not-applicable",
            ActionStatus::Pending => "pending",
            ActionStatus::InProgress => "in-progress",
            ActionStatus::Done => "done",
            ActionStatus::Error => "error",
        }
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActionStatus {
    type Err = SetdeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not-applicable" | "n/a" => Ok(ActionStatus::NotApplicable),
            "pending" => Ok(ActionStatus::Pending),
            "in-progress" | "progress" => Ok(ActionStatus::InProgress),
            "done" => Ok(ActionStatus::Done),
            "error" => Ok(ActionStatus::Error),
            _ => Err(SetdeskError::InvalidActionStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// ComputerStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of an inventory computer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum ComputerStatus {
    /// In storage.
    #[default]
    Keep,
    /// Being prepared for a user.
    Setting,
    /// Handed over and in use.
    Use,
    Lost,
}

impl ComputerStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ComputerStatus::Keep => "KEEP",
            ComputerStatus::Setting => "SETTING",
            ComputerStatus::Use => "USE",
            ComputerStatus::Lost => "LOST",
        }
    }
}

impl fmt::Display for ComputerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ComputerStatus {
    type Err = SetdeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "KEEP" => Ok(ComputerStatus::Keep),
            "SETTING" => Ok(ComputerStatus::Setting),
            "USE" => Ok(ComputerStatus::Use),
            "LOST" => Ok(ComputerStatus::Lost),
            _ => Err(SetdeskError::InvalidComputerStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Small classification enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Team member.
    #[default]
    Team,
    /// Assistant.
    Asst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceType {
    #[serde(rename = "EDP001")]
    Edp001,
    #[serde(rename = "EDP002")]
    Edp002,
    #[serde(rename = "EDP003")]
    Edp003,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkType {
    /// Internet network.
    Team,
    /// Separated secure network.
    Sec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Company {
    #[default]
    Core,
    Bank,
    Insu,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn action_kind_catalog_order() {
        let names: Vec<&str> = ActionKind::all().iter().map(|k| k.as_str()).collect();
        assert_eq!(
            names,
            [
                "okta-setting",
                "win-setting",
                "o365-intune",
                "password-notice",
                "pickup-notice",
                "okta-activate"
            ]
        );
        let mut sorted = ActionKind::all().to_vec();
        sorted.sort();
        assert_eq!(sorted, ActionKind::all());
    }

    #[test]
    fn action_kind_serde_matches_as_str() {
        for kind in ActionKind::all() {
            let json = serde_json::to_string(kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            assert_eq!(ActionKind::from_str(kind.as_str()).unwrap(), *kind);
        }
        assert!(ActionKind::from_str("reboot").is_err());
    }

    #[test]
    fn action_status_accepts_legacy_names() {
        let na: ActionStatus = serde_json::from_str("\"n/a\"").unwrap();
        assert_eq!(na, ActionStatus::NotApplicable);
        let progress: ActionStatus = serde_json::from_str("\"progress\"").unwrap();
        assert_eq!(progress, ActionStatus::InProgress);
        assert_eq!(
            serde_json::to_string(&ActionStatus::NotApplicable).unwrap(),
            "\"not-applicable\""
        );
    }

    #[test]
    fn onboarding_type_rejects_unknown() {
        for t in OnboardingType::all() {
            assert_eq!(OnboardingType::from_str(t.as_str()).unwrap(), *t);
        }
        assert!(matches!(
            OnboardingType::from_str("fired"),
            Err(SetdeskError::InvalidOnboardingType(_))
        ));
    }

    #[test]
    fn computer_status_is_uppercase_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&ComputerStatus::Use).unwrap(),
            "\"USE\""
        );
        assert_eq!(
            ComputerStatus::from_str("setting").unwrap(),
            ComputerStatus::Setting
        );
    }
}
