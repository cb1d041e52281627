use crate::collab::OktaGroups;
use crate::error::{Result, SetdeskError};
use crate::password::RotatingPassword;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Bearer token required on every `/api` request. `None` disables auth.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            api_token: None,
        }
    }
}

// ---------------------------------------------------------------------------
// StoreConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    #[default]
    Redb,
    /// Nothing survives a restart.
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Redb,
            path: PathBuf::from("setdesk.redb"),
        }
    }
}

// ---------------------------------------------------------------------------
// OktaConfig / SlackConfig
// ---------------------------------------------------------------------------

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OktaConfig {
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    pub groups: OktaGroups,
    pub timeout_secs: u64,
}

impl Default for OktaConfig {
    fn default() -> Self {
        Self {
            base_url: "https://your-org.okta.com".to_string(),
            api_token: None,
            groups: OktaGroups::default(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlackConfig {
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bot_token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            base_url: "https://slack.com/api".to_string(),
            bot_token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

// ---------------------------------------------------------------------------
// PasswordConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordConfig {
    /// First day of cycle zero.
    pub anchor: NaiveDate,
    pub interval_weeks: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            anchor: NaiveDate::from_ymd_opt(2026, 1, 16).unwrap_or_default(),
            interval_weeks: 2,
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub okta: OktaConfig,
    pub slack: SlackConfig,
    pub password: PasswordConfig,
}

impl Config {
    /// Read `path` (all defaults when `None`), then apply `SETDESK_*`
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(p) => Self::from_yaml(&std::fs::read_to_string(p)?)?,
            None => Self::default(),
        };
        cfg.apply_env(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    pub fn from_yaml(data: &str) -> Result<Self> {
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(data)?)
    }

    /// Override secrets and endpoints from `lookup` (normally the process
    /// environment). Empty values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(v) = get("SETDESK_API_TOKEN") {
            self.server.api_token = Some(v);
        }
        if let Some(v) = get("SETDESK_PORT") {
            self.server.port = v
                .parse()
                .map_err(|_| SetdeskError::Config(format!("SETDESK_PORT is not a port: {v}")))?;
        }
        if let Some(v) = get("SETDESK_DB") {
            self.store.path = PathBuf::from(v);
        }
        if let Some(v) = get("SETDESK_OKTA_URL") {
            self.okta.base_url = v;
        }
        if let Some(v) = get("SETDESK_OKTA_TOKEN") {
            self.okta.api_token = Some(v);
        }
        if let Some(v) = get("SETDESK_SLACK_URL") {
            self.slack.base_url = v;
        }
        if let Some(v) = get("SETDESK_SLACK_TOKEN") {
            self.slack.bot_token = Some(v);
        }
        Ok(())
    }

    pub fn rotation(&self) -> RotatingPassword {
        RotatingPassword::new(self.password.anchor, self.password.interval_weeks)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let mut warn = |level: WarnLevel, message: &str| {
            warnings.push(ConfigWarning {
                level,
                message: message.to_string(),
            })
        };

        if self.server.api_token.is_none() {
            warn(
                WarnLevel::Warning,
                "server.api_token is not set; the API accepts unauthenticated requests",
            );
        }
        if self.okta.api_token.is_none() {
            warn(
                WarnLevel::Warning,
                "okta.api_token is not set; identity-provider actions will fail",
            );
        }
        if self.okta.groups.has_placeholders() {
            warn(
                WarnLevel::Warning,
                "okta.groups still contains placeholder group ids",
            );
        }
        if self.slack.bot_token.is_none() {
            warn(
                WarnLevel::Warning,
                "slack.bot_token is not set; notice actions will fail",
            );
        }
        if self.password.interval_weeks == 0 {
            warn(
                WarnLevel::Error,
                "password.interval_weeks must be at least 1",
            );
        }
        if self.okta.timeout_secs == 0 || self.slack.timeout_secs == 0 {
            warn(
                WarnLevel::Warning,
                "a client timeout of 0 seconds disables the timeout",
            );
        }
        if self.store.backend == StoreBackend::Redb && self.store.path.as_os_str().is_empty() {
            warn(WarnLevel::Error, "store.path is empty");
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
