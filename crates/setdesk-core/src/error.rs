use thiserror::Error;

#[derive(Debug, Error)]
pub enum SetdeskError {
    #[error("setting not found: {0}")]
    SettingNotFound(String),

    #[error("computer not found: {0}")]
    ComputerNotFound(String),

    #[error("employee not found: {0}")]
    EmployeeNotFound(String),

    #[error("invalid onboarding type: {0}")]
    InvalidOnboardingType(String),

    #[error("invalid setting status: {0}")]
    InvalidSettingStatus(String),

    #[error("invalid action kind: {0}")]
    InvalidActionKind(String),

    #[error("invalid quick action status: {0}")]
    InvalidActionStatus(String),

    #[error("invalid computer status: {0}")]
    InvalidComputerStatus(String),

    #[error("invalid field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    #[error("store error: {0}")]
    Store(String),

    #[error("invalid config: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SetdeskError>;
