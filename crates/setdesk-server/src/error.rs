use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use setdesk_core::error::SetdeskError;

// ---------------------------------------------------------------------------
// Internal sentinel for explicit 400 errors
// ---------------------------------------------------------------------------

/// Carries an explicit HTTP 400 through the `anyhow::Error` chain for
/// request validation that has no `SetdeskError` counterpart.
#[derive(Debug)]
struct BadRequestError(String);

impl std::fmt::Display for BadRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for BadRequestError {}

// ---------------------------------------------------------------------------
// AppError: unified error type for HTTP responses
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(BadRequestError(msg.into()).into())
    }

    pub fn join(e: tokio::task::JoinError) -> Self {
        Self(anyhow::anyhow!("task join error: {e}"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if self.0.downcast_ref::<BadRequestError>().is_some() {
            StatusCode::BAD_REQUEST
        } else if let Some(e) = self.0.downcast_ref::<SetdeskError>() {
            match e {
                SetdeskError::SettingNotFound(_)
                | SetdeskError::ComputerNotFound(_)
                | SetdeskError::EmployeeNotFound(_) => StatusCode::NOT_FOUND,
                SetdeskError::InvalidOnboardingType(_)
                | SetdeskError::InvalidSettingStatus(_)
                | SetdeskError::InvalidActionKind(_)
                | SetdeskError::InvalidActionStatus(_)
                | SetdeskError::InvalidComputerStatus(_)
                | SetdeskError::InvalidField { .. } => StatusCode::BAD_REQUEST,
                SetdeskError::Store(_)
                | SetdeskError::Config(_)
                | SetdeskError::Io(_)
                | SetdeskError::Yaml(_)
                | SetdeskError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
