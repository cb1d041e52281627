use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use setdesk_core::{ActionKind, BatchOutcome};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    pub setting_ids: Vec<String>,
    pub requested_by: String,
}

/// PATCH /api/settings/action/{kind}: run one quick action kind on the
/// given settings. A single id runs in single mode, anything else in bulk.
pub async fn run_action(
    State(app): State<AppState>,
    Path(kind): Path<String>,
    Json(req): Json<ActionRequest>,
) -> Result<Json<BatchOutcome>, AppError> {
    let kind: ActionKind = kind.parse()?;
    if req.setting_ids.is_empty() {
        return Err(AppError::bad_request("setting_ids must not be empty"));
    }
    let actor = req.requested_by.trim().to_string();
    if actor.is_empty() {
        return Err(AppError::bad_request("requested_by must not be empty"));
    }

    let executor = app.executor.clone();
    let outcome =
        tokio::task::spawn_blocking(move || executor.execute_many(&req.setting_ids, kind, &actor))
            .await
            .map_err(AppError::join)?;

    Ok(Json(outcome))
}
