use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use setdesk_core::setting::{BulkUpdateEntry, BulkUpdateReport, NewSetting};
use setdesk_core::types::{OnboardingType, SettingStatus};
use setdesk_core::{SetdeskError, Setting};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<SettingStatus>,
    pub onboarding_type: Option<OnboardingType>,
}

#[derive(Debug, Deserialize)]
pub struct BulkUpdateRequest {
    pub updates: Vec<BulkUpdateEntry>,
}

/// GET /api/settings: all settings, oldest first, optionally filtered.
pub async fn list_settings(
    State(app): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Setting>>, AppError> {
    let store = app.store();
    let settings = tokio::task::spawn_blocking(move || {
        let mut all = store.list_settings()?;
        all.retain(|s| {
            query.status.map_or(true, |st| s.status == st)
                && query
                    .onboarding_type
                    .map_or(true, |t| s.onboarding_type == t)
        });
        Ok::<_, SetdeskError>(all)
    })
    .await
    .map_err(AppError::join)??;

    Ok(Json(settings))
}

/// POST /api/settings: create from operator input.
pub async fn create_setting(
    State(app): State<AppState>,
    Json(input): Json<NewSetting>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let store = app.store();
    let id = tokio::task::spawn_blocking(move || Setting::create(store.as_ref(), input))
        .await
        .map_err(AppError::join)??;

    Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": id }))))
}

/// GET /api/settings/{id}
pub async fn get_setting(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Setting>, AppError> {
    let store = app.store();
    let setting = tokio::task::spawn_blocking(move || Setting::load(store.as_ref(), &id))
        .await
        .map_err(AppError::join)??;

    Ok(Json(setting))
}

/// DELETE /api/settings/{id}
pub async fn delete_setting(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let store = app.store();
    tokio::task::spawn_blocking(move || Setting::delete(store.as_ref(), &id))
        .await
        .map_err(AppError::join)??;

    Ok(Json(serde_json::json!({ "message": "deleted" })))
}

/// PATCH /api/settings: apply `{id, data}` patches independently.
pub async fn bulk_update(
    State(app): State<AppState>,
    Json(req): Json<BulkUpdateRequest>,
) -> Result<Json<BulkUpdateReport>, AppError> {
    let store = app.store();
    let report = tokio::task::spawn_blocking(move || Setting::bulk_update(store.as_ref(), req.updates))
        .await
        .map_err(AppError::join)?;

    Ok(Json(report))
}
