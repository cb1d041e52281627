pub mod actions;
pub mod settings;

use axum::Json;

/// GET /api/health: liveness check, never authenticated.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
