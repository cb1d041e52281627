use axum::{
    body::Body,
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::state::AppState;

/// Require `Authorization: Bearer <token>` when a token is configured.
/// Without a configured token every request passes through.
pub async fn auth_middleware(State(app): State<AppState>, req: Request, next: Next) -> Response {
    let Some(token) = app.api_token.as_deref() else {
        return next.run(req).await;
    };

    let presented = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim);

    if presented.is_some_and(|p| tokens_match(p, token)) {
        return next.run(req).await;
    }

    tracing::warn!(path = %req.uri().path(), "rejected unauthenticated request");
    Response::builder()
        .status(401)
        .header("Content-Type", "application/json")
        .body(Body::from(r#"{"error":"unauthorized"}"#))
        .unwrap_or_default()
}

/// Compare in time independent of where the first differing byte sits.
fn tokens_match(presented: &str, expected: &str) -> bool {
    let (a, b) = (presented.as_bytes(), expected.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
