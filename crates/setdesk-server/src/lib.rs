pub mod auth;
pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, patch};
use axum::{middleware, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve_on()` and available for integration testing.
pub fn build_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        // Settings
        .route(
            "/api/settings",
            get(routes::settings::list_settings)
                .post(routes::settings::create_setting)
                .patch(routes::settings::bulk_update),
        )
        .route(
            "/api/settings/{id}",
            get(routes::settings::get_setting).delete(routes::settings::delete_setting),
        )
        // Quick actions
        .route(
            "/api/settings/action/{kind}",
            patch(routes::actions::run_action),
        )
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            auth::auth_middleware,
        ));

    Router::new()
        .route("/api/health", get(routes::health))
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Serve the API on a pre-bound listener until the process is stopped.
pub async fn serve_on(app_state: AppState, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    let app = build_router(app_state);

    tracing::info!("setdesk API listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;
    Ok(())
}
