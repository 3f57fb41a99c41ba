//! Web server setup and routing

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::api;
use crate::state::AppState;
use crate::ws;

/// Build the router for the control surfaces
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // API routes
        .route("/api/state", get(api::get_state))
        .route("/api/config", get(api::get_config))
        .route("/api/usd", post(api::set_usd))
        .route("/api/load", post(api::load_target))
        .route("/api/reset", post(api::reset_stage))
        .route("/api/layout", post(api::restore_layout))
        // WebSocket endpoints
        .route("/ws/client", get(ws::client_handler))
        .route("/ws/host", get(ws::host_handler))
        // CORS
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Run the HTTP server until `shutdown` resolves
pub async fn run<F>(state: Arc<AppState>, bind: &str, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!(address = %bind, protocol = "HTTP", "Starting web server");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
