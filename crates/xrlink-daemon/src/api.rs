//! REST API handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use xrlink_core::{BridgeEvent, ControlRequest};

use crate::event_loop::LoopEvent;
use crate::state::AppState;

/// API error response
#[derive(Serialize)]
struct ApiError {
    error: String,
}

impl ApiError {
    fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

/// Queue a control request and answer 202 once it is on the event queue
fn enqueue(state: &AppState, request: ControlRequest) -> axum::response::Response {
    let action = format!("{:?}", request);
    if state.post(LoopEvent::Bridge(BridgeEvent::Control(request))) {
        (
            StatusCode::ACCEPTED,
            Json(serde_json::json!({"status": "queued", "request": action})),
        )
            .into_response()
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiError::new("Event loop is not running")),
        )
            .into_response()
    }
}

/// Get the current bridge state
pub async fn get_state(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.snapshot())
}

/// Get current configuration
pub async fn get_config(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.config.clone())
}

/// Set USD request body
#[derive(Deserialize)]
pub struct SetUsdRequest {
    /// Asset path, empty selects the default
    #[serde(default)]
    path: String,
}

/// Replace the pending load target
pub async fn set_usd(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SetUsdRequest>,
) -> impl IntoResponse {
    info!(usd = %req.path, "Set USD requested");
    enqueue(&state, ControlRequest::SetUsd(req.path))
}

/// Open the pending load target now
pub async fn load_target(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    info!("Load requested");
    enqueue(&state, ControlRequest::LoadTarget)
}

/// Open the empty stage
pub async fn reset_stage(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    info!("Stage reset requested");
    enqueue(&state, ControlRequest::ResetStage)
}

/// Re-apply the layout for the active profile
pub async fn restore_layout(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    info!("Layout restore requested");
    enqueue(&state, ControlRequest::RestoreLayout)
}
