//! WebSocket handlers for the remote client and the scene host

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};
use uuid::Uuid;
use xrlink_core::BridgeEvent;

use crate::event_loop::LoopEvent;
use crate::protocol::HostEvent;
use crate::state::AppState;

/// Remote client upgrade handler (`/ws/client`)
pub async fn client_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_client(socket, state))
}

/// Scene host upgrade handler (`/ws/host`)
pub async fn host_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_host(socket, state))
}

async fn handle_client(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let mut status = state.subscribe_status();
    let id = Uuid::new_v4();

    info!(connection = %id, "Remote client connected");

    loop {
        tokio::select! {
            // Forward status messages to the client
            msg = status.recv() => {
                match msg {
                    Ok(text) => {
                        if sender.send(Message::Text(text.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(n)) => {
                        debug!(connection = %id, skipped = n, "Status channel lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }

            // Control messages from the client
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let raw = text.as_str().as_bytes().to_vec();
                        if !state.post(LoopEvent::Bridge(BridgeEvent::Remote(raw))) {
                            break;
                        }
                    }
                    Some(Ok(Message::Binary(data))) => {
                        if !state.post(LoopEvent::Bridge(BridgeEvent::Remote(data.to_vec()))) {
                            break;
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        warn!(connection = %id, error = %e, "WebSocket error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    info!(connection = %id, "Remote client disconnected");
}

async fn handle_host(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    // Subscribe before announcing so startup settings reach this host
    let mut commands = state.subscribe_host_commands();
    let id = Uuid::new_v4();

    if state.host_count() > 1 {
        warn!(connection = %id, hosts = state.host_count(), "Another scene host is already connected");
    }
    info!(connection = %id, "Scene host connected");

    if !state.post(LoopEvent::Bridge(BridgeEvent::HostConnected)) {
        return;
    }

    loop {
        tokio::select! {
            // Forward commands to the host
            cmd = commands.recv() => {
                match cmd {
                    Ok(cmd) => {
                        let json = match serde_json::to_string(&cmd) {
                            Ok(json) => json,
                            Err(e) => {
                                warn!(error = %e, "Failed to encode host command");
                                continue;
                            }
                        };
                        if sender.send(Message::Text(json.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(n)) => {
                        warn!(connection = %id, skipped = n, "Host command channel lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }

            // Notifications from the host
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        match HostEvent::parse(text.as_str()) {
                            Ok(event) => {
                                if !state.post(LoopEvent::Host(event)) {
                                    break;
                                }
                            }
                            Err(e) => warn!(connection = %id, error = %e, "Ignoring host message"),
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        warn!(connection = %id, error = %e, "WebSocket error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    info!(connection = %id, "Scene host disconnected");
}
