//! Persistent telemetry channels (§4.G, §6): `"controller"` (bidirectional,
//! drives the ingestion pipeline) and `"frontend"` (receive-only plus a
//! ping/pong heartbeat). Both are authenticated by a bearer token carried
//! as a `?token=` query parameter, since the WebSocket handshake has no
//! room for an `Authorization` header.

use std::ops::ControlFlow;

use aide::axum::ApiRouter;
use aide::axum::routing::get;
use axum::extract::ws::{Message, Utf8Bytes, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::auth;
use crate::broadcast::Connection;
use crate::error::HttpError;
use crate::ingest::{self, IncomingDatapoint};
use crate::state::AppState;

const TRACING_TARGET: &str = "webmacs_server::handler::channel";

/// Refuses frames larger than this before attempting to parse them.
const MAX_MESSAGE_SIZE: usize = 1_024 * 1_024;

/// Same ceiling `/datapoints/batch` enforces (§4.F.3); kept as its own
/// constant since `handler::datapoints`'s is private to that module.
const MAX_BATCH_SIZE: usize = 500;

#[derive(Debug, Deserialize)]
struct ChannelAuth {
    token: String,
}

async fn authenticate_query(state: &AppState, token: &str) -> Result<webmacs_data::model::User, HttpError> {
    let mut conn = state.pg.get_connection().await.map_err(HttpError::from)?;
    auth::authenticate(&mut conn, &state.jwt, token).await.map_err(HttpError::from)
}

#[derive(Debug, Deserialize)]
struct ControllerFrame {
    datapoints: Vec<IncomingDatapoint>,
}

/// Forwards everything sent to `rx` out over `sink` as text frames, until
/// either side hangs up. Runs as its own task so a slow client can't block
/// the receive loop, and vice versa.
async fn forward_outbound(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sink: futures::stream::SplitSink<WebSocket, Message>,
) {
    while let Some(text) = rx.recv().await {
        if sink.send(Message::Text(Utf8Bytes::from(text))).await.is_err() {
            break;
        }
    }
}

async fn controller_ws(
    State(state): State<AppState>,
    Query(auth): Query<ChannelAuth>,
    ws: WebSocketUpgrade,
) -> Result<Response, HttpError> {
    let _user = authenticate_query(&state, &auth.token).await?;
    Ok(ws.on_upgrade(move |socket| handle_controller(socket, state)))
}

async fn handle_controller(socket: WebSocket, state: AppState) {
    let (tx, rx) = mpsc::unbounded_channel();
    let conn = Connection::new(tx.clone());
    let conn_id = conn.id();
    state.broadcast.attach("controller", conn);

    tracing::info!(target: TRACING_TARGET, connection_id = %conn_id, "controller channel attached");

    let (sink, mut stream) = socket.split();
    let mut forward_task = tokio::spawn(forward_outbound(rx, sink));
    let mut shutdown_rx = state.shutdown.subscribe();
    let mut closing = false;

    loop {
        tokio::select! {
            msg = stream.next() => {
                let Some(Ok(msg)) = msg else { break };
                if process_controller_message(conn_id, msg, &state).await.is_break() {
                    break;
                }
            }
            _ = &mut forward_task => break,
            _ = shutdown_rx.recv() => {
                let _ = tx.send(r#"{"type":"server_shutdown"}"#.to_string());
                closing = true;
                break;
            }
        }
    }

    state.broadcast.detach("controller", conn_id);
    drop(tx);
    if closing {
        let _ = tokio::time::timeout(std::time::Duration::from_secs(1), forward_task).await;
    } else {
        forward_task.abort();
    }
    tracing::info!(target: TRACING_TARGET, connection_id = %conn_id, "controller channel detached");
}

async fn process_controller_message(conn_id: Uuid, msg: Message, state: &AppState) -> ControlFlow<(), ()> {
    let Message::Text(text) = msg else {
        return ControlFlow::Continue(());
    };
    if text.len() > MAX_MESSAGE_SIZE {
        tracing::warn!(target: TRACING_TARGET, connection_id = %conn_id, size = text.len(), "frame exceeds maximum size");
        return ControlFlow::Continue(());
    }

    let frame: ControllerFrame = match serde_json::from_str(&text) {
        Ok(frame) => frame,
        Err(err) => {
            tracing::warn!(target: TRACING_TARGET, connection_id = %conn_id, error = %err, "failed to parse controller frame");
            return ControlFlow::Continue(());
        }
    };

    if frame.datapoints.len() > MAX_BATCH_SIZE {
        tracing::warn!(target: TRACING_TARGET, connection_id = %conn_id, batch_size = frame.datapoints.len(), "controller frame exceeds maximum batch size");
        return ControlFlow::Continue(());
    }

    let Ok(mut conn) = state.pg.get_connection().await else {
        tracing::error!(target: TRACING_TARGET, connection_id = %conn_id, "failed to acquire connection for controller frame");
        return ControlFlow::Continue(());
    };

    match ingest::ingest(&mut conn, &state.dispatcher, &state.broadcast, &state.throttles, frame.datapoints).await {
        Ok(outcome) => {
            tracing::debug!(target: TRACING_TARGET, connection_id = %conn_id, accepted = outcome.accepted, rejected = outcome.rejected, "controller frame ingested");
        }
        Err(err) => {
            tracing::warn!(target: TRACING_TARGET, connection_id = %conn_id, error = %err, "controller frame ingestion failed");
        }
    }

    ControlFlow::Continue(())
}

async fn frontend_ws(
    State(state): State<AppState>,
    Query(auth): Query<ChannelAuth>,
    ws: WebSocketUpgrade,
) -> Result<Response, HttpError> {
    let _user = authenticate_query(&state, &auth.token).await?;
    Ok(ws.on_upgrade(move |socket| handle_frontend(socket, state)))
}

fn is_ping(text: &str) -> bool {
    matches!(
        serde_json::from_str::<serde_json::Value>(text),
        Ok(v) if v.get("type").and_then(|t| t.as_str()) == Some("ping")
    )
}

async fn handle_frontend(socket: WebSocket, state: AppState) {
    let (tx, rx) = mpsc::unbounded_channel();
    let conn = Connection::new(tx.clone());
    let conn_id = conn.id();
    state.broadcast.attach("frontend", conn);

    tracing::info!(target: TRACING_TARGET, connection_id = %conn_id, "frontend channel attached");

    let _ = tx.send(r#"{"type":"connected"}"#.to_string());

    let (sink, mut stream) = socket.split();
    let mut forward_task = tokio::spawn(forward_outbound(rx, sink));
    let mut shutdown_rx = state.shutdown.subscribe();
    let mut closing = false;

    loop {
        tokio::select! {
            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        if is_ping(&text) {
                            let _ = tx.send(r#"{"type":"pong"}"#.to_string());
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(_)) | None => break,
                }
            }
            _ = &mut forward_task => break,
            _ = shutdown_rx.recv() => {
                let _ = tx.send(r#"{"type":"server_shutdown"}"#.to_string());
                closing = true;
                break;
            }
        }
    }

    state.broadcast.detach("frontend", conn_id);
    drop(tx);
    if closing {
        let _ = tokio::time::timeout(std::time::Duration::from_secs(1), forward_task).await;
    } else {
        forward_task.abort();
    }
    tracing::info!(target: TRACING_TARGET, connection_id = %conn_id, "frontend channel detached");
}

pub fn routes() -> ApiRouter<AppState> {
    ApiRouter::new().route("/ws/controller", get(controller_ws)).route("/ws/frontend", get(frontend_ws))
}
