/**
 * Live-Update WebSocket Handler
 *
 * Handles `GET /ws`. After the upgrade the server sends one greeting frame,
 * registers the connection as a session and then runs two halves:
 *
 * - **writer** drains the session's outbound queue into the socket
 * - **reader** logs inbound frames; there is no command protocol
 *
 * Whichever half stops first (client close, transport error) ends the
 * connection, and the session is unregistered. Unregistering is idempotent,
 * so it does not matter whether the dispatcher already pruned it.
 */

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::backend::realtime::registry::ConnectionRegistry;

/// First frame sent on every new connection
pub const GREETING: &str = "Welcome to the WebSocket server!";

/// WebSocket upgrade handler
pub async fn handle_ws_upgrade(
    ws: WebSocketUpgrade,
    State(registry): State<Arc<ConnectionRegistry>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, registry))
}

/// Run one connection to completion
pub async fn handle_socket(mut socket: WebSocket, registry: Arc<ConnectionRegistry>) {
    if let Err(e) = socket.send(Message::Text(GREETING.into())).await {
        tracing::warn!(error = %e, "[Realtime] Failed to send greeting, dropping connection");
        return;
    }

    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let session = registry.register(tx);
    let session_id = session.id();
    tracing::info!(session_id = %session_id, "New WebSocket connection");

    let (mut ws_tx, mut ws_rx) = socket.split();

    let mut writer = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if let Err(e) = ws_tx.send(Message::Text(frame.into())).await {
                tracing::debug!(session_id = %session_id, error = %e, "Socket write failed");
                break;
            }
        }
        let _ = ws_tx.close().await;
    });

    let mut reader = tokio::spawn(async move {
        while let Some(frame) = ws_rx.next().await {
            match frame {
                Ok(Message::Text(text)) => {
                    tracing::info!(session_id = %session_id, "Received: {}", text.as_str());
                }
                Ok(Message::Binary(bytes)) => {
                    tracing::info!(session_id = %session_id, len = bytes.len(), "Received binary frame");
                }
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(session_id = %session_id, error = %e, "Socket read failed");
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut writer => reader.abort(),
        _ = &mut reader => writer.abort(),
    }

    session.mark_closing();
    registry.unregister(&session_id);
    tracing::info!(session_id = %session_id, "WebSocket connection closed");
}
