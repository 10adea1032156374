use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{OriginalUri, State};
use axum::http::Uri;
use axum::response::{IntoResponse, Response};
use futures::{SinkExt, StreamExt};
use relay_core::channel::ChannelId;
use relay_core::lifecycle::{Action, ConnectionEvent, Lifecycle};
use relay_core::types::ConnId;
use tokio::sync::mpsc;

use crate::error::AppError;
use crate::state::AppState;
use crate::ws::registry::ChannelRegistry;

/// How long the writer may take to flush the close handshake after leaving.
const CLOSE_FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

/// Fallback handler: every path not claimed by a status route is a channel.
///
/// Upgrade requests join the channel named by the request target; plain
/// requests get a 404.
pub async fn relay_fallback(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    match ws {
        Ok(ws) => upgrade(ws, &uri, state),
        Err(_) => AppError::NotFound(uri.path().to_string()).into_response(),
    }
}

/// Accept the upgrade and hand the socket to the relay loop.
///
/// Shared by the fallback and the status routes, which also take upgrades
/// on their own paths.
pub fn upgrade(ws: WebSocketUpgrade, uri: &Uri, state: AppState) -> Response {
    let channel = channel_for(uri);
    tracing::info!(channel = %channel, "Upgrade request");

    let registry = Arc::clone(&state.registry);
    let connections = state.connections.clone();
    ws.on_upgrade(move |socket| connections.track_future(handle_socket(socket, channel, registry)))
}

/// Channel named by the request target: the path plus query, as received.
fn channel_for(uri: &Uri) -> ChannelId {
    let target = uri
        .path_and_query()
        .map_or_else(|| uri.path(), |pq| pq.as_str());
    ChannelId::from_request_target(target)
}

/// Manage a single relay connection after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), then:
///   1. Joins the channel in the registry.
///   2. Spawns a sender task that drains this connection's outbound queue.
///   3. Drives the lifecycle from inbound events on the current task.
///   4. Once the connection has left, lets the sender task drain and close
///      the sink so the close handshake completes.
async fn handle_socket(socket: WebSocket, channel: ChannelId, registry: Arc<ChannelRegistry>) {
    let conn_id = ConnId::new();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let members = registry.join(&channel, conn_id, tx);
    let mut lifecycle = Lifecycle::Connecting.join();
    tracing::info!(%conn_id, channel = %channel, members, "Client connected");

    let (mut sink, mut stream) = socket.split();

    // Sender task: frames from siblings, heartbeat pings and shutdown closes.
    // The queue ends when the registry drops this connection's sender.
    let sender_conn_id = conn_id;
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
        // Flushes the Close reply queued when the peer's Close was read.
        if let Err(e) = sink.close().await {
            tracing::debug!(conn_id = %sender_conn_id, error = %e, "WebSocket close failed");
        }
    });

    while !lifecycle.is_closed() {
        let event = match stream.next().await {
            Some(Ok(msg)) => classify(msg),
            Some(Err(e)) => ConnectionEvent::Error(e),
            None => ConnectionEvent::Close,
        };

        let (next, action) = lifecycle.on_event(event);
        lifecycle = next;

        match action {
            Action::Forward(msg) => {
                let delivered = registry.broadcast(&channel, conn_id, &msg);
                tracing::trace!(%conn_id, channel = %channel, delivered, "Frame relayed");
            }
            Action::Report(e) => {
                tracing::warn!(%conn_id, channel = %channel, error = %e, "WebSocket error");
            }
            Action::Leave => {
                let remaining = registry.leave(&channel, conn_id);
                tracing::info!(%conn_id, channel = %channel, remaining, "Client disconnected");
            }
            Action::Ignore => {}
        }
    }

    if tokio::time::timeout(CLOSE_FLUSH_TIMEOUT, &mut send_task)
        .await
        .is_err()
    {
        tracing::debug!(%conn_id, "WebSocket writer did not finish, aborting");
        send_task.abort();
    }
}

/// Map a received frame to a lifecycle event.
fn classify(msg: Message) -> ConnectionEvent<Message, axum::Error> {
    match msg {
        Message::Text(_) | Message::Binary(_) => ConnectionEvent::Data(msg),
        Message::Ping(_) | Message::Pong(_) => ConnectionEvent::Control,
        Message::Close(_) => ConnectionEvent::Close,
    }
}
