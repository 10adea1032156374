use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{OriginalUri, State};
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;
use crate::ws;

/// Root status text.
pub const STATUS_TEXT: &str = "WebSocket binary relay running";

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Live channels.
    pub channels: usize,
    /// Live relay connections across all channels.
    pub connections: usize,
}

type MaybeUpgrade = Result<WebSocketUpgrade, WebSocketUpgradeRejection>;

/// GET / -- plain status line.
async fn root_status(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ws: MaybeUpgrade,
) -> Response {
    match ws {
        Ok(ws) => ws::upgrade(ws, &uri, state),
        Err(_) => STATUS_TEXT.into_response(),
    }
}

/// GET /ping -- liveness probe.
async fn ping(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ws: MaybeUpgrade,
) -> Response {
    match ws {
        Ok(ws) => ws::upgrade(ws, &uri, state),
        Err(_) => "pong".into_response(),
    }
}

/// GET /health -- relay occupancy.
async fn health_check(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ws: MaybeUpgrade,
) -> Response {
    if let Ok(ws) = ws {
        return ws::upgrade(ws, &uri, state);
    }

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        channels: state.registry.channel_count(),
        connections: state.registry.connection_count(),
    })
    .into_response()
}

/// Mount the status routes.
///
/// Upgrade requests on these paths still join the channel of the same name,
/// so no path is reserved from the relay.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root_status))
        .route("/ping", get(ping))
        .route("/health", get(health_check))
}
