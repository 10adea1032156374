#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use futures::StreamExt;
use http_body_util::BodyExt;
use relay_core::channel::ChannelId;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tower::ServiceExt;

use relay_api::config::ServerConfig;
use relay_api::router::build_app_router;
use relay_api::state::AppState;
use relay_api::ws::ChannelRegistry;

pub type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Build a test `ServerConfig` with safe defaults and the heartbeat off.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        request_timeout_secs: 30,
        heartbeat_interval_secs: 0,
        shutdown_timeout_secs: 1,
    }
}

/// Build the full application router, returning the registry behind it.
pub fn build_test_app() -> (Router, Arc<ChannelRegistry>) {
    let state = AppState::new(test_config());
    let registry = Arc::clone(&state.registry);
    (build_app_router(state), registry)
}

/// Serve the app on an ephemeral port.
pub async fn spawn_server() -> (SocketAddr, Arc<ChannelRegistry>) {
    spawn_server_with(test_config()).await
}

/// Serve the app with `config` on an ephemeral port.
pub async fn spawn_server_with(config: ServerConfig) -> (SocketAddr, Arc<ChannelRegistry>) {
    let state = AppState::new(config);
    let registry = Arc::clone(&state.registry);
    let app = build_app_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, registry)
}

/// Open a relay connection to `path`.
pub async fn connect(addr: SocketAddr, path: &str) -> Client {
    let (client, _) = tokio_tungstenite::connect_async(format!("ws://{addr}{path}"))
        .await
        .expect("WebSocket handshake failed");
    client
}

/// Wait until `channel` has exactly `count` members.
///
/// The server joins a socket after the handshake response has been sent,
/// so a freshly connected client may not be a member yet.
pub async fn wait_for_members(registry: &ChannelRegistry, channel: &str, count: usize) {
    let channel = ChannelId::from_request_target(channel);
    tokio::time::timeout(Duration::from_secs(5), async {
        while registry.member_count(&channel) != count {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("{channel} never reached {count} members"));
}

/// Next data frame, skipping control frames, or `None` if nothing arrives
/// within a short window.
pub async fn next_frame(client: &mut Client) -> Option<Message> {
    loop {
        match tokio::time::timeout(Duration::from_millis(300), client.next()).await {
            Ok(Some(Ok(msg @ (Message::Binary(_) | Message::Text(_))))) => return Some(msg),
            Ok(Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_)))) => continue,
            _ => return None,
        }
    }
}

/// Issue a GET request against the router.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body as a string.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
