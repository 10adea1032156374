use std::sync::Arc;
use std::time::Duration;

use crate::ws::registry::ChannelRegistry;

/// Spawn a background task that sends periodic Ping frames to every relay
/// connection.
///
/// Pings only keep idle connections alive; nothing is evicted for missing a
/// pong. The returned `JoinHandle` is aborted during shutdown.
pub fn start_heartbeat(
    registry: Arc<ChannelRegistry>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(interval);
        // The first tick completes immediately; nobody needs a ping at startup.
        interval.tick().await;

        loop {
            interval.tick().await;
            tracing::debug!(
                channels = registry.channel_count(),
                connections = registry.connection_count(),
                "WebSocket heartbeat ping",
            );
            registry.ping_all();
        }
    })
}
