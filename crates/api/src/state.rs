use std::sync::Arc;

use tokio_util::task::TaskTracker;

use crate::config::ServerConfig;
use crate::ws::ChannelRegistry;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Channel membership for every live relay connection.
    pub registry: Arc<ChannelRegistry>,
    /// Tracks relay connection tasks so shutdown can wait for them.
    pub connections: TaskTracker,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
            registry: Arc::new(ChannelRegistry::new()),
            connections: TaskTracker::new(),
        }
    }
}
