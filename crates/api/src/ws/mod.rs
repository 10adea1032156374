//! WebSocket relay.
//!
//! Provides the channel registry, the upgrade handler that joins sockets to
//! their channel and fans frames out, and the heartbeat task.

mod handler;
mod heartbeat;
pub mod registry;

pub use handler::{relay_fallback, upgrade};
pub use heartbeat::start_heartbeat;
pub use registry::{ChannelRegistry, WsSender};
