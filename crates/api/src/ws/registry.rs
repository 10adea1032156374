use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::ws::Message;
use dashmap::DashMap;
use relay_core::channel::ChannelId;
use relay_core::types::ConnId;
use tokio::sync::mpsc;

/// Channel sender half for pushing messages to a WebSocket connection.
pub type WsSender = mpsc::UnboundedSender<Message>;

/// Members of a single channel, keyed by connection.
type Members = HashMap<ConnId, WsSender>;

/// Maps each live channel to its members.
///
/// A channel is present exactly while it has at least one member. Every
/// operation on one channel runs under the lock of the shard holding that
/// channel, so a join can never race with the delete triggered by the last
/// leave. Locking is per shard, not per channel: two channels hashed to the
/// same shard briefly serialize on join and leave. The critical sections
/// never await or do I/O. Designed to be wrapped in `Arc` and shared across
/// the application.
pub struct ChannelRegistry {
    channels: DashMap<ChannelId, Members>,
}

impl ChannelRegistry {
    /// Create a new, empty registry.
    pub fn new() -> Self {
        Self {
            channels: DashMap::new(),
        }
    }

    /// Add a connection to a channel, creating the channel if needed.
    ///
    /// Joining twice with the same `conn_id` replaces the stored sender
    /// rather than adding a second member. Returns the member count after
    /// the join.
    pub fn join(&self, channel: &ChannelId, conn_id: ConnId, sender: WsSender) -> usize {
        let mut members = self.channels.entry(channel.clone()).or_default();
        members.insert(conn_id, sender);
        members.len()
    }

    /// Remove a connection from a channel.
    ///
    /// A no-op if the connection or channel is unknown. When the last
    /// member leaves, the channel is deleted before the entry lock is
    /// released. Returns the number of members left.
    pub fn leave(&self, channel: &ChannelId, conn_id: ConnId) -> usize {
        let mut remaining = 0;
        let deleted = self.channels.remove_if_mut(channel, |_, members| {
            members.remove(&conn_id);
            remaining = members.len();
            members.is_empty()
        });

        if deleted.is_some() {
            tracing::info!(channel = %channel, "No more clients, channel deleted");
        }
        remaining
    }

    /// Snapshot of the connections currently in a channel (empty if the
    /// channel does not exist).
    pub fn members(&self, channel: &ChannelId) -> Vec<ConnId> {
        self.channels
            .get(channel)
            .map(|members| members.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Number of members in a channel (zero if it does not exist).
    pub fn member_count(&self, channel: &ChannelId) -> usize {
        self.channels.get(channel).map_or(0, |members| members.len())
    }

    /// Send `message` to every member of `channel` except `from`.
    ///
    /// Members whose connection has already gone away are skipped, and a
    /// failed send to one member does not stop delivery to the rest.
    /// Returns the number of members the message was handed to.
    pub fn broadcast(&self, channel: &ChannelId, from: ConnId, message: &Message) -> usize {
        let Some(members) = self.channels.get(channel) else {
            return 0;
        };

        members
            .iter()
            .filter(|(id, sender)| **id != from && !sender.is_closed())
            .filter(|(_, sender)| sender.send(message.clone()).is_ok())
            .count()
    }

    /// Return the current number of live channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Return the current number of connections across all channels.
    pub fn connection_count(&self) -> usize {
        self.channels.iter().map(|entry| entry.value().len()).sum()
    }

    /// Send a Ping frame to every connection.
    ///
    /// Used by the heartbeat task to keep idle connections alive through
    /// intermediaries.
    pub fn ping_all(&self) {
        for entry in self.channels.iter() {
            for sender in entry.value().values() {
                let _ = sender.send(Message::Ping(Bytes::new()));
            }
        }
    }

    /// Send a Close frame to every connection, then drop all channels.
    ///
    /// Used during graceful shutdown to notify all clients before the
    /// process exits.
    pub fn shutdown_all(&self) {
        let mut count = 0;
        for entry in self.channels.iter() {
            for sender in entry.value().values() {
                let _ = sender.send(Message::Close(None));
                count += 1;
            }
        }
        self.channels.clear();
        tracing::info!(count, "Closed all relay connections");
    }
}

impl Default for ChannelRegistry {
    fn default() -> Self {
        Self::new()
    }
}
