//! In-process registry of live feed channels.
//!
//! Tracks one entry per connected client: the sender half of its outbound
//! frame channel plus metadata (optional authenticated user, connect time,
//! last-delivered reading id). Entries are removed on disconnect or on the
//! first failed write -- a send error means the receiving task is gone.

use std::collections::HashMap;

use tokio::sync::{mpsc, RwLock};
use urbansense_core::types::{DbId, Timestamp};

/// Sender half for pushing serialized frames to one connection.
pub type FrameSender = mpsc::UnboundedSender<String>;

/// Metadata for a single feed connection.
pub struct FeedChannel {
    /// Authenticated user id, when the client presented a valid token.
    pub user_id: Option<DbId>,
    /// Channel sender for outbound frames.
    sender: FrameSender,
    /// When this connection was established.
    pub connected_at: Timestamp,
    /// Highest reading id delivered to this channel. Monotonic once
    /// connected; initialized to the shared cursor at registration.
    pub last_delivered_id: DbId,
}

/// Tracks all active feed connections.
///
/// Thread-safe via interior `RwLock`; designed to be owned by the
/// [`Broadcaster`](crate::Broadcaster) and shared behind `Arc`.
pub struct ChannelRegistry {
    channels: RwLock<HashMap<String, FeedChannel>>,
}

impl ChannelRegistry {
    /// Create a new, empty registry.
    pub fn new() -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new connection whose delivery position starts at `cursor`.
    ///
    /// Returns the receiver half of the frame channel so the caller can
    /// forward frames to the transport.
    pub async fn add(
        &self,
        conn_id: String,
        user_id: Option<DbId>,
        cursor: DbId,
    ) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        let channel = FeedChannel {
            user_id,
            sender: tx,
            connected_at: chrono::Utc::now(),
            last_delivered_id: cursor,
        };
        self.channels.write().await.insert(conn_id, channel);
        rx
    }

    /// Remove a connection by its id.
    pub async fn remove(&self, conn_id: &str) {
        self.channels.write().await.remove(conn_id);
    }

    /// The current number of open channels.
    pub async fn count(&self) -> usize {
        self.channels.read().await.len()
    }

    /// Send a frame to a single connection.
    ///
    /// On write failure the entry is removed immediately and `false` is
    /// returned.
    pub async fn send_to(&self, conn_id: &str, frame: &str) -> bool {
        let mut channels = self.channels.write().await;
        let Some(channel) = channels.get(conn_id) else {
            return false;
        };
        if channel.sender.send(frame.to_string()).is_err() {
            channels.remove(conn_id);
            tracing::debug!(conn_id = %conn_id, "Feed channel gone, removed on write failure");
            return false;
        }
        true
    }

    /// Broadcast a frame to every open channel.
    ///
    /// Channels whose send fails are treated as disconnected and removed.
    /// When `delivered_id` is set, each surviving channel's
    /// `last_delivered_id` advances to it (never backwards). Returns the
    /// number of channels the frame reached.
    pub async fn broadcast(&self, frame: &str, delivered_id: Option<DbId>) -> usize {
        let mut channels = self.channels.write().await;
        let mut failed: Vec<String> = Vec::new();

        for (conn_id, channel) in channels.iter_mut() {
            if channel.sender.send(frame.to_string()).is_err() {
                failed.push(conn_id.clone());
                continue;
            }
            if let Some(id) = delivered_id {
                channel.last_delivered_id = channel.last_delivered_id.max(id);
            }
        }

        for conn_id in &failed {
            channels.remove(conn_id);
            tracing::debug!(conn_id = %conn_id, "Feed channel gone, removed during broadcast");
        }

        channels.len()
    }

    /// The last-delivered reading id for a connection, if it is still open.
    pub async fn last_delivered(&self, conn_id: &str) -> Option<DbId> {
        self.channels
            .read()
            .await
            .get(conn_id)
            .map(|c| c.last_delivered_id)
    }

    /// Drop every channel. Receivers observe the closed channel and their
    /// transport streams end.
    pub async fn shutdown_all(&self) {
        let mut channels = self.channels.write().await;
        let count = channels.len();
        channels.clear();
        tracing::info!(count, "Closed all feed channels");
    }
}

impl Default for ChannelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn new_registry_has_zero_channels() {
        let registry = ChannelRegistry::new();
        assert_eq!(registry.count().await, 0);
    }

    #[tokio::test]
    async fn add_and_remove_track_count() {
        let registry = ChannelRegistry::new();

        let _rx1 = registry.add("conn-1".to_string(), None, 0).await;
        let _rx2 = registry.add("conn-2".to_string(), Some(7), 0).await;
        assert_eq!(registry.count().await, 2);

        registry.remove("conn-1").await;
        assert_eq!(registry.count().await, 1);

        // Removing an unknown id is a no-op.
        registry.remove("nonexistent").await;
        assert_eq!(registry.count().await, 1);
    }

    #[tokio::test]
    async fn broadcast_reaches_all_channels() {
        let registry = ChannelRegistry::new();

        let mut rx1 = registry.add("conn-1".to_string(), None, 0).await;
        let mut rx2 = registry.add("conn-2".to_string(), None, 0).await;

        let reached = registry.broadcast("frame-1", None).await;
        assert_eq!(reached, 2);

        assert_eq!(rx1.recv().await.as_deref(), Some("frame-1"));
        assert_eq!(rx2.recv().await.as_deref(), Some("frame-1"));
    }

    #[tokio::test]
    async fn broadcast_drops_failed_channels() {
        let registry = ChannelRegistry::new();

        let rx1 = registry.add("conn-1".to_string(), None, 0).await;
        let mut rx2 = registry.add("conn-2".to_string(), None, 0).await;

        // Drop rx1: its channel is closed, so the next broadcast must
        // remove it.
        drop(rx1);

        let reached = registry.broadcast("still alive", None).await;
        assert_eq!(reached, 1);
        assert_eq!(registry.count().await, 1);
        assert_eq!(rx2.recv().await.as_deref(), Some("still alive"));
    }

    #[tokio::test]
    async fn delivery_advances_last_delivered_id() {
        let registry = ChannelRegistry::new();

        // Channel joins with the cursor at 500.
        let _rx = registry.add("conn-1".to_string(), None, 500).await;
        assert_eq!(registry.last_delivered("conn-1").await, Some(500));

        // Reading 501 is delivered within the next tick.
        registry.broadcast("batch", Some(501)).await;
        assert_eq!(registry.last_delivered("conn-1").await, Some(501));
    }

    #[tokio::test]
    async fn last_delivered_id_never_moves_backwards() {
        let registry = ChannelRegistry::new();

        let _rx = registry.add("conn-1".to_string(), None, 510).await;
        registry.broadcast("late frame", Some(505)).await;
        assert_eq!(registry.last_delivered("conn-1").await, Some(510));
    }

    #[tokio::test]
    async fn send_to_missing_channel_returns_false() {
        let registry = ChannelRegistry::new();
        assert!(!registry.send_to("ghost", "frame").await);
    }

    #[tokio::test]
    async fn send_to_dropped_receiver_removes_entry() {
        let registry = ChannelRegistry::new();

        let rx = registry.add("conn-1".to_string(), None, 0).await;
        drop(rx);

        assert!(!registry.send_to("conn-1", "frame").await);
        assert_eq!(registry.count().await, 0);
    }

    #[tokio::test]
    async fn shutdown_all_clears_and_closes() {
        let registry = ChannelRegistry::new();

        let mut rx = registry.add("conn-1".to_string(), None, 0).await;
        registry.shutdown_all().await;

        assert_eq!(registry.count().await, 0);
        // Sender dropped: the receiver stream ends.
        assert!(rx.recv().await.is_none());
    }
}
