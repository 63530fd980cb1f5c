//! Per-session fan-out of seat availability.

use std::collections::BTreeMap;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::broadcast;

/// Available seats per course id, as pushed to enrollment clients.
///
/// Serializes to a flat JSON object: `{"CS101": 12, "MA201": 0}`.
pub type SeatSnapshot = BTreeMap<String, u32>;

/// A thread-safe registry of broadcast channels keyed by session name.
#[derive(Clone)]
pub struct SessionHub {
    channels: Arc<DashMap<String, broadcast::Sender<SeatSnapshot>>>,
    capacity: usize,
}

impl SessionHub {
    /// Create a hub whose channels buffer `capacity` snapshots each.
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: Arc::new(DashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Subscribe to a session, creating its channel on first use.
    pub fn subscribe(&self, session: &str) -> broadcast::Receiver<SeatSnapshot> {
        self.channels
            .entry(session.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Publish a snapshot to a session, returning how many sockets got it.
    pub fn publish(&self, session: &str, snapshot: SeatSnapshot) -> usize {
        let delivered = match self.channels.get(session) {
            Some(tx) => tx.send(snapshot).unwrap_or(0),
            None => return 0,
        };

        if delivered == 0 {
            self.channels.remove_if(session, |_, tx| tx.receiver_count() == 0);
        }

        tracing::debug!(session = %session, receivers = delivered, "Published seat snapshot");
        delivered
    }

    /// Number of live subscribers on a session.
    pub fn subscriber_count(&self, session: &str) -> usize {
        self.channels
            .get(session)
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }

    /// Number of sessions with a channel.
    pub fn session_count(&self) -> usize {
        self.channels.len()
    }

    /// Drop channels nobody listens to any more.
    pub fn prune(&self) {
        self.channels.retain(|_, tx| tx.receiver_count() > 0);
    }
}

impl Default for SessionHub {
    fn default() -> Self {
        Self::new(16)
    }
}
