//! Topic-keyed pub/sub over persistent client connections (§4.C).

use std::collections::HashMap;
use std::sync::Mutex;

use serde::Serialize;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Tracing target for broadcast-hub membership and delivery events.
pub const TRACING_TARGET: &str = "webmacs_server::broadcast";

/// A registered client: an outbound channel to its connection task, keyed
/// by a connection id for removal.
#[derive(Clone)]
pub struct Connection {
    id: Uuid,
    sender: mpsc::UnboundedSender<String>,
}

impl Connection {
    pub fn new(sender: mpsc::UnboundedSender<String>) -> Self {
        Self { id: Uuid::new_v4(), sender }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
}

/// The process-wide broadcast hub: one mutex guarding all topic membership
/// (§4.C concurrency model — membership mutations are serialized, broadcast
/// snapshots members under the lock then sends outside it).
#[derive(Default)]
pub struct BroadcastHub {
    topics: Mutex<HashMap<String, Vec<Connection>>>,
}

impl BroadcastHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a client under a topic after the protocol handshake.
    pub fn attach(&self, topic: &str, conn: Connection) {
        let mut topics = self.topics.lock().unwrap();
        topics.entry(topic.to_string()).or_default().push(conn);
    }

    /// Removes a client from a topic.
    pub fn detach(&self, topic: &str, conn_id: Uuid) {
        let mut topics = self.topics.lock().unwrap();
        if let Some(members) = topics.get_mut(topic) {
            members.retain(|c| c.id() != conn_id);
        }
    }

    /// Serializes `payload` once, sends to every current member of `topic`,
    /// and prunes members whose send failed (their receiver dropped).
    ///
    /// No ordering is guaranteed between this call and a concurrent
    /// attach/detach — only that members observed in the snapshot were
    /// members at some instant during the call (§4.C).
    pub fn broadcast<T: Serialize>(&self, topic: &str, payload: &T) {
        let text = match serde_json::to_string(payload) {
            Ok(text) => text,
            Err(err) => {
                tracing::error!(target: TRACING_TARGET, topic, error = %err, "failed to serialize broadcast payload");
                return;
            }
        };

        let snapshot = {
            let topics = self.topics.lock().unwrap();
            topics.get(topic).cloned().unwrap_or_default()
        };

        let mut failed = Vec::new();
        for member in &snapshot {
            if member.sender.send(text.clone()).is_err() {
                failed.push(member.id());
            }
        }

        if !failed.is_empty() {
            let mut topics = self.topics.lock().unwrap();
            if let Some(members) = topics.get_mut(topic) {
                members.retain(|c| !failed.contains(&c.id()));
            }
        }
    }

    #[cfg(test)]
    fn member_count(&self, topic: &str) -> usize {
        self.topics.lock().unwrap().get(topic).map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_and_detach_update_membership() {
        let hub = BroadcastHub::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let conn = Connection::new(tx);
        let id = conn.id();

        hub.attach("frontend", conn);
        assert_eq!(hub.member_count("frontend"), 1);

        hub.detach("frontend", id);
        assert_eq!(hub.member_count("frontend"), 0);
    }

    #[test]
    fn broadcast_prunes_dropped_receivers() {
        let hub = BroadcastHub::new();
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        hub.attach("frontend", Connection::new(tx));
        assert_eq!(hub.member_count("frontend"), 1);

        hub.broadcast("frontend", &serde_json::json!({"type": "pong"}));
        assert_eq!(hub.member_count("frontend"), 0);
    }

    #[test]
    fn broadcast_reaches_every_live_member() {
        let hub = BroadcastHub::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        hub.attach("controller", Connection::new(tx1));
        hub.attach("controller", Connection::new(tx2));

        hub.broadcast("controller", &serde_json::json!({"type": "connected"}));

        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_ok());
    }

    #[test]
    fn broadcast_to_unknown_topic_is_a_noop() {
        let hub = BroadcastHub::new();
        hub.broadcast("nobody-subscribed", &serde_json::json!({"type": "pong"}));
    }
}
