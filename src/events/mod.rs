//! Event Bus / Fan-out (C7): in-process pub/sub over named rooms
//! (spec §4.7). Not durable — events are delivered only to subscribers
//! present at emit time.

pub mod types;
pub mod ws;

use std::collections::{HashMap, HashSet};

use dashmap::DashMap;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

pub use types::{rooms, Event, EventType};
pub use ws::ws_handler;

/// Bounded per-room channel capacity. Bus is "bounded, drop on overflow,
/// best-effort" (spec §5) — `broadcast`'s native lag-drop behavior
/// satisfies this without extra bookkeeping.
const ROOM_CAPACITY: usize = 256;

/// Session id, as issued by `AdminSessionRepository::generate_token`.
type SessionId = String;

pub struct EventBus {
    rooms: DashMap<String, broadcast::Sender<Event>>,
    /// `principal_id -> {session_token}`, for targeted force-logout
    /// (spec §4.7, §9: explicit init/teardown, not ambient global state).
    sessions: RwLock<HashMap<Uuid, HashSet<SessionId>>>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            rooms: DashMap::new(),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    fn sender_for(&self, room: &str) -> broadcast::Sender<Event> {
        self.rooms
            .entry(room.to_string())
            .or_insert_with(|| broadcast::channel(ROOM_CAPACITY).0)
            .clone()
    }

    /// Subscribe to `room`, creating it if it doesn't exist yet.
    pub fn subscribe(&self, room: &str) -> broadcast::Receiver<Event> {
        self.sender_for(room).subscribe()
    }

    /// Publish `event` to `room`. An emission failure (no subscribers)
    /// is not an error: spec §5 "an emit failure must not roll back
    /// state" — the publishing transaction has already committed.
    pub fn publish(&self, room: &str, event: Event) {
        let sender = self.sender_for(room);
        if sender.send(event).is_err() {
            tracing::debug!(room, "event published with no active subscribers");
        }
    }

    /// Register `session_token` as belonging to `principal_id` (called
    /// on login).
    pub async fn register_session(&self, principal_id: Uuid, session_token: SessionId) {
        let mut sessions = self.sessions.write().await;
        sessions.entry(principal_id).or_default().insert(session_token);
    }

    /// Remove `session_token` from `principal_id`'s set (called on
    /// logout or expiry).
    pub async fn unregister_session(&self, principal_id: Uuid, session_token: &str) {
        let mut sessions = self.sessions.write().await;
        if let Some(set) = sessions.get_mut(&principal_id) {
            set.remove(session_token);
            if set.is_empty() {
                sessions.remove(&principal_id);
            }
        }
    }

    /// Broadcast `force-logout` to every session of `principal_id` by
    /// publishing on each session's dedicated room, then drop the
    /// tracking entry.
    pub async fn force_logout(&self, principal_id: Uuid) {
        let session_tokens: Vec<SessionId> = {
            let sessions = self.sessions.read().await;
            sessions.get(&principal_id).cloned().unwrap_or_default().into_iter().collect()
        };

        for token in &session_tokens {
            self.publish(
                &format!("session-{}", token),
                Event::new(
                    EventType::ForceLogout,
                    None,
                    None,
                    serde_json::json!({ "principalId": principal_id }),
                ),
            );
        }

        let mut sessions = self.sessions.write().await;
        sessions.remove(&principal_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_delivers_to_subscriber() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe("kiosk");
        bus.publish("kiosk", Event::new(EventType::QueueAdded, None, None, serde_json::json!({"n": 1})));

        let event = rx.recv().await.unwrap();
        assert_eq!(event.event_type, EventType::QueueAdded);
    }

    #[tokio::test]
    async fn test_publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::new();
        bus.publish("kiosk", Event::new(EventType::QueueAdded, None, None, serde_json::json!({})));
    }

    #[tokio::test]
    async fn test_force_logout_tracks_and_clears_sessions() {
        let bus = EventBus::new();
        let principal_id = Uuid::new_v4();
        bus.register_session(principal_id, "token-a".to_string()).await;
        bus.register_session(principal_id, "token-b".to_string()).await;

        let mut rx = bus.subscribe("session-token-a");
        bus.force_logout(principal_id).await;

        let event = rx.recv().await.unwrap();
        assert_eq!(event.event_type, EventType::ForceLogout);

        let sessions = bus.sessions.read().await;
        assert!(!sessions.contains_key(&principal_id));
    }
}
