//! Canonical event types and payload shape (spec §6.2).

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::models::Office;

/// The distinct real-time event kinds a `queue-updated` payload may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventType {
    QueueAdded,
    NextCalled,
    NoMoreQueues,
    QueueRecalled,
    PreviousRecalled,
    QueueSkipped,
    QueueTransferred,
    QueueRequeuedAll,
    QueueRequeuedSelected,
    QueueStatusUpdated,
    WindowStatusUpdated,
    FaqUpdated,
    ForceLogout,
}

/// One event broadcast on the bus. `data` carries the ticket-facing
/// fields the receiving room needs (spec §6.2: "minimally `{type,
/// office, windowId?, data}`").
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub event_type: EventType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub office: Option<Office>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "windowId")]
    pub window_id: Option<Uuid>,
    pub data: Value,
}

impl Event {
    pub fn new(event_type: EventType, office: Option<Office>, window_id: Option<Uuid>, data: Value) -> Self {
        Self {
            event_type,
            office,
            window_id,
            data,
        }
    }
}

/// Well-known room names (spec §4.7, §6.2).
pub mod rooms {
    use crate::models::Office;

    pub fn admin(office: Office) -> String {
        format!("admin-{}", office.as_str())
    }

    pub const KIOSK: &str = "kiosk";

    pub fn queue(ticket_id: uuid::Uuid) -> String {
        format!("queue-{}", ticket_id)
    }

    pub const ADMIN_SHARED_FAQ: &str = "admin-shared-faq";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_serializes_kebab_case() {
        let json = serde_json::to_string(&EventType::NoMoreQueues).unwrap();
        assert_eq!(json, "\"no-more-queues\"");
    }

    #[test]
    fn test_room_names() {
        assert_eq!(rooms::admin(Office::Registrar), "admin-registrar");
        assert_eq!(rooms::KIOSK, "kiosk");
        let id = Uuid::new_v4();
        assert_eq!(rooms::queue(id), format!("queue-{}", id));
    }

    #[test]
    fn test_event_serialization_omits_absent_fields() {
        let event = Event::new(EventType::QueueAdded, Some(Office::Registrar), None, serde_json::json!({}));
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"queue-added\""));
        assert!(!json.contains("windowId"));
    }
}
