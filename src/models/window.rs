//! Window model: a staffed service point within an office.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Office;

/// The reserved window name that routes only priority tickets.
pub const PRIORITY_WINDOW_NAME: &str = "Priority";

/// A staffed service point. `(office, name)` is unique.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Window {
    pub window_id: Uuid,
    pub office: Office,
    pub name: String,
    /// Services this window accepts tickets for.
    pub service_ids: Vec<Uuid>,
    /// Whether this window currently accepts routing.
    pub is_open: bool,
    /// Whether `next` may advance this window. Purely advisory.
    pub is_serving: bool,
}

impl Window {
    /// Whether this window only serves priority tickets.
    pub fn is_priority_window(&self) -> bool {
        self.name == PRIORITY_WINDOW_NAME
    }

    /// Whether this window accepts routing at all right now.
    pub fn accepts_next(&self) -> bool {
        self.is_open && self.is_serving
    }
}

/// Input for creating a window.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWindow {
    pub office: Office,
    pub name: String,
    pub service_ids: Vec<Uuid>,
}

/// Partial update for a window's configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateWindow {
    pub name: Option<String>,
    pub service_ids: Option<Vec<Uuid>>,
    pub is_open: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(name: &str) -> Window {
        Window {
            window_id: Uuid::new_v4(),
            office: Office::Registrar,
            name: name.to_string(),
            service_ids: vec![],
            is_open: true,
            is_serving: true,
        }
    }

    #[test]
    fn test_is_priority_window() {
        assert!(sample("Priority").is_priority_window());
        assert!(!sample("Window 1").is_priority_window());
    }

    #[test]
    fn test_accepts_next_requires_both_flags() {
        let mut w = sample("Window 1");
        assert!(w.accepts_next());
        w.is_serving = false;
        assert!(!w.accepts_next());
        w.is_serving = true;
        w.is_open = false;
        assert!(!w.accepts_next());
    }
}
