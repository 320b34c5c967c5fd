//! Principal model: a minimal admin login, scoped to one office.
//!
//! Full identity and RBAC are out of scope for this service (the
//! dispatcher expects to receive an already-resolved principal); this
//! is the thinnest credential that can produce one, kept in the
//! teacher's PIN-hash shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Office;

/// An admin login, scoped to the office whose windows it may operate.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Principal {
    pub principal_id: Uuid,
    pub office: Office,
    pub display_name: String,
    #[serde(skip_serializing)]
    pub pin_hash: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// The resolved identity the dispatcher sees on every admin command:
/// an opaque principal id plus its office (spec §9: `processedBy` is
/// an opaque identifier; RBAC resolution happened upstream).
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedPrincipal {
    pub principal_id: Uuid,
    pub office: Office,
}

impl AuthenticatedPrincipal {
    /// The opaque string stored in `ticket.processed_by`.
    pub fn as_processed_by(&self) -> String {
        self.principal_id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_hash_not_serialized() {
        let p = Principal {
            principal_id: Uuid::new_v4(),
            office: Office::Registrar,
            display_name: "Window Clerk".to_string(),
            pin_hash: "secret-hash".to_string(),
            is_active: true,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&p).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(!json.contains("pin_hash"));
    }

    #[test]
    fn test_processed_by_is_opaque_id() {
        let id = Uuid::new_v4();
        let principal = AuthenticatedPrincipal {
            principal_id: id,
            office: Office::Admissions,
        };
        assert_eq!(principal.as_processed_by(), id.to_string());
    }
}
