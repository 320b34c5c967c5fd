//! Session model for principal-based authentication.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A session stored in the database, linking a token to a principal.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AdminSession {
    pub session_id: Uuid,
    pub principal_id: Uuid,
    /// Cryptographically random session token (256-bit, base64url encoded)
    pub session_token: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
}

impl AdminSession {
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

/// Data needed to create a new session.
pub struct CreateAdminSession {
    pub principal_id: Uuid,
    pub session_token: String,
    pub duration_minutes: i64,
}

/// Response returned when a session is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminSessionResponse {
    pub session_token: String,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_not_expired() {
        let session = AdminSession {
            session_id: Uuid::new_v4(),
            principal_id: Uuid::new_v4(),
            session_token: "test_token".to_string(),
            created_at: Utc::now(),
            expires_at: Utc::now() + chrono::Duration::minutes(30),
            last_activity_at: Utc::now(),
        };
        assert!(!session.is_expired());
    }

    #[test]
    fn test_session_expired() {
        let session = AdminSession {
            session_id: Uuid::new_v4(),
            principal_id: Uuid::new_v4(),
            session_token: "test_token".to_string(),
            created_at: Utc::now() - chrono::Duration::hours(1),
            expires_at: Utc::now() - chrono::Duration::minutes(30),
            last_activity_at: Utc::now() - chrono::Duration::hours(1),
        };
        assert!(session.is_expired());
    }

    #[test]
    fn test_admin_session_response_serialization() {
        let response = AdminSessionResponse {
            session_token: "test_token_abc123".to_string(),
            expires_at: Utc::now(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"session_token\":\"test_token_abc123\""));
        assert!(json.contains("\"expires_at\":"));
    }
}
