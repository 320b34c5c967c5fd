//! Service model: a named transaction type offered by one office.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Office;

/// A service offered by a single office (e.g. "Transcript", "Enroll",
/// "Document Claim", "Document Request").
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Service {
    pub service_id: Uuid,
    pub office: Office,
    pub name: String,
    pub active: bool,
    /// Hidden from public listings when true.
    pub special_request: bool,
}

/// Input for creating a service.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateService {
    pub office: Office,
    pub name: String,
    pub special_request: bool,
}

/// The well-known service names that drive distinct admit paths.
pub const SERVICE_ENROLL: &str = "Enroll";
pub const SERVICE_DOCUMENT_CLAIM: &str = "Document Claim";
pub const SERVICE_DOCUMENT_REQUEST: &str = "Document Request";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_serialization() {
        let service = Service {
            service_id: Uuid::new_v4(),
            office: Office::Registrar,
            name: "Transcript".to_string(),
            active: true,
            special_request: false,
        };
        let json = serde_json::to_string(&service).unwrap();
        assert!(json.contains("\"name\":\"Transcript\""));
        assert!(json.contains("\"office\":\"registrar\""));
    }
}
