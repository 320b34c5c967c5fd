//! Document Request model.
//!
//! The dispatcher only reads these: they are approved out-of-band by a
//! records office, then claimed at a kiosk via the `Document Claim`
//! admit path by matching `transaction_no`.

use serde::{Deserialize, Serialize};
use sqlx::Type;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "document_request_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DocumentRequestStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DocumentRequest {
    pub document_request_id: Uuid,
    /// Two letters, six digits, dash, three digits — stored uppercased.
    pub transaction_no: String,
    pub name: String,
    pub contact: String,
    pub email: String,
    pub request_items: Vec<String>,
    pub status: DocumentRequestStatus,
}

/// Input for the `Document Request` non-queuing admit path: creates
/// only this record and returns its `transaction_no`; no ticket.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentRequest {
    pub name: String,
    pub contact: String,
    pub email: String,
    pub request_items: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_request_status_serialization() {
        let json = serde_json::to_string(&DocumentRequestStatus::Approved).unwrap();
        assert_eq!(json, "\"approved\"");
    }
}
