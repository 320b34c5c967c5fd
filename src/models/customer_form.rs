//! Customer form model.
//!
//! Captured on admit paths that collect contact details (everything
//! except `Enroll`). Owned by the ticket that references it; the form
//! never points back at the ticket.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Contact details collected at admit time.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CustomerForm {
    pub customer_form_id: Uuid,
    pub name: String,
    pub contact: String,
    pub email: String,
    pub address: Option<String>,
    /// Recorded only when the ticket is a priority ticket.
    pub id_number: Option<String>,
}

/// Input for creating a customer form at admit time.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerForm {
    pub name: String,
    pub contact: String,
    pub email: String,
    pub address: Option<String>,
    pub id_number: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_customer_form_deserialize() {
        let json = r#"{"name":"Jane","contact":"555-1000","email":"jane@example.com","address":null,"idNumber":null}"#;
        let form: CreateCustomerForm = serde_json::from_str(json).unwrap();
        assert_eq!(form.name, "Jane");
        assert!(form.address.is_none());
    }
}
