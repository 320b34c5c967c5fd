//! Ticket model and related types.
//!
//! A ticket is one customer's queued presence at an office, from admit
//! through completion (or skip/cancel/no-show).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Type;
use uuid::Uuid;

use super::Office;

/// Ticket status enum matching the database type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "ticket_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Waiting,
    Serving,
    Completed,
    Skipped,
    Cancelled,
    NoShow,
}

impl TicketStatus {
    /// Terminal statuses never change again.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TicketStatus::Completed | TicketStatus::Cancelled | TicketStatus::NoShow
        )
    }
}

/// Customer role, set at admit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "customer_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CustomerRole {
    Visitor,
    Student,
    Teacher,
    Alumni,
}

/// Student status, required on the `Enroll` admit path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "student_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StudentStatus {
    IncomingNew,
    Continuing,
}

/// Full ticket entity with all fields.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Ticket {
    pub ticket_id: Uuid,
    pub office: Office,
    /// 1..99, per-office daily sequence.
    pub number: i32,
    pub transaction_no: Option<String>,

    pub service_id: Uuid,
    pub window_id: Uuid,

    pub role: CustomerRole,
    pub student_status: Option<StudentStatus>,
    pub priority: bool,

    pub customer_form_id: Option<Uuid>,

    pub status: TicketStatus,
    pub currently_serving: bool,

    pub queued_at: DateTime<Utc>,
    pub called_at: Option<DateTime<Utc>>,
    pub served_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub skipped_at: Option<DateTime<Utc>>,

    pub rating: Option<i16>,
    pub remarks: Option<String>,
    pub processed_by: Option<String>,
}

impl Ticket {
    /// Invariant I2: `currently_serving` and `status=serving` always agree.
    pub fn is_consistent(&self) -> bool {
        self.currently_serving == matches!(self.status, TicketStatus::Serving)
    }
}

/// Display name for a ticket in admin/kiosk views (spec §4.6.1, §9).
///
/// Precedence: the linked customer form's name, else the special-path
/// placeholders for `Enroll` (which never has a form), else a generic
/// anonymous placeholder for any other formless ticket.
pub fn display_name(form_name: Option<&str>, service_name: &str, office: Office) -> String {
    if let Some(name) = form_name {
        return name.to_string();
    }
    if service_name == super::service::SERVICE_ENROLL {
        return match office {
            Office::Registrar => "Enrollee".to_string(),
            Office::Admissions => "New Student".to_string(),
        };
    }
    "Anonymous Customer".to_string()
}

/// Input for admitting a new ticket (spec §4.6.1 Effects).
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub office: Office,
    pub number: i32,
    pub transaction_no: Option<String>,
    pub service_id: Uuid,
    pub window_id: Uuid,
    pub role: CustomerRole,
    pub student_status: Option<StudentStatus>,
    pub priority: bool,
    pub customer_form_id: Option<Uuid>,
}

/// Filters for listing tickets (admin views, lookups).
#[derive(Debug, Clone, Default)]
pub struct TicketFilters {
    pub office: Option<Office>,
    pub window_id: Option<Uuid>,
    pub statuses: Option<Vec<TicketStatus>>,
    pub service_ids: Option<Vec<Uuid>>,
    pub priority: Option<bool>,
    pub queued_after: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
