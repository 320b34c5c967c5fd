//! Admit (spec §4.6.1): validate, classify the service path, route,
//! persist, and fan out.

use rand::Rng;
use uuid::Uuid;

use crate::error::AppError;
use crate::events::{rooms, Event, EventType};
use crate::models::{
    CreateCustomerForm, CreateDocumentRequest, CustomerRole, NewTicket, Office, StudentStatus,
    SERVICE_ENROLL,
};
use crate::repositories::{
    CustomerFormRepository, DocumentRequestRepository, TicketRepository,
};
use crate::routing;
use crate::services::NumberingService;
use crate::state::AppState;
use crate::validation::{self, constraints};

use super::AdmitPath;

/// Raw admit input, one flattened shape covering every service path
/// (spec §4.6.1 Inputs); unused fields for a given path are simply
/// ignored by that path's branch.
#[derive(Debug, Clone)]
pub struct AdmitRequest {
    pub office: Office,
    pub service_name: String,
    pub role: CustomerRole,
    pub priority: bool,
    pub student_status: Option<StudentStatus>,
    pub name: Option<String>,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub id_number: Option<String>,
    pub transaction_no: Option<String>,
    pub request_items: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct AdmitResult {
    pub ticket_id: Uuid,
    pub number: i32,
    pub office: Office,
    pub service_name: String,
    pub transaction_no: Option<String>,
    pub window_name: String,
    pub priority: bool,
    pub portal_url: String,
}

#[derive(Debug, Clone)]
pub enum AdmitOutcome {
    Ticket(AdmitResult),
    /// The `Document Request` path is non-queuing: no ticket is produced.
    DocumentRequestOnly { transaction_no: String },
}

pub async fn admit(state: &AppState, req: AdmitRequest) -> Result<AdmitOutcome, AppError> {
    if !state.config.office_enabled(req.office) {
        return Err(AppError::unavailable("Office is not currently accepting admits"));
    }

    let service = validation::validate_service_by_name(&state.pool, req.office, &req.service_name).await?;
    let path = AdmitPath::classify(&req.service_name);

    match path {
        AdmitPath::DocumentRequest => {
            let name = require_name(req.name)?;
            let contact = require_contact(req.contact)?;
            let email = require_email(req.email)?;
            let items = validate_request_items(req.request_items)?;
            let transaction_no = generate_unique_transaction_no(&state.pool).await?;
            DocumentRequestRepository::create(
                &state.pool,
                CreateDocumentRequest {
                    name,
                    contact,
                    email,
                    request_items: items,
                },
                &transaction_no,
            )
            .await?;

            return Ok(AdmitOutcome::DocumentRequestOnly { transaction_no });
        }
        AdmitPath::DocumentClaim => {
            admit_document_claim(state, req, service.service_id).await
        }
        AdmitPath::Enroll => admit_enroll(state, req, service.service_id).await,
        AdmitPath::Regular => admit_regular(state, req, service.service_id).await,
    }
}

async fn admit_enroll(
    state: &AppState,
    req: AdmitRequest,
    service_id: Uuid,
) -> Result<AdmitOutcome, AppError> {
    if req.student_status.is_none() {
        return Err(AppError::validation("studentStatus is required for Enroll"));
    }
    // Customer form is optional on this path (spec §4.6.1); skip creation
    // entirely — display_name() falls back to Enrollee/New Student.
    let transaction_no = generate_unique_transaction_no(&state.pool).await?;
    finish_admit(
        state,
        &req,
        service_id,
        req.student_status,
        None,
        Some(transaction_no),
    )
    .await
}

async fn admit_document_claim(
    state: &AppState,
    req: AdmitRequest,
    service_id: Uuid,
) -> Result<AdmitOutcome, AppError> {
    let raw = req
        .transaction_no
        .as_deref()
        .ok_or_else(|| AppError::validation("transactionNo is required for Document Claim"))?;
    let transaction_no = normalize_transaction_no(raw)?;

    let request = crate::repositories::DocumentRequestRepository::find_by_transaction_no(
        &state.pool,
        &transaction_no,
    )
    .await?
    .ok_or_else(|| AppError::not_found("No Document Request matches this transaction number"))?;

    if request.status != crate::models::DocumentRequestStatus::Approved {
        return Err(AppError::validation("Document Request is not approved"));
    }

    if TicketRepository::has_active_transaction_no(&state.pool, &transaction_no).await? {
        return Err(AppError::conflict(
            "A ticket already holds this transaction number",
        ));
    }

    let mut tx = state.pool.begin().await?;
    let form = CustomerFormRepository::create(
        &mut tx,
        CreateCustomerForm {
            name: request.name.clone(),
            contact: request.contact.clone(),
            email: request.email.clone(),
            address: None,
            id_number: None,
        },
    )
    .await?;
    tx.commit().await?;

    finish_admit(
        state,
        &req,
        service_id,
        None,
        Some(form.customer_form_id),
        Some(transaction_no),
    )
    .await
}

async fn admit_regular(
    state: &AppState,
    req: AdmitRequest,
    service_id: Uuid,
) -> Result<AdmitOutcome, AppError> {
    let name = require_name(req.name.clone())?;
    let contact = require_contact(req.contact.clone())?;
    let email = require_email(req.email.clone())?;
    let address = validation::validate_optional(req.address.as_deref(), "address", constraints::MAX_ADDRESS_LENGTH)?;
    let id_number = if req.priority {
        validation::validate_optional(req.id_number.as_deref(), "idNumber", constraints::MAX_ID_NUMBER_LENGTH)?
    } else {
        None
    };

    let mut tx = state.pool.begin().await?;
    let form = CustomerFormRepository::create(
        &mut tx,
        CreateCustomerForm {
            name,
            contact,
            email,
            address,
            id_number,
        },
    )
    .await?;
    tx.commit().await?;

    let transaction_no = generate_unique_transaction_no(&state.pool).await?;
    finish_admit(
        state,
        &req,
        service_id,
        None,
        Some(form.customer_form_id),
        Some(transaction_no),
    )
    .await
}

/// Shared tail of every ticket-producing admit path: assign the number
/// under the office lock, route to a window, persist, and emit.
async fn finish_admit(
    state: &AppState,
    req: &AdmitRequest,
    service_id: Uuid,
    student_status: Option<StudentStatus>,
    customer_form_id: Option<Uuid>,
    transaction_no: Option<String>,
) -> Result<AdmitOutcome, AppError> {
    let window = routing::select_window(&state.pool, req.office, service_id, req.priority).await?;

    let number = NumberingService::next_locked(&state.pool, &state.locks, &state.tz, req.office).await?;

    let new_ticket = NewTicket {
        office: req.office,
        number,
        transaction_no: transaction_no.clone(),
        service_id,
        window_id: window.window_id,
        role: req.role,
        student_status,
        priority: req.priority,
        customer_form_id,
    };

    let mut tx = state.pool.begin().await?;
    let ticket = TicketRepository::create(&mut tx, new_ticket).await?;
    tx.commit().await?;

    let data = serde_json::json!({
        "ticketId": ticket.ticket_id,
        "number": ticket.number,
        "serviceName": req.service_name,
        "windowId": window.window_id,
        "windowName": window.name,
        "priority": ticket.priority,
    });

    state.events.publish(
        &rooms::admin(req.office),
        Event::new(EventType::QueueAdded, Some(req.office), Some(window.window_id), data.clone()),
    );
    state.events.publish(
        rooms::KIOSK,
        Event::new(EventType::QueueAdded, Some(req.office), Some(window.window_id), data),
    );
    state.events.publish(
        &rooms::queue(ticket.ticket_id),
        Event::new(
            EventType::QueueStatusUpdated,
            Some(req.office),
            Some(window.window_id),
            serde_json::json!({"status": ticket.status}),
        ),
    );

    Ok(AdmitOutcome::Ticket(AdmitResult {
        ticket_id: ticket.ticket_id,
        number: ticket.number,
        office: ticket.office,
        service_name: req.service_name.clone(),
        transaction_no: ticket.transaction_no,
        window_name: window.name,
        priority: ticket.priority,
        portal_url: format!("/queue/lookup/{}", ticket.ticket_id),
    }))
}

fn require_name(value: Option<String>) -> Result<String, AppError> {
    let value = value.ok_or_else(|| AppError::validation("name is required"))?;
    validation::validate_required(&value, "name", constraints::MAX_NAME_LENGTH)
}

fn require_contact(value: Option<String>) -> Result<String, AppError> {
    let value = value.ok_or_else(|| AppError::validation("contact is required"))?;
    validation::validate_phone(Some(&value), constraints::MAX_CONTACT_LENGTH)?
        .ok_or_else(|| AppError::validation("contact is required"))
}

fn require_email(value: Option<String>) -> Result<String, AppError> {
    let value = value.ok_or_else(|| AppError::validation("email is required"))?;
    validation::validate_email(Some(&value), constraints::MAX_EMAIL_LENGTH)?
        .ok_or_else(|| AppError::validation("email is required"))
}

fn validate_request_items(items: Option<Vec<String>>) -> Result<Vec<String>, AppError> {
    let items = items.unwrap_or_default();
    if items.is_empty() {
        return Err(AppError::validation("requestItems must not be empty"));
    }
    if items.len() > constraints::MAX_REQUEST_ITEMS {
        return Err(AppError::validation(format!(
            "requestItems exceeds the maximum of {} items",
            constraints::MAX_REQUEST_ITEMS
        )));
    }
    items
        .into_iter()
        .map(|item| validation::validate_required(&item, "requestItems", constraints::MAX_REQUEST_ITEM_LENGTH))
        .collect()
}

/// Validate and uppercase a `Document Claim` transaction number: two
/// letters, six digits, dash, three digits (case-insensitive on input,
/// stored uppercased), spec §4.6.1.
fn normalize_transaction_no(raw: &str) -> Result<String, AppError> {
    let upper = raw.trim().to_uppercase();
    let bytes: Vec<char> = upper.chars().collect();
    let valid = bytes.len() == constraints::TRANSACTION_NO_LENGTH
        && bytes[0].is_ascii_alphabetic()
        && bytes[1].is_ascii_alphabetic()
        && bytes[2..8].iter().all(|c| c.is_ascii_digit())
        && bytes[8] == '-'
        && bytes[9..12].iter().all(|c| c.is_ascii_digit());

    if !valid {
        return Err(AppError::validation(
            "transactionNo must match AA000000-000",
        ));
    }
    Ok(upper)
}

/// Generate a fresh transaction number in the same `AA000000-000` shape,
/// retrying on collision up to a small bound (spec §5: bounded retry on
/// uniqueness conflicts).
async fn generate_unique_transaction_no(pool: &sqlx::PgPool) -> Result<String, AppError> {
    const MAX_ATTEMPTS: u32 = 5;
    for _ in 0..MAX_ATTEMPTS {
        let candidate = random_transaction_no();
        if !TicketRepository::has_active_transaction_no(pool, &candidate).await? {
            return Ok(candidate);
        }
    }
    Err(AppError::conflict(
        "Could not allocate a unique transaction number",
    ))
}

fn random_transaction_no() -> String {
    let mut rng = rand::thread_rng();
    let letters: String = (0..2).map(|_| rng.gen_range(b'A'..=b'Z') as char).collect();
    let digits_a: u32 = rng.gen_range(0..1_000_000);
    let digits_b: u32 = rng.gen_range(0..1_000);
    format!("{letters}{:06}-{:03}", digits_a, digits_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_transaction_no_accepts_valid_shape() {
        assert_eq!(normalize_transaction_no("tr250101-001").unwrap(), "TR250101-001");
    }

    #[test]
    fn test_normalize_transaction_no_rejects_bad_shape() {
        assert!(normalize_transaction_no("TR250101001").is_err());
        assert!(normalize_transaction_no("T250101-001").is_err());
        assert!(normalize_transaction_no("TR25010A-001").is_err());
    }

    #[test]
    fn test_random_transaction_no_matches_shape() {
        let candidate = random_transaction_no();
        assert!(normalize_transaction_no(&candidate).is_ok());
    }

    #[test]
    fn test_service_enroll_constant_used_for_classification() {
        assert_eq!(AdmitPath::classify(SERVICE_ENROLL), AdmitPath::Enroll);
    }
}
