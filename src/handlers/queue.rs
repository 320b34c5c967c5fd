//! Customer-facing queue handlers: admit a new ticket and submit a
//! rating (spec §4.6.1, §4.6.9). Both are unauthenticated — anyone at a
//! kiosk or portal can call them, rate-limited at the public tier.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dispatcher::{self, AdmitOutcome, AdmitRequest};
use crate::error::AppError;
use crate::middleware::extract_client_ip;
use crate::models::{CustomerRole, Office, SubmitRating, StudentStatus};
use crate::response::{ok, ApiResult};
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmitRequestBody {
    pub office: Office,
    pub service_name: String,
    pub role: CustomerRole,
    #[serde(default)]
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

impl From<AdmitRequestBody> for AdmitRequest {
    fn from(body: AdmitRequestBody) -> Self {
        AdmitRequest {
            office: body.office,
            service_name: body.service_name,
            role: body.role,
            priority: body.priority,
            student_status: body.student_status,
            name: body.name,
            contact: body.contact,
            email: body.email,
            address: body.address,
            id_number: body.id_number,
            transaction_no: body.transaction_no,
            request_items: body.request_items,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase", untagged)]
pub enum AdmitResponse {
    Ticket {
        ticket_id: Uuid,
        number: i32,
        office: Office,
        service_name: String,
        transaction_no: Option<String>,
        window_name: String,
        priority: bool,
        portal_url: String,
    },
    DocumentRequestOnly {
        transaction_no: String,
    },
}

/// POST /api/v1/queue — admit a ticket, or file a non-queuing document
/// request (spec §4.6.1).
pub async fn admit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    Json(body): Json<AdmitRequestBody>,
) -> ApiResult<AdmitResponse> {
    let client_ip = extract_client_ip(&headers, connect_info.map(|c| c.0));
    let limiter = state.rate_limit_public.state();
    if let Err(retry_after) = limiter.check_rate_limit(client_ip).await {
        return Err(AppError::rate_limited(format!(
            "Too many requests. Retry after {retry_after}s."
        )));
    }

    let outcome = dispatcher::admit(&state, body.into()).await?;

    let response = match outcome {
        AdmitOutcome::Ticket(result) => AdmitResponse::Ticket {
            ticket_id: result.ticket_id,
            number: result.number,
            office: result.office,
            service_name: result.service_name,
            transaction_no: result.transaction_no,
            window_name: result.window_name,
            priority: result.priority,
            portal_url: result.portal_url,
        },
        AdmitOutcome::DocumentRequestOnly { transaction_no } => {
            AdmitResponse::DocumentRequestOnly { transaction_no }
        }
    };

    ok(response)
}

/// POST /api/v1/queue/{ticketId}/rating — unauthenticated rating
/// submission from the ticket lookup page (spec §4.6.9).
pub async fn submit_rating(
    State(state): State<Arc<AppState>>,
    Path(ticket_id): Path<Uuid>,
    Json(body): Json<SubmitRating>,
) -> ApiResult<crate::models::Ticket> {
    let ticket = dispatcher::submit_rating(&state, ticket_id, body).await?;
    ok(ticket)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admit_request_body_deserialize() {
        let json = r#"{"office":"registrar","serviceName":"Transcript","role":"student","priority":false}"#;
        let body: AdmitRequestBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.office, Office::Registrar);
        assert_eq!(body.service_name, "Transcript");
        assert!(!body.priority);
    }
}
