//! Lookup API (C9): read-only projections for kiosk and portal (spec §4.9).
//!
//! Every query here goes through C2 (the repositories); this module owns
//! only the shape of the three projections and the 24h `Gone` cutoff.

use chrono::Duration;
use serde::Serialize;
use uuid::Uuid;

use crate::clock;
use crate::error::AppError;
use crate::models::{display_name, Office, OfficeLocation, Ticket};
use crate::repositories::{CustomerFormRepository, ServiceRepository, TicketRepository, WindowRepository};
use crate::state::AppState;

/// Public queue snapshot (spec §4.9): open windows with their current
/// serving / next-in-line numbers, plus a capped preview of waiting
/// tickets. Services flagged `specialRequest=true` are filtered out.
#[derive(Debug, Clone, Serialize)]
pub struct PublicSnapshot {
    pub office: Office,
    pub windows: Vec<PublicWindowSummary>,
    pub waiting: Vec<PublicTicketSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicWindowSummary {
    pub window_id: Uuid,
    pub name: String,
    /// 0 when nothing is currently serving at this window.
    pub currently_serving_number: i32,
    /// 0 when nothing is waiting for this window.
    pub next_number: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicTicketSummary {
    pub ticket_id: Uuid,
    pub number: i32,
    pub display_name: String,
    pub priority: bool,
}

const PUBLIC_WAITING_PREVIEW: i64 = 5;
/// Generous over-fetch so filtering out `specialRequest` services still
/// leaves up to `PUBLIC_WAITING_PREVIEW` tickets (spec §4.9).
const PUBLIC_WAITING_FETCH: i64 = 50;

pub async fn public_snapshot(state: &AppState, office: Office) -> Result<PublicSnapshot, AppError> {
    let open_windows = WindowRepository::list_open_by_office(&state.pool, office).await?;

    let mut windows = Vec::with_capacity(open_windows.len());
    for window in &open_windows {
        let serving = TicketRepository::find_currently_serving_readonly(&state.pool, window.window_id).await?;
        let upcoming = TicketRepository::list_upcoming_numbers(&state.pool, window.window_id, 1).await?;
        windows.push(PublicWindowSummary {
            window_id: window.window_id,
            name: window.name.clone(),
            currently_serving_number: serving.map(|t| t.number).unwrap_or(0),
            next_number: upcoming.first().copied().unwrap_or(0),
        });
    }

    let public_services = ServiceRepository::list_by_office(&state.pool, office, true).await?;
    let public_service_ids: std::collections::HashSet<Uuid> =
        public_services.iter().map(|s| s.service_id).collect();

    let candidates = TicketRepository::list_waiting_public(&state.pool, office, PUBLIC_WAITING_FETCH).await?;
    let waiting = build_ticket_summaries(state, &candidates, &public_service_ids, &public_services).await?;

    Ok(PublicSnapshot {
        office,
        windows,
        waiting: waiting.into_iter().take(PUBLIC_WAITING_PREVIEW as usize).collect(),
    })
}

async fn build_ticket_summaries(
    state: &AppState,
    candidates: &[Ticket],
    public_service_ids: &std::collections::HashSet<Uuid>,
    services: &[crate::models::Service],
) -> Result<Vec<PublicTicketSummary>, AppError> {
    let filtered: Vec<&Ticket> = candidates
        .iter()
        .filter(|t| public_service_ids.contains(&t.service_id))
        .collect();

    let form_ids: Vec<Uuid> = filtered.iter().filter_map(|t| t.customer_form_id).collect();
    let forms = CustomerFormRepository::find_by_ids(&state.pool, &form_ids).await?;

    let mut out = Vec::with_capacity(filtered.len());
    for ticket in filtered {
        let service_name = services
            .iter()
            .find(|s| s.service_id == ticket.service_id)
            .map(|s| s.name.as_str())
            .unwrap_or("");
        let form_name = ticket
            .customer_form_id
            .and_then(|id| forms.iter().find(|f| f.customer_form_id == id))
            .map(|f| f.name.as_str());

        out.push(PublicTicketSummary {
            ticket_id: ticket.ticket_id,
            number: ticket.number,
            display_name: display_name(form_name, service_name, ticket.office),
            priority: ticket.priority,
        });
    }

    Ok(out)
}

/// Admin queue snapshot for one window (spec §4.9): waiting list (capped
/// at 20) with display names, the currently-serving ticket if any, and
/// today's skipped numbers.
#[derive(Debug, Clone, Serialize)]
pub struct AdminSnapshot {
    pub office: Office,
    pub window_id: Uuid,
    pub waiting: Vec<AdminTicketSummary>,
    pub currently_serving: Option<AdminTicketSummary>,
    pub skipped_numbers: Vec<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminTicketSummary {
    pub ticket_id: Uuid,
    pub number: i32,
    pub display_name: String,
    pub priority: bool,
    pub queued_at: chrono::DateTime<chrono::Utc>,
}

const ADMIN_WAITING_LIMIT: i64 = 20;

pub async fn admin_snapshot(state: &AppState, office: Office, window_id: Uuid) -> Result<AdminSnapshot, AppError> {
    let window = WindowRepository::find_by_id(&state.pool, window_id)
        .await?
        .ok_or_else(|| AppError::not_found("Window not found"))?;
    crate::dispatcher::require_same_office(&window, office)?;

    let public_services = ServiceRepository::list_by_office(&state.pool, office, true).await?;
    let public_service_ids: std::collections::HashSet<Uuid> =
        public_services.iter().map(|s| s.service_id).collect();

    let filters = crate::models::TicketFilters {
        office: Some(office),
        window_id: Some(window_id),
        limit: Some(ADMIN_WAITING_LIMIT),
        ..Default::default()
    };
    let waiting_tickets = TicketRepository::list_waiting(&state.pool, filters).await?;
    // spec §4.9: specialRequest services are filtered from the admin
    // waiting list too, not just public projections.
    let waiting_tickets: Vec<Ticket> = waiting_tickets
        .into_iter()
        .filter(|t| public_service_ids.contains(&t.service_id))
        .collect();
    let waiting_summaries = to_admin_summaries(state, &waiting_tickets, &public_service_ids, &public_services).await?;

    let serving_ticket = TicketRepository::find_currently_serving_readonly(&state.pool, window_id).await?;
    let currently_serving = match serving_ticket {
        Some(ticket) => {
            let summaries = to_admin_summaries(
                state,
                std::slice::from_ref(&ticket),
                &public_service_ids,
                &public_services,
            )
            .await?;
            summaries.into_iter().next()
        }
        None => None,
    };

    let today_start = clock::today_start(&state.tz);
    let skipped_numbers = TicketRepository::list_skipped_numbers(&state.pool, office, today_start).await?;

    Ok(AdminSnapshot {
        office,
        window_id,
        waiting: waiting_summaries,
        currently_serving,
        skipped_numbers,
    })
}

async fn to_admin_summaries(
    state: &AppState,
    tickets: &[Ticket],
    _public_service_ids: &std::collections::HashSet<Uuid>,
    services: &[crate::models::Service],
) -> Result<Vec<AdminTicketSummary>, AppError> {
    let mut all_services = services.to_vec();
    let missing_service_ids: Vec<Uuid> = tickets
        .iter()
        .map(|t| t.service_id)
        .filter(|id| !all_services.iter().any(|s| &s.service_id == id))
        .collect();
    if !missing_service_ids.is_empty() {
        all_services.extend(ServiceRepository::find_by_ids(&state.pool, &missing_service_ids).await?);
    }

    let form_ids: Vec<Uuid> = tickets.iter().filter_map(|t| t.customer_form_id).collect();
    let forms = CustomerFormRepository::find_by_ids(&state.pool, &form_ids).await?;

    let mut out = Vec::with_capacity(tickets.len());
    for ticket in tickets {
        let service_name = all_services
            .iter()
            .find(|s| s.service_id == ticket.service_id)
            .map(|s| s.name.as_str())
            .unwrap_or("");
        let form_name = ticket
            .customer_form_id
            .and_then(|id| forms.iter().find(|f| f.customer_form_id == id))
            .map(|f| f.name.as_str());

        out.push(AdminTicketSummary {
            ticket_id: ticket.ticket_id,
            number: ticket.number,
            display_name: display_name(form_name, service_name, ticket.office),
            priority: ticket.priority,
            queued_at: ticket.queued_at,
        });
    }

    Ok(out)
}

/// Ticket-by-id projection (spec §4.9): ticket, service, window, office
/// location, the window's current serving number, and up to two
/// upcoming numbers. Rejects tickets older than 24h (spec B3).
#[derive(Debug, Clone, Serialize)]
pub struct TicketProjection {
    pub ticket: Ticket,
    pub service_name: String,
    pub window_name: String,
    pub location: OfficeLocation,
    pub currently_serving_number: i32,
    pub upcoming_numbers: Vec<i32>,
}

const UPCOMING_NUMBERS_LIMIT: i64 = 2;
const TICKET_LOOKUP_MAX_AGE_HOURS: i64 = 24;

pub async fn ticket_projection(state: &AppState, ticket_id: Uuid) -> Result<TicketProjection, AppError> {
    let ticket = TicketRepository::find_by_id(&state.pool, ticket_id)
        .await?
        .ok_or_else(|| AppError::not_found("Ticket not found"))?;

    if clock::now() - ticket.queued_at > Duration::hours(TICKET_LOOKUP_MAX_AGE_HOURS) {
        return Err(AppError::gone("This ticket has expired"));
    }

    let service = ServiceRepository::find_by_id(&state.pool, ticket.service_id)
        .await?
        .ok_or_else(|| AppError::not_found("Service not found"))?;
    let window = WindowRepository::find_by_id(&state.pool, ticket.window_id)
        .await?
        .ok_or_else(|| AppError::not_found("Window not found"))?;

    let serving = TicketRepository::find_currently_serving_readonly(&state.pool, ticket.window_id).await?;
    let upcoming_numbers =
        TicketRepository::list_upcoming_numbers(&state.pool, ticket.window_id, UPCOMING_NUMBERS_LIMIT).await?;

    Ok(TicketProjection {
        service_name: service.name,
        window_name: window.name,
        location: ticket.office.location(),
        currently_serving_number: serving.map(|t| t.number).unwrap_or(0),
        upcoming_numbers,
        ticket,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_lookup_cutoff_is_24_hours() {
        assert_eq!(TICKET_LOOKUP_MAX_AGE_HOURS, 24);
    }

    #[test]
    fn test_public_preview_is_capped_at_five() {
        assert_eq!(PUBLIC_WAITING_PREVIEW, 5);
    }
}
