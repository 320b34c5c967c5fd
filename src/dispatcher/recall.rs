//! Recall (spec §4.6.3): pure observer, no state change (L1).

use uuid::Uuid;

use crate::error::AppError;
use crate::events::{rooms, Event, EventType};
use crate::models::{Office, Ticket};
use crate::repositories::{TicketRepository, WindowRepository};
use crate::state::AppState;

use super::require_same_office;

pub async fn recall(state: &AppState, office: Office, window_id: Uuid) -> Result<Ticket, AppError> {
    let window = WindowRepository::find_by_id(&state.pool, window_id)
        .await?
        .ok_or_else(|| AppError::not_found("Window not found"))?;
    require_same_office(&window, office)?;

    let ticket = TicketRepository::find_currently_serving_readonly(&state.pool, window_id)
        .await?
        .ok_or_else(|| AppError::not_found("No ticket currently serving at this window"))?;

    let data = serde_json::json!({
        "windowId": window_id,
        "ticketId": ticket.ticket_id,
        "number": ticket.number,
    });
    state.events.publish(
        &rooms::admin(office),
        Event::new(EventType::QueueRecalled, Some(office), Some(window_id), data.clone()),
    );
    state.events.publish(
        rooms::KIOSK,
        Event::new(EventType::QueueRecalled, Some(office), Some(window_id), data),
    );

    Ok(ticket)
}
