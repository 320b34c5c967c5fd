//! Previous (spec §4.6.4): re-serve the most recently completed ticket.

use uuid::Uuid;

use crate::clock;
use crate::error::AppError;
use crate::events::{rooms, Event, EventType};
use crate::models::{Office, Ticket};
use crate::repositories::{TicketRepository, WindowRepository};
use crate::state::AppState;

use super::require_same_office;

pub async fn previous(state: &AppState, office: Office, window_id: Uuid) -> Result<Ticket, AppError> {
    let _guard = state.locks.lock_window(window_id).await;

    let mut tx = state.pool.begin().await?;
    let window = WindowRepository::find_by_id_for_update(&mut tx, window_id)
        .await?
        .ok_or_else(|| AppError::not_found("Window not found"))?;
    require_same_office(&window, office)?;

    let today_start = clock::today_start(&state.tz);
    let previous_ticket = TicketRepository::find_most_recent_completed_today(&mut tx, window_id, today_start)
        .await?
        .ok_or_else(|| AppError::not_found("No completed ticket today at this window"))?;

    if let Some(current) = TicketRepository::find_currently_serving(&mut tx, window_id).await? {
        TicketRepository::revert_to_waiting(&mut tx, current.ticket_id).await?;
    }

    let reserved = TicketRepository::reserve_completed(&mut tx, previous_ticket.ticket_id).await?;
    tx.commit().await?;

    let data = serde_json::json!({
        "windowId": window_id,
        "ticketId": reserved.ticket_id,
        "number": reserved.number,
    });
    state.events.publish(
        &rooms::admin(office),
        Event::new(EventType::PreviousRecalled, Some(office), Some(window_id), data.clone()),
    );
    state.events.publish(
        rooms::KIOSK,
        Event::new(EventType::PreviousRecalled, Some(office), Some(window_id), data),
    );

    Ok(reserved)
}
