//! Transfer (spec §4.6.6): move the currently-serving ticket at one
//! window to another, open, same-office window.

use uuid::Uuid;

use crate::error::AppError;
use crate::events::{rooms, Event, EventType};
use crate::models::{Office, Ticket};
use crate::repositories::{TicketRepository, WindowRepository};
use crate::state::AppState;

use super::require_same_office;

pub async fn transfer(
    state: &AppState,
    office: Office,
    from_window_id: Uuid,
    to_window_id: Uuid,
) -> Result<Ticket, AppError> {
    if from_window_id == to_window_id {
        return Err(AppError::validation("fromWindowId and toWindowId must differ"));
    }

    let (_from_guard, _to_guard) = state.locks.lock_windows_ordered(from_window_id, to_window_id).await;

    let mut tx = state.pool.begin().await?;
    let from = WindowRepository::find_by_id_for_update(&mut tx, from_window_id)
        .await?
        .ok_or_else(|| AppError::not_found("Source window not found"))?;
    let to = WindowRepository::find_by_id_for_update(&mut tx, to_window_id)
        .await?
        .ok_or_else(|| AppError::not_found("Destination window not found"))?;

    require_same_office(&from, office)?;
    require_same_office(&to, office)?;
    if from.office != to.office {
        return Err(AppError::validation("Both windows must belong to the same office"));
    }
    if !to.is_open {
        return Err(AppError::conflict("Destination window is not open"));
    }

    let current = TicketRepository::find_currently_serving(&mut tx, from_window_id)
        .await?
        .ok_or_else(|| AppError::not_found("No ticket currently serving at the source window"))?;

    let new_priority = to.is_priority_window();
    let ticket = TicketRepository::transfer(&mut tx, current.ticket_id, to_window_id, new_priority).await?;
    tx.commit().await?;

    let data = serde_json::json!({
        "ticketId": ticket.ticket_id,
        "number": ticket.number,
        "fromWindowId": from_window_id,
        "toWindowId": to_window_id,
        "priority": ticket.priority,
    });

    state.events.publish(
        &rooms::admin(office),
        Event::new(EventType::QueueTransferred, Some(office), Some(to_window_id), data.clone()),
    );
    state.events.publish(
        rooms::KIOSK,
        Event::new(EventType::QueueTransferred, Some(office), Some(to_window_id), data),
    );

    Ok(ticket)
}
