//! Requeue-all / Requeue-selected (spec §4.6.8): move today's skipped
//! tickets for a window's services back to `waiting`.

use uuid::Uuid;

use crate::clock;
use crate::error::AppError;
use crate::events::{rooms, Event, EventType};
use crate::models::{Office, Ticket};
use crate::repositories::{TicketRepository, WindowRepository};
use crate::state::AppState;

use super::require_same_office;

pub async fn requeue_all(state: &AppState, office: Office, window_id: Uuid) -> Result<Vec<Ticket>, AppError> {
    let _guard = state.locks.lock_window(window_id).await;

    let window = WindowRepository::find_by_id(&state.pool, window_id)
        .await?
        .ok_or_else(|| AppError::not_found("Window not found"))?;
    require_same_office(&window, office)?;

    let today_start = clock::today_start(&state.tz);
    let tickets = TicketRepository::requeue_all(&state.pool, office, &window.service_ids, today_start).await?;

    emit(state, office, window_id, EventType::QueueRequeuedAll, &tickets);
    Ok(tickets)
}

pub async fn requeue_selected(
    state: &AppState,
    office: Office,
    window_id: Uuid,
    numbers: Vec<i32>,
) -> Result<Vec<Ticket>, AppError> {
    if numbers.is_empty() {
        return Err(AppError::validation("numbers must not be empty"));
    }

    let _guard = state.locks.lock_window(window_id).await;

    let window = WindowRepository::find_by_id(&state.pool, window_id)
        .await?
        .ok_or_else(|| AppError::not_found("Window not found"))?;
    require_same_office(&window, office)?;

    let today_start = clock::today_start(&state.tz);
    let tickets = TicketRepository::requeue_selected(&state.pool, office, &window.service_ids, today_start, &numbers).await?;

    emit(state, office, window_id, EventType::QueueRequeuedSelected, &tickets);
    Ok(tickets)
}

fn emit(state: &AppState, office: Office, window_id: Uuid, event_type: EventType, tickets: &[Ticket]) {
    let data = serde_json::json!({
        "windowId": window_id,
        "ticketIds": tickets.iter().map(|t| t.ticket_id).collect::<Vec<_>>(),
        "numbers": tickets.iter().map(|t| t.number).collect::<Vec<_>>(),
    });
    state.events.publish(
        &rooms::admin(office),
        Event::new(event_type, Some(office), Some(window_id), data.clone()),
    );
    state.events.publish(
        rooms::KIOSK,
        Event::new(event_type, Some(office), Some(window_id), data),
    );
}
