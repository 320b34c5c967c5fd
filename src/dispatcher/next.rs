//! Next (spec §4.6.2): advance a window to the next eligible ticket.

use uuid::Uuid;

use crate::error::AppError;
use crate::events::{rooms, Event, EventType};
use crate::models::{Office, Ticket, Window};
use crate::repositories::{TicketRepository, WindowRepository};
use crate::state::AppState;

use super::require_same_office;

#[derive(Debug, Clone)]
pub enum NextOutcome {
    Called(Ticket),
    NoMoreQueues,
}

pub async fn next(
    state: &AppState,
    office: Office,
    window_id: Uuid,
    principal: &str,
) -> Result<NextOutcome, AppError> {
    let _guard = state.locks.lock_window(window_id).await;

    let mut tx = state.pool.begin().await?;
    let window = WindowRepository::find_by_id_for_update(&mut tx, window_id)
        .await?
        .ok_or_else(|| AppError::not_found("Window not found"))?;
    require_same_office(&window, office)?;

    if !window.accepts_next() {
        return Err(AppError::conflict("Window is not open and serving"));
    }

    let is_priority = window.is_priority_window();

    // Step 1: candidate restricted to the window's services, falling
    // back to any service (spec §9: behavior preserved as-is).
    let candidate = TicketRepository::find_next_waiting(&mut tx, office, window_id, &window.service_ids, is_priority)
        .await?;
    let candidate = match candidate {
        Some(t) => Some(t),
        None => TicketRepository::find_next_waiting_any_service(&mut tx, office, window_id, is_priority).await?,
    };

    // Step 2: always close whatever was being served.
    let completed = TicketRepository::complete_currently_serving(&mut tx, window_id).await?;

    let Some(candidate) = candidate else {
        tx.commit().await?;
        emit_no_more_queues(state, &window, completed);
        return Ok(NextOutcome::NoMoreQueues);
    };

    let served = TicketRepository::mark_serving(&mut tx, candidate.ticket_id, principal).await?;
    tx.commit().await?;

    emit_next_called(state, &window, &served, completed);

    Ok(NextOutcome::Called(served))
}

fn emit_no_more_queues(state: &AppState, window: &Window, completed: Option<Ticket>) {
    let data = serde_json::json!({
        "windowId": window.window_id,
        "completedTicketId": completed.map(|t| t.ticket_id),
    });
    state.events.publish(
        &rooms::admin(window.office),
        Event::new(EventType::NoMoreQueues, Some(window.office), Some(window.window_id), data),
    );
}

fn emit_next_called(state: &AppState, window: &Window, served: &Ticket, completed: Option<Ticket>) {
    let data = serde_json::json!({
        "windowId": window.window_id,
        "ticketId": served.ticket_id,
        "number": served.number,
        "completedTicketId": completed.map(|t| t.ticket_id),
    });

    state.events.publish(
        &rooms::admin(window.office),
        Event::new(EventType::NextCalled, Some(window.office), Some(window.window_id), data.clone()),
    );
    state.events.publish(
        rooms::KIOSK,
        Event::new(EventType::NextCalled, Some(window.office), Some(window.window_id), data),
    );
    state.events.publish(
        &rooms::queue(served.ticket_id),
        Event::new(
            EventType::QueueStatusUpdated,
            Some(window.office),
            Some(window.window_id),
            serde_json::json!({"status": served.status}),
        ),
    );
}
