//! Skip (spec §4.6.5): skip the currently-serving ticket, then run the
//! Next selection (steps 1, 3, 4, 5 of §4.6.2 — no separate "complete"
//! step, since the current ticket is being skipped rather than completed).

use uuid::Uuid;

use crate::error::AppError;
use crate::events::{rooms, Event, EventType};
use crate::models::{Office, Ticket};
use crate::repositories::{TicketRepository, WindowRepository};
use crate::state::AppState;

use super::require_same_office;

#[derive(Debug, Clone)]
pub struct SkipOutcome {
    pub skipped: Ticket,
    pub next: Option<Ticket>,
}

pub async fn skip(
    state: &AppState,
    office: Office,
    window_id: Uuid,
    principal: &str,
) -> Result<SkipOutcome, AppError> {
    let _guard = state.locks.lock_window(window_id).await;

    let mut tx = state.pool.begin().await?;
    let window = WindowRepository::find_by_id_for_update(&mut tx, window_id)
        .await?
        .ok_or_else(|| AppError::not_found("Window not found"))?;
    require_same_office(&window, office)?;

    let skipped = TicketRepository::mark_skipped(&mut tx, window_id)
        .await?
        .ok_or_else(|| AppError::not_found("No ticket currently serving at this window"))?;

    let is_priority = window.is_priority_window();
    let candidate = TicketRepository::find_next_waiting(&mut tx, office, window_id, &window.service_ids, is_priority)
        .await?;
    let candidate = match candidate {
        Some(t) => Some(t),
        None => TicketRepository::find_next_waiting_any_service(&mut tx, office, window_id, is_priority).await?,
    };

    let next = match candidate {
        Some(candidate) => Some(TicketRepository::mark_serving(&mut tx, candidate.ticket_id, principal).await?),
        None => None,
    };
    tx.commit().await?;

    let data = serde_json::json!({
        "windowId": window_id,
        "skippedTicketId": skipped.ticket_id,
        "skippedNumber": skipped.number,
        "nextTicketId": next.as_ref().map(|t| t.ticket_id),
        "nextNumber": next.as_ref().map(|t| t.number),
    });

    state.events.publish(
        &rooms::admin(office),
        Event::new(EventType::QueueSkipped, Some(office), Some(window_id), data.clone()),
    );
    state.events.publish(
        rooms::KIOSK,
        Event::new(EventType::QueueSkipped, Some(office), Some(window_id), data),
    );

    Ok(SkipOutcome { skipped, next })
}
