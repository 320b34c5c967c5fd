//! Lookup API handlers (spec §4.9, §6.1): public queue snapshot and
//! ticket-by-id projection for kiosk displays and the customer portal.

use std::sync::Arc;

use axum::extract::{Path, State};

use crate::error::AppError;
use crate::lookup::{self, PublicSnapshot, TicketProjection};
use crate::models::Office;
use crate::response::{ok, ApiResult};
use crate::state::AppState;

/// GET /api/v1/queue/{office} — public queue snapshot.
pub async fn public_snapshot(
    State(state): State<Arc<AppState>>,
    Path(office): Path<Office>,
) -> ApiResult<PublicSnapshot> {
    if !state.config.office_enabled(office) {
        return Err(AppError::unavailable("Office is not currently accepting admits"));
    }
    let snapshot = lookup::public_snapshot(&state, office).await?;
    ok(snapshot)
}

/// GET /api/v1/queue/lookup/{ticketId} — ticket-by-id projection.
pub async fn ticket_lookup(
    State(state): State<Arc<AppState>>,
    Path(ticket_id): Path<uuid::Uuid>,
) -> ApiResult<TicketProjection> {
    let projection = lookup::ticket_projection(&state, ticket_id).await?;
    ok(projection)
}
