//! Read-only catalog handlers (spec §6.1): services, windows, office
//! enablement status, and office location, all public and unauthenticated.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use serde::Serialize;

use crate::models::{Office, OfficeLocation, Service, Window};
use crate::response::{ok, ApiResult, PageParams, Paginated};
use crate::repositories::{ServiceRepository, WindowRepository};
use crate::state::AppState;

/// GET /services/{office} — every active service offered by the office,
/// including `specialRequest` ones (the public-filtering rule in spec
/// §4.9 applies to queue projections, not this catalog listing).
/// Paginated per spec §6.1 (`page`/`limit` query params).
pub async fn services(
    State(state): State<Arc<AppState>>,
    Path(office): Path<Office>,
    Query(page): Query<PageParams>,
) -> ApiResult<Paginated<Service>> {
    let services = ServiceRepository::list_by_office(&state.pool, office, false).await?;
    ok(Paginated::paginate(services, page))
}

/// GET /windows/{office} — every window at the office, open or closed.
/// Paginated per spec §6.1 (`page`/`limit` query params).
pub async fn windows(
    State(state): State<Arc<AppState>>,
    Path(office): Path<Office>,
    Query(page): Query<PageParams>,
) -> ApiResult<Paginated<Window>> {
    let windows = WindowRepository::list_by_office(&state.pool, office).await?;
    ok(Paginated::paginate(windows, page))
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficeStatus {
    pub office: Office,
    pub accepting_admits: bool,
}

/// GET /office-status/{office} — whether the office is currently
/// accepting new admits (spec's office-level enablement gate, checked
/// on every admit in §4.6.1).
pub async fn office_status(
    State(state): State<Arc<AppState>>,
    Path(office): Path<Office>,
) -> ApiResult<OfficeStatus> {
    ok(OfficeStatus {
        office,
        accepting_admits: state.config.office_enabled(office),
    })
}

/// GET /location/{office} — static physical-location data.
pub async fn location(
    State(_state): State<Arc<AppState>>,
    Path(office): Path<Office>,
) -> ApiResult<OfficeLocation> {
    ok(office.location())
}
