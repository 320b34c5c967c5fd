//! Authenticated admin command handlers (spec §4.6.2-§4.6.8, §6.1): the
//! eight window-mutating commands plus the admin queue snapshot. Every
//! handler resolves `office` from the caller's session rather than
//! trusting a client-supplied value — the one authorization check the
//! dispatcher itself owns (`dispatcher::require_same_office`) only works
//! if `office` is never attacker-controlled.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dispatcher::{self, NextOutcome, SkipOutcome, StopAction};
use crate::error::AppError;
use crate::handlers::auth::verify_admin_session;
use crate::lookup::{self, AdminSnapshot};
use crate::models::Ticket;
use crate::response::{ok, ApiResult};
use crate::state::AppState;

/// GET /api/v1/admin/queue/{windowId} — admin queue snapshot.
pub async fn snapshot(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(window_id): Path<Uuid>,
) -> ApiResult<AdminSnapshot> {
    let principal = verify_admin_session(&state, &headers).await?;
    let snapshot = lookup::admin_snapshot(&state, principal.office, window_id).await?;
    ok(snapshot)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowIdBody {
    pub window_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase", tag = "outcome")]
pub enum NextResponse {
    Called { ticket: Ticket },
    NoMoreQueues,
}

/// POST /queue/next — `{windowId}` (spec §4.6.2, §6.1).
pub async fn next(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<WindowIdBody>,
) -> ApiResult<NextResponse> {
    let principal = verify_admin_session(&state, &headers).await?;
    let outcome = dispatcher::next(
        &state,
        principal.office,
        body.window_id,
        &principal.as_processed_by(),
    )
    .await?;
    let response = match outcome {
        NextOutcome::Called(ticket) => NextResponse::Called { ticket },
        NextOutcome::NoMoreQueues => NextResponse::NoMoreQueues,
    };
    ok(response)
}

/// POST /queue/recall — `{windowId}` (spec §4.6.3, §6.1).
pub async fn recall(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<WindowIdBody>,
) -> ApiResult<Ticket> {
    let principal = verify_admin_session(&state, &headers).await?;
    let ticket = dispatcher::recall(&state, principal.office, body.window_id).await?;
    ok(ticket)
}

/// POST /queue/previous — `{windowId}` (spec §4.6.4, §6.1).
pub async fn previous(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<WindowIdBody>,
) -> ApiResult<Ticket> {
    let principal = verify_admin_session(&state, &headers).await?;
    let ticket = dispatcher::previous(&state, principal.office, body.window_id).await?;
    ok(ticket)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkipResponse {
    pub skipped: Ticket,
    pub next: Option<Ticket>,
}

/// POST /queue/skip — `{windowId}` (spec §4.6.5, §6.1).
pub async fn skip(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<WindowIdBody>,
) -> ApiResult<SkipResponse> {
    let principal = verify_admin_session(&state, &headers).await?;
    let SkipOutcome { skipped, next } = dispatcher::skip(
        &state,
        principal.office,
        body.window_id,
        &principal.as_processed_by(),
    )
    .await?;
    ok(SkipResponse { skipped, next })
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub from_window_id: Uuid,
    pub to_window_id: Uuid,
}

/// POST /queue/transfer — `{fromWindowId, toWindowId}` (spec §4.6.6, §6.1).
pub async fn transfer(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<TransferRequest>,
) -> ApiResult<Ticket> {
    let principal = verify_admin_session(&state, &headers).await?;
    let ticket = dispatcher::transfer(
        &state,
        principal.office,
        body.from_window_id,
        body.to_window_id,
    )
    .await?;
    ok(ticket)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopRequest {
    pub window_id: Uuid,
    pub action: StopActionBody,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopActionBody {
    Pause,
    Resume,
}

impl From<StopActionBody> for StopAction {
    fn from(value: StopActionBody) -> Self {
        match value {
            StopActionBody::Pause => StopAction::Pause,
            StopActionBody::Resume => StopAction::Resume,
        }
    }
}

/// POST /queue/stop — `{windowId, action:"pause"|"resume"}` (spec §4.6.7, §6.1).
pub async fn pause_resume(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<StopRequest>,
) -> ApiResult<crate::models::Window> {
    let principal = verify_admin_session(&state, &headers).await?;
    let window = dispatcher::pause_resume(&state, principal.office, body.window_id, body.action.into()).await?;
    ok(window)
}

/// POST /queue/requeue-all — `{windowId}` (spec §4.6.8, §6.1).
pub async fn requeue_all(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<WindowIdBody>,
) -> ApiResult<Vec<Ticket>> {
    let principal = verify_admin_session(&state, &headers).await?;
    let tickets = dispatcher::requeue_all(&state, principal.office, body.window_id).await?;
    ok(tickets)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequeueSelectedRequest {
    pub window_id: Uuid,
    pub numbers: Vec<i32>,
}

/// POST /queue/requeue-selected — `{windowId, numbers:[int]}` (spec §4.6.8, §6.1).
pub async fn requeue_selected(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<RequeueSelectedRequest>,
) -> ApiResult<Vec<Ticket>> {
    let principal = verify_admin_session(&state, &headers).await?;
    let tickets = dispatcher::requeue_selected(&state, principal.office, body.window_id, body.numbers).await?;
    ok(tickets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_id_body_deserialize() {
        let id = Uuid::new_v4();
        let json = format!(r#"{{"windowId":"{id}"}}"#);
        let body: WindowIdBody = serde_json::from_str(&json).unwrap();
        assert_eq!(body.window_id, id);
    }

    #[test]
    fn test_stop_action_body_parses_pause_and_resume() {
        let body: StopRequest =
            serde_json::from_str(&format!(r#"{{"windowId":"{}","action":"pause"}}"#, Uuid::new_v4())).unwrap();
        assert!(matches!(body.action, StopActionBody::Pause));
    }
}
