//! Admin authentication handlers and the session-header extractor every
//! authenticated route relies on (spec §1: "the core receives an
//! authenticated principal with role and office" — identity/RBAC proper
//! is out of scope, so this is the thinnest PIN+session login that can
//! produce one, grounded on the teacher's employee PIN-verification and
//! session-header pattern).

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::middleware::extract_client_ip;
use crate::models::{AdminSessionResponse, AuthenticatedPrincipal, Office};
use crate::repositories::principal::find_matching;
use crate::repositories::{AdminSessionRepository, PrincipalRepository};
use crate::response::{ok, ApiResult};
use crate::state::AppState;

/// Resolve `X-Admin-Session` into the principal that issued it, touching
/// the session's sliding expiration (teacher's
/// `verify_admin_session_header`, generalized to return the identity
/// instead of `()` since the dispatcher needs `office` and
/// `processedBy`).
pub async fn verify_admin_session(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<AuthenticatedPrincipal, AppError> {
    let token = headers
        .get("X-Admin-Session")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::authentication("Missing X-Admin-Session header"))?;

    let session = AdminSessionRepository::verify_and_touch(&state.pool, token)
        .await?
        .ok_or_else(|| AppError::authentication("Invalid or expired session"))?;

    let principal = PrincipalRepository::find_by_id(&state.pool, session.principal_id)
        .await?
        .ok_or_else(|| AppError::authentication("Principal no longer exists"))?;

    if !principal.is_active {
        return Err(AppError::authentication("Principal is no longer active"));
    }

    Ok(AuthenticatedPrincipal {
        principal_id: principal.principal_id,
        office: principal.office,
    })
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub office: Office,
    pub pin: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub principal_id: uuid::Uuid,
    pub office: Office,
    pub display_name: String,
    pub session_token: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

/// POST /api/v1/auth/login — verify an admin PIN against every active
/// principal in the given office (teacher's `verify_employee_pin` scan
/// pattern, scoped by office) and issue a session.
pub async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    axum::Json(body): axum::Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let client_ip = extract_client_ip(&headers, connect_info.map(|c| c.0));
    let limiter = state.rate_limit_auth.state();

    if let Err(retry_after) = limiter.check_rate_limit(client_ip).await {
        return Err(AppError::rate_limited(format!(
            "Too many login attempts. Retry after {retry_after}s."
        )));
    }

    let candidates = PrincipalRepository::find_active_by_office(&state.pool, body.office).await?;

    let Some(principal) = find_matching(&candidates, &body.pin)? else {
        limiter.record_failure(client_ip).await;
        return Err(AppError::authentication("Invalid PIN"));
    };

    limiter.record_success(client_ip).await;

    let session: AdminSessionResponse = AdminSessionRepository::create(&state.pool, principal.principal_id).await?;
    state
        .events
        .register_session(principal.principal_id, session.session_token.clone())
        .await;

    ok(LoginResponse {
        principal_id: principal.principal_id,
        office: principal.office,
        display_name: principal.display_name.clone(),
        session_token: session.session_token,
        expires_at: session.expires_at,
    })
}

/// POST /api/v1/auth/logout — invalidate the caller's own session.
pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> ApiResult<()> {
    let token = headers
        .get("X-Admin-Session")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::authentication("Missing X-Admin-Session header"))?;

    if let Some(session) = AdminSessionRepository::find_by_token(&state.pool, token).await? {
        state.events.unregister_session(session.principal_id, token).await;
    }
    AdminSessionRepository::delete_by_token(&state.pool, token).await?;

    ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_deserialize() {
        let json = r#"{"office":"registrar","pin":"1234"}"#;
        let req: LoginRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.office, Office::Registrar);
        assert_eq!(req.pin, "1234");
    }
}
