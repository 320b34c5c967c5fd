//! Per-request deadline enforcement (spec §5: "every request carries a
//! deadline (default 30 s). On deadline, the request fails with
//! `Timeout`; committed side-effects already written remain.").
//!
//! Applied as an outer layer around the whole router so every handler,
//! public or admin, is covered uniformly rather than opting in one at a
//! time.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::AppError;
use crate::state::AppState;

/// Run `next` under `state.config.request_timeout()`; on elapse, return
/// `AppError::Timeout` without waiting for or cancelling the in-flight
/// work's already-committed writes (spec §5).
pub async fn enforce_deadline(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let deadline = request_deadline(&state, &request);
    match tokio::time::timeout(deadline, next.run(request)).await {
        Ok(response) => response,
        Err(_) => AppError::timeout("Request exceeded its deadline").into_response(),
    }
}

/// The WebSocket upgrade route is a long-lived duplex channel, not a
/// bounded request/response cycle; it is exempt from the deadline (the
/// connection itself is cleaned up by the transport on disconnect).
fn request_deadline(state: &AppState, request: &Request<Body>) -> Duration {
    if request.uri().path() == "/ws" {
        Duration::from_secs(u64::MAX / 2)
    } else {
        state.config.request_timeout()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::middleware;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    fn test_state(timeout_ms: u64) -> Arc<AppState> {
        let mut config = crate::config::Config::from_env_or_defaults();
        config.request_timeout_ms = timeout_ms;
        // No live pool is touched by these handlers; PgPool::connect_lazy
        // never opens a socket until a query runs.
        let pool = sqlx::PgPool::connect_lazy("postgres://localhost/unused").unwrap();
        AppState::new(pool, config)
    }

    #[tokio::test]
    async fn test_fast_handler_passes_through() {
        let state = test_state(30_000);
        let app = Router::new()
            .route("/ok", get(|| async { "fine" }))
            .layer(middleware::from_fn_with_state(state.clone(), enforce_deadline))
            .with_state(state);

        let request = Request::builder().uri("/ok").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_slow_handler_times_out() {
        let state = test_state(20);
        let app = Router::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_millis(200)).await;
                    "too late"
                }),
            )
            .layer(middleware::from_fn_with_state(state.clone(), enforce_deadline))
            .with_state(state);

        let request = Request::builder().uri("/slow").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    }

    #[tokio::test]
    async fn test_ws_path_is_exempt_from_deadline() {
        let state = test_state(20);
        let app = Router::new()
            .route(
                "/ws",
                get(|| async {
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    "upgraded-ish"
                }),
            )
            .layer(middleware::from_fn_with_state(state.clone(), enforce_deadline))
            .with_state(state);

        let request = Request::builder().uri("/ws").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
