//! API route modules.
//!
//! Routes are organized by domain:
//! - `/health` - Health check endpoint
//! - `/api/v1/queue` - Admit, public snapshot, ticket lookup, rating,
//!   and the authenticated admin commands
//! - `/api/v1/services`, `/windows`, `/office-status`, `/location` - catalog
//! - `/api/v1/auth` - Admin login/logout
//! - `/api/v1/admin` - Admin queue snapshot
//! - `/ws` - Real-time event channel

mod health;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{admin, auth, catalog, queue};
use crate::state::AppState;

pub use health::health_check;

/// Build the API router with all routes, mounted on the shared
/// `Arc<AppState>`.
pub fn api_router(state: Arc<AppState>) -> Router {
    let api_v1 = Router::new()
        // Public, unauthenticated
        .route("/queue", post(queue::admit))
        .route("/queue/:office", get(crate::handlers::lookup::public_snapshot))
        .route("/queue/lookup/:ticket_id", get(crate::handlers::lookup::ticket_lookup))
        .route("/queue/:ticket_id/rating", post(queue::submit_rating))
        .route("/services/:office", get(catalog::services))
        .route("/windows/:office", get(catalog::windows))
        .route("/office-status/:office", get(catalog::office_status))
        .route("/location/:office", get(catalog::location))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        // Authenticated admin commands (session verified inside each handler)
        .route("/queue/next", post(admin::next))
        .route("/queue/recall", post(admin::recall))
        .route("/queue/previous", post(admin::previous))
        .route("/queue/skip", post(admin::skip))
        .route("/queue/transfer", post(admin::transfer))
        .route("/queue/stop", post(admin::pause_resume))
        .route("/queue/requeue-all", post(admin::requeue_all))
        .route("/queue/requeue-selected", post(admin::requeue_selected))
        .route("/admin/queue/:window_id", get(admin::snapshot));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ws", get(crate::events::ws_handler))
        .nest("/api/v1", api_v1)
        .with_state(state)
}
