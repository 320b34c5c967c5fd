//! Queue Dispatcher - multi-office customer-service queue core.
//!
//! Admits walk-in customers into per-office, per-service queues, routes
//! them to windows, and drives the admin commands (next/recall/previous/
//! skip/transfer/stop/requeue) that advance each window, fanning out
//! every state change over a real-time event bus.

pub mod auth;
pub mod clock;
pub mod config;
pub mod cors;
pub mod db;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod handlers;
pub mod janitor;
pub mod locks;
pub mod lookup;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod response;
pub mod routes;
pub mod routing;
pub mod services;
pub mod state;
pub mod validation;

pub use config::Config;
pub use cors::build_cors_layer;
pub use db::{create_pool, test_connection, DbConfig};
pub use error::{codes as error_codes, AppError};
pub use middleware::BodyLimitConfig;
pub use response::{created, empty, no_content, ok, ApiResponse, ApiResult};
pub use routes::api_router;
pub use state::AppState;
