//! Middleware modules for the API.

pub mod body_limit;
pub mod deadline;
pub mod rate_limit;

pub use body_limit::{json_payload_error, BodyLimitConfig};
pub use deadline::enforce_deadline;
pub use rate_limit::{extract_client_ip, RateLimitState, RateLimiter};
