//! Shared application state threaded through handlers via `State<Arc<AppState>>`.

use std::sync::Arc;

use chrono_tz::Tz;
use governor::Quota;
use sqlx::PgPool;

use crate::clock;
use crate::config::Config;
use crate::events::EventBus;
use crate::locks::LockRegistry;
use crate::middleware::RateLimiter;

pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub tz: Tz,
    pub events: Arc<EventBus>,
    pub locks: Arc<LockRegistry>,
    pub rate_limit_public: RateLimiter,
    pub rate_limit_auth: RateLimiter,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Arc<Self> {
        let tz = clock::parse_timezone(&config.timezone);
        let rate_limit_public = RateLimiter::new(Quota::per_minute(
            std::num::NonZeroU32::new(config.rate_limit_public_per_minute)
                .unwrap_or_else(|| std::num::NonZeroU32::new(100).unwrap()),
        ));
        let rate_limit_auth = RateLimiter::new(
            Quota::with_period(std::time::Duration::from_secs(15 * 60))
                .unwrap()
                .allow_burst(
                    std::num::NonZeroU32::new(config.rate_limit_auth_per_15min)
                        .unwrap_or_else(|| std::num::NonZeroU32::new(50).unwrap()),
                ),
        );

        Arc::new(Self {
            pool,
            config,
            tz,
            events: Arc::new(EventBus::new()),
            locks: Arc::new(LockRegistry::new()),
            rate_limit_public,
            rate_limit_auth,
        })
    }
}
