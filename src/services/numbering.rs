//! Numbering Service (C3): the per-office daily sequence (spec §4.3).
//!
//! The office lock serializes the read-then-write against concurrent
//! admits in-process; the database's `ON CONFLICT ... DO UPDATE` makes
//! the assignment atomic even across multiple dispatcher processes.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use sqlx::PgPool;

use crate::clock;
use crate::error::AppError;
use crate::locks::LockRegistry;
use crate::models::Office;
use crate::repositories::OfficeSequenceRepository;

pub struct NumberingService;

impl NumberingService {
    /// Assign the next ticket number for `office` (spec I5, B1: wraps
    /// `99 -> 1`). Must be called with the office lock held by the caller
    /// (Admit acquires it once for the whole admit transaction).
    pub async fn next(pool: &PgPool, tz: &Tz, office: Office) -> Result<i32, AppError> {
        let today = local_date(tz, clock::now());
        OfficeSequenceRepository::next(pool, office, today).await
    }

    /// Convenience wrapper that also acquires the office lock, for call
    /// sites that only need the number and not the rest of admit's
    /// transaction under the same lock (spec §4.3: "reads and the
    /// subsequent admit write must be serialized per office").
    pub async fn next_locked(
        pool: &PgPool,
        locks: &LockRegistry,
        tz: &Tz,
        office: Office,
    ) -> Result<i32, AppError> {
        let _guard = locks.lock_office(office).await;
        Self::next(pool, tz, office).await
    }
}

/// The calendar day (in `tz`) that `at` falls in — the key spec I5 scopes
/// the per-office daily sequence to. Pulled out so the timezone handling
/// can be exercised without a live pool.
fn local_date(tz: &Tz, at: DateTime<Utc>) -> NaiveDate {
    at.with_timezone(tz).date_naive()
}
