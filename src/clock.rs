//! Clock & Calendar (C1): local-timezone day boundaries and the
//! midnight scheduler the Janitor (C8) rides on.

use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use chrono_tz::Tz;

/// Current instant. A thin wrapper so call sites read like the rest of
/// the gateway layer and so tests can reason about it explicitly.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Start of the calendar day (local midnight) containing `now()`, in UTC.
pub fn today_start(tz: &Tz) -> DateTime<Utc> {
    day_start_at(tz, now())
}

/// Start of the calendar day containing `at`, in the given timezone,
/// expressed back in UTC.
pub fn day_start_at(tz: &Tz, at: DateTime<Utc>) -> DateTime<Utc> {
    let local = at.with_timezone(tz);
    let local_midnight = local.date_naive().and_hms_opt(0, 0, 0).unwrap();
    tz.from_local_datetime(&local_midnight)
        .single()
        .unwrap_or_else(|| tz.from_utc_datetime(&local_midnight))
        .with_timezone(&Utc)
}

/// End of the calendar day (exclusive, i.e. the start of the next day)
/// containing `now()`, in UTC.
pub fn today_end(tz: &Tz) -> DateTime<Utc> {
    today_start(tz) + ChronoDuration::days(1)
}

/// Duration until the next local midnight after `now()`.
pub fn duration_until_next_midnight(tz: &Tz) -> std::time::Duration {
    let next = today_end(tz);
    let delta = next - now();
    delta.to_std().unwrap_or(std::time::Duration::from_secs(1))
}

/// Parse the configured timezone name, falling back to UTC on a bad
/// string (guards a misconfigured deployment rather than panicking).
pub fn parse_timezone(name: &str) -> Tz {
    name.parse().unwrap_or(chrono_tz::UTC)
}
