//! Tick arithmetic: the wall-clock instant unit used by `Log.created_tick`.
//!
//! A tick is 100 nanoseconds since `0001-01-01T00:00:00Z`. The exact epoch is
//! an internal detail, picked so producer-supplied ticks round-trip exactly
//! through `chrono::DateTime<Utc>` without a separate conversion table.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};

/// Number of ticks in one second.
pub const TICKS_PER_SECOND: i64 = 10_000_000;
/// Number of ticks in one minute.
pub const TICKS_PER_MINUTE: i64 = TICKS_PER_SECOND * 60;
/// Width of one interval-stat bucket: 10 real minutes.
pub const INTERVAL_WIDTH_TICKS: i64 = TICKS_PER_MINUTE * 10;

/// The epoch ticks are counted from.
fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0)
        .single()
        .expect("0001-01-01 is a valid UTC instant")
}

/// Current wall-clock instant as a tick count.
#[must_use]
pub fn now() -> i64 {
    from_datetime(Utc::now())
}

/// Convert a UTC instant to its tick count.
#[must_use]
pub fn from_datetime(dt: DateTime<Utc>) -> i64 {
    let delta = dt.signed_duration_since(epoch());
    delta.num_seconds() * TICKS_PER_SECOND
        + i64::from(delta.subsec_nanos()) / 100
}

/// Convert a tick count back to a UTC instant.
#[must_use]
pub fn to_datetime(tick: i64) -> DateTime<Utc> {
    let nanos = (tick.rem_euclid(TICKS_PER_SECOND)) * 100;
    let secs = tick.div_euclid(TICKS_PER_SECOND);
    epoch() + chrono::Duration::seconds(secs) + chrono::Duration::nanoseconds(nanos)
}

/// The local (here: UTC) calendar date a tick falls on — used to name the
/// per-day store file.
#[must_use]
pub fn to_date(tick: i64) -> NaiveDate {
    to_datetime(tick).date_naive()
}

/// Floor a tick to the start of its containing 10-minute interval bucket.
#[must_use]
pub fn floor_to_interval(tick: i64) -> i64 {
    tick.div_euclid(INTERVAL_WIDTH_TICKS) * INTERVAL_WIDTH_TICKS
}

/// Format a date as the `yyyy_mm_dd` stem used for day-store file names.
#[must_use]
pub fn date_stem(date: NaiveDate) -> String {
    format!("{:04}_{:02}_{:02}", date.year(), date.month(), date.day())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_datetime() {
        let dt = Utc.with_ymd_and_hms(2026, 2, 14, 16, 30, 0).unwrap();
        let tick = from_datetime(dt);
        let back = to_datetime(tick);
        assert_eq!(dt, back);
    }

    #[test]
    fn floor_to_interval_buckets_correctly() {
        let base = from_datetime(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(floor_to_interval(base), base);
        assert_eq!(floor_to_interval(base + 1), base);
        assert_eq!(
            floor_to_interval(base + INTERVAL_WIDTH_TICKS - 1),
            base
        );
        assert_eq!(
            floor_to_interval(base + INTERVAL_WIDTH_TICKS),
            base + INTERVAL_WIDTH_TICKS
        );
    }

    #[test]
    fn date_stem_is_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 4).unwrap();
        assert_eq!(date_stem(date), "2026_03_04");
    }

    #[test]
    fn to_date_matches_datetime_date() {
        let dt = Utc.with_ymd_and_hms(2026, 7, 26, 23, 59, 59).unwrap();
        let tick = from_datetime(dt);
        assert_eq!(to_date(tick), dt.date_naive());
    }

    #[test]
    fn now_is_monotonically_sane() {
        let a = now();
        let b = now();
        assert!(b >= a);
    }
}
