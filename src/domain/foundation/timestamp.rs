//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Checks if this timestamp is after another.
    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.0 > other.0
    }

    /// Returns the duration from another timestamp to this one.
    ///
    /// Returns negative duration if other is after self.
    pub fn duration_since(&self, other: &Timestamp) -> Duration {
        self.0.signed_duration_since(other.0)
    }

    /// Creates a new timestamp by adding the specified number of days.
    ///
    /// Negative values subtract days.
    pub fn add_days(&self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }

    /// Creates a new timestamp by subtracting the specified number of days.
    pub fn minus_days(&self, days: i64) -> Self {
        Self(self.0 - Duration::days(days))
    }

    /// Creates a new timestamp by adding a signed duration.
    pub fn plus(&self, duration: Duration) -> Self {
        Self(self.0 + duration)
    }

    /// Whole days from `self` until `later`, rounded up.
    ///
    /// Any positive remainder counts as a full day, so 30 minutes or even a
    /// few microseconds yield 1. Returns 0 when `later` is not after `self`.
    pub fn ceil_days_until(&self, later: &Timestamp) -> i64 {
        let remaining = later.duration_since(self);
        if remaining <= Duration::zero() {
            return 0;
        }
        let millis = remaining.num_milliseconds();
        ((millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY).max(1)
    }

    /// Creates a timestamp from Unix seconds.
    ///
    /// Out-of-range values clamp to the Unix epoch.
    pub fn from_unix_secs(secs: i64) -> Self {
        Self(DateTime::from_timestamp(secs, 0).unwrap_or_default())
    }

    /// Returns the timestamp as Unix seconds.
    pub fn as_unix_secs(&self) -> i64 {
        self.0.timestamp()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn base() -> Timestamp {
        // 2024-01-15T00:00:00Z
        Timestamp::from_unix_secs(1705276800)
    }

    #[test]
    fn timestamp_now_creates_current_time() {
        let before = Utc::now();
        let ts = Timestamp::now();
        let after = Utc::now();

        assert!(ts.as_datetime() >= &before);
        assert!(ts.as_datetime() <= &after);
    }

    #[test]
    fn timestamp_from_unix_secs_works() {
        let ts = base();
        assert_eq!(ts.as_datetime().year(), 2024);
        assert_eq!(ts.as_datetime().month(), 1);
        assert_eq!(ts.as_datetime().day(), 15);
        assert_eq!(Timestamp::from_unix_secs(ts.as_unix_secs()), ts);
    }

    #[test]
    fn add_days_and_minus_days_are_inverse() {
        let ts = base();
        assert_eq!(ts.add_days(30).minus_days(30), ts);
    }

    #[test]
    fn ceil_days_rounds_partial_day_up() {
        let now = base();
        let soon = now.plus(Duration::minutes(30));
        assert_eq!(now.ceil_days_until(&soon), 1);
    }

    #[test]
    fn ceil_days_is_exact_on_day_boundaries() {
        let now = base();
        assert_eq!(now.ceil_days_until(&now.add_days(20)), 20);
    }

    #[test]
    fn ceil_days_one_second_past_boundary_adds_a_day() {
        let now = base();
        let later = now.add_days(4).plus(Duration::seconds(1));
        assert_eq!(now.ceil_days_until(&later), 5);
    }

    #[test]
    fn ceil_days_counts_sub_second_remainder_as_a_day() {
        let now = base();
        assert_eq!(now.ceil_days_until(&now.plus(Duration::milliseconds(500))), 1);
        assert_eq!(now.ceil_days_until(&now.plus(Duration::microseconds(1))), 1);
    }

    #[test]
    fn ceil_days_is_zero_for_past_or_equal() {
        let now = base();
        assert_eq!(now.ceil_days_until(&now), 0);
        assert_eq!(now.ceil_days_until(&now.minus_days(3)), 0);
    }

    #[test]
    fn timestamp_serializes_as_rfc3339() {
        let json = serde_json::to_string(&base()).unwrap();
        assert!(json.contains("2024-01-15T00:00:00"));
    }

    #[test]
    fn timestamp_ordering_works() {
        let ts = base();
        assert!(ts < ts.add_days(1));
        assert!(ts.add_days(1).is_after(&ts));
        assert!(ts.is_before(&ts.add_days(1)));
    }
}
