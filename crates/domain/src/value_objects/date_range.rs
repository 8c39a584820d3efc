//! Calendar date ranges and their canonical cache keys
//!
//! The schedule cache is indexed by `RangeKey`, a day-granularity string of
//! the form `"<start-date>_<end-date>"`. Two ranges covering the same
//! calendar days produce the same key regardless of time-of-day components,
//! so UI callers that rebuild their range objects on every render still hit
//! the same cache entry.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Canonical identifier for a calendar interval at day granularity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RangeKey(String);

impl RangeKey {
    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RangeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A bounded calendar interval.
///
/// Construction rejects `end < start`; an unbounded "fetch everything"
/// request is unrepresentable because schedule loads take a `DateRange`
/// by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DateRange {
    /// Create a new range spanning `start..=end`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `end` is before `start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, DomainError> {
        if end < start {
            return Err(DomainError::validation(format!(
                "Range end {} is before start {}",
                end.format("%Y-%m-%d"),
                start.format("%Y-%m-%d")
            )));
        }
        Ok(Self { start, end })
    }

    /// Create a range from whole calendar days (midnight to midnight, UTC).
    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> Result<Self, DomainError> {
        Self::new(
            start.and_time(NaiveTime::MIN).and_utc(),
            end.and_time(NaiveTime::MIN).and_utc(),
        )
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// The canonical cache key for this range.
    pub fn range_key(&self) -> RangeKey {
        RangeKey(format!(
            "{}_{}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        ))
    }

    /// Whether `instant` falls inside this range (inclusive of the end day's
    /// start instant, matching the day-granularity contract of the key).
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant.date_naive() <= self.end.date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn range_key_is_day_granular() {
        let morning = DateRange::new(
            Utc.with_ymd_and_hms(2025, 3, 1, 8, 15, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 31, 9, 0, 0).unwrap(),
        )
        .expect("valid range");
        let evening = DateRange::new(
            Utc.with_ymd_and_hms(2025, 3, 1, 22, 45, 59).unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 31, 23, 59, 59).unwrap(),
        )
        .expect("valid range");

        assert_eq!(morning.range_key(), evening.range_key());
        assert_eq!(morning.range_key().as_str(), "2025-03-01_2025-03-31");
    }

    #[test]
    fn rejects_inverted_range() {
        let result = DateRange::from_dates(date(2025, 3, 31), date(2025, 3, 1));
        assert!(result.is_err());
    }

    #[test]
    fn single_day_range_is_valid() {
        let range = DateRange::from_dates(date(2025, 3, 5), date(2025, 3, 5)).expect("valid");
        assert_eq!(range.range_key().as_str(), "2025-03-05_2025-03-05");
    }

    #[test]
    fn contains_respects_day_granularity_at_the_end() {
        let range = DateRange::from_dates(date(2025, 3, 1), date(2025, 3, 31)).expect("valid");
        let late_on_last_day = Utc.with_ymd_and_hms(2025, 3, 31, 18, 0, 0).unwrap();
        let day_after = Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 1).unwrap();

        assert!(range.contains(late_on_last_day));
        assert!(!range.contains(day_after));
    }
}
