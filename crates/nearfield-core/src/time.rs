//! Epoch and calendar-day time keying.
//!
//! The identifier rotation scheme divides each day into fixed-length epochs
//! aligned to the Unix epoch; contact records are bucketed by calendar day.
//! Both computations must agree exactly across devices, so they live here
//! rather than at call sites.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Number of identifier epochs per day.
pub const EPOCHS_PER_DAY: u32 = 96;

/// Length of one identifier epoch in seconds.
pub const SECONDS_PER_EPOCH: u32 = 86_400 / EPOCHS_PER_DAY;

/// Length of one signal-statistics window in seconds.
pub const WINDOW_SECS: u32 = 60;

/// A calendar-day bucket for contact records.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct DayDate(NaiveDate);

impl DayDate {
    /// The day containing `timestamp` under the given timezone policy.
    ///
    /// All callers bucketing the same data must use the same timezone for
    /// their day boundaries to line up.
    #[must_use]
    pub fn from_timestamp(timestamp: DateTime<Utc>, tz: Tz) -> Self {
        Self(timestamp.with_timezone(&tz).date_naive())
    }

    /// The underlying calendar date.
    #[must_use]
    pub const fn as_naive_date(self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for DayDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for DayDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Start instant of the fixed-length epoch containing `timestamp`.
///
/// Epochs are aligned to the Unix epoch, so the start is the timestamp
/// floored to a multiple of `seconds_per_epoch`. Instants before 1970 floor
/// downward as well.
#[must_use]
pub fn epoch_start(timestamp: DateTime<Utc>, seconds_per_epoch: u32) -> DateTime<Utc> {
    let len = i64::from(seconds_per_epoch.max(1));
    let secs = timestamp.timestamp();
    let floored = secs - secs.rem_euclid(len);
    DateTime::from_timestamp(floored, 0).unwrap_or(timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_epoch_length_divides_day() {
        assert_eq!(SECONDS_PER_EPOCH, 900);
        assert_eq!(SECONDS_PER_EPOCH % WINDOW_SECS, 0);
    }

    #[test]
    fn test_epoch_start_floors_within_epoch() {
        let ts = Utc.with_ymd_and_hms(2020, 4, 1, 10, 7, 30).unwrap();
        let start = epoch_start(ts, SECONDS_PER_EPOCH);
        assert_eq!(start, Utc.with_ymd_and_hms(2020, 4, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_epoch_start_of_boundary_is_itself() {
        let ts = Utc.with_ymd_and_hms(2020, 4, 1, 10, 15, 0).unwrap();
        assert_eq!(epoch_start(ts, SECONDS_PER_EPOCH), ts);
    }

    #[test]
    fn test_epoch_start_drops_subsecond_precision() {
        let ts = DateTime::from_timestamp(36_450, 500_000_000).unwrap();
        let start = epoch_start(ts, SECONDS_PER_EPOCH);
        assert_eq!(start.timestamp(), 36_000);
        assert_eq!(start.timestamp_subsec_nanos(), 0);
    }

    #[test]
    fn test_epoch_start_before_unix_epoch_floors_downward() {
        let ts = DateTime::from_timestamp(-60, 0).unwrap();
        let start = epoch_start(ts, SECONDS_PER_EPOCH);
        assert_eq!(start.timestamp(), -900);
    }

    #[test]
    fn test_day_date_utc() {
        let ts = Utc.with_ymd_and_hms(2020, 4, 1, 23, 59, 59).unwrap();
        let day = DayDate::from_timestamp(ts, chrono_tz::UTC);
        assert_eq!(day.as_naive_date(), NaiveDate::from_ymd_opt(2020, 4, 1).unwrap());
    }

    #[test]
    fn test_day_date_respects_timezone_policy() {
        // 02:00 UTC on April 1st is still March 31st in New York (UTC-4).
        let ts = Utc.with_ymd_and_hms(2020, 4, 1, 2, 0, 0).unwrap();
        let day = DayDate::from_timestamp(ts, chrono_tz::America::New_York);
        assert_eq!(day.as_naive_date(), NaiveDate::from_ymd_opt(2020, 3, 31).unwrap());
    }

    #[test]
    fn test_day_date_display() {
        let day = DayDate::from(NaiveDate::from_ymd_opt(2020, 4, 1).unwrap());
        assert_eq!(day.to_string(), "2020-04-01");
    }
}
