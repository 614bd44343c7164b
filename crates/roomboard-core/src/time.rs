//! Time helpers for room calendars.
//!
//! This module provides [`TimeWindow`] for defining half-open query ranges,
//! [`week_window`] for the dashboard's display week, and
//! [`parse_timestamp`] for reading the ISO-8601 strings carried by events.

use chrono::{
    DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone,
    Utc,
};
use serde::{Deserialize, Serialize};

/// Hour of the day at which the display week starts on Monday.
pub const DISPLAY_DAY_START_HOUR: u32 = 8;

/// Parses an ISO-8601 timestamp.
///
/// Timestamps carrying an offset are read as RFC 3339. Timestamps without an
/// offset (the `2024-03-15T10:00:00.0000000` form calendar APIs return) are
/// read as UTC. Returns `None` for anything else.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Formats a UTC instant the way browsers serialize dates
/// (`2025-02-03T08:00:00.000Z`).
pub fn to_iso_string(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// A time window for querying room calendars.
///
/// Represents a half-open interval `[start, end)` in UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Start of the window (inclusive).
    pub start: DateTime<Utc>,
    /// End of the window (exclusive).
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Creates a new time window.
    ///
    /// # Panics
    ///
    /// Panics if `start` is after `end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        assert!(start <= end, "TimeWindow start must be <= end");
        Self { start, end }
    }

    /// Returns the duration of this time window.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Checks if a datetime falls within this window.
    ///
    /// Uses half-open interval semantics: `[start, end)`.
    pub fn contains(&self, dt: DateTime<Utc>) -> bool {
        self.start <= dt && dt < self.end
    }

    /// Returns the window bounds as ISO-8601 strings, ready for a
    /// `start`/`end` query.
    pub fn to_iso_bounds(&self) -> (String, String) {
        (to_iso_string(&self.start), to_iso_string(&self.end))
    }
}

/// Returns the display week containing `now`.
///
/// The week starts on Monday at [`DISPLAY_DAY_START_HOUR`] in `now`'s
/// timezone and ends six days later at 23:59:59.999.
pub fn week_window<Tz: TimeZone>(now: &DateTime<Tz>) -> TimeWindow {
    let tz = now.timezone();
    let monday = monday_of(now.date_naive());
    let start_time = NaiveTime::from_hms_opt(DISPLAY_DAY_START_HOUR, 0, 0).unwrap_or(NaiveTime::MIN);
    let end_time = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);

    let start = resolve_local(&tz, monday.and_time(start_time));
    let end = resolve_local(&tz, (monday + Duration::days(6)).and_time(end_time));
    TimeWindow::new(start, end)
}

/// Returns the Monday on or before `date`.
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Resolves a wall-clock time in `tz` to UTC.
///
/// Ambiguous times (DST fall-back) take the earliest instant. Times that do
/// not exist (DST spring-forward gap) are read as UTC.
pub fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    mod timestamps {
        use super::*;

        #[test]
        fn rfc3339_with_offset() {
            assert_eq!(
                parse_timestamp("2025-02-05T10:30:00-06:00"),
                Some(utc(2025, 2, 5, 16, 30, 0))
            );
            assert_eq!(
                parse_timestamp("2025-02-05T10:30:00.000Z"),
                Some(utc(2025, 2, 5, 10, 30, 0))
            );
        }

        #[test]
        fn offsetless_is_utc() {
            assert_eq!(
                parse_timestamp("2025-02-05T10:30:00.0000000"),
                Some(utc(2025, 2, 5, 10, 30, 0))
            );
            assert_eq!(
                parse_timestamp("2025-02-05T10:30:00"),
                Some(utc(2025, 2, 5, 10, 30, 0))
            );
        }

        #[test]
        fn garbage_is_none() {
            assert_eq!(parse_timestamp(""), None);
            assert_eq!(parse_timestamp("tomorrow"), None);
            assert_eq!(parse_timestamp("2025-02-05"), None);
        }

        #[test]
        fn iso_string_matches_browser_format() {
            assert_eq!(
                to_iso_string(&utc(2025, 2, 3, 8, 0, 0)),
                "2025-02-03T08:00:00.000Z"
            );
        }
    }

    mod time_window {
        use super::*;

        #[test]
        fn creation() {
            let start = utc(2025, 2, 5, 9, 0, 0);
            let end = utc(2025, 2, 5, 17, 0, 0);
            let window = TimeWindow::new(start, end);
            assert_eq!(window.start, start);
            assert_eq!(window.end, end);
            assert_eq!(window.duration(), Duration::hours(8));
        }

        #[test]
        #[should_panic(expected = "start must be <= end")]
        fn invalid_window() {
            TimeWindow::new(utc(2025, 2, 5, 17, 0, 0), utc(2025, 2, 5, 9, 0, 0));
        }

        #[test]
        fn contains_is_half_open() {
            let window = TimeWindow::new(utc(2025, 2, 5, 9, 0, 0), utc(2025, 2, 5, 17, 0, 0));

            assert!(window.contains(utc(2025, 2, 5, 10, 0, 0)));
            assert!(window.contains(utc(2025, 2, 5, 9, 0, 0)));
            assert!(!window.contains(utc(2025, 2, 5, 17, 0, 0)));
            assert!(!window.contains(utc(2025, 2, 5, 8, 59, 59)));
        }

        #[test]
        fn iso_bounds() {
            let window = TimeWindow::new(utc(2025, 2, 3, 8, 0, 0), utc(2025, 2, 9, 23, 0, 0));
            let (start, end) = window.to_iso_bounds();
            assert_eq!(start, "2025-02-03T08:00:00.000Z");
            assert_eq!(end, "2025-02-09T23:00:00.000Z");
        }
    }

    mod week {
        use super::*;

        #[test]
        fn monday_of_each_weekday() {
            // 2025-02-03 is a Monday.
            for day in 3..=9 {
                assert_eq!(monday_of(date(2025, 2, day)), date(2025, 2, 3));
            }
            assert_eq!(monday_of(date(2025, 2, 10)), date(2025, 2, 10));
        }

        #[test]
        fn week_window_in_utc() {
            let now = utc(2025, 2, 6, 14, 0, 0); // Thursday
            let window = week_window(&now);
            assert_eq!(window.start, utc(2025, 2, 3, 8, 0, 0));
            assert_eq!(
                window.end,
                utc(2025, 2, 9, 23, 59, 59) + Duration::milliseconds(999)
            );
        }

        #[test]
        fn week_window_respects_timezone() {
            let tz = FixedOffset::west_opt(6 * 3600).unwrap();
            // Monday 2025-02-03 01:00 UTC is still Sunday evening at UTC-6.
            let now = utc(2025, 2, 3, 1, 0, 0).with_timezone(&tz);
            let window = week_window(&now);
            // Monday 2025-01-27 08:00 at UTC-6.
            assert_eq!(window.start, utc(2025, 1, 27, 14, 0, 0));
        }

        #[test]
        fn week_window_on_monday_before_opening() {
            let now = utc(2025, 2, 3, 6, 0, 0);
            let window = week_window(&now);
            assert_eq!(window.start, utc(2025, 2, 3, 8, 0, 0));
            assert!(!window.contains(now));
        }
    }
}
