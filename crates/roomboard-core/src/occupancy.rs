//! Occupancy engine: current meeting, next meeting and weekly occupancy.
//!
//! Every function here is pure. The reference instant is always passed in by
//! the caller; nothing in this module reads the system clock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::RoomEvent;

/// The span of time the weekly occupancy percentage is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OccupancyWindow {
    /// Days per week shown on the dashboard.
    pub days: u32,
    /// Display hours per day.
    pub hours_per_day: u32,
}

impl OccupancyWindow {
    /// Seven days of ten display hours: 4200 minutes.
    pub const DEFAULT: Self = Self {
        days: 7,
        hours_per_day: 10,
    };

    /// Total minutes in the window.
    pub fn total_minutes(&self) -> u64 {
        u64::from(self.days) * u64::from(self.hours_per_day) * 60
    }
}

impl Default for OccupancyWindow {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Display-ready status of a room at a given instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupancySnapshot {
    /// The meeting in progress, if any.
    pub current_event: Option<RoomEvent>,
    /// The next meeting to start, if any.
    pub next_event: Option<RoomEvent>,
    /// Booked share of the occupancy window, in percent.
    pub occupancy_percent: i64,
}

impl OccupancySnapshot {
    /// Computes the snapshot against the default occupancy window.
    pub fn compute(events: &[RoomEvent], now: DateTime<Utc>) -> Self {
        Self::compute_in(events, now, OccupancyWindow::DEFAULT)
    }

    /// Computes the snapshot against an explicit occupancy window.
    pub fn compute_in(events: &[RoomEvent], now: DateTime<Utc>, window: OccupancyWindow) -> Self {
        Self {
            current_event: current_event(events, now).cloned(),
            next_event: next_event(events, now).cloned(),
            occupancy_percent: weekly_occupancy_percent_in(events, window),
        }
    }

    /// Returns true if a meeting is in progress.
    pub fn is_busy(&self) -> bool {
        self.current_event.is_some()
    }
}

/// Returns the first event, in list order, with `start < now < end`.
pub fn current_event(events: &[RoomEvent], now: DateTime<Utc>) -> Option<&RoomEvent> {
    events.iter().find(|event| event.is_ongoing_at(now))
}

/// Returns the earliest event starting strictly after `now`.
///
/// Ties go to the event that appears first in the list.
pub fn next_event(events: &[RoomEvent], now: DateTime<Utc>) -> Option<&RoomEvent> {
    events
        .iter()
        .filter(|event| event.starts_after(now))
        .filter_map(|event| event.start_at().map(|start| (start, event)))
        .min_by_key(|(start, _)| *start)
        .map(|(_, event)| event)
}

/// Weekly occupancy against the default 4200-minute window.
pub fn weekly_occupancy_percent(events: &[RoomEvent]) -> i64 {
    weekly_occupancy_percent_in(events, OccupancyWindow::DEFAULT)
}

/// Sums every event's duration and expresses it as a rounded percentage of
/// `window`.
///
/// Events are not filtered, clipped or deduplicated: the caller supplies
/// exactly the week it wants measured. Unreadable timestamps contribute
/// nothing; reversed intervals contribute a negative duration. Halves round
/// toward positive infinity.
pub fn weekly_occupancy_percent_in(events: &[RoomEvent], window: OccupancyWindow) -> i64 {
    let total_minutes = window.total_minutes();
    if total_minutes == 0 {
        return 0;
    }

    let busy_minutes: f64 = events
        .iter()
        .filter_map(RoomEvent::duration)
        .map(|duration| duration.num_milliseconds() as f64 / 60_000.0)
        .sum();

    let percent = busy_minutes / total_minutes as f64 * 100.0;
    (percent + 0.5).floor() as i64
}
