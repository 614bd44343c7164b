//! Calendar events booked in a room.
//!
//! [`RoomEvent`] keeps the provider's timestamps exactly as received so
//! that upstream data passes through unchanged. Parsing happens lazily, when
//! something (the occupancy engine, mostly) needs an instant.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::time::parse_timestamp;

/// Organizer label used when a provider does not report one.
pub const ORGANIZER_PLACEHOLDER: &str = "No organizer";

/// A read-only calendar event belonging to one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomEvent {
    /// Provider-specific event identifier.
    ///
    /// Always serialized as a string; an event the provider sent without an
    /// id carries `""`. Nothing looks events up by id, so the empty value
    /// never collides with a real one.
    pub id: String,
    /// Event title. `None` when the provider omitted it.
    pub subject: Option<String>,
    /// Human-readable organizer name.
    pub organizer: String,
    /// Start timestamp (ISO-8601), as received.
    pub start: Option<String>,
    /// End timestamp (ISO-8601), as received.
    pub end: Option<String>,
}

impl RoomEvent {
    /// Creates a new event with the placeholder organizer.
    pub fn new(
        id: impl Into<String>,
        subject: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            subject: Some(subject.into()),
            organizer: ORGANIZER_PLACEHOLDER.to_string(),
            start: Some(start.into()),
            end: Some(end.into()),
        }
    }

    /// Creates a new event from UTC instants.
    pub fn from_instants(
        id: impl Into<String>,
        subject: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self::new(
            id,
            subject,
            crate::time::to_iso_string(&start),
            crate::time::to_iso_string(&end),
        )
    }

    /// Builder method to set the organizer.
    pub fn with_organizer(mut self, organizer: impl Into<String>) -> Self {
        self.organizer = organizer.into();
        self
    }

    /// Returns the parsed start instant, if the timestamp is readable.
    pub fn start_at(&self) -> Option<DateTime<Utc>> {
        self.start.as_deref().and_then(parse_timestamp)
    }

    /// Returns the parsed end instant, if the timestamp is readable.
    pub fn end_at(&self) -> Option<DateTime<Utc>> {
        self.end.as_deref().and_then(parse_timestamp)
    }

    /// Returns the event duration.
    ///
    /// Negative when the end precedes the start; `None` when either
    /// timestamp is unreadable.
    pub fn duration(&self) -> Option<Duration> {
        Some(self.end_at()? - self.start_at()?)
    }

    /// Checks if the event is in progress at `now`.
    ///
    /// Both bounds are strict: an event is not in progress at the exact
    /// instant it starts or ends.
    pub fn is_ongoing_at(&self, now: DateTime<Utc>) -> bool {
        match (self.start_at(), self.end_at()) {
            (Some(start), Some(end)) => start < now && now < end,
            _ => false,
        }
    }

    /// Checks if the event starts strictly after `now`.
    pub fn starts_after(&self, now: DateTime<Utc>) -> bool {
        self.start_at().is_some_and(|start| start > now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 5, h, min, 0).unwrap()
    }

    #[test]
    fn defaults_to_placeholder_organizer() {
        let event = RoomEvent::new("1", "Standup", "2025-02-05T09:00:00Z", "2025-02-05T09:15:00Z");
        assert_eq!(event.organizer, ORGANIZER_PLACEHOLDER);
        let event = event.with_organizer("M. Rivera");
        assert_eq!(event.organizer, "M. Rivera");
    }

    #[test]
    fn parses_timestamps_lazily() {
        let event = RoomEvent::new("1", "Standup", "2025-02-05T09:00:00Z", "not a date");
        assert_eq!(event.start_at(), Some(utc(9, 0)));
        assert_eq!(event.end_at(), None);
        assert_eq!(event.duration(), None);
        assert_eq!(event.end.as_deref(), Some("not a date"));
    }

    #[test]
    fn reversed_interval_has_negative_duration() {
        let event = RoomEvent::from_instants("1", "Oops", utc(10, 0), utc(9, 0));
        assert_eq!(event.duration(), Some(Duration::hours(-1)));
        assert!(!event.is_ongoing_at(utc(9, 30)));
    }

    #[test]
    fn ongoing_bounds_are_strict() {
        let event = RoomEvent::from_instants("1", "Review", utc(10, 0), utc(11, 0));
        assert!(!event.is_ongoing_at(utc(10, 0)));
        assert!(event.is_ongoing_at(utc(10, 30)));
        assert!(!event.is_ongoing_at(utc(11, 0)));
    }

    #[test]
    fn missing_fields_serialize_as_null() {
        let event = RoomEvent {
            id: "x".to_string(),
            subject: None,
            organizer: ORGANIZER_PLACEHOLDER.to_string(),
            start: None,
            end: None,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert!(json["subject"].is_null());
        assert!(json["start"].is_null());
        assert_eq!(json["organizer"], "No organizer");
    }
}
