//! Static fixture data, served when the live provider is disabled.
//!
//! The room list is fixed. Events are laid out on the week containing the
//! reference instant given to [`FixtureProvider::for_week_of`], so the
//! dashboard always has something to show for "this week".

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveTime, TimeZone};
use tracing::debug;

use roomboard_core::time::{monday_of, resolve_local};
use roomboard_core::{Room, RoomEvent};

use crate::error::ProviderResult;
use crate::provider::{BoxFuture, EventQuery, RoomProvider};

/// Provider name reported by the fixture source.
pub const FIXTURE_PROVIDER_NAME: &str = "fixture";

/// One scheduled fixture meeting: (day offset from Monday, start hour,
/// duration in minutes, subject, organizer).
type FixtureSlot = (i64, u32, i64, &'static str, &'static str);

const TOKYO_WEEK: &[FixtureSlot] = &[
    (0, 9, 60, "Sprint Planning", "Tech Team"),
    (1, 8, 120, "Global Daily Sync", "M. Rivera"),
    (2, 10, 120, "Design Workshop", "Whole Room"),
    (3, 9, 120, "Client Call: Project X", "International Conf."),
    (4, 8, 120, "Weekly Planning", "Marketing Team"),
    (4, 16, 60, "UX Review", "Product"),
];

/// Returns the fixture room list.
pub fn fixture_rooms() -> Vec<Room> {
    [
        ("room-tokyo", "Tokyo Room", "room.tokyo", 12, 4),
        ("room-berlin", "Berlin Room", "room.berlin", 8, 2),
        ("room-nairobi", "Nairobi Room", "room.nairobi", 10, 3),
        ("room-lisbon", "Lisbon Room", "room.lisbon", 6, 1),
        ("room-bogota", "Bogotá Room", "room.bogota", 14, 6),
        ("room-dublin", "Dublin Room", "room.dublin", 8, 2),
        ("room-madrid", "Madrid Room", "room.madrid", 10, 5),
        ("room-rome", "Rome Room", "room.rome", 5, 1),
        ("room-oslo", "Oslo Room", "room.oslo", 9, 3),
        ("room-vancouver", "Vancouver Room", "room.vancouver", 16, 7),
    ]
    .into_iter()
    .map(|(id, name, mailbox, capacity, floor)| {
        Room::new(id, name, format!("{}@contoso.com", mailbox))
            .with_capacity(capacity)
            .with_floor(format!("Floor {}", floor))
    })
    .collect()
}

/// Returns the fixture events, keyed by room id, for the week containing
/// `reference`.
pub fn fixture_events<Tz: TimeZone>(reference: &DateTime<Tz>) -> HashMap<String, Vec<RoomEvent>> {
    let tz = reference.timezone();
    let monday = monday_of(reference.date_naive());

    let tokyo = TOKYO_WEEK
        .iter()
        .map(|&(day_offset, hour, minutes, subject, organizer)| {
            let day = monday + Duration::days(day_offset);
            let start_time = NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN);
            let start = resolve_local(&tz, day.and_time(start_time));
            let end = start + Duration::minutes(minutes);
            RoomEvent::from_instants(
                format!("{}-{}-{}", subject, day_offset, hour),
                subject,
                start,
                end,
            )
            .with_organizer(organizer)
        })
        .collect();

    HashMap::from([("room-tokyo".to_string(), tokyo)])
}

/// Serves rooms and events from memory.
///
/// Built once at startup and never mutated, so it can be shared freely.
#[derive(Debug, Clone)]
pub struct FixtureProvider {
    rooms: Vec<Room>,
    events: HashMap<String, Vec<RoomEvent>>,
}

impl FixtureProvider {
    /// Creates a fixture provider over explicit data.
    pub fn new(rooms: Vec<Room>, events: HashMap<String, Vec<RoomEvent>>) -> Self {
        Self { rooms, events }
    }

    /// Creates the stock fixture set, with events on the week of `reference`.
    pub fn for_week_of<Tz: TimeZone>(reference: &DateTime<Tz>) -> Self {
        Self::new(fixture_rooms(), fixture_events(reference))
    }

    /// Returns the fixture events for a room; empty for an unknown id.
    pub fn events_for(&self, room_id: &str) -> &[RoomEvent] {
        self.events.get(room_id).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl RoomProvider for FixtureProvider {
    fn name(&self) -> &str {
        FIXTURE_PROVIDER_NAME
    }

    fn list_rooms<'a>(&'a self, _access_token: &'a str) -> BoxFuture<'a, ProviderResult<Vec<Room>>> {
        Box::pin(async move { Ok(self.rooms.clone()) })
    }

    fn list_room_events<'a>(
        &'a self,
        _access_token: &'a str,
        query: &'a EventQuery,
    ) -> BoxFuture<'a, ProviderResult<Vec<RoomEvent>>> {
        Box::pin(async move {
            let events = self.events_for(&query.room_id).to_vec();
            debug!(room_id = %query.room_id, count = events.len(), "serving fixture events");
            Ok(events)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, FixedOffset, Timelike, Utc, Weekday};

    fn reference() -> DateTime<Utc> {
        // Wednesday.
        Utc.with_ymd_and_hms(2025, 2, 5, 12, 0, 0).unwrap()
    }

    #[test]
    fn ten_unique_rooms() {
        let rooms = fixture_rooms();
        assert_eq!(rooms.len(), 10);
        let mut ids: Vec<_> = rooms.iter().map(|r| r.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 10);
        assert!(rooms.iter().all(|r| r.email_address.ends_with("@contoso.com")));
    }

    #[test]
    fn tokyo_events_land_on_reference_week() {
        let events = fixture_events(&reference());
        let tokyo = &events["room-tokyo"];
        assert_eq!(tokyo.len(), 6);

        let first = tokyo[0].start_at().unwrap();
        assert_eq!(first.weekday(), Weekday::Mon);
        assert_eq!(first.day(), 3);
        assert_eq!(first.hour(), 9);
        assert_eq!(tokyo[0].id, "Sprint Planning-0-9");
        assert_eq!(tokyo[0].organizer, "Tech Team");

        let last = tokyo[5].start_at().unwrap();
        assert_eq!(last.weekday(), Weekday::Fri);
        assert_eq!(last.hour(), 16);
    }

    #[test]
    fn slots_are_whole_hours() {
        let events = fixture_events(&reference());
        let minutes: Vec<_> = events["room-tokyo"]
            .iter()
            .map(|e| e.duration().map(|d| d.num_minutes()))
            .collect();
        assert_eq!(
            minutes,
            [60, 120, 120, 120, 120, 60].map(Some).to_vec()
        );
        let total: i64 = minutes.iter().flatten().sum();
        assert_eq!(total, 600);
    }

    #[test]
    fn events_use_reference_timezone() {
        let tz = FixedOffset::west_opt(6 * 3600).unwrap();
        let events = fixture_events(&reference().with_timezone(&tz));
        let first = events["room-tokyo"][0].start_at().unwrap();
        // 09:00 at UTC-6.
        assert_eq!(first.hour(), 15);
    }

    #[tokio::test]
    async fn lists_rooms_regardless_of_token() {
        let provider = FixtureProvider::for_week_of(&reference());
        let anonymous = provider.list_rooms("").await.unwrap();
        let with_token = provider.list_rooms("some-token").await.unwrap();
        assert_eq!(anonymous, fixture_rooms());
        assert_eq!(with_token, fixture_rooms());
    }

    #[tokio::test]
    async fn unknown_room_has_no_events() {
        let provider = FixtureProvider::for_week_of(&reference());
        for room_id in ["room-berlin", "no-such-room", ""] {
            let query = EventQuery::new(room_id, "a", "b");
            let events = provider.list_room_events("", &query).await.unwrap();
            assert!(events.is_empty(), "room {:?}", room_id);
        }
    }

    #[tokio::test]
    async fn known_room_events_ignore_window() {
        let provider = FixtureProvider::for_week_of(&reference());
        let query = EventQuery::new("room-tokyo", "1999-01-01T00:00:00Z", "1999-01-02T00:00:00Z");
        let events = provider.list_room_events("", &query).await.unwrap();
        assert_eq!(events.len(), 6);
    }
}
