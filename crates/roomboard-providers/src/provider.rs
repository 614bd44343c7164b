//! RoomProvider trait definition.
//!
//! A [`RoomProvider`] is one backing source of room and event data. The
//! fixture set and the Microsoft Graph provider both implement it; the
//! [`Gateway`](crate::gateway::Gateway) picks one per call.

use std::future::Future;
use std::pin::Pin;

use roomboard_core::{Room, RoomEvent};

use crate::error::ProviderResult;

/// A boxed future for async trait methods.
///
/// Boxed futures keep the trait object-safe, so the gateway can choose a
/// source at runtime as `&dyn RoomProvider`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A `[start, end)` calendar query for one room.
///
/// Bounds are ISO-8601 strings handed through to the provider unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
    /// Room identifier, as returned by `list_rooms`.
    pub room_id: String,
    /// Inclusive lower bound.
    pub start: String,
    /// Exclusive upper bound.
    pub end: String,
}

impl EventQuery {
    /// Creates a new event query.
    pub fn new(
        room_id: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        Self {
            room_id: room_id.into(),
            start: start.into(),
            end: end.into(),
        }
    }
}

/// A source of rooms and their calendar events.
///
/// # Implementation Notes
///
/// - Implementations must be `Send + Sync`; one instance serves every request
/// - An unknown room id yields an empty list, never an error
/// - Upstream failures are returned as-is, without retries
pub trait RoomProvider: Send + Sync {
    /// Returns the name of this provider (e.g. "fixture", "graph").
    fn name(&self) -> &str;

    /// Lists the rooms visible to the bearer of `access_token`.
    fn list_rooms<'a>(&'a self, access_token: &'a str) -> BoxFuture<'a, ProviderResult<Vec<Room>>>;

    /// Lists the events booked in a room over the query window.
    fn list_room_events<'a>(
        &'a self,
        access_token: &'a str,
        query: &'a EventQuery,
    ) -> BoxFuture<'a, ProviderResult<Vec<RoomEvent>>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_query_creation() {
        let query = EventQuery::new("room-tokyo", "2025-02-03T08:00:00.000Z", "2025-02-09T23:59:59.999Z");
        assert_eq!(query.room_id, "room-tokyo");
        assert_eq!(query.start, "2025-02-03T08:00:00.000Z");
        assert_eq!(query.end, "2025-02-09T23:59:59.999Z");
    }
}
