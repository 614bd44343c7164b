//! Meeting room records.

use serde::{Deserialize, Serialize};

/// Floor label used when a provider knows nothing about a room's location.
pub const NO_LOCATION: &str = "No location";

/// A bookable meeting room.
///
/// Rooms are read-only snapshots: they are fetched per request and never
/// mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    /// Stable identifier. Falls back to the contact address when the
    /// provider has no natural id.
    pub id: String,
    /// Human-readable room name.
    pub display_name: String,
    /// Contact address of the room's calendar.
    pub email_address: String,
    /// Seating capacity.
    pub capacity: u32,
    /// Floor or location label.
    pub floor: String,
}

impl Room {
    /// Creates a new room with an unknown location and zero capacity.
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        email_address: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            email_address: email_address.into(),
            capacity: 0,
            floor: NO_LOCATION.to_string(),
        }
    }

    /// Builder method to set capacity.
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Builder method to set the floor label.
    pub fn with_floor(mut self, floor: impl Into<String>) -> Self {
        self.floor = floor.into();
        self
    }
}

/// Finds a room by id with a linear scan.
pub fn find_room<'a>(rooms: &'a [Room], id: &str) -> Option<&'a Room> {
    rooms.iter().find(|room| room.id == id)
}
