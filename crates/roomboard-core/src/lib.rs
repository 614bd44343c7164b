//! Core types: rooms, events, time windows, occupancy

pub mod event;
pub mod occupancy;
pub mod room;
pub mod time;
pub mod tracing;

pub use event::{ORGANIZER_PLACEHOLDER, RoomEvent};
pub use occupancy::{
    OccupancySnapshot, OccupancyWindow, current_event, next_event, weekly_occupancy_percent,
    weekly_occupancy_percent_in,
};
pub use room::{NO_LOCATION, Room, find_room};
pub use time::{TimeWindow, parse_timestamp, to_iso_string, week_window};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
