//! Shared application state.

use std::sync::Arc;

use roomboard_core::OccupancyWindow;
use roomboard_providers::Gateway;

use crate::notice::NoticeStore;

/// State shared by every handler.
///
/// Everything except the notice is fixed at startup.
#[derive(Debug, Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
    pub notice: Arc<NoticeStore>,
    pub occupancy: OccupancyWindow,
}

impl AppState {
    /// Creates application state.
    pub fn new(gateway: Gateway, notice: impl Into<String>, occupancy: OccupancyWindow) -> Self {
        Self {
            gateway: Arc::new(gateway),
            notice: Arc::new(NoticeStore::new(notice)),
            occupancy,
        }
    }
}
