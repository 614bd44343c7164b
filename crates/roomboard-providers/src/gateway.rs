//! Provider gateway.
//!
//! The [`Gateway`] is what the HTTP layer talks to. It owns both sources and
//! decides, on every call, whether to answer from fixtures or from the live
//! directory. The decision is a single flag fixed at startup.

use tracing::{debug, instrument};

use roomboard_core::{Room, RoomEvent};

use crate::error::{ProviderError, ProviderResult};
use crate::fixture::FixtureProvider;
use crate::graph::{AuthorizationRequest, GraphConfig, GraphProvider};
use crate::provider::{EventQuery, RoomProvider};

/// Uniform room/event access over the fixture and live sources.
#[derive(Debug, Clone)]
pub struct Gateway {
    enabled: bool,
    fixtures: FixtureProvider,
    live: GraphProvider,
    missing_settings: Vec<&'static str>,
}

impl Gateway {
    /// Creates a gateway.
    ///
    /// When `enabled` is false the live provider is built but never called.
    pub fn new(enabled: bool, fixtures: FixtureProvider, config: GraphConfig) -> ProviderResult<Self> {
        let missing_settings = config.missing_settings();
        let live = GraphProvider::new(config)?;
        Ok(Self {
            enabled,
            fixtures,
            live,
            missing_settings,
        })
    }

    /// Returns true when requests go to the live provider.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Lists required live settings that are blank.
    ///
    /// Always empty while the live provider is disabled.
    pub fn missing_settings(&self) -> &[&'static str] {
        if self.enabled {
            &self.missing_settings
        } else {
            &[]
        }
    }

    /// Returns the source that serves data requests.
    fn source(&self) -> &dyn RoomProvider {
        if self.enabled {
            &self.live
        } else {
            &self.fixtures
        }
    }

    /// Lists rooms.
    #[instrument(skip(self, access_token), fields(source = tracing::field::Empty))]
    pub async fn list_rooms(&self, access_token: &str) -> ProviderResult<Vec<Room>> {
        let source = self.source();
        tracing::Span::current().record("source", source.name());
        source.list_rooms(access_token).await
    }

    /// Lists a room's events over `[start, end)`.
    ///
    /// An unknown room id yields an empty list.
    #[instrument(skip(self, access_token, start, end), fields(source = tracing::field::Empty))]
    pub async fn list_room_events(
        &self,
        access_token: &str,
        room_id: &str,
        start: &str,
        end: &str,
    ) -> ProviderResult<Vec<RoomEvent>> {
        let source = self.source();
        tracing::Span::current().record("source", source.name());
        let query = EventQuery::new(room_id, start, end);
        let events = source.list_room_events(access_token, &query).await?;
        debug!(count = events.len(), "listed room events");
        Ok(events)
    }

    /// Builds the OAuth authorize URL.
    pub fn authorization_url(&self) -> ProviderResult<AuthorizationRequest> {
        if !self.enabled {
            return Err(disabled());
        }
        self.live.authorization_url()
    }

    /// Exchanges an authorization code for an access token.
    pub async fn exchange_code_for_token(&self, code: &str) -> ProviderResult<String> {
        if !self.enabled {
            return Err(disabled());
        }
        self.live.exchange_code(code).await
    }
}

fn disabled() -> ProviderError {
    ProviderError::configuration("Microsoft Graph is disabled")
}
