//! Microsoft Graph RoomProvider implementation.

use tracing::debug;

use roomboard_core::{Room, RoomEvent, find_room};

use crate::error::ProviderResult;
use crate::provider::{BoxFuture, EventQuery, RoomProvider};

use super::client::GraphClient;
use super::config::GraphConfig;
use super::oauth::{AuthorizationRequest, OAuthClient};

/// Provider name reported by the Graph source.
pub const GRAPH_PROVIDER_NAME: &str = "graph";

/// Room provider backed by Microsoft Graph.
///
/// Holds no token state: every call carries the caller's bearer token.
#[derive(Debug, Clone)]
pub struct GraphProvider {
    client: GraphClient,
    oauth: OAuthClient,
}

impl GraphProvider {
    /// Creates a new Graph provider.
    pub fn new(config: GraphConfig) -> ProviderResult<Self> {
        let client = GraphClient::new(&config)?;
        let oauth = OAuthClient::new(config)?;
        Ok(Self { client, oauth })
    }

    /// Builds the OAuth authorize URL.
    pub fn authorization_url(&self) -> ProviderResult<AuthorizationRequest> {
        self.oauth
            .authorization_url()
            .map_err(|e| e.with_provider(GRAPH_PROVIDER_NAME))
    }

    /// Exchanges an authorization code for an access token.
    pub async fn exchange_code(&self, code: &str) -> ProviderResult<String> {
        self.oauth
            .exchange_code(code)
            .await
            .map_err(|e| e.with_provider(GRAPH_PROVIDER_NAME))
    }
}

impl RoomProvider for GraphProvider {
    fn name(&self) -> &str {
        GRAPH_PROVIDER_NAME
    }

    fn list_rooms<'a>(&'a self, access_token: &'a str) -> BoxFuture<'a, ProviderResult<Vec<Room>>> {
        Box::pin(async move {
            self.client
                .list_rooms(access_token)
                .await
                .map_err(|e| e.with_provider(GRAPH_PROVIDER_NAME))
        })
    }

    fn list_room_events<'a>(
        &'a self,
        access_token: &'a str,
        query: &'a EventQuery,
    ) -> BoxFuture<'a, ProviderResult<Vec<RoomEvent>>> {
        Box::pin(async move {
            let rooms = self.list_rooms(access_token).await?;
            let Some(room) = find_room(&rooms, &query.room_id) else {
                debug!(room_id = %query.room_id, "room not in directory, no events");
                return Ok(Vec::new());
            };

            self.client
                .list_calendar_view(access_token, &room.email_address, &query.start, &query.end)
                .await
                .map_err(|e| e.with_provider(GRAPH_PROVIDER_NAME))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;
    use crate::graph::config::OAuthCredentials;
    use crate::testing::CannedServer;

    const ROOMS: &str = r#"{"value":[
        {"id":"r-tokyo","displayName":"Tokyo","emailAddress":"tokyo@contoso.com","capacity":12,"floorNumber":4},
        {"id":"r-oslo","displayName":"Oslo","emailAddress":"oslo@contoso.com"}
    ]}"#;

    fn provider_for(base_url: &str) -> GraphProvider {
        let config = GraphConfig::new("tenant", OAuthCredentials::new("id", "secret"), "http://cb")
            .with_api_base_url(base_url);
        GraphProvider::new(config).unwrap()
    }

    #[tokio::test]
    async fn events_resolve_room_address() {
        let events = r#"{"value":[{"id":"e1","subject":"Sync","start":{"dateTime":"2025-02-04T10:00:00"},"end":{"dateTime":"2025-02-04T11:00:00"}}]}"#;
        let server = CannedServer::start(vec![
            (200, ROOMS.to_string()),
            (200, events.to_string()),
        ])
        .await;
        let provider = provider_for(&server.base_url);

        let query = EventQuery::new("r-oslo", "2025-02-03T08:00:00Z", "2025-02-10T00:00:00Z");
        let result = provider.list_room_events("t", &query).await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].subject.as_deref(), Some("Sync"));

        let requests = server.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[1].starts_with("GET /users/oslo%40contoso.com/calendarView?"));
    }

    #[tokio::test]
    async fn unknown_room_makes_one_call() {
        let server = CannedServer::start(vec![(200, ROOMS.to_string())]).await;
        let provider = provider_for(&server.base_url);

        let query = EventQuery::new("r-missing", "s", "e");
        let result = provider.list_room_events("t", &query).await.unwrap();
        assert!(result.is_empty());
        assert_eq!(server.requests().len(), 1);
    }

    #[tokio::test]
    async fn room_lookup_failure_propagates() {
        let server = CannedServer::start(vec![(503, "unavailable".to_string())]).await;
        let provider = provider_for(&server.base_url);

        let query = EventQuery::new("r-tokyo", "s", "e");
        let err = provider.list_room_events("t", &query).await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::ServerError);
        assert_eq!(err.provider(), Some(GRAPH_PROVIDER_NAME));
    }
}
