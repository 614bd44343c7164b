//! Microsoft Graph API client.
//!
//! Low-level HTTP access to the two Graph resources the dashboard reads:
//! the room directory (`/places/microsoft.graph.room`) and a room mailbox's
//! `calendarView`. The caller's bearer token is passed on every call.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use roomboard_core::{NO_LOCATION, ORGANIZER_PLACEHOLDER, Room, RoomEvent};

use crate::error::{ProviderError, ProviderResult};

use super::config::GraphConfig;

/// Maximum number of rooms the dashboard shows.
pub const MAX_ROOMS: usize = 10;

const ROOM_FIELDS: &str = "id,displayName,capacity,displayDeviceName,floorNumber,emailAddress";
const EVENT_FIELDS: &str = "id,subject,start,end,organizer";

/// Microsoft Graph API client.
#[derive(Debug, Clone)]
pub struct GraphClient {
    http_client: reqwest::Client,
    api_base_url: String,
    room_emails: Vec<String>,
}

impl GraphClient {
    /// Creates a new client from the provider configuration.
    pub fn new(config: &GraphConfig) -> ProviderResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| {
                ProviderError::configuration(format!("failed to create HTTP client: {}", e))
                    .with_source(e)
            })?;

        Ok(Self {
            http_client,
            api_base_url: config.api_base_url.clone(),
            room_emails: config.room_emails.clone(),
        })
    }

    /// Builds the `$filter` expression for the room query.
    ///
    /// Addresses are OData string literals, so a `'` is doubled.
    pub fn room_filter(&self) -> String {
        if self.room_emails.is_empty() {
            return "placeId ne null".to_string();
        }
        self.room_emails
            .iter()
            .map(|email| format!("emailAddress/address eq '{}'", email.replace('\'', "''")))
            .collect::<Vec<_>>()
            .join(" or ")
    }

    /// Returns the room directory query URL.
    pub fn rooms_url(&self) -> String {
        format!(
            "{}/places/microsoft.graph.room?$select={}&$filter={}",
            self.api_base_url,
            ROOM_FIELDS,
            urlencoding::encode(&self.room_filter())
        )
    }

    /// Returns the calendar view URL for a room mailbox.
    pub fn calendar_view_url(&self, address: &str, start: &str, end: &str) -> String {
        format!(
            "{}/users/{}/calendarView?startDateTime={}&endDateTime={}&$select={}",
            self.api_base_url,
            urlencoding::encode(address),
            urlencoding::encode(start),
            urlencoding::encode(end),
            EVENT_FIELDS
        )
    }

    /// Lists room resources, capped at [`MAX_ROOMS`].
    pub async fn list_rooms(&self, access_token: &str) -> ProviderResult<Vec<Room>> {
        let list: Collection<ApiRoom> = self.get_json(access_token, &self.rooms_url()).await?;
        let rooms: Vec<Room> = list
            .value
            .unwrap_or_default()
            .into_iter()
            .take(MAX_ROOMS)
            .map(ApiRoom::into_room)
            .collect();

        debug!("fetched {} rooms", rooms.len());
        Ok(rooms)
    }

    /// Lists the events in a room mailbox over `[start, end)`.
    pub async fn list_calendar_view(
        &self,
        access_token: &str,
        address: &str,
        start: &str,
        end: &str,
    ) -> ProviderResult<Vec<RoomEvent>> {
        let url = self.calendar_view_url(address, start, end);
        let list: Collection<ApiEvent> = self.get_json(access_token, &url).await?;
        let events: Vec<RoomEvent> = list
            .value
            .unwrap_or_default()
            .into_iter()
            .map(ApiEvent::into_event)
            .collect();

        debug!("fetched {} events for {}", events.len(), address);
        Ok(events)
    }

    /// Issues an authenticated GET and parses the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, access_token: &str, url: &str) -> ProviderResult<T> {
        let response = self
            .http_client
            .get(url)
            .bearer_auth(access_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ProviderError::network(format!("failed to read response: {}", e)).with_source(e)
        })?;

        if !status.is_success() {
            return Err(ProviderError::from_status(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("failed to parse response: {}", e))
                .with_status(status.as_u16())
                .with_source(e)
        })
    }
}

/// Maps a transport failure to a network error.
pub(crate) fn map_send_error(e: reqwest::Error) -> ProviderError {
    let message = if e.is_timeout() {
        "request timeout".to_string()
    } else if e.is_connect() {
        format!("connection failed: {}", e)
    } else {
        format!("request failed: {}", e)
    };
    ProviderError::network(message).with_source(e)
}

// Graph API response types

#[derive(Debug, Deserialize)]
struct Collection<T> {
    value: Option<Vec<T>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiRoom {
    id: Option<String>,
    display_name: Option<String>,
    email_address: Option<String>,
    capacity: Option<i64>,
    display_device_name: Option<String>,
    floor_number: Option<i64>,
}

impl ApiRoom {
    fn into_room(self) -> Room {
        let email = self.email_address.unwrap_or_default();
        let id = self
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| email.clone());

        let floor = match (self.floor_number, self.display_device_name) {
            (Some(n), _) if n != 0 => format!("Floor {}", n),
            (_, Some(name)) if !name.is_empty() => name,
            _ => NO_LOCATION.to_string(),
        };

        let capacity = self
            .capacity
            .map(|c| u32::try_from(c.max(0)).unwrap_or(u32::MAX))
            .unwrap_or(0);

        Room::new(id, self.display_name.unwrap_or_default(), email)
            .with_capacity(capacity)
            .with_floor(floor)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEvent {
    id: Option<String>,
    subject: Option<String>,
    start: Option<ApiDateTime>,
    end: Option<ApiDateTime>,
    organizer: Option<ApiRecipient>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiDateTime {
    date_time: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiRecipient {
    email_address: Option<ApiEmailAddress>,
}

#[derive(Debug, Deserialize)]
struct ApiEmailAddress {
    name: Option<String>,
}

impl ApiEvent {
    /// Subject and timestamps stay `None` when absent; a missing id maps to
    /// `""` because the event shape always carries a string id.
    fn into_event(self) -> RoomEvent {
        let organizer = self
            .organizer
            .and_then(|o| o.email_address)
            .and_then(|e| e.name)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| ORGANIZER_PLACEHOLDER.to_string());

        RoomEvent {
            id: self.id.unwrap_or_default(),
            subject: self.subject,
            organizer,
            start: self.start.and_then(|t| t.date_time),
            end: self.end.and_then(|t| t.date_time),
        }
    }
}
