//! HTTP handlers.

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::routing::{get, post};
use chrono::{DateTime, FixedOffset, Local, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use roomboard_core::{OccupancySnapshot, Room, RoomEvent, week_window};
use roomboard_providers::AuthorizationRequest;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

const GRAPH_DISABLED: &str = "Microsoft Graph is disabled. Set GRAPH_ENABLED=true.";

/// Builds the `/api` routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/auth/url", get(auth_url))
        .route("/api/auth/exchange", post(auth_exchange))
        .route("/api/rooms", get(list_rooms))
        .route("/api/rooms/{room_id}/events", get(list_room_events))
        .route("/api/rooms/{room_id}/status", get(room_status))
        .route("/api/settings/notice", get(get_notice).put(put_notice))
}

/// Returns the bearer token from the `Authorization` header, or "".
fn bearer_token(headers: &HeaderMap) -> &str {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .unwrap_or("")
}

/// Enforces the token rule: a token is required only when Graph is on.
fn require_token<'a>(state: &AppState, headers: &'a HeaderMap, what: &str) -> ApiResult<&'a str> {
    let token = bearer_token(headers);
    if state.gateway.is_enabled() && token.is_empty() {
        return Err(ApiError::unauthorized(format!(
            "An OAuth token is required to list {}.",
            what
        )));
    }
    Ok(token)
}

/// Reads a string field from a JSON body, tolerating malformed bodies.
fn string_field(body: &[u8], field: &str) -> Option<String> {
    serde_json::from_slice::<Value>(body)
        .ok()?
        .get(field)?
        .as_str()
        .map(str::to_string)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub ok: bool,
    pub graph_enabled: bool,
    pub missing_env: Vec<&'static str>,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        graph_enabled: state.gateway.is_enabled(),
        missing_env: state.gateway.missing_settings().to_vec(),
    })
}

async fn auth_url(State(state): State<AppState>) -> ApiResult<Json<AuthorizationRequest>> {
    if !state.gateway.is_enabled() {
        return Err(ApiError::bad_request(GRAPH_DISABLED));
    }
    let request = state
        .gateway
        .authorization_url()
        .map_err(|e| ApiError::oauth("Could not build the authorization URL.", e))?;
    Ok(Json(request))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
}

async fn auth_exchange(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<TokenResponse>> {
    if !state.gateway.is_enabled() {
        return Err(ApiError::bad_request(GRAPH_DISABLED));
    }
    let Some(code) = string_field(&body, "code").filter(|code| !code.is_empty()) else {
        return Err(ApiError::bad_request("An OAuth code is required."));
    };

    let access_token = state
        .gateway
        .exchange_code_for_token(&code)
        .await
        .map_err(|e| ApiError::oauth("Could not exchange the authorization code.", e))?;
    Ok(Json(TokenResponse { access_token }))
}

async fn list_rooms(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Json<Vec<Room>>> {
    let token = require_token(&state, &headers, "rooms")?;
    let rooms = state
        .gateway
        .list_rooms(token)
        .await
        .map_err(|e| ApiError::provider("Could not fetch rooms.", e))?;
    Ok(Json(rooms))
}

#[derive(Debug, Deserialize)]
pub struct EventsParams {
    pub start: Option<String>,
    pub end: Option<String>,
}

async fn list_room_events(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Query(params): Query<EventsParams>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<RoomEvent>>> {
    let token = require_token(&state, &headers, "events")?;
    let (Some(start), Some(end)) = (
        params.start.filter(|s| !s.is_empty()),
        params.end.filter(|s| !s.is_empty()),
    ) else {
        return Err(ApiError::bad_request("ISO start and end are required."));
    };

    let events = state
        .gateway
        .list_room_events(token, &room_id, &start, &end)
        .await
        .map_err(|e| ApiError::provider("Could not fetch events.", e))?;
    Ok(Json(events))
}

/// Parses the `now` query value as RFC 3339.
///
/// An unencoded `+` in a query string decodes to a space, so
/// `08:30:00 01:00` is read back as `08:30:00+01:00`.
fn parse_now(value: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).or_else(|err| match value.rsplit_once(' ') {
        Some((head, offset)) if !offset.starts_with(['+', '-']) => {
            DateTime::parse_from_rfc3339(&format!("{}+{}", head, offset))
        }
        _ => Err(err),
    })
}

#[derive(Debug, Deserialize)]
pub struct StatusParams {
    pub now: Option<String>,
}

/// A room's display week and its derived status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomStatus {
    pub room_id: String,
    pub week_start: String,
    pub week_end: String,
    pub events: Vec<RoomEvent>,
    #[serde(flatten)]
    pub snapshot: OccupancySnapshot,
}

async fn room_status(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Query(params): Query<StatusParams>,
    headers: HeaderMap,
) -> ApiResult<Json<RoomStatus>> {
    let token = require_token(&state, &headers, "events")?;
    let now = match params.now.as_deref() {
        Some(value) => parse_now(value)
            .map_err(|e| ApiError::bad_request(format!("invalid now {:?}: {}", value, e)))?,
        None => Local::now().fixed_offset(),
    };

    let (week_start, week_end) = week_window(&now).to_iso_bounds();
    let events = state
        .gateway
        .list_room_events(token, &room_id, &week_start, &week_end)
        .await
        .map_err(|e| ApiError::provider("Could not fetch events.", e))?;

    let snapshot = OccupancySnapshot::compute_in(&events, now.with_timezone(&Utc), state.occupancy);
    debug!(
        room_id = %room_id,
        busy = snapshot.is_busy(),
        occupancy = snapshot.occupancy_percent,
        "computed room status"
    );

    Ok(Json(RoomStatus {
        room_id,
        week_start,
        week_end,
        events,
        snapshot,
    }))
}

#[derive(Debug, Serialize)]
pub struct NoticeResponse {
    pub notice: String,
}

async fn get_notice(State(state): State<AppState>) -> Json<NoticeResponse> {
    Json(NoticeResponse {
        notice: state.notice.get().await,
    })
}

async fn put_notice(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<NoticeResponse>> {
    let Some(notice) = string_field(&body, "notice") else {
        return Err(ApiError::bad_request("notice must be a string"));
    };
    Ok(Json(NoticeResponse {
        notice: state.notice.set(notice).await,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), "");

        headers.insert(AUTHORIZATION, "Bearer abc.def".parse().unwrap());
        assert_eq!(bearer_token(&headers), "abc.def");

        headers.insert(AUTHORIZATION, "Basic Zm9vOmJhcg==".parse().unwrap());
        assert_eq!(bearer_token(&headers), "");
    }

    #[test]
    fn now_with_positive_offset() {
        let expected = DateTime::parse_from_rfc3339("2025-02-04T09:30:00+01:00").unwrap();
        assert_eq!(parse_now("2025-02-04T09:30:00+01:00").unwrap(), expected);
        assert_eq!(parse_now("2025-02-04T09:30:00 01:00").unwrap(), expected);
        assert_eq!(
            parse_now("2025-02-04 09:30:00 01:00").unwrap(),
            expected
        );
        assert!(parse_now("2025-02-04T09:30:00 yesterday").is_err());
        assert!(parse_now("yesterday").is_err());
    }

    #[test]
    fn string_field_tolerates_bad_bodies() {
        assert_eq!(string_field(br#"{"code":"abc"}"#, "code").as_deref(), Some("abc"));
        assert_eq!(string_field(br#"{"code":42}"#, "code"), None);
        assert_eq!(string_field(b"", "code"), None);
        assert_eq!(string_field(b"not json", "code"), None);
        assert_eq!(string_field(br#"{"notice":""}"#, "notice").as_deref(), Some(""));
    }
}
