//! Room and event providers.
//!
//! This crate is the single entry point for room directory and calendar
//! data:
//!
//! - [`RoomProvider`] - The trait both data sources implement
//! - [`FixtureProvider`] - Static rooms and a week of sample meetings
//! - [`GraphProvider`] - Microsoft Graph, authenticated per call
//! - [`Gateway`] - Picks one of the two per call from a startup flag
//! - [`ProviderError`] - Error types for provider operations
//!
//! # Architecture
//!
//! ```text
//!                ┌───────────┐
//!                │  Gateway  │  enabled?
//!                └─────┬─────┘
//!            no        │        yes
//!         ┌────────────┴────────────┐
//!         ▼                         ▼
//! ┌─────────────────┐      ┌─────────────────┐
//! │ FixtureProvider │      │  GraphProvider  │──► Graph v1.0
//! └─────────────────┘      └─────────────────┘
//!         │                         │
//!         └──── Room / RoomEvent ◄──┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use roomboard_providers::{FixtureProvider, Gateway, GraphConfig};
//!
//! let fixtures = FixtureProvider::for_week_of(&chrono::Local::now());
//! let gateway = Gateway::new(false, fixtures, GraphConfig::default())?;
//! let rooms = gateway.list_rooms("").await?;
//! ```

pub mod error;
pub mod fixture;
pub mod gateway;
pub mod graph;
pub mod provider;

#[cfg(test)]
mod testing;

pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use fixture::{FIXTURE_PROVIDER_NAME, FixtureProvider, fixture_events, fixture_rooms};
pub use gateway::Gateway;
pub use graph::{
    AuthorizationRequest, GRAPH_PROVIDER_NAME, GraphConfig, GraphProvider, MAX_ROOMS,
    OAuthCredentials,
};
pub use provider::{BoxFuture, EventQuery, RoomProvider};
