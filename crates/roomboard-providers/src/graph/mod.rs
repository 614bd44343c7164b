//! Microsoft Graph provider.
//!
//! Reads room resources from the Places API and room calendars through
//! `calendarView`, authenticating with the caller's delegated access token.
//! The OAuth helpers cover the authorize URL and the code-for-token
//! exchange; refresh tokens are not handled.

pub mod client;
pub mod config;
pub mod oauth;
pub mod provider;

pub use client::{GraphClient, MAX_ROOMS};
pub use config::{GraphConfig, OAuthCredentials};
pub use oauth::{AuthorizationRequest, OAuthClient};
pub use provider::{GRAPH_PROVIDER_NAME, GraphProvider};
