//! OAuth 2.0 authorization-code flow against the Microsoft identity platform.
//!
//! The server never stores tokens. It hands the front-end an authorize URL,
//! and later trades the returned code for an access token which the
//! front-end keeps and sends back as a bearer token.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng as _;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ProviderError, ProviderResult};

use super::client::map_send_error;
use super::config::GraphConfig;

/// An authorize URL together with the state value embedded in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationRequest {
    /// URL to send the user's browser to.
    pub auth_url: String,
    /// Random state value, echoed back by the identity platform.
    pub state: String,
}

/// Token endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

/// Client for the authorize and token endpoints.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    http_client: reqwest::Client,
    config: GraphConfig,
}

impl OAuthClient {
    /// Creates a new OAuth client.
    pub fn new(config: GraphConfig) -> ProviderResult<Self> {
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
            config,
        })
    }

    /// Builds the authorize URL with a fresh random state.
    pub fn authorization_url(&self) -> ProviderResult<AuthorizationRequest> {
        let state = generate_state();
        let scope = self.config.scope_string();
        let url = url::Url::parse_with_params(
            &self.config.authorize_endpoint(),
            &[
                ("client_id", self.config.credentials.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("response_mode", "query"),
                ("scope", scope.as_str()),
                ("state", state.as_str()),
            ],
        )
        .map_err(|e| {
            ProviderError::configuration(format!("invalid authorize endpoint: {}", e))
                .with_source(e)
        })?;

        Ok(AuthorizationRequest {
            auth_url: url.into(),
            state,
        })
    }

    /// Exchanges an authorization code for an access token.
    pub async fn exchange_code(&self, code: &str) -> ProviderResult<String> {
        let scope = self.config.scope_string();
        let params = [
            ("client_id", self.config.credentials.client_id.as_str()),
            ("client_secret", self.config.credentials.client_secret.as_str()),
            ("scope", scope.as_str()),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = self
            .http_client
            .post(self.config.token_endpoint())
            .form(&params)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ProviderError::network(format!("failed to read response: {}", e)).with_source(e)
        })?;

        if !status.is_success() {
            return Err(ProviderError::authentication(format!(
                "token exchange failed ({}): {}",
                status, body
            ))
            .with_status(status.as_u16()));
        }

        let token: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("invalid token response: {}", e)).with_source(e)
        })?;

        let access_token = token
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ProviderError::invalid_response("token response has no access_token"))?;

        info!("exchanged authorization code for access token");
        Ok(access_token)
    }
}

/// Generates a random state string for CSRF protection.
fn generate_state() -> String {
    let mut rng = rand::rng();
    let bytes: Vec<u8> = (0..16).map(|_| rng.random()).collect();
    URL_SAFE_NO_PAD.encode(&bytes)
}
