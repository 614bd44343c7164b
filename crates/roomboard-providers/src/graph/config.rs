//! Microsoft Graph provider configuration.

use std::time::Duration;

/// OAuth 2.0 client credentials registered with the identity platform.
#[derive(Debug, Clone, Default)]
pub struct OAuthCredentials {
    /// Application (client) id.
    pub client_id: String,
    /// Client secret.
    pub client_secret: String,
}

impl OAuthCredentials {
    /// Creates new OAuth credentials.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

/// Configuration for the Microsoft Graph provider.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// Directory (tenant) id.
    pub tenant_id: String,

    /// OAuth credentials for the authorization-code flow.
    pub credentials: OAuthCredentials,

    /// Redirect URI registered for the application.
    pub redirect_uri: String,

    /// Contact addresses of the rooms to show.
    ///
    /// When empty, every room resource in the directory is listed.
    pub room_emails: Vec<String>,

    /// OAuth scopes to request.
    pub scopes: Vec<String>,

    /// Graph API base URL, without a trailing slash.
    pub api_base_url: String,

    /// Identity platform base URL, without a trailing slash.
    pub login_base_url: String,

    /// Request timeout.
    pub timeout: Duration,

    /// User agent string for API requests.
    pub user_agent: String,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            tenant_id: String::new(),
            credentials: OAuthCredentials::default(),
            redirect_uri: String::new(),
            room_emails: Vec::new(),
            scopes: Self::DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
            api_base_url: Self::DEFAULT_API_BASE_URL.to_string(),
            login_base_url: Self::DEFAULT_LOGIN_BASE_URL.to_string(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("roomboard/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl GraphConfig {
    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Graph v1.0 endpoint.
    pub const DEFAULT_API_BASE_URL: &'static str = "https://graph.microsoft.com/v1.0";

    /// Microsoft identity platform endpoint.
    pub const DEFAULT_LOGIN_BASE_URL: &'static str = "https://login.microsoftonline.com";

    /// Scopes needed to read room lists and room calendars.
    pub const DEFAULT_SCOPES: &'static [&'static str] =
        &["Calendars.Read", "User.Read", "Places.Read.All"];

    /// Creates a new Graph configuration.
    pub fn new(
        tenant_id: impl Into<String>,
        credentials: OAuthCredentials,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            credentials,
            redirect_uri: redirect_uri.into(),
            ..Self::default()
        }
    }

    /// Sets the room allow-list.
    pub fn with_room_emails(mut self, emails: Vec<String>) -> Self {
        self.room_emails = emails;
        self
    }

    /// Sets the Graph API base URL.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the identity platform base URL.
    pub fn with_login_base_url(mut self, url: impl Into<String>) -> Self {
        self.login_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the OAuth authorize endpoint for the tenant.
    pub fn authorize_endpoint(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/authorize",
            self.login_base_url, self.tenant_id
        )
    }

    /// Returns the OAuth token endpoint for the tenant.
    pub fn token_endpoint(&self) -> String {
        format!("{}/{}/oauth2/v2.0/token", self.login_base_url, self.tenant_id)
    }

    /// Returns the space-separated scope string.
    pub fn scope_string(&self) -> String {
        self.scopes.join(" ")
    }

    /// Lists the environment settings that are required but blank.
    pub fn missing_settings(&self) -> Vec<&'static str> {
        [
            ("AZURE_TENANT_ID", &self.tenant_id),
            ("AZURE_CLIENT_ID", &self.credentials.client_id),
            ("AZURE_CLIENT_SECRET", &self.credentials.client_secret),
            ("AZURE_REDIRECT_URI", &self.redirect_uri),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}
