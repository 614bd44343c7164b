//! Error types for room provider operations.
//!
//! Every failure talking to the upstream directory/calendar service surfaces
//! as a [`ProviderError`]. "Room not found" and "provider disabled" are not
//! errors and never produce one.

use std::fmt;
use thiserror::Error;

/// The category of a provider error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorCode {
    /// The bearer token was rejected (401).
    AuthenticationFailed,
    /// The token lacks permission for the resource (403).
    AuthorizationFailed,
    /// Connection failed, timed out, or the body could not be read.
    NetworkError,
    /// Upstream throttled the request (429).
    RateLimited,
    /// Upstream returned any other non-2xx status.
    ServerError,
    /// Upstream answered 2xx with a body we could not parse.
    InvalidResponse,
    /// Upstream rejected the request as malformed (400).
    BadRequest,
    /// Upstream resource does not exist (404).
    NotFound,
    /// Missing or invalid local configuration.
    ConfigurationError,
}

impl ProviderErrorCode {
    /// Returns a machine-readable name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed => "authentication_failed",
            Self::AuthorizationFailed => "authorization_failed",
            Self::NetworkError => "network_error",
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::InvalidResponse => "invalid_response",
            Self::BadRequest => "bad_request",
            Self::NotFound => "not_found",
            Self::ConfigurationError => "configuration_error",
        }
    }

    /// Returns true if the error originated upstream rather than locally.
    pub fn is_upstream(&self) -> bool {
        !matches!(self, Self::ConfigurationError)
    }
}

impl fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error that occurred while talking to a room provider.
#[derive(Debug, Error)]
pub struct ProviderError {
    code: ProviderErrorCode,
    message: String,
    /// The provider that generated this error (e.g. "graph").
    provider: Option<String>,
    /// HTTP status returned upstream, when there was one.
    status: Option<u16>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ProviderError {
    /// Creates a new provider error with the given code and message.
    pub fn new(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider: None,
            status: None,
            source: None,
        }
    }

    /// Creates an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::AuthenticationFailed, message)
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::NetworkError, message)
    }

    /// Creates an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InvalidResponse, message)
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::ConfigurationError, message)
    }

    /// Maps a non-success upstream status and its body to an error.
    ///
    /// The body is kept verbatim in the message so the caller can surface
    /// Graph's own error description.
    pub fn from_status(status: u16, body: &str) -> Self {
        use ProviderErrorCode::*;
        let (code, message) = match status {
            400 => (BadRequest, format!("request rejected: {}", body)),
            401 => (AuthenticationFailed, "access token expired or invalid".to_string()),
            403 => (AuthorizationFailed, format!("access denied: {}", body)),
            404 => (NotFound, format!("resource not found: {}", body)),
            429 => (RateLimited, "rate limit exceeded".to_string()),
            _ => (ServerError, format!("API error ({}): {}", status, body)),
        };
        Self::new(code, message).with_status(status)
    }

    /// Sets the provider name for this error.
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Sets the upstream HTTP status for this error.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the source error for this error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error code.
    pub fn code(&self) -> ProviderErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the provider name, if set.
    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }

    /// Returns the upstream HTTP status, if any.
    pub fn status(&self) -> Option<u16> {
        self.status
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref provider) = self.provider {
            write!(f, "[{}] ", provider)?;
        }
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// A specialized Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_display() {
        assert_eq!(
            ProviderErrorCode::AuthenticationFailed.as_str(),
            "authentication_failed"
        );
        assert_eq!(ProviderErrorCode::RateLimited.to_string(), "rate_limited");
    }

    #[test]
    fn upstream_classification() {
        assert!(ProviderErrorCode::ServerError.is_upstream());
        assert!(ProviderErrorCode::InvalidResponse.is_upstream());
        assert!(!ProviderErrorCode::ConfigurationError.is_upstream());
    }

    #[test]
    fn from_status_maps_codes() {
        let cases = [
            (400, ProviderErrorCode::BadRequest),
            (401, ProviderErrorCode::AuthenticationFailed),
            (403, ProviderErrorCode::AuthorizationFailed),
            (404, ProviderErrorCode::NotFound),
            (429, ProviderErrorCode::RateLimited),
            (500, ProviderErrorCode::ServerError),
            (503, ProviderErrorCode::ServerError),
        ];
        for (status, code) in cases {
            let err = ProviderError::from_status(status, "{}");
            assert_eq!(err.code(), code, "status {}", status);
            assert_eq!(err.status(), Some(status));
        }
    }

    #[test]
    fn server_error_keeps_body() {
        let err = ProviderError::from_status(502, r#"{"error":"bad gateway"}"#);
        assert!(err.message().contains("502"));
        assert!(err.message().contains("bad gateway"));
    }

    #[test]
    fn provider_error_display() {
        let err = ProviderError::from_status(429, "").with_provider("graph");
        let display = err.to_string();
        assert!(display.contains("[graph]"));
        assert!(display.contains("rate_limited"));
        assert!(display.contains("rate limit exceeded"));
    }

    #[test]
    fn provider_error_with_source() {
        use std::error::Error;
        let io_err = std::io::Error::other("connection reset");
        let err = ProviderError::network("read failed").with_source(io_err);
        assert!(err.source().is_some());
    }
}
