//! API error type and its HTTP mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use roomboard_providers::ProviderError;

/// JSON body returned for every error.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Errors returned by request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request is missing something or the feature is off.
    #[error("{0}")]
    BadRequest(String),

    /// A bearer token is required and was not sent.
    #[error("{0}")]
    Unauthorized(String),

    /// The room/calendar provider failed.
    #[error("{message}")]
    Provider {
        message: &'static str,
        #[source]
        source: ProviderError,
    },

    /// The OAuth exchange with the identity platform failed.
    #[error("{message}")]
    OAuth {
        message: &'static str,
        #[source]
        source: ProviderError,
    },
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Creates a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Creates an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Wraps a provider failure with a user-facing message.
    pub fn provider(message: &'static str, source: ProviderError) -> Self {
        Self::Provider { message, source }
    }

    /// Wraps an OAuth failure with a user-facing message.
    pub fn oauth(message: &'static str, source: ProviderError) -> Self {
        Self::OAuth { message, source }
    }

    /// Returns the HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Provider { source, .. } if source.code().is_upstream() => {
                StatusCode::BAD_GATEWAY
            }
            ApiError::Provider { .. } | ApiError::OAuth { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            ApiError::Provider { source, .. } | ApiError::OAuth { source, .. } => {
                Some(source.to_string())
            }
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.status_code();
        let details = self.details();
        if code.is_server_error() {
            error!(status = code.as_u16(), details = ?details, "{}", self);
        } else {
            warn!(status = code.as_u16(), "{}", self);
        }

        let body = ErrorBody {
            message: self.to_string(),
            details,
        };
        (code, Json(body)).into_response()
    }
}

/// Errors that stop the server from starting or running.
#[derive(Debug, Error)]
pub enum ServerError {
    /// IO error (bind, accept).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// The provider gateway could not be built.
    #[error("Provider setup failed: {0}")]
    Provider(#[from] ProviderError),
}

/// Result type for server startup.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(ApiError::bad_request("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::unauthorized("x").status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::provider("x", ProviderError::from_status(500, "")).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::provider("x", ProviderError::network("refused")).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::provider("x", ProviderError::configuration("off")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::oauth("x", ProviderError::authentication("bad code")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn body_carries_details() {
        let err = ApiError::provider(
            "Could not fetch rooms.",
            ProviderError::from_status(503, "busy").with_provider("graph"),
        );
        let body = ErrorBody {
            message: err.to_string(),
            details: err.details(),
        };
        insta::assert_json_snapshot!(body, @r###"
        {
          "message": "Could not fetch rooms.",
          "details": "[graph] server_error: API error (503): busy"
        }
        "###);
    }

    #[test]
    fn client_errors_have_no_details() {
        let body = serde_json::to_value(ErrorBody {
            message: "start and end are required".to_string(),
            details: ApiError::bad_request("x").details(),
        })
        .unwrap();
        assert!(body.get("details").is_none());
    }
}
