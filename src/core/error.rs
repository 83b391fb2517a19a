//! Typed error handling for the dashboard
//!
//! Only faults live here. Expected outcomes of an action (a rejected form,
//! a failed write, a refused login) are returned as data by the actions
//! themselves and never travel through this type.
//!
//! # Error Categories
//!
//! - [`RequestError`]: the request could not be turned into action input
//! - [`ConfigError`]: configuration could not be read, parsed or validated
//! - [`DashboardError::Internal`]: anything else, including unknown identity
//!   provider faults. Its detail is logged, never sent to the client.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// The main error type for the dashboard
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// HTTP/Request errors
    #[error(transparent)]
    Request(#[from] RequestError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Unexpected faults propagated from collaborators
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl DashboardError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            DashboardError::Request(e) => e.status_code(),
            DashboardError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            DashboardError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            DashboardError::Request(e) => e.error_code(),
            DashboardError::Config(_) => "CONFIG_ERROR",
            DashboardError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    ///
    /// Request errors are described to the client; everything else is not.
    pub fn to_response(&self) -> ErrorResponse {
        let message = match self {
            DashboardError::Request(e) => e.to_string(),
            DashboardError::Config(_) | DashboardError::Internal(_) => {
                "Internal server error".to_string()
            }
        };
        ErrorResponse {
            code: self.error_code().to_string(),
            message,
        }
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        if self.status_code().is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// The request could not be turned into action input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// Path segment is not a valid invoice id
    #[error("Invalid invoice id '{value}'")]
    InvalidId { value: String },

    /// Body could not be decoded as a form
    #[error("Malformed form: {message}")]
    MalformedForm { message: String },

    /// Body has a content type no extractor understands
    #[error("Unsupported content type '{content_type}'")]
    UnsupportedMediaType { content_type: String },
}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::InvalidId { .. } => StatusCode::BAD_REQUEST,
            RequestError::MalformedForm { .. } => StatusCode::BAD_REQUEST,
            RequestError::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::InvalidId { .. } => "INVALID_ID",
            RequestError::MalformedForm { .. } => "MALFORMED_FORM",
            RequestError::UnsupportedMediaType { .. } => "UNSUPPORTED_MEDIA_TYPE",
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Configuration could not be loaded
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Config could not be parsed
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// An environment override has an unusable value
    #[error("Invalid value for {var}: {message}")]
    Env { var: String, message: String },

    /// Config parsed but violates a constraint
    #[error("Invalid config: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}
