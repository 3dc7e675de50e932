//! Error handling for the Gateway
//!
//! Batch-level failures (authentication, configuration, validation) and
//! infrastructure failures live here. Per-item failures are not errors: they
//! are recorded as [`crate::core::batch::ItemOutcome`] values.

#![allow(missing_docs)]

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

/// Result type alias for the Gateway
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Main error type for the Gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// YAML serialization errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Missing or invalid caller identity
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Caller is valid but has no upstream credential on file
    #[error("Not configured: {0}")]
    NotConfigured(String),

    /// Structurally invalid batch input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Secret store could not be queried
    #[error("Secret store error: {0}")]
    SecretStore(String),

    /// Upstream service errors outside of per-item processing
    #[error("Upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// HTTP server lifecycle errors (bind, run)
    #[error("Server error: {0}")]
    Server(String),

    /// Internal server errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Helper functions for creating specific errors
impl GatewayError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn unauthorized<S: Into<String>>(message: S) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn not_configured<S: Into<String>>(message: S) -> Self {
        Self::NotConfigured(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn secret_store<S: Into<String>>(message: S) -> Self {
        Self::SecretStore(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    pub fn server<S: Into<String>>(message: S) -> Self {
        Self::Server(message.into())
    }
}

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        self.parts().0
    }

    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code, message) = self.parts();

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: error_code.to_string(),
                message,
                timestamp: chrono::Utc::now().timestamp(),
                request_id: None,
            },
        };

        HttpResponse::build(status_code).json(error_response)
    }
}

impl GatewayError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            GatewayError::Unauthorized(_) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", self.to_string())
            }
            GatewayError::NotConfigured(_) => {
                (StatusCode::BAD_REQUEST, "NOT_CONFIGURED", self.to_string())
            }
            GatewayError::Validation(_) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", self.to_string())
            }
            GatewayError::SecretStore(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "SECRET_STORE_ERROR",
                "Failed to fetch API key configuration".to_string(),
            ),
            GatewayError::Upstream { status, .. } => (
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
                "UPSTREAM_ERROR",
                self.to_string(),
            ),
            GatewayError::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR",
                self.to_string(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            ),
        }
    }
}

/// Standard error response format
#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(serde::Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub timestamp: i64,
    pub request_id: Option<String>,
}
