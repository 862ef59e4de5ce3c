//! Response types for the gateway API.
//!
//! This module defines the error response structures and the mapping from
//! [`GatewayError`] to HTTP status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, TransportError, ValidationError};

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// The failing field and rule, for local validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationError>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            validation: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            details: Some(details.into()),
            ..Self::new(code, message)
        }
    }

    /// Creates a validation error response carrying the failing rule.
    pub fn validation_error(error: ValidationError) -> Self {
        Self {
            validation: Some(error.clone()),
            ..Self::new("VALIDATION_ERROR", error.to_string())
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Creates an error response.
    pub fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<GatewayError> for ApiErrorResponse {
    fn from(error: GatewayError) -> Self {
        match error {
            GatewayError::Configuration { message } => ApiErrorResponse::new(
                StatusCode::SERVICE_UNAVAILABLE,
                ApiError::with_details(
                    "CONFIGURATION_ERROR",
                    "Gateway is not configured",
                    message,
                ),
            ),
            GatewayError::ConfigNotFound { path } => ApiErrorResponse::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            ),
            GatewayError::ConfigParseError { path, message } => ApiErrorResponse::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            ),
            GatewayError::Validation(error) => {
                ApiErrorResponse::new(StatusCode::BAD_REQUEST, ApiError::validation_error(error))
            }
            GatewayError::Transport(error) => {
                let status = match error {
                    TransportError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                    _ => StatusCode::BAD_GATEWAY,
                };
                ApiErrorResponse::new(
                    status,
                    ApiError::with_details(
                        "TRANSPORT_ERROR",
                        "Exchange with the service failed",
                        error.to_string(),
                    ),
                )
            }
            GatewayError::ProtocolFault { code, message } => ApiErrorResponse::new(
                StatusCode::BAD_GATEWAY,
                ApiError::with_details(
                    "PROTOCOL_FAULT",
                    format!("Service returned fault '{}'", code),
                    message,
                ),
            ),
            GatewayError::RateLimited { limit, window_secs } => ApiErrorResponse::new(
                StatusCode::TOO_MANY_REQUESTS,
                ApiError::new(
                    "RATE_LIMITED",
                    format!(
                        "Request ceiling of {} calls per {}s reached",
                        limit, window_secs
                    ),
                ),
            ),
        }
    }
}

impl From<ValidationError> for ApiErrorResponse {
    fn from(error: ValidationError) -> Self {
        GatewayError::from(error).into()
    }
}
