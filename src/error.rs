//! Error types for the SGK gateway.
//!
//! This module provides strongly-typed errors using the `thiserror` crate.
//! Business outcomes reported by the service are never errors; they are
//! returned as [`OperationResult`](crate::models::OperationResult) data.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The main error type for the SGK gateway.
///
/// # Example
///
/// ```
/// use sgk_gateway::error::GatewayError;
///
/// let error = GatewayError::Configuration {
///     message: "no credentials set".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration error: no credentials set");
/// ```
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Credentials are missing or invalid. Not retryable.
    #[error("Configuration error: {message}")]
    Configuration {
        /// A description of what is missing or wrong.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A local precondition failed before any network attempt.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The network exchange failed after the retry policy was exhausted.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The service answered with a SOAP fault instead of a result payload.
    #[error("Protocol fault '{code}': {message}")]
    ProtocolFault {
        /// The `faultcode` reported by the service.
        code: String,
        /// The `faultstring` reported by the service.
        message: String,
    },

    /// The per-instance request-rate ceiling was reached.
    #[error("Rate limit reached: {limit} calls per {window_secs}s")]
    RateLimited {
        /// Maximum number of calls within the window.
        limit: usize,
        /// Length of the sliding window in seconds.
        window_secs: u64,
    },
}

impl GatewayError {
    /// Builds a configuration error from a message.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

/// The rule a local validation check enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationRule {
    /// Submission must contain between one and the protocol maximum records.
    BatchSize,
    /// National id must be exactly 11 digits.
    NationalIdFormat,
    /// National id checksum digits must match.
    NationalIdChecksum,
    /// Employer registry id must be exactly 26 digits.
    RegistryIdFormat,
    /// Profession code must be `NNNN.NN` or `NNNN.NNN`.
    ProfessionCodeFormat,
    /// Profession code segments must be within their numeric ranges.
    ProfessionCodeRange,
    /// Partial-time day count must be within 1..=29.
    PartialTimeDays,
    /// Name must be between 1 and 18 characters.
    NameLength,
    /// A transfer requires the counterpart registry id.
    TransferRegistryRequired,
    /// Monetary amounts cannot be negative.
    NegativeAmount,
    /// Missing-day count must be within 0..=31.
    MissingDays,
    /// Missing-day reason must be supplied when days are missing.
    MissingDayReason,
    /// Dates are out of order or in the future where not allowed.
    DateRange,
    /// Calendar input (month/year) is out of range.
    Calendar,
    /// A confirmation document was requested without a reference code.
    ReferenceCode,
}

/// A field-level validation failure.
///
/// Carries enough context for a caller to pinpoint one field on one record.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("Validation failed for {}field '{field}': {message}", record_prefix(.record_index))]
pub struct ValidationError {
    /// Zero-based index of the offending record, if the failure is per record.
    pub record_index: Option<usize>,
    /// The field that failed validation.
    pub field: String,
    /// The rule that was violated.
    pub rule: ValidationRule,
    /// A specific remediation message.
    pub message: String,
}

impl ValidationError {
    /// Creates a validation error that is not tied to a specific record.
    pub fn new(field: impl Into<String>, rule: ValidationRule, message: impl Into<String>) -> Self {
        Self {
            record_index: None,
            field: field.into(),
            rule,
            message: message.into(),
        }
    }

    /// Attaches the index of the record that failed.
    pub fn at_record(mut self, index: usize) -> Self {
        self.record_index = Some(index);
        self
    }
}

fn record_prefix(record_index: &Option<usize>) -> String {
    record_index.map_or_else(String::new, |index| format!("record {} ", index))
}

/// Network or encoding failure during an exchange with the service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The endpoint does not use an encrypted scheme.
    #[error("Refusing plaintext endpoint '{url}': only https is allowed")]
    InsecureEndpoint {
        /// The rejected endpoint URL.
        url: String,
    },

    /// The connection could not be established or was dropped.
    #[error("Connection to '{endpoint}' failed: {message}")]
    Connect {
        /// The endpoint URL.
        endpoint: String,
        /// Underlying error description.
        message: String,
    },

    /// The exchange did not complete within the per-call timeout.
    #[error("Request to '{endpoint}' timed out after {after:?}")]
    Timeout {
        /// The endpoint URL.
        endpoint: String,
        /// The timeout that elapsed.
        after: Duration,
    },

    /// The service answered with a non-success HTTP status and no SOAP payload.
    #[error("Endpoint '{endpoint}' answered with HTTP status {status}")]
    HttpStatus {
        /// The endpoint URL.
        endpoint: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The request payload could not be encoded.
    #[error("Failed to encode request: {message}")]
    Encoding {
        /// A description of the encoding failure.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("Malformed response: {message}")]
    MalformedResponse {
        /// A description of the decoding failure.
        message: String,
    },

    /// The HTTP client could not be built or the request could not be sent.
    #[error("HTTP client error: {message}")]
    Client {
        /// Underlying error description.
        message: String,
    },

    /// The detached request task ended without reporting a result.
    #[error("Request task ended unexpectedly: {message}")]
    Detached {
        /// Underlying error description.
        message: String,
    },
}

impl TransportError {
    /// Returns whether this failure qualifies for the single automatic retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Connect { .. } | Self::Timeout { .. })
    }
}

/// A type alias for Results that return GatewayError.
pub type GatewayResult<T> = Result<T, GatewayError>;
