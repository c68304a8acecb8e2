// crates/secrets-manager-core/src/error.rs
// ============================================================================
// Module: Secrets Manager Errors
// Description: Error taxonomy for the codec, request pipeline, and service handle.
// Purpose: Classify every failure a call can surface, with the response attached
//          whenever a network round-trip completed.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Two error types cover the core. [`CodecError`] is raised by the family
//! registry and the JSON codec and knows nothing about HTTP. [`SdkError`] is
//! what every operation returns to callers; codec failures are folded into it
//! with the direction (encode or decode) made explicit.
//! Invariants:
//! - Pre-flight failures (`MissingOptions`, `MissingField`, `InvalidField`,
//!   `ServiceUrlMissing`, `Encode`) never carry a response.
//! - `Decode`, `UnknownVariant` raised while parsing a body, and `Http` always
//!   carry the response that produced them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::response::DetailedResponse;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Canonical message for calls issued while the service URL is unset.
pub const SERVICE_URL_MISSING_MESSAGE: &str = "service URL is empty";

/// Canonical message for calls terminated by a context deadline.
pub const DEADLINE_EXCEEDED_MESSAGE: &str = "context deadline exceeded";

// ============================================================================
// SECTION: Codec Errors
// ============================================================================

/// Errors raised by the family registry and the JSON codec.
///
/// # Invariants
/// - Variants carry wire field names, never field values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// A required field is absent or empty.
    #[error("missing required field: {field}")]
    MissingField {
        /// Wire name of the field.
        field: String,
    },
    /// A field value violates its declared constraints.
    #[error("invalid field {field}: {reason}")]
    InvalidField {
        /// Wire name of the field.
        field: String,
        /// Human-readable constraint violation.
        reason: String,
    },
    /// The discriminator names a tag the family does not register.
    #[error("unknown {family} variant: {tag}")]
    UnknownVariant {
        /// Family name.
        family: &'static str,
        /// Offending tag.
        tag: String,
    },
    /// Neither the payload nor the call context selected a variant.
    #[error("{family} payload has no discriminator and no context hint was supplied")]
    MissingDiscriminator {
        /// Family name.
        family: &'static str,
    },
    /// The payload is not valid JSON or does not match the variant schema.
    #[error("json error: {0}")]
    Json(String),
}

impl CodecError {
    /// Builds a [`CodecError::MissingField`].
    #[must_use]
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Builds a [`CodecError::InvalidField`].
    #[must_use]
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

// ============================================================================
// SECTION: HTTP Errors
// ============================================================================

/// Single entry of the server error envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceErrorItem {
    /// Machine-readable error code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Human-readable error message.
    #[serde(default)]
    pub message: String,
    /// Optional documentation link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub more_info: Option<String>,
}

/// Non-2xx response decoded into the server error envelope.
///
/// # Invariants
/// - `status` equals `response.status_code`.
/// - `message` is the first server error message, or a generic status line when
///   the body could not be decoded.
#[derive(Debug, Clone)]
pub struct HttpError {
    /// HTTP status code.
    pub status: u16,
    /// Summary message.
    pub message: String,
    /// Server trace identifier, when present.
    pub trace: Option<String>,
    /// Decoded server error entries (empty when the body was not an envelope).
    pub errors: Vec<ServiceErrorItem>,
    /// Response that produced the error.
    pub response: DetailedResponse,
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "http status {}: {}", self.status, self.message)
    }
}

// ============================================================================
// SECTION: SDK Errors
// ============================================================================

/// Errors surfaced by every service operation.
///
/// # Invariants
/// - [`SdkError::response`] is `Some` exactly when a round-trip completed.
/// - The `DeadlineExceeded` message contains `deadline exceeded`.
#[derive(Debug, Error)]
pub enum SdkError {
    /// The caller supplied no options value.
    #[error("operation options must not be empty")]
    MissingOptions,
    /// A required path, query, or body field is absent or empty.
    #[error("missing required field: {field}")]
    MissingField {
        /// Wire name of the field.
        field: String,
    },
    /// A field value violates its declared constraints.
    #[error("invalid field {field}: {reason}")]
    InvalidField {
        /// Wire name of the field.
        field: String,
        /// Human-readable constraint violation.
        reason: String,
    },
    /// The service handle has no base URL.
    #[error("{SERVICE_URL_MISSING_MESSAGE}")]
    ServiceUrlMissing,
    /// The outbound payload could not be encoded.
    #[error("request encode error: {0}")]
    Encode(String),
    /// The inbound payload could not be decoded.
    #[error("response decode error: {message}")]
    Decode {
        /// Decoder message.
        message: String,
        /// Response whose body failed to decode.
        response: Box<DetailedResponse>,
    },
    /// A response carried a discriminator the SDK does not recognise.
    #[error("unknown {family} variant: {tag}")]
    UnknownVariant {
        /// Family name.
        family: String,
        /// Offending tag.
        tag: String,
        /// Response that carried the variant, when decoding a response.
        response: Option<Box<DetailedResponse>>,
    },
    /// Network-level failure reported by the transport.
    #[error("transport error: {0}")]
    Transport(String),
    /// Non-2xx response.
    #[error("{0}")]
    Http(Box<HttpError>),
    /// The call's cancellation token fired.
    #[error("request cancelled")]
    Cancelled,
    /// The call's deadline elapsed.
    #[error("{DEADLINE_EXCEEDED_MESSAGE}")]
    DeadlineExceeded,
    /// The authenticator could not produce credentials.
    #[error("authentication error: {0}")]
    Authentication(String),
    /// Service configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

impl SdkError {
    /// Builds a [`SdkError::InvalidField`].
    #[must_use]
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Maps a codec failure raised while validating or encoding a request.
    #[must_use]
    pub fn from_encode(err: CodecError) -> Self {
        match err {
            CodecError::MissingField {
                field,
            } => Self::MissingField {
                field,
            },
            CodecError::InvalidField {
                field,
                reason,
            } => Self::InvalidField {
                field,
                reason,
            },
            CodecError::UnknownVariant {
                family,
                tag,
            } => Self::UnknownVariant {
                family: family.to_string(),
                tag,
                response: None,
            },
            other @ (CodecError::MissingDiscriminator {
                ..
            }
            | CodecError::Json(_)) => Self::Encode(other.to_string()),
        }
    }

    /// Maps a codec failure raised while decoding a response body.
    #[must_use]
    pub fn from_decode(err: CodecError, response: DetailedResponse) -> Self {
        match err {
            CodecError::UnknownVariant {
                family,
                tag,
            } => Self::UnknownVariant {
                family: family.to_string(),
                tag,
                response: Some(Box::new(response)),
            },
            other => Self::Decode {
                message: other.to_string(),
                response: Box::new(response),
            },
        }
    }

    /// Returns the response attached to this error, if a round-trip completed.
    #[must_use]
    pub fn response(&self) -> Option<&DetailedResponse> {
        match self {
            Self::Decode {
                response, ..
            } => Some(response),
            Self::UnknownVariant {
                response, ..
            } => response.as_deref(),
            Self::Http(err) => Some(&err.response),
            _ => None,
        }
    }

    /// Returns the HTTP status code of the attached response, if any.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        self.response().map(|response| response.status_code)
    }

    /// Returns true when the retry engine may attempt the call again.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Http(err) => crate::retry::is_retryable_status(err.status),
            _ => false,
        }
    }

    /// Returns true when the error was produced before any network I/O.
    #[must_use]
    pub const fn is_preflight(&self) -> bool {
        matches!(
            self,
            Self::MissingOptions
                | Self::MissingField { .. }
                | Self::InvalidField { .. }
                | Self::ServiceUrlMissing
                | Self::Encode(_)
        )
    }
}
