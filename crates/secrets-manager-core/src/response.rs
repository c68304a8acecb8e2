// crates/secrets-manager-core/src/response.rs
// ============================================================================
// Module: Response Parser
// Description: Response envelopes, error envelopes, and result classification.
// Purpose: Turn a raw HTTP response into a typed result or a structured error.
// Dependencies: bytes, flate2, reqwest, serde, serde_json
// ============================================================================

//! ## Overview
//! Successful responses carry the collection envelope
//! `{metadata: {collection_type, collection_total}, resources: [...]}`.
//! Failures carry `{status_code, trace, errors: [{code, message, more_info}]}`.
//! Invariants:
//! - A `204` or a blank `2xx` body yields no result and keeps the response.
//! - Any status outside `2xx` becomes [`SdkError::Http`] with the response
//!   attached, even when the error body is not an envelope.
//! - Decode failures on `2xx` bodies keep the response for inspection.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;

use bytes::Bytes;
use flate2::read::GzDecoder;
use reqwest::StatusCode;
use reqwest::header::CONTENT_ENCODING;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::codec::ContextHint;
use crate::codec::Family;
use crate::error::CodecError;
use crate::error::HttpError;
use crate::error::SdkError;
use crate::error::ServiceErrorItem;
use crate::operation::Operation;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Upper bound on inflated response bodies.
pub const MAX_INFLATED_BODY_BYTES: u64 = 64 * 1024 * 1024;

// ============================================================================
// SECTION: Detailed Response
// ============================================================================

/// Status, headers, and raw body of a completed round-trip.
#[derive(Debug, Clone)]
pub struct DetailedResponse {
    /// HTTP status code.
    pub status_code: u16,
    /// Response headers.
    pub headers: HeaderMap,
    /// Body bytes after content decoding.
    pub raw: Bytes,
}

impl DetailedResponse {
    /// Builds a response, inflating gzip-encoded bodies.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Decode`] when a gzip body cannot be inflated.
    pub fn new(status_code: u16, mut headers: HeaderMap, body: Bytes) -> Result<Self, SdkError> {
        let gzipped = headers
            .get(CONTENT_ENCODING)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.trim().eq_ignore_ascii_case("gzip"));
        if !gzipped || body.is_empty() {
            return Ok(Self {
                status_code,
                headers,
                raw: body,
            });
        }
        let mut inflated = Vec::new();
        let read = GzDecoder::new(body.as_ref())
            .take(MAX_INFLATED_BODY_BYTES)
            .read_to_end(&mut inflated);
        match read {
            Ok(_) => {
                headers.remove(CONTENT_ENCODING);
                Ok(Self {
                    status_code,
                    headers,
                    raw: Bytes::from(inflated),
                })
            }
            Err(err) => Err(SdkError::Decode {
                message: format!("gzip: {err}"),
                response: Box::new(Self {
                    status_code,
                    headers,
                    raw: body,
                }),
            }),
        }
    }

    /// Returns a header value as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Returns true when the body is empty or whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.raw.iter().all(u8::is_ascii_whitespace)
    }

    /// Returns true for `2xx` statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status_code >= 200 && self.status_code < 300
    }
}

// ============================================================================
// SECTION: Envelopes
// ============================================================================

/// Metadata block of the collection envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionMetadata {
    /// Media type of the resources.
    pub collection_type: String,
    /// Number of resources.
    pub collection_total: i64,
}

impl CollectionMetadata {
    /// Builds metadata for `total` resources of `collection_type`.
    #[must_use]
    pub fn new(collection_type: impl Into<String>, total: i64) -> Self {
        Self {
            collection_type: collection_type.into(),
            collection_total: total,
        }
    }
}

/// Collection envelope wrapping every list and single-object payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>", serialize = "T: Serialize"))]
pub struct Envelope<T> {
    /// Collection metadata.
    #[serde(default)]
    pub metadata: CollectionMetadata,
    /// Resources in server order.
    #[serde(default)]
    pub resources: Vec<T>,
}

impl<T> Envelope<T> {
    /// Wraps `resources`, setting `collection_total` to their count.
    #[must_use]
    pub fn new(collection_type: impl Into<String>, resources: Vec<T>) -> Self {
        let total = i64::try_from(resources.len()).unwrap_or(i64::MAX);
        Self {
            metadata: CollectionMetadata::new(collection_type, total),
            resources,
        }
    }

    /// Returns the first resource, the single-object accessor.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.resources.first()
    }

    /// Consumes the envelope and returns the first resource.
    #[must_use]
    pub fn into_first(self) -> Option<T> {
        self.resources.into_iter().next()
    }
}

/// Envelope as read off the wire before variant resolution.
#[derive(Debug, Deserialize)]
struct RawEnvelope {
    /// Collection metadata.
    #[serde(default)]
    metadata: CollectionMetadata,
    /// Undecoded resources.
    #[serde(default)]
    resources: Vec<Value>,
}

/// Error envelope returned for non-2xx statuses.
#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    /// Server-reported trace identifier.
    #[serde(default)]
    trace: Option<String>,
    /// Error entries.
    #[serde(default)]
    errors: Vec<ServiceErrorItem>,
    /// Single-message shape used by gateways.
    #[serde(default)]
    error: Option<String>,
    /// Alternative single-message shape.
    #[serde(default)]
    message: Option<String>,
}

// ============================================================================
// SECTION: Results
// ============================================================================

/// Successful call outcome.
///
/// # Invariants
/// - `result` is `None` for `204` and blank `2xx` bodies.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    /// Decoded result.
    pub result: Option<T>,
    /// Response that produced the result.
    pub response: DetailedResponse,
}

/// Result alias returned by every operation.
pub type ApiResult<T> = Result<ApiResponse<T>, SdkError>;

// ============================================================================
// SECTION: Classification
// ============================================================================

/// Converts a non-2xx response into [`SdkError::Http`].
#[must_use]
pub fn http_error(response: DetailedResponse) -> SdkError {
    let envelope = serde_json::from_slice::<ErrorEnvelope>(&response.raw).unwrap_or_default();
    let message = envelope
        .errors
        .first()
        .map(|item| item.message.clone())
        .filter(|message| !message.is_empty())
        .or(envelope.error)
        .or(envelope.message)
        .unwrap_or_else(|| generic_message(&response));
    SdkError::Http(Box::new(HttpError {
        status: response.status_code,
        message,
        trace: envelope.trace,
        errors: envelope.errors,
        response,
    }))
}

/// Message used when the error body is not an envelope.
fn generic_message(response: &DetailedResponse) -> String {
    let reason = StatusCode::from_u16(response.status_code)
        .ok()
        .and_then(|status| status.canonical_reason())
        .unwrap_or("unexpected status");
    if response.is_blank() {
        reason.to_string()
    } else {
        format!("{reason}: {}", String::from_utf8_lossy(&response.raw))
    }
}

/// Classifies a response for `operation` and decodes the result.
///
/// # Errors
///
/// Returns [`SdkError::Http`] for non-2xx statuses and [`SdkError::Decode`] or
/// [`SdkError::UnknownVariant`] when a 2xx body does not decode.
pub fn parse_response<O: Operation>(operation: &O, response: DetailedResponse) -> Result<ApiResponse<O::Output>, SdkError> {
    if !response.is_success() {
        return Err(http_error(response));
    }
    if response.status_code == 204 || response.is_blank() {
        return Ok(ApiResponse {
            result: None,
            response,
        });
    }
    match operation.parse(&response.raw) {
        Ok(result) => Ok(ApiResponse {
            result: Some(result),
            response,
        }),
        Err(err) => Err(SdkError::from_decode(err, response)),
    }
}

// ============================================================================
// SECTION: Body Decoding Helpers
// ============================================================================

/// Decodes a plain JSON body.
///
/// # Errors
///
/// Returns [`CodecError::Json`] on malformed input.
pub fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, CodecError> {
    Ok(serde_json::from_slice(body)?)
}

/// Decodes an envelope, resolving each resource through `decode`.
///
/// # Errors
///
/// Returns the first resource failure, or [`CodecError::Json`] for a
/// malformed envelope.
pub fn decode_envelope_with<T>(
    body: &[u8],
    decode: impl Fn(Value) -> Result<T, CodecError>,
) -> Result<Envelope<T>, CodecError> {
    let raw: RawEnvelope = serde_json::from_slice(body)?;
    let resources = raw.resources.into_iter().map(decode).collect::<Result<Vec<_>, _>>()?;
    Ok(Envelope {
        metadata: raw.metadata,
        resources,
    })
}

/// Decodes an envelope of polymorphic resources using `hint` as fallback tag.
///
/// # Errors
///
/// See [`decode_envelope_with`].
pub fn decode_family_envelope<F: Family>(body: &[u8], hint: &ContextHint) -> Result<Envelope<F>, CodecError> {
    decode_envelope_with(body, |value| F::registry().decode(value, hint))
}
