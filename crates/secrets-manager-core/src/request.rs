// crates/secrets-manager-core/src/request.rs
// ============================================================================
// Module: Request Builder
// Description: Renders an operation into a prepared HTTP request.
// Purpose: Validate inputs, expand URL templates, merge headers, and encode
//          (optionally compressed) JSON bodies before any network I/O.
// Dependencies: bytes, flate2, reqwest, url
// ============================================================================

//! ## Overview
//! [`build_request`] is the only place where an [`Operation`] touches URLs and
//! headers. It fails with a pre-flight [`SdkError`] whenever a path parameter
//! is empty, a field is invalid, or a header cannot be represented.
//! Invariants:
//! - Path parameter values are percent-encoded as single segments.
//! - Header precedence is defaults, then service headers, then operation
//!   headers, then caller headers; the caller wins on duplicates.
//! - Bodies are gzip-compressed only when enabled and at least
//!   [`GZIP_THRESHOLD_BYTES`] long.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::borrow::Cow;
use std::io::Write;

use bytes::Bytes;
use flate2::Compression;
use flate2::write::GzEncoder;
use reqwest::Method;
use reqwest::header::ACCEPT;
use reqwest::header::CONTENT_ENCODING;
use reqwest::header::CONTENT_TYPE;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;
use reqwest::header::USER_AGENT;
use url::Url;

use crate::error::SdkError;
use crate::operation::Operation;
use crate::operation::OperationDescriptor;
use crate::operation::QueryValue;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Minimum encoded body size eligible for gzip compression.
pub const GZIP_THRESHOLD_BYTES: usize = 1024;

/// Header carrying per-operation analytics.
pub const ANALYTICS_HEADER: &str = "X-IBMCloud-SDK-Analytics";

/// Service name reported in the analytics header.
const ANALYTICS_SERVICE_NAME: &str = "secrets_manager";

/// Service version reported in the analytics header.
const ANALYTICS_SERVICE_VERSION: &str = "V1";

/// JSON media type.
const APPLICATION_JSON: &str = "application/json";

/// Default `User-Agent` value.
#[must_use]
pub fn default_user_agent() -> String {
    format!("secrets-manager-rust-sdk/{}", env!("CARGO_PKG_VERSION"))
}

// ============================================================================
// SECTION: Types
// ============================================================================

/// Fully rendered HTTP request.
///
/// # Invariants
/// - `url` is absolute with every template segment expanded.
/// - `headers` contains `Content-Type` whenever `body` is `Some`.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    /// Operation identifier, for logging.
    pub operation: &'static str,
    /// HTTP method.
    pub method: Method,
    /// Absolute request URL.
    pub url: Url,
    /// Request headers.
    pub headers: HeaderMap,
    /// Encoded (possibly compressed) body.
    pub body: Option<Bytes>,
}

/// Service-level inputs to the request builder.
#[derive(Debug, Clone, Copy)]
pub struct RequestSettings<'a> {
    /// Base service URL.
    pub service_url: &'a str,
    /// Service-level default headers.
    pub default_headers: &'a HeaderMap,
    /// Whether request bodies may be compressed.
    pub enable_gzip: bool,
    /// `User-Agent` value.
    pub user_agent: &'a str,
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Builds a prepared request for `operation`.
///
/// # Errors
///
/// Returns [`SdkError::ServiceUrlMissing`] for an empty service URL,
/// [`SdkError::MissingField`] or [`SdkError::InvalidField`] for invalid
/// options, [`SdkError::Encode`] when the body cannot be encoded, and
/// [`SdkError::Config`] when the service URL cannot carry a path.
pub fn build_request<O: Operation>(
    operation: &O,
    settings: &RequestSettings<'_>,
) -> Result<PreparedRequest, SdkError> {
    let descriptor = O::DESCRIPTOR;
    if settings.service_url.is_empty() {
        return Err(SdkError::ServiceUrlMissing);
    }
    let segments = expand_path(&descriptor, &operation.path_params())?;
    operation.validate().map_err(SdkError::from_encode)?;

    let mut url = Url::parse(settings.service_url)
        .map_err(|err| SdkError::Config(format!("invalid service URL: {err}")))?;
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|()| SdkError::Config("service URL cannot be a base".to_string()))?;
        path.pop_if_empty();
        for segment in &segments {
            path.push(segment);
        }
    }
    let query = operation.query_params();
    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for param in query.iter() {
            match &param.value {
                QueryValue::Single(value) => {
                    pairs.append_pair(param.name, value);
                }
                QueryValue::Repeated(values) => {
                    for value in values {
                        pairs.append_pair(param.name, value);
                    }
                }
            }
        }
    }

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));
    headers.insert(USER_AGENT, header_value("User-Agent", settings.user_agent)?);
    for (name, value) in settings.default_headers {
        headers.insert(name.clone(), value.clone());
    }
    let analytics = format!(
        "service_name={ANALYTICS_SERVICE_NAME};service_version={ANALYTICS_SERVICE_VERSION};operation_id={}",
        descriptor.name
    );
    headers.insert(HeaderName::from_static("x-ibmcloud-sdk-analytics"), header_value(ANALYTICS_HEADER, &analytics)?);

    let body = match operation.body().map_err(SdkError::from_encode)? {
        Some(value) => {
            let encoded = serde_json::to_vec(&value).map_err(|err| SdkError::Encode(err.to_string()))?;
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
            if settings.enable_gzip && encoded.len() >= GZIP_THRESHOLD_BYTES {
                headers.insert(CONTENT_ENCODING, HeaderValue::from_static("gzip"));
                Some(Bytes::from(gzip(&encoded)?))
            } else {
                Some(Bytes::from(encoded))
            }
        }
        None => None,
    };

    for (name, value) in operation.headers() {
        let header = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| SdkError::invalid(format!("header {name}"), "invalid header name"))?;
        headers.insert(header, header_value(name, value)?);
    }

    Ok(PreparedRequest {
        operation: descriptor.id,
        method: descriptor.method.as_method(),
        url,
        headers,
        body,
    })
}

/// Expands the URL template into decoded path segments.
fn expand_path<'a>(
    descriptor: &OperationDescriptor,
    params: &[(&'static str, &'a str)],
) -> Result<Vec<Cow<'a, str>>, SdkError> {
    let mut segments = Vec::new();
    for part in descriptor.path.split('/').filter(|part| !part.is_empty()) {
        if let Some(name) = part.strip_prefix('{').and_then(|rest| rest.strip_suffix('}')) {
            let value = params
                .iter()
                .find(|(param, _)| *param == name)
                .map(|(_, value)| *value)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| SdkError::MissingField {
                    field: name.to_string(),
                })?;
            segments.push(Cow::Borrowed(value));
        } else {
            segments.push(Cow::Owned(part.to_string()));
        }
    }
    Ok(segments)
}

/// Converts a header value, mapping failures to `InvalidField`.
fn header_value(name: &str, value: &str) -> Result<HeaderValue, SdkError> {
    HeaderValue::from_str(value).map_err(|_| SdkError::invalid(format!("header {name}"), "invalid header value"))
}

/// Compresses a request body.
fn gzip(body: &[u8]) -> Result<Vec<u8>, SdkError> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(body.len() / 2), Compression::default());
    encoder.write_all(body).map_err(|err| SdkError::Encode(format!("gzip: {err}")))?;
    encoder.finish().map_err(|err| SdkError::Encode(format!("gzip: {err}")))
}

/// Parses and validates a service-level header map.
///
/// # Errors
///
/// Returns [`SdkError::InvalidField`] for names or values HTTP cannot carry.
pub fn header_map<'a, I>(headers: I) -> Result<HeaderMap, SdkError>
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let header = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| SdkError::invalid(format!("header {name}"), "invalid header name"))?;
        map.insert(header, header_value(name, value)?);
    }
    Ok(map)
}
