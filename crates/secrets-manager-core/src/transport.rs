// crates/secrets-manager-core/src/transport.rs
// ============================================================================
// Module: HTTP Transport
// Description: Round-tripper seam and the default reqwest implementation.
// Purpose: Send prepared requests and return raw responses.
// Dependencies: async-trait, bytes, reqwest
// ============================================================================

//! ## Overview
//! [`HttpRoundTripper`] is the only network seam of the SDK. The default
//! [`ReqwestTransport`] wraps an async reqwest client; tests substitute
//! scripted implementations that record requests.
//! Invariants:
//! - Network failures surface as [`SdkError::Transport`]; HTTP statuses are
//!   never turned into errors here.
//! - Response bodies are capped at [`MAX_RESPONSE_BYTES`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use reqwest::header::HeaderMap;
use reqwest::redirect::Policy;

use crate::error::SdkError;
use crate::request::PreparedRequest;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Maximum redirects followed by the default transport.
pub const MAX_REDIRECTS: usize = 10;

/// Maximum accepted response body size.
pub const MAX_RESPONSE_BYTES: usize = 32 * 1024 * 1024;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Response as returned by a transport.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HeaderMap,
    /// Body bytes as received.
    pub body: Bytes,
}

/// Sends one prepared request.
#[async_trait]
pub trait HttpRoundTripper: Send + Sync {
    /// Performs the round-trip.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Transport`] when no response was received.
    async fn round_trip(&self, request: PreparedRequest) -> Result<RawResponse, SdkError>;
}

/// Settings for [`ReqwestTransport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportConfig {
    /// Whole-request timeout.
    pub timeout: Duration,
    /// Skips TLS certificate verification.
    pub disable_ssl_verification: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            disable_ssl_verification: false,
        }
    }
}

// ============================================================================
// SECTION: Reqwest Transport
// ============================================================================

/// Default transport backed by a pooled reqwest client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    /// Shared client.
    client: Client,
}

impl ReqwestTransport {
    /// Builds a transport from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Config`] when the client cannot be constructed.
    pub fn new(config: TransportConfig) -> Result<Self, SdkError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .danger_accept_invalid_certs(config.disable_ssl_verification)
            .build()
            .map_err(|err| SdkError::Config(format!("http client: {err}")))?;
        Ok(Self {
            client,
        })
    }

    /// Wraps an existing client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self {
            client,
        }
    }
}

#[async_trait]
impl HttpRoundTripper for ReqwestTransport {
    async fn round_trip(&self, request: PreparedRequest) -> Result<RawResponse, SdkError> {
        let mut builder = self.client.request(request.method, request.url).headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }
        let response = builder.send().await.map_err(|err| SdkError::Transport(err.to_string()))?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = read_body_with_limit(response, MAX_RESPONSE_BYTES).await?;
        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

/// Reads a response body while enforcing a hard byte limit.
async fn read_body_with_limit(mut response: reqwest::Response, limit: usize) -> Result<Bytes, SdkError> {
    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await.map_err(|err| SdkError::Transport(err.to_string()))? {
        if body.len().saturating_add(chunk.len()) > limit {
            return Err(SdkError::Transport(format!("response body exceeds {limit} bytes")));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(Bytes::from(body))
}
