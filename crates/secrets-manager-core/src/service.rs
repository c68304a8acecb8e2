// crates/secrets-manager-core/src/service.rs
// ============================================================================
// Module: Base Service Handle
// Description: Service configuration and the per-call attempt loop.
// Purpose: Hold URL, authenticator, transport, and retry policy, and drive
//          build, authenticate, send, classify, and retry for each call.
// Dependencies: reqwest, tokio, tracing, url
// ============================================================================

//! ## Overview
//! [`BaseService`] is the dispatch core shared by every typed operation.
//! Cloning yields an independent handle: configuration is owned per handle
//! while the authenticator and transport are shared by reference.
//! Invariants:
//! - Pre-flight failures (missing options, empty URL, invalid fields) never
//!   reach the transport.
//! - Attempts within one call are strictly sequential; cancellation and the
//!   deadline are checked before every attempt and observed during every
//!   suspension.
//! - Decode failures and non-retryable statuses end the call immediately.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::HeaderMap;
use tracing::debug;
use tracing::warn;
use url::Url;

use crate::auth::Authenticator;
use crate::context::CallContext;
use crate::error::SdkError;
use crate::operation::Operation;
use crate::request::RequestSettings;
use crate::request::build_request;
use crate::request::default_user_agent;
use crate::request::header_map;
use crate::response::ApiResult;
use crate::response::DetailedResponse;
use crate::response::http_error;
use crate::response::parse_response;
use crate::retry::RetryPolicy;
use crate::retry::retry_after;
use crate::transport::HttpRoundTripper;
use crate::transport::ReqwestTransport;
use crate::transport::TransportConfig;

// ============================================================================
// SECTION: Options
// ============================================================================

/// Resolved construction input for a service handle.
#[derive(Clone)]
pub struct ServiceOptions {
    /// Service name used for configuration lookups and logs.
    pub service_name: String,
    /// Base service URL; empty means unset.
    pub url: String,
    /// Credential provider.
    pub authenticator: Arc<dyn Authenticator>,
    /// Transport override; `None` selects [`ReqwestTransport`].
    pub transport: Option<Arc<dyn HttpRoundTripper>>,
    /// Settings for the default transport.
    pub transport_config: TransportConfig,
    /// Headers added to every request.
    pub default_headers: BTreeMap<String, String>,
    /// Compress large request bodies.
    pub enable_gzip: bool,
    /// Retry policy; `None` disables retries.
    pub retry: Option<RetryPolicy>,
    /// `User-Agent` override.
    pub user_agent: Option<String>,
}

impl ServiceOptions {
    /// Creates options for `service_name` with the given URL and authenticator.
    #[must_use]
    pub fn new(service_name: impl Into<String>, url: impl Into<String>, authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            service_name: service_name.into(),
            url: url.into(),
            authenticator,
            transport: None,
            transport_config: TransportConfig::default(),
            default_headers: BTreeMap::new(),
            enable_gzip: false,
            retry: None,
            user_agent: None,
        }
    }

    /// Uses `transport` instead of the default reqwest transport.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn HttpRoundTripper>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets the default transport settings.
    #[must_use]
    pub const fn with_transport_config(mut self, config: TransportConfig) -> Self {
        self.transport_config = config;
        self
    }

    /// Adds a default header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    /// Enables request compression.
    #[must_use]
    pub const fn with_gzip(mut self, enable: bool) -> Self {
        self.enable_gzip = enable;
        self
    }

    /// Enables retries with `policy`.
    #[must_use]
    pub const fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }

    /// Overrides the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

impl fmt::Debug for ServiceOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceOptions")
            .field("service_name", &self.service_name)
            .field("url", &self.url)
            .field("authenticator", &self.authenticator)
            .field("custom_transport", &self.transport.is_some())
            .field("enable_gzip", &self.enable_gzip)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Service Handle
// ============================================================================

/// Configured service handle.
#[derive(Clone)]
pub struct BaseService {
    /// Service name.
    service_name: String,
    /// Base URL; empty means unset.
    url: String,
    /// Credential provider shared with clones.
    authenticator: Arc<dyn Authenticator>,
    /// Transport shared with clones.
    transport: Arc<dyn HttpRoundTripper>,
    /// Headers added to every request.
    default_headers: HeaderMap,
    /// Compress large request bodies.
    enable_gzip: bool,
    /// Retry policy; `None` disables retries.
    retry: Option<RetryPolicy>,
    /// `User-Agent` value.
    user_agent: String,
}

impl fmt::Debug for BaseService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseService")
            .field("service_name", &self.service_name)
            .field("url", &self.url)
            .field("authenticator", &self.authenticator.authentication_type())
            .field("enable_gzip", &self.enable_gzip)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl BaseService {
    /// Creates a handle from resolved options.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::InvalidField`] for a malformed URL or header and
    /// [`SdkError::Config`] when the authenticator or transport is unusable.
    pub fn new(options: ServiceOptions) -> Result<Self, SdkError> {
        validate_service_url(&options.url)?;
        options.authenticator.validate()?;
        let transport = match options.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(options.transport_config)?),
        };
        Ok(Self {
            service_name: options.service_name,
            url: options.url,
            authenticator: options.authenticator,
            transport,
            default_headers: header_map(&options.default_headers)?,
            enable_gzip: options.enable_gzip,
            retry: options.retry,
            user_agent: options.user_agent.unwrap_or_else(default_user_agent),
        })
    }

    /// Returns the service name.
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Returns the base URL.
    #[must_use]
    pub fn service_url(&self) -> &str {
        &self.url
    }

    /// Replaces the base URL; an empty string unsets it.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::InvalidField`] when `url` is not an absolute URL.
    pub fn set_service_url(&mut self, url: impl Into<String>) -> Result<(), SdkError> {
        let url = url.into();
        validate_service_url(&url)?;
        self.url = url;
        Ok(())
    }

    /// Returns the authenticator.
    #[must_use]
    pub const fn authenticator(&self) -> &Arc<dyn Authenticator> {
        &self.authenticator
    }

    /// Replaces the authenticator.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Config`] when the authenticator fails validation.
    pub fn set_authenticator(&mut self, authenticator: Arc<dyn Authenticator>) -> Result<(), SdkError> {
        authenticator.validate()?;
        self.authenticator = authenticator;
        Ok(())
    }

    /// Replaces the transport.
    pub fn set_transport(&mut self, transport: Arc<dyn HttpRoundTripper>) {
        self.transport = transport;
    }

    /// Enables retries; zero values select the defaults.
    pub fn enable_retries(&mut self, max_retries: u32, max_interval: Duration) {
        self.retry = Some(RetryPolicy::new(max_retries, max_interval));
    }

    /// Installs an explicit retry policy.
    pub const fn set_retry_policy(&mut self, policy: RetryPolicy) {
        self.retry = Some(policy);
    }

    /// Disables retries.
    pub const fn disable_retries(&mut self) {
        self.retry = None;
    }

    /// Returns the retry policy, if retries are enabled.
    #[must_use]
    pub const fn retry_policy(&self) -> Option<RetryPolicy> {
        self.retry
    }

    /// Replaces the default headers.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::InvalidField`] for names or values HTTP cannot carry.
    pub fn set_default_headers(&mut self, headers: &BTreeMap<String, String>) -> Result<(), SdkError> {
        self.default_headers = header_map(headers)?;
        Ok(())
    }

    /// Returns the default headers.
    #[must_use]
    pub const fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    /// Enables or disables request compression.
    pub const fn set_enable_gzip(&mut self, enable: bool) {
        self.enable_gzip = enable;
    }

    /// Returns true when request compression is enabled.
    #[must_use]
    pub const fn is_gzip_enabled(&self) -> bool {
        self.enable_gzip
    }

    /// Runs one operation through the full pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::MissingOptions`] when `operation` is `None`, any
    /// pre-flight error from the request builder, and the classified failure of
    /// the last attempt otherwise.
    pub async fn execute<O: Operation>(&self, operation: Option<&O>, ctx: &CallContext) -> ApiResult<O::Output> {
        let operation = operation.ok_or(SdkError::MissingOptions)?;
        if self.url.is_empty() {
            return Err(SdkError::ServiceUrlMissing);
        }
        let settings = RequestSettings {
            service_url: &self.url,
            default_headers: &self.default_headers,
            enable_gzip: self.enable_gzip,
            user_agent: &self.user_agent,
        };
        let request = build_request(operation, &settings)?;
        let operation_id = O::DESCRIPTOR.id;
        let max_attempts = self.retry.map_or(1, |policy| policy.max_attempts());
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            ctx.check()?;
            let mut prepared = request.clone();
            ctx.guard(self.authenticator.authenticate(&mut prepared)).await??;
            debug!(
                operation = operation_id,
                method = %prepared.method,
                url = %prepared.url,
                attempt,
                "sending request"
            );
            let outcome = match ctx.guard(self.transport.round_trip(prepared)).await? {
                Ok(raw) => DetailedResponse::new(raw.status, raw.headers, raw.body),
                Err(err) => Err(err),
            };
            let failure = match outcome {
                Ok(response) if response.is_success() => return parse_response(operation, response),
                Ok(response) => http_error(response),
                Err(err) => err,
            };
            let Some(policy) = self.retry.filter(|_| failure.is_retryable() && attempt < max_attempts) else {
                return Err(failure);
            };
            let delay = policy.delay(attempt - 1, failure.response().and_then(retry_after));
            warn!(
                operation = operation_id,
                attempt,
                status = failure.status_code().unwrap_or(0),
                error = %failure,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "retrying request"
            );
            ctx.sleep(delay).await?;
        }
    }
}

// ============================================================================
// SECTION: URL Validation
// ============================================================================

/// Checks that `url` is empty or an absolute URL without template braces.
///
/// # Errors
///
/// Returns [`SdkError::InvalidField`] for `service_url`.
pub fn validate_service_url(url: &str) -> Result<(), SdkError> {
    if url.is_empty() {
        return Ok(());
    }
    if url.contains(['{', '}']) {
        return Err(SdkError::invalid("service_url", "contains unresolved template braces"));
    }
    let parsed = Url::parse(url).map_err(|err| SdkError::invalid("service_url", err.to_string()))?;
    if parsed.cannot_be_a_base() {
        return Err(SdkError::invalid("service_url", "must be a hierarchical absolute URL"));
    }
    Ok(())
}
