// crates/secrets-manager-core/src/auth.rs
// ============================================================================
// Module: Authenticators
// Description: Credential providers applied to every prepared request.
// Purpose: Attach `Authorization` headers for the supported auth schemes.
// Dependencies: async-trait, base64, reqwest, serde, tokio, tracing, url
// ============================================================================

//! ## Overview
//! An [`Authenticator`] mutates a prepared request just before it is sent.
//! It runs once per attempt, so a token refreshed by the IAM authenticator is
//! picked up by retries.
//! Invariants:
//! - Credentials never appear in `Debug` output or logs.
//! - `Authorization` header values are marked sensitive.
//! - The IAM token is refreshed once less than 20% of its lifetime remains.
//!   A response without `expires_in` counts as a one-hour token.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use reqwest::header::ACCEPT;
use reqwest::header::AUTHORIZATION;
use reqwest::header::CONTENT_TYPE;
use reqwest::header::HeaderValue;
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;
use url::form_urlencoded;

use crate::error::SdkError;
use crate::request::PreparedRequest;
use crate::transport::DEFAULT_TIMEOUT;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `noauth` authentication type.
pub const AUTH_TYPE_NOAUTH: &str = "noauth";
/// `basic` authentication type.
pub const AUTH_TYPE_BASIC: &str = "basic";
/// `bearerToken` authentication type.
pub const AUTH_TYPE_BEARER_TOKEN: &str = "bearerToken";
/// `iam` authentication type.
pub const AUTH_TYPE_IAM: &str = "iam";

/// Default IAM token service.
pub const DEFAULT_IAM_URL: &str = "https://iam.cloud.ibm.com";

/// Grant type for API key exchange.
pub const IAM_GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";

/// Token endpoint path below the IAM URL.
const IAM_TOKEN_PATH: &str = "/identity/token";

/// Fraction of the token lifetime after which a refresh is due.
const IAM_REFRESH_FRACTION: f64 = 0.8;

/// Lifetime assumed when the token response omits `expires_in`.
pub const IAM_DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Applies credentials to outbound requests.
#[async_trait]
pub trait Authenticator: Send + Sync + fmt::Debug {
    /// Returns the configuration name of the scheme.
    fn authentication_type(&self) -> &'static str;

    /// Checks that the configured credentials are usable.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Config`] for missing or malformed credentials.
    fn validate(&self) -> Result<(), SdkError>;

    /// Adds credentials to `request`.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Authentication`] when credentials cannot be obtained.
    async fn authenticate(&self, request: &mut PreparedRequest) -> Result<(), SdkError>;
}

/// Rejects empty values and values that look like unresolved templates.
fn check_credential(name: &str, value: &str) -> Result<(), SdkError> {
    if value.is_empty() {
        return Err(SdkError::Config(format!("{name} is required")));
    }
    if value.contains(['{', '}', '"']) {
        return Err(SdkError::Config(format!("{name} must not contain braces or quotes")));
    }
    Ok(())
}

/// Sets a sensitive `Authorization` header.
fn set_authorization(request: &mut PreparedRequest, value: &str) -> Result<(), SdkError> {
    let mut header = HeaderValue::from_str(value)
        .map_err(|_| SdkError::Authentication("credential is not a valid header value".to_string()))?;
    header.set_sensitive(true);
    request.headers.insert(AUTHORIZATION, header);
    Ok(())
}

// ============================================================================
// SECTION: No Auth
// ============================================================================

/// Leaves requests unauthenticated.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuthAuthenticator;

#[async_trait]
impl Authenticator for NoAuthAuthenticator {
    fn authentication_type(&self) -> &'static str {
        AUTH_TYPE_NOAUTH
    }

    fn validate(&self) -> Result<(), SdkError> {
        Ok(())
    }

    async fn authenticate(&self, _request: &mut PreparedRequest) -> Result<(), SdkError> {
        Ok(())
    }
}

// ============================================================================
// SECTION: Basic
// ============================================================================

/// HTTP basic authentication.
#[derive(Clone)]
pub struct BasicAuthenticator {
    /// Username.
    username: String,
    /// Password.
    password: String,
}

impl BasicAuthenticator {
    /// Creates a basic authenticator.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for BasicAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuthenticator")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl Authenticator for BasicAuthenticator {
    fn authentication_type(&self) -> &'static str {
        AUTH_TYPE_BASIC
    }

    fn validate(&self) -> Result<(), SdkError> {
        check_credential("username", &self.username)?;
        check_credential("password", &self.password)
    }

    async fn authenticate(&self, request: &mut PreparedRequest) -> Result<(), SdkError> {
        let encoded = STANDARD.encode(format!("{}:{}", self.username, self.password));
        set_authorization(request, &format!("Basic {encoded}"))
    }
}

// ============================================================================
// SECTION: Bearer Token
// ============================================================================

/// Caller-managed bearer token.
#[derive(Clone)]
pub struct BearerTokenAuthenticator {
    /// Access token.
    token: String,
}

impl BearerTokenAuthenticator {
    /// Creates a bearer-token authenticator.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Replaces the token.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = token.into();
    }
}

impl fmt::Debug for BearerTokenAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerTokenAuthenticator").field("token", &"<redacted>").finish()
    }
}

#[async_trait]
impl Authenticator for BearerTokenAuthenticator {
    fn authentication_type(&self) -> &'static str {
        AUTH_TYPE_BEARER_TOKEN
    }

    fn validate(&self) -> Result<(), SdkError> {
        if self.token.is_empty() {
            return Err(SdkError::Config("bearer token is required".to_string()));
        }
        Ok(())
    }

    async fn authenticate(&self, request: &mut PreparedRequest) -> Result<(), SdkError> {
        set_authorization(request, &format!("Bearer {}", self.token))
    }
}

// ============================================================================
// SECTION: IAM
// ============================================================================

/// Token endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    /// Access token.
    access_token: String,
    /// Lifetime in seconds.
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Cached IAM access token.
struct CachedToken {
    /// Access token.
    access_token: String,
    /// Instant after which the token is refreshed.
    refresh_at: Instant,
}

/// Exchanges an API key for short-lived IAM access tokens.
///
/// # Invariants
/// - At most one token request is in flight per authenticator.
pub struct IamAuthenticator {
    /// API key.
    apikey: String,
    /// IAM service base URL.
    url: String,
    /// Optional client id and secret for the token endpoint.
    client_credentials: Option<(String, String)>,
    /// HTTP client for the token endpoint.
    client: Client,
    /// Cached token.
    cache: Mutex<Option<CachedToken>>,
}

impl IamAuthenticator {
    /// Creates an IAM authenticator against [`DEFAULT_IAM_URL`].
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Config`] when the HTTP client cannot be built.
    pub fn new(apikey: impl Into<String>) -> Result<Self, SdkError> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|err| SdkError::Config(format!("iam http client: {err}")))?;
        Ok(Self::with_http_client(apikey, client))
    }

    /// Creates an IAM authenticator using `client` for token requests.
    #[must_use]
    pub fn with_http_client(apikey: impl Into<String>, client: Client) -> Self {
        Self {
            apikey: apikey.into(),
            url: DEFAULT_IAM_URL.to_string(),
            client_credentials: None,
            client,
            cache: Mutex::new(None),
        }
    }

    /// Overrides the IAM service URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Sends a client id and secret with token requests.
    #[must_use]
    pub fn with_client_credentials(mut self, client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        self.client_credentials = Some((client_id.into(), client_secret.into()));
        self
    }

    /// Returns the token endpoint URL.
    #[must_use]
    pub fn token_url(&self) -> String {
        format!("{}{IAM_TOKEN_PATH}", self.url.trim_end_matches('/'))
    }

    /// Returns a valid access token, requesting a new one when due.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Authentication`] when the token endpoint fails.
    pub async fn access_token(&self) -> Result<String, SdkError> {
        let mut cache = self.cache.lock().await;
        if let Some(token) = cache.as_ref().filter(|token| Instant::now() < token.refresh_at) {
            return Ok(token.access_token.clone());
        }
        let token = self.request_token().await?;
        let access_token = token.access_token.clone();
        *cache = Some(token);
        drop(cache);
        Ok(access_token)
    }

    /// Calls the token endpoint.
    async fn request_token(&self) -> Result<CachedToken, SdkError> {
        let form = form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", IAM_GRANT_TYPE)
            .append_pair("apikey", &self.apikey)
            .append_pair("response_type", "cloud_iam")
            .finish();
        let url = self.token_url();
        debug!(url = %url, "requesting iam access token");
        let mut builder = self
            .client
            .post(&url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(form);
        if let Some((client_id, client_secret)) = &self.client_credentials {
            builder = builder.basic_auth(client_id, Some(client_secret));
        }
        let started = Instant::now();
        let response = builder
            .send()
            .await
            .map_err(|err| SdkError::Authentication(format!("token request failed: {err}")))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| SdkError::Authentication(format!("token response unreadable: {err}")))?;
        if !status.is_success() {
            return Err(SdkError::Authentication(format!("token endpoint returned {status}")));
        }
        let token: TokenResponse = serde_json::from_slice(&body)
            .map_err(|err| SdkError::Authentication(format!("token response malformed: {err}")))?;
        if token.access_token.is_empty() {
            return Err(SdkError::Authentication("token response has no access_token".to_string()));
        }
        let lifetime = token.expires_in.map_or(IAM_DEFAULT_TOKEN_LIFETIME, Duration::from_secs);
        debug!(expires_in_secs = lifetime.as_secs(), "iam access token refreshed");
        Ok(CachedToken {
            access_token: token.access_token,
            refresh_at: started + lifetime.mul_f64(IAM_REFRESH_FRACTION),
        })
    }
}

impl fmt::Debug for IamAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IamAuthenticator")
            .field("url", &self.url)
            .field("apikey", &"<redacted>")
            .field("client_credentials", &self.client_credentials.as_ref().map(|(id, _)| id))
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Authenticator for IamAuthenticator {
    fn authentication_type(&self) -> &'static str {
        AUTH_TYPE_IAM
    }

    fn validate(&self) -> Result<(), SdkError> {
        check_credential("apikey", &self.apikey)?;
        if let Some((client_id, client_secret)) = &self.client_credentials {
            check_credential("client_id", client_id)?;
            check_credential("client_secret", client_secret)?;
        }
        Ok(())
    }

    async fn authenticate(&self, request: &mut PreparedRequest) -> Result<(), SdkError> {
        let token = self.access_token().await?;
        set_authorization(request, &format!("Bearer {token}"))
    }
}
