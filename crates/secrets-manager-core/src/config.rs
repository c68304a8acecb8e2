// crates/secrets-manager-core/src/config.rs
// ============================================================================
// Module: Service Configuration
// Description: External configuration loading and region URL mapping.
// Purpose: Resolve service URL, authenticator, and transport settings from a
//          credentials file and environment variables.
// Dependencies: toml
// ============================================================================

//! ## Overview
//! [`ServiceProperties`] gathers the configuration of one named service from
//! an optional TOML credentials file (path in `IBM_CREDENTIALS_FILE`) and from
//! `<SERVICE>_*` environment variables, which override file values. Lookups go
//! through a caller-supplied function so the process environment can be
//! replaced in tests.
//! Invariants:
//! - Credentials files larger than [`MAX_CREDENTIALS_FILE_SIZE`] are rejected.
//! - Property keys are stored lower-case.
//! - Unknown authentication types fail with [`SdkError::Config`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::AUTH_TYPE_BASIC;
use crate::auth::AUTH_TYPE_BEARER_TOKEN;
use crate::auth::AUTH_TYPE_IAM;
use crate::auth::AUTH_TYPE_NOAUTH;
use crate::auth::Authenticator;
use crate::auth::BasicAuthenticator;
use crate::auth::BearerTokenAuthenticator;
use crate::auth::IamAuthenticator;
use crate::auth::NoAuthAuthenticator;
use crate::error::SdkError;
use crate::retry::RetryPolicy;
use crate::service::ServiceOptions;
use crate::transport::TransportConfig;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable naming the credentials file.
pub const CREDENTIALS_FILE_ENV: &str = "IBM_CREDENTIALS_FILE";

/// Maximum credentials file size in bytes.
pub const MAX_CREDENTIALS_FILE_SIZE: usize = 1024 * 1024;

/// Default service name.
pub const DEFAULT_SERVICE_NAME: &str = "secrets_manager";

/// Recognised property keys.
pub const PROPERTY_KEYS: &[&str] = &[
    "url",
    "auth_type",
    "apikey",
    "auth_url",
    "client_id",
    "client_secret",
    "username",
    "password",
    "bearer_token",
    "disable_ssl",
    "enable_gzip",
    "enable_retries",
    "max_retries",
    "retry_interval",
];

/// Regions with a public Secrets Manager endpoint.
pub const SUPPORTED_REGIONS: &[&str] =
    &["us-south", "us-east", "eu-gb", "eu-de", "eu-es", "au-syd", "jp-tok", "jp-osa", "ca-tor", "br-sao"];

// ============================================================================
// SECTION: Properties
// ============================================================================

/// Resolved configuration properties for one service.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ServiceProperties {
    /// Service name the properties were loaded for.
    service_name: String,
    /// Lower-case keys to values.
    values: BTreeMap<String, String>,
}

impl fmt::Debug for ServiceProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceProperties")
            .field("service_name", &self.service_name)
            .field("keys", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ServiceProperties {
    /// Loads properties from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Config`] when the credentials file is unreadable.
    pub fn load(service_name: &str) -> Result<Self, SdkError> {
        Self::load_with(service_name, |key| env::var(key).ok())
    }

    /// Loads properties through `lookup` instead of the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Config`] when the credentials file is unreadable.
    pub fn load_with<F>(service_name: &str, lookup: F) -> Result<Self, SdkError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut properties = match lookup(CREDENTIALS_FILE_ENV).filter(|path| !path.is_empty()) {
            Some(path) => Self::from_file(Path::new(&path), service_name)?,
            None => Self {
                service_name: service_name.to_string(),
                values: BTreeMap::new(),
            },
        };
        let prefix = env_prefix(service_name);
        for key in PROPERTY_KEYS {
            if let Some(value) = lookup(&format!("{prefix}_{}", key.to_ascii_uppercase())) {
                properties.values.insert((*key).to_string(), value);
            }
        }
        Ok(properties)
    }

    /// Reads the `[service_name]` table of a TOML credentials file.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Config`] when the file is missing, oversized, not
    /// UTF-8, or not valid TOML.
    pub fn from_file(path: &Path, service_name: &str) -> Result<Self, SdkError> {
        let bytes = fs::read(path)
            .map_err(|err| SdkError::Config(format!("credentials file {}: {err}", path.display())))?;
        if bytes.len() > MAX_CREDENTIALS_FILE_SIZE {
            return Err(SdkError::Config("credentials file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| SdkError::Config("credentials file must be utf-8".to_string()))?;
        let table: toml::Table =
            toml::from_str(content).map_err(|err| SdkError::Config(format!("credentials file: {err}")))?;
        let mut values = BTreeMap::new();
        if let Some(section) = table.get(service_name) {
            let section = section
                .as_table()
                .ok_or_else(|| SdkError::Config(format!("credentials entry `{service_name}` must be a table")))?;
            for (key, value) in section {
                let text = match value {
                    toml::Value::String(text) => text.clone(),
                    toml::Value::Integer(number) => number.to_string(),
                    toml::Value::Float(number) => number.to_string(),
                    toml::Value::Boolean(flag) => flag.to_string(),
                    _ => {
                        return Err(SdkError::Config(format!("credentials key `{key}` must be a scalar")));
                    }
                };
                values.insert(key.to_ascii_lowercase(), text);
            }
        }
        Ok(Self {
            service_name: service_name.to_string(),
            values,
        })
    }

    /// Builds properties from explicit key/value pairs.
    #[must_use]
    pub fn from_pairs<'a, I>(service_name: &str, pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Self {
            service_name: service_name.to_string(),
            values: pairs.into_iter().map(|(key, value)| (key.to_ascii_lowercase(), value.to_string())).collect(),
        }
    }

    /// Returns the service name.
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Returns a property value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Returns true when no property was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parses a boolean property.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Config`] for values other than `true` or `false`.
    pub fn flag(&self, key: &str) -> Result<Option<bool>, SdkError> {
        match self.get(key) {
            None => Ok(None),
            Some(value) if value.eq_ignore_ascii_case("true") => Ok(Some(true)),
            Some(value) if value.eq_ignore_ascii_case("false") => Ok(Some(false)),
            Some(value) => Err(SdkError::Config(format!("{key} must be true or false, got `{value}`"))),
        }
    }

    /// Parses an unsigned integer property.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Config`] for non-numeric values.
    pub fn number(&self, key: &str) -> Result<Option<u32>, SdkError> {
        self.get(key)
            .map(|value| {
                value.trim().parse::<u32>().map_err(|_| SdkError::Config(format!("{key} must be a number, got `{value}`")))
            })
            .transpose()
    }

    /// Returns the retry policy selected by `enable_retries`.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Config`] for malformed retry properties.
    pub fn retry_policy(&self) -> Result<Option<RetryPolicy>, SdkError> {
        if !self.flag("enable_retries")?.unwrap_or(false) {
            return Ok(None);
        }
        let max_retries = self.number("max_retries")?.unwrap_or(0);
        let interval = self.number("retry_interval")?.unwrap_or(0);
        Ok(Some(RetryPolicy::new(max_retries, Duration::from_secs(u64::from(interval)))))
    }

    /// Resolves full service options, using `default_url` when no URL is set.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Config`] for unknown authentication types or
    /// malformed properties.
    pub fn service_options(&self, default_url: &str) -> Result<ServiceOptions, SdkError> {
        let authenticator = authenticator_from_properties(self)?;
        let url = self.get("url").unwrap_or(default_url);
        let mut options = ServiceOptions::new(self.service_name.clone(), url, authenticator)
            .with_transport_config(TransportConfig {
                disable_ssl_verification: self.flag("disable_ssl")?.unwrap_or(false),
                ..TransportConfig::default()
            })
            .with_gzip(self.flag("enable_gzip")?.unwrap_or(false));
        if let Some(policy) = self.retry_policy()? {
            options = options.with_retry(policy);
        }
        Ok(options)
    }
}

/// Returns the environment variable prefix for `service_name`.
#[must_use]
pub fn env_prefix(service_name: &str) -> String {
    service_name.replace('-', "_").to_ascii_uppercase()
}

// ============================================================================
// SECTION: Authenticator Factory
// ============================================================================

/// Builds the authenticator selected by `auth_type` (default `iam`).
///
/// # Errors
///
/// Returns [`SdkError::Config`] for unknown types or incomplete credentials.
pub fn authenticator_from_properties(properties: &ServiceProperties) -> Result<Arc<dyn Authenticator>, SdkError> {
    let auth_type = properties.get("auth_type").unwrap_or(AUTH_TYPE_IAM);
    let required = |key: &str| -> Result<String, SdkError> {
        properties
            .get(key)
            .map(str::to_string)
            .ok_or_else(|| SdkError::Config(format!("{key} is required for {auth_type} authentication")))
    };
    let authenticator: Arc<dyn Authenticator> = if auth_type.eq_ignore_ascii_case(AUTH_TYPE_NOAUTH) {
        Arc::new(NoAuthAuthenticator)
    } else if auth_type.eq_ignore_ascii_case(AUTH_TYPE_BASIC) {
        Arc::new(BasicAuthenticator::new(required("username")?, required("password")?))
    } else if auth_type.eq_ignore_ascii_case(AUTH_TYPE_BEARER_TOKEN) {
        Arc::new(BearerTokenAuthenticator::new(required("bearer_token")?))
    } else if auth_type.eq_ignore_ascii_case(AUTH_TYPE_IAM) {
        let mut iam = IamAuthenticator::new(required("apikey")?)?;
        if let Some(url) = properties.get("auth_url") {
            iam = iam.with_url(url);
        }
        if let (Some(id), Some(secret)) = (properties.get("client_id"), properties.get("client_secret")) {
            iam = iam.with_client_credentials(id, secret);
        }
        Arc::new(iam)
    } else {
        return Err(SdkError::Config(format!("unrecognized authentication type: {auth_type}")));
    };
    authenticator.validate()?;
    Ok(authenticator)
}

// ============================================================================
// SECTION: Regions
// ============================================================================

/// Returns the endpoint of `instance_id` in `region`.
///
/// # Errors
///
/// Returns [`SdkError::InvalidField`] for empty identifiers or unsupported regions.
pub fn service_url_for_region(instance_id: &str, region: &str) -> Result<String, SdkError> {
    if instance_id.is_empty() {
        return Err(SdkError::MissingField {
            field: "instance_id".to_string(),
        });
    }
    if !SUPPORTED_REGIONS.contains(&region) {
        return Err(SdkError::invalid("region", format!("`{region}` is not a supported region")));
    }
    Ok(format!("https://{instance_id}.{region}.secrets-manager.appdomain.cloud"))
}
