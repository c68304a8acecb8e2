// crates/secrets-manager/src/models/common.rs
// ============================================================================
// Module: Common Models
// Description: Secret types, collection media types, and shared field groups.
// Purpose: Define the vocabulary shared by every secret-shaped family.
// Dependencies: secrets-manager-core, serde, serde_json, time
// ============================================================================

//! ## Overview
//! Field groups here are flattened into the concrete variants of the secret,
//! metadata, and version families so the wire shape stays flat while the
//! Rust types share one definition.
//! Invariants:
//! - Timestamps are RFC 3339 on the wire.
//! - Empty sequences and absent optionals are omitted when encoding values
//!   built in code; decoded values re-encode untouched fields as received.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use secrets_manager_core::CodecError;
use secrets_manager_core::codec;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use time::OffsetDateTime;

// ============================================================================
// SECTION: Collection Media Types
// ============================================================================

/// Collection type of secret group envelopes.
pub const SECRET_GROUP_COLLECTION: &str = "application/vnd.ibm.secrets-manager.secret.group+json";
/// Collection type of secret and secret metadata envelopes.
pub const SECRET_COLLECTION: &str = "application/vnd.ibm.secrets-manager.secret+json";
/// Collection type of secret version envelopes.
pub const SECRET_VERSION_COLLECTION: &str = "application/vnd.ibm.secrets-manager.secret.version+json";
/// Collection type of secret version metadata envelopes.
pub const SECRET_VERSION_METADATA_COLLECTION: &str =
    "application/vnd.ibm.secrets-manager.secret.version+json";
/// Collection type of rotation policy envelopes.
pub const SECRET_POLICY_COLLECTION: &str = "application/vnd.ibm.secrets-manager.secret.policy+json";
/// Collection type of lock envelopes.
pub const SECRET_LOCK_COLLECTION: &str = "application/vnd.ibm.secrets-manager.secret.lock+json";
/// Collection type of engine configuration envelopes.
pub const CONFIG_COLLECTION: &str = "application/vnd.ibm.secrets-manager.config+json";
/// Collection type of notification registration envelopes.
pub const NOTIFICATION_COLLECTION: &str = "application/vnd.ibm.secrets-manager.notification+json";

// ============================================================================
// SECTION: Secret Types
// ============================================================================

/// Secret type path segment and discriminator value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecretType {
    /// Arbitrary text payload.
    Arbitrary,
    /// Username and password pair.
    UsernamePassword,
    /// Dynamically generated IAM API key.
    IamCredentials,
    /// Caller-imported certificate.
    ImportedCert,
    /// Certificate ordered from a public CA.
    PublicCert,
    /// Certificate issued by an instance-internal CA.
    PrivateCert,
    /// Key-value payload.
    Kv,
}

impl SecretType {
    /// All secret types in wire order.
    pub const ALL: [Self; 7] = [
        Self::Arbitrary,
        Self::UsernamePassword,
        Self::IamCredentials,
        Self::ImportedCert,
        Self::PublicCert,
        Self::PrivateCert,
        Self::Kv,
    ];

    /// Wire names of all secret types.
    pub const NAMES: [&'static str; 7] = [
        "arbitrary",
        "username_password",
        "iam_credentials",
        "imported_cert",
        "public_cert",
        "private_cert",
        "kv",
    ];

    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Arbitrary => "arbitrary",
            Self::UsernamePassword => "username_password",
            Self::IamCredentials => "iam_credentials",
            Self::ImportedCert => "imported_cert",
            Self::PublicCert => "public_cert",
            Self::PrivateCert => "private_cert",
            Self::Kv => "kv",
        }
    }

    /// Returns true for the three certificate types.
    #[must_use]
    pub const fn is_certificate(self) -> bool {
        matches!(self, Self::ImportedCert | Self::PublicCert | Self::PrivateCert)
    }

    /// Parses a path segment, reporting `field` on failure.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidField`] for unknown names.
    pub fn parse_field(field: &str, value: &str) -> Result<Self, CodecError> {
        value.parse().map_err(|_| CodecError::invalid(field, format!("`{value}` is not a secret type")))
    }
}

impl FromStr for SecretType {
    type Err = CodecError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| CodecError::invalid("secret_type", format!("`{value}` is not a secret type")))
    }
}

impl fmt::Display for SecretType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<SecretType> for String {
    fn from(value: SecretType) -> Self {
        value.as_str().to_string()
    }
}

// ============================================================================
// SECTION: Validation Helpers
// ============================================================================

/// Rotation interval units.
pub const INTERVAL_UNITS: &[&str] = &["day", "month"];

/// Public certificate key algorithms.
pub const KEY_ALGORITHMS: &[&str] = &["RSA2048", "RSA4096", "EC256", "EC384"];

/// Requires an optional string to be present and non-empty.
///
/// # Errors
///
/// Returns [`CodecError::MissingField`] naming `field`.
pub fn require_opt_str(field: &str, value: Option<&String>) -> Result<(), CodecError> {
    codec::require_str(field, codec::require_some(field, value)?)
}

/// Checks an optional enumerated value.
///
/// # Errors
///
/// Returns [`CodecError::InvalidField`] when the value is not allowed.
pub fn check_opt_enum(field: &str, value: Option<&String>, allowed: &[&str]) -> Result<(), CodecError> {
    value.map_or(Ok(()), |value| codec::check_enum(field, value, allowed))
}

// ============================================================================
// SECTION: Shared Field Groups
// ============================================================================

/// Fields every secret resource and metadata record carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecretCommon {
    /// Secret identifier assigned by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Owning secret group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_group_id: Option<String>,
    /// Labels.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    /// Lifecycle state code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<i64>,
    /// Lifecycle state description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_description: Option<String>,
    /// Cloud resource name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crn: Option<String>,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
    pub creation_date: Option<OffsetDateTime>,
    /// Creator identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    /// Last update time.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
    pub last_update_date: Option<OffsetDateTime>,
    /// Number of versions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub versions_total: Option<i64>,
    /// Version summaries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub versions: Vec<Map<String, Value>>,
    /// Number of locks across versions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locks_total: Option<i64>,
    /// Caller metadata attached to the secret.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_metadata: Option<Map<String, Value>>,
    /// Caller metadata attached to the current version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_custom_metadata: Option<Map<String, Value>>,
}

impl SecretCommon {
    /// Wire names of the common fields.
    pub const FIELDS: &'static [&'static str] = &[
        "id",
        "name",
        "description",
        "secret_group_id",
        "labels",
        "state",
        "state_description",
        "crn",
        "creation_date",
        "created_by",
        "last_update_date",
        "versions_total",
        "versions",
        "locks_total",
        "custom_metadata",
        "version_custom_metadata",
        "secret_type",
    ];

    /// Common fields with only the name set.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Requires a name and rejects extra fields shadowing common ones.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MissingField`] or [`CodecError::InvalidField`].
    pub fn validate(&self, extra: &Map<String, Value>) -> Result<(), CodecError> {
        codec::require_str("name", &self.name)?;
        codec::check_extra_fields(extra, Self::FIELDS)
    }
}

/// Validity window of a certificate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateValidity {
    /// Start of validity.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
    pub not_before: Option<OffsetDateTime>,
    /// End of validity.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
    pub not_after: Option<OffsetDateTime>,
}

/// Descriptive fields shared by certificate secrets and their metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CertificateInfo {
    /// Subject common name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_name: Option<String>,
    /// Subject alternative names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alt_names: Vec<String>,
    /// Serial number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    /// Signature algorithm.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    /// Key algorithm.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_algorithm: Option<String>,
    /// Issuer distinguished name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    /// Validity window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validity: Option<CertificateValidity>,
    /// Expiration time.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
    pub expiration_date: Option<OffsetDateTime>,
    /// Whether an intermediate certificate is included.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intermediate_included: Option<bool>,
    /// Whether a private key is included.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key_included: Option<bool>,
}

impl CertificateInfo {
    /// Wire names of the certificate description fields.
    pub const FIELDS: &'static [&'static str] = &[
        "common_name",
        "alt_names",
        "serial_number",
        "algorithm",
        "key_algorithm",
        "issuer",
        "validity",
        "expiration_date",
        "intermediate_included",
        "private_key_included",
    ];
}

/// Automatic rotation settings of a certificate secret.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rotation {
    /// Whether the service rotates the certificate automatically.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_rotate: Option<bool>,
    /// Whether rotation regenerates the key pair.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate_keys: Option<bool>,
    /// Rotation interval length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<i64>,
    /// Rotation interval unit, `day` or `month`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl Rotation {
    /// Checks the interval unit.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidField`] for unknown units or non-positive intervals.
    pub fn validate(&self) -> Result<(), CodecError> {
        check_opt_enum("unit", self.unit.as_ref(), INTERVAL_UNITS)?;
        match self.interval {
            Some(interval) if interval <= 0 => Err(CodecError::invalid("interval", "must be positive")),
            _ => Ok(()),
        }
    }
}
