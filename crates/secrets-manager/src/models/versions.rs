// crates/secrets-manager/src/models/versions.rs
// ============================================================================
// Module: Secret Versions
// Description: URL-discriminated secret version and version metadata families.
// Purpose: Model version reads whose type is implied by the request path.
// Dependencies: secrets-manager-core, serde, serde_json, time
// ============================================================================

//! ## Overview
//! Version payloads do not repeat `secret_type`; the dispatcher passes the
//! path segment as a [`ContextHint`](secrets_manager_core::ContextHint).
//! Both families are terminal results, so unknown fields are dropped.

use secrets_manager_core::Discriminator;
use secrets_manager_core::WireOrigin;
use secrets_manager_core::impl_family_serde;
use secrets_manager_core::impl_tracked;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use time::OffsetDateTime;

use crate::models::common::CertificateValidity;
use crate::models::family::Validate;
use crate::models::family::family;

// ============================================================================
// SECTION: Shared Version Fields
// ============================================================================

/// Fields every version record carries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionCommon {
    /// Version identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
    pub creation_date: Option<OffsetDateTime>,
    /// Creator identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    /// Whether the payload can still be read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload_available: Option<bool>,
    /// Whether the payload was downloaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloaded: Option<bool>,
    /// Whether the version came from automatic rotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_rotated: Option<bool>,
    /// Number of locks on the version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locks_total: Option<i64>,
    /// Caller metadata attached to the version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_custom_metadata: Option<Map<String, Value>>,
}

// ============================================================================
// SECTION: Version Metadata
// ============================================================================

family! {
    /// Metadata of one secret version.
    pub enum SecretVersionMetadata ("SecretVersionMetadata", Discriminator::Context) {
        /// Arbitrary secret version.
        Arbitrary(BasicVersionMetadata) = "arbitrary",
        /// Username and password version.
        UsernamePassword(BasicVersionMetadata) = "username_password",
        /// IAM credentials version.
        IamCredentials(IamCredentialsVersionMetadata) = "iam_credentials",
        /// Imported certificate version.
        ImportedCert(CertificateVersionMetadata) = "imported_cert",
        /// Public certificate version.
        PublicCert(CertificateVersionMetadata) = "public_cert",
        /// Private certificate version.
        PrivateCert(CertificateVersionMetadata) = "private_cert",
        /// Key-value version.
        Kv(BasicVersionMetadata) = "kv",
    }
}

impl_tracked!(BasicVersionMetadata, CertificateVersionMetadata, IamCredentialsVersionMetadata);

impl_family_serde!(SecretVersionMetadata, serialize);

/// Version metadata without type-specific fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicVersionMetadata {
    /// Common version fields.
    #[serde(flatten)]
    pub common: VersionCommon,
    /// Object this record was decoded from.
    #[serde(skip)]
    pub origin: WireOrigin,
}

impl Validate for BasicVersionMetadata {}

/// IAM credentials version metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IamCredentialsVersionMetadata {
    /// Common version fields.
    #[serde(flatten)]
    pub common: VersionCommon,
    /// API key identifier of the version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_id: Option<String>,
    /// Service ID of the version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    /// Object this record was decoded from.
    #[serde(skip)]
    pub origin: WireOrigin,
}

impl Validate for IamCredentialsVersionMetadata {}

/// Certificate version metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateVersionMetadata {
    /// Common version fields.
    #[serde(flatten)]
    pub common: VersionCommon,
    /// Serial number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    /// Expiration time.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
    pub expiration_date: Option<OffsetDateTime>,
    /// Validity window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validity: Option<CertificateValidity>,
    /// Object this record was decoded from.
    #[serde(skip)]
    pub origin: WireOrigin,
}

impl Validate for CertificateVersionMetadata {}

// ============================================================================
// SECTION: Versions
// ============================================================================

family! {
    /// One secret version including its payload.
    pub enum SecretVersion ("SecretVersion", Discriminator::Context) {
        /// Arbitrary secret version.
        Arbitrary(ArbitrarySecretVersion) = "arbitrary",
        /// Username and password version.
        UsernamePassword(UsernamePasswordSecretVersion) = "username_password",
        /// IAM credentials version.
        IamCredentials(IamCredentialsSecretVersion) = "iam_credentials",
        /// Imported certificate version.
        ImportedCert(CertificateSecretVersion) = "imported_cert",
        /// Public certificate version.
        PublicCert(CertificateSecretVersion) = "public_cert",
        /// Private certificate version.
        PrivateCert(CertificateSecretVersion) = "private_cert",
        /// Key-value version.
        Kv(KvSecretVersion) = "kv",
    }
}

impl_tracked!(
    ArbitrarySecretVersion,
    UsernamePasswordSecretVersion,
    IamCredentialsSecretVersion,
    CertificateSecretVersion,
    KvSecretVersion,
);

impl_family_serde!(SecretVersion, serialize);

/// Arbitrary secret version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArbitrarySecretVersion {
    /// Common version fields.
    #[serde(flatten)]
    pub common: VersionCommon,
    /// Secret payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    /// Object this record was decoded from.
    #[serde(skip)]
    pub origin: WireOrigin,
}

impl Validate for ArbitrarySecretVersion {}

/// Credential pair of a username and password version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsernamePasswordData {
    /// Username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Username and password version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsernamePasswordSecretVersion {
    /// Common version fields.
    #[serde(flatten)]
    pub common: VersionCommon,
    /// Credential pair.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_data: Option<UsernamePasswordData>,
    /// Object this record was decoded from.
    #[serde(skip)]
    pub origin: WireOrigin,
}

impl Validate for UsernamePasswordSecretVersion {}

/// IAM credentials version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IamCredentialsSecretVersion {
    /// Common version fields.
    #[serde(flatten)]
    pub common: VersionCommon,
    /// API key of the version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// API key identifier of the version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_id: Option<String>,
    /// Service ID of the version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    /// Object this record was decoded from.
    #[serde(skip)]
    pub origin: WireOrigin,
}

impl Validate for IamCredentialsSecretVersion {}

/// Certificate material of a certificate version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateData {
    /// PEM certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate: Option<String>,
    /// PEM private key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    /// PEM intermediate certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intermediate: Option<String>,
    /// PEM issuing CA certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuing_ca: Option<String>,
    /// PEM CA chain.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ca_chain: Vec<String>,
}

/// Certificate version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateSecretVersion {
    /// Common version fields.
    #[serde(flatten)]
    pub common: VersionCommon,
    /// Serial number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    /// Expiration time.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
    pub expiration_date: Option<OffsetDateTime>,
    /// Validity window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validity: Option<CertificateValidity>,
    /// Certificate material.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_data: Option<CertificateData>,
    /// Object this record was decoded from.
    #[serde(skip)]
    pub origin: WireOrigin,
}

impl Validate for CertificateSecretVersion {}

/// Key-value version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KvSecretVersion {
    /// Common version fields.
    #[serde(flatten)]
    pub common: VersionCommon,
    /// Secret payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Map<String, Value>>,
    /// Object this record was decoded from.
    #[serde(skip)]
    pub origin: WireOrigin,
}

impl Validate for KvSecretVersion {}

// ============================================================================
// SECTION: Version Metadata Updates
// ============================================================================

/// Updatable metadata of one version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSecretVersionMetadata {
    /// Caller metadata to attach.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_custom_metadata: Option<Map<String, Value>>,
}
