// crates/secrets-manager/src/models/metadata.rs
// ============================================================================
// Module: Secret Metadata
// Description: The `secret_type`-discriminated secret metadata family.
// Purpose: Model metadata reads and metadata update bodies without payloads.
// Dependencies: secrets-manager-core, serde, serde_json, time
// ============================================================================

//! ## Overview
//! [`SecretMetadata`] mirrors [`SecretResource`](crate::models::SecretResource)
//! without secret material. Metadata read from the service is usually edited
//! and sent back, so every variant keeps unknown properties in `extra`.

use secrets_manager_core::CodecError;
use secrets_manager_core::Discriminator;
use secrets_manager_core::WireOrigin;
use secrets_manager_core::codec;
use secrets_manager_core::impl_family_serde;
use secrets_manager_core::impl_tracked;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use time::OffsetDateTime;

use crate::models::common::CertificateInfo;
use crate::models::common::Rotation;
use crate::models::common::SecretCommon;
use crate::models::family::Validate;
use crate::models::family::family;
use crate::models::secrets::IssuanceInfo;

// ============================================================================
// SECTION: Family
// ============================================================================

family! {
    /// Metadata of a secret of any type.
    pub enum SecretMetadata ("SecretMetadata", Discriminator::Field("secret_type")) {
        /// Arbitrary secret metadata.
        Arbitrary(ArbitrarySecretMetadata) = "arbitrary",
        /// Username and password metadata.
        UsernamePassword(UsernamePasswordSecretMetadata) = "username_password",
        /// IAM credentials metadata.
        IamCredentials(IamCredentialsSecretMetadata) = "iam_credentials",
        /// Imported certificate metadata.
        ImportedCert(CertificateSecretMetadata) = "imported_cert",
        /// Public certificate metadata.
        PublicCert(PublicCertSecretMetadata) = "public_cert",
        /// Private certificate metadata.
        PrivateCert(PrivateCertSecretMetadata) = "private_cert",
        /// Key-value secret metadata.
        Kv(KvSecretMetadata) = "kv",
    }
    opaque Opaque;
}

impl_tracked!(
    ArbitrarySecretMetadata,
    UsernamePasswordSecretMetadata,
    IamCredentialsSecretMetadata,
    CertificateSecretMetadata,
    PublicCertSecretMetadata,
    PrivateCertSecretMetadata,
    KvSecretMetadata,
);

impl_family_serde!(SecretMetadata);

// ============================================================================
// SECTION: Variants
// ============================================================================

/// Arbitrary secret metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArbitrarySecretMetadata {
    /// Common fields.
    #[serde(flatten)]
    pub common: SecretCommon,
    /// Expiration time.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
    pub expiration_date: Option<OffsetDateTime>,
    /// Additional properties.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Object this record was decoded from.
    #[serde(skip)]
    pub origin: WireOrigin,
}

impl ArbitrarySecretMetadata {
    /// Builds metadata carrying only a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            common: SecretCommon::named(name),
            ..Self::default()
        }
    }
}

impl Validate for ArbitrarySecretMetadata {
    fn validate(&self) -> Result<(), CodecError> {
        self.common.validate(&self.extra)?;
        codec::check_extra_fields(&self.extra, &["expiration_date"])
    }
}

/// Username and password metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsernamePasswordSecretMetadata {
    /// Common fields.
    #[serde(flatten)]
    pub common: SecretCommon,
    /// Expiration time.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
    pub expiration_date: Option<OffsetDateTime>,
    /// Next scheduled rotation.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
    pub next_rotation_date: Option<OffsetDateTime>,
    /// Additional properties.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Object this record was decoded from.
    #[serde(skip)]
    pub origin: WireOrigin,
}

impl Validate for UsernamePasswordSecretMetadata {
    fn validate(&self) -> Result<(), CodecError> {
        self.common.validate(&self.extra)?;
        codec::check_extra_fields(&self.extra, &["expiration_date", "next_rotation_date"])
    }
}

/// IAM credentials metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IamCredentialsSecretMetadata {
    /// Common fields.
    #[serde(flatten)]
    pub common: SecretCommon,
    /// Lease duration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<Value>,
    /// Whether reads reuse the current key until rotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reuse_api_key: Option<bool>,
    /// Whether the service ID was supplied by the caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id_is_static: Option<bool>,
    /// Additional properties.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Object this record was decoded from.
    #[serde(skip)]
    pub origin: WireOrigin,
}

impl Validate for IamCredentialsSecretMetadata {
    fn validate(&self) -> Result<(), CodecError> {
        self.common.validate(&self.extra)?;
        codec::check_extra_fields(&self.extra, &["ttl", "reuse_api_key", "service_id_is_static"])
    }
}

/// Imported certificate metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CertificateSecretMetadata {
    /// Common fields.
    #[serde(flatten)]
    pub common: SecretCommon,
    /// Certificate description.
    #[serde(flatten)]
    pub info: CertificateInfo,
    /// Additional properties.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Object this record was decoded from.
    #[serde(skip)]
    pub origin: WireOrigin,
}

impl Validate for CertificateSecretMetadata {
    fn validate(&self) -> Result<(), CodecError> {
        self.common.validate(&self.extra)?;
        codec::check_extra_fields(&self.extra, CertificateInfo::FIELDS)
    }
}

/// Public certificate metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublicCertSecretMetadata {
    /// Common fields.
    #[serde(flatten)]
    pub common: SecretCommon,
    /// Certificate description.
    #[serde(flatten)]
    pub info: CertificateInfo,
    /// Whether the intermediate is bundled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_certs: Option<bool>,
    /// Automatic rotation settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Rotation>,
    /// Order state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuance_info: Option<IssuanceInfo>,
    /// Additional properties.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Object this record was decoded from.
    #[serde(skip)]
    pub origin: WireOrigin,
}

impl Validate for PublicCertSecretMetadata {
    fn validate(&self) -> Result<(), CodecError> {
        self.common.validate(&self.extra)?;
        if let Some(rotation) = &self.rotation {
            rotation.validate()?;
        }
        codec::check_extra_fields(&self.extra, CertificateInfo::FIELDS)?;
        codec::check_extra_fields(&self.extra, &["bundle_certs", "rotation", "issuance_info"])
    }
}

/// Private certificate metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrivateCertSecretMetadata {
    /// Common fields.
    #[serde(flatten)]
    pub common: SecretCommon,
    /// Certificate description.
    #[serde(flatten)]
    pub info: CertificateInfo,
    /// Certificate template configuration name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_template: Option<String>,
    /// Issuing CA configuration name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_authority: Option<String>,
    /// Automatic rotation settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Rotation>,
    /// Revocation time in seconds since the epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revocation_time: Option<i64>,
    /// Next scheduled rotation.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
    pub next_rotation_date: Option<OffsetDateTime>,
    /// Additional properties.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Object this record was decoded from.
    #[serde(skip)]
    pub origin: WireOrigin,
}

impl Validate for PrivateCertSecretMetadata {
    fn validate(&self) -> Result<(), CodecError> {
        self.common.validate(&self.extra)?;
        if let Some(rotation) = &self.rotation {
            rotation.validate()?;
        }
        codec::check_extra_fields(&self.extra, CertificateInfo::FIELDS)?;
        codec::check_extra_fields(
            &self.extra,
            &["certificate_template", "certificate_authority", "rotation", "revocation_time", "next_rotation_date"],
        )
    }
}

/// Key-value secret metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KvSecretMetadata {
    /// Common fields.
    #[serde(flatten)]
    pub common: SecretCommon,
    /// Additional properties.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Object this record was decoded from.
    #[serde(skip)]
    pub origin: WireOrigin,
}

impl Validate for KvSecretMetadata {
    fn validate(&self) -> Result<(), CodecError> {
        self.common.validate(&self.extra)
    }
}
