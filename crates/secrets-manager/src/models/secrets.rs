// crates/secrets-manager/src/models/secrets.rs
// ============================================================================
// Module: Secret Resources
// Description: The `secret_type`-discriminated secret resource family.
// Purpose: Model create inputs and read results for every secret type.
// Dependencies: secrets-manager-core, serde, serde_json, time
// ============================================================================

//! ## Overview
//! [`SecretResource`] carries one variant per secret type. The same shapes
//! are sent on create and returned on get, list, and rotate, so every variant
//! keeps caller-supplied extra properties in `extra`.
//! Invariants:
//! - Encoded variants always carry `secret_type` equal to their tag.
//! - Unknown secret types decode to [`SecretResource::Opaque`].

// ============================================================================
// SECTION: Imports
// ============================================================================

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
use crate::models::common::KEY_ALGORITHMS;
use crate::models::common::Rotation;
use crate::models::common::SecretCommon;
use crate::models::common::check_opt_enum;
use crate::models::common::require_opt_str;
use crate::models::family::Validate;
use crate::models::family::family;

// ============================================================================
// SECTION: Family
// ============================================================================

family! {
    /// A secret of any type.
    pub enum SecretResource ("SecretResource", Discriminator::Field("secret_type")) {
        /// Arbitrary text secret.
        Arbitrary(ArbitrarySecretResource) = "arbitrary",
        /// Username and password secret.
        UsernamePassword(UsernamePasswordSecretResource) = "username_password",
        /// IAM credentials secret.
        IamCredentials(IamCredentialsSecretResource) = "iam_credentials",
        /// Imported certificate.
        ImportedCert(ImportedCertSecretResource) = "imported_cert",
        /// Public certificate.
        PublicCert(PublicCertSecretResource) = "public_cert",
        /// Private certificate.
        PrivateCert(PrivateCertSecretResource) = "private_cert",
        /// Key-value secret.
        Kv(KvSecretResource) = "kv",
    }
    opaque Opaque;
}

impl_tracked!(
    ArbitrarySecretResource,
    UsernamePasswordSecretResource,
    IamCredentialsSecretResource,
    ImportedCertSecretResource,
    PublicCertSecretResource,
    PrivateCertSecretResource,
    KvSecretResource,
);

impl_family_serde!(SecretResource);

impl SecretResource {
    /// Returns the fields shared by every known variant.
    #[must_use]
    pub const fn common(&self) -> Option<&SecretCommon> {
        match self {
            Self::Arbitrary(secret) => Some(&secret.common),
            Self::UsernamePassword(secret) => Some(&secret.common),
            Self::IamCredentials(secret) => Some(&secret.common),
            Self::ImportedCert(secret) => Some(&secret.common),
            Self::PublicCert(secret) => Some(&secret.common),
            Self::PrivateCert(secret) => Some(&secret.common),
            Self::Kv(secret) => Some(&secret.common),
            Self::Opaque(_) => None,
        }
    }
}

// ============================================================================
// SECTION: Variants
// ============================================================================

/// Arbitrary text secret.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArbitrarySecretResource {
    /// Common fields.
    #[serde(flatten)]
    pub common: SecretCommon,
    /// Expiration time.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
    pub expiration_date: Option<OffsetDateTime>,
    /// Secret payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    /// Additional properties.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Object this record was decoded from.
    #[serde(skip)]
    pub origin: WireOrigin,
}

impl ArbitrarySecretResource {
    /// Builds a named arbitrary secret.
    #[must_use]
    pub fn new(name: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            common: SecretCommon::named(name),
            payload: Some(payload.into()),
            ..Self::default()
        }
    }
}

impl Validate for ArbitrarySecretResource {
    fn validate(&self) -> Result<(), CodecError> {
        self.common.validate(&self.extra)?;
        require_opt_str("payload", self.payload.as_ref())?;
        codec::check_extra_fields(&self.extra, &["expiration_date", "payload"])
    }
}

/// Username and password secret.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsernamePasswordSecretResource {
    /// Common fields.
    #[serde(flatten)]
    pub common: SecretCommon,
    /// Username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
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

impl UsernamePasswordSecretResource {
    /// Builds a named credential pair.
    #[must_use]
    pub fn new(name: impl Into<String>, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            common: SecretCommon::named(name),
            username: Some(username.into()),
            password: Some(password.into()),
            ..Self::default()
        }
    }
}

impl Validate for UsernamePasswordSecretResource {
    fn validate(&self) -> Result<(), CodecError> {
        self.common.validate(&self.extra)?;
        require_opt_str("username", self.username.as_ref())?;
        require_opt_str("password", self.password.as_ref())?;
        codec::check_extra_fields(&self.extra, &["username", "password", "expiration_date", "next_rotation_date"])
    }
}

/// IAM credentials secret.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IamCredentialsSecretResource {
    /// Common fields.
    #[serde(flatten)]
    pub common: SecretCommon,
    /// Lease duration, either seconds or a duration string such as `"1h"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<Value>,
    /// Access groups the generated service ID joins.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub access_groups: Vec<String>,
    /// Generated API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Generated API key identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_id: Option<String>,
    /// Service ID the key belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    /// Whether the service ID was supplied by the caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id_is_static: Option<bool>,
    /// Whether reads reuse the current key until rotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reuse_api_key: Option<bool>,
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

impl Validate for IamCredentialsSecretResource {
    fn validate(&self) -> Result<(), CodecError> {
        self.common.validate(&self.extra)?;
        match &self.ttl {
            None | Some(Value::Null) => return Err(CodecError::missing("ttl")),
            Some(Value::String(_) | Value::Number(_)) => {}
            Some(_) => return Err(CodecError::invalid("ttl", "must be a duration string or seconds")),
        }
        if self.access_groups.is_empty() && self.service_id.is_none() {
            return Err(CodecError::missing("access_groups"));
        }
        codec::check_extra_fields(
            &self.extra,
            &[
                "ttl",
                "access_groups",
                "api_key",
                "api_key_id",
                "service_id",
                "service_id_is_static",
                "reuse_api_key",
                "next_rotation_date",
            ],
        )
    }
}

/// Imported certificate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportedCertSecretResource {
    /// Common fields.
    #[serde(flatten)]
    pub common: SecretCommon,
    /// Certificate description.
    #[serde(flatten)]
    pub info: CertificateInfo,
    /// PEM certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate: Option<String>,
    /// PEM private key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    /// PEM intermediate certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intermediate: Option<String>,
    /// Additional properties.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Object this record was decoded from.
    #[serde(skip)]
    pub origin: WireOrigin,
}

impl Validate for ImportedCertSecretResource {
    fn validate(&self) -> Result<(), CodecError> {
        self.common.validate(&self.extra)?;
        require_opt_str("certificate", self.certificate.as_ref())?;
        codec::check_extra_fields(&self.extra, CertificateInfo::FIELDS)?;
        codec::check_extra_fields(&self.extra, &["certificate", "private_key", "intermediate"])
    }
}

/// Certificate order state of a public certificate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuanceInfo {
    /// Order time.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
    pub ordered_on: Option<OffsetDateTime>,
    /// Order error code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Order error message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Whether the intermediate is bundled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_certs: Option<bool>,
    /// Order state code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<i64>,
    /// Order state description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_description: Option<String>,
    /// Whether the order came from automatic rotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_rotated: Option<bool>,
    /// CA configuration name used for the order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca: Option<String>,
    /// DNS provider configuration name used for the order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns: Option<String>,
}

/// Public certificate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublicCertSecretResource {
    /// Common fields.
    #[serde(flatten)]
    pub common: SecretCommon,
    /// Certificate description.
    #[serde(flatten)]
    pub info: CertificateInfo,
    /// Certificate authority configuration name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca: Option<String>,
    /// DNS provider configuration name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns: Option<String>,
    /// Whether to bundle the intermediate certificate.
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

impl Validate for PublicCertSecretResource {
    fn validate(&self) -> Result<(), CodecError> {
        self.common.validate(&self.extra)?;
        require_opt_str("common_name", self.info.common_name.as_ref())?;
        require_opt_str("ca", self.ca.as_ref())?;
        require_opt_str("dns", self.dns.as_ref())?;
        check_opt_enum("key_algorithm", self.info.key_algorithm.as_ref(), KEY_ALGORITHMS)?;
        if let Some(rotation) = &self.rotation {
            rotation.validate()?;
        }
        codec::check_extra_fields(&self.extra, CertificateInfo::FIELDS)?;
        codec::check_extra_fields(&self.extra, &["ca", "dns", "bundle_certs", "rotation", "issuance_info"])
    }
}

/// Private certificate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrivateCertSecretResource {
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
    /// IP subject alternative names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_sans: Option<String>,
    /// URI subject alternative names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri_sans: Option<String>,
    /// Other subject alternative names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub other_sans: Vec<String>,
    /// Requested time to live.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<Value>,
    /// Certificate encoding, `pem` or `pem_bundle`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Private key encoding, `der` or `pkcs8`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key_format: Option<String>,
    /// Whether the common name is excluded from the SANs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_cn_from_sans: Option<bool>,
    /// Automatic rotation settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Rotation>,
    /// Revocation time in seconds since the epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revocation_time: Option<i64>,
    /// Next scheduled rotation.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
    pub next_rotation_date: Option<OffsetDateTime>,
    /// Issued certificate material.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_data: Option<Map<String, Value>>,
    /// Additional properties.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Object this record was decoded from.
    #[serde(skip)]
    pub origin: WireOrigin,
}

impl Validate for PrivateCertSecretResource {
    fn validate(&self) -> Result<(), CodecError> {
        self.common.validate(&self.extra)?;
        require_opt_str("certificate_template", self.certificate_template.as_ref())?;
        require_opt_str("common_name", self.info.common_name.as_ref())?;
        check_opt_enum("format", self.format.as_ref(), &["pem", "pem_bundle"])?;
        check_opt_enum("private_key_format", self.private_key_format.as_ref(), &["der", "pkcs8"])?;
        if let Some(rotation) = &self.rotation {
            rotation.validate()?;
        }
        codec::check_extra_fields(&self.extra, CertificateInfo::FIELDS)?;
        codec::check_extra_fields(
            &self.extra,
            &[
                "certificate_template",
                "certificate_authority",
                "ip_sans",
                "uri_sans",
                "other_sans",
                "ttl",
                "format",
                "private_key_format",
                "exclude_cn_from_sans",
                "rotation",
                "revocation_time",
                "next_rotation_date",
                "secret_data",
            ],
        )
    }
}

/// Key-value secret.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KvSecretResource {
    /// Common fields.
    #[serde(flatten)]
    pub common: SecretCommon,
    /// Secret payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Map<String, Value>>,
    /// Additional properties.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Object this record was decoded from.
    #[serde(skip)]
    pub origin: WireOrigin,
}

impl KvSecretResource {
    /// Builds a named key-value secret.
    #[must_use]
    pub fn new(name: impl Into<String>, payload: Map<String, Value>) -> Self {
        Self {
            common: SecretCommon::named(name),
            payload: Some(payload),
            ..Self::default()
        }
    }
}

impl Validate for KvSecretResource {
    fn validate(&self) -> Result<(), CodecError> {
        self.common.validate(&self.extra)?;
        codec::require_some("payload", self.payload.as_ref())?;
        codec::check_extra_fields(&self.extra, &["payload"])
    }
}
