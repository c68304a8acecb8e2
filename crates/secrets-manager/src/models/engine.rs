// crates/secrets-manager/src/models/engine.rs
// ============================================================================
// Module: Engine Configuration
// Description: Per-secret-type engine configuration family.
// Purpose: Model the IAM key and certificate engine summaries.
// Dependencies: secrets-manager-core, serde, serde_json
// ============================================================================

//! ## Overview
//! Engine configuration is addressed by secret type in the path. Certificate
//! engines only list their config elements by name; elements themselves are
//! managed through [`crate::models::elements`].

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

use crate::models::elements::ConfigElementMetadata;
use crate::models::family::Validate;
use crate::models::family::family;

family! {
    /// Engine configuration of a secret type.
    pub enum EngineConfig ("EngineConfig", Discriminator::Context) {
        /// Public certificate engine.
        PublicCert(PublicCertEngineConfig) = "public_cert",
        /// Private certificate engine.
        PrivateCert(PrivateCertEngineConfig) = "private_cert",
        /// IAM credentials engine.
        IamCredentials(IamCredentialsEngineConfig) = "iam_credentials",
    }
}

impl_tracked!(PublicCertEngineConfig, PrivateCertEngineConfig, IamCredentialsEngineConfig);

impl_family_serde!(EngineConfig, serialize);

/// Public certificate engine summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublicCertEngineConfig {
    /// Configured certificate authorities.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub certificate_authorities: Vec<ConfigElementMetadata>,
    /// Configured DNS providers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dns_providers: Vec<ConfigElementMetadata>,
    /// Additional properties.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Object this record was decoded from.
    #[serde(skip)]
    pub origin: WireOrigin,
}

impl Validate for PublicCertEngineConfig {
    fn validate(&self) -> Result<(), CodecError> {
        codec::check_extra_fields(&self.extra, &["certificate_authorities", "dns_providers"])
    }
}

/// Private certificate engine summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrivateCertEngineConfig {
    /// Configured root CAs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub root_certificate_authorities: Vec<ConfigElementMetadata>,
    /// Configured intermediate CAs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub intermediate_certificate_authorities: Vec<ConfigElementMetadata>,
    /// Configured certificate templates.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub certificate_templates: Vec<ConfigElementMetadata>,
    /// Additional properties.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Object this record was decoded from.
    #[serde(skip)]
    pub origin: WireOrigin,
}

impl Validate for PrivateCertEngineConfig {
    fn validate(&self) -> Result<(), CodecError> {
        codec::check_extra_fields(
            &self.extra,
            &["root_certificate_authorities", "intermediate_certificate_authorities", "certificate_templates"],
        )
    }
}

/// IAM credentials engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IamCredentialsEngineConfig {
    /// API key used to create service IDs.
    #[serde(default)]
    pub api_key: String,
    /// Hash of the configured API key, returned on reads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_hash: Option<String>,
    /// Additional properties.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Object this record was decoded from.
    #[serde(skip)]
    pub origin: WireOrigin,
}

impl IamCredentialsEngineConfig {
    /// Configures the engine with `api_key`.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }
}

impl Validate for IamCredentialsEngineConfig {
    fn validate(&self) -> Result<(), CodecError> {
        codec::require_str("api_key", &self.api_key)?;
        codec::check_extra_fields(&self.extra, &["api_key", "api_key_hash"])
    }
}
