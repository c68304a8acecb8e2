// crates/secrets-manager/src/models/elements.rs
// ============================================================================
// Module: Configuration Elements
// Description: Certificate authorities, DNS providers, and certificate templates.
// Purpose: Model config element definitions whose payload shape is selected
//          by a sibling `type` field.
// Dependencies: secrets-manager-core, serde, serde_json, time
// ============================================================================

//! ## Overview
//! A config element definition is `{name, type, config}`. The `type` value
//! sits next to `config` rather than inside it, so [`ConfigElementDef`] reads
//! it first and hands it to the [`ConfigElementConfig`] registry as a context
//! hint. Element kinds (the path segment) constrain which config types are
//! accepted.
//! Invariants:
//! - Certificate templates reference their CA by name only.
//! - Unknown config types decode to [`ConfigElementConfig::Opaque`] and are
//!   sent back unchanged.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use secrets_manager_core::CodecError;
use secrets_manager_core::ContextHint;
use secrets_manager_core::Discriminator;
use secrets_manager_core::Family;
use secrets_manager_core::WireOrigin;
use secrets_manager_core::codec;
use secrets_manager_core::impl_tracked;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde_json::Map;
use serde_json::Value;
use time::OffsetDateTime;

use crate::models::common::check_opt_enum;
use crate::models::family::Validate;
use crate::models::family::family;

// ============================================================================
// SECTION: Element Kinds
// ============================================================================

/// Config element kind named in the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigElementKind {
    /// ACME certificate authorities of the public certificate engine.
    CertificateAuthorities,
    /// DNS providers of the public certificate engine.
    DnsProviders,
    /// Root CAs of the private certificate engine.
    RootCertificateAuthorities,
    /// Intermediate CAs of the private certificate engine.
    IntermediateCertificateAuthorities,
    /// Certificate templates of the private certificate engine.
    CertificateTemplates,
}

impl ConfigElementKind {
    /// All element kinds.
    pub const ALL: [Self; 5] = [
        Self::CertificateAuthorities,
        Self::DnsProviders,
        Self::RootCertificateAuthorities,
        Self::IntermediateCertificateAuthorities,
        Self::CertificateTemplates,
    ];

    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CertificateAuthorities => "certificate_authorities",
            Self::DnsProviders => "dns_providers",
            Self::RootCertificateAuthorities => "root_certificate_authorities",
            Self::IntermediateCertificateAuthorities => "intermediate_certificate_authorities",
            Self::CertificateTemplates => "certificate_templates",
        }
    }

    /// Returns the secret type whose engine owns this element kind.
    #[must_use]
    pub const fn secret_type(self) -> &'static str {
        match self {
            Self::CertificateAuthorities | Self::DnsProviders => "public_cert",
            Self::RootCertificateAuthorities | Self::IntermediateCertificateAuthorities | Self::CertificateTemplates => {
                "private_cert"
            }
        }
    }

    /// Returns the config types accepted by this element kind.
    #[must_use]
    pub const fn config_types(self) -> &'static [&'static str] {
        match self {
            Self::CertificateAuthorities => &["letsencrypt", "letsencrypt-stage"],
            Self::DnsProviders => &["cis", "classic_infrastructure"],
            Self::RootCertificateAuthorities => &["root_certificate_authority"],
            Self::IntermediateCertificateAuthorities => &["intermediate_certificate_authority"],
            Self::CertificateTemplates => &["certificate_template"],
        }
    }

    /// Checks that `secret_type` owns `element` and parses the element kind.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidField`] for unknown kinds or mismatched
    /// secret types.
    pub fn check_pair(secret_type: &str, element: &str) -> Result<Self, CodecError> {
        let kind: Self = element.parse()?;
        if kind.secret_type() == secret_type {
            Ok(kind)
        } else {
            Err(CodecError::invalid(
                "config_element",
                format!("`{element}` is not a config element of `{secret_type}`"),
            ))
        }
    }
}

impl FromStr for ConfigElementKind {
    type Err = CodecError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| CodecError::invalid("config_element", format!("`{value}` is not a config element kind")))
    }
}

impl fmt::Display for ConfigElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ConfigElementKind> for String {
    fn from(value: ConfigElementKind) -> Self {
        value.as_str().to_string()
    }
}

// ============================================================================
// SECTION: Config Payload Family
// ============================================================================

family! {
    /// Payload of a config element, selected by the element's `type`.
    pub enum ConfigElementConfig ("ConfigElementConfig", Discriminator::Context) {
        /// Let's Encrypt production CA.
        LetsEncrypt(LetsEncryptConfig) = "letsencrypt",
        /// Let's Encrypt staging CA.
        LetsEncryptStage(LetsEncryptConfig) = "letsencrypt-stage",
        /// Cloud Internet Services DNS provider.
        Cis(CisConfig) = "cis",
        /// Classic infrastructure DNS provider.
        ClassicInfrastructure(ClassicInfrastructureConfig) = "classic_infrastructure",
        /// Root certificate authority.
        RootCertificateAuthority(RootCertificateAuthorityConfig) = "root_certificate_authority",
        /// Intermediate certificate authority.
        IntermediateCertificateAuthority(IntermediateCertificateAuthorityConfig) = "intermediate_certificate_authority",
        /// Certificate template.
        CertificateTemplate(CertificateTemplateConfig) = "certificate_template",
    }
    opaque Opaque;
}

impl_tracked!(
    LetsEncryptConfig,
    CisConfig,
    ClassicInfrastructureConfig,
    RootCertificateAuthorityConfig,
    IntermediateCertificateAuthorityConfig,
    CertificateTemplateConfig,
);

secrets_manager_core::impl_family_serde!(ConfigElementConfig, serialize);

/// Let's Encrypt account configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LetsEncryptConfig {
    /// PEM account private key.
    #[serde(default)]
    pub private_key: String,
    /// Additional properties.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Object this record was decoded from.
    #[serde(skip)]
    pub origin: WireOrigin,
}

impl Validate for LetsEncryptConfig {
    fn validate(&self) -> Result<(), CodecError> {
        codec::require_str("private_key", &self.private_key)?;
        codec::check_extra_fields(&self.extra, &["private_key"])
    }
}

/// Cloud Internet Services DNS configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CisConfig {
    /// CIS instance CRN.
    #[serde(default)]
    pub cis_crn: String,
    /// API key with access to the CIS instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cis_apikey: Option<String>,
    /// Additional properties.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Object this record was decoded from.
    #[serde(skip)]
    pub origin: WireOrigin,
}

impl Validate for CisConfig {
    fn validate(&self) -> Result<(), CodecError> {
        codec::require_str("cis_crn", &self.cis_crn)?;
        codec::check_extra_fields(&self.extra, &["cis_crn", "cis_apikey"])
    }
}

/// Classic infrastructure DNS configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassicInfrastructureConfig {
    /// Classic infrastructure username.
    #[serde(default)]
    pub classic_infrastructure_username: String,
    /// Classic infrastructure API key.
    #[serde(default)]
    pub classic_infrastructure_password: String,
    /// Additional properties.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Object this record was decoded from.
    #[serde(skip)]
    pub origin: WireOrigin,
}

impl Validate for ClassicInfrastructureConfig {
    fn validate(&self) -> Result<(), CodecError> {
        codec::require_str("classic_infrastructure_username", &self.classic_infrastructure_username)?;
        codec::require_str("classic_infrastructure_password", &self.classic_infrastructure_password)?;
        codec::check_extra_fields(
            &self.extra,
            &["classic_infrastructure_username", "classic_infrastructure_password"],
        )
    }
}

/// Distinguished name components of a certificate subject.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectFields {
    /// Organizational units.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ou: Vec<String>,
    /// Organizations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub organization: Vec<String>,
    /// Countries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub country: Vec<String>,
    /// Localities.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locality: Vec<String>,
    /// Provinces.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub province: Vec<String>,
    /// Street addresses.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub street_address: Vec<String>,
    /// Postal codes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub postal_code: Vec<String>,
}

impl SubjectFields {
    /// Wire names of the subject fields.
    pub const FIELDS: &'static [&'static str] =
        &["ou", "organization", "country", "locality", "province", "street_address", "postal_code"];
}

/// Certificate formats.
pub const CERTIFICATE_FORMATS: &[&str] = &["pem", "pem_bundle"];
/// Private key formats.
pub const PRIVATE_KEY_FORMATS: &[&str] = &["der", "pkcs8"];
/// Key types.
pub const KEY_TYPES: &[&str] = &["rsa", "ec"];

/// Fields shared by root and intermediate CA configurations.
///
/// # Invariants
/// - Contains no flattened members, so it can itself be flattened next to an
///   extra-property map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CertificateAuthorityFields {
    /// Maximum lease of issued certificates.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub max_ttl: Value,
    /// Lease of the certificate revocation list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crl_ttl: Option<Value>,
    /// Whether the CRL is disabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crl_disable: Option<bool>,
    /// Whether CRL distribution points are encoded in issued certificates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crl_distribution_points_encoded: Option<bool>,
    /// Whether issuing certificate URLs are encoded in issued certificates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuing_certificates_urls_encoded: Option<bool>,
    /// Subject common name.
    #[serde(default)]
    pub common_name: String,
    /// Comma-separated subject alternative names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_names: Option<String>,
    /// Comma-separated IP SANs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_sans: Option<String>,
    /// Comma-separated URI SANs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri_sans: Option<String>,
    /// Other SANs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub other_sans: Vec<String>,
    /// Certificate format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Private key format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key_format: Option<String>,
    /// Key type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_type: Option<String>,
    /// Key size in bits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_bits: Option<i64>,
    /// Whether the common name is excluded from the SANs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_cn_from_sans: Option<bool>,
    /// Certificate serial number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    /// CA state reported by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// CA certificate expiration.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
    pub expiration_date: Option<OffsetDateTime>,
    /// Service-generated CA material.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
}

impl CertificateAuthorityFields {
    /// Wire names of the shared CA fields.
    pub const FIELDS: &'static [&'static str] = &[
        "max_ttl",
        "crl_ttl",
        "crl_disable",
        "crl_distribution_points_encoded",
        "issuing_certificates_urls_encoded",
        "common_name",
        "alt_names",
        "ip_sans",
        "uri_sans",
        "other_sans",
        "format",
        "private_key_format",
        "key_type",
        "key_bits",
        "exclude_cn_from_sans",
        "serial_number",
        "status",
        "expiration_date",
        "data",
    ];

    /// Checks required values and enumerations.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MissingField`] or [`CodecError::InvalidField`].
    pub fn validate(&self, extra: &Map<String, Value>) -> Result<(), CodecError> {
        if self.max_ttl.is_null() {
            return Err(CodecError::missing("max_ttl"));
        }
        codec::require_str("common_name", &self.common_name)?;
        check_opt_enum("format", self.format.as_ref(), CERTIFICATE_FORMATS)?;
        check_opt_enum("private_key_format", self.private_key_format.as_ref(), PRIVATE_KEY_FORMATS)?;
        check_opt_enum("key_type", self.key_type.as_ref(), KEY_TYPES)?;
        codec::check_extra_fields(extra, Self::FIELDS)?;
        codec::check_extra_fields(extra, SubjectFields::FIELDS)
    }
}

/// Root certificate authority configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RootCertificateAuthorityConfig {
    /// Shared CA fields.
    #[serde(flatten)]
    pub ca: CertificateAuthorityFields,
    /// Subject components.
    #[serde(flatten)]
    pub subject: SubjectFields,
    /// Requested lease of the root certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<Value>,
    /// Maximum CA path length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_path_length: Option<i64>,
    /// Domains the CA may sign for.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permitted_dns_domains: Vec<String>,
    /// Additional properties.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Object this record was decoded from.
    #[serde(skip)]
    pub origin: WireOrigin,
}

impl Validate for RootCertificateAuthorityConfig {
    fn validate(&self) -> Result<(), CodecError> {
        self.ca.validate(&self.extra)?;
        codec::check_extra_fields(&self.extra, &["ttl", "max_path_length", "permitted_dns_domains"])
    }
}

/// Intermediate certificate authority configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntermediateCertificateAuthorityConfig {
    /// Shared CA fields.
    #[serde(flatten)]
    pub ca: CertificateAuthorityFields,
    /// Subject components.
    #[serde(flatten)]
    pub subject: SubjectFields,
    /// Signing method, `internal` or `external`.
    #[serde(default)]
    pub signing_method: String,
    /// Root CA name when signing internally.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    /// Additional properties.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Object this record was decoded from.
    #[serde(skip)]
    pub origin: WireOrigin,
}

impl Validate for IntermediateCertificateAuthorityConfig {
    fn validate(&self) -> Result<(), CodecError> {
        self.ca.validate(&self.extra)?;
        codec::require_str("signing_method", &self.signing_method)?;
        codec::check_enum("signing_method", &self.signing_method, &["internal", "external"])?;
        if self.signing_method == "internal" && self.issuer.as_deref().is_none_or(str::is_empty) {
            return Err(CodecError::missing("issuer"));
        }
        codec::check_extra_fields(&self.extra, &["signing_method", "issuer"])
    }
}

/// Certificate template configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CertificateTemplateConfig {
    /// Name of the issuing intermediate CA.
    #[serde(default)]
    pub certificate_authority: String,
    /// Comma-separated secret group IDs allowed to use the template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_secret_groups: Option<String>,
    /// Maximum lease.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_ttl: Option<Value>,
    /// Default lease.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<Value>,
    /// Whether `localhost` may be requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_localhost: Option<bool>,
    /// Domains that may be requested.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_domains: Vec<String>,
    /// Whether `allowed_domains` may contain templates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_domains_template: Option<bool>,
    /// Whether bare domains may be requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_bare_domains: Option<bool>,
    /// Whether subdomains may be requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_subdomains: Option<bool>,
    /// Whether glob patterns may be requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_glob_domains: Option<bool>,
    /// Whether any name may be requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_any_name: Option<bool>,
    /// Whether host names are validated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enforce_hostnames: Option<bool>,
    /// Whether IP SANs may be requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_ip_sans: Option<bool>,
    /// URI SANs that may be requested.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_uri_sans: Vec<String>,
    /// Other SANs that may be requested.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_other_sans: Vec<String>,
    /// Whether issued certificates are valid for server auth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_flag: Option<bool>,
    /// Whether issued certificates are valid for client auth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_flag: Option<bool>,
    /// Whether issued certificates are valid for code signing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_signing_flag: Option<bool>,
    /// Whether issued certificates are valid for email protection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_protection_flag: Option<bool>,
    /// Key type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_type: Option<String>,
    /// Key size in bits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_bits: Option<i64>,
    /// Key usages.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_usage: Vec<String>,
    /// Extended key usages.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ext_key_usage: Vec<String>,
    /// Extended key usage OIDs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ext_key_usage_oids: Vec<String>,
    /// Whether the CSR common name is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_csr_common_name: Option<bool>,
    /// Whether the CSR SANs are used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_csr_sans: Option<bool>,
    /// Subject components.
    #[serde(flatten)]
    pub subject: SubjectFields,
    /// Whether a common name is required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_cn: Option<bool>,
    /// Policy OIDs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub policy_identifiers: Vec<String>,
    /// Whether non-CA certificates carry basic constraints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic_constraints_valid_for_non_ca: Option<bool>,
    /// Backdating of `not_before`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_before_duration: Option<Value>,
    /// Additional properties.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Object this record was decoded from.
    #[serde(skip)]
    pub origin: WireOrigin,
}

impl CertificateTemplateConfig {
    /// Wire names of the template fields.
    pub const FIELDS: &'static [&'static str] = &[
        "certificate_authority",
        "allowed_secret_groups",
        "max_ttl",
        "ttl",
        "allow_localhost",
        "allowed_domains",
        "allowed_domains_template",
        "allow_bare_domains",
        "allow_subdomains",
        "allow_glob_domains",
        "allow_any_name",
        "enforce_hostnames",
        "allow_ip_sans",
        "allowed_uri_sans",
        "allowed_other_sans",
        "server_flag",
        "client_flag",
        "code_signing_flag",
        "email_protection_flag",
        "key_type",
        "key_bits",
        "key_usage",
        "ext_key_usage",
        "ext_key_usage_oids",
        "use_csr_common_name",
        "use_csr_sans",
        "require_cn",
        "policy_identifiers",
        "basic_constraints_valid_for_non_ca",
        "not_before_duration",
    ];

    /// Template issuing from `certificate_authority`.
    #[must_use]
    pub fn new(certificate_authority: impl Into<String>) -> Self {
        Self {
            certificate_authority: certificate_authority.into(),
            ..Self::default()
        }
    }
}

impl Validate for CertificateTemplateConfig {
    fn validate(&self) -> Result<(), CodecError> {
        codec::require_str("certificate_authority", &self.certificate_authority)?;
        check_opt_enum("key_type", self.key_type.as_ref(), KEY_TYPES)?;
        codec::check_extra_fields(&self.extra, Self::FIELDS)?;
        codec::check_extra_fields(&self.extra, SubjectFields::FIELDS)
    }
}

// ============================================================================
// SECTION: Element Definitions
// ============================================================================

/// Named config element with its typed payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigElementDef {
    /// Element name.
    pub name: String,
    /// Payload; its tag is the element `type`.
    pub config: ConfigElementConfig,
}

/// Element definition as read off the wire.
#[derive(Debug, Deserialize)]
struct RawConfigElementDef {
    /// Element name.
    #[serde(default)]
    name: String,
    /// Element config type.
    #[serde(rename = "type", default)]
    config_type: Option<String>,
    /// Undecoded payload.
    #[serde(default)]
    config: Option<Value>,
}

impl ConfigElementDef {
    /// Builds a definition.
    #[must_use]
    pub fn new(name: impl Into<String>, config: ConfigElementConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }

    /// Returns the element `type`.
    #[must_use]
    pub fn config_type(&self) -> Option<&str> {
        self.config.tag()
    }

    /// Decodes a definition, using its `type` to select the payload variant.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MissingDiscriminator`] without a `type` and the
    /// payload's decode errors otherwise.
    pub fn decode(raw: Value) -> Result<Self, CodecError> {
        let raw: RawConfigElementDef = serde_json::from_value(raw)?;
        let Some(config_type) = raw.config_type else {
            return Err(CodecError::MissingDiscriminator {
                family: ConfigElementConfig::registry().family(),
            });
        };
        let config = raw.config.unwrap_or_else(|| Value::Object(Map::new()));
        let config = codec::decode(config, &ContextHint::tag(config_type))?;
        Ok(Self {
            name: raw.name,
            config,
        })
    }

    /// Validates and encodes the definition as `{name, type, config}`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MissingField`] for an empty name or untyped
    /// payload, and the payload's validation errors.
    pub fn encode(&self) -> Result<Value, CodecError> {
        codec::require_str("name", &self.name)?;
        let mut map = Map::new();
        map.insert("name".to_string(), Value::String(self.name.clone()));
        map.extend(encode_typed_config(&self.config)?);
        Ok(Value::Object(map))
    }
}

/// Encodes `{type, config}` for a payload.
///
/// # Errors
///
/// Returns [`CodecError::MissingField`] when the payload has no type, and the
/// payload's validation errors.
pub fn encode_typed_config(config: &ConfigElementConfig) -> Result<Map<String, Value>, CodecError> {
    let config_type = config.tag().filter(|tag| !tag.is_empty()).ok_or_else(|| CodecError::missing("type"))?;
    let mut map = Map::new();
    map.insert("type".to_string(), Value::String(config_type.to_string()));
    map.insert("config".to_string(), codec::encode(config)?);
    Ok(map)
}

impl Serialize for ConfigElementDef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = Map::new();
        map.insert("name".to_string(), Value::String(self.name.clone()));
        if let Some(config_type) = self.config_type() {
            map.insert("type".to_string(), Value::String(config_type.to_string()));
        }
        let config = self.config.fields().map_err(serde::ser::Error::custom)?;
        map.insert("config".to_string(), Value::Object(config));
        map.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ConfigElementDef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Self::decode(Value::deserialize(deserializer)?).map_err(serde::de::Error::custom)
    }
}

/// Config element name and type as listed by engine configuration reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigElementMetadata {
    /// Element name.
    #[serde(default)]
    pub name: String,
    /// Element config type.
    #[serde(rename = "type", default)]
    pub config_type: String,
}

/// Config elements of one kind, as returned by element list reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigElementGroup {
    /// ACME certificate authorities.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub certificate_authorities: Vec<ConfigElementDef>,
    /// DNS providers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dns_providers: Vec<ConfigElementDef>,
    /// Root CAs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub root_certificate_authorities: Vec<ConfigElementDef>,
    /// Intermediate CAs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub intermediate_certificate_authorities: Vec<ConfigElementDef>,
    /// Certificate templates.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub certificate_templates: Vec<ConfigElementDef>,
}

impl ConfigElementGroup {
    /// Returns the elements of `kind`.
    #[must_use]
    pub fn elements(&self, kind: ConfigElementKind) -> &[ConfigElementDef] {
        match kind {
            ConfigElementKind::CertificateAuthorities => &self.certificate_authorities,
            ConfigElementKind::DnsProviders => &self.dns_providers,
            ConfigElementKind::RootCertificateAuthorities => &self.root_certificate_authorities,
            ConfigElementKind::IntermediateCertificateAuthorities => &self.intermediate_certificate_authorities,
            ConfigElementKind::CertificateTemplates => &self.certificate_templates,
        }
    }
}
