// crates/secrets-manager/src/models/config_actions.rs
// ============================================================================
// Module: Config Element Actions
// Description: CA action bodies and their results.
// Purpose: Model sign-CSR, sign-intermediate, set-signed, revoke, and
//          rotate-CRL requests and the data they return.
// Dependencies: secrets-manager-core, serde, serde_json
// ============================================================================

//! ## Overview
//! Action bodies are keyed by `(config_element, action)` from the path and
//! query; results name their action in a sibling `action_type` field next to
//! `data`.
//! Invariants:
//! - [`ConfigAction::supports`] is true exactly for registered pairs.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use secrets_manager_core::CodecError;
use secrets_manager_core::ContextHint;
use secrets_manager_core::Discriminator;
use secrets_manager_core::Family;
use secrets_manager_core::Registry;
use secrets_manager_core::VariantKey;
use secrets_manager_core::WireOrigin;
use secrets_manager_core::codec;
use secrets_manager_core::impl_family_serde;
use secrets_manager_core::impl_tracked;
use serde::Deserialize;
use serde::Serialize;
use serde::Serializer;
use serde_json::Map;
use serde_json::Value;

use crate::models::common::check_opt_enum;
use crate::models::elements::CERTIFICATE_FORMATS;
use crate::models::elements::SubjectFields;
use crate::models::family::Validate;
use crate::models::family::family;

// ============================================================================
// SECTION: Action Names
// ============================================================================

/// Config element action named in the `action` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigActionName {
    /// Sign a certificate signing request.
    SignCsr,
    /// Sign an intermediate CA.
    SignIntermediate,
    /// Install an externally signed intermediate certificate.
    SetSigned,
    /// Revoke a certificate by serial number.
    Revoke,
    /// Rebuild the certificate revocation list.
    RotateCrl,
}

impl ConfigActionName {
    /// All action names.
    pub const ALL: [Self; 5] = [Self::SignCsr, Self::SignIntermediate, Self::SetSigned, Self::Revoke, Self::RotateCrl];

    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SignCsr => "sign_csr",
            Self::SignIntermediate => "sign_intermediate",
            Self::SetSigned => "set_signed",
            Self::Revoke => "revoke",
            Self::RotateCrl => "rotate_crl",
        }
    }
}

impl FromStr for ConfigActionName {
    type Err = CodecError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == value)
            .ok_or_else(|| CodecError::invalid("action", format!("`{value}` is not a config element action")))
    }
}

impl fmt::Display for ConfigActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ConfigActionName> for String {
    fn from(value: ConfigActionName) -> Self {
        value.as_str().to_string()
    }
}

// ============================================================================
// SECTION: Action Family
// ============================================================================

/// Body of a config element action.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigAction {
    /// Sign a CSR.
    SignCsr(SignCsrAction),
    /// Sign an intermediate CA.
    SignIntermediate(SignIntermediateAction),
    /// Install a signed intermediate certificate.
    SetSigned(SetSignedAction),
    /// Revoke a certificate.
    Revoke(RevokeAction),
    /// Rebuild the CRL.
    RotateCrl(EmptyConfigAction),
}

impl_family_serde!(ConfigAction, serialize);

/// Element kinds accepting each action.
const ACTION_ELEMENTS: [(&str, &[&str]); 5] = [
    ("sign_csr", &["root_certificate_authorities", "intermediate_certificate_authorities"]),
    ("sign_intermediate", &["root_certificate_authorities", "intermediate_certificate_authorities"]),
    ("set_signed", &["intermediate_certificate_authorities"]),
    ("revoke", &["root_certificate_authorities", "intermediate_certificate_authorities"]),
    ("rotate_crl", &["root_certificate_authorities", "intermediate_certificate_authorities"]),
];

/// Returns the decoder for `action`.
fn action_decoder(action: &str) -> fn(Map<String, Value>) -> Result<ConfigAction, CodecError> {
    match action {
        "sign_csr" => |map| codec::from_fields(map).map(ConfigAction::SignCsr),
        "sign_intermediate" => |map| codec::from_fields(map).map(ConfigAction::SignIntermediate),
        "set_signed" => |map| codec::from_fields(map).map(ConfigAction::SetSigned),
        "revoke" => |map| codec::from_fields(map).map(ConfigAction::Revoke),
        _ => |map| codec::from_fields(map).map(ConfigAction::RotateCrl),
    }
}

/// Frozen `(config_element, action)` registry.
static REGISTRY: LazyLock<Registry<ConfigAction>> = LazyLock::new(|| {
    let mut builder = Registry::builder("ConfigAction", Discriminator::Context);
    for (action, elements) in ACTION_ELEMENTS {
        for &element in elements {
            builder = builder.register_action(element, action, action_decoder(action));
        }
    }
    builder.build()
});

impl ConfigAction {
    /// Returns the action this body belongs to.
    #[must_use]
    pub const fn action(&self) -> ConfigActionName {
        match self {
            Self::SignCsr(_) => ConfigActionName::SignCsr,
            Self::SignIntermediate(_) => ConfigActionName::SignIntermediate,
            Self::SetSigned(_) => ConfigActionName::SetSigned,
            Self::Revoke(_) => ConfigActionName::Revoke,
            Self::RotateCrl(_) => ConfigActionName::RotateCrl,
        }
    }

    /// Returns true when `action` is supported on `config_element`.
    #[must_use]
    pub fn supports(config_element: &str, action: &str) -> bool {
        REGISTRY.contains(VariantKey::action(config_element, action))
    }

    /// Returns true when this body may be sent with `action`.
    ///
    /// `sign_intermediate` also accepts a CSR-signing body.
    #[must_use]
    pub fn fits(&self, action: &str) -> bool {
        self.action().as_str() == action
            || (matches!(self, Self::SignCsr(_)) && action == ConfigActionName::SignIntermediate.as_str())
    }
}

impl Family for ConfigAction {
    fn registry() -> &'static Registry<Self> {
        &REGISTRY
    }

    fn tag(&self) -> Option<&str> {
        None
    }

    fn fields(&self) -> Result<Map<String, Value>, CodecError> {
        match self {
            Self::SignCsr(body) => codec::to_fields(body),
            Self::SignIntermediate(body) => codec::to_fields(body),
            Self::SetSigned(body) => codec::to_fields(body),
            Self::Revoke(body) => codec::to_fields(body),
            Self::RotateCrl(body) => codec::to_fields(body),
        }
    }

    fn validate(&self) -> Result<(), CodecError> {
        match self {
            Self::SignCsr(body) => body.validate(),
            Self::SignIntermediate(body) => {
                codec::require_str("intermediate_certificate_authority", &body.intermediate_certificate_authority)?;
                codec::check_extra_fields(&body.extra, &["intermediate_certificate_authority"])
            }
            Self::SetSigned(body) => {
                codec::require_str("certificate", &body.certificate)?;
                codec::check_extra_fields(&body.extra, &["certificate"])
            }
            Self::Revoke(body) => {
                codec::require_str("serial_number", &body.serial_number)?;
                codec::check_extra_fields(&body.extra, &["serial_number"])
            }
            Self::RotateCrl(_) => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Action Bodies
// ============================================================================

/// Body signing a CSR.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignCsrAction {
    /// PEM certificate signing request.
    #[serde(default)]
    pub csr: String,
    /// Subject common name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_name: Option<String>,
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
    /// Requested lease.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<Value>,
    /// Certificate format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Maximum CA path length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_path_length: Option<i64>,
    /// Whether the common name is excluded from the SANs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_cn_from_sans: Option<bool>,
    /// Domains the signed CA may sign for.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permitted_dns_domains: Vec<String>,
    /// Whether CSR values override the configured subject.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_csr_values: Option<bool>,
    /// Subject components.
    #[serde(flatten)]
    pub subject: SubjectFields,
    /// Additional properties.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SignCsrAction {
    /// Wire names of the sign-CSR fields.
    pub const FIELDS: &'static [&'static str] = &[
        "csr",
        "common_name",
        "alt_names",
        "ip_sans",
        "uri_sans",
        "other_sans",
        "ttl",
        "format",
        "max_path_length",
        "exclude_cn_from_sans",
        "permitted_dns_domains",
        "use_csr_values",
    ];

    /// Signs `csr`.
    #[must_use]
    pub fn new(csr: impl Into<String>) -> Self {
        Self {
            csr: csr.into(),
            ..Self::default()
        }
    }

    /// Checks required values and enumerations.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MissingField`] or [`CodecError::InvalidField`].
    pub fn validate(&self) -> Result<(), CodecError> {
        codec::require_str("csr", &self.csr)?;
        check_opt_enum("format", self.format.as_ref(), CERTIFICATE_FORMATS)?;
        codec::check_extra_fields(&self.extra, Self::FIELDS)?;
        codec::check_extra_fields(&self.extra, SubjectFields::FIELDS)
    }
}

/// Body signing an intermediate CA.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignIntermediateAction {
    /// Name of the intermediate CA to sign.
    #[serde(default)]
    pub intermediate_certificate_authority: String,
    /// Additional properties.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body installing a signed intermediate certificate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetSignedAction {
    /// PEM signed certificate.
    #[serde(default)]
    pub certificate: String,
    /// Additional properties.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body revoking a certificate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevokeAction {
    /// Serial number of the certificate to revoke.
    #[serde(default)]
    pub serial_number: String,
    /// Additional properties.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of actions without parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmptyConfigAction {
    /// Additional properties.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ============================================================================
// SECTION: Action Results
// ============================================================================

family! {
    /// Data returned by a config element action.
    pub enum ConfigActionResult ("ConfigActionResult", Discriminator::Context) {
        /// Signed CSR.
        SignCsr(SignedCertificateData) = "sign_csr",
        /// Signed intermediate CA.
        SignIntermediate(SignedCertificateData) = "sign_intermediate",
        /// Installed certificate.
        SetSigned(EmptyActionResult) = "set_signed",
        /// Revocation result.
        Revoke(RevokeActionResult) = "revoke",
        /// Rebuilt CRL.
        RotateCrl(EmptyActionResult) = "rotate_crl",
    }
}

impl_tracked!(SignedCertificateData, RevokeActionResult, EmptyActionResult);

impl_family_serde!(ConfigActionResult, serialize);

/// Certificate produced by a signing action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedCertificateData {
    /// PEM certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate: Option<String>,
    /// PEM issuing CA certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuing_ca: Option<String>,
    /// PEM CA chain.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ca_chain: Vec<String>,
    /// Serial number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    /// Expiration in seconds since the epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<i64>,
    /// Object this record was decoded from.
    #[serde(skip)]
    pub origin: WireOrigin,
}

impl Validate for SignedCertificateData {}

/// Revocation result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevokeActionResult {
    /// Revocation time in seconds since the epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revocation_time: Option<i64>,
    /// Object this record was decoded from.
    #[serde(skip)]
    pub origin: WireOrigin,
}

impl Validate for RevokeActionResult {}

/// Result of actions returning no data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyActionResult {
    /// Object this record was decoded from.
    #[serde(skip)]
    pub origin: WireOrigin,
}

impl Validate for EmptyActionResult {}

/// Action result resource.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigElementActionData {
    /// Action that produced the data.
    pub action_type: String,
    /// Action data.
    pub data: ConfigActionResult,
}

/// Action result as read off the wire.
#[derive(Debug, Deserialize)]
struct RawActionData {
    /// Action name.
    #[serde(default, alias = "request_type")]
    action_type: Option<String>,
    /// Undecoded data.
    #[serde(default)]
    data: Option<Value>,
}

impl ConfigElementActionData {
    /// Decodes a result, falling back to `requested` when the payload does
    /// not name its action.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] when the action is unknown or the data does not
    /// match its schema.
    pub fn decode(raw: Value, requested: Option<&str>) -> Result<Self, CodecError> {
        let raw: RawActionData = serde_json::from_value(raw)?;
        let Some(action_type) = raw.action_type.or_else(|| requested.map(str::to_string)) else {
            return Err(CodecError::MissingDiscriminator {
                family: ConfigActionResult::registry().family(),
            });
        };
        let data = raw.data.unwrap_or_else(|| Value::Object(Map::new()));
        let data = codec::decode(data, &ContextHint::tag(action_type.as_str()))?;
        Ok(Self {
            action_type,
            data,
        })
    }
}

impl Serialize for ConfigElementActionData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = Map::new();
        map.insert("action_type".to_string(), Value::String(self.action_type.clone()));
        let data = self.data.fields().map_err(serde::ser::Error::custom)?;
        map.insert("data".to_string(), Value::Object(data));
        map.serialize(serializer)
    }
}
