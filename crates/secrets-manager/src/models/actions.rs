// crates/secrets-manager/src/models/actions.rs
// ============================================================================
// Module: Secret Actions
// Description: Action bodies keyed by `(secret_type, action)`.
// Purpose: Model rotate, restore, revoke, delete-credentials, and DNS
//          validation bodies for the secret update operation.
// Dependencies: secrets-manager-core, serde, serde_json
// ============================================================================

//! ## Overview
//! The action family has no discriminator on the wire: the secret type comes
//! from the path and the action from the `action` query parameter. The
//! registry therefore doubles as the table of supported action pairs.
//! Invariants:
//! - [`SecretAction::supports`] is true exactly for registered pairs.
//! - A body only [`fits`](SecretAction::fits) the pair it was built for.
//! - Action bodies never emit `secret_type`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use secrets_manager_core::CodecError;
use secrets_manager_core::Discriminator;
use secrets_manager_core::Family;
use secrets_manager_core::Registry;
use secrets_manager_core::VariantKey;
use secrets_manager_core::codec;
use secrets_manager_core::impl_family_serde;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::models::common::require_opt_str;

// ============================================================================
// SECTION: Action Names
// ============================================================================

/// Secret action named in the `action` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecretActionName {
    /// Create a new version.
    Rotate,
    /// Restore a previous version.
    Restore,
    /// Revoke a certificate.
    Revoke,
    /// Delete generated IAM credentials.
    DeleteCredentials,
    /// Validate the DNS challenge of a pending public certificate order.
    ValidateDnsChallenge,
}

impl SecretActionName {
    /// All action names.
    pub const ALL: [Self; 5] =
        [Self::Rotate, Self::Restore, Self::Revoke, Self::DeleteCredentials, Self::ValidateDnsChallenge];

    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rotate => "rotate",
            Self::Restore => "restore",
            Self::Revoke => "revoke",
            Self::DeleteCredentials => "delete_credentials",
            Self::ValidateDnsChallenge => "validate_dns_challenge",
        }
    }
}

impl FromStr for SecretActionName {
    type Err = CodecError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == value)
            .ok_or_else(|| CodecError::invalid("action", format!("`{value}` is not a secret action")))
    }
}

impl fmt::Display for SecretActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<SecretActionName> for String {
    fn from(value: SecretActionName) -> Self {
        value.as_str().to_string()
    }
}

/// Action applied to a single secret version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecretVersionActionName {
    /// Revoke the version's certificate.
    Revoke,
}

impl SecretVersionActionName {
    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Revoke => "revoke",
        }
    }
}

impl FromStr for SecretVersionActionName {
    type Err = CodecError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "revoke" => Ok(Self::Revoke),
            other => Err(CodecError::invalid("action", format!("`{other}` is not a secret version action"))),
        }
    }
}

impl From<SecretVersionActionName> for String {
    fn from(value: SecretVersionActionName) -> Self {
        value.as_str().to_string()
    }
}

// ============================================================================
// SECTION: Family
// ============================================================================

/// Body of a secret action.
#[derive(Debug, Clone, PartialEq)]
pub enum SecretAction {
    /// Rotate an arbitrary secret.
    RotateArbitrary(RotateArbitrarySecretBody),
    /// Rotate a username and password secret.
    RotateUsernamePassword(RotateUsernamePasswordSecretBody),
    /// Rotate IAM credentials.
    RotateIamCredentials(RotateCustomMetadataBody),
    /// Re-import a certificate.
    RotateImportedCert(RotateCertificateBody),
    /// Re-order a public certificate.
    RotatePublicCert(RotatePublicCertBody),
    /// Re-issue a private certificate.
    RotatePrivateCert(RotateCustomMetadataBody),
    /// Rotate a key-value secret.
    RotateKv(RotateKvSecretBody),
    /// Restore a previous version.
    Restore(RestoreSecretBody),
    /// Revoke a certificate.
    Revoke(EmptyActionBody),
    /// Delete generated IAM credentials.
    DeleteCredentials(DeleteCredentialsBody),
    /// Validate the DNS challenge of a public certificate order.
    ValidateDnsChallenge(EmptyActionBody),
}

impl_family_serde!(SecretAction, serialize);

/// Secret types accepting `restore`.
const RESTORE_TYPES: [&str; 4] = ["arbitrary", "username_password", "imported_cert", "kv"];
/// Secret types accepting `revoke`.
const REVOKE_TYPES: [&str; 3] = ["imported_cert", "public_cert", "private_cert"];

/// Decodes a variant body.
fn decode_as<T: serde::de::DeserializeOwned>(
    map: Map<String, Value>,
    wrap: fn(T) -> SecretAction,
) -> Result<SecretAction, CodecError> {
    codec::from_fields(map).map(wrap)
}

/// Frozen `(secret_type, action)` registry.
static REGISTRY: LazyLock<Registry<SecretAction>> = LazyLock::new(|| {
    let mut builder = Registry::builder("SecretAction", Discriminator::Context)
        .register_action("arbitrary", "rotate", |map| decode_as(map, SecretAction::RotateArbitrary))
        .register_action("username_password", "rotate", |map| decode_as(map, SecretAction::RotateUsernamePassword))
        .register_action("iam_credentials", "rotate", |map| decode_as(map, SecretAction::RotateIamCredentials))
        .register_action("imported_cert", "rotate", |map| decode_as(map, SecretAction::RotateImportedCert))
        .register_action("public_cert", "rotate", |map| decode_as(map, SecretAction::RotatePublicCert))
        .register_action("private_cert", "rotate", |map| decode_as(map, SecretAction::RotatePrivateCert))
        .register_action("kv", "rotate", |map| decode_as(map, SecretAction::RotateKv))
        .register_action("iam_credentials", "delete_credentials", |map| {
            decode_as(map, SecretAction::DeleteCredentials)
        })
        .register_action("public_cert", "validate_dns_challenge", |map| {
            decode_as(map, SecretAction::ValidateDnsChallenge)
        });
    for tag in RESTORE_TYPES {
        builder = builder.register_action(tag, "restore", |map| decode_as(map, SecretAction::Restore));
    }
    for tag in REVOKE_TYPES {
        builder = builder.register_action(tag, "revoke", |map| decode_as(map, SecretAction::Revoke));
    }
    builder.build()
});

impl SecretAction {
    /// Returns the action this body belongs to.
    #[must_use]
    pub const fn action(&self) -> SecretActionName {
        match self {
            Self::RotateArbitrary(_)
            | Self::RotateUsernamePassword(_)
            | Self::RotateIamCredentials(_)
            | Self::RotateImportedCert(_)
            | Self::RotatePublicCert(_)
            | Self::RotatePrivateCert(_)
            | Self::RotateKv(_) => SecretActionName::Rotate,
            Self::Restore(_) => SecretActionName::Restore,
            Self::Revoke(_) => SecretActionName::Revoke,
            Self::DeleteCredentials(_) => SecretActionName::DeleteCredentials,
            Self::ValidateDnsChallenge(_) => SecretActionName::ValidateDnsChallenge,
        }
    }

    /// Returns true when `action` is supported for `secret_type`.
    #[must_use]
    pub fn supports(secret_type: &str, action: &str) -> bool {
        REGISTRY.contains(VariantKey::action(secret_type, action))
    }

    /// Returns true when this body is the variant keyed by `(secret_type, action)`.
    #[must_use]
    pub fn fits(&self, secret_type: &str, action: &str) -> bool {
        self.action().as_str() == action && self.tag().is_none_or(|tag| tag == secret_type)
    }
}

impl Family for SecretAction {
    fn registry() -> &'static Registry<Self> {
        &REGISTRY
    }

    fn tag(&self) -> Option<&str> {
        match self {
            Self::RotateArbitrary(_) => Some("arbitrary"),
            Self::RotateUsernamePassword(_) => Some("username_password"),
            Self::RotateIamCredentials(_) | Self::DeleteCredentials(_) => Some("iam_credentials"),
            Self::RotateImportedCert(_) => Some("imported_cert"),
            Self::RotatePublicCert(_) | Self::ValidateDnsChallenge(_) => Some("public_cert"),
            Self::RotatePrivateCert(_) => Some("private_cert"),
            Self::RotateKv(_) => Some("kv"),
            Self::Restore(_) | Self::Revoke(_) => None,
        }
    }

    fn fields(&self) -> Result<Map<String, Value>, CodecError> {
        match self {
            Self::RotateArbitrary(body) => codec::to_fields(body),
            Self::RotateUsernamePassword(body) => codec::to_fields(body),
            Self::RotateIamCredentials(body) | Self::RotatePrivateCert(body) => codec::to_fields(body),
            Self::RotateImportedCert(body) => codec::to_fields(body),
            Self::RotatePublicCert(body) => codec::to_fields(body),
            Self::RotateKv(body) => codec::to_fields(body),
            Self::Restore(body) => codec::to_fields(body),
            Self::Revoke(body) | Self::ValidateDnsChallenge(body) => codec::to_fields(body),
            Self::DeleteCredentials(body) => codec::to_fields(body),
        }
    }

    fn validate(&self) -> Result<(), CodecError> {
        match self {
            Self::RotateArbitrary(body) => {
                codec::require_str("payload", &body.payload)?;
                codec::check_extra_fields(&body.extra, &["payload", "custom_metadata", "version_custom_metadata"])
            }
            Self::RotateUsernamePassword(body) => {
                codec::require_str("password", &body.password)?;
                codec::check_extra_fields(&body.extra, &["password", "custom_metadata", "version_custom_metadata"])
            }
            Self::RotateIamCredentials(body) | Self::RotatePrivateCert(body) => {
                codec::check_extra_fields(&body.extra, &["custom_metadata", "version_custom_metadata"])
            }
            Self::RotateImportedCert(body) => {
                codec::require_str("certificate", &body.certificate)?;
                codec::check_extra_fields(
                    &body.extra,
                    &["certificate", "private_key", "intermediate", "custom_metadata", "version_custom_metadata"],
                )
            }
            Self::RotatePublicCert(body) => codec::check_extra_fields(
                &body.extra,
                &["rotate_keys", "custom_metadata", "version_custom_metadata"],
            ),
            Self::RotateKv(body) => {
                codec::check_extra_fields(&body.extra, &["payload", "custom_metadata", "version_custom_metadata"])
            }
            Self::Restore(body) => {
                require_opt_str("version_id", body.version_id.as_ref())?;
                codec::check_extra_fields(&body.extra, &["version_id", "custom_metadata", "version_custom_metadata"])
            }
            Self::Revoke(body) | Self::ValidateDnsChallenge(body) => codec::check_extra_fields(&body.extra, &[]),
            Self::DeleteCredentials(body) => {
                if body.api_key_id.is_none() && body.service_id.is_none() {
                    return Err(CodecError::missing("api_key_id"));
                }
                codec::check_extra_fields(&body.extra, &["api_key_id", "service_id"])
            }
        }
    }
}

// ============================================================================
// SECTION: Bodies
// ============================================================================

/// Body rotating an arbitrary secret.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RotateArbitrarySecretBody {
    /// New payload.
    #[serde(default)]
    pub payload: String,
    /// Secret metadata to set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_metadata: Option<Map<String, Value>>,
    /// Metadata of the new version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_custom_metadata: Option<Map<String, Value>>,
    /// Additional properties.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RotateArbitrarySecretBody {
    /// Builds a rotation body for `payload`.
    #[must_use]
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            ..Self::default()
        }
    }
}

/// Body rotating a username and password secret.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RotateUsernamePasswordSecretBody {
    /// New password.
    #[serde(default)]
    pub password: String,
    /// Secret metadata to set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_metadata: Option<Map<String, Value>>,
    /// Metadata of the new version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_custom_metadata: Option<Map<String, Value>>,
    /// Additional properties.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body carrying only custom metadata for server-generated rotations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RotateCustomMetadataBody {
    /// Secret metadata to set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_metadata: Option<Map<String, Value>>,
    /// Metadata of the new version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_custom_metadata: Option<Map<String, Value>>,
    /// Additional properties.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body re-importing a certificate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RotateCertificateBody {
    /// PEM certificate.
    #[serde(default)]
    pub certificate: String,
    /// PEM private key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    /// PEM intermediate certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intermediate: Option<String>,
    /// Secret metadata to set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_metadata: Option<Map<String, Value>>,
    /// Metadata of the new version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_custom_metadata: Option<Map<String, Value>>,
    /// Additional properties.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body re-ordering a public certificate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RotatePublicCertBody {
    /// Whether to generate a new key pair.
    #[serde(default)]
    pub rotate_keys: bool,
    /// Secret metadata to set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_metadata: Option<Map<String, Value>>,
    /// Metadata of the new version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_custom_metadata: Option<Map<String, Value>>,
    /// Additional properties.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body rotating a key-value secret.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RotateKvSecretBody {
    /// New payload.
    #[serde(default)]
    pub payload: Map<String, Value>,
    /// Secret metadata to set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_metadata: Option<Map<String, Value>>,
    /// Metadata of the new version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_custom_metadata: Option<Map<String, Value>>,
    /// Additional properties.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body restoring a previous version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestoreSecretBody {
    /// Version to restore.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
    /// Secret metadata to set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_metadata: Option<Map<String, Value>>,
    /// Metadata of the restored version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_custom_metadata: Option<Map<String, Value>>,
    /// Additional properties.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of actions without parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmptyActionBody {
    /// Additional properties.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body deleting generated IAM credentials.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteCredentialsBody {
    /// API key to delete.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_id: Option<String>,
    /// Service ID whose key to delete.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    /// Additional properties.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
