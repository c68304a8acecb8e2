// crates/secrets-manager/src/models/policies.rs
// ============================================================================
// Module: Rotation Policies
// Description: Rotation policy family keyed by the kind implied by secret type.
// Purpose: Model policy bodies and policy read results.
// Dependencies: secrets-manager-core, serde, serde_json, time
// ============================================================================

//! ## Overview
//! The policy kind is never sent by the caller; it follows from the secret
//! type in the path: `username_password` uses `standard_rotation`,
//! `public_cert` uses `public_cert_rotation`, and `private_cert` uses
//! `private_cert_rotation`. Other secret types have no rotation policy.

use std::fmt;

use secrets_manager_core::CodecError;
use secrets_manager_core::ContextHint;
use secrets_manager_core::Discriminator;
use secrets_manager_core::Family;
use secrets_manager_core::WireOrigin;
use secrets_manager_core::codec;
use secrets_manager_core::impl_family_serde;
use secrets_manager_core::impl_tracked;
use serde::Deserialize;
use serde::Serialize;
use serde::Serializer;
use serde_json::Map;
use serde_json::Value;
use time::OffsetDateTime;

use crate::models::common::INTERVAL_UNITS;
use crate::models::common::SECRET_POLICY_COLLECTION;
use crate::models::family::Validate;
use crate::models::family::family;

// ============================================================================
// SECTION: Policy Kinds
// ============================================================================

/// Tag of standard rotation policies.
pub const STANDARD_ROTATION: &str = "standard_rotation";
/// Tag of public certificate rotation policies.
pub const PUBLIC_CERT_ROTATION: &str = "public_cert_rotation";
/// Tag of private certificate rotation policies.
pub const PRIVATE_CERT_ROTATION: &str = "private_cert_rotation";

/// Returns the policy kind used by `secret_type`, if it supports policies.
#[must_use]
pub fn policy_kind_for(secret_type: &str) -> Option<&'static str> {
    match secret_type {
        "username_password" => Some(STANDARD_ROTATION),
        "public_cert" => Some(PUBLIC_CERT_ROTATION),
        "private_cert" => Some(PRIVATE_CERT_ROTATION),
        _ => None,
    }
}

/// Value of the `policy` query parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PolicyType {
    /// Rotation policy.
    #[default]
    Rotation,
}

impl PolicyType {
    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rotation => "rotation",
        }
    }
}

impl fmt::Display for PolicyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Family
// ============================================================================

family! {
    /// Rotation policy of a secret.
    pub enum RotationPolicy ("RotationPolicy", Discriminator::Context) {
        /// Interval-based rotation.
        Standard(StandardRotationPolicy) = "standard_rotation",
        /// Automatic public certificate renewal.
        PublicCert(PublicCertRotationPolicy) = "public_cert_rotation",
        /// Interval-based private certificate renewal.
        PrivateCert(PrivateCertRotationPolicy) = "private_cert_rotation",
    }
}

impl_tracked!(StandardRotationPolicy, PublicCertRotationPolicy, PrivateCertRotationPolicy);

impl_family_serde!(RotationPolicy, serialize);

/// Interval-based rotation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardRotation {
    /// Interval length.
    pub interval: i64,
    /// Interval unit, `day` or `month`.
    pub unit: String,
}

/// Interval-based rotation policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardRotationPolicy {
    /// Policy media type.
    #[serde(rename = "type", default = "policy_media_type")]
    pub policy_type: String,
    /// Rotation settings.
    pub rotation: StandardRotation,
    /// Additional properties.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Object this record was decoded from.
    #[serde(skip)]
    pub origin: WireOrigin,
}

impl StandardRotationPolicy {
    /// Rotates every `interval` units.
    #[must_use]
    pub fn new(interval: i64, unit: impl Into<String>) -> Self {
        Self {
            policy_type: policy_media_type(),
            rotation: StandardRotation {
                interval,
                unit: unit.into(),
            },
            extra: Map::new(),
            origin: WireOrigin::default(),
        }
    }
}

impl Validate for StandardRotationPolicy {
    fn validate(&self) -> Result<(), CodecError> {
        if self.rotation.interval <= 0 {
            return Err(CodecError::invalid("interval", "must be positive"));
        }
        codec::check_enum("unit", &self.rotation.unit, INTERVAL_UNITS)?;
        codec::check_extra_fields(&self.extra, &["type", "rotation"])
    }
}

/// Public certificate renewal settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicCertRotation {
    /// Whether to renew automatically.
    pub auto_rotate: bool,
    /// Whether renewal regenerates the key pair.
    #[serde(default)]
    pub rotate_keys: bool,
}

/// Public certificate rotation policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicCertRotationPolicy {
    /// Policy media type.
    #[serde(rename = "type", default = "policy_media_type")]
    pub policy_type: String,
    /// Renewal settings.
    pub rotation: PublicCertRotation,
    /// Additional properties.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Object this record was decoded from.
    #[serde(skip)]
    pub origin: WireOrigin,
}

impl Validate for PublicCertRotationPolicy {
    fn validate(&self) -> Result<(), CodecError> {
        codec::check_extra_fields(&self.extra, &["type", "rotation"])
    }
}

/// Private certificate renewal settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateCertRotation {
    /// Whether to renew automatically.
    pub auto_rotate: bool,
    /// Interval length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<i64>,
    /// Interval unit, `day` or `month`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// Private certificate rotation policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrivateCertRotationPolicy {
    /// Policy media type.
    #[serde(rename = "type", default = "policy_media_type")]
    pub policy_type: String,
    /// Renewal settings.
    pub rotation: PrivateCertRotation,
    /// Additional properties.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Object this record was decoded from.
    #[serde(skip)]
    pub origin: WireOrigin,
}

impl Validate for PrivateCertRotationPolicy {
    fn validate(&self) -> Result<(), CodecError> {
        let rotation = &self.rotation;
        if rotation.auto_rotate && (rotation.interval.is_none() || rotation.unit.is_none()) {
            return Err(CodecError::missing("interval"));
        }
        if let Some(unit) = &rotation.unit {
            codec::check_enum("unit", unit, INTERVAL_UNITS)?;
        }
        codec::check_extra_fields(&self.extra, &["type", "rotation"])
    }
}

/// Default `type` of a policy body.
fn policy_media_type() -> String {
    SECRET_POLICY_COLLECTION.to_string()
}

// ============================================================================
// SECTION: Policy Resources
// ============================================================================

/// Wire names of the service-managed policy fields.
const POLICY_RESOURCE_FIELDS: [&str; 6] = ["id", "crn", "creation_date", "created_by", "last_update_date", "updated_by"];

/// Stored rotation policy returned by policy reads and writes.
#[derive(Debug, Clone, PartialEq)]
pub struct SecretPolicyResource {
    /// Policy identifier.
    pub id: Option<String>,
    /// Cloud resource name.
    pub crn: Option<String>,
    /// Creation time.
    pub creation_date: Option<OffsetDateTime>,
    /// Creator identifier.
    pub created_by: Option<String>,
    /// Last update time.
    pub last_update_date: Option<OffsetDateTime>,
    /// Last updater identifier.
    pub updated_by: Option<String>,
    /// Policy body.
    pub policy: RotationPolicy,
}

/// Service-managed fields split off a policy resource.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PolicyResourceFields {
    /// Policy identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    /// Cloud resource name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    crn: Option<String>,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
    creation_date: Option<OffsetDateTime>,
    /// Creator identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_by: Option<String>,
    /// Last update time.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
    last_update_date: Option<OffsetDateTime>,
    /// Last updater identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_by: Option<String>,
}

impl SecretPolicyResource {
    /// Decodes a policy resource whose kind follows from `hint`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] when the service fields or the policy body do
    /// not match their schema.
    pub fn decode(raw: Value, hint: &ContextHint) -> Result<Self, CodecError> {
        let Value::Object(mut map) = raw else {
            return Err(CodecError::Json("policy resource must be a JSON object".to_string()));
        };
        let mut managed = Map::new();
        for field in POLICY_RESOURCE_FIELDS {
            if let Some(value) = map.remove(field) {
                managed.insert(field.to_string(), value);
            }
        }
        let fields: PolicyResourceFields = codec::from_fields(managed)?;
        let policy = RotationPolicy::registry().decode_map(map, hint)?;
        Ok(Self {
            id: fields.id,
            crn: fields.crn,
            creation_date: fields.creation_date,
            created_by: fields.created_by,
            last_update_date: fields.last_update_date,
            updated_by: fields.updated_by,
            policy,
        })
    }

    /// Encodes the resource with its policy body flattened in.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] when the policy cannot be serialized.
    pub fn encode(&self) -> Result<Value, CodecError> {
        let mut map = codec::to_fields(&PolicyResourceFields {
            id: self.id.clone(),
            crn: self.crn.clone(),
            creation_date: self.creation_date,
            created_by: self.created_by.clone(),
            last_update_date: self.last_update_date,
            updated_by: self.updated_by.clone(),
        })?;
        map.extend(self.policy.fields()?);
        Ok(Value::Object(map))
    }
}

impl Serialize for SecretPolicyResource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.encode().map_err(serde::ser::Error::custom)?.serialize(serializer)
    }
}
