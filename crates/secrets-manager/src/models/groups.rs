// crates/secrets-manager/src/models/groups.rs
// ============================================================================
// Module: Secret Groups
// Description: Secret group resources and their updatable metadata.
// Purpose: Model access-control buckets for secrets.
// Dependencies: secrets-manager-core, serde, serde_json, time
// ============================================================================

//! ## Overview
//! Secret groups accept arbitrary caller-supplied properties next to their
//! declared fields; they are kept in `extra` and checked for shadowing.

use secrets_manager_core::CodecError;
use secrets_manager_core::codec;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use time::OffsetDateTime;

/// Secret group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecretGroupResource {
    /// Group identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Group name.
    #[serde(default)]
    pub name: String,
    /// Group description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
    pub creation_date: Option<OffsetDateTime>,
    /// Last update time.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
    pub last_update_date: Option<OffsetDateTime>,
    /// Resource media type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    /// Additional properties.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SecretGroupResource {
    /// Wire names of the declared fields.
    pub const FIELDS: &'static [&'static str] =
        &["id", "name", "description", "creation_date", "last_update_date", "type"];

    /// Group named `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds an extra property.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Requires a name and rejects shadowing extra properties.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MissingField`] or [`CodecError::InvalidField`].
    pub fn validate(&self) -> Result<(), CodecError> {
        codec::require_str("name", &self.name)?;
        codec::check_extra_fields(&self.extra, Self::FIELDS)
    }
}

/// Updatable fields of a secret group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretGroupMetadataUpdatable {
    /// New name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
