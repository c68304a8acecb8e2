// crates/secrets-manager/src/models/locks.rs
// ============================================================================
// Module: Secret Locks
// Description: Lock request bodies and lock read results.
// Purpose: Model named holds on secret versions.
// Dependencies: serde, serde_json, time
// ============================================================================

//! ## Overview
//! Locks are plain records; none of them is polymorphic. Lock names must be
//! non-empty and are checked before a lock or unlock request is sent.

use std::fmt;

use secrets_manager_core::CodecError;
use secrets_manager_core::codec;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use time::OffsetDateTime;

/// Lock acquisition mode sent in the `mode` query parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LockMode {
    /// Shared lock; the service default, sent without a `mode` parameter.
    #[default]
    Advisory,
    /// Removes other locks with the same name from previous versions.
    Exclusive,
    /// Like `Exclusive`, and deletes versions left without locks.
    ExclusiveDelete,
}

impl LockMode {
    /// Returns the `mode` query value, or `None` for advisory locks.
    #[must_use]
    pub const fn query_value(self) -> Option<&'static str> {
        match self {
            Self::Advisory => None,
            Self::Exclusive => Some("exclusive"),
            Self::ExclusiveDelete => Some("exclusive_delete"),
        }
    }
}

impl fmt::Display for LockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.query_value().unwrap_or("advisory"))
    }
}

/// Lock to acquire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockSecretBodyLocksItem {
    /// Lock name.
    pub name: String,
    /// Lock description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Caller attributes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Map<String, Value>>,
}

impl LockSecretBodyLocksItem {
    /// Lock named `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Body of lock requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockSecretBody {
    /// Locks to acquire.
    pub locks: Vec<LockSecretBodyLocksItem>,
}

impl LockSecretBody {
    /// Requires at least one lock and non-empty names.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MissingField`] naming `locks` or `name`.
    pub fn validate(&self) -> Result<(), CodecError> {
        codec::require_non_empty("locks", &self.locks)?;
        self.locks.iter().try_for_each(|lock| codec::require_str("name", &lock.name))
    }
}

/// Body of unlock requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockSecretBody {
    /// Names of locks to release.
    pub locks: Vec<String>,
}

impl UnlockSecretBody {
    /// Requires at least one non-empty lock name.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MissingField`] naming `locks`.
    pub fn validate(&self) -> Result<(), CodecError> {
        codec::require_non_empty("locks", &self.locks)?;
        self.locks.iter().try_for_each(|name| codec::require_str("locks", name))
    }
}

/// Lock held on a version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretLock {
    /// Lock name.
    #[serde(default)]
    pub name: String,
    /// Lock description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Caller attributes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Map<String, Value>>,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
    pub creation_date: Option<OffsetDateTime>,
    /// Creator identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    /// Last update time.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
    pub last_update_date: Option<OffsetDateTime>,
}

/// Locks of one version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockedVersion {
    /// Version identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
    /// Version alias, `current` or `previous`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Locks on the version.
    #[serde(default)]
    pub locks: Vec<SecretLock>,
}

/// Lock listing of one secret or version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockData {
    /// Secret identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_id: Option<String>,
    /// Secret group identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_group_id: Option<String>,
    /// Versions with their locks.
    #[serde(default)]
    pub versions: Vec<LockedVersion>,
}

/// Lock listing of one secret within an instance-wide listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceSecretLocks {
    /// Secret identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_id: Option<String>,
    /// Secret group identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_group_id: Option<String>,
    /// Secret type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_type: Option<String>,
    /// Versions with their locks.
    #[serde(default)]
    pub versions: Vec<LockedVersion>,
}

/// Lock names of one version after a lock change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockSummaryVersion {
    /// Version identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
    /// Version alias.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Lock names on the version.
    #[serde(default)]
    pub locks: Vec<String>,
}

/// Result of lock and unlock requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretLockSummary {
    /// Secret identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_id: Option<String>,
    /// Secret group identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_group_id: Option<String>,
    /// Versions with their lock names.
    #[serde(default)]
    pub versions: Vec<LockSummaryVersion>,
}
