// crates/secrets-manager/src/options/mod.rs
// ============================================================================
// Module: Operation Options
// Description: One options type per REST operation.
// Purpose: Carry path, query, body, and header inputs and declare how each
//          operation is sent and decoded.
// Dependencies: secrets-manager-core, serde_json
// ============================================================================

//! ## Overview
//! Constructors take exactly the mandatory fields; optional fields have
//! `with_*` setters. Constructors accept empty values so the request builder
//! can reject them uniformly before any network I/O.
//! Invariants:
//! - Every options type implements [`Operation`](secrets_manager_core::Operation).
//! - Collection request bodies are validated resource by resource.

use secrets_manager_core::CodecError;
use secrets_manager_core::CollectionMetadata;
use secrets_manager_core::codec;
use serde_json::Value;
use serde_json::json;

pub mod config;
pub mod groups;
pub mod locks;
pub mod metadata;
pub mod notifications;
pub mod policies;
pub mod secrets;
pub mod versions;

pub use config::ActionOnConfigElementOptions;
pub use config::CreateConfigElementOptions;
pub use config::DeleteConfigElementOptions;
pub use config::GetConfigElementOptions;
pub use config::GetConfigElementsOptions;
pub use config::GetConfigOptions;
pub use config::PutConfigOptions;
pub use config::UpdateConfigElementOptions;
pub use groups::CreateSecretGroupOptions;
pub use groups::DeleteSecretGroupOptions;
pub use groups::GetSecretGroupOptions;
pub use groups::ListSecretGroupsOptions;
pub use groups::UpdateSecretGroupMetadataOptions;
pub use locks::GetLocksOptions;
pub use locks::GetSecretVersionLocksOptions;
pub use locks::ListInstanceSecretsLocksOptions;
pub use locks::LockSecretOptions;
pub use locks::LockSecretVersionOptions;
pub use locks::UnlockSecretOptions;
pub use locks::UnlockSecretVersionOptions;
pub use metadata::GetSecretMetadataOptions;
pub use metadata::UpdateSecretMetadataOptions;
pub use notifications::CreateNotificationsRegistrationOptions;
pub use notifications::DeleteNotificationsRegistrationOptions;
pub use notifications::GetNotificationsRegistrationOptions;
pub use notifications::SendTestNotificationOptions;
pub use policies::GetPolicyOptions;
pub use policies::PutPolicyOptions;
pub use secrets::CreateSecretOptions;
pub use secrets::DeleteSecretOptions;
pub use secrets::GetSecretOptions;
pub use secrets::ListAllSecretsOptions;
pub use secrets::ListSecretsOptions;
pub use secrets::UpdateSecretOptions;
pub use versions::GetSecretVersionMetadataOptions;
pub use versions::GetSecretVersionOptions;
pub use versions::ListSecretVersionsOptions;
pub use versions::UpdateSecretVersionMetadataOptions;
pub use versions::UpdateSecretVersionOptions;

// ============================================================================
// SECTION: Shared Helpers
// ============================================================================

/// Largest page size accepted by list operations.
pub const MAX_LIMIT: i64 = 5000;

/// Adds the per-call header setter to options types.
macro_rules! header_setter {
    ($($options:ty),+ $(,)?) => {
        $(
            impl $options {
                /// Adds a header sent with this call only.
                #[must_use]
                pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
                    self.headers.insert(name.into(), value.into());
                    self
                }
            }
        )+
    };
}

pub(crate) use header_setter;

/// Checks paging parameters.
///
/// # Errors
///
/// Returns [`CodecError::InvalidField`] for a `limit` outside `1..=5000` or a
/// negative `offset`.
pub(crate) fn check_paging(limit: Option<i64>, offset: Option<i64>) -> Result<(), CodecError> {
    if limit.is_some_and(|limit| !(1..=MAX_LIMIT).contains(&limit)) {
        return Err(CodecError::invalid("limit", format!("must be between 1 and {MAX_LIMIT}")));
    }
    if offset.is_some_and(|offset| offset < 0) {
        return Err(CodecError::invalid("offset", "must not be negative"));
    }
    Ok(())
}

/// Requires a resource tag to equal the tag implied by the URL.
///
/// # Errors
///
/// Returns [`CodecError::InvalidField`] naming `resources`.
pub(crate) fn check_resource_tag(expected: &str, actual: Option<&str>) -> Result<(), CodecError> {
    if actual == Some(expected) {
        return Ok(());
    }
    Err(CodecError::invalid(
        "resources",
        format!("resource type {} does not match {expected}", actual.unwrap_or("<none>")),
    ))
}

/// Wraps encoded resources in a collection envelope body.
///
/// # Errors
///
/// Returns [`CodecError::MissingField`] for an empty collection type or an
/// empty resource list.
pub(crate) fn envelope_body(metadata: &CollectionMetadata, resources: Vec<Value>) -> Result<Option<Value>, CodecError> {
    codec::require_str("metadata.collection_type", &metadata.collection_type)?;
    codec::require_non_empty("resources", &resources)?;
    Ok(Some(json!({
        "metadata": serde_json::to_value(metadata)?,
        "resources": resources,
    })))
}
