// crates/secrets-manager/src/models/mod.rs
// ============================================================================
// Module: Models
// Description: Resource records and polymorphic families of the service.
// Purpose: Group every wire type used by the typed operations.
// Dependencies: secrets-manager-core, serde, serde_json, time
// ============================================================================

//! ## Overview
//! Plain records derive serde directly. Polymorphic families implement
//! [`Family`](secrets_manager_core::Family) and resolve variants through their
//! frozen registries; field-discriminated families also implement serde
//! through the registry.

pub mod actions;
pub mod common;
pub mod config_actions;
pub mod elements;
pub mod engine;
pub mod family;
pub mod groups;
pub mod locks;
pub mod metadata;
pub mod notifications;
pub mod policies;
pub mod secrets;
pub mod versions;

pub use actions::SecretAction;
pub use actions::SecretActionName;
pub use actions::SecretVersionActionName;
pub use common::SecretCommon;
pub use common::SecretType;
pub use config_actions::ConfigAction;
pub use config_actions::ConfigActionName;
pub use config_actions::ConfigActionResult;
pub use config_actions::ConfigElementActionData;
pub use elements::ConfigElementConfig;
pub use elements::ConfigElementDef;
pub use elements::ConfigElementGroup;
pub use elements::ConfigElementKind;
pub use elements::ConfigElementMetadata;
pub use engine::EngineConfig;
pub use family::Validate;
pub use groups::SecretGroupMetadataUpdatable;
pub use groups::SecretGroupResource;
pub use locks::InstanceSecretLocks;
pub use locks::LockData;
pub use locks::LockMode;
pub use locks::LockSecretBodyLocksItem;
pub use locks::SecretLockSummary;
pub use metadata::SecretMetadata;
pub use notifications::NotificationsRegistration;
pub use notifications::NotificationsSettings;
pub use policies::PolicyType;
pub use policies::RotationPolicy;
pub use policies::SecretPolicyResource;
pub use secrets::SecretResource;
pub use versions::SecretVersion;
pub use versions::SecretVersionMetadata;
pub use versions::UpdateSecretVersionMetadata;
