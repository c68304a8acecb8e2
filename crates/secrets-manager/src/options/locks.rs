// crates/secrets-manager/src/options/locks.rs
// ============================================================================
// Module: Secret Lock Options
// Description: Options for listing, acquiring, and releasing locks.
// Purpose: Manage named holds on secrets and secret versions.
// Dependencies: secrets-manager-core, serde_json
// ============================================================================

//! ## Overview
//! Lock operations exist at secret level and at version level. Advisory
//! locks are the service default and are sent without a `mode` parameter.

use secrets_manager_core::CodecError;
use secrets_manager_core::Envelope;
use secrets_manager_core::HeaderBag;
use secrets_manager_core::HttpMethod;
use secrets_manager_core::Operation;
use secrets_manager_core::OperationDescriptor;
use secrets_manager_core::QueryParams;
use secrets_manager_core::response::decode_json;
use serde_json::Value;

use crate::models::InstanceSecretLocks;
use crate::models::LockData;
use crate::models::LockMode;
use crate::models::SecretLockSummary;
use crate::models::SecretType;
use crate::models::locks::LockSecretBody;
use crate::models::locks::LockSecretBodyLocksItem;
use crate::models::locks::UnlockSecretBody;
use crate::options::check_paging;
use crate::options::header_setter;

// ============================================================================
// SECTION: Secret Locks
// ============================================================================

/// Options for `get_locks`.
#[derive(Debug, Clone, Default)]
pub struct GetLocksOptions {
    /// Secret type.
    pub secret_type: String,
    /// Secret identifier.
    pub id: String,
    /// Page size.
    pub limit: Option<i64>,
    /// Page offset.
    pub offset: Option<i64>,
    /// Lock name filter.
    pub search: Option<String>,
    /// Per-call headers.
    pub headers: HeaderBag,
}

impl GetLocksOptions {
    /// Options listing the locks of secret `id`.
    #[must_use]
    pub fn new(secret_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            secret_type: secret_type.into(),
            id: id.into(),
            ..Self::default()
        }
    }

    /// Sets the page size.
    #[must_use]
    pub const fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the page offset.
    #[must_use]
    pub const fn with_offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Sets the lock name filter.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
}

impl Operation for GetLocksOptions {
    type Output = Envelope<LockData>;

    const DESCRIPTOR: OperationDescriptor = OperationDescriptor {
        id: "get_locks",
        name: "GetLocks",
        method: HttpMethod::Get,
        path: "/api/v1/locks/{secret_type}/{id}",
    };

    fn path_params(&self) -> Vec<(&'static str, &str)> {
        vec![("secret_type", self.secret_type.as_str()), ("id", self.id.as_str())]
    }

    fn query_params(&self) -> QueryParams {
        QueryParams::new()
            .opt("limit", self.limit)
            .opt("offset", self.offset)
            .opt("search", self.search.as_deref())
    }

    fn validate(&self) -> Result<(), CodecError> {
        SecretType::parse_field("secret_type", &self.secret_type)?;
        check_paging(self.limit, self.offset)
    }

    fn headers(&self) -> &HeaderBag {
        &self.headers
    }

    fn parse(&self, body: &[u8]) -> Result<Self::Output, CodecError> {
        decode_json(body)
    }
}

/// Options for `lock_secret`.
#[derive(Debug, Clone, Default)]
pub struct LockSecretOptions {
    /// Secret type.
    pub secret_type: String,
    /// Secret identifier.
    pub id: String,
    /// Locks to acquire.
    pub locks: Vec<LockSecretBodyLocksItem>,
    /// Lock mode.
    pub mode: LockMode,
    /// Per-call headers.
    pub headers: HeaderBag,
}

impl LockSecretOptions {
    /// Options acquiring `locks` on the current version of secret `id`.
    #[must_use]
    pub fn new(secret_type: impl Into<String>, id: impl Into<String>, locks: Vec<LockSecretBodyLocksItem>) -> Self {
        Self {
            secret_type: secret_type.into(),
            id: id.into(),
            locks,
            ..Self::default()
        }
    }

    /// Sets the lock mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: LockMode) -> Self {
        self.mode = mode;
        self
    }
}

impl Operation for LockSecretOptions {
    type Output = Envelope<SecretLockSummary>;

    const DESCRIPTOR: OperationDescriptor = OperationDescriptor {
        id: "lock_secret",
        name: "LockSecret",
        method: HttpMethod::Post,
        path: "/api/v1/locks/{secret_type}/{id}/lock",
    };

    fn path_params(&self) -> Vec<(&'static str, &str)> {
        vec![("secret_type", self.secret_type.as_str()), ("id", self.id.as_str())]
    }

    fn query_params(&self) -> QueryParams {
        QueryParams::new().opt("mode", self.mode.query_value())
    }

    fn validate(&self) -> Result<(), CodecError> {
        SecretType::parse_field("secret_type", &self.secret_type)?;
        lock_body(&self.locks).validate()
    }

    fn body(&self) -> Result<Option<Value>, CodecError> {
        Ok(Some(serde_json::to_value(lock_body(&self.locks))?))
    }

    fn headers(&self) -> &HeaderBag {
        &self.headers
    }

    fn parse(&self, body: &[u8]) -> Result<Self::Output, CodecError> {
        decode_json(body)
    }
}

/// Options for `unlock_secret`.
#[derive(Debug, Clone, Default)]
pub struct UnlockSecretOptions {
    /// Secret type.
    pub secret_type: String,
    /// Secret identifier.
    pub id: String,
    /// Lock names to release.
    pub locks: Vec<String>,
    /// Per-call headers.
    pub headers: HeaderBag,
}

impl UnlockSecretOptions {
    /// Options releasing `locks` from secret `id`.
    #[must_use]
    pub fn new(secret_type: impl Into<String>, id: impl Into<String>, locks: Vec<String>) -> Self {
        Self {
            secret_type: secret_type.into(),
            id: id.into(),
            locks,
            headers: HeaderBag::new(),
        }
    }
}

impl Operation for UnlockSecretOptions {
    type Output = Envelope<SecretLockSummary>;

    const DESCRIPTOR: OperationDescriptor = OperationDescriptor {
        id: "unlock_secret",
        name: "UnlockSecret",
        method: HttpMethod::Post,
        path: "/api/v1/locks/{secret_type}/{id}/unlock",
    };

    fn path_params(&self) -> Vec<(&'static str, &str)> {
        vec![("secret_type", self.secret_type.as_str()), ("id", self.id.as_str())]
    }

    fn validate(&self) -> Result<(), CodecError> {
        SecretType::parse_field("secret_type", &self.secret_type)?;
        unlock_body(&self.locks).validate()
    }

    fn body(&self) -> Result<Option<Value>, CodecError> {
        Ok(Some(serde_json::to_value(unlock_body(&self.locks))?))
    }

    fn headers(&self) -> &HeaderBag {
        &self.headers
    }

    fn parse(&self, body: &[u8]) -> Result<Self::Output, CodecError> {
        decode_json(body)
    }
}

// ============================================================================
// SECTION: Version Locks
// ============================================================================

/// Options for `get_secret_version_locks`.
#[derive(Debug, Clone, Default)]
pub struct GetSecretVersionLocksOptions {
    /// Secret type.
    pub secret_type: String,
    /// Secret identifier.
    pub id: String,
    /// Version identifier.
    pub version_id: String,
    /// Page size.
    pub limit: Option<i64>,
    /// Page offset.
    pub offset: Option<i64>,
    /// Lock name filter.
    pub search: Option<String>,
    /// Per-call headers.
    pub headers: HeaderBag,
}

impl GetSecretVersionLocksOptions {
    /// Options listing the locks of version `version_id`.
    #[must_use]
    pub fn new(secret_type: impl Into<String>, id: impl Into<String>, version_id: impl Into<String>) -> Self {
        Self {
            secret_type: secret_type.into(),
            id: id.into(),
            version_id: version_id.into(),
            ..Self::default()
        }
    }

    /// Sets the page size.
    #[must_use]
    pub const fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the page offset.
    #[must_use]
    pub const fn with_offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Sets the lock name filter.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
}

impl Operation for GetSecretVersionLocksOptions {
    type Output = Envelope<LockData>;

    const DESCRIPTOR: OperationDescriptor = OperationDescriptor {
        id: "get_secret_version_locks",
        name: "GetSecretVersionLocks",
        method: HttpMethod::Get,
        path: "/api/v1/locks/{secret_type}/{id}/versions/{version_id}",
    };

    fn path_params(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("secret_type", self.secret_type.as_str()),
            ("id", self.id.as_str()),
            ("version_id", self.version_id.as_str()),
        ]
    }

    fn query_params(&self) -> QueryParams {
        QueryParams::new()
            .opt("limit", self.limit)
            .opt("offset", self.offset)
            .opt("search", self.search.as_deref())
    }

    fn validate(&self) -> Result<(), CodecError> {
        SecretType::parse_field("secret_type", &self.secret_type)?;
        check_paging(self.limit, self.offset)
    }

    fn headers(&self) -> &HeaderBag {
        &self.headers
    }

    fn parse(&self, body: &[u8]) -> Result<Self::Output, CodecError> {
        decode_json(body)
    }
}

/// Options for `lock_secret_version`.
#[derive(Debug, Clone, Default)]
pub struct LockSecretVersionOptions {
    /// Secret type.
    pub secret_type: String,
    /// Secret identifier.
    pub id: String,
    /// Version identifier.
    pub version_id: String,
    /// Locks to acquire.
    pub locks: Vec<LockSecretBodyLocksItem>,
    /// Lock mode.
    pub mode: LockMode,
    /// Per-call headers.
    pub headers: HeaderBag,
}

impl LockSecretVersionOptions {
    /// Options acquiring `locks` on version `version_id`.
    #[must_use]
    pub fn new(
        secret_type: impl Into<String>,
        id: impl Into<String>,
        version_id: impl Into<String>,
        locks: Vec<LockSecretBodyLocksItem>,
    ) -> Self {
        Self {
            secret_type: secret_type.into(),
            id: id.into(),
            version_id: version_id.into(),
            locks,
            ..Self::default()
        }
    }

    /// Sets the lock mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: LockMode) -> Self {
        self.mode = mode;
        self
    }
}

impl Operation for LockSecretVersionOptions {
    type Output = Envelope<SecretLockSummary>;

    const DESCRIPTOR: OperationDescriptor = OperationDescriptor {
        id: "lock_secret_version",
        name: "LockSecretVersion",
        method: HttpMethod::Post,
        path: "/api/v1/locks/{secret_type}/{id}/versions/{version_id}/lock",
    };

    fn path_params(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("secret_type", self.secret_type.as_str()),
            ("id", self.id.as_str()),
            ("version_id", self.version_id.as_str()),
        ]
    }

    fn query_params(&self) -> QueryParams {
        QueryParams::new().opt("mode", self.mode.query_value())
    }

    fn validate(&self) -> Result<(), CodecError> {
        SecretType::parse_field("secret_type", &self.secret_type)?;
        lock_body(&self.locks).validate()
    }

    fn body(&self) -> Result<Option<Value>, CodecError> {
        Ok(Some(serde_json::to_value(lock_body(&self.locks))?))
    }

    fn headers(&self) -> &HeaderBag {
        &self.headers
    }

    fn parse(&self, body: &[u8]) -> Result<Self::Output, CodecError> {
        decode_json(body)
    }
}

/// Options for `unlock_secret_version`.
#[derive(Debug, Clone, Default)]
pub struct UnlockSecretVersionOptions {
    /// Secret type.
    pub secret_type: String,
    /// Secret identifier.
    pub id: String,
    /// Version identifier.
    pub version_id: String,
    /// Lock names to release.
    pub locks: Vec<String>,
    /// Per-call headers.
    pub headers: HeaderBag,
}

impl UnlockSecretVersionOptions {
    /// Options releasing `locks` from version `version_id`.
    #[must_use]
    pub fn new(
        secret_type: impl Into<String>,
        id: impl Into<String>,
        version_id: impl Into<String>,
        locks: Vec<String>,
    ) -> Self {
        Self {
            secret_type: secret_type.into(),
            id: id.into(),
            version_id: version_id.into(),
            locks,
            headers: HeaderBag::new(),
        }
    }
}

impl Operation for UnlockSecretVersionOptions {
    type Output = Envelope<SecretLockSummary>;

    const DESCRIPTOR: OperationDescriptor = OperationDescriptor {
        id: "unlock_secret_version",
        name: "UnlockSecretVersion",
        method: HttpMethod::Post,
        path: "/api/v1/locks/{secret_type}/{id}/versions/{version_id}/unlock",
    };

    fn path_params(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("secret_type", self.secret_type.as_str()),
            ("id", self.id.as_str()),
            ("version_id", self.version_id.as_str()),
        ]
    }

    fn validate(&self) -> Result<(), CodecError> {
        SecretType::parse_field("secret_type", &self.secret_type)?;
        unlock_body(&self.locks).validate()
    }

    fn body(&self) -> Result<Option<Value>, CodecError> {
        Ok(Some(serde_json::to_value(unlock_body(&self.locks))?))
    }

    fn headers(&self) -> &HeaderBag {
        &self.headers
    }

    fn parse(&self, body: &[u8]) -> Result<Self::Output, CodecError> {
        decode_json(body)
    }
}

// ============================================================================
// SECTION: Instance Locks
// ============================================================================

/// Options for `list_instance_secrets_locks`.
#[derive(Debug, Clone, Default)]
pub struct ListInstanceSecretsLocksOptions {
    /// Page size.
    pub limit: Option<i64>,
    /// Page offset.
    pub offset: Option<i64>,
    /// Lock name filter.
    pub search: Option<String>,
    /// Secret group identifiers to include.
    pub groups: Vec<String>,
    /// Per-call headers.
    pub headers: HeaderBag,
}

impl ListInstanceSecretsLocksOptions {
    /// Options listing every lock in the instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size.
    #[must_use]
    pub const fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the page offset.
    #[must_use]
    pub const fn with_offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Sets the lock name filter.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Restricts the listing to `groups`.
    #[must_use]
    pub fn with_groups(mut self, groups: Vec<String>) -> Self {
        self.groups = groups;
        self
    }
}

impl Operation for ListInstanceSecretsLocksOptions {
    type Output = Envelope<InstanceSecretLocks>;

    const DESCRIPTOR: OperationDescriptor = OperationDescriptor {
        id: "list_instance_secrets_locks",
        name: "ListInstanceSecretsLocks",
        method: HttpMethod::Get,
        path: "/api/v1/locks",
    };

    fn path_params(&self) -> Vec<(&'static str, &str)> {
        Vec::new()
    }

    fn query_params(&self) -> QueryParams {
        QueryParams::new()
            .opt("limit", self.limit)
            .opt("offset", self.offset)
            .opt("search", self.search.as_deref())
            .repeated("groups", &self.groups)
    }

    fn validate(&self) -> Result<(), CodecError> {
        check_paging(self.limit, self.offset)
    }

    fn headers(&self) -> &HeaderBag {
        &self.headers
    }

    fn parse(&self, body: &[u8]) -> Result<Self::Output, CodecError> {
        decode_json(body)
    }
}

// ============================================================================
// SECTION: Bodies
// ============================================================================

/// Builds a lock request body.
fn lock_body(locks: &[LockSecretBodyLocksItem]) -> LockSecretBody {
    LockSecretBody {
        locks: locks.to_vec(),
    }
}

/// Builds an unlock request body.
fn unlock_body(locks: &[String]) -> UnlockSecretBody {
    UnlockSecretBody {
        locks: locks.to_vec(),
    }
}

header_setter!(
    GetLocksOptions,
    LockSecretOptions,
    UnlockSecretOptions,
    GetSecretVersionLocksOptions,
    LockSecretVersionOptions,
    UnlockSecretVersionOptions,
    ListInstanceSecretsLocksOptions,
);
