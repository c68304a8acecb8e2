// crates/secrets-manager/src/options/secrets.rs
// ============================================================================
// Module: Secret Options
// Description: Options for the secret operations.
// Purpose: Create, list, read, act on, and delete secrets.
// Dependencies: secrets-manager-core, serde_json
// ============================================================================

//! ## Overview
//! Secret payloads are polymorphic; responses are resolved by their
//! `secret_type` field, falling back to the type named in the URL.
//! Invariants:
//! - Created resources carry the same type as the URL.
//! - `update_secret` only sends actions supported by the URL type.

use std::str::FromStr;

use secrets_manager_core::CodecError;
use secrets_manager_core::CollectionMetadata;
use secrets_manager_core::ContextHint;
use secrets_manager_core::Envelope;
use secrets_manager_core::Family;
use secrets_manager_core::HeaderBag;
use secrets_manager_core::HttpMethod;
use secrets_manager_core::Operation;
use secrets_manager_core::OperationDescriptor;
use secrets_manager_core::QueryParams;
use secrets_manager_core::codec;
use secrets_manager_core::response::decode_family_envelope;
use serde_json::Value;

use crate::models::SecretAction;
use crate::models::SecretActionName;
use crate::models::SecretResource;
use crate::models::SecretType;
use crate::options::check_paging;
use crate::options::check_resource_tag;
use crate::options::envelope_body;
use crate::options::header_setter;

/// Result of the secret operations.
pub type SecretEnvelope = Envelope<SecretResource>;

/// Accepted `sort_by` values of `list_all_secrets`.
pub const SORT_FIELDS: &[&str] = &["id", "creation_date", "expiration_date", "secret_type", "name"];

/// Decodes a secret envelope using `secret_type` as fallback tag.
fn parse_secrets(body: &[u8], secret_type: &str) -> Result<SecretEnvelope, CodecError> {
    decode_family_envelope(body, &ContextHint::tag(secret_type))
}

// ============================================================================
// SECTION: Create
// ============================================================================

/// Options for `create_secret`.
#[derive(Debug, Clone, Default)]
pub struct CreateSecretOptions {
    /// Secret type.
    pub secret_type: String,
    /// Envelope metadata.
    pub metadata: CollectionMetadata,
    /// Secrets to create.
    pub resources: Vec<SecretResource>,
    /// Per-call headers.
    pub headers: HeaderBag,
}

impl CreateSecretOptions {
    /// Options creating `resources` of `secret_type`.
    #[must_use]
    pub fn new(
        secret_type: impl Into<String>,
        metadata: CollectionMetadata,
        resources: Vec<SecretResource>,
    ) -> Self {
        Self {
            secret_type: secret_type.into(),
            metadata,
            resources,
            headers: HeaderBag::new(),
        }
    }
}

impl Operation for CreateSecretOptions {
    type Output = SecretEnvelope;

    const DESCRIPTOR: OperationDescriptor = OperationDescriptor {
        id: "create_secret",
        name: "CreateSecret",
        method: HttpMethod::Post,
        path: "/api/v1/secrets/{secret_type}",
    };

    fn path_params(&self) -> Vec<(&'static str, &str)> {
        vec![("secret_type", self.secret_type.as_str())]
    }

    fn validate(&self) -> Result<(), CodecError> {
        SecretType::parse_field("secret_type", &self.secret_type)?;
        self.resources.iter().try_for_each(|resource| check_resource_tag(&self.secret_type, resource.tag()))
    }

    fn body(&self) -> Result<Option<Value>, CodecError> {
        let resources = self.resources.iter().map(codec::encode).collect::<Result<Vec<_>, _>>()?;
        envelope_body(&self.metadata, resources)
    }

    fn headers(&self) -> &HeaderBag {
        &self.headers
    }

    fn parse(&self, body: &[u8]) -> Result<Self::Output, CodecError> {
        parse_secrets(body, &self.secret_type)
    }
}

// ============================================================================
// SECTION: List
// ============================================================================

/// Options for `list_secrets`.
#[derive(Debug, Clone, Default)]
pub struct ListSecretsOptions {
    /// Secret type.
    pub secret_type: String,
    /// Page size.
    pub limit: Option<i64>,
    /// Page offset.
    pub offset: Option<i64>,
    /// Per-call headers.
    pub headers: HeaderBag,
}

impl ListSecretsOptions {
    /// Options listing secrets of `secret_type`.
    #[must_use]
    pub fn new(secret_type: impl Into<String>) -> Self {
        Self {
            secret_type: secret_type.into(),
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
}

impl Operation for ListSecretsOptions {
    type Output = SecretEnvelope;

    const DESCRIPTOR: OperationDescriptor = OperationDescriptor {
        id: "list_secrets",
        name: "ListSecrets",
        method: HttpMethod::Get,
        path: "/api/v1/secrets/{secret_type}",
    };

    fn path_params(&self) -> Vec<(&'static str, &str)> {
        vec![("secret_type", self.secret_type.as_str())]
    }

    fn query_params(&self) -> QueryParams {
        QueryParams::new().opt("limit", self.limit).opt("offset", self.offset)
    }

    fn validate(&self) -> Result<(), CodecError> {
        SecretType::parse_field("secret_type", &self.secret_type)?;
        check_paging(self.limit, self.offset)
    }

    fn headers(&self) -> &HeaderBag {
        &self.headers
    }

    fn parse(&self, body: &[u8]) -> Result<Self::Output, CodecError> {
        parse_secrets(body, &self.secret_type)
    }
}

/// Options for `list_all_secrets`.
#[derive(Debug, Clone, Default)]
pub struct ListAllSecretsOptions {
    /// Page size.
    pub limit: Option<i64>,
    /// Page offset.
    pub offset: Option<i64>,
    /// Text filter.
    pub search: Option<String>,
    /// Sort field.
    pub sort_by: Option<String>,
    /// Secret group identifiers to include.
    pub groups: Vec<String>,
    /// Per-call headers.
    pub headers: HeaderBag,
}

impl ListAllSecretsOptions {
    /// Options listing every secret.
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

    /// Sets the text filter.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Sets the sort field.
    #[must_use]
    pub fn with_sort_by(mut self, sort_by: impl Into<String>) -> Self {
        self.sort_by = Some(sort_by.into());
        self
    }

    /// Restricts the listing to `groups`.
    #[must_use]
    pub fn with_groups(mut self, groups: Vec<String>) -> Self {
        self.groups = groups;
        self
    }
}

impl Operation for ListAllSecretsOptions {
    type Output = SecretEnvelope;

    const DESCRIPTOR: OperationDescriptor = OperationDescriptor {
        id: "list_all_secrets",
        name: "ListAllSecrets",
        method: HttpMethod::Get,
        path: "/api/v1/secrets",
    };

    fn path_params(&self) -> Vec<(&'static str, &str)> {
        Vec::new()
    }

    fn query_params(&self) -> QueryParams {
        QueryParams::new()
            .opt("limit", self.limit)
            .opt("offset", self.offset)
            .opt("search", self.search.as_deref())
            .opt("sort_by", self.sort_by.as_deref())
            .repeated("groups", &self.groups)
    }

    fn validate(&self) -> Result<(), CodecError> {
        check_paging(self.limit, self.offset)?;
        match &self.sort_by {
            Some(sort_by) => codec::check_enum("sort_by", sort_by, SORT_FIELDS),
            None => Ok(()),
        }
    }

    fn headers(&self) -> &HeaderBag {
        &self.headers
    }

    fn parse(&self, body: &[u8]) -> Result<Self::Output, CodecError> {
        decode_family_envelope(body, &ContextHint::none())
    }
}

// ============================================================================
// SECTION: Single Secret
// ============================================================================

/// Options for `get_secret`.
#[derive(Debug, Clone, Default)]
pub struct GetSecretOptions {
    /// Secret type.
    pub secret_type: String,
    /// Secret identifier.
    pub id: String,
    /// Per-call headers.
    pub headers: HeaderBag,
}

impl GetSecretOptions {
    /// Options reading secret `id`.
    #[must_use]
    pub fn new(secret_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            secret_type: secret_type.into(),
            id: id.into(),
            headers: HeaderBag::new(),
        }
    }
}

impl Operation for GetSecretOptions {
    type Output = SecretEnvelope;

    const DESCRIPTOR: OperationDescriptor = OperationDescriptor {
        id: "get_secret",
        name: "GetSecret",
        method: HttpMethod::Get,
        path: "/api/v1/secrets/{secret_type}/{id}",
    };

    fn path_params(&self) -> Vec<(&'static str, &str)> {
        vec![("secret_type", self.secret_type.as_str()), ("id", self.id.as_str())]
    }

    fn validate(&self) -> Result<(), CodecError> {
        SecretType::parse_field("secret_type", &self.secret_type).map(|_| ())
    }

    fn headers(&self) -> &HeaderBag {
        &self.headers
    }

    fn parse(&self, body: &[u8]) -> Result<Self::Output, CodecError> {
        parse_secrets(body, &self.secret_type)
    }
}

/// Options for `update_secret`.
#[derive(Debug, Clone, Default)]
pub struct UpdateSecretOptions {
    /// Secret type.
    pub secret_type: String,
    /// Secret identifier.
    pub id: String,
    /// Action name.
    pub action: String,
    /// Action body, if the action takes one.
    pub body: Option<SecretAction>,
    /// Per-call headers.
    pub headers: HeaderBag,
}

impl UpdateSecretOptions {
    /// Options running `action` on secret `id`.
    #[must_use]
    pub fn new(secret_type: impl Into<String>, id: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            secret_type: secret_type.into(),
            id: id.into(),
            action: action.into(),
            ..Self::default()
        }
    }

    /// Sets the action body.
    #[must_use]
    pub fn with_body(mut self, body: SecretAction) -> Self {
        self.body = Some(body);
        self
    }
}

impl Operation for UpdateSecretOptions {
    type Output = SecretEnvelope;

    const DESCRIPTOR: OperationDescriptor = OperationDescriptor {
        id: "update_secret",
        name: "UpdateSecret",
        method: HttpMethod::Post,
        path: "/api/v1/secrets/{secret_type}/{id}",
    };

    fn path_params(&self) -> Vec<(&'static str, &str)> {
        vec![("secret_type", self.secret_type.as_str()), ("id", self.id.as_str())]
    }

    fn query_params(&self) -> QueryParams {
        QueryParams::new().push("action", &self.action)
    }

    fn validate(&self) -> Result<(), CodecError> {
        SecretType::parse_field("secret_type", &self.secret_type)?;
        codec::require_str("action", &self.action)?;
        SecretActionName::from_str(&self.action)?;
        if !SecretAction::supports(&self.secret_type, &self.action) {
            return Err(CodecError::invalid(
                "action",
                format!("{} is not supported for {} secrets", self.action, self.secret_type),
            ));
        }
        if let Some(body) = &self.body
            && !body.fits(&self.secret_type, &self.action)
        {
            return Err(CodecError::invalid(
                "body",
                format!(
                    "{} body does not belong to {} on {} secrets",
                    body.action(),
                    self.action,
                    self.secret_type
                ),
            ));
        }
        Ok(())
    }

    fn body(&self) -> Result<Option<Value>, CodecError> {
        self.body.as_ref().map(codec::encode).transpose()
    }

    fn headers(&self) -> &HeaderBag {
        &self.headers
    }

    fn parse(&self, body: &[u8]) -> Result<Self::Output, CodecError> {
        parse_secrets(body, &self.secret_type)
    }
}

/// Options for `delete_secret`.
#[derive(Debug, Clone, Default)]
pub struct DeleteSecretOptions {
    /// Secret type.
    pub secret_type: String,
    /// Secret identifier.
    pub id: String,
    /// Per-call headers.
    pub headers: HeaderBag,
}

impl DeleteSecretOptions {
    /// Options deleting secret `id`.
    #[must_use]
    pub fn new(secret_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            secret_type: secret_type.into(),
            id: id.into(),
            headers: HeaderBag::new(),
        }
    }
}

impl Operation for DeleteSecretOptions {
    type Output = ();

    const DESCRIPTOR: OperationDescriptor = OperationDescriptor {
        id: "delete_secret",
        name: "DeleteSecret",
        method: HttpMethod::Delete,
        path: "/api/v1/secrets/{secret_type}/{id}",
    };

    fn path_params(&self) -> Vec<(&'static str, &str)> {
        vec![("secret_type", self.secret_type.as_str()), ("id", self.id.as_str())]
    }

    fn validate(&self) -> Result<(), CodecError> {
        SecretType::parse_field("secret_type", &self.secret_type).map(|_| ())
    }

    fn headers(&self) -> &HeaderBag {
        &self.headers
    }

    fn parse(&self, _body: &[u8]) -> Result<Self::Output, CodecError> {
        Ok(())
    }
}

header_setter!(
    CreateSecretOptions,
    ListSecretsOptions,
    ListAllSecretsOptions,
    GetSecretOptions,
    UpdateSecretOptions,
    DeleteSecretOptions,
);
