// crates/secrets-manager/src/options/groups.rs
// ============================================================================
// Module: Secret Group Options
// Description: Options for the secret group operations.
// Purpose: Create, list, read, update, and delete secret groups.
// Dependencies: secrets-manager-core, serde_json
// ============================================================================

//! ## Overview
//! Group operations other than delete answer with a secret group envelope.
//! Delete answers with no body.

use secrets_manager_core::CodecError;
use secrets_manager_core::CollectionMetadata;
use secrets_manager_core::Envelope;
use secrets_manager_core::HeaderBag;
use secrets_manager_core::HttpMethod;
use secrets_manager_core::Operation;
use secrets_manager_core::OperationDescriptor;
use secrets_manager_core::response::decode_json;
use serde_json::Value;

use crate::models::SecretGroupMetadataUpdatable;
use crate::models::SecretGroupResource;
use crate::options::envelope_body;
use crate::options::header_setter;

/// Result of every group operation.
pub type SecretGroupEnvelope = Envelope<SecretGroupResource>;

/// Options for `create_secret_group`.
#[derive(Debug, Clone, Default)]
pub struct CreateSecretGroupOptions {
    /// Envelope metadata.
    pub metadata: CollectionMetadata,
    /// Groups to create.
    pub resources: Vec<SecretGroupResource>,
    /// Per-call headers.
    pub headers: HeaderBag,
}

impl CreateSecretGroupOptions {
    /// Options creating `resources`.
    #[must_use]
    pub fn new(metadata: CollectionMetadata, resources: Vec<SecretGroupResource>) -> Self {
        Self {
            metadata,
            resources,
            headers: HeaderBag::new(),
        }
    }
}

impl Operation for CreateSecretGroupOptions {
    type Output = SecretGroupEnvelope;

    const DESCRIPTOR: OperationDescriptor = OperationDescriptor {
        id: "create_secret_group",
        name: "CreateSecretGroup",
        method: HttpMethod::Post,
        path: "/api/v1/secret_groups",
    };

    fn path_params(&self) -> Vec<(&'static str, &str)> {
        Vec::new()
    }

    fn validate(&self) -> Result<(), CodecError> {
        self.resources.iter().try_for_each(SecretGroupResource::validate)
    }

    fn body(&self) -> Result<Option<Value>, CodecError> {
        let resources = self.resources.iter().map(serde_json::to_value).collect::<Result<Vec<_>, _>>()?;
        envelope_body(&self.metadata, resources)
    }

    fn headers(&self) -> &HeaderBag {
        &self.headers
    }

    fn parse(&self, body: &[u8]) -> Result<Self::Output, CodecError> {
        decode_json(body)
    }
}

/// Options for `list_secret_groups`.
#[derive(Debug, Clone, Default)]
pub struct ListSecretGroupsOptions {
    /// Per-call headers.
    pub headers: HeaderBag,
}

impl ListSecretGroupsOptions {
    /// Options listing every group.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Operation for ListSecretGroupsOptions {
    type Output = SecretGroupEnvelope;

    const DESCRIPTOR: OperationDescriptor = OperationDescriptor {
        id: "list_secret_groups",
        name: "ListSecretGroups",
        method: HttpMethod::Get,
        path: "/api/v1/secret_groups",
    };

    fn path_params(&self) -> Vec<(&'static str, &str)> {
        Vec::new()
    }

    fn headers(&self) -> &HeaderBag {
        &self.headers
    }

    fn parse(&self, body: &[u8]) -> Result<Self::Output, CodecError> {
        decode_json(body)
    }
}

/// Options for `get_secret_group`.
#[derive(Debug, Clone, Default)]
pub struct GetSecretGroupOptions {
    /// Group identifier.
    pub id: String,
    /// Per-call headers.
    pub headers: HeaderBag,
}

impl GetSecretGroupOptions {
    /// Options reading group `id`.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            headers: HeaderBag::new(),
        }
    }
}

impl Operation for GetSecretGroupOptions {
    type Output = SecretGroupEnvelope;

    const DESCRIPTOR: OperationDescriptor = OperationDescriptor {
        id: "get_secret_group",
        name: "GetSecretGroup",
        method: HttpMethod::Get,
        path: "/api/v1/secret_groups/{id}",
    };

    fn path_params(&self) -> Vec<(&'static str, &str)> {
        vec![("id", self.id.as_str())]
    }

    fn headers(&self) -> &HeaderBag {
        &self.headers
    }

    fn parse(&self, body: &[u8]) -> Result<Self::Output, CodecError> {
        decode_json(body)
    }
}

/// Options for `update_secret_group_metadata`.
#[derive(Debug, Clone, Default)]
pub struct UpdateSecretGroupMetadataOptions {
    /// Group identifier.
    pub id: String,
    /// Envelope metadata.
    pub metadata: CollectionMetadata,
    /// Updated fields.
    pub resources: Vec<SecretGroupMetadataUpdatable>,
    /// Per-call headers.
    pub headers: HeaderBag,
}

impl UpdateSecretGroupMetadataOptions {
    /// Options updating group `id`.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        metadata: CollectionMetadata,
        resources: Vec<SecretGroupMetadataUpdatable>,
    ) -> Self {
        Self {
            id: id.into(),
            metadata,
            resources,
            headers: HeaderBag::new(),
        }
    }
}

impl Operation for UpdateSecretGroupMetadataOptions {
    type Output = SecretGroupEnvelope;

    const DESCRIPTOR: OperationDescriptor = OperationDescriptor {
        id: "update_secret_group_metadata",
        name: "UpdateSecretGroupMetadata",
        method: HttpMethod::Put,
        path: "/api/v1/secret_groups/{id}",
    };

    fn path_params(&self) -> Vec<(&'static str, &str)> {
        vec![("id", self.id.as_str())]
    }

    fn body(&self) -> Result<Option<Value>, CodecError> {
        let resources = self.resources.iter().map(serde_json::to_value).collect::<Result<Vec<_>, _>>()?;
        envelope_body(&self.metadata, resources)
    }

    fn headers(&self) -> &HeaderBag {
        &self.headers
    }

    fn parse(&self, body: &[u8]) -> Result<Self::Output, CodecError> {
        decode_json(body)
    }
}

/// Options for `delete_secret_group`.
#[derive(Debug, Clone, Default)]
pub struct DeleteSecretGroupOptions {
    /// Group identifier.
    pub id: String,
    /// Per-call headers.
    pub headers: HeaderBag,
}

impl DeleteSecretGroupOptions {
    /// Options deleting group `id`.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            headers: HeaderBag::new(),
        }
    }
}

impl Operation for DeleteSecretGroupOptions {
    type Output = ();

    const DESCRIPTOR: OperationDescriptor = OperationDescriptor {
        id: "delete_secret_group",
        name: "DeleteSecretGroup",
        method: HttpMethod::Delete,
        path: "/api/v1/secret_groups/{id}",
    };

    fn path_params(&self) -> Vec<(&'static str, &str)> {
        vec![("id", self.id.as_str())]
    }

    fn headers(&self) -> &HeaderBag {
        &self.headers
    }

    fn parse(&self, _body: &[u8]) -> Result<Self::Output, CodecError> {
        Ok(())
    }
}

header_setter!(
    CreateSecretGroupOptions,
    ListSecretGroupsOptions,
    GetSecretGroupOptions,
    UpdateSecretGroupMetadataOptions,
    DeleteSecretGroupOptions,
);
