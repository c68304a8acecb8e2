// crates/secrets-manager/src/options/metadata.rs
// ============================================================================
// Module: Secret Metadata Options
// Description: Options for reading and updating secret metadata.
// Purpose: Expose secret metadata without payloads.
// Dependencies: secrets-manager-core, serde_json
// ============================================================================

//! ## Overview
//! Metadata reads resolve the variant from the `secret_type` path segment.
//! Updates carry a single-resource envelope whose resource must match that
//! segment.

use secrets_manager_core::CodecError;
use secrets_manager_core::CollectionMetadata;
use secrets_manager_core::ContextHint;
use secrets_manager_core::Envelope;
use secrets_manager_core::Family;
use secrets_manager_core::HeaderBag;
use secrets_manager_core::HttpMethod;
use secrets_manager_core::Operation;
use secrets_manager_core::OperationDescriptor;
use secrets_manager_core::codec;
use secrets_manager_core::response::decode_family_envelope;
use serde_json::Value;

use crate::models::SecretMetadata;
use crate::models::SecretType;
use crate::options::check_resource_tag;
use crate::options::envelope_body;
use crate::options::header_setter;

/// Options for `get_secret_metadata`.
#[derive(Debug, Clone, Default)]
pub struct GetSecretMetadataOptions {
    /// Secret type.
    pub secret_type: String,
    /// Secret identifier.
    pub id: String,
    /// Per-call headers.
    pub headers: HeaderBag,
}

impl GetSecretMetadataOptions {
    /// Options reading the metadata of secret `id`.
    #[must_use]
    pub fn new(secret_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            secret_type: secret_type.into(),
            id: id.into(),
            headers: HeaderBag::new(),
        }
    }
}

impl Operation for GetSecretMetadataOptions {
    type Output = Envelope<SecretMetadata>;

    const DESCRIPTOR: OperationDescriptor = OperationDescriptor {
        id: "get_secret_metadata",
        name: "GetSecretMetadata",
        method: HttpMethod::Get,
        path: "/api/v1/secrets/{secret_type}/{id}/metadata",
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
        decode_family_envelope(body, &ContextHint::tag(self.secret_type.as_str()))
    }
}

/// Options for `update_secret_metadata`.
#[derive(Debug, Clone, Default)]
pub struct UpdateSecretMetadataOptions {
    /// Secret type.
    pub secret_type: String,
    /// Secret identifier.
    pub id: String,
    /// Envelope metadata.
    pub metadata: CollectionMetadata,
    /// Updated metadata.
    pub resources: Vec<SecretMetadata>,
    /// Per-call headers.
    pub headers: HeaderBag,
}

impl UpdateSecretMetadataOptions {
    /// Options replacing the metadata of secret `id`.
    #[must_use]
    pub fn new(
        secret_type: impl Into<String>,
        id: impl Into<String>,
        metadata: CollectionMetadata,
        resources: Vec<SecretMetadata>,
    ) -> Self {
        Self {
            secret_type: secret_type.into(),
            id: id.into(),
            metadata,
            resources,
            headers: HeaderBag::new(),
        }
    }
}

impl Operation for UpdateSecretMetadataOptions {
    type Output = Envelope<SecretMetadata>;

    const DESCRIPTOR: OperationDescriptor = OperationDescriptor {
        id: "update_secret_metadata",
        name: "UpdateSecretMetadata",
        method: HttpMethod::Put,
        path: "/api/v1/secrets/{secret_type}/{id}/metadata",
    };

    fn path_params(&self) -> Vec<(&'static str, &str)> {
        vec![("secret_type", self.secret_type.as_str()), ("id", self.id.as_str())]
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
        decode_family_envelope(body, &ContextHint::tag(self.secret_type.as_str()))
    }
}

header_setter!(GetSecretMetadataOptions, UpdateSecretMetadataOptions);
