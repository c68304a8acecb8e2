// crates/secrets-manager/src/options/versions.rs
// ============================================================================
// Module: Secret Version Options
// Description: Options for the secret version operations.
// Purpose: List, read, revoke, and annotate secret versions.
// Dependencies: secrets-manager-core, serde_json
// ============================================================================

//! ## Overview
//! Version payloads carry no discriminator of their own; the variant always
//! follows from the `secret_type` URL segment.

use std::str::FromStr;

use secrets_manager_core::CodecError;
use secrets_manager_core::CollectionMetadata;
use secrets_manager_core::ContextHint;
use secrets_manager_core::Envelope;
use secrets_manager_core::HeaderBag;
use secrets_manager_core::HttpMethod;
use secrets_manager_core::Operation;
use secrets_manager_core::OperationDescriptor;
use secrets_manager_core::QueryParams;
use secrets_manager_core::codec;
use secrets_manager_core::response::decode_family_envelope;
use serde_json::Value;

use crate::models::SecretType;
use crate::models::SecretVersion;
use crate::models::SecretVersionActionName;
use crate::models::SecretVersionMetadata;
use crate::models::versions::UpdateSecretVersionMetadata;
use crate::options::envelope_body;
use crate::options::header_setter;

/// Options for `list_secret_versions`.
#[derive(Debug, Clone, Default)]
pub struct ListSecretVersionsOptions {
    /// Secret type.
    pub secret_type: String,
    /// Secret identifier.
    pub id: String,
    /// Per-call headers.
    pub headers: HeaderBag,
}

impl ListSecretVersionsOptions {
    /// Options listing the versions of secret `id`.
    #[must_use]
    pub fn new(secret_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            secret_type: secret_type.into(),
            id: id.into(),
            headers: HeaderBag::new(),
        }
    }
}

impl Operation for ListSecretVersionsOptions {
    type Output = Envelope<SecretVersionMetadata>;

    const DESCRIPTOR: OperationDescriptor = OperationDescriptor {
        id: "list_secret_versions",
        name: "ListSecretVersions",
        method: HttpMethod::Get,
        path: "/api/v1/secrets/{secret_type}/{id}/versions",
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

/// Options for `get_secret_version`.
#[derive(Debug, Clone, Default)]
pub struct GetSecretVersionOptions {
    /// Secret type.
    pub secret_type: String,
    /// Secret identifier.
    pub id: String,
    /// Version identifier or `previous`.
    pub version_id: String,
    /// Per-call headers.
    pub headers: HeaderBag,
}

impl GetSecretVersionOptions {
    /// Options reading version `version_id` of secret `id`.
    #[must_use]
    pub fn new(secret_type: impl Into<String>, id: impl Into<String>, version_id: impl Into<String>) -> Self {
        Self {
            secret_type: secret_type.into(),
            id: id.into(),
            version_id: version_id.into(),
            headers: HeaderBag::new(),
        }
    }
}

impl Operation for GetSecretVersionOptions {
    type Output = Envelope<SecretVersion>;

    const DESCRIPTOR: OperationDescriptor = OperationDescriptor {
        id: "get_secret_version",
        name: "GetSecretVersion",
        method: HttpMethod::Get,
        path: "/api/v1/secrets/{secret_type}/{id}/versions/{version_id}",
    };

    fn path_params(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("secret_type", self.secret_type.as_str()),
            ("id", self.id.as_str()),
            ("version_id", self.version_id.as_str()),
        ]
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

/// Options for `update_secret_version`.
#[derive(Debug, Clone, Default)]
pub struct UpdateSecretVersionOptions {
    /// Secret type.
    pub secret_type: String,
    /// Secret identifier.
    pub id: String,
    /// Version identifier.
    pub version_id: String,
    /// Action name.
    pub action: String,
    /// Per-call headers.
    pub headers: HeaderBag,
}

impl UpdateSecretVersionOptions {
    /// Options running `action` on version `version_id`.
    #[must_use]
    pub fn new(
        secret_type: impl Into<String>,
        id: impl Into<String>,
        version_id: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            secret_type: secret_type.into(),
            id: id.into(),
            version_id: version_id.into(),
            action: action.into(),
            headers: HeaderBag::new(),
        }
    }
}

impl Operation for UpdateSecretVersionOptions {
    type Output = Envelope<SecretVersion>;

    const DESCRIPTOR: OperationDescriptor = OperationDescriptor {
        id: "update_secret_version",
        name: "UpdateSecretVersion",
        method: HttpMethod::Post,
        path: "/api/v1/secrets/{secret_type}/{id}/versions/{version_id}",
    };

    fn path_params(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("secret_type", self.secret_type.as_str()),
            ("id", self.id.as_str()),
            ("version_id", self.version_id.as_str()),
        ]
    }

    fn query_params(&self) -> QueryParams {
        QueryParams::new().push("action", &self.action)
    }

    fn validate(&self) -> Result<(), CodecError> {
        let secret_type = SecretType::parse_field("secret_type", &self.secret_type)?;
        codec::require_str("action", &self.action)?;
        match SecretVersionActionName::from_str(&self.action)? {
            SecretVersionActionName::Revoke if !secret_type.is_certificate() => Err(CodecError::invalid(
                "action",
                format!("revoke is not supported for {secret_type} secrets"),
            )),
            SecretVersionActionName::Revoke => Ok(()),
        }
    }

    fn headers(&self) -> &HeaderBag {
        &self.headers
    }

    fn parse(&self, body: &[u8]) -> Result<Self::Output, CodecError> {
        decode_family_envelope(body, &ContextHint::tag(self.secret_type.as_str()))
    }
}

/// Options for `get_secret_version_metadata`.
#[derive(Debug, Clone, Default)]
pub struct GetSecretVersionMetadataOptions {
    /// Secret type.
    pub secret_type: String,
    /// Secret identifier.
    pub id: String,
    /// Version identifier.
    pub version_id: String,
    /// Per-call headers.
    pub headers: HeaderBag,
}

impl GetSecretVersionMetadataOptions {
    /// Options reading the metadata of version `version_id`.
    #[must_use]
    pub fn new(secret_type: impl Into<String>, id: impl Into<String>, version_id: impl Into<String>) -> Self {
        Self {
            secret_type: secret_type.into(),
            id: id.into(),
            version_id: version_id.into(),
            headers: HeaderBag::new(),
        }
    }
}

impl Operation for GetSecretVersionMetadataOptions {
    type Output = Envelope<SecretVersionMetadata>;

    const DESCRIPTOR: OperationDescriptor = OperationDescriptor {
        id: "get_secret_version_metadata",
        name: "GetSecretVersionMetadata",
        method: HttpMethod::Get,
        path: "/api/v1/secrets/{secret_type}/{id}/versions/{version_id}/metadata",
    };

    fn path_params(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("secret_type", self.secret_type.as_str()),
            ("id", self.id.as_str()),
            ("version_id", self.version_id.as_str()),
        ]
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

/// Options for `update_secret_version_metadata`.
#[derive(Debug, Clone, Default)]
pub struct UpdateSecretVersionMetadataOptions {
    /// Secret type.
    pub secret_type: String,
    /// Secret identifier.
    pub id: String,
    /// Version identifier.
    pub version_id: String,
    /// Envelope metadata.
    pub metadata: CollectionMetadata,
    /// Metadata updates.
    pub resources: Vec<UpdateSecretVersionMetadata>,
    /// Per-call headers.
    pub headers: HeaderBag,
}

impl UpdateSecretVersionMetadataOptions {
    /// Options updating the metadata of version `version_id`.
    #[must_use]
    pub fn new(
        secret_type: impl Into<String>,
        id: impl Into<String>,
        version_id: impl Into<String>,
        metadata: CollectionMetadata,
        resources: Vec<UpdateSecretVersionMetadata>,
    ) -> Self {
        Self {
            secret_type: secret_type.into(),
            id: id.into(),
            version_id: version_id.into(),
            metadata,
            resources,
            headers: HeaderBag::new(),
        }
    }
}

impl Operation for UpdateSecretVersionMetadataOptions {
    type Output = Envelope<SecretVersionMetadata>;

    const DESCRIPTOR: OperationDescriptor = OperationDescriptor {
        id: "update_secret_version_metadata",
        name: "UpdateSecretVersionMetadata",
        method: HttpMethod::Put,
        path: "/api/v1/secrets/{secret_type}/{id}/versions/{version_id}/metadata",
    };

    fn path_params(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("secret_type", self.secret_type.as_str()),
            ("id", self.id.as_str()),
            ("version_id", self.version_id.as_str()),
        ]
    }

    fn validate(&self) -> Result<(), CodecError> {
        SecretType::parse_field("secret_type", &self.secret_type).map(|_| ())
    }

    fn body(&self) -> Result<Option<Value>, CodecError> {
        let resources = self.resources.iter().map(serde_json::to_value).collect::<Result<Vec<_>, _>>()?;
        envelope_body(&self.metadata, resources)
    }

    fn headers(&self) -> &HeaderBag {
        &self.headers
    }

    fn parse(&self, body: &[u8]) -> Result<Self::Output, CodecError> {
        decode_family_envelope(body, &ContextHint::tag(self.secret_type.as_str()))
    }
}

header_setter!(
    ListSecretVersionsOptions,
    GetSecretVersionOptions,
    UpdateSecretVersionOptions,
    GetSecretVersionMetadataOptions,
    UpdateSecretVersionMetadataOptions,
);
