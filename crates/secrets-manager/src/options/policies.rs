// crates/secrets-manager/src/options/policies.rs
// ============================================================================
// Module: Secret Policy Options
// Description: Options for reading and writing rotation policies.
// Purpose: Select the policy kind from the secret type in the URL.
// Dependencies: secrets-manager-core, serde_json
// ============================================================================

//! ## Overview
//! Only some secret types carry rotation policies, and each carries exactly
//! one kind. The kind follows from the URL `secret_type` and drives both
//! request validation and response decoding.

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
use secrets_manager_core::response::decode_envelope_with;
use serde_json::Value;

use crate::models::RotationPolicy;
use crate::models::SecretPolicyResource;
use crate::models::SecretType;
use crate::models::policies::PolicyType;
use crate::models::policies::policy_kind_for;
use crate::options::check_resource_tag;
use crate::options::envelope_body;
use crate::options::header_setter;

/// Resolves the policy kind for a URL secret type.
fn policy_kind(secret_type: &str) -> Result<&'static str, CodecError> {
    SecretType::parse_field("secret_type", secret_type)?;
    policy_kind_for(secret_type)
        .ok_or_else(|| CodecError::invalid("secret_type", format!("{secret_type} secrets have no rotation policy")))
}

/// Decodes a policy envelope of the kind implied by `secret_type`.
fn parse_policies(body: &[u8], secret_type: &str) -> Result<Envelope<SecretPolicyResource>, CodecError> {
    let hint = policy_kind_for(secret_type).map_or_else(ContextHint::none, ContextHint::tag);
    decode_envelope_with(body, |value| SecretPolicyResource::decode(value, &hint))
}

/// Options for `put_policy`.
#[derive(Debug, Clone, Default)]
pub struct PutPolicyOptions {
    /// Secret type.
    pub secret_type: String,
    /// Secret identifier.
    pub id: String,
    /// Envelope metadata.
    pub metadata: CollectionMetadata,
    /// Policies to store.
    pub resources: Vec<RotationPolicy>,
    /// Policy type query value.
    pub policy: PolicyType,
    /// Per-call headers.
    pub headers: HeaderBag,
}

impl PutPolicyOptions {
    /// Options storing `resources` as the policies of secret `id`.
    #[must_use]
    pub fn new(
        secret_type: impl Into<String>,
        id: impl Into<String>,
        metadata: CollectionMetadata,
        resources: Vec<RotationPolicy>,
    ) -> Self {
        Self {
            secret_type: secret_type.into(),
            id: id.into(),
            metadata,
            resources,
            policy: PolicyType::Rotation,
            headers: HeaderBag::new(),
        }
    }
}

impl Operation for PutPolicyOptions {
    type Output = Envelope<SecretPolicyResource>;

    const DESCRIPTOR: OperationDescriptor = OperationDescriptor {
        id: "put_policy",
        name: "PutPolicy",
        method: HttpMethod::Put,
        path: "/api/v1/secrets/{secret_type}/{id}/policies",
    };

    fn path_params(&self) -> Vec<(&'static str, &str)> {
        vec![("secret_type", self.secret_type.as_str()), ("id", self.id.as_str())]
    }

    fn query_params(&self) -> QueryParams {
        QueryParams::new().push("policy", self.policy)
    }

    fn validate(&self) -> Result<(), CodecError> {
        let kind = policy_kind(&self.secret_type)?;
        self.resources.iter().try_for_each(|policy| check_resource_tag(kind, policy.tag()))
    }

    fn body(&self) -> Result<Option<Value>, CodecError> {
        let resources = self.resources.iter().map(codec::encode).collect::<Result<Vec<_>, _>>()?;
        envelope_body(&self.metadata, resources)
    }

    fn headers(&self) -> &HeaderBag {
        &self.headers
    }

    fn parse(&self, body: &[u8]) -> Result<Self::Output, CodecError> {
        parse_policies(body, &self.secret_type)
    }
}

/// Options for `get_policy`.
#[derive(Debug, Clone, Default)]
pub struct GetPolicyOptions {
    /// Secret type.
    pub secret_type: String,
    /// Secret identifier.
    pub id: String,
    /// Policy type filter.
    pub policy: Option<PolicyType>,
    /// Per-call headers.
    pub headers: HeaderBag,
}

impl GetPolicyOptions {
    /// Options reading the policies of secret `id`.
    #[must_use]
    pub fn new(secret_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            secret_type: secret_type.into(),
            id: id.into(),
            ..Self::default()
        }
    }

    /// Sets the policy type filter.
    #[must_use]
    pub const fn with_policy(mut self, policy: PolicyType) -> Self {
        self.policy = Some(policy);
        self
    }
}

impl Operation for GetPolicyOptions {
    type Output = Envelope<SecretPolicyResource>;

    const DESCRIPTOR: OperationDescriptor = OperationDescriptor {
        id: "get_policy",
        name: "GetPolicy",
        method: HttpMethod::Get,
        path: "/api/v1/secrets/{secret_type}/{id}/policies",
    };

    fn path_params(&self) -> Vec<(&'static str, &str)> {
        vec![("secret_type", self.secret_type.as_str()), ("id", self.id.as_str())]
    }

    fn query_params(&self) -> QueryParams {
        QueryParams::new().opt("policy", self.policy)
    }

    fn validate(&self) -> Result<(), CodecError> {
        policy_kind(&self.secret_type).map(|_| ())
    }

    fn headers(&self) -> &HeaderBag {
        &self.headers
    }

    fn parse(&self, body: &[u8]) -> Result<Self::Output, CodecError> {
        parse_policies(body, &self.secret_type)
    }
}

header_setter!(PutPolicyOptions, GetPolicyOptions);
