// crates/secrets-manager/src/lib.rs
// ============================================================================
// Module: Secrets Manager SDK
// Description: Typed client for the Secrets Manager v1 REST API.
// Purpose: Expose models, per-operation options, and the service client.
// Dependencies: secrets-manager-core, serde, serde_json, time, tracing
// ============================================================================

//! ## Overview
//! The SDK layers concrete secret shapes over `secrets-manager-core`.
//! [`models`] holds every resource record and polymorphic family,
//! [`options`] holds one options type per REST operation, and
//! [`SecretsManager`] exposes each operation as a pair of async methods.
//! Invariants:
//! - Every polymorphic payload is resolved through its family registry.
//! - Invalid options fail before any network I/O.

pub mod models;
pub mod options;
pub mod service;

pub use secrets_manager_core::ApiResponse;
pub use secrets_manager_core::ApiResult;
pub use secrets_manager_core::Authenticator;
pub use secrets_manager_core::BasicAuthenticator;
pub use secrets_manager_core::BearerTokenAuthenticator;
pub use secrets_manager_core::CallContext;
pub use secrets_manager_core::CancellationToken;
pub use secrets_manager_core::CodecError;
pub use secrets_manager_core::CollectionMetadata;
pub use secrets_manager_core::DetailedResponse;
pub use secrets_manager_core::Envelope;
pub use secrets_manager_core::IamAuthenticator;
pub use secrets_manager_core::NoAuthAuthenticator;
pub use secrets_manager_core::OpaqueVariant;
pub use secrets_manager_core::RetryPolicy;
pub use secrets_manager_core::SdkError;
pub use secrets_manager_core::ServiceOptions;
pub use secrets_manager_core::ServiceProperties;
pub use service::DEFAULT_SERVICE_URL;
pub use service::SecretsManager;
