// crates/secrets-manager-core/src/lib.rs
// ============================================================================
// Module: Secrets Manager Core Library
// Description: Marshalling, dispatch, and transport core of the Secrets Manager SDK.
// Purpose: Provide the family registry, codec, request pipeline, retry engine,
//          and service handle used by every typed operation.
// Dependencies: reqwest, serde, serde_json, tokio, tracing
// ============================================================================

//! ## Overview
//! The core knows nothing about concrete secret shapes. Typed operations
//! implement [`Operation`]; polymorphic payloads implement [`Family`]; the
//! [`BaseService`] ties them together with an [`Authenticator`] and an
//! [`HttpRoundTripper`].
//! Invariants:
//! - No network I/O happens before an operation passes pre-flight validation.
//! - Every round-trip that completes is visible to the caller, on success
//!   through [`ApiResponse::response`] and on failure through
//!   [`SdkError::response`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod auth;
pub mod codec;
pub mod config;
pub mod context;
pub mod error;
pub mod operation;
pub mod request;
pub mod response;
pub mod retry;
pub mod service;
pub mod transport;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use auth::Authenticator;
pub use auth::BasicAuthenticator;
pub use auth::BearerTokenAuthenticator;
pub use auth::IamAuthenticator;
pub use auth::NoAuthAuthenticator;
pub use codec::ContextHint;
pub use codec::Discriminator;
pub use codec::Family;
pub use codec::OpaqueVariant;
pub use codec::Registry;
pub use codec::Tracked;
pub use codec::VariantKey;
pub use codec::WireOrigin;
pub use config::ServiceProperties;
pub use config::authenticator_from_properties;
pub use config::service_url_for_region;
pub use context::CallContext;
pub use error::CodecError;
pub use error::HttpError;
pub use error::SdkError;
pub use error::ServiceErrorItem;
pub use operation::HeaderBag;
pub use operation::HttpMethod;
pub use operation::Operation;
pub use operation::OperationDescriptor;
pub use operation::QueryParams;
pub use request::PreparedRequest;
pub use response::ApiResponse;
pub use response::ApiResult;
pub use response::CollectionMetadata;
pub use response::DetailedResponse;
pub use response::Envelope;
pub use retry::RetryPolicy;
pub use service::BaseService;
pub use service::ServiceOptions;
pub use transport::HttpRoundTripper;
pub use transport::RawResponse;
pub use transport::ReqwestTransport;
pub use transport::TransportConfig;
pub use tokio_util::sync::CancellationToken;
