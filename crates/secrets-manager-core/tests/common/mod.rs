// crates/secrets-manager-core/tests/common/mod.rs
// ============================================================================
// Module: Common Test Utilities
// Description: Shared helpers for secrets-manager-core tests.
// Purpose: Provide a scripted transport, a sample family, and a sample operation.
// Dependencies: secrets-manager-core, async-trait, serde_json, tokio
// ============================================================================

//! ## Overview
//! Provides an in-memory [`HttpRoundTripper`] that records every prepared
//! request and replays scripted responses, plus a small `Shape` family and a
//! `WidgetOp` operation used across the core tests.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    dead_code,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::LazyLock;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use secrets_manager_core::BaseService;
use secrets_manager_core::CodecError;
use secrets_manager_core::ContextHint;
use secrets_manager_core::Discriminator;
use secrets_manager_core::Envelope;
use secrets_manager_core::Family;
use secrets_manager_core::HeaderBag;
use secrets_manager_core::HttpMethod;
use secrets_manager_core::HttpRoundTripper;
use secrets_manager_core::NoAuthAuthenticator;
use secrets_manager_core::OpaqueVariant;
use secrets_manager_core::Operation;
use secrets_manager_core::OperationDescriptor;
use secrets_manager_core::PreparedRequest;
use secrets_manager_core::QueryParams;
use secrets_manager_core::RawResponse;
use secrets_manager_core::Registry;
use secrets_manager_core::SdkError;
use secrets_manager_core::ServiceOptions;
use secrets_manager_core::codec;
use secrets_manager_core::response::decode_family_envelope;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

/// Base URL used by scripted services.
pub const TEST_URL: &str = "https://sm.example.test";

// ============================================================================
// SECTION: Scripted Transport
// ============================================================================

/// One scripted transport outcome.
pub enum Step {
    /// Reply immediately.
    Reply(RawResponse),
    /// Reply after a delay.
    Delayed(Duration, RawResponse),
    /// Fail with a transport error.
    Fail(String),
}

/// Transport replaying scripted outcomes and recording requests.
#[derive(Default)]
pub struct ScriptedTransport {
    steps: Mutex<VecDeque<Step>>,
    requests: Mutex<Vec<PreparedRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, step: Step) {
        self.steps.lock().unwrap().push_back(step);
    }

    pub fn reply(&self, status: u16, body: &str) {
        self.push(Step::Reply(raw(status, body)));
    }

    pub fn reply_json(&self, status: u16, body: &Value) {
        self.push(Step::Reply(raw(status, &body.to_string())));
    }

    pub fn requests(&self) -> Vec<PreparedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpRoundTripper for ScriptedTransport {
    async fn round_trip(&self, request: PreparedRequest) -> Result<RawResponse, SdkError> {
        self.requests.lock().unwrap().push(request);
        let step = self.steps.lock().unwrap().pop_front();
        match step {
            Some(Step::Reply(response)) => Ok(response),
            Some(Step::Delayed(delay, response)) => {
                tokio::time::sleep(delay).await;
                Ok(response)
            }
            Some(Step::Fail(message)) => Err(SdkError::Transport(message)),
            None => Err(SdkError::Transport("script exhausted".to_string())),
        }
    }
}

/// Builds a JSON raw response.
pub fn raw(status: u16, body: &str) -> RawResponse {
    let mut headers = HeaderMap::new();
    headers.insert("content-type", HeaderValue::from_static("application/json"));
    RawResponse {
        status,
        headers,
        body: Bytes::from(body.to_string()),
    }
}

/// Builds a raw response with one extra header.
pub fn raw_with_header(status: u16, body: &str, name: &'static str, value: &str) -> RawResponse {
    let mut response = raw(status, body);
    response.headers.insert(name, HeaderValue::from_str(value).unwrap());
    response
}

/// Builds a no-auth service bound to `transport`.
pub fn service(transport: Arc<ScriptedTransport>) -> BaseService {
    BaseService::new(
        ServiceOptions::new("secrets_manager", TEST_URL, Arc::new(NoAuthAuthenticator)).with_transport(transport),
    )
    .expect("service")
}

// ============================================================================
// SECTION: Sample Family
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub radius: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Square {
    pub side: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle(Circle),
    Square(Square),
    Opaque(OpaqueVariant),
}

pub static SHAPES: LazyLock<Registry<Shape>> = LazyLock::new(|| {
    Registry::builder("Shape", Discriminator::Field("kind"))
        .register("circle", |map| codec::from_fields(map).map(Shape::Circle))
        .register("square", |map| codec::from_fields(map).map(Shape::Square))
        .opaque(Shape::Opaque)
        .build()
});

impl Family for Shape {
    fn registry() -> &'static Registry<Self> {
        &SHAPES
    }

    fn tag(&self) -> Option<&str> {
        match self {
            Self::Circle(_) => Some("circle"),
            Self::Square(_) => Some("square"),
            Self::Opaque(raw) => raw.tag.as_deref(),
        }
    }

    fn fields(&self) -> Result<Map<String, Value>, CodecError> {
        match self {
            Self::Circle(value) => codec::to_fields(value),
            Self::Square(value) => codec::to_fields(value),
            Self::Opaque(raw) => Ok(raw.raw.clone()),
        }
    }

    fn validate(&self) -> Result<(), CodecError> {
        match self {
            Self::Circle(circle) if circle.radius <= 0.0 => Err(CodecError::invalid("radius", "must be positive")),
            Self::Circle(circle) => codec::check_extra_fields(&circle.extra, &["radius", "kind"]),
            _ => Ok(()),
        }
    }
}

secrets_manager_core::impl_family_serde!(Shape);

// ============================================================================
// SECTION: Sample Operation
// ============================================================================

/// `POST /api/v1/widgets/{kind}/{id}` with an optional shape body.
#[derive(Debug, Clone, Default)]
pub struct WidgetOp {
    pub kind: String,
    pub id: String,
    pub limit: Option<i64>,
    pub tags: Vec<String>,
    pub shape: Option<Shape>,
    pub headers: HeaderBag,
}

impl WidgetOp {
    pub fn new(kind: &str, id: &str) -> Self {
        Self {
            kind: kind.to_string(),
            id: id.to_string(),
            ..Self::default()
        }
    }
}

impl Operation for WidgetOp {
    type Output = Envelope<Shape>;

    const DESCRIPTOR: OperationDescriptor = OperationDescriptor {
        id: "create_widget",
        name: "CreateWidget",
        method: HttpMethod::Post,
        path: "/api/v1/widgets/{kind}/{id}",
    };

    fn path_params(&self) -> Vec<(&'static str, &str)> {
        vec![("kind", self.kind.as_str()), ("id", self.id.as_str())]
    }

    fn query_params(&self) -> QueryParams {
        QueryParams::new().opt("limit", self.limit).repeated("tags", &self.tags)
    }

    fn validate(&self) -> Result<(), CodecError> {
        match self.limit {
            Some(limit) if !(1..=5000).contains(&limit) => Err(CodecError::invalid("limit", "must be in 1..=5000")),
            _ => Ok(()),
        }
    }

    fn body(&self) -> Result<Option<Value>, CodecError> {
        self.shape.as_ref().map(codec::encode).transpose()
    }

    fn headers(&self) -> &HeaderBag {
        &self.headers
    }

    fn parse(&self, body: &[u8]) -> Result<Self::Output, CodecError> {
        decode_family_envelope(body, &ContextHint::tag(self.kind.clone()))
    }
}

/// Envelope body with one circle.
pub fn circle_envelope() -> Value {
    serde_json::json!({
        "metadata": {"collection_type": "application/vnd.example.shape+json", "collection_total": 1},
        "resources": [{"kind": "circle", "radius": 2.5}]
    })
}
