// crates/secrets-manager/tests/common/mod.rs
// ============================================================================
// Module: Common Test Utilities
// Description: Shared helpers for secrets-manager tests.
// Purpose: Provide a scripted transport, client builders, and wire fixtures.
// Dependencies: secrets-manager, async-trait, bytes, reqwest, serde_json, tiny_http
// ============================================================================

//! ## Overview
//! Provides an in-memory [`HttpRoundTripper`] that records every prepared
//! request, a local `tiny_http` server for end-to-end calls through the
//! reqwest transport, and JSON fixtures shaped like service responses.

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
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use secrets_manager::NoAuthAuthenticator;
use secrets_manager::SdkError;
use secrets_manager::SecretsManager;
use secrets_manager::ServiceOptions;
use secrets_manager_core::HttpRoundTripper;
use secrets_manager_core::PreparedRequest;
use secrets_manager_core::RawResponse;
use serde_json::Value;
use serde_json::json;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;

/// Base URL used by scripted clients.
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

    pub fn last(&self) -> PreparedRequest {
        self.requests.lock().unwrap().last().cloned().expect("a recorded request")
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

/// Builds a no-auth client bound to `transport`.
pub fn client(transport: Arc<ScriptedTransport>) -> SecretsManager {
    SecretsManager::new(
        ServiceOptions::new("secrets_manager", TEST_URL, Arc::new(NoAuthAuthenticator)).with_transport(transport),
    )
    .expect("client")
}

/// Decodes the JSON body of a recorded request.
pub fn body_json(request: &PreparedRequest) -> Value {
    serde_json::from_slice(request.body.as_ref().expect("request body")).expect("json body")
}

/// Returns `path?query` of a recorded request.
pub fn path_and_query(request: &PreparedRequest) -> String {
    match request.url.query() {
        Some(query) => format!("{}?{query}", request.url.path()),
        None => request.url.path().to_string(),
    }
}

// ============================================================================
// SECTION: Local Server
// ============================================================================

/// Request observed by the local server.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: String,
    pub url: String,
    pub body: String,
}

/// Starts a server answering one request with `status` and `body` after
/// `delay`, returning its base URL.
pub fn one_shot_server(
    status: u16,
    body: String,
    delay: Duration,
) -> (String, Arc<Mutex<Vec<SeenRequest>>>, thread::JoinHandle<()>) {
    let server = Server::http("127.0.0.1:0").expect("http server");
    let addr = server.server_addr();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&seen);
    let handle = thread::spawn(move || {
        let Ok(mut request) = server.recv() else {
            return;
        };
        let mut content = String::new();
        request.as_reader().read_to_string(&mut content).expect("read body");
        recorded.lock().unwrap().push(SeenRequest {
            method: request.method().to_string(),
            url: request.url().to_string(),
            body: content,
        });
        thread::sleep(delay);
        let response = Response::from_string(body)
            .with_status_code(status)
            .with_header(Header::from_bytes("Content-Type", "application/json").unwrap());
        let _ = request.respond(response);
    });
    (format!("http://{addr}"), seen, handle)
}

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Secret group collection type.
pub const GROUP_TYPE: &str = "application/vnd.ibm.secrets-manager.secret.group+json";

/// Secret collection type.
pub const SECRET_TYPE: &str = "application/vnd.ibm.secrets-manager.secret+json";

/// Envelope returned for secret group writes and reads.
pub fn secret_group_envelope() -> Value {
    json!({
        "metadata": {"collection_type": GROUP_TYPE, "collection_total": 1},
        "resources": [{
            "id": "bc656587-8fda-4d05-9ad8-b1de1ec7e712",
            "name": "my-secret-group",
            "description": "Extended description for this group.",
            "creation_date": "2020-02-12T21:33:49Z",
            "last_update_date": "2020-02-12T21:33:49Z",
            "type": GROUP_TYPE
        }]
    })
}

/// Envelope with one arbitrary secret.
pub fn arbitrary_secret_envelope(locks_total: i64) -> Value {
    json!({
        "metadata": {"collection_type": SECRET_TYPE, "collection_total": 1},
        "resources": [{
            "id": "ID",
            "name": "Name",
            "description": "Description",
            "secret_group_id": "default",
            "labels": ["dev", "us-south"],
            "state": 1,
            "state_description": "Active",
            "secret_type": "arbitrary",
            "crn": "crn:v1:bluemix:public:secrets-manager:us-south:a/a5ebf2570dcaedf18d7ed78e216c263a:f1bc94a6-64aa-4c55-b00f-f6cd70e4b2ce:secret:cb7a2502-8ede-47d6-b5b6-1b7af6b6f563",
            "creation_date": "2018-04-12T23:20:50.520Z",
            "created_by": "Created by",
            "last_update_date": "2018-04-12T23:20:50.520Z",
            "versions_total": 1,
            "versions": [{"key": "anyValue"}],
            "locks_total": locks_total,
            "expiration_date": "2030-04-01T09:30:00Z",
            "payload": "secret-credentials",
            "custom_metadata": {"anyKey": "anyValue"},
            "version_custom_metadata": {"anyKey": "anyValue"}
        }]
    })
}

/// Envelope with one sign action result.
pub fn sign_action_envelope(action: &str) -> Value {
    json!({
        "metadata": {"collection_type": "application/vnd.ibm.secrets-manager.config+json", "collection_total": 1},
        "resources": [{
            "action_type": action,
            "data": {
                "certificate": "-----BEGIN CERTIFICATE-----",
                "issuing_ca": "-----BEGIN CERTIFICATE-----",
                "ca_chain": ["-----BEGIN CERTIFICATE-----"],
                "serial_number": "d9:be:fe:35:ba:09:42:b5",
                "expiration": 1_879_939_568
            }
        }]
    })
}
