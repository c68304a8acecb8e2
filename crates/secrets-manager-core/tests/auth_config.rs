// crates/secrets-manager-core/tests/auth_config.rs
// ============================================================================
// Module: Authentication and Configuration Tests
// Description: Authenticators, IAM token caching, property loading, regions.
// Purpose: Validate credential handling and external configuration resolution.
// Dependencies: secrets-manager-core, tempfile, tiny_http, tokio
// ============================================================================
//! ## Overview
//! Runs the IAM authenticator against a local token endpoint and resolves
//! service properties from injected environments and credentials files.

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
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use common::ScriptedTransport;
use common::WidgetOp;
use common::circle_envelope;
use secrets_manager_core::Authenticator;
use secrets_manager_core::BaseService;
use secrets_manager_core::BasicAuthenticator;
use secrets_manager_core::CallContext;
use secrets_manager_core::IamAuthenticator;
use secrets_manager_core::SdkError;
use secrets_manager_core::ServiceProperties;
use secrets_manager_core::authenticator_from_properties;
use secrets_manager_core::config::CREDENTIALS_FILE_ENV;
use secrets_manager_core::config::env_prefix;
use secrets_manager_core::service_url_for_region;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;

/// Starts a token endpoint answering `replies` requests, recording bodies.
fn token_server(replies: Vec<(u16, String)>) -> (String, Arc<Mutex<Vec<String>>>, thread::JoinHandle<()>) {
    let server = Server::http("127.0.0.1:0").expect("http server");
    let addr = server.server_addr();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&seen);
    let handle = thread::spawn(move || {
        for (status, body) in replies {
            let Ok(mut request) = server.recv() else {
                return;
            };
            let mut form = String::new();
            request.as_reader().read_to_string(&mut form).expect("read body");
            recorded.lock().unwrap().push(format!("{} {}", request.url(), form));
            let response = Response::from_string(body)
                .with_status_code(status)
                .with_header(Header::from_bytes("Content-Type", "application/json").unwrap());
            request.respond(response).expect("respond");
        }
    });
    (format!("http://{addr}"), seen, handle)
}

#[tokio::test]
async fn iam_token_is_fetched_once_and_cached() {
    let (url, seen, handle) =
        token_server(vec![(200, r#"{"access_token":"tok-1","expires_in":3600,"token_type":"Bearer"}"#.to_string())]);
    let iam = Arc::new(IamAuthenticator::new("key-123").unwrap().with_url(url));
    let transport = ScriptedTransport::new();
    transport.reply_json(200, &circle_envelope());
    transport.reply_json(200, &circle_envelope());
    let svc = BaseService::new(
        secrets_manager_core::ServiceOptions::new("secrets_manager", common::TEST_URL, iam)
            .with_transport(transport.clone()),
    )
    .unwrap();
    for _ in 0..2 {
        svc.execute(Some(&WidgetOp::new("circle", "1")), &CallContext::background()).await.unwrap();
    }
    handle.join().unwrap();
    for request in transport.requests() {
        assert_eq!(request.headers["authorization"], "Bearer tok-1");
    }
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].starts_with("/identity/token "));
    assert!(seen[0].contains("grant_type=urn%3Aibm%3Aparams%3Aoauth%3Agrant-type%3Aapikey"));
    assert!(seen[0].contains("apikey=key-123"));
}

#[tokio::test]
async fn iam_token_is_refreshed_when_expired() {
    let (url, seen, handle) = token_server(vec![
        (200, r#"{"access_token":"tok-1","expires_in":0}"#.to_string()),
        (200, r#"{"access_token":"tok-2","expires_in":0}"#.to_string()),
    ]);
    let iam = IamAuthenticator::new("key-123").unwrap().with_url(url);
    assert_eq!(iam.access_token().await.unwrap(), "tok-1");
    assert_eq!(iam.access_token().await.unwrap(), "tok-2");
    handle.join().unwrap();
    assert_eq!(seen.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn iam_token_without_lifetime_is_reused() {
    let (url, seen, handle) = token_server(vec![(200, r#"{"access_token":"tok-1","token_type":"Bearer"}"#.to_string())]);
    let iam = IamAuthenticator::new("key-123").unwrap().with_url(url);
    assert_eq!(iam.access_token().await.unwrap(), "tok-1");
    handle.join().unwrap();
    assert_eq!(iam.access_token().await.unwrap(), "tok-1");
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn iam_endpoint_failure_is_authentication_error() {
    let (url, _seen, handle) = token_server(vec![(400, r#"{"errorMessage":"bad key"}"#.to_string())]);
    let iam = IamAuthenticator::new("key-123").unwrap().with_url(url);
    let err = iam.access_token().await.unwrap_err();
    handle.join().unwrap();
    assert!(matches!(err, SdkError::Authentication(_)));
}

#[test]
fn debug_output_redacts_credentials() {
    let basic = BasicAuthenticator::new("user", "hunter2");
    let iam = IamAuthenticator::new("secret-key").unwrap();
    assert!(!format!("{basic:?}").contains("hunter2"));
    assert!(!format!("{iam:?}").contains("secret-key"));
}

#[test]
fn basic_credentials_reject_templates() {
    assert!(BasicAuthenticator::new("{user}", "pw").validate().is_err());
    assert!(BasicAuthenticator::new("user", "").validate().is_err());
    assert!(BasicAuthenticator::new("user", "pw").validate().is_ok());
}

fn lookup(vars: &HashMap<String, String>) -> impl Fn(&str) -> Option<String> + '_ {
    move |key| vars.get(key).cloned()
}

#[test]
fn environment_properties_select_authenticator() {
    let vars: HashMap<String, String> = [
        ("SECRETS_MANAGER_URL", "https://sm.example.test"),
        ("SECRETS_MANAGER_AUTH_TYPE", "BearerToken"),
        ("SECRETS_MANAGER_BEARER_TOKEN", "tok"),
        ("SECRETS_MANAGER_ENABLE_RETRIES", "true"),
        ("SECRETS_MANAGER_MAX_RETRIES", "2"),
        ("SECRETS_MANAGER_RETRY_INTERVAL", "7"),
        ("SECRETS_MANAGER_ENABLE_GZIP", "TRUE"),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value.to_string()))
    .collect();
    let properties = ServiceProperties::load_with("secrets_manager", lookup(&vars)).unwrap();
    assert_eq!(properties.get("url"), Some("https://sm.example.test"));
    let options = properties.service_options("https://default.example.test").unwrap();
    assert_eq!(options.url, "https://sm.example.test");
    assert_eq!(options.authenticator.authentication_type(), "bearerToken");
    assert!(options.enable_gzip);
    let retry = options.retry.unwrap();
    assert_eq!(retry.max_retries, 2);
    assert_eq!(retry.max_interval, Duration::from_secs(7));
}

#[test]
fn unknown_auth_type_is_config_error() {
    let properties = ServiceProperties::from_pairs("secrets_manager", [("auth_type", "kerberos")]);
    let err = authenticator_from_properties(&properties).unwrap_err();
    assert!(matches!(err, SdkError::Config(message) if message.contains("kerberos")));
}

#[test]
fn iam_requires_apikey() {
    let properties = ServiceProperties::from_pairs("secrets_manager", [("auth_type", "iam")]);
    assert!(matches!(authenticator_from_properties(&properties), Err(SdkError::Config(_))));
}

#[test]
fn credentials_file_is_overridden_by_environment() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[secrets_manager]\nurl = \"https://file.example.test\"\nauth_type = \"noauth\"\nenable_retries = true\nmax_retries = 3\n\n[other]\nurl = \"https://other.example.test\""
    )
    .unwrap();
    let vars: HashMap<String, String> = [
        (CREDENTIALS_FILE_ENV.to_string(), file.path().display().to_string()),
        ("SECRETS_MANAGER_URL".to_string(), "https://env.example.test".to_string()),
    ]
    .into_iter()
    .collect();
    let properties = ServiceProperties::load_with("secrets_manager", lookup(&vars)).unwrap();
    assert_eq!(properties.get("url"), Some("https://env.example.test"));
    assert_eq!(properties.get("auth_type"), Some("noauth"));
    assert_eq!(properties.get("max_retries"), Some("3"));
    assert_eq!(properties.retry_policy().unwrap().unwrap().max_retries, 3);
}

#[test]
fn oversized_credentials_file_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let padding = "#".repeat(1024 * 1024 + 1);
    file.write_all(padding.as_bytes()).unwrap();
    let err = ServiceProperties::from_file(file.path(), "secrets_manager").unwrap_err();
    assert!(err.to_string().contains("size limit"));
}

#[test]
fn malformed_flags_are_rejected() {
    let properties = ServiceProperties::from_pairs("secrets_manager", [("enable_gzip", "yes")]);
    assert!(properties.flag("enable_gzip").is_err());
}

#[test]
fn env_prefix_is_upper_snake_case() {
    assert_eq!(env_prefix("secrets-manager"), "SECRETS_MANAGER");
    assert_eq!(env_prefix("secrets_manager"), "SECRETS_MANAGER");
}

#[test]
fn region_urls_follow_allow_list() {
    assert_eq!(
        service_url_for_region("abc", "eu-de").unwrap(),
        "https://abc.eu-de.secrets-manager.appdomain.cloud"
    );
    assert!(matches!(service_url_for_region("abc", "mars-1"), Err(SdkError::InvalidField { .. })));
    assert!(matches!(service_url_for_region("", "us-south"), Err(SdkError::MissingField { .. })));
}
