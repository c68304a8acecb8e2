// crates/secrets-manager/tests/operation_contract.rs
// ============================================================================
// Module: Operation Contract Tests
// Description: Shared guarantees checked across every client operation.
// Purpose: Pin routing, pre-flight validation, and response classification.
// Dependencies: secrets-manager, serde_json, tokio
// ============================================================================
//! ## Overview
//! Every operation must reject absent options and an empty service URL
//! without I/O, route to its method, path, and query, and classify 2xx
//! bodies it cannot decode. Validation edge cases follow per operation group.

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

use std::sync::Arc;

use common::GROUP_TYPE;
use common::SECRET_TYPE;
use common::ScriptedTransport;
use common::body_json;
use common::client;
use common::path_and_query;
use secrets_manager::CallContext;
use secrets_manager::CollectionMetadata;
use secrets_manager::SdkError;
use secrets_manager::SecretsManager;
use secrets_manager::models::ConfigAction;
use secrets_manager::models::ConfigElementConfig;
use secrets_manager::models::ConfigElementDef;
use secrets_manager::models::EngineConfig;
use secrets_manager::models::LockMode;
use secrets_manager::models::LockSecretBodyLocksItem;
use secrets_manager::models::RotationPolicy;
use secrets_manager::models::SecretAction;
use secrets_manager::models::SecretGroupMetadataUpdatable;
use secrets_manager::models::SecretGroupResource;
use secrets_manager::models::SecretMetadata;
use secrets_manager::models::SecretResource;
use secrets_manager::models::UpdateSecretVersionMetadata;
use secrets_manager::models::actions::RestoreSecretBody;
use secrets_manager::models::actions::RotateArbitrarySecretBody;
use secrets_manager::models::actions::RotateCustomMetadataBody;
use secrets_manager::models::config_actions::RevokeAction;
use secrets_manager::models::config_actions::SignCsrAction;
use secrets_manager::models::elements::CertificateTemplateConfig;
use secrets_manager::models::engine::IamCredentialsEngineConfig;
use secrets_manager::models::metadata::ArbitrarySecretMetadata;
use secrets_manager::models::policies::StandardRotationPolicy;
use secrets_manager::models::secrets::ArbitrarySecretResource;
use secrets_manager::models::secrets::KvSecretResource;
use secrets_manager::options::*;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Collection type for version metadata updates.
const VERSION_TYPE: &str = "application/vnd.ibm.secrets-manager.secret.version+json";

/// Collection type for policy writes.
const POLICY_TYPE: &str = "application/vnd.ibm.secrets-manager.secret.policy+json";

/// Expected `(operation, method, path?query)` for [`call_every_operation`].
const ROUTES: [(&str, &str, &str); 39] = [
    ("create_secret_group", "POST", "/api/v1/secret_groups"),
    ("list_secret_groups", "GET", "/api/v1/secret_groups"),
    ("get_secret_group", "GET", "/api/v1/secret_groups/g1"),
    ("update_secret_group_metadata", "PUT", "/api/v1/secret_groups/g1"),
    ("delete_secret_group", "DELETE", "/api/v1/secret_groups/g1"),
    ("create_secret", "POST", "/api/v1/secrets/arbitrary"),
    ("list_secrets", "GET", "/api/v1/secrets/kv?limit=10&offset=20"),
    ("list_all_secrets", "GET", "/api/v1/secrets?limit=5&search=db&sort_by=name&groups=a&groups=b"),
    ("get_secret", "GET", "/api/v1/secrets/arbitrary/s1"),
    ("update_secret", "POST", "/api/v1/secrets/iam_credentials/s1?action=delete_credentials"),
    ("delete_secret", "DELETE", "/api/v1/secrets/arbitrary/s1"),
    ("list_secret_versions", "GET", "/api/v1/secrets/arbitrary/s1/versions"),
    ("get_secret_version", "GET", "/api/v1/secrets/arbitrary/s1/versions/v1"),
    ("update_secret_version", "POST", "/api/v1/secrets/private_cert/s1/versions/v1?action=revoke"),
    ("get_secret_version_metadata", "GET", "/api/v1/secrets/arbitrary/s1/versions/v1/metadata"),
    ("update_secret_version_metadata", "PUT", "/api/v1/secrets/arbitrary/s1/versions/v1/metadata"),
    ("get_secret_metadata", "GET", "/api/v1/secrets/arbitrary/s1/metadata"),
    ("update_secret_metadata", "PUT", "/api/v1/secrets/arbitrary/s1/metadata"),
    ("get_locks", "GET", "/api/v1/locks/arbitrary/s1?limit=2&search=app"),
    ("lock_secret", "POST", "/api/v1/locks/arbitrary/s1/lock?mode=exclusive"),
    ("unlock_secret", "POST", "/api/v1/locks/arbitrary/s1/unlock"),
    ("get_secret_version_locks", "GET", "/api/v1/locks/arbitrary/s1/versions/v1"),
    ("lock_secret_version", "POST", "/api/v1/locks/arbitrary/s1/versions/v1/lock?mode=exclusive_delete"),
    ("unlock_secret_version", "POST", "/api/v1/locks/arbitrary/s1/versions/v1/unlock"),
    ("list_instance_secrets_locks", "GET", "/api/v1/locks?offset=3&groups=default"),
    ("put_policy", "PUT", "/api/v1/secrets/username_password/s1/policies?policy=rotation"),
    ("get_policy", "GET", "/api/v1/secrets/username_password/s1/policies"),
    ("put_config", "PUT", "/api/v1/config/iam_credentials"),
    ("get_config", "GET", "/api/v1/config/public_cert"),
    ("create_config_element", "POST", "/api/v1/config/private_cert/certificate_templates"),
    ("get_config_elements", "GET", "/api/v1/config/public_cert/dns_providers"),
    ("get_config_element", "GET", "/api/v1/config/public_cert/dns_providers/cis-1"),
    ("update_config_element", "PUT", "/api/v1/config/private_cert/certificate_templates/tpl"),
    ("delete_config_element", "DELETE", "/api/v1/config/private_cert/certificate_templates/tpl"),
    ("action_on_config_element", "POST", "/api/v1/config/private_cert/root_certificate_authorities/root-ca?action=rotate_crl"),
    ("create_notifications_registration", "POST", "/api/v1/notifications/registration"),
    ("get_notifications_registration", "GET", "/api/v1/notifications/registration"),
    ("delete_notifications_registration", "DELETE", "/api/v1/notifications/registration"),
    ("send_test_notification", "GET", "/api/v1/notifications/test"),
];

/// Returns `{"anyKey": "anyValue"}`.
fn any_metadata() -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("anyKey".to_string(), Value::String("anyValue".to_string()));
    map
}

/// Certificate template payload.
fn template() -> ConfigElementConfig {
    ConfigElementConfig::CertificateTemplate(CertificateTemplateConfig::new("root-ca"))
}

/// Calls every operation once with valid options.
async fn call_every_operation(sm: &SecretsManager) -> Vec<(&'static str, Result<(), SdkError>)> {
    let group_meta = CollectionMetadata::new(GROUP_TYPE, 1);
    let secret_meta = CollectionMetadata::new(SECRET_TYPE, 1);
    let mut results = Vec::new();

    results.push((
        "create_secret_group",
        sm.create_secret_group(&CreateSecretGroupOptions::new(
            group_meta.clone(),
            vec![SecretGroupResource::new("group")],
        ))
        .await
        .map(|_| ()),
    ));
    results.push(("list_secret_groups", sm.list_secret_groups(&ListSecretGroupsOptions::new()).await.map(|_| ())));
    results.push(("get_secret_group", sm.get_secret_group(&GetSecretGroupOptions::new("g1")).await.map(|_| ())));
    results.push((
        "update_secret_group_metadata",
        sm.update_secret_group_metadata(&UpdateSecretGroupMetadataOptions::new(
            "g1",
            group_meta,
            vec![SecretGroupMetadataUpdatable {
                name: Some("renamed".to_string()),
                description: None,
            }],
        ))
        .await
        .map(|_| ()),
    ));
    results.push((
        "delete_secret_group",
        sm.delete_secret_group(&DeleteSecretGroupOptions::new("g1")).await.map(|_| ()),
    ));

    results.push((
        "create_secret",
        sm.create_secret(&CreateSecretOptions::new(
            "arbitrary",
            secret_meta.clone(),
            vec![SecretResource::Arbitrary(ArbitrarySecretResource::new("secret", "payload"))],
        ))
        .await
        .map(|_| ()),
    ));
    results.push((
        "list_secrets",
        sm.list_secrets(&ListSecretsOptions::new("kv").with_limit(10).with_offset(20)).await.map(|_| ()),
    ));
    results.push((
        "list_all_secrets",
        sm.list_all_secrets(
            &ListAllSecretsOptions::new()
                .with_limit(5)
                .with_search("db")
                .with_sort_by("name")
                .with_groups(vec!["a".to_string(), "b".to_string()]),
        )
        .await
        .map(|_| ()),
    ));
    results.push(("get_secret", sm.get_secret(&GetSecretOptions::new("arbitrary", "s1")).await.map(|_| ())));
    results.push((
        "update_secret",
        sm.update_secret(&UpdateSecretOptions::new("iam_credentials", "s1", "delete_credentials"))
            .await
            .map(|_| ()),
    ));
    results.push(("delete_secret", sm.delete_secret(&DeleteSecretOptions::new("arbitrary", "s1")).await.map(|_| ())));

    results.push((
        "list_secret_versions",
        sm.list_secret_versions(&ListSecretVersionsOptions::new("arbitrary", "s1")).await.map(|_| ()),
    ));
    results.push((
        "get_secret_version",
        sm.get_secret_version(&GetSecretVersionOptions::new("arbitrary", "s1", "v1")).await.map(|_| ()),
    ));
    results.push((
        "update_secret_version",
        sm.update_secret_version(&UpdateSecretVersionOptions::new("private_cert", "s1", "v1", "revoke"))
            .await
            .map(|_| ()),
    ));
    results.push((
        "get_secret_version_metadata",
        sm.get_secret_version_metadata(&GetSecretVersionMetadataOptions::new("arbitrary", "s1", "v1"))
            .await
            .map(|_| ()),
    ));
    results.push((
        "update_secret_version_metadata",
        sm.update_secret_version_metadata(&UpdateSecretVersionMetadataOptions::new(
            "arbitrary",
            "s1",
            "v1",
            CollectionMetadata::new(VERSION_TYPE, 1),
            vec![UpdateSecretVersionMetadata {
                version_custom_metadata: Some(any_metadata()),
            }],
        ))
        .await
        .map(|_| ()),
    ));

    results.push((
        "get_secret_metadata",
        sm.get_secret_metadata(&GetSecretMetadataOptions::new("arbitrary", "s1")).await.map(|_| ()),
    ));
    results.push((
        "update_secret_metadata",
        sm.update_secret_metadata(&UpdateSecretMetadataOptions::new(
            "arbitrary",
            "s1",
            secret_meta,
            vec![SecretMetadata::Arbitrary(ArbitrarySecretMetadata::named("renamed"))],
        ))
        .await
        .map(|_| ()),
    ));

    results.push((
        "get_locks",
        sm.get_locks(&GetLocksOptions::new("arbitrary", "s1").with_limit(2).with_search("app")).await.map(|_| ()),
    ));
    results.push((
        "lock_secret",
        sm.lock_secret(
            &LockSecretOptions::new("arbitrary", "s1", vec![LockSecretBodyLocksItem::new("lock-a")])
                .with_mode(LockMode::Exclusive),
        )
        .await
        .map(|_| ()),
    ));
    results.push((
        "unlock_secret",
        sm.unlock_secret(&UnlockSecretOptions::new("arbitrary", "s1", vec!["lock-a".to_string()]))
            .await
            .map(|_| ()),
    ));
    results.push((
        "get_secret_version_locks",
        sm.get_secret_version_locks(&GetSecretVersionLocksOptions::new("arbitrary", "s1", "v1")).await.map(|_| ()),
    ));
    results.push((
        "lock_secret_version",
        sm.lock_secret_version(
            &LockSecretVersionOptions::new("arbitrary", "s1", "v1", vec![LockSecretBodyLocksItem::new("lock-a")])
                .with_mode(LockMode::ExclusiveDelete),
        )
        .await
        .map(|_| ()),
    ));
    results.push((
        "unlock_secret_version",
        sm.unlock_secret_version(&UnlockSecretVersionOptions::new("arbitrary", "s1", "v1", vec!["lock-a".to_string()]))
            .await
            .map(|_| ()),
    ));
    results.push((
        "list_instance_secrets_locks",
        sm.list_instance_secrets_locks(
            &ListInstanceSecretsLocksOptions::new().with_offset(3).with_groups(vec!["default".to_string()]),
        )
        .await
        .map(|_| ()),
    ));

    results.push((
        "put_policy",
        sm.put_policy(&PutPolicyOptions::new(
            "username_password",
            "s1",
            CollectionMetadata::new(POLICY_TYPE, 1),
            vec![RotationPolicy::Standard(StandardRotationPolicy::new(1, "month"))],
        ))
        .await
        .map(|_| ()),
    ));
    results.push(("get_policy", sm.get_policy(&GetPolicyOptions::new("username_password", "s1")).await.map(|_| ())));

    results.push((
        "put_config",
        sm.put_config(&PutConfigOptions::new(
            "iam_credentials",
            EngineConfig::IamCredentials(IamCredentialsEngineConfig::new("api-key")),
        ))
        .await
        .map(|_| ()),
    ));
    results.push(("get_config", sm.get_config(&GetConfigOptions::new("public_cert")).await.map(|_| ())));
    results.push((
        "create_config_element",
        sm.create_config_element(&CreateConfigElementOptions::new(
            "private_cert",
            "certificate_templates",
            ConfigElementDef::new("tpl", template()),
        ))
        .await
        .map(|_| ()),
    ));
    results.push((
        "get_config_elements",
        sm.get_config_elements(&GetConfigElementsOptions::new("public_cert", "dns_providers")).await.map(|_| ()),
    ));
    results.push((
        "get_config_element",
        sm.get_config_element(&GetConfigElementOptions::new("public_cert", "dns_providers", "cis-1"))
            .await
            .map(|_| ()),
    ));
    results.push((
        "update_config_element",
        sm.update_config_element(&UpdateConfigElementOptions::new(
            "private_cert",
            "certificate_templates",
            "tpl",
            template(),
        ))
        .await
        .map(|_| ()),
    ));
    results.push((
        "delete_config_element",
        sm.delete_config_element(&DeleteConfigElementOptions::new("private_cert", "certificate_templates", "tpl"))
            .await
            .map(|_| ()),
    ));
    results.push((
        "action_on_config_element",
        sm.action_on_config_element(&ActionOnConfigElementOptions::new(
            "private_cert",
            "root_certificate_authorities",
            "root-ca",
            "rotate_crl",
        ))
        .await
        .map(|_| ()),
    ));

    results.push((
        "create_notifications_registration",
        sm.create_notifications_registration(&CreateNotificationsRegistrationOptions::new(
            "crn:v1:bluemix:public:event-notifications:us-south:a/1:2::",
            "sm-source",
        ))
        .await
        .map(|_| ()),
    ));
    results.push((
        "get_notifications_registration",
        sm.get_notifications_registration(&GetNotificationsRegistrationOptions::new()).await.map(|_| ()),
    ));
    results.push((
        "delete_notifications_registration",
        sm.delete_notifications_registration(&DeleteNotificationsRegistrationOptions::new()).await.map(|_| ()),
    ));
    results.push((
        "send_test_notification",
        sm.send_test_notification(&SendTestNotificationOptions::new()).await.map(|_| ()),
    ));

    results
}

/// Asserts `result` failed before I/O and returns the error.
fn preflight<T>(result: Result<T, SdkError>) -> SdkError {
    match result {
        Ok(_) => panic!("expected a pre-flight error"),
        Err(err) => {
            assert!(err.is_preflight(), "not a pre-flight error: {err}");
            err
        }
    }
}

/// Asserts `err` is an invalid-field error naming `field`.
fn assert_invalid(err: &SdkError, expected: &str) {
    match err {
        SdkError::InvalidField {
            field, ..
        } => assert_eq!(field, expected),
        other => panic!("expected invalid {expected}, got {other}"),
    }
}

/// Asserts `err` is a missing-field error naming `field`.
fn assert_missing(err: &SdkError, expected: &str) {
    match err {
        SdkError::MissingField {
            field,
        } => assert_eq!(field, expected),
        other => panic!("expected missing {expected}, got {other}"),
    }
}

// ============================================================================
// SECTION: Shared Guarantees
// ============================================================================

/// Asserts that `execute` with no options fails with `MissingOptions`.
macro_rules! assert_missing_options {
    ($sm:expr; $( $options:ty ),+ $(,)?) => {
        $(
            match $sm.execute::<$options>(None, &CallContext::background()).await {
                Err(SdkError::MissingOptions) => {}
                Err(other) => panic!("{}: unexpected error {other}", stringify!($options)),
                Ok(_) => panic!("{}: call succeeded without options", stringify!($options)),
            }
        )+
    };
}

#[tokio::test]
async fn absent_options_fail_without_io() {
    let transport = ScriptedTransport::new();
    let sm = client(Arc::clone(&transport));

    assert_missing_options!(sm;
        CreateSecretGroupOptions,
        ListSecretGroupsOptions,
        GetSecretGroupOptions,
        UpdateSecretGroupMetadataOptions,
        DeleteSecretGroupOptions,
        CreateSecretOptions,
        ListSecretsOptions,
        ListAllSecretsOptions,
        GetSecretOptions,
        UpdateSecretOptions,
        DeleteSecretOptions,
        ListSecretVersionsOptions,
        GetSecretVersionOptions,
        UpdateSecretVersionOptions,
        GetSecretVersionMetadataOptions,
        UpdateSecretVersionMetadataOptions,
        GetSecretMetadataOptions,
        UpdateSecretMetadataOptions,
        GetLocksOptions,
        LockSecretOptions,
        UnlockSecretOptions,
        GetSecretVersionLocksOptions,
        LockSecretVersionOptions,
        UnlockSecretVersionOptions,
        ListInstanceSecretsLocksOptions,
        PutPolicyOptions,
        GetPolicyOptions,
        PutConfigOptions,
        GetConfigOptions,
        CreateConfigElementOptions,
        GetConfigElementsOptions,
        GetConfigElementOptions,
        UpdateConfigElementOptions,
        DeleteConfigElementOptions,
        ActionOnConfigElementOptions,
        CreateNotificationsRegistrationOptions,
        GetNotificationsRegistrationOptions,
        DeleteNotificationsRegistrationOptions,
        SendTestNotificationOptions,
    );
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn empty_service_url_fails_every_operation_without_io() {
    let transport = ScriptedTransport::new();
    let mut sm = client(Arc::clone(&transport));
    sm.set_service_url("").expect("empty url accepted");

    let results = call_every_operation(&sm).await;
    assert_eq!(results.len(), ROUTES.len());
    for (operation, result) in results {
        let err = preflight(result);
        assert!(matches!(err, SdkError::ServiceUrlMissing), "{operation}: {err}");
        assert!(err.to_string().contains("service URL is empty"), "{operation}");
    }
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn every_operation_routes_to_its_method_path_and_query() {
    let transport = ScriptedTransport::new();
    for _ in 0..ROUTES.len() {
        transport.reply(204, "");
    }
    let sm = client(Arc::clone(&transport));

    let results = call_every_operation(&sm).await;
    for (operation, result) in &results {
        assert!(result.is_ok(), "{operation} failed: {}", result.as_ref().err().map(ToString::to_string).unwrap_or_default());
    }

    let requests = transport.requests();
    assert_eq!(requests.len(), ROUTES.len());
    for (request, (operation, method, route)) in requests.iter().zip(ROUTES) {
        assert_eq!(request.operation, operation);
        assert_eq!(request.method.as_str(), method, "{operation}");
        assert_eq!(path_and_query(request), route, "{operation}");
        let has_body = matches!(method, "POST" | "PUT")
            && !matches!(operation, "update_secret" | "update_secret_version" | "action_on_config_element");
        assert_eq!(request.body.is_some(), has_body, "{operation} body presence");
        let analytics = request.headers.get("x-ibmcloud-sdk-analytics").and_then(|v| v.to_str().ok()).unwrap();
        assert!(analytics.starts_with("service_name=secrets_manager;service_version=V1;operation_id="));
    }
}

#[tokio::test]
async fn malformed_success_body_is_a_decode_error_with_response() {
    let transport = ScriptedTransport::new();
    transport.reply(200, "{not json");
    let sm = client(Arc::clone(&transport));

    let Err(err) = sm.get_secret(&GetSecretOptions::new("arbitrary", "s1")).await else {
        panic!("expected a decode error");
    };
    assert!(matches!(err, SdkError::Decode { .. }));
    assert_eq!(err.status_code(), Some(200));
    assert_eq!(err.response().map(|response| response.raw.as_ref()), Some(&b"{not json"[..]));
}

#[tokio::test]
async fn blank_success_body_yields_no_result() {
    let transport = ScriptedTransport::new();
    transport.reply(200, "");
    let sm = client(Arc::clone(&transport));

    let response = sm.list_secret_groups(&ListSecretGroupsOptions::new()).await.expect("blank body");
    assert!(response.result.is_none());
    assert_eq!(response.response.status_code, 200);
}

#[tokio::test]
async fn error_status_carries_server_message_and_response() {
    let transport = ScriptedTransport::new();
    transport.reply_json(
        404,
        &json!({
            "trace": "trace-1",
            "errors": [{"code": "not_found", "message": "Secret not found"}]
        }),
    );
    let sm = client(Arc::clone(&transport));

    let Err(err) = sm.get_secret(&GetSecretOptions::new("arbitrary", "missing")).await else {
        panic!("expected an http error");
    };
    let SdkError::Http(http) = &err else {
        panic!("expected an http error, got {err}");
    };
    assert_eq!(http.status, 404);
    assert_eq!(http.message, "Secret not found");
    assert_eq!(http.trace.as_deref(), Some("trace-1"));
    assert_eq!(err.status_code(), Some(404));
}

#[tokio::test]
async fn per_call_headers_are_sent() {
    let transport = ScriptedTransport::new();
    transport.reply(204, "");
    let sm = client(Arc::clone(&transport));

    let options = GetSecretGroupOptions::new("g1").with_header("X-Request-Id", "req-7");
    sm.get_secret_group(&options).await.expect("get group");
    let request = transport.last();
    assert_eq!(request.headers.get("x-request-id").and_then(|v| v.to_str().ok()), Some("req-7"));
}

// ============================================================================
// SECTION: Path Parameters
// ============================================================================

#[tokio::test]
async fn empty_path_parameters_are_missing_fields() {
    let transport = ScriptedTransport::new();
    let sm = client(Arc::clone(&transport));

    assert_missing(&preflight(sm.get_secret_group(&GetSecretGroupOptions::new("")).await), "id");
    assert_missing(&preflight(sm.get_secret(&GetSecretOptions::new("", "s1")).await), "secret_type");
    assert_missing(&preflight(sm.get_secret(&GetSecretOptions::new("arbitrary", "")).await), "id");
    assert_missing(
        &preflight(sm.get_secret_version(&GetSecretVersionOptions::new("arbitrary", "s1", "")).await),
        "version_id",
    );
    assert_missing(
        &preflight(sm.delete_config_element(&DeleteConfigElementOptions::new("private_cert", "certificate_templates", "")).await),
        "config_name",
    );
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn unknown_secret_types_are_rejected() {
    let transport = ScriptedTransport::new();
    let sm = client(Arc::clone(&transport));

    assert_invalid(&preflight(sm.get_secret(&GetSecretOptions::new("vault", "s1")).await), "secret_type");
    assert_invalid(&preflight(sm.list_secrets(&ListSecretsOptions::new("ARBITRARY")).await), "secret_type");
    assert_invalid(&preflight(sm.get_config(&GetConfigOptions::new("kv")).await), "secret_type");
    assert_eq!(transport.request_count(), 0);
}

// ============================================================================
// SECTION: Collections
// ============================================================================

#[tokio::test]
async fn paging_bounds_are_enforced() {
    let transport = ScriptedTransport::new();
    let sm = client(Arc::clone(&transport));

    assert_invalid(&preflight(sm.list_secrets(&ListSecretsOptions::new("kv").with_limit(0)).await), "limit");
    assert_invalid(
        &preflight(sm.list_secrets(&ListSecretsOptions::new("kv").with_limit(MAX_LIMIT + 1)).await),
        "limit",
    );
    assert_invalid(&preflight(sm.list_all_secrets(&ListAllSecretsOptions::new().with_offset(-1)).await), "offset");
    assert_invalid(&preflight(sm.get_locks(&GetLocksOptions::new("kv", "s1").with_limit(-5)).await), "limit");
    assert_eq!(transport.request_count(), 0);

    transport.reply(204, "");
    sm.list_secrets(&ListSecretsOptions::new("kv").with_limit(MAX_LIMIT)).await.expect("max limit");
    assert_eq!(path_and_query(&transport.last()), "/api/v1/secrets/kv?limit=5000");
}

#[tokio::test]
async fn sort_field_must_be_known() {
    let transport = ScriptedTransport::new();
    let sm = client(Arc::clone(&transport));

    let err = preflight(sm.list_all_secrets(&ListAllSecretsOptions::new().with_sort_by("payload")).await);
    assert_invalid(&err, "sort_by");
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn empty_collections_are_rejected() {
    let transport = ScriptedTransport::new();
    let sm = client(Arc::clone(&transport));

    let err = preflight(
        sm.create_secret_group(&CreateSecretGroupOptions::new(CollectionMetadata::new(GROUP_TYPE, 0), Vec::new())).await,
    );
    assert_missing(&err, "resources");

    let err = preflight(
        sm.create_secret_group(&CreateSecretGroupOptions::new(
            CollectionMetadata::new("", 1),
            vec![SecretGroupResource::new("group")],
        ))
        .await,
    );
    assert_missing(&err, "metadata.collection_type");

    let err = preflight(
        sm.create_secret_group(&CreateSecretGroupOptions::new(
            CollectionMetadata::new(GROUP_TYPE, 1),
            vec![SecretGroupResource::new("")],
        ))
        .await,
    );
    assert_missing(&err, "name");
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn resource_type_must_match_the_path() {
    let transport = ScriptedTransport::new();
    let sm = client(Arc::clone(&transport));

    let options = CreateSecretOptions::new(
        "kv",
        CollectionMetadata::new(SECRET_TYPE, 1),
        vec![SecretResource::Arbitrary(ArbitrarySecretResource::new("secret", "payload"))],
    );
    assert_invalid(&preflight(sm.create_secret(&options).await), "resources");

    let options = PutPolicyOptions::new(
        "private_cert",
        "s1",
        CollectionMetadata::new(POLICY_TYPE, 1),
        vec![RotationPolicy::Standard(StandardRotationPolicy::new(1, "day"))],
    );
    assert_invalid(&preflight(sm.put_policy(&options).await), "resources");
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn create_secret_sends_the_discriminator() {
    let transport = ScriptedTransport::new();
    transport.reply(204, "");
    let sm = client(Arc::clone(&transport));

    let mut data = Map::new();
    data.insert("user".to_string(), Value::String("admin".to_string()));
    let options = CreateSecretOptions::new(
        "kv",
        CollectionMetadata::new(SECRET_TYPE, 1),
        vec![SecretResource::Kv(KvSecretResource::new("settings", data))],
    );
    sm.create_secret(&options).await.expect("create kv");

    let body = body_json(&transport.last());
    assert_eq!(body["metadata"]["collection_type"], SECRET_TYPE);
    assert_eq!(body["resources"][0]["secret_type"], "kv");
    assert_eq!(body["resources"][0]["name"], "settings");
    assert_eq!(body["resources"][0]["payload"]["user"], "admin");
}

// ============================================================================
// SECTION: Actions
// ============================================================================

#[tokio::test]
async fn secret_actions_must_be_supported_by_the_type() {
    let transport = ScriptedTransport::new();
    let sm = client(Arc::clone(&transport));

    let err = preflight(sm.update_secret(&UpdateSecretOptions::new("arbitrary", "s1", "explode")).await);
    assert_invalid(&err, "action");
    let err = preflight(sm.update_secret(&UpdateSecretOptions::new("arbitrary", "s1", "revoke")).await);
    assert_invalid(&err, "action");
    let err = preflight(sm.update_secret(&UpdateSecretOptions::new("kv", "s1", "delete_credentials")).await);
    assert_invalid(&err, "action");
    let err = preflight(sm.update_secret(&UpdateSecretOptions::new("kv", "s1", "")).await);
    assert_missing(&err, "action");
    assert_eq!(transport.request_count(), 0);

    transport.reply(204, "");
    let options = UpdateSecretOptions::new("kv", "s1", "restore").with_body(SecretAction::Restore(RestoreSecretBody {
        version_id: Some("v0".to_string()),
        ..RestoreSecretBody::default()
    }));
    sm.update_secret(&options).await.expect("restore kv");
    let request = transport.last();
    assert_eq!(path_and_query(&request), "/api/v1/secrets/kv/s1?action=restore");
    assert_eq!(body_json(&request), json!({"version_id": "v0"}));
}

#[tokio::test]
async fn secret_action_bodies_must_match_the_action_pair() {
    let transport = ScriptedTransport::new();
    let sm = client(Arc::clone(&transport));

    let restore = SecretAction::Restore(RestoreSecretBody {
        version_id: Some("v1".to_string()),
        ..RestoreSecretBody::default()
    });
    let err = preflight(sm.update_secret(&UpdateSecretOptions::new("kv", "s1", "rotate").with_body(restore)).await);
    assert_invalid(&err, "body");

    let rotate_arbitrary = SecretAction::RotateArbitrary(RotateArbitrarySecretBody::new("p"));
    let err =
        preflight(sm.update_secret(&UpdateSecretOptions::new("kv", "s1", "rotate").with_body(rotate_arbitrary)).await);
    assert_invalid(&err, "body");

    let rotate_iam = SecretAction::RotateIamCredentials(RotateCustomMetadataBody::default());
    let err =
        preflight(sm.update_secret(&UpdateSecretOptions::new("private_cert", "s1", "rotate").with_body(rotate_iam)).await);
    assert_invalid(&err, "body");
    assert_eq!(transport.request_count(), 0);

    transport.reply(204, "");
    let rotate_private = SecretAction::RotatePrivateCert(RotateCustomMetadataBody::default());
    sm.update_secret(&UpdateSecretOptions::new("private_cert", "s1", "rotate").with_body(rotate_private))
        .await
        .expect("rotate private cert");
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn config_action_bodies_must_match_the_action() {
    let transport = ScriptedTransport::new();
    let sm = client(Arc::clone(&transport));

    let revoke = ConfigAction::Revoke(RevokeAction {
        serial_number: "aa".to_string(),
        ..RevokeAction::default()
    });
    let options =
        ActionOnConfigElementOptions::new("private_cert", "root_certificate_authorities", "ca", "sign_intermediate")
            .with_config(revoke);
    let err = preflight(sm.action_on_config_element(&options).await);
    assert_invalid(&err, "config");

    let sign = ConfigAction::SignCsr(SignCsrAction::new("csr"));
    let options = ActionOnConfigElementOptions::new("private_cert", "root_certificate_authorities", "ca", "rotate_crl")
        .with_config(sign);
    let err = preflight(sm.action_on_config_element(&options).await);
    assert_invalid(&err, "config");
    assert_eq!(transport.request_count(), 0);

    transport.reply(204, "");
    let options = ActionOnConfigElementOptions::new("private_cert", "root_certificate_authorities", "ca", "sign_csr")
        .with_config(ConfigAction::SignCsr(SignCsrAction::new("csr")));
    sm.action_on_config_element(&options).await.expect("sign csr");
    assert_eq!(body_json(&transport.last()), json!({"config": {"csr": "csr"}}));
}

#[tokio::test]
async fn version_revoke_requires_a_certificate() {
    let transport = ScriptedTransport::new();
    let sm = client(Arc::clone(&transport));

    let err = preflight(sm.update_secret_version(&UpdateSecretVersionOptions::new("kv", "s1", "v1", "revoke")).await);
    assert_invalid(&err, "action");
    let err = preflight(sm.update_secret_version(&UpdateSecretVersionOptions::new("public_cert", "s1", "v1", "rotate")).await);
    assert_invalid(&err, "action");
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn config_actions_must_match_the_element() {
    let transport = ScriptedTransport::new();
    let sm = client(Arc::clone(&transport));

    let err = preflight(
        sm.action_on_config_element(&ActionOnConfigElementOptions::new(
            "private_cert",
            "certificate_templates",
            "tpl",
            "sign_csr",
        ))
        .await,
    );
    assert_invalid(&err, "action");
    let err = preflight(
        sm.action_on_config_element(&ActionOnConfigElementOptions::new(
            "private_cert",
            "root_certificate_authorities",
            "root-ca",
            "set_signed",
        ))
        .await,
    );
    assert_invalid(&err, "action");
    let err = preflight(
        sm.action_on_config_element(&ActionOnConfigElementOptions::new(
            "public_cert",
            "root_certificate_authorities",
            "root-ca",
            "revoke",
        ))
        .await,
    );
    assert_invalid(&err, "config_element");
    assert_eq!(transport.request_count(), 0);

    transport.reply(204, "");
    let options = ActionOnConfigElementOptions::new(
        "private_cert",
        "intermediate_certificate_authorities",
        "int-ca",
        "revoke",
    )
    .with_config(ConfigAction::Revoke(RevokeAction {
        serial_number: "d9:be".to_string(),
        ..RevokeAction::default()
    }));
    sm.action_on_config_element(&options).await.expect("revoke");
    assert_eq!(body_json(&transport.last()), json!({"config": {"serial_number": "d9:be"}}));
}

// ============================================================================
// SECTION: Configuration
// ============================================================================

#[tokio::test]
async fn config_elements_must_belong_to_the_engine() {
    let transport = ScriptedTransport::new();
    let sm = client(Arc::clone(&transport));

    let err = preflight(sm.get_config_elements(&GetConfigElementsOptions::new("public_cert", "certificate_templates")).await);
    assert_invalid(&err, "config_element");
    let err = preflight(sm.get_config_elements(&GetConfigElementsOptions::new("private_cert", "templates")).await);
    assert_invalid(&err, "config_element");
    let err = preflight(
        sm.create_config_element(&CreateConfigElementOptions::new(
            "private_cert",
            "root_certificate_authorities",
            ConfigElementDef::new("tpl", template()),
        ))
        .await,
    );
    assert_invalid(&err, "type");
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn config_element_bodies_carry_type_and_config() {
    let transport = ScriptedTransport::new();
    transport.reply(204, "");
    transport.reply(204, "");
    let sm = client(Arc::clone(&transport));

    sm.create_config_element(&CreateConfigElementOptions::new(
        "private_cert",
        "certificate_templates",
        ConfigElementDef::new("tpl", template()),
    ))
    .await
    .expect("create element");
    let body = body_json(&transport.last());
    assert_eq!(body["name"], "tpl");
    assert_eq!(body["type"], "certificate_template");
    assert_eq!(body["config"]["certificate_authority"], "root-ca");

    sm.update_config_element(&UpdateConfigElementOptions::new(
        "private_cert",
        "certificate_templates",
        "tpl",
        template(),
    ))
    .await
    .expect("update element");
    let body = body_json(&transport.last());
    assert!(body.get("name").is_none());
    assert_eq!(body["type"], "certificate_template");
}

#[tokio::test]
async fn public_cert_engine_config_is_read_only() {
    let transport = ScriptedTransport::new();
    let sm = client(Arc::clone(&transport));

    let err = preflight(
        sm.put_config(&PutConfigOptions::new(
            "public_cert",
            EngineConfig::IamCredentials(IamCredentialsEngineConfig::new("api-key")),
        ))
        .await,
    );
    assert_invalid(&err, "secret_type");
    let err = preflight(
        sm.put_config(&PutConfigOptions::new(
            "private_cert",
            EngineConfig::IamCredentials(IamCredentialsEngineConfig::new("api-key")),
        ))
        .await,
    );
    assert_invalid(&err, "config");
    assert_eq!(transport.request_count(), 0);
}

// ============================================================================
// SECTION: Locks and Notifications
// ============================================================================

#[tokio::test]
async fn lock_requests_need_named_locks() {
    let transport = ScriptedTransport::new();
    let sm = client(Arc::clone(&transport));

    let err = preflight(sm.lock_secret(&LockSecretOptions::new("arbitrary", "s1", Vec::new())).await);
    assert_missing(&err, "locks");
    let err = preflight(
        sm.lock_secret(&LockSecretOptions::new("arbitrary", "s1", vec![LockSecretBodyLocksItem::new("")])).await,
    );
    assert_missing(&err, "name");
    let err = preflight(sm.unlock_secret(&UnlockSecretOptions::new("arbitrary", "s1", vec![String::new()])).await);
    assert_missing(&err, "locks");
    assert_eq!(transport.request_count(), 0);

    transport.reply(204, "");
    let lock = LockSecretBodyLocksItem {
        description: Some("held by deploy".to_string()),
        ..LockSecretBodyLocksItem::new("deploy")
    };
    sm.lock_secret(&LockSecretOptions::new("arbitrary", "s1", vec![lock])).await.expect("lock");
    let request = transport.last();
    assert_eq!(path_and_query(&request), "/api/v1/locks/arbitrary/s1/lock");
    assert_eq!(body_json(&request), json!({"locks": [{"name": "deploy", "description": "held by deploy"}]}));
}

#[tokio::test]
async fn notification_registration_requires_crn_and_source() {
    let transport = ScriptedTransport::new();
    let sm = client(Arc::clone(&transport));

    let err = preflight(
        sm.create_notifications_registration(&CreateNotificationsRegistrationOptions::new("", "source")).await,
    );
    assert_missing(&err, "event_notifications_instance_crn");
    let err = preflight(
        sm.create_notifications_registration(&CreateNotificationsRegistrationOptions::new("crn:v1:en", "")).await,
    );
    assert_missing(&err, "event_notifications_source_name");
    assert_eq!(transport.request_count(), 0);

    transport.reply(204, "");
    let options = CreateNotificationsRegistrationOptions::new("crn:v1:en", "sm-source")
        .with_source_description("Secrets Manager events");
    sm.create_notifications_registration(&options).await.expect("register");
    assert_eq!(
        body_json(&transport.last()),
        json!({
            "event_notifications_instance_crn": "crn:v1:en",
            "event_notifications_source_name": "sm-source",
            "event_notifications_source_description": "Secrets Manager events"
        })
    );
}
