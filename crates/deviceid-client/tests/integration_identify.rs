#![allow(clippy::expect_used, reason = "integration test — panics are the assertion mechanism")]

use std::sync::Arc;

use deviceid_client::{ClientConfig, ClientError, IdentityClient};
use deviceid_core::{
    FakeDeviceInfo, MemorySecretStore, ProfileCollector, SecretStore, TOKEN_ACCOUNT, TOKEN_SERVICE,
};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_profile() -> deviceid_types::DeviceProfile {
    let provider = FakeDeviceInfo::sample();
    let store = MemorySecretStore::new();
    ProfileCollector::new(&provider, &store).collect()
}

fn test_client(server: &MockServer) -> IdentityClient {
    IdentityClient::new(ClientConfig::for_base_url(&server.uri()), test_profile())
        .expect("client construction")
}

fn identification_body(request_id: &str) -> serde_json::Value {
    serde_json::json!({
        "visit_id": "v-001",
        "device_id": "d-001",
        "device_found": true,
        "unique": 0.87,
        "os": "iOS",
        "os_version": "16.4",
        "threat": 12,
        "violation": {"tempered": false, "confidence": 0.02},
        "blocked": false,
        "first_seen": "2023-06-13T00:00:00Z",
        "last_seen": "2023-06-14T00:00:00Z",
        "ip": "203.0.113.7",
        "request_id": request_id,
        "data": ""
    })
}

#[tokio::test]
async fn test_authenticate_then_identify_sends_bearer_token() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("POST"))
        .and(path("/load"))
        .and(header("Content-Type", "text/plain"))
        .respond_with(ResponseTemplate::new(200).set_body_string("tok123"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/ios"))
        .and(header("Authorization", "Bearer tok123"))
        .and(header("Content-Type", "text/plain"))
        .respond_with(ResponseTemplate::new(200).set_body_json(identification_body("")))
        .expect(1)
        .mount(&server)
        .await;

    let token = client.authenticate("key", "secret").await.expect("authenticate");
    assert_eq!(token, "tok123");
    assert_eq!(client.session_token(), "tok123");

    let result = client.identify(None, None).await.expect("identify");
    assert_eq!(result.visit_id, "v-001");
    assert_eq!(result.threat, 12);
    assert!(!result.violation.tampered);
}

#[tokio::test]
async fn test_authenticate_sends_credentials_payload() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("POST"))
        .and(path("/load"))
        .and(body_partial_json(serde_json::json!({"key": "key", "secret": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_string("tok123"))
        .expect(1)
        .mount(&server)
        .await;

    client.authenticate("key", "secret").await.expect("authenticate");
}

#[tokio::test]
async fn test_authenticate_non_2xx_is_typed_and_keeps_token() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    {
        let _guard = Mock::given(method("POST"))
            .and(path("/load"))
            .respond_with(ResponseTemplate::new(200).set_body_string("tok123"))
            .expect(1)
            .mount_as_scoped(&server)
            .await;

        client.authenticate("key", "secret").await.expect("authenticate");
        assert_eq!(client.session_token(), "tok123");
    }

    Mock::given(method("POST"))
        .and(path("/load"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .mount(&server)
        .await;

    let err = client.authenticate("key", "bad-secret").await.expect_err("should fail");
    match err {
        ClientError::HttpStatus { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "unauthorized");
        },
        other => panic!("expected HttpStatus, got {other:?}"),
    }
    // The previously stored token survives the failed attempt.
    assert_eq!(client.session_token(), "tok123");
}

#[tokio::test]
async fn test_identify_without_authenticate_sends_empty_bearer() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    // The client sends "Bearer " with an empty token; HTTP parsing strips
    // the trailing whitespace, so the observed value is bare "Bearer".
    // Explicit behavior, not an error.
    Mock::given(method("POST"))
        .and(path("/ios"))
        .and(header("Authorization", "Bearer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(identification_body("")))
        .expect(1)
        .mount(&server)
        .await;

    client.identify(None, None).await.expect("identify without auth");

    let requests = server.received_requests().await.expect("recorded requests");
    let auth = requests[0].headers.get("Authorization").expect("authorization header");
    let token = auth.to_str().expect("ascii header").trim_start_matches("Bearer").trim();
    assert_eq!(token, "", "bearer token must be empty before authenticate");
}

#[tokio::test]
async fn test_identify_echoes_request_id() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("POST"))
        .and(path("/ios"))
        .and(body_partial_json(serde_json::json!({
            "request_id": "req-42",
            "data": "checkout",
            "vendorID": "550e8400-e29b-41d4-a716-446655440000"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(identification_body("req-42")))
        .expect(1)
        .mount(&server)
        .await;

    let result = client.identify(Some("checkout"), Some("req-42")).await.expect("identify");
    assert_eq!(result.request_id, "req-42");
}

#[tokio::test]
async fn test_identify_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("POST"))
        .and(path("/ios"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&server)
        .await;

    let err = client.identify(None, None).await.expect_err("should fail");
    assert!(matches!(err, ClientError::Decode(_)), "expected Decode, got {err:?}");
}

#[tokio::test]
async fn test_identify_http_error_carries_status() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("POST"))
        .and(path("/ios"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down"))
        .mount(&server)
        .await;

    let err = client.identify(None, None).await.expect_err("should fail");
    match err {
        ClientError::HttpStatus { status, .. } => assert_eq!(status, 503),
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_transport_failure_is_network_error() {
    // Nothing listens here; connection is refused before any status.
    let config = ClientConfig::for_base_url("http://127.0.0.1:1");
    let client = IdentityClient::new(config, test_profile()).expect("client construction");

    let err = client.authenticate("key", "secret").await.expect_err("should fail");
    assert!(matches!(err, ClientError::Network(_)), "expected Network, got {err:?}");
}

#[tokio::test]
async fn test_authenticate_persists_token_for_next_collect() {
    let server = MockServer::start().await;
    let store = Arc::new(MemorySecretStore::new());

    let client = IdentityClient::new(ClientConfig::for_base_url(&server.uri()), test_profile())
        .expect("client construction")
        .with_secret_store(store.clone());

    Mock::given(method("POST"))
        .and(path("/load"))
        .respond_with(ResponseTemplate::new(200).set_body_string("tok123"))
        .mount(&server)
        .await;

    client.authenticate("key", "secret").await.expect("authenticate");
    assert_eq!(store.get(TOKEN_SERVICE, TOKEN_ACCOUNT).expect("stored token"), b"tok123");

    // A later snapshot against the same store picks the token up as `saved`.
    let provider = FakeDeviceInfo::sample();
    let profile = ProfileCollector::new(&provider, store.as_ref()).collect();
    assert_eq!(profile.saved, "tok123");
}
