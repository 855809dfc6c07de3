//! Integration tests for the Courier HTTP client

use courier_http::client::policy::{FALLBACK_NOTICE, SERVER_ERROR_NOTICE, UNAUTHORIZED_NOTICE};
use courier_http::{
    ApiClient, ClientError, MemoryNotifier, Notification, RequestDescriptor, SharedToken,
    StaticToken,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn client_with(
    server: &MockServer,
    token: Option<&str>,
) -> (ApiClient, Arc<MemoryNotifier>) {
    init_tracing();
    let notifier = Arc::new(MemoryNotifier::new());
    let mut builder = ApiClient::builder()
        .base_url(server.uri())
        .notifier(notifier.clone());
    if let Some(token) = token {
        builder = builder.credentials(StaticToken::new(token));
    }
    (builder.build().unwrap(), notifier)
}

#[tokio::test]
async fn test_get_returns_payload_only() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/items"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": 1}))
                .insert_header("x-request-id", "abc"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, notifier) = client_with(&mock_server, None);

    let payload = client
        .make_request(RequestDescriptor::get("/items"))
        .await
        .unwrap();

    assert_eq!(payload, json!({"id": 1}));
    assert!(notifier.notifications().is_empty());
}

#[tokio::test]
async fn test_bearer_token_attached() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "ada"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, _) = client_with(&mock_server, Some("test-token"));

    let payload = client.make_request(RequestDescriptor::get("/me")).await;
    assert_eq!(payload.unwrap()["name"], "ada");
}

#[tokio::test]
async fn test_stored_token_overrides_caller_authorization() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock_server)
        .await;

    let (client, _) = client_with(&mock_server, Some("stored"));

    client
        .make_request(RequestDescriptor::get("/me").header("Authorization", "Basic dXNlcjpwdw=="))
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let values: Vec<_> = requests[0].headers.get_all("authorization").iter().collect();
    assert_eq!(values.len(), 1);
    assert_eq!(values[0], "Bearer stored");
}

#[tokio::test]
async fn test_request_without_credential_is_unauthenticated() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/public"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, _) = client_with(&mock_server, None);

    let payload = client
        .make_request(RequestDescriptor::get("/public"))
        .await
        .unwrap();
    assert_eq!(payload, json!([]));

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_shared_token_is_read_per_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock_server)
        .await;

    let token = SharedToken::new();
    let client = ApiClient::builder()
        .base_url(mock_server.uri())
        .credentials(token.clone())
        .build()
        .unwrap();

    client.make_request(RequestDescriptor::get("/me")).await.unwrap();
    token.set("fresh");
    client.make_request(RequestDescriptor::get("/me")).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
    assert_eq!(
        requests[1].headers.get("authorization").unwrap(),
        "Bearer fresh"
    );
}

#[tokio::test]
async fn test_params_headers_and_body_are_forwarded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/items"))
        .and(query_param("page", "2"))
        .and(header("x-client", "courier-tests"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"name": "widget"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 7})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, notifier) = client_with(&mock_server, None);

    let payload = client
        .make_request(
            RequestDescriptor::post("/items")
                .param("page", "2")
                .header("X-Client", "courier-tests")
                .data(json!({"name": "widget"}))
                .success_toast("Item created"),
        )
        .await
        .unwrap();

    assert_eq!(payload, json!({"id": 7}));
    assert_eq!(
        notifier.notifications(),
        vec![Notification::success("Item created")]
    );
}

#[tokio::test]
async fn test_login_unauthorized_emits_two_notifications() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "bad password"})))
        .mount(&mock_server)
        .await;

    let (client, notifier) = client_with(&mock_server, None);

    let result = client
        .make_request(RequestDescriptor::post("/login").error_toast("Login failed"))
        .await;

    let err = result.unwrap_err();
    assert!(err.is_auth_expired());
    assert_eq!(err.server_message(), Some("bad password"));
    assert_eq!(
        notifier.notifications(),
        vec![
            Notification::error(UNAUTHORIZED_NOTICE),
            Notification::error("Login failed"),
        ]
    );
}

#[tokio::test]
async fn test_server_error_notification() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/report"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"message": "maintenance"})))
        .mount(&mock_server)
        .await;

    let (client, notifier) = client_with(&mock_server, Some("t"));

    let err = client
        .make_request(RequestDescriptor::get("/report"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::ServerError { .. }));
    assert_eq!(err.status().map(|s| s.as_u16()), Some(503));
    assert_eq!(
        notifier.notifications(),
        vec![Notification::error(SERVER_ERROR_NOTICE)]
    );
}

#[tokio::test]
async fn test_client_error_uses_server_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "error": "unprocessable_entity",
            "message": "Email already taken"
        })))
        .mount(&mock_server)
        .await;

    let (client, notifier) = client_with(&mock_server, None);

    let err = client
        .make_request(RequestDescriptor::post("/users").data(json!({"email": "a@b.c"})))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::ClientStatus { .. }));
    assert_eq!(
        notifier.notifications(),
        vec![Notification::error("Email already taken")]
    );
}

#[tokio::test]
async fn test_client_error_without_message_uses_fallback() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/items/9"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&mock_server)
        .await;

    let (client, notifier) = client_with(&mock_server, None);

    let err = client
        .make_request(RequestDescriptor::delete("/items/9"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::NotFound { ref message } if message == "Not Found"));
    assert_eq!(
        notifier.notifications(),
        vec![Notification::error(FALLBACK_NOTICE)]
    );
}

#[tokio::test]
async fn test_network_failure_has_no_status_notification() {
    // Bind and release a port so nothing is listening on it
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    init_tracing();
    let notifier = Arc::new(MemoryNotifier::new());
    let client = ApiClient::builder()
        .base_url(uri)
        .notifier(notifier.clone())
        .build()
        .unwrap();

    let err = client
        .make_request(RequestDescriptor::get("/items").error_toast("Could not load items"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Request(_)));
    assert_eq!(err.status(), None);
    assert_eq!(
        notifier.notifications(),
        vec![Notification::error("Could not load items")]
    );
}

#[tokio::test]
async fn test_timeout_propagates_without_notification() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let notifier = Arc::new(MemoryNotifier::new());
    let client = ApiClient::builder()
        .base_url(mock_server.uri())
        .timeout(Duration::from_millis(200))
        .notifier(notifier.clone())
        .build()
        .unwrap();

    let err = client
        .make_request(RequestDescriptor::get("/slow"))
        .await
        .unwrap_err();

    assert!(err.is_timeout());
    assert!(notifier.notifications().is_empty());
}

#[tokio::test]
async fn test_non_json_and_empty_payloads() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/items/1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let (client, _) = client_with(&mock_server, None);

    let health = client
        .make_request(RequestDescriptor::get("/health"))
        .await
        .unwrap();
    assert_eq!(health, json!("ok"));

    let deleted = client
        .make_request(RequestDescriptor::delete("/items/1"))
        .await
        .unwrap();
    assert!(deleted.is_null());
}

#[tokio::test]
async fn test_typed_payload() {
    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: u32,
        name: String,
    }

    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/items/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 3, "name": "bolt"})))
        .mount(&mock_server)
        .await;

    let (client, notifier) = client_with(&mock_server, None);

    let item: Item = client
        .make_request_as(
            RequestDescriptor::get("/items/3")
                .success_toast("Loaded")
                .error_toast("Load failed"),
        )
        .await
        .unwrap();
    assert_eq!(
        item,
        Item {
            id: 3,
            name: "bolt".into()
        }
    );

    assert_eq!(notifier.take(), vec![Notification::success("Loaded")]);

    // A payload of the wrong shape is a failed call
    let mismatch = client
        .make_request_as::<Vec<Item>>(
            RequestDescriptor::get("/items/3")
                .success_toast("Loaded")
                .error_toast("Load failed"),
        )
        .await;
    assert!(matches!(mismatch, Err(ClientError::Serialization(_))));
    assert_eq!(notifier.take(), vec![Notification::error("Load failed")]);
}

#[tokio::test]
async fn test_invalid_header_is_rejected_before_dispatch() {
    let mock_server = MockServer::start().await;
    let (client, notifier) = client_with(&mock_server, None);

    let err = client
        .make_request(
            RequestDescriptor::get("/items")
                .header("bad header", "x")
                .error_toast("Request failed"),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::InvalidRequest(_)));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
    assert_eq!(
        notifier.notifications(),
        vec![Notification::error("Request failed")]
    );
}
