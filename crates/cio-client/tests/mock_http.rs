//! Mock HTTP server tests for `CioClient::execute()`.
//!
//! Uses [`wiremock`] to stand up a local server in place of the API, so the
//! full sign → send → interpret path runs without network access.
//!
//! Coverage:
//! - GET parameters in the query string, no body
//! - POST parameters as a form body
//! - OAuth `Authorization` header on every request
//! - Non-2xx mapped to `ClientError::Server`
//! - Timeouts before the headers and mid-body both map to `Timeout`
//! - Array, string and raw response shapes
//! - Shape mismatch reported as `InvalidResponse`
//! - Retry re-signs with a fresh nonce
//! - Connect-token handshake end to end

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{body_string, header, header_regex, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use cio_client::{
    AuthState, CioClient, ClientConfig, ClientError, CredentialStore, Credentials, EmailProvider,
    MemoryCredentialStore, MessageParams, Params, ReqwestTransport, RetryConfig, ThreadParams,
};

fn mock_config(server_url: &str) -> ClientConfig {
    ClientConfig {
        base_url: server_url.into(),
        timeout_secs: Some(5),
        ..ClientConfig::default()
    }
}

fn authorized_client(server: &MockServer) -> CioClient {
    let credentials = Credentials::new("ck", "cs")
        .with_token("tok", "tsec")
        .with_account_id("acc-1");
    CioClient::new(mock_config(&server.uri()), credentials).unwrap()
}

fn header_value(request: &Request, name: &str) -> String {
    request
        .headers
        .get(name)
        .map(|v| v.to_str().unwrap().to_string())
        .unwrap_or_default()
}

fn oauth_field(authorization: &str, field: &str) -> String {
    let marker = format!("{field}=\"");
    let start = authorization.find(&marker).unwrap() + marker.len();
    let end = authorization[start..].find('"').unwrap() + start;
    authorization[start..end].to_string()
}

// ── Request construction on the wire ──────────────────────────────────

#[tokio::test]
async fn get_message_sends_query_and_oauth_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2.0/accounts/acc-1/messages/X"))
        .and(header_regex("Authorization", r#"^OAuth oauth_consumer_key="ck", "#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message_id": "X",
            "subject": "hello"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = authorized_client(&server);
    let params = MessageParams {
        thread: ThreadParams {
            include_body: Some(true),
            limit: Some(20),
            ..ThreadParams::default()
        },
        ..MessageParams::default()
    };
    let request = client.get_message("X", &params).unwrap();
    let response = client.execute(&request).await.unwrap();

    let message = response.as_dictionary().unwrap();
    assert_eq!(message["subject"], "hello");

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].url.query(), Some("include_body=1&limit=20"));
    assert!(received[0].body.is_empty());

    let auth = header_value(&received[0], "authorization");
    assert_eq!(oauth_field(&auth, "oauth_token"), "tok");
    assert_eq!(oauth_field(&auth, "oauth_signature_method"), "HMAC-SHA1");
    assert!(!oauth_field(&auth, "oauth_signature").is_empty());
}

#[tokio::test]
async fn post_sends_form_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/2.0/accounts/acc-1"))
        .and(header("Content-Type", "application/x-www-form-urlencoded"))
        .and(body_string("first_name=Ada%20Marie"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = authorized_client(&server);
    let request = client.update_account(Some("Ada Marie"), None).unwrap();
    let response = client.execute(&request).await.unwrap();
    assert_eq!(response.as_dictionary().unwrap()["success"], true);

    let received = server.received_requests().await.unwrap();
    assert_eq!(received[0].url.query(), None);
}

#[tokio::test]
async fn folder_path_keeps_hierarchy_on_the_wire() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/2.0/accounts/acc-1/sources/0/folders/base%20folder/my%20folder"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = authorized_client(&server);
    let request = client.create_folder("base folder/my folder", "0", None).unwrap();
    client.execute(&request).await.unwrap();
}

// ── Response shapes ────────────────────────────────────────────────────

#[tokio::test]
async fn array_shape() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2.0/accounts/acc-1/email_addresses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"email": "a@example.com", "primary": 1},
            {"email": "b@example.com", "primary": 0}
        ])))
        .mount(&server)
        .await;

    let client = authorized_client(&server);
    let response = client
        .execute(&client.get_email_addresses().unwrap())
        .await
        .unwrap();
    assert_eq!(response.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn string_shape_for_raw_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2.0/accounts/acc-1/messages/m1/headers"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Subject: hi\r\nFrom: a@b.c\r\n"))
        .mount(&server)
        .await;

    let client = authorized_client(&server);
    let response = client
        .execute(&client.get_message_raw_headers("m1").unwrap())
        .await
        .unwrap();
    assert!(response.as_str().unwrap().starts_with("Subject: hi"));

    let received = server.received_requests().await.unwrap();
    assert_eq!(received[0].url.query(), Some("raw=1"));
}

#[tokio::test]
async fn raw_shape_for_file_download() {
    let server = MockServer::start().await;
    let bytes: Vec<u8> = vec![0x25, 0x50, 0x44, 0x46, 0x00, 0xff];

    Mock::given(method("GET"))
        .and(path("/2.0/accounts/acc-1/files/f1/content"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes.clone()))
        .mount(&server)
        .await;

    let client = authorized_client(&server);
    let response = client
        .execute(&client.download_file_content("f1").unwrap())
        .await
        .unwrap();
    assert_eq!(response.as_bytes().unwrap(), bytes.as_slice());
}

#[tokio::test]
async fn shape_mismatch_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2.0/accounts/acc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2, 3])))
        .mount(&server)
        .await;

    let client = authorized_client(&server);
    let err = client
        .execute(&client.get_account().unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidResponse(_)));
}

// ── Errors ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn not_found_maps_to_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2.0/accounts/acc-1/files/missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"type": "error", "value": "no file"})),
        )
        .mount(&server)
        .await;

    let client = authorized_client(&server);
    let err = client
        .execute(&client.get_file("missing").unwrap())
        .await
        .unwrap_err();
    match err {
        ClientError::Server { status, body } => {
            assert_eq!(status, 404);
            assert!(body.contains("no file"));
        }
        other => panic!("expected Server error, got: {other}"),
    }
}

#[tokio::test]
async fn unauthorized_is_auth_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2.0/accounts/acc-1/sync"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid signature"))
        .mount(&server)
        .await;

    let client = authorized_client(&server);
    let err = client
        .execute(&client.get_sync_status().unwrap())
        .await
        .unwrap_err();
    assert!(err.is_auth_rejected());
}

// ── Retry ──────────────────────────────────────────────────────────────

fn short_timeout(client: CioClient) -> CioClient {
    let transport = ReqwestTransport::new(Duration::from_millis(300), "cio-test").unwrap();
    client.with_transport(Arc::new(transport))
}

#[tokio::test]
async fn slow_headers_time_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2.0/accounts/acc-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": "acc-1"}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = short_timeout(authorized_client(&server));
    let d = client.get_account().unwrap();
    let err = client.execute(&d).await.unwrap_err();
    assert!(matches!(err, ClientError::Timeout), "got {err:?}");
}

#[tokio::test]
async fn stalled_body_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = socket.read(&mut buf).await;
        socket
            .write_all(
                b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\
                  Content-Length: 100\r\n\r\n{\"id\":",
            )
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_secs(3)).await;
    });

    let credentials = Credentials::new("ck", "cs")
        .with_token("tok", "tsec")
        .with_account_id("acc-1");
    let client = short_timeout(
        CioClient::new(mock_config(&format!("http://{addr}")), credentials).unwrap(),
    );
    let d = client.get_account().unwrap();
    let err = client.execute(&d).await.unwrap_err();
    assert!(matches!(err, ClientError::Timeout), "got {err:?}");
}

#[tokio::test]
async fn retry_resigns_each_attempt() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2.0/accounts/acc-1/threads"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/2.0/accounts/acc-1/threads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = authorized_client(&server);
    let retry = RetryConfig {
        max_retries: 2,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
        jitter_fraction: 0.0,
    };
    let request = client.get_threads(&Params::new()).unwrap();
    let response = client.execute_with_retry(&request, &retry).await.unwrap();
    assert!(response.as_array().unwrap().is_empty());

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 2);
    let first = oauth_field(&header_value(&received[0], "authorization"), "oauth_nonce");
    let second = oauth_field(&header_value(&received[1], "authorization"), "oauth_nonce");
    assert_ne!(first, second);
}

#[tokio::test]
async fn retry_gives_up_on_client_errors() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/2.0/accounts/acc-1/webhooks/wh1"))
        .respond_with(ResponseTemplate::new(400))
        .expect(1)
        .mount(&server)
        .await;

    let client = authorized_client(&server);
    let retry = RetryConfig {
        base_delay: Duration::from_millis(1),
        ..RetryConfig::default()
    };
    let err = client
        .execute_with_retry(&client.delete_webhook("wh1").unwrap(), &retry)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
}

// ── Connect-token handshake ────────────────────────────────────────────

#[tokio::test]
async fn connect_token_handshake() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/2.0/connect_tokens"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "token": "ctok",
            "browser_redirect_url": "https://connect.example.com/ctok",
            "access_token": "tmp",
            "access_token_secret": "tmpsec"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/2.0/connect_tokens/ctok"))
        .and(header_regex("Authorization", r#"oauth_token="tmp""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "ctok",
            "access_token": "final",
            "access_token_secret": "finalsec",
            "account": { "id": "acc-new", "email_addresses": ["me@gmail.com"] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryCredentialStore::new());
    let mut client = CioClient::new(mock_config(&server.uri()), Credentials::new("ck", "cs"))
        .unwrap()
        .with_store(store.clone());

    let begin = client.begin_auth(EmailProvider::Gmail, "myapp://done", &Params::new());
    assert_eq!(client.auth_state(), AuthState::PendingToken);
    let created = client.execute(&begin).await.unwrap().into_value();
    let redirect = client.redirect_url_from_response(&created);
    assert_eq!(redirect.as_deref(), Some("https://connect.example.com/ctok"));

    let lookup = client.fetch_account_with_connect_token("ctok");
    let account = client.execute(&lookup).await.unwrap().into_value();
    assert!(client.complete_login(&account, true).unwrap());

    assert!(client.is_authorized());
    assert_eq!(client.account_id(), Some("acc-new"));
    assert_eq!(client.credentials().token.as_deref(), Some("final"));

    let saved = store.load("ck").unwrap().unwrap();
    assert_eq!(saved.token_secret, "finalsec");
    assert_eq!(saved.account_id, "acc-new");

    client.clear_credentials().unwrap();
    assert!(!client.is_authorized());
    assert!(store.load("ck").unwrap().is_none());
}
