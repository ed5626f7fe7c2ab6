//! End-to-end tests for the request pipeline.
//!
//! These tests run the full merge -> authorize -> encode -> send ->
//! classify cycle against a local mock server and verify both the outgoing
//! wire format and the response classification.

use capture_api::{
    AccessToken, ApiRequest, CaptureClient, CaptureError, ClientCredentials, Params,
    SimpleCredentials,
};
use wiremock::matchers::{body_string_contains, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ok_count_body() -> &'static str {
    r#"{"stat":"ok","total_count":3}"#
}

#[tokio::test]
async fn test_entity_count_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/entity.count"))
        .and(header("Content-Type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("type_name=user"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(ok_count_body(), "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = CaptureClient::new(server.uri(), None);
    client.params_mut().set("type_name", "user");

    let payload = client
        .execute(ApiRequest::builder("entity.count").build())
        .await
        .unwrap();

    assert_eq!(payload["total_count"], 3);
}

#[tokio::test]
async fn test_call_level_params_override_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/entity.find"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(r#"{"stat":"ok","results":[]}"#, "text/json"),
        )
        .mount(&server)
        .await;

    let mut client = CaptureClient::new(server.uri(), None);
    client.params_mut().set("max_results", 10_i64);
    client.params_mut().set("type_name", "user");

    client
        .call("entity.find", Params::new().with("max_results", 50_i64))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8(requests[0].body.clone()).unwrap();
    assert!(body.contains("max_results=50"));
    assert!(!body.contains("max_results=10"));
    assert!(body.contains("type_name=user"));
}

#[tokio::test]
async fn test_error_envelope_becomes_remote_error() {
    let server = MockServer::start().await;
    let body = r#"{"stat":"error","code":400,"error":"invalid_request","error_description":"bad filter","request_id":"req-1"}"#;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
        .mount(&server)
        .await;

    let client = CaptureClient::new(server.uri(), None);
    let err = client
        .call("entity.find", Params::new())
        .await
        .unwrap_err();

    match err {
        CaptureError::Remote(remote) => {
            assert_eq!(remote.kind, "invalid_request");
            assert_eq!(remote.code, 400);
            assert_eq!(remote.request_id.as_deref(), Some("req-1"));
            let message = remote.to_string();
            assert!(message.contains("invalid_request"));
            assert!(message.contains("bad filter"));
        }
        other => panic!("expected Remote, got {other:?}"),
    }
}

#[tokio::test]
async fn test_html_response_is_content_type_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html>oops</html>", "text/html"))
        .mount(&server)
        .await;

    let client = CaptureClient::new(server.uri(), None);
    let err = client.call("entity", Params::new()).await.unwrap_err();

    match err {
        CaptureError::ContentType(content) => {
            assert_eq!(content.response.body, b"<html>oops</html>");
            assert!(content.to_string().contains("text/html"));
        }
        other => panic!("expected ContentType, got {other:?}"),
    }
}

#[tokio::test]
async fn test_json_with_charset_parameter_still_classifies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(ok_count_body(), "application/json; charset=UTF-8"),
        )
        .mount(&server)
        .await;

    let client = CaptureClient::new(server.uri(), None);
    let payload = client.call("entity.count", Params::new()).await.unwrap();
    assert_eq!(payload["total_count"], 3);
}

#[tokio::test]
async fn test_malformed_json_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{not json", "application/json"))
        .mount(&server)
        .await;

    let client = CaptureClient::new(server.uri(), None);
    let err = client.call("entity", Params::new()).await.unwrap_err();

    match err {
        CaptureError::Decode(decode) => {
            assert_eq!(decode.response.body, b"{not json");
        }
        other => panic!("expected Decode, got {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_failure_is_transport_error() {
    // Port 9 (discard) is unassigned on the loopback in the test
    // environment, so the connection is refused.
    let client = CaptureClient::new("http://127.0.0.1:9", None);
    let err = client.call("entity", Params::new()).await.unwrap_err();
    assert!(matches!(err, CaptureError::Transport(_)));
}

#[tokio::test]
async fn test_access_token_header_on_the_wire() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("Authorization", "OAuth tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(ok_count_body(), "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let client = CaptureClient::new(
        server.uri(),
        Some(Box::new(AccessToken::new("tok-123"))),
    );
    client.call("entity.count", Params::new()).await.unwrap();
}

#[tokio::test]
async fn test_auth_override_replaces_client_default() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("Authorization", "OAuth override-token"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(ok_count_body(), "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let client = CaptureClient::new(
        server.uri(),
        Some(Box::new(AccessToken::new("default-token"))),
    );
    client
        .execute(
            ApiRequest::builder("entity.count")
                .auth(AccessToken::new("override-token"))
                .build(),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_signed_request_carries_date_and_signature() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/entity.count"))
        .and(header_exists("Date"))
        .and(header_exists("Authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(ok_count_body(), "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let creds = ClientCredentials::new("myid", "mysecret");
    let client = CaptureClient::new(server.uri(), Some(Box::new(creds)));
    client
        .call("entity.count", Params::new().with("type_name", "user"))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let auth = requests[0]
        .headers
        .iter()
        .find(|(name, _)| name.as_str().eq_ignore_ascii_case("authorization"))
        .map(|(_, values)| values.last().to_string())
        .unwrap();
    assert!(auth.starts_with("Signature myid:"));
}

#[tokio::test]
async fn test_simple_credentials_land_in_form_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("client_id=myid"))
        .and(body_string_contains("client_secret=mysecret"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(ok_count_body(), "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let creds = SimpleCredentials::new("myid", "mysecret");
    let client = CaptureClient::new(server.uri(), Some(Box::new(creds)));
    client.call("entity.count", Params::new()).await.unwrap();
}

#[tokio::test]
async fn test_method_with_leading_slash_hits_same_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/entity.count"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(ok_count_body(), "application/json"))
        .expect(2)
        .mount(&server)
        .await;

    let client = CaptureClient::new(server.uri(), None);
    client.call("entity.count", Params::new()).await.unwrap();
    client.call("/entity.count", Params::new()).await.unwrap();
}

#[tokio::test]
async fn test_call_level_headers_reach_the_wire() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("X-Request-Tag", "nightly-sync"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(ok_count_body(), "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let client = CaptureClient::new(server.uri(), None);
    client
        .execute(
            ApiRequest::builder("entity.count")
                .header("X-Request-Tag", "nightly-sync")
                .build(),
        )
        .await
        .unwrap();
}
