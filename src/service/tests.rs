//! Tests for the service layer

use super::*;
use crate::error::Error;
use crate::http::{HttpClient, HttpClientConfig};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ReportRequestClient {
    let http = HttpClient::with_config(HttpClientConfig::builder().no_rate_limit().build()).unwrap();
    ReportRequestClient::new(http, server.uri(), "v2")
}

// ============================================================================
// ReportRequest Tests
// ============================================================================

#[test]
fn test_request_url_puts_api_key_first() {
    let request = ReportRequest::new("advertiser/stats", "find", "KEY")
        .param("fields", "id, created")
        .param("limit", 10u32);

    assert_eq!(
        request
            .url("https://api.mobileapptracking.com/", "v2")
            .unwrap(),
        "https://api.mobileapptracking.com/v2/advertiser/stats/find.json?api_key=KEY&fields=id%2Ccreated&limit=10"
    );
}

#[test]
fn test_request_requires_api_key() {
    let request = ReportRequest::new("export", "download", " ");
    let err = request.query_string().unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { ref name } if name == "api_key"));
}

#[test]
fn test_request_param_opt_and_get() {
    let request = ReportRequest::new("c", "a", "k")
        .param_opt("page", Some(2u32))
        .param_opt::<u32>("limit", None);
    assert_eq!(request.params().len(), 1);
    assert!(request.get("page").is_some());
    assert!(request.get("limit").is_none());
}

#[test]
fn test_request_invalid_base_url() {
    let request = ReportRequest::new("c", "a", "k");
    let err = request.url("not a url", "v2").unwrap_err();
    assert!(matches!(err, Error::InvalidUrl(_)));
}

// ============================================================================
// ReportResponse Tests
// ============================================================================

#[test]
fn test_response_envelope_accessors() {
    let response = ReportResponse::from_json(
        200,
        json!({"status_code": 200, "response_size": "42", "data": {"status": "running"}, "errors": []}),
        "https://h/v2/export/download.json?api_key=***",
    );
    assert_eq!(response.status_code(), Some(200));
    assert_eq!(response.response_size(), Some(42));
    assert_eq!(response.data().unwrap()["status"], "running");
    assert!(!response.has_errors());
    assert!(response.is_success());
}

#[test]
fn test_response_null_data_is_missing() {
    let response = ReportResponse::from_json(200, json!({"data": null}), "u");
    assert!(response.data().is_none());
}

#[test]
fn test_response_errors_detected() {
    let response = ReportResponse::from_json(
        400,
        json!({"errors": [{"message": "bad filter"}]}),
        "u",
    );
    assert!(response.has_errors());
    assert!(response.to_string().contains("bad filter"));
}

// ============================================================================
// ReportRequestClient Tests
// ============================================================================

#[tokio::test]
async fn test_call_success_populates_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/advertiser/stats/count.json"))
        .and(query_param("api_key", "KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status_code": 200,
            "data": 17
        })))
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    let request = ReportRequest::new("advertiser/stats", "count", "KEY");

    assert!(client.call(&request).await.unwrap());
    let response = client.response().unwrap();
    assert_eq!(response.data(), Some(&json!(17)));
    assert!(response.request_url().contains("api_key=***"));
    assert!(!response.request_url().contains("KEY"));
}

#[tokio::test]
async fn test_call_non_200_returns_false_with_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/advertiser/stats/find.json"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status_code": 400,
            "errors": {"message": "Invalid field"}
        })))
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    let request = ReportRequest::new("advertiser/stats", "find", "KEY");

    assert!(!client.call(&request).await.unwrap());
    let response = client.response().unwrap();
    assert_eq!(response.http_code(), 400);
    assert!(response.has_errors());
}

#[tokio::test]
async fn test_unparseable_success_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .send(&ReportRequest::new("export", "download", "KEY"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Decode { .. }));
    assert!(!err.is_service());
    assert!(err.to_string().contains("export/download.json"));
}

#[tokio::test]
async fn test_unparseable_error_body_keeps_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client
        .send(&ReportRequest::new("export", "download", "KEY"))
        .await
        .unwrap();

    assert_eq!(response.http_code(), 502);
    assert!(response.json_body().is_none());
}

#[tokio::test]
async fn test_transport_failure_is_service_error() {
    let http = HttpClient::with_config(
        HttpClientConfig::builder()
            .max_retries(0)
            .no_rate_limit()
            .build(),
    )
    .unwrap();
    let mut client = ReportRequestClient::new(http, "http://127.0.0.1:9", "v2");

    let err = client
        .call(&ReportRequest::new("export", "download", "KEY"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport(_)));
    assert!(err.is_service());
    assert!(client.response().is_none());
}
