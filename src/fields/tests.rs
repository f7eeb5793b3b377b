//! Tests for field catalogs

use super::*;
use crate::error::Error;
use crate::http::{HttpClient, HttpClientConfig};
use crate::service::ReportRequestClient;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_model() -> serde_json::Value {
    json!({
        "modelName": "Install",
        "fields": [
            {"name": "id", "related": 0, "type": "integer", "fieldDefault": true},
            {"name": "created", "related": 0, "type": "datetime", "fieldDefault": true},
            {"name": "site_id", "related": 0, "type": "integer", "fieldDefault": true},
            {"name": "publisher_id", "related": 0, "type": "integer", "fieldDefault": false},
            {"name": "os_id", "related": 0, "type": "integer", "fieldDefault": true},
            {"name": "_id", "related": 0, "type": "string", "fieldDefault": false},
            {"name": "site", "related": 1, "type": "property", "fieldDefault": false},
            {"name": "site.id", "related": 1, "type": "integer", "fieldDefault": false},
            {"name": "site.name", "related": 1, "type": "string", "fieldDefault": false},
            {"name": "site.package_name", "related": 1, "type": "string", "fieldDefault": false},
            {"name": "publisher", "related": 1, "type": "property", "fieldDefault": false},
            {"name": "publisher.ref", "related": 1, "type": "string", "fieldDefault": false}
        ]
    })
}

fn catalog() -> FieldCatalog {
    let model: ApiModel = serde_json::from_value(api_model()).unwrap();
    FieldCatalog::from_model("advertiser/stats/installs", model)
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(ToString::to_string).collect()
}

fn test_client(server: &MockServer) -> ReportRequestClient {
    let http = HttpClient::with_config(HttpClientConfig::builder().no_rate_limit().build()).unwrap();
    ReportRequestClient::new(http, server.uri(), "v2")
}

// ============================================================================
// FieldSelection Tests
// ============================================================================

#[test]
fn test_field_selection_flags() {
    let selection = FieldSelection::DEFAULT | FieldSelection::MINIMAL;
    assert_eq!(selection.bits(), 5);
    assert!(selection.contains(FieldSelection::DEFAULT));
    assert!(!selection.contains(FieldSelection::RELATED));
    assert!(!FieldSelection::ALL.contains(FieldSelection::ALL));
}

#[test_case("all", 0)]
#[test_case("default", 1)]
#[test_case("default+related", 3)]
#[test_case("Minimal, default", 5)]
#[test_case("recommended", 8)]
fn test_field_selection_parse(input: &str, bits: u8) {
    assert_eq!(input.parse::<FieldSelection>().unwrap().bits(), bits);
}

#[test]
fn test_field_selection_parse_rejects_unknown() {
    assert!("everything".parse::<FieldSelection>().is_err());
}

#[test]
fn test_field_selection_display() {
    assert_eq!(FieldSelection::ALL.to_string(), "all");
    assert_eq!(
        (FieldSelection::DEFAULT | FieldSelection::RELATED).to_string(),
        "default+related"
    );
}

// ============================================================================
// Catalog Construction Tests
// ============================================================================

#[test]
fn test_related_fields_synthesised_from_id_columns() {
    let catalog = catalog();

    assert_eq!(catalog.model_name(), Some("Install"));
    // declared fragments, minus `id`
    assert!(catalog.contains("site.name"));
    assert!(catalog.contains("site.package_name"));
    assert!(!catalog.contains("site.id"));
    assert!(catalog.contains("publisher.ref"));
    // no declared fragments falls back to `.name`
    assert!(catalog.contains("os.name"));
    // `_id` is never expanded
    assert!(!catalog.contains(".name"));
}

#[test]
fn test_synthesised_fields_inherit_id_default() {
    let catalog = catalog();

    let site_name = catalog.get("site.name").unwrap();
    assert!(site_name.related);
    assert!(site_name.default);

    let publisher_ref = catalog.get("publisher.ref").unwrap();
    assert!(publisher_ref.related);
    assert!(!publisher_ref.default);
}

#[test]
fn test_flag_deserialization_accepts_ints_and_bools() {
    let field: ApiField =
        serde_json::from_value(json!({"name": "x", "related": "1", "fieldDefault": 1})).unwrap();
    assert!(field.related);
    assert!(field.field_default);

    let field: ApiField = serde_json::from_value(json!({"name": "y"})).unwrap();
    assert!(!field.related);
    assert!(!field.field_default);
}

// ============================================================================
// Selection Tests
// ============================================================================

#[test]
fn test_select_all_excludes_related() {
    assert_eq!(
        catalog().select(FieldSelection::ALL),
        names(&["_id", "created", "id", "os_id", "publisher_id", "site_id"])
    );
}

#[test]
fn test_select_related_without_default_returns_everything() {
    let all = catalog().select(FieldSelection::RELATED);
    assert_eq!(all.len(), catalog().len());
    let mut sorted = all.clone();
    sorted.sort();
    assert_eq!(all, sorted);
}

#[test]
fn test_select_default() {
    assert_eq!(
        catalog().select(FieldSelection::DEFAULT),
        names(&["created", "id", "os_id", "site_id"])
    );
}

#[test]
fn test_select_default_minimal_narrows_related() {
    assert_eq!(
        catalog().select(FieldSelection::DEFAULT | FieldSelection::MINIMAL),
        names(&["created", "id", "os.name", "os_id", "site.name", "site_id"])
    );
}

#[test]
fn test_select_default_related() {
    assert_eq!(
        catalog().select(FieldSelection::DEFAULT | FieldSelection::RELATED),
        names(&[
            "created",
            "id",
            "os.name",
            "os_id",
            "publisher.ref",
            "site.name",
            "site.package_name",
            "site_id",
        ])
    );
}

// ============================================================================
// Fetch / Cache Tests
// ============================================================================

#[tokio::test]
async fn test_fetch_requests_apidoc() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/apidoc/get_controllers.json"))
        .and(query_param("controllers", "advertiser/stats/installs"))
        .and(query_param("details", "modelName,fields"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status_code": 200,
            "data": [api_model()]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let cache = FieldCatalogCache::new();
    assert!(cache.current().await.is_none());

    let first = cache
        .get_or_fetch(&client, "KEY", "advertiser/stats/installs")
        .await
        .unwrap();
    let second = cache
        .get_or_fetch(&client, "KEY", "advertiser/stats/installs")
        .await
        .unwrap();

    assert_eq!(first.model_name(), Some("Install"));
    assert!(std::sync::Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn test_fetch_non_200_is_service_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = FieldCatalog::fetch(&test_client(&server), "KEY", "advertiser/stats/installs")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Service { status: 503, .. }));
}

#[tokio::test]
async fn test_fetch_empty_data_is_catalog_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    let err = FieldCatalog::fetch(&test_client(&server), "KEY", "advertiser/stats/installs")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Catalog { .. }));
    assert!(err.is_service());
}

#[test_case(json!({"data": [{"modelName": "Install", "fields": []}]}); "empty field list")]
#[test_case(json!({"data": [{"modelName": "Install"}]}); "missing field list")]
#[tokio::test]
async fn test_fetch_model_without_fields_is_catalog_error(body: serde_json::Value) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let err = FieldCatalog::fetch(&test_client(&server), "KEY", "advertiser/stats/installs")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Catalog { ref controller } if controller == "advertiser/stats/installs"));
    assert!(err.is_service());
}

#[tokio::test]
async fn test_refresh_failure_keeps_previous_catalog() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let cache = FieldCatalogCache::new();
    cache.set(catalog()).await;

    let result = cache
        .refresh(&test_client(&server), "KEY", "advertiser/stats/installs")
        .await;

    assert!(result.is_err());
    assert_eq!(cache.current().await.unwrap().model_name(), Some("Install"));
}
