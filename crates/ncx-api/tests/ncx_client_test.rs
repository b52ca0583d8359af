#![allow(clippy::unwrap_used)]
// Integration tests for `NcxClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ncx_api::{NcxClient, ResourceTarget, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, NcxClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/api/v3", server.uri())).unwrap();
    let token: secrecy::SecretString = "test-token".to_string().into();
    let client = NcxClient::new(base_url, &token, &TransportConfig::default()).unwrap();
    (server, client)
}

// ── Sites ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_exchange_sites_unwraps_data() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/beta/exchange_sites"))
        .and(query_param("filter[name]", "Alpha"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "id": "site-1",
                "type": "exchange_sites",
                "attributes": { "name": "Alpha" },
                "relationships": { "endpoints": { "data": [{ "id": "111", "type": "endpoints" }] } }
            }]
        })))
        .mount(&server)
        .await;

    let sites = client.get_exchange_sites("Alpha").await.unwrap();

    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0]["id"], "site-1");
}

#[tokio::test]
async fn test_get_exchange_sites_error_becomes_string() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/beta/exchange_sites"))
        .respond_with(ResponseTemplate::new(403).set_body_string("subscription required"))
        .mount(&server)
        .await;

    let sites = client.get_exchange_sites("Alpha").await.unwrap();

    assert_eq!(sites, vec![json!("subscription required")]);
}

#[tokio::test]
async fn test_get_exchange_sites_empty() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/beta/exchange_sites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;

    assert!(client.get_exchange_sites("Nope").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_exchange_site() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v3/beta/exchange_sites"))
        .and(header("Content-Type", "application/vnd.api+json"))
        .and(body_partial_json(json!({
            "data": {
                "type": "exchange_sites",
                "attributes": { "name": "Branch-1" },
                "relationships": {
                    "exchange_network": { "data": { "id": "net-1" } },
                    "endpoint": { "data": { "id": "111" } }
                }
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": { "id": "site-9", "type": "exchange_sites" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = client
        .create_exchange_site("Branch-1", "net-1", "111")
        .await
        .unwrap();

    assert_eq!(reply["data"]["id"], "site-9");
}

// ── Resources ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_exchange_resource() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v3/beta/exchange_resources"))
        .and(body_partial_json(json!({
            "data": {
                "type": "exchange_ipsubnet_resources",
                "attributes": { "name": "Alpha LAN 1", "ip": "10.1.1.0/24" },
                "relationships": { "site": { "data": { "id": "site-1" } } }
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": { "id": "res-1" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let target = ResourceTarget::IpSubnet("10.1.1.0/24".into());
    let reply = client
        .create_exchange_resource("site-1", "Alpha LAN 1", &target)
        .await
        .unwrap();

    assert_eq!(reply["data"]["id"], "res-1");
}

#[tokio::test]
async fn test_create_exchange_resource_conflict_returns_text() {
    let (server, client) = setup().await;
    let body = r#"{"errors":[{"code":"overlapping_resource_error","detail":"exists"}]}"#;

    Mock::given(method("POST"))
        .and(path("/api/v3/beta/exchange_resources"))
        .respond_with(ResponseTemplate::new(409).set_body_string(body))
        .mount(&server)
        .await;

    let target = ResourceTarget::Fqdn("app.example.com".into());
    let reply = client
        .create_exchange_resource("site-1", "app", &target)
        .await
        .unwrap();

    assert_eq!(reply, json!(body));
}

#[tokio::test]
async fn test_create_exchange_resource_empty_success_is_null() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v3/beta/exchange_resources"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let target = ResourceTarget::Fqdn("app.example.com".into());
    let reply = client
        .create_exchange_resource("site-1", "app", &target)
        .await
        .unwrap();

    assert!(reply.is_null());
}
