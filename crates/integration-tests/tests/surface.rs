mod harness;

use harness::config::{ConfigBuilder, TEST_API_KEY, TEST_DEPLOYMENT};
use harness::mock_llm::MockLlm;
use harness::server::TestServer;

#[tokio::test]
async fn index_serves_chat_page() {
    let config = ConfigBuilder::new().without_relay().build();
    let server = TestServer::start(config).await.unwrap();

    let resp = server.client().get(server.url("/")).send().await.unwrap();

    assert_eq!(resp.status(), 200);
    let content_type = resp.headers()["content-type"].to_str().unwrap().to_owned();
    assert!(content_type.starts_with("text/html"));
    assert!(resp.text().await.unwrap().contains("/api/chat"));
}

#[tokio::test]
async fn info_reports_deployment() {
    let mock = MockLlm::start().await.unwrap();
    let config = ConfigBuilder::new().with_azure_provider(&mock.azure_endpoint()).build();
    let server = TestServer::start(config).await.unwrap();

    let json: serde_json::Value = server
        .client()
        .get(server.url("/api/info"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(json["service"], "chatrelay");
    assert_eq!(json["deployment"], TEST_DEPLOYMENT);
    assert_eq!(json["status"], "operational");
    assert!(json["capabilities"].is_string());
}

#[tokio::test]
async fn relay_disabled_serves_informational_endpoints_only() {
    let config = ConfigBuilder::new().without_relay().build();
    let server = TestServer::start(config).await.unwrap();

    let (status, json) = server.chat("hello").await;
    assert_eq!(status, 404);
    assert_eq!(json, serde_json::json!({"error": "endpoint not found", "status": "error"}));

    let info: serde_json::Value = server
        .client()
        .get(server.url("/api/info"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(info["deployment"].is_null());
}

#[tokio::test]
async fn unknown_path_is_json_404() {
    let config = ConfigBuilder::new().without_relay().build();
    let server = TestServer::start(config).await.unwrap();

    let resp = server.client().get(server.url("/wp-admin")).send().await.unwrap();

    assert_eq!(resp.status(), 404);
    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json, serde_json::json!({"error": "endpoint not found", "status": "error"}));
}

#[tokio::test]
async fn debug_endpoint_is_disabled_by_default() {
    let mock = MockLlm::start().await.unwrap();
    let config = ConfigBuilder::new().with_azure_provider(&mock.azure_endpoint()).build();
    let server = TestServer::start(config).await.unwrap();

    let resp = server.client().get(server.url("/debug")).send().await.unwrap();

    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn debug_endpoint_hides_secrets() {
    let mock = MockLlm::start().await.unwrap();
    let config = ConfigBuilder::new()
        .with_azure_provider(&mock.azure_endpoint())
        .with_debug()
        .build();
    let server = TestServer::start(config).await.unwrap();

    let resp = server.client().get(server.url("/debug")).send().await.unwrap();

    assert_eq!(resp.status(), 200);
    let body = resp.text().await.unwrap();
    assert!(!body.contains(TEST_API_KEY));

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["relay_enabled"], true);
    assert_eq!(json["provider"], "azure_openai");
    assert_eq!(json["deployment"], TEST_DEPLOYMENT);
    assert_eq!(json["endpoint_host"], "127.0.0.1");
}
