//! Integration tests for the recipe-service health endpoint.

use recipe_service::services::providers::mock::{MockLabelProvider, MockTextProvider};
use recipe_service::testing::{spawn_app, test_config};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn health_check_reports_ok_when_providers_are_healthy() {
    let port = spawn_app(
        test_config(),
        Arc::new(MockTextProvider::new(true)),
        Arc::new(MockLabelProvider::with_labels(vec![])),
    )
    .await;

    let client = Client::new();
    let response = client
        .get(format!("http://localhost:{}/health", port))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "recipe-service");
    assert_eq!(body["providers"]["text"], "ok");
    assert_eq!(body["providers"]["labels"], "ok");
}

#[tokio::test]
async fn health_check_reports_unhealthy_when_a_provider_is_down() {
    let port = spawn_app(
        test_config(),
        Arc::new(MockTextProvider::new(false)),
        Arc::new(MockLabelProvider::with_labels(vec![])),
    )
    .await;

    let response = Client::new()
        .get(format!("http://localhost:{}/health", port))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 503);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "unhealthy");
    assert!(body["providers"]["text"]["error"].is_string());
    assert_eq!(body["providers"]["labels"], "ok");
}
