//! Workflow test harness.
//!
//! Spawns a real recipe-service on a random port and exposes helpers for
//! driving the orchestrator against it end to end.

use recipe_service::config::RecipeConfig;
use recipe_service::services::providers::{LabelProvider, TextProvider};
use std::sync::Arc;

pub use recipe_service::testing::test_config;

/// Spawn the proxy with the given providers and return its base URL.
pub async fn spawn_recipe_service(
    config: RecipeConfig,
    text_provider: Arc<dyn TextProvider>,
    label_provider: Arc<dyn LabelProvider>,
) -> String {
    let port = recipe_service::testing::spawn_app(config, text_provider, label_provider).await;
    format!("http://localhost:{}", port)
}
