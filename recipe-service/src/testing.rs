//! Test support shared by this crate's integration tests and the workflow
//! test crate.

use crate::config::{GoogleConfig, RecipeConfig, ServiceAccountKey, VisionConfig};
use crate::services::providers::{LabelProvider, TextProvider};
use crate::startup::Application;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Build a config bound to a random port with a unique staging directory.
///
/// Constructed directly rather than via `RecipeConfig::load()` so parallel
/// tests never race on process environment variables.
pub fn test_config() -> RecipeConfig {
    RecipeConfig {
        common: service_core::config::Config { port: 0 },
        google: GoogleConfig {
            api_key: "test-api-key".to_string(),
            text_model: "gemini-2.0-flash".to_string(),
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        },
        vision: VisionConfig {
            credentials: ServiceAccountKey {
                client_email: "vision@test.iam.gserviceaccount.com".to_string(),
                private_key: "not-a-real-key".to_string(),
                token_uri: "https://oauth2.googleapis.com/token".to_string(),
            },
            api_base: "https://vision.googleapis.com".to_string(),
        },
        upload_dir: std::env::temp_dir()
            .join(format!("dishdash-test-{}", Uuid::new_v4()))
            .to_string_lossy()
            .into_owned(),
    }
}

/// Spawn the application with the given providers and return its port.
pub async fn spawn_app(
    config: RecipeConfig,
    text_provider: Arc<dyn TextProvider>,
    label_provider: Arc<dyn LabelProvider>,
) -> u16 {
    let app = Application::with_providers(config, text_provider, label_provider)
        .await
        .expect("Failed to build application");

    let port = app.port();

    tokio::spawn(async move {
        let _ = app.run_until_stopped().await;
    });

    // Wait for the server to start accepting connections.
    tokio::time::sleep(Duration::from_millis(100)).await;

    port
}
