//! Application startup and lifecycle management.

use crate::config::RecipeConfig;
use crate::handlers::health::health_check;
use crate::handlers::recipes::{check_if_food, generate_recipe, recognize_image};
use crate::services::providers::gemini::{GeminiConfig, GeminiTextProvider};
use crate::services::providers::vision::VisionLabelProvider;
use crate::services::providers::{LabelProvider, TextProvider};
use crate::services::Staging;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use service_core::error::AppError;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: RecipeConfig,
    pub text_provider: Arc<dyn TextProvider>,
    pub label_provider: Arc<dyn LabelProvider>,
    pub staging: Staging,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/generate-recipe", post(generate_recipe))
        .route("/recognize-image", post(recognize_image))
        .route("/check-if-food", post(check_if_food))
        .nest_service("/static", ServeDir::new("recipe-service/static"))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build with the real Google collaborators. Credential problems surface
    /// here, before the listener accepts traffic.
    pub async fn build(config: RecipeConfig) -> Result<Self, AppError> {
        let text_provider: Arc<dyn TextProvider> =
            Arc::new(GeminiTextProvider::new(GeminiConfig {
                api_key: config.google.api_key.clone(),
                model: config.google.text_model.clone(),
                api_base: config.google.api_base.clone(),
            }));
        tracing::info!(
            model = %config.google.text_model,
            "Initialized Gemini text provider"
        );

        let label_provider: Arc<dyn LabelProvider> = Arc::new(
            VisionLabelProvider::new(
                config.vision.credentials.clone(),
                config.vision.api_base.clone(),
            )
            .map_err(|e| AppError::ConfigError(anyhow::Error::new(e)))?,
        );
        tracing::info!(
            account = %config.vision.credentials.client_email,
            "Initialized Vision label provider"
        );

        Self::with_providers(config, text_provider, label_provider).await
    }

    /// Build with caller-supplied providers (used by tests).
    pub async fn with_providers(
        config: RecipeConfig,
        text_provider: Arc<dyn TextProvider>,
        label_provider: Arc<dyn LabelProvider>,
    ) -> Result<Self, AppError> {
        let staging = Staging::new(config.upload_dir.clone()).await?;

        let state = AppState {
            config: config.clone(),
            text_provider,
            label_provider,
            staging,
        };

        // Port 0 binds a random port for testing.
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("recipe-service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);
        axum::serve(self.listener, router).await
    }
}
