//! Collaborator client abstractions and implementations.
//!
//! This module provides a trait-based abstraction for the external Google
//! collaborators, allowing easy swapping between real backends and mocks.

pub mod gemini;
pub mod mock;
pub mod vision;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for collaborator operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Trait for the generative-language collaborator (Gemini).
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Send a single-turn text request and return the collaborator's raw
    /// response body. The proxy passes the body through unmodified; response
    /// interpretation belongs to the client-side orchestrator.
    async fn generate_content(&self, text: &str) -> Result<serde_json::Value, ProviderError>;

    /// Health check.
    async fn health_check(&self) -> Result<(), ProviderError>;
}

/// Trait for the image-label-detection collaborator (Cloud Vision).
#[async_trait]
pub trait LabelProvider: Send + Sync {
    /// Detect descriptive labels for a single image.
    async fn detect_labels(&self, image: &[u8]) -> Result<Vec<String>, ProviderError>;

    /// Health check.
    async fn health_check(&self) -> Result<(), ProviderError>;
}
