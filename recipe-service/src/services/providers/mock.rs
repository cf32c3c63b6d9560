//! Mock provider implementations for testing.

use super::{LabelProvider, ProviderError, TextProvider};
use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Mock text provider for testing.
///
/// Returns a canned Gemini-shaped body, or echoes the request text inside a
/// default body when no canned response is set.
pub struct MockTextProvider {
    enabled: bool,
    canned: Option<serde_json::Value>,
}

impl MockTextProvider {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            canned: None,
        }
    }

    /// Respond with the given text wrapped in the Gemini candidate shape.
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            enabled: true,
            canned: Some(json!({
                "candidates": [{
                    "content": {"parts": [{"text": text}]},
                    "finishReason": "STOP"
                }]
            })),
        }
    }

    /// Respond with an arbitrary body, e.g. to simulate malformed responses.
    pub fn with_body(body: serde_json::Value) -> Self {
        Self {
            enabled: true,
            canned: Some(body),
        }
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate_content(&self, text: &str) -> Result<serde_json::Value, ProviderError> {
        if !self.enabled {
            return Err(ProviderError::NotConfigured(
                "Mock text provider not enabled".to_string(),
            ));
        }

        if let Some(body) = &self.canned {
            return Ok(body.clone());
        }

        Ok(json!({
            "candidates": [{
                "content": {"parts": [{"text": format!("Mock response for: {}", text)}]},
                "finishReason": "STOP"
            }]
        }))
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.enabled {
            Ok(())
        } else {
            Err(ProviderError::NotConfigured(
                "Mock text provider not enabled".to_string(),
            ))
        }
    }
}

/// Mock label provider for testing.
///
/// Pops one scripted outcome per `detect_labels` call, so multi-image batch
/// behavior (including mid-batch failure) can be exercised.
pub struct MockLabelProvider {
    outcomes: Mutex<VecDeque<Result<Vec<String>, String>>>,
}

impl MockLabelProvider {
    pub fn with_outcomes(outcomes: Vec<Result<Vec<String>, String>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
        }
    }

    /// One successful outcome per image, in order.
    pub fn with_labels(batches: Vec<Vec<&str>>) -> Self {
        Self::with_outcomes(
            batches
                .into_iter()
                .map(|labels| Ok(labels.into_iter().map(str::to_string).collect()))
                .collect(),
        )
    }
}

#[async_trait]
impl LabelProvider for MockLabelProvider {
    async fn detect_labels(&self, _image: &[u8]) -> Result<Vec<String>, ProviderError> {
        let outcome = self
            .outcomes
            .lock()
            .expect("mock outcomes lock poisoned")
            .pop_front();

        match outcome {
            Some(Ok(labels)) => Ok(labels),
            Some(Err(message)) => Err(ProviderError::ApiError(message)),
            None => Err(ProviderError::NotConfigured(
                "No scripted label outcome left".to_string(),
            )),
        }
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}
