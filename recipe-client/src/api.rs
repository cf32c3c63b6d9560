//! HTTP client for the recipe-service proxy.

use crate::error::{OrchestratorError, Stage};
use crate::upload::UploadBatch;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
struct GenerateRecipeRequest<'a> {
    prompt: &'a str,
    context: &'a str,
}

#[derive(Debug, Serialize)]
struct CheckIfFoodRequest<'a> {
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct LabelsResponse {
    labels: Vec<String>,
}

/// Thin wrapper over the proxy's three endpoints.
#[derive(Clone)]
pub struct ProxyClient {
    base_url: String,
    client: Client,
}

impl ProxyClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into(),
            client,
        }
    }

    /// `POST /recognize-image` with every image of the batch as a multipart
    /// `images` field. Returns the deduplicated label set.
    pub async fn recognize_image(
        &self,
        batch: &UploadBatch,
    ) -> Result<Vec<String>, OrchestratorError> {
        let mut form = Form::new();
        for image in batch.iter() {
            let part = Part::bytes(image.bytes.clone())
                .file_name(image.filename.clone())
                .mime_str(&image.mime_type)
                .map_err(|e| {
                    OrchestratorError::upstream(Stage::LabelExtraction, e.to_string())
                })?;
            form = form.part("images", part);
        }

        let response = self
            .client
            .post(format!("{}/recognize-image", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| OrchestratorError::upstream(Stage::LabelExtraction, e.to_string()))?;

        if !response.status().is_success() {
            return Err(OrchestratorError::upstream(
                Stage::LabelExtraction,
                format!("proxy answered {}", response.status()),
            ));
        }

        let body: LabelsResponse = response
            .json()
            .await
            .map_err(|_| OrchestratorError::ResponseShape)?;

        Ok(body.labels)
    }

    /// `POST /generate-recipe`. Returns the generation collaborator's raw
    /// response body.
    pub async fn generate_recipe(
        &self,
        prompt: &str,
        context: &str,
    ) -> Result<Value, OrchestratorError> {
        let response = self
            .client
            .post(format!("{}/generate-recipe", self.base_url))
            .json(&GenerateRecipeRequest { prompt, context })
            .send()
            .await
            .map_err(|e| OrchestratorError::upstream(Stage::Generation, e.to_string()))?;

        if !response.status().is_success() {
            return Err(OrchestratorError::upstream(
                Stage::Generation,
                format!("proxy answered {}", response.status()),
            ));
        }

        response
            .json()
            .await
            .map_err(|_| OrchestratorError::ResponseShape)
    }

    /// `POST /check-if-food`. Deployed contract; no orchestrator path calls
    /// this today.
    pub async fn check_if_food(&self, prompt: &str) -> Result<Value, OrchestratorError> {
        let response = self
            .client
            .post(format!("{}/check-if-food", self.base_url))
            .json(&CheckIfFoodRequest { prompt })
            .send()
            .await
            .map_err(|e| OrchestratorError::upstream(Stage::Generation, e.to_string()))?;

        if !response.status().is_success() {
            return Err(OrchestratorError::upstream(
                Stage::Generation,
                format!("proxy answered {}", response.status()),
            ));
        }

        response
            .json()
            .await
            .map_err(|_| OrchestratorError::ResponseShape)
    }
}
