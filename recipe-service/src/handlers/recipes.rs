//! Forwarding handlers for the three proxy operations.

use crate::startup::AppState;
use axum::extract::{Multipart, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use service_core::error::AppError;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
pub struct GenerateRecipeRequest {
    pub prompt: String,
    pub context: String,
}

#[derive(Debug, Deserialize)]
pub struct CheckIfFoodRequest {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct LabelsResponse {
    pub labels: Vec<String>,
}

/// `POST /generate-recipe` — forward `{prompt, context}` to Gemini and return
/// the collaborator's body unmodified.
pub async fn generate_recipe(
    State(state): State<AppState>,
    Json(request): Json<GenerateRecipeRequest>,
) -> Result<Json<Value>, AppError> {
    let text = format!("{}\n\n{}", request.context, request.prompt);

    let body = state
        .text_provider
        .generate_content(&text)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Gemini generation failed");
            AppError::Upstream("Failed to generate recipe")
        })?;

    Ok(Json(body))
}

/// `POST /check-if-food` — forward a bare prompt, no context. Part of the
/// deployed contract; the orchestrator does not currently call it.
pub async fn check_if_food(
    State(state): State<AppState>,
    Json(request): Json<CheckIfFoodRequest>,
) -> Result<Json<Value>, AppError> {
    let body = state
        .text_provider
        .generate_content(&request.prompt)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Gemini classification failed");
            AppError::Upstream("Failed to classify prompt")
        })?;

    Ok(Json(body))
}

/// `POST /recognize-image` — stage each uploaded image, run label detection
/// per image, and return the value-deduplicated union of labels.
///
/// The batch is all-or-nothing: one failing image fails the whole request and
/// no partial label set leaks. Staged files are removed on every exit path.
pub async fn recognize_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<LabelsResponse>, AppError> {
    let mut staged: Vec<PathBuf> = Vec::new();
    let result = extract_batch_labels(&state, multipart, &mut staged).await;
    state.staging.discard(&staged).await;

    let labels = result?;
    Ok(Json(LabelsResponse { labels }))
}

async fn extract_batch_labels(
    state: &AppState,
    mut multipart: Multipart,
    staged: &mut Vec<PathBuf>,
) -> Result<Vec<String>, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::error!(error = %e, "Invalid multipart body");
        AppError::BadRequest(anyhow::anyhow!("Invalid multipart body"))
    })? {
        if field.name() != Some("images") {
            continue;
        }

        let data = field.bytes().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to read uploaded file");
            AppError::BadRequest(anyhow::anyhow!("Failed to read uploaded file"))
        })?;

        staged.push(state.staging.stage(&data).await?);
    }

    let mut labels: Vec<String> = Vec::new();
    for path in staged.iter() {
        let data = state.staging.read(path).await?;

        let detected = state
            .label_provider
            .detect_labels(&data)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Vision label detection failed");
                AppError::Upstream("Failed to analyze images")
            })?;

        // Deduplicate by exact value, keeping first-occurrence order.
        for label in detected {
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
    }

    tracing::info!(
        images = staged.len(),
        labels = labels.len(),
        "Extracted labels from image batch"
    );

    Ok(labels)
}
