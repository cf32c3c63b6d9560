use crate::services::providers::ProviderError;
use crate::startup::AppState;
use axum::extract::State;
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Health check endpoint for Docker/K8s liveness probes.
///
/// Probes both collaborators' configuration; answers 503 when either reports
/// itself unusable.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let text = state.text_provider.health_check().await;
    let labels = state.label_provider.health_check().await;

    let healthy = text.is_ok() && labels.is_ok();
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if healthy { "ok" } else { "unhealthy" },
            "service": "recipe-service",
            "version": env!("CARGO_PKG_VERSION"),
            "providers": {
                "text": provider_status(&text),
                "labels": provider_status(&labels),
            }
        })),
    )
}

fn provider_status(outcome: &Result<(), ProviderError>) -> serde_json::Value {
    match outcome {
        Ok(()) => json!("ok"),
        Err(e) => json!({ "error": e.to_string() }),
    }
}
