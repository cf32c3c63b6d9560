//! Cloud Vision label-detection provider.
//!
//! Authenticates with a service-account key: a short-lived RS256 assertion is
//! exchanged for an OAuth2 bearer token at the key's token URI, and the token
//! is cached until close to expiry.

use super::{LabelProvider, ProviderError};
use crate::config::ServiceAccountKey;
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const VISION_SCOPE: &str = "https://www.googleapis.com/auth/cloud-vision";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Refresh the cached token this long before it actually expires.
const TOKEN_LEEWAY: Duration = Duration::from_secs(60);

const MAX_LABEL_RESULTS: u32 = 10;

/// Cloud Vision label provider.
pub struct VisionLabelProvider {
    credentials: ServiceAccountKey,
    api_base: String,
    signing_key: EncodingKey,
    client: Client,
    token: Mutex<Option<CachedToken>>,
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

impl VisionLabelProvider {
    /// Create the provider, validating that the credential blob carries a
    /// usable RSA key. Fails here rather than on the first upload request.
    pub fn new(credentials: ServiceAccountKey, api_base: String) -> Result<Self, ProviderError> {
        let signing_key =
            EncodingKey::from_rsa_pem(credentials.private_key.as_bytes()).map_err(|e| {
                ProviderError::NotConfigured(format!("Invalid Vision service account key: {}", e))
            })?;

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Ok(Self {
            credentials,
            api_base,
            signing_key,
            client,
            token: Mutex::new(None),
        })
    }

    /// Return a bearer token, minting a fresh one when the cache is empty or
    /// about to expire.
    async fn access_token(&self) -> Result<String, ProviderError> {
        let mut guard = self.token.lock().await;

        if let Some(cached) = guard.as_ref() {
            if cached.expires_at > Instant::now() + TOKEN_LEEWAY {
                return Ok(cached.value.clone());
            }
        }

        let now = chrono::Utc::now().timestamp();
        let claims = BearerClaims {
            iss: &self.credentials.client_email,
            scope: VISION_SCOPE,
            aud: &self.credentials.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &self.signing_key)
            .map_err(|e| {
                ProviderError::NotConfigured(format!("Failed to sign token request: {}", e))
            })?;

        tracing::debug!(
            account = %self.credentials.client_email,
            "Requesting Vision access token"
        );

        let response = self
            .client
            .post(&self.credentials.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError(format!(
                "Token exchange failed {}: {}",
                status, error_text
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ApiError(format!("Failed to parse token: {}", e)))?;

        let expires_at = Instant::now() + Duration::from_secs(token.expires_in.max(0) as u64);
        let value = token.access_token;
        *guard = Some(CachedToken {
            value: value.clone(),
            expires_at,
        });

        Ok(value)
    }
}

#[async_trait]
impl LabelProvider for VisionLabelProvider {
    async fn detect_labels(&self, image: &[u8]) -> Result<Vec<String>, ProviderError> {
        let token = self.access_token().await?;

        let request = AnnotateRequest {
            requests: vec![ImageRequest {
                image: Image {
                    content: general_purpose::STANDARD.encode(image),
                },
                features: vec![Feature {
                    feature_type: "LABEL_DETECTION".to_string(),
                    max_results: MAX_LABEL_RESULTS,
                }],
            }],
        };

        let url = format!("{}/v1/images:annotate", self.api_base);

        tracing::debug!(image_bytes = image.len(), "Sending request to Vision API");

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimited);
            }

            return Err(ProviderError::ApiError(format!(
                "Vision API error {}: {}",
                status, error_text
            )));
        }

        let body: AnnotateResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ApiError(format!("Failed to parse response: {}", e)))?;

        let annotated = body
            .responses
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::ApiError("Empty annotate response".to_string()))?;

        if let Some(error) = annotated.error {
            return Err(ProviderError::ApiError(error.message));
        }

        Ok(annotated
            .label_annotations
            .into_iter()
            .map(|label| label.description)
            .collect())
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.credentials.client_email.is_empty() {
            Err(ProviderError::NotConfigured(
                "Vision credentials not configured".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

// ============================================================================
// OAuth and Vision API wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct BearerClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: i64,
}

#[derive(Debug, Serialize)]
struct AnnotateRequest {
    requests: Vec<ImageRequest>,
}

#[derive(Debug, Serialize)]
struct ImageRequest {
    image: Image,
    features: Vec<Feature>,
}

#[derive(Debug, Serialize)]
struct Image {
    content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Feature {
    #[serde(rename = "type")]
    feature_type: String,
    max_results: u32,
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    #[serde(default)]
    label_annotations: Vec<LabelAnnotation>,
    #[serde(default)]
    error: Option<Status>,
}

#[derive(Debug, Deserialize)]
struct LabelAnnotation {
    description: String,
    #[serde(default)]
    #[allow(dead_code)]
    score: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct Status {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn annotate_response_deserializes_labels() {
        let body = json!({
            "responses": [{
                "labelAnnotations": [
                    {"description": "Apple", "score": 0.97},
                    {"description": "Fruit", "score": 0.91}
                ]
            }]
        });

        let parsed: AnnotateResponse = serde_json::from_value(body).unwrap();
        let labels: Vec<String> = parsed.responses[0]
            .label_annotations
            .iter()
            .map(|l| l.description.clone())
            .collect();
        assert_eq!(labels, vec!["Apple", "Fruit"]);
    }

    #[test]
    fn annotate_response_surfaces_per_image_error() {
        let body = json!({
            "responses": [{
                "error": {"code": 7, "message": "permission denied"}
            }]
        });

        let parsed: AnnotateResponse = serde_json::from_value(body).unwrap();
        assert_eq!(
            parsed.responses[0].error.as_ref().unwrap().message,
            "permission denied"
        );
    }

    #[test]
    fn feature_serializes_with_type_field() {
        let feature = Feature {
            feature_type: "LABEL_DETECTION".to_string(),
            max_results: 10,
        };
        let value = serde_json::to_value(&feature).unwrap();
        assert_eq!(value["type"], "LABEL_DETECTION");
        assert_eq!(value["maxResults"], 10);
    }
}
