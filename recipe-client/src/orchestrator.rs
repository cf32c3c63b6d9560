//! The request orchestrator: input routing and collaborator sequencing.

use crate::api::ProxyClient;
use crate::error::OrchestratorError;
use crate::prompt;
use crate::upload::UploadBatch;
use serde_json::Value;

/// How to route a submission that carries both text and images.
///
/// The deployed UI silently let images win; here the precedence is an explicit
/// choice. `ImagesFirst` preserves that behavior, `Combine` folds both inputs
/// into a single prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputPolicy {
    #[default]
    ImagesFirst,
    Combine,
}

/// Which path a submission takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Text,
    Images,
    Combined,
}

/// Generated recipe text, fences already stripped. HTML-ish markup; rendered
/// once and discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeResult {
    pub text: String,
}

pub struct Orchestrator {
    client: ProxyClient,
    policy: InputPolicy,
}

impl Orchestrator {
    pub fn new(client: ProxyClient) -> Self {
        Self {
            client,
            policy: InputPolicy::default(),
        }
    }

    pub fn with_policy(client: ProxyClient, policy: InputPolicy) -> Self {
        Self { client, policy }
    }

    /// Run one submission end to end: route the input, call the proxy once or
    /// twice, and extract the recipe text. Label extraction always completes
    /// before generation starts; nothing is retried.
    pub async fn submit(
        &self,
        user_text: &str,
        images: &UploadBatch,
    ) -> Result<RecipeResult, OrchestratorError> {
        let user_text = user_text.trim();

        let mode = resolve_mode(self.policy, !user_text.is_empty(), !images.is_empty())
            .ok_or(OrchestratorError::NoInput)?;

        let prompt = match mode {
            InputMode::Text => prompt::text_prompt(user_text),
            InputMode::Images => {
                let labels = self.client.recognize_image(images).await?;
                tracing::debug!(count = labels.len(), "Recognized labels");
                prompt::image_prompt(&labels.join(", "))
            }
            InputMode::Combined => {
                let labels = self.client.recognize_image(images).await?;
                tracing::debug!(count = labels.len(), "Recognized labels");
                prompt::combined_prompt(&labels.join(", "), user_text)
            }
        };

        let response = self
            .client
            .generate_recipe(&prompt, prompt::RECIPE_CONTEXT)
            .await?;

        let text = extract_recipe_text(&response)?;
        Ok(RecipeResult {
            text: prompt::strip_code_fences(&text).to_string(),
        })
    }
}

/// Pure routing decision. Returns None when there is nothing to submit.
pub fn resolve_mode(policy: InputPolicy, has_text: bool, has_images: bool) -> Option<InputMode> {
    match (has_text, has_images) {
        (false, false) => None,
        (true, false) => Some(InputMode::Text),
        (false, true) => Some(InputMode::Images),
        (true, true) => match policy {
            InputPolicy::ImagesFirst => Some(InputMode::Images),
            InputPolicy::Combine => Some(InputMode::Combined),
        },
    }
}

/// Pull the first candidate's first text part out of the raw generation
/// response. An absent field is a shape error; an empty string is left to the
/// renderer to report.
pub fn extract_recipe_text(response: &Value) -> Result<String, OrchestratorError> {
    response
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(OrchestratorError::ResponseShape)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn no_input_resolves_to_none() {
        assert_eq!(resolve_mode(InputPolicy::ImagesFirst, false, false), None);
        assert_eq!(resolve_mode(InputPolicy::Combine, false, false), None);
    }

    #[test]
    fn text_only_takes_text_path() {
        assert_eq!(
            resolve_mode(InputPolicy::ImagesFirst, true, false),
            Some(InputMode::Text)
        );
    }

    #[test]
    fn images_take_precedence_over_text_under_images_first() {
        assert_eq!(
            resolve_mode(InputPolicy::ImagesFirst, true, true),
            Some(InputMode::Images)
        );
    }

    #[test]
    fn combine_policy_merges_both_inputs() {
        assert_eq!(
            resolve_mode(InputPolicy::Combine, true, true),
            Some(InputMode::Combined)
        );
    }

    #[test]
    fn combine_policy_without_text_still_takes_image_path() {
        assert_eq!(
            resolve_mode(InputPolicy::Combine, false, true),
            Some(InputMode::Images)
        );
    }

    #[test]
    fn extracts_first_candidate_text() {
        let response = json!({
            "candidates": [
                {"content": {"parts": [{"text": "first"}, {"text": "second"}]}},
                {"content": {"parts": [{"text": "other candidate"}]}}
            ]
        });
        assert_eq!(extract_recipe_text(&response).unwrap(), "first");
    }

    #[test]
    fn missing_text_field_is_a_shape_error() {
        let response = json!({"candidates": [{"content": {"parts": [{}]}}]});
        assert!(matches!(
            extract_recipe_text(&response),
            Err(OrchestratorError::ResponseShape)
        ));
    }

    #[test]
    fn empty_candidates_is_a_shape_error() {
        let response = json!({"candidates": []});
        assert!(matches!(
            extract_recipe_text(&response),
            Err(OrchestratorError::ResponseShape)
        ));
    }

    #[test]
    fn empty_text_is_not_a_shape_error() {
        let response = json!({"candidates": [{"content": {"parts": [{"text": ""}]}}]});
        assert_eq!(extract_recipe_text(&response).unwrap(), "");
    }
}
