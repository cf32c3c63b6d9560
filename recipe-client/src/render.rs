//! Incremental typewriter-style rendering of the recipe outcome.

use crate::error::{OrchestratorError, Stage};
use crate::orchestrator::RecipeResult;
use std::time::Duration;

/// Shown when generation succeeded but produced no text.
pub const NO_RECIPE_MESSAGE: &str = "No recipe found.";

/// Shown when the image path failed.
pub const IMAGE_FAILED_MESSAGE: &str = "Failed to process image. Try again.";

/// Shown for every other failure.
pub const GENERIC_FAILED_MESSAGE: &str = "Something went wrong. Please try again.";

/// Where rendered output goes. Implementations are expected to be cheap;
/// `clear` resets the target to empty.
pub trait OutputSink {
    fn clear(&mut self);
    fn append(&mut self, text: &str);
}

/// Simple in-memory sink.
#[derive(Debug, Default)]
pub struct BufferSink {
    contents: String,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }
}

impl OutputSink for BufferSink {
    fn clear(&mut self) {
        self.contents.clear();
    }

    fn append(&mut self, text: &str) {
        self.contents.push_str(text);
    }
}

/// Renders recipe text character by character at a fixed short delay. Every
/// call clears the sink first, so re-rendering replaces rather than appends.
pub struct TypewriterRenderer {
    delay: Duration,
}

impl Default for TypewriterRenderer {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(10),
        }
    }
}

impl TypewriterRenderer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Render a submission outcome. Never fails: empty text becomes the fixed
    /// "no recipe" message, and errors become one of two fixed failure
    /// messages depending on which stage failed.
    pub async fn render(
        &self,
        sink: &mut dyn OutputSink,
        outcome: &Result<RecipeResult, OrchestratorError>,
    ) {
        sink.clear();

        match outcome {
            Ok(result) if result.text.trim().is_empty() => {
                sink.append(NO_RECIPE_MESSAGE);
            }
            Ok(result) => {
                let mut buf = [0u8; 4];
                for ch in result.text.chars() {
                    sink.append(ch.encode_utf8(&mut buf));
                    if !self.delay.is_zero() {
                        tokio::time::sleep(self.delay).await;
                    }
                }
            }
            Err(error) => {
                let message = match error {
                    OrchestratorError::Upstream {
                        stage: Stage::LabelExtraction,
                        ..
                    } => IMAGE_FAILED_MESSAGE,
                    _ => GENERIC_FAILED_MESSAGE,
                };
                tracing::warn!(error = %error, "Rendering failure message");
                sink.append(message);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant() -> TypewriterRenderer {
        TypewriterRenderer::new(Duration::ZERO)
    }

    fn ok(text: &str) -> Result<RecipeResult, OrchestratorError> {
        Ok(RecipeResult {
            text: text.to_string(),
        })
    }

    #[tokio::test]
    async fn renders_full_text() {
        let mut sink = BufferSink::new();
        instant().render(&mut sink, &ok("<h1>Pie</h1>")).await;
        assert_eq!(sink.contents(), "<h1>Pie</h1>");
    }

    #[tokio::test]
    async fn second_render_replaces_first() {
        let mut sink = BufferSink::new();
        let renderer = instant();

        renderer.render(&mut sink, &ok("first recipe")).await;
        renderer.render(&mut sink, &ok("second recipe")).await;

        assert_eq!(sink.contents(), "second recipe");
    }

    #[tokio::test]
    async fn empty_text_shows_no_recipe_message() {
        let mut sink = BufferSink::new();
        instant().render(&mut sink, &ok("")).await;
        assert_eq!(sink.contents(), NO_RECIPE_MESSAGE);

        instant().render(&mut sink, &ok("   \n")).await;
        assert_eq!(sink.contents(), NO_RECIPE_MESSAGE);
    }

    #[tokio::test]
    async fn label_extraction_failure_shows_image_message() {
        let mut sink = BufferSink::new();
        let outcome = Err(OrchestratorError::upstream(
            Stage::LabelExtraction,
            "proxy answered 500",
        ));

        instant().render(&mut sink, &outcome).await;
        assert_eq!(sink.contents(), IMAGE_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn other_failures_show_generic_message() {
        let mut sink = BufferSink::new();

        instant()
            .render(
                &mut sink,
                &Err(OrchestratorError::upstream(Stage::Generation, "boom")),
            )
            .await;
        assert_eq!(sink.contents(), GENERIC_FAILED_MESSAGE);

        instant()
            .render(&mut sink, &Err(OrchestratorError::ResponseShape))
            .await;
        assert_eq!(sink.contents(), GENERIC_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn multibyte_text_renders_intact() {
        let mut sink = BufferSink::new();
        instant().render(&mut sink, &ok("crème brûlée 🍮")).await;
        assert_eq!(sink.contents(), "crème brûlée 🍮");
    }
}
