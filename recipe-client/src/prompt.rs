//! Prompt and context assembly for the generation collaborator.

/// Fixed instruction template sent with every generation request.
pub const RECIPE_CONTEXT: &str = "You are an expert chef and HTML writer. \
Return the recipe in raw HTML only, without code blocks like ```html. \
Do not use & or &amp;, write out the word \"and\" instead. \
Start with the recipe title as a heading. Then provide a list of ingredients \
and step-by-step instructions. Keep the instructions clear, simple and \
beginner friendly. Also include some nutrition facts. \
Use cups, grams (g), tbsp, tsp, etc. Avoid lbs or oz. \
End with: <strong>Bon Appetit! Enjoy your meals!</strong>";

/// Prompt for the free-text path.
pub fn text_prompt(user_text: &str) -> String {
    format!(
        "User instructions are: Generate a recipe with these ingredients {}",
        user_text
    )
}

/// Prompt for the image path, fed with the comma-joined label set.
pub fn image_prompt(joined_labels: &str) -> String {
    format!(
        "Generate a recipe with these ingredients: {}",
        joined_labels
    )
}

/// Prompt when labels and user text are combined into one request.
pub fn combined_prompt(joined_labels: &str, user_text: &str) -> String {
    format!(
        "Generate a recipe with these ingredients: {}. User instructions are: {}",
        joined_labels, user_text
    )
}

/// Strip a fenced code block wrapping the whole text, if present: a leading
/// fence with an optional language tag and a trailing fence.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
        return text;
    };

    // Skip the optional language tag up to the first newline.
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => return text,
    };

    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim_end()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_prompt_contains_user_text_verbatim() {
        let prompt = text_prompt("paneer, peas & rice");
        assert!(prompt.contains("paneer, peas & rice"));
    }

    #[test]
    fn image_prompt_contains_joined_labels() {
        assert_eq!(
            image_prompt("Apple, Banana"),
            "Generate a recipe with these ingredients: Apple, Banana"
        );
    }

    #[test]
    fn combined_prompt_contains_both_sources() {
        let prompt = combined_prompt("Apple", "make it vegan");
        assert!(prompt.contains("Apple"));
        assert!(prompt.contains("make it vegan"));
    }

    #[test]
    fn strips_fence_with_language_tag() {
        assert_eq!(
            strip_code_fences("```html\n<h1>X</h1>\n```"),
            "<h1>X</h1>"
        );
    }

    #[test]
    fn strips_fence_without_language_tag() {
        assert_eq!(strip_code_fences("```\n<p>Y</p>\n```"), "<p>Y</p>");
    }

    #[test]
    fn leaves_unfenced_text_alone() {
        assert_eq!(strip_code_fences("<h1>plain</h1>"), "<h1>plain</h1>");
    }

    #[test]
    fn leaves_unterminated_fence_body() {
        assert_eq!(strip_code_fences("```html\n<h1>X</h1>"), "<h1>X</h1>");
    }

    #[test]
    fn context_forbids_fenced_output_and_sets_closing_phrase() {
        assert!(RECIPE_CONTEXT.contains("raw HTML"));
        assert!(RECIPE_CONTEXT.contains("Bon Appetit! Enjoy your meals!"));
    }
}
