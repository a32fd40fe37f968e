//! Image text extraction via a vision-capable model

use base64::Engine;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::generation::prompt::PromptBuilder;
use crate::providers::LlmProvider;
use crate::types::ImageExtraction;

/// Extracts text from images by prompting a vision model and parsing its
/// reply as a constrained JSON shape
pub struct VisionExtractor {
    llm: Arc<dyn LlmProvider>,
}

impl VisionExtractor {
    /// Create a new extractor on top of an LLM provider
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    /// Run text extraction over raw image bytes
    pub async fn extract(&self, image_bytes: &[u8]) -> Result<ImageExtraction> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(image_bytes);

        let raw = self
            .llm
            .generate_with_images(PromptBuilder::image_extraction_prompt(), &[encoded])
            .await?;

        parse_image_extraction(&raw)
    }
}

/// Parse a model reply into an [`ImageExtraction`]
///
/// Models frequently wrap JSON replies in markdown code fences; those are
/// stripped before parsing. Anything that still fails to parse is a
/// `ModelOutputParse` error, terminal for the request.
pub fn parse_image_extraction(raw: &str) -> Result<ImageExtraction> {
    let cleaned = strip_code_fence(raw);

    serde_json::from_str(cleaned)
        .map_err(|e| Error::ModelOutputParse(format!("expected {{\"image_content\": ...}}: {}", e)))
}

/// Strip a surrounding markdown code fence, if present
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();

    for opener in ["```json", "```"] {
        if let Some(rest) = trimmed.strip_prefix(opener) {
            if let Some(end) = rest.rfind("```") {
                return rest[..end].trim();
            }
            return rest.trim();
        }
    }

    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_json() {
        let result = parse_image_extraction(r#"{"image_content": "Total due: $42"}"#).unwrap();
        assert_eq!(result.image_content, "Total due: $42");
    }

    #[test]
    fn strips_json_code_fence() {
        let raw = "```json\n{\"image_content\": \"Receipt #1001\"}\n```";
        let result = parse_image_extraction(raw).unwrap();
        assert_eq!(result.image_content, "Receipt #1001");
    }

    #[test]
    fn strips_anonymous_code_fence() {
        let raw = "```\n{\"image_content\": \"hello\"}\n```";
        let result = parse_image_extraction(raw).unwrap();
        assert_eq!(result.image_content, "hello");
    }

    #[test]
    fn unfenced_prose_is_a_parse_error() {
        let err = parse_image_extraction("The image says hello.").unwrap_err();
        assert!(matches!(err, Error::ModelOutputParse(_)));
    }

    #[test]
    fn wrong_json_shape_is_a_parse_error() {
        let err = parse_image_extraction(r#"{"text": "hello"}"#).unwrap_err();
        assert!(matches!(err, Error::ModelOutputParse(_)));
    }

    #[test]
    fn unterminated_fence_still_parses() {
        let raw = "```json\n{\"image_content\": \"partial\"}";
        let result = parse_image_extraction(raw).unwrap();
        assert_eq!(result.image_content, "partial");
    }
}
