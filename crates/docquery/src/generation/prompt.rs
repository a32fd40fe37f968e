//! Prompt templates for grounded question answering

use crate::providers::RetrievedChunk;

/// Builds prompts for the generation model
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the context block from retrieved passages
    ///
    /// Passages are concatenated in the order the vector index returned
    /// them, so identical retrieval results always produce an identical
    /// prompt.
    pub fn build_context(passages: &[RetrievedChunk]) -> String {
        passages
            .iter()
            .map(|p| p.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Build the full chat prompt from a question and its context block
    ///
    /// The system instruction constrains the model to the supplied context
    /// and requires an explicit decline when the context is insufficient.
    pub fn build_chat_prompt(question: &str, context: &str) -> String {
        format!(
            r#"Answer the user's questions based on the below context. If the context doesn't contain any relevant information to the question, don't make something up and just say "I don't know":

<context>
{}
</context>

Question: {}"#,
            context, question
        )
    }

    /// Fixed question text used by the summary endpoint
    pub fn summary_question() -> &'static str {
        "Summarize the following document into a concise, clear, and coherent summary. \
         Capture the key points, main ideas, and any important details while maintaining \
         the overall meaning. Avoid unnecessary details and focus on essential information. \
         Document:"
    }

    /// Fixed instruction for vision-model text extraction from images
    pub fn image_extraction_prompt() -> &'static str {
        r#"You are a bot whose role is to obtain the text present in images. Extract all textual content from the image and return it as JSON in exactly this shape: {"image_content": "<content>"}. Return only the JSON object, nothing else."#
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passage(content: &str, ordinal: u64, score: f32) -> RetrievedChunk {
        RetrievedChunk {
            content: content.to_string(),
            page: 1,
            ordinal,
            score,
        }
    }

    #[test]
    fn chat_prompt_contains_decline_instruction() {
        let prompt = PromptBuilder::build_chat_prompt("What is X?", "some context");
        assert!(prompt.contains("I don't know"));
        assert!(prompt.contains("<context>"));
        assert!(prompt.contains("Question: What is X?"));
    }

    #[test]
    fn context_preserves_ranking_order() {
        let passages = vec![
            passage("first", 3, 0.9),
            passage("second", 0, 0.8),
            passage("third", 7, 0.7),
        ];

        let context = PromptBuilder::build_context(&passages);
        assert_eq!(context, "first\n\nsecond\n\nthird");
    }

    #[test]
    fn identical_inputs_build_identical_prompts() {
        let passages = vec![passage("alpha", 0, 0.5), passage("beta", 1, 0.4)];

        let a = PromptBuilder::build_chat_prompt("q", &PromptBuilder::build_context(&passages));
        let b = PromptBuilder::build_chat_prompt("q", &PromptBuilder::build_context(&passages));
        assert_eq!(a, b);
    }

    #[test]
    fn image_prompt_names_the_expected_json_shape() {
        assert!(PromptBuilder::image_extraction_prompt().contains("image_content"));
    }

    #[test]
    fn summary_question_ends_with_the_document_label() {
        let question = PromptBuilder::summary_question();
        assert!(question.starts_with("Summarize the following document"));
        assert!(question.ends_with("Document:"));
    }
}
