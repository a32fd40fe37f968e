//! LLM provider trait

use async_trait::async_trait;

use crate::error::Result;

/// Trait for language model invocation
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion for a fully built prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate a completion for a prompt plus base64-encoded images
    ///
    /// Used for vision-model text extraction from uploaded images.
    async fn generate_with_images(&self, prompt: &str, images: &[String]) -> Result<String>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the generation model being used
    fn model(&self) -> &str;
}
