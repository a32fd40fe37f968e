//! Ollama HTTP client and provider implementations

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::config::LlmConfig;
use crate::error::{Error, Result};

use super::{EmbeddingProvider, LlmProvider};

/// Ollama API client shared by the embedding and generation providers
pub struct OllamaClient {
    /// HTTP client
    client: Client,
    /// Configuration
    config: LlmConfig,
}

#[derive(Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    images: Option<Vec<String>>,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Serialize)]
struct EmbedRequest {
    model: String,
    prompt: String,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

impl OllamaClient {
    /// Create a new Ollama client
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Check if Ollama is available
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.config.base_url);

        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// Generate an embedding
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.config.base_url);

        let request = EmbedRequest {
            model: self.config.embed_model.clone(),
            prompt: text.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::from_reqwest("ollama", e))?;

        if !response.status().is_success() {
            return Err(Error::external(
                "ollama",
                format!("embedding failed: HTTP {}", response.status()),
            ));
        }

        let embed_response: EmbedResponse = response
            .json()
            .await
            .map_err(|e| Error::external("ollama", format!("bad embedding response: {}", e)))?;

        Ok(embed_response.embedding)
    }

    /// Generate a completion for a prompt, optionally attaching images
    async fn generate_inner(&self, model: &str, prompt: &str, images: Option<Vec<String>>) -> Result<String> {
        let url = format!("{}/api/generate", self.config.base_url);

        let request = GenerateRequest {
            model: model.to_string(),
            prompt: prompt.to_string(),
            stream: false,
            images,
            options: GenerateOptions {
                temperature: self.config.temperature,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::from_reqwest("ollama", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::external(
                "ollama",
                format!("generation failed: HTTP {} - {}", status, body),
            ));
        }

        let generate_response: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::external("ollama", format!("bad generation response: {}", e)))?;

        Ok(generate_response.response)
    }

    /// Generate a text completion
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_inner(&self.config.generate_model, prompt, None)
            .await
    }

    /// Generate a completion with base64-encoded images via the vision model
    pub async fn generate_with_images(&self, prompt: &str, images: &[String]) -> Result<String> {
        self.generate_inner(&self.config.vision_model, prompt, Some(images.to_vec()))
            .await
    }
}

/// Embedding provider backed by the Ollama embeddings API
pub struct OllamaEmbedder {
    client: Arc<OllamaClient>,
    dimensions: usize,
    model: String,
}

impl OllamaEmbedder {
    /// Create a new embedder sharing the given client
    pub fn new(client: Arc<OllamaClient>, config: &LlmConfig) -> Self {
        Self {
            client,
            dimensions: config.dimensions,
            model: config.embed_model.clone(),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(Error::validation("cannot embed empty text"));
        }
        self.client.embed(text).await
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn health_check(&self) -> Result<bool> {
        self.client.health_check().await
    }

    fn name(&self) -> &str {
        &self.model
    }
}

/// LLM provider backed by the Ollama generate API
pub struct OllamaLlm {
    client: Arc<OllamaClient>,
    model: String,
}

impl OllamaLlm {
    /// Create a new LLM provider sharing the given client
    pub fn new(client: Arc<OllamaClient>, config: &LlmConfig) -> Self {
        Self {
            client,
            model: config.generate_model.clone(),
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaLlm {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.client.generate(prompt).await
    }

    async fn generate_with_images(&self, prompt: &str, images: &[String]) -> Result<String> {
        self.client.generate_with_images(prompt, images).await
    }

    async fn health_check(&self) -> Result<bool> {
        self.client.health_check().await
    }

    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }
}
