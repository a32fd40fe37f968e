//! Provider traits and implementations for external model and storage services

pub mod embedding;
pub mod llm;
pub mod ollama;
pub mod qdrant;
pub mod vector_store;

pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
pub use ollama::{OllamaClient, OllamaEmbedder, OllamaLlm};
pub use qdrant::QdrantStore;
pub use vector_store::{RetrievedChunk, VectorStoreProvider};
