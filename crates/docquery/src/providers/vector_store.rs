//! Vector store provider trait

use async_trait::async_trait;

use crate::error::Result;
use crate::types::Chunk;

/// A chunk returned from similarity search
#[derive(Debug, Clone)]
pub struct RetrievedChunk {
    /// Chunk text
    pub content: String,
    /// 1-based source page number
    pub page: u32,
    /// Chunk position within the document
    pub ordinal: u64,
    /// Similarity score (higher is more similar)
    pub score: f32,
}

/// Trait for per-document vector storage and similarity search
///
/// Each document gets its own namespace keyed by its id. `add_document`
/// overwrites the namespace wholesale; `query` never crosses namespaces.
#[async_trait]
pub trait VectorStoreProvider: Send + Sync {
    /// Store chunk vectors for a document, replacing any existing namespace
    async fn add_document(
        &self,
        document_id: i64,
        chunks: &[Chunk],
        embeddings: &[Vec<f32>],
    ) -> Result<()>;

    /// Search the document's namespace for the top_k nearest chunks
    ///
    /// Results come back in the store's ranking order, which downstream
    /// prompt construction relies on for determinism.
    async fn query(
        &self,
        document_id: i64,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<RetrievedChunk>>;

    /// Check if the provider is healthy
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
