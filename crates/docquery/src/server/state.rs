//! Application state for the HTTP server

use std::sync::Arc;

use crate::config::DocQueryConfig;
use crate::error::Result;
use crate::ingestion::{PdfLoader, TextChunker, VisionExtractor};
use crate::orchestrator::QueryOrchestrator;
use crate::providers::{OllamaClient, OllamaEmbedder, OllamaLlm, QdrantStore};
use crate::storage::DocumentStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: DocQueryConfig,
    /// Document registry
    store: Arc<DocumentStore>,
    /// Indexing and answering pipeline
    orchestrator: Arc<QueryOrchestrator>,
    /// Vision-model text extraction for images
    vision: Arc<VisionExtractor>,
}

impl AppState {
    /// Create new application state
    ///
    /// All expensive resources (HTTP clients, database connection) are
    /// constructed once here and shared across requests.
    pub async fn new(config: DocQueryConfig) -> Result<Self> {
        tracing::info!("Initializing application state...");

        std::fs::create_dir_all(&config.storage.upload_dir)?;

        let store = Arc::new(DocumentStore::new(&config.storage.database_path)?);
        tracing::info!(
            "Document registry opened at {}",
            config.storage.database_path.display()
        );

        let ollama = Arc::new(OllamaClient::new(&config.llm)?);
        tracing::info!(
            "Ollama client initialized (embed: {}, generate: {}, vision: {})",
            config.llm.embed_model,
            config.llm.generate_model,
            config.llm.vision_model
        );

        let embedder = Arc::new(OllamaEmbedder::new(ollama.clone(), &config.llm));
        let llm = Arc::new(OllamaLlm::new(ollama, &config.llm));

        let vectors = Arc::new(QdrantStore::new(&config.vector_db, config.llm.timeout_secs)?);
        tracing::info!("Qdrant store initialized at {}", config.vector_db.url);

        let chunker = TextChunker::new(config.chunking.chunk_size, config.chunking.chunk_overlap);

        let orchestrator = Arc::new(QueryOrchestrator::new(
            store.clone(),
            Arc::new(PdfLoader),
            embedder,
            llm.clone(),
            vectors,
            chunker,
            config.llm.top_k,
        ));

        let vision = Arc::new(VisionExtractor::new(llm));

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                orchestrator,
                vision,
            }),
        })
    }

    /// Build state from injected parts (for testing)
    #[cfg(test)]
    pub(crate) fn for_tests(
        config: DocQueryConfig,
        store: Arc<DocumentStore>,
        loader: Arc<dyn crate::ingestion::DocumentLoader>,
        embedder: Arc<dyn crate::providers::EmbeddingProvider>,
        llm: Arc<dyn crate::providers::LlmProvider>,
        vectors: Arc<dyn crate::providers::VectorStoreProvider>,
    ) -> Self {
        let chunker = TextChunker::new(config.chunking.chunk_size, config.chunking.chunk_overlap);

        let orchestrator = Arc::new(QueryOrchestrator::new(
            store.clone(),
            loader,
            embedder,
            llm.clone(),
            vectors,
            chunker,
            config.llm.top_k,
        ));

        let vision = Arc::new(VisionExtractor::new(llm));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                orchestrator,
                vision,
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &DocQueryConfig {
        &self.inner.config
    }

    /// Get the document registry
    pub fn store(&self) -> &Arc<DocumentStore> {
        &self.inner.store
    }

    /// Get the orchestrator
    pub fn orchestrator(&self) -> &Arc<QueryOrchestrator> {
        &self.inner.orchestrator
    }

    /// Get the vision extractor
    pub fn vision(&self) -> &Arc<VisionExtractor> {
        &self.inner.vision
    }
}
