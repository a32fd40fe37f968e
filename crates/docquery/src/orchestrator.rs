//! Indexing orchestration and retrieval-conditioned answering
//!
//! Per document the orchestrator runs a two-state machine: Unindexed
//! documents get a full load -> chunk -> embed -> store build on their first
//! chat or summary request, then the indexed flag is persisted and every
//! later request goes straight to retrieval + generation. Builds are
//! serialized per document id; concurrent first-requests wait for the
//! in-flight build instead of starting a redundant one.

use dashmap::DashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::{Error, Result};
use crate::generation::PromptBuilder;
use crate::ingestion::{DocumentLoader, TextChunker};
use crate::providers::{EmbeddingProvider, LlmProvider, VectorStoreProvider};
use crate::storage::DocumentStore;
use crate::types::Document;

/// Coordinates index builds and answers questions against indexed documents
pub struct QueryOrchestrator {
    store: Arc<DocumentStore>,
    loader: Arc<dyn DocumentLoader>,
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LlmProvider>,
    vectors: Arc<dyn VectorStoreProvider>,
    chunker: TextChunker,
    top_k: usize,
    /// One build lock per document id; entries are never removed since
    /// documents are never deleted
    build_locks: DashMap<i64, Arc<Mutex<()>>>,
}

impl QueryOrchestrator {
    /// Create a new orchestrator
    pub fn new(
        store: Arc<DocumentStore>,
        loader: Arc<dyn DocumentLoader>,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
        vectors: Arc<dyn VectorStoreProvider>,
        chunker: TextChunker,
        top_k: usize,
    ) -> Self {
        Self {
            store,
            loader,
            embedder,
            llm,
            vectors,
            chunker,
            top_k,
            build_locks: DashMap::new(),
        }
    }

    /// Answer a question against a document, indexing it first if needed
    pub async fn answer(&self, document_id: i64, question: &str) -> Result<String> {
        let document = self
            .store
            .get(document_id)?
            .ok_or_else(|| Error::not_found("file id not found"))?;

        self.ensure_indexed(&document).await?;

        let query_embedding = self.embedder.embed(question).await?;
        let passages = self
            .vectors
            .query(document_id, &query_embedding, self.top_k)
            .await?;

        let context = PromptBuilder::build_context(&passages);
        let prompt = PromptBuilder::build_chat_prompt(question, &context);

        self.llm.generate(&prompt).await
    }

    /// Summarize a document via the same retrieval + generation path
    pub async fn summarize(&self, document_id: i64) -> Result<String> {
        self.answer(document_id, PromptBuilder::summary_question())
            .await
    }

    /// Make sure the document's vector namespace exists
    ///
    /// The indexed flag is committed only after the vector store write
    /// succeeds; a partial build leaves the document Unindexed so the next
    /// request retries from scratch.
    async fn ensure_indexed(&self, document: &Document) -> Result<()> {
        if document.is_indexed {
            return Ok(());
        }

        let lock = self
            .build_locks
            .entry(document.id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        // Another request may have finished the build while we waited
        if let Some(current) = self.store.get(document.id)? {
            if current.is_indexed {
                return Ok(());
            }
        }

        self.build_index(document).await?;
        self.store.mark_indexed(document.id)?;

        tracing::info!("Document {} indexed", document.id);
        Ok(())
    }

    /// Full build: load -> chunk -> embed -> store
    async fn build_index(&self, document: &Document) -> Result<()> {
        let pages = self
            .loader
            .load_pages(Path::new(&document.file_path))
            .await?;

        let chunks = self.chunker.chunk_pages(document.id, &pages);
        if chunks.is_empty() {
            return Err(Error::file_parse(
                &document.original_filename,
                "no text to index",
            ));
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        self.vectors
            .add_document(document.id, &chunks, &embeddings)
            .await?;

        tracing::debug!(
            "Built vector namespace for document {} ({} chunks, {} pages)",
            document.id,
            chunks.len(),
            pages.len()
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex as SyncMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::providers::RetrievedChunk;
    use crate::types::Chunk;

    struct CountingLoader {
        pages: Vec<String>,
        calls: AtomicUsize,
        delay: Option<Duration>,
    }

    impl CountingLoader {
        fn new(pages: Vec<&str>) -> Self {
            Self {
                pages: pages.into_iter().map(String::from).collect(),
                calls: AtomicUsize::new(0),
                delay: None,
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DocumentLoader for CountingLoader {
        async fn load_pages(&self, _path: &Path) -> Result<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            Ok(self.pages.clone())
        }
    }

    struct FakeEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FakeEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let sum: u32 = text.bytes().map(u32::from).sum();
            Ok(vec![text.len() as f32, sum as f32])
        }

        fn dimensions(&self) -> usize {
            2
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "fake-embedder"
        }
    }

    /// Echoes the context block back, or declines when it is empty
    struct FakeLlm {
        last_prompt: SyncMutex<String>,
    }

    impl FakeLlm {
        fn new() -> Self {
            Self {
                last_prompt: SyncMutex::new(String::new()),
            }
        }

        fn context_of(prompt: &str) -> String {
            let start = prompt.find("<context>").map(|i| i + "<context>".len());
            let end = prompt.find("</context>");
            match (start, end) {
                (Some(s), Some(e)) if s <= e => prompt[s..e].trim().to_string(),
                _ => String::new(),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for FakeLlm {
        async fn generate(&self, prompt: &str) -> Result<String> {
            *self.last_prompt.lock() = prompt.to_string();
            let context = Self::context_of(prompt);
            if context.is_empty() {
                Ok("I don't know".to_string())
            } else {
                Ok(context)
            }
        }

        async fn generate_with_images(&self, _prompt: &str, _images: &[String]) -> Result<String> {
            Ok(String::new())
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "fake-llm"
        }

        fn model(&self) -> &str {
            "fake"
        }
    }

    struct MemoryVectorStore {
        collections: DashMap<i64, Vec<(Vec<f32>, Chunk)>>,
    }

    impl MemoryVectorStore {
        fn new() -> Self {
            Self {
                collections: DashMap::new(),
            }
        }

        fn cosine(a: &[f32], b: &[f32]) -> f32 {
            let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
            let na: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
            let nb: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
            if na == 0.0 || nb == 0.0 {
                0.0
            } else {
                dot / (na * nb)
            }
        }
    }

    #[async_trait]
    impl VectorStoreProvider for MemoryVectorStore {
        async fn add_document(
            &self,
            document_id: i64,
            chunks: &[Chunk],
            embeddings: &[Vec<f32>],
        ) -> Result<()> {
            let points = embeddings
                .iter()
                .cloned()
                .zip(chunks.iter().cloned())
                .collect();
            self.collections.insert(document_id, points);
            Ok(())
        }

        async fn query(
            &self,
            document_id: i64,
            query_embedding: &[f32],
            top_k: usize,
        ) -> Result<Vec<RetrievedChunk>> {
            let Some(points) = self.collections.get(&document_id) else {
                return Ok(Vec::new());
            };

            let mut scored: Vec<(f32, Chunk)> = points
                .iter()
                .map(|(v, c)| (Self::cosine(query_embedding, v), c.clone()))
                .collect();
            scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap());

            Ok(scored
                .into_iter()
                .take(top_k)
                .map(|(score, chunk)| RetrievedChunk {
                    content: chunk.content,
                    page: chunk.page,
                    ordinal: chunk.ordinal,
                    score,
                })
                .collect())
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "memory"
        }
    }

    /// Accepts nothing: every write fails like an unreachable backend
    struct FailingVectorStore;

    #[async_trait]
    impl VectorStoreProvider for FailingVectorStore {
        async fn add_document(&self, _: i64, _: &[Chunk], _: &[Vec<f32>]) -> Result<()> {
            Err(Error::external("qdrant", "connection refused"))
        }

        async fn query(&self, _: i64, _: &[f32], _: usize) -> Result<Vec<RetrievedChunk>> {
            Err(Error::external("qdrant", "connection refused"))
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(false)
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    /// Stores fine but never finds anything
    struct EmptyVectorStore;

    #[async_trait]
    impl VectorStoreProvider for EmptyVectorStore {
        async fn add_document(&self, _: i64, _: &[Chunk], _: &[Vec<f32>]) -> Result<()> {
            Ok(())
        }

        async fn query(&self, _: i64, _: &[f32], _: usize) -> Result<Vec<RetrievedChunk>> {
            Ok(Vec::new())
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "empty"
        }
    }

    fn orchestrator_with(
        store: Arc<DocumentStore>,
        loader: Arc<CountingLoader>,
        llm: Arc<FakeLlm>,
        vectors: Arc<dyn VectorStoreProvider>,
    ) -> QueryOrchestrator {
        QueryOrchestrator::new(
            store,
            loader,
            Arc::new(FakeEmbedder),
            llm,
            vectors,
            TextChunker::new(1000, 0),
            10,
        )
    }

    #[tokio::test]
    async fn first_request_builds_second_skips_loader() {
        let store = Arc::new(DocumentStore::in_memory().unwrap());
        let id = store.insert("uploads/a.pdf", "a.pdf").unwrap();

        let loader = Arc::new(CountingLoader::new(vec!["the sky is blue"]));
        let orchestrator = orchestrator_with(
            store.clone(),
            loader.clone(),
            Arc::new(FakeLlm::new()),
            Arc::new(MemoryVectorStore::new()),
        );

        orchestrator.answer(id, "what color is the sky?").await.unwrap();
        assert!(store.get(id).unwrap().unwrap().is_indexed);

        orchestrator.answer(id, "what color is the sky?").await.unwrap();
        assert_eq!(loader.call_count(), 1);
    }

    #[tokio::test]
    async fn concurrent_first_requests_build_once() {
        let store = Arc::new(DocumentStore::in_memory().unwrap());
        let id = store.insert("uploads/a.pdf", "a.pdf").unwrap();

        let loader = Arc::new(
            CountingLoader::new(vec!["slow document"]).with_delay(Duration::from_millis(50)),
        );
        let orchestrator = Arc::new(orchestrator_with(
            store,
            loader.clone(),
            Arc::new(FakeLlm::new()),
            Arc::new(MemoryVectorStore::new()),
        ));

        let a = {
            let o = orchestrator.clone();
            tokio::spawn(async move { o.answer(id, "first?").await })
        };
        let b = {
            let o = orchestrator.clone();
            tokio::spawn(async move { o.answer(id, "second?").await })
        };

        let (ra, rb) = futures::future::join(a, b).await;
        ra.unwrap().unwrap();
        rb.unwrap().unwrap();

        assert_eq!(loader.call_count(), 1);
    }

    #[tokio::test]
    async fn queries_never_leak_across_documents() {
        let store = Arc::new(DocumentStore::in_memory().unwrap());
        let id_a = store.insert("uploads/a.pdf", "a.pdf").unwrap();
        let id_b = store.insert("uploads/b.pdf", "b.pdf").unwrap();

        let vectors = Arc::new(MemoryVectorStore::new());
        let llm = Arc::new(FakeLlm::new());

        let orchestrator_a = orchestrator_with(
            store.clone(),
            Arc::new(CountingLoader::new(vec!["penguins live in antarctica"])),
            llm.clone(),
            vectors.clone(),
        );
        let orchestrator_b = orchestrator_with(
            store.clone(),
            Arc::new(CountingLoader::new(vec!["rust has a borrow checker"])),
            llm.clone(),
            vectors.clone(),
        );

        orchestrator_a.answer(id_a, "where do penguins live?").await.unwrap();
        let answer_b = orchestrator_b
            .answer(id_b, "where do penguins live?")
            .await
            .unwrap();

        // Document B's namespace only holds B's content, however the
        // question ranks against it
        assert!(answer_b.contains("borrow checker"));
        assert!(!answer_b.contains("penguins"));
    }

    #[tokio::test]
    async fn failed_store_write_leaves_flag_unset() {
        let store = Arc::new(DocumentStore::in_memory().unwrap());
        let id = store.insert("uploads/a.pdf", "a.pdf").unwrap();

        let loader = Arc::new(CountingLoader::new(vec!["some content"]));
        let orchestrator = orchestrator_with(
            store.clone(),
            loader.clone(),
            Arc::new(FakeLlm::new()),
            Arc::new(FailingVectorStore),
        );

        let err = orchestrator.answer(id, "anything?").await.unwrap_err();
        assert!(matches!(err, Error::ExternalService { .. }));
        assert!(!store.get(id).unwrap().unwrap().is_indexed);

        // The next request retries the build from scratch
        let _ = orchestrator.answer(id, "anything?").await;
        assert_eq!(loader.call_count(), 2);
    }

    #[tokio::test]
    async fn unknown_document_is_not_found() {
        let store = Arc::new(DocumentStore::in_memory().unwrap());
        let orchestrator = orchestrator_with(
            store,
            Arc::new(CountingLoader::new(vec!["unused"])),
            Arc::new(FakeLlm::new()),
            Arc::new(MemoryVectorStore::new()),
        );

        let err = orchestrator.answer(999, "hello?").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn empty_retrieval_produces_the_decline_phrase() {
        let store = Arc::new(DocumentStore::in_memory().unwrap());
        let id = store.insert("uploads/a.pdf", "a.pdf").unwrap();

        let orchestrator = orchestrator_with(
            store,
            Arc::new(CountingLoader::new(vec!["content that is never retrieved"])),
            Arc::new(FakeLlm::new()),
            Arc::new(EmptyVectorStore),
        );

        let answer = orchestrator.answer(id, "anything?").await.unwrap();
        assert_eq!(answer, "I don't know");
    }

    #[tokio::test]
    async fn summary_flows_through_the_same_path() {
        let store = Arc::new(DocumentStore::in_memory().unwrap());
        let id = store.insert("uploads/a.pdf", "a.pdf").unwrap();

        let loader = Arc::new(CountingLoader::new(vec!["annual report contents"]));
        let llm = Arc::new(FakeLlm::new());
        let orchestrator = orchestrator_with(
            store.clone(),
            loader.clone(),
            llm.clone(),
            Arc::new(MemoryVectorStore::new()),
        );

        orchestrator.summarize(id).await.unwrap();

        assert_eq!(loader.call_count(), 1);
        assert!(store.get(id).unwrap().unwrap().is_indexed);
        assert!(llm
            .last_prompt
            .lock()
            .contains("Summarize the following document"));
    }
}
