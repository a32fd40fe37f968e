//! Qdrant-backed vector store with one collection per document

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::VectorDbConfig;
use crate::error::{Error, Result};
use crate::types::Chunk;

use super::{RetrievedChunk, VectorStoreProvider};

/// Vector store backed by the Qdrant HTTP API
///
/// Namespacing: every document gets its own collection, named from its id.
/// `add_document` drops and recreates the collection before upserting, so a
/// rebuild always replaces the namespace wholesale.
pub struct QdrantStore {
    endpoint: String,
    distance: String,
    client: Client,
}

impl QdrantStore {
    /// Create a new store
    pub fn new(config: &VectorDbConfig, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: config.url.trim_end_matches('/').to_string(),
            distance: config.distance.clone(),
            client,
        })
    }

    /// Collection name for a document id
    fn collection_name(document_id: i64) -> String {
        format!("doc_{}", document_id)
    }

    /// Drop and recreate the collection for a document
    async fn recreate_collection(&self, collection: &str, vector_size: usize) -> Result<()> {
        // Delete is best-effort: a 404 here just means a first-time build
        let _ = self
            .client
            .delete(format!("{}/collections/{}", self.endpoint, collection))
            .send()
            .await
            .map_err(|e| Error::from_reqwest("qdrant", e))?;

        let response = self
            .client
            .put(format!("{}/collections/{}", self.endpoint, collection))
            .json(&json!({
                "vectors": {
                    "size": vector_size,
                    "distance": self.distance,
                }
            }))
            .send()
            .await
            .map_err(|e| Error::from_reqwest("qdrant", e))?;

        if !response.status().is_success() {
            return Err(Error::external(
                "qdrant",
                format!("collection create failed: HTTP {}", response.status()),
            ));
        }

        Ok(())
    }
}

#[async_trait]
impl VectorStoreProvider for QdrantStore {
    async fn add_document(
        &self,
        document_id: i64,
        chunks: &[Chunk],
        embeddings: &[Vec<f32>],
    ) -> Result<()> {
        if chunks.len() != embeddings.len() {
            return Err(Error::internal(format!(
                "embedding count {} doesn't match chunk count {}",
                embeddings.len(),
                chunks.len()
            )));
        }

        let vector_size = embeddings
            .first()
            .map(|e| e.len())
            .ok_or_else(|| Error::internal("cannot index a document with no chunks"))?;

        let collection = Self::collection_name(document_id);
        self.recreate_collection(&collection, vector_size).await?;

        let points: Vec<Value> = chunks
            .iter()
            .zip(embeddings.iter())
            .map(|(chunk, embedding)| {
                json!({
                    "id": chunk.ordinal,
                    "vector": embedding,
                    "payload": {
                        "content": chunk.content,
                        "page": chunk.page,
                        "ordinal": chunk.ordinal,
                    },
                })
            })
            .collect();

        let response = self
            .client
            .put(format!(
                "{}/collections/{}/points?wait=true",
                self.endpoint, collection
            ))
            .json(&json!({ "points": points }))
            .send()
            .await
            .map_err(|e| Error::from_reqwest("qdrant", e))?;

        if !response.status().is_success() {
            return Err(Error::external(
                "qdrant",
                format!("point upsert failed: HTTP {}", response.status()),
            ));
        }

        Ok(())
    }

    async fn query(
        &self,
        document_id: i64,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<RetrievedChunk>> {
        let collection = Self::collection_name(document_id);

        let response = self
            .client
            .post(format!(
                "{}/collections/{}/points/search",
                self.endpoint, collection
            ))
            .json(&json!({
                "vector": query_embedding,
                "limit": top_k,
                "with_payload": true,
            }))
            .send()
            .await
            .map_err(|e| Error::from_reqwest("qdrant", e))?;

        if !response.status().is_success() {
            return Err(Error::external(
                "qdrant",
                format!("search failed: HTTP {}", response.status()),
            ));
        }

        let parsed: Value = response
            .json()
            .await
            .map_err(|e| Error::external("qdrant", format!("bad search response: {}", e)))?;

        let hits = parsed
            .pointer("/result")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut results = Vec::with_capacity(hits.len());
        for hit in hits {
            let content = hit
                .pointer("/payload/content")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let page = hit
                .pointer("/payload/page")
                .and_then(Value::as_u64)
                .unwrap_or(0) as u32;
            let ordinal = hit
                .pointer("/payload/ordinal")
                .and_then(Value::as_u64)
                .unwrap_or_default();
            let score = hit.pointer("/score").and_then(Value::as_f64).unwrap_or(0.0) as f32;

            results.push(RetrievedChunk {
                content,
                page,
                ordinal,
                score,
            });
        }

        Ok(results)
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/collections", self.endpoint);

        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn name(&self) -> &str {
        "qdrant"
    }
}
