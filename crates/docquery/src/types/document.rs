//! Document and chunk types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered document
///
/// Created on upload with `is_indexed = false`; the flag flips to true after
/// the first fully successful index build and never flips back (document
/// content is assumed immutable once uploaded).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Identifier assigned by the registry on creation
    pub id: i64,
    /// Location of the stored file on disk
    pub file_path: String,
    /// Filename as supplied by the uploader
    pub original_filename: String,
    /// Whether a vector namespace has been built for this document
    pub is_indexed: bool,
    /// Upload timestamp
    pub uploaded_at: DateTime<Utc>,
}

/// A text span produced by the chunker
///
/// Ephemeral: chunks live only between extraction and the vector store write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Owning document
    pub document_id: i64,
    /// Position within the document (0-based, across all pages)
    pub ordinal: u64,
    /// 1-based source page number
    pub page: u32,
    /// Chunk text
    pub content: String,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(document_id: i64, ordinal: u64, page: u32, content: impl Into<String>) -> Self {
        Self {
            document_id,
            ordinal,
            page,
            content: content.into(),
        }
    }
}
