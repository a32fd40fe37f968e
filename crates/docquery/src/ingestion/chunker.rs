//! Character-window text chunking

use crate::types::Chunk;

/// Text chunker with configurable size and overlap
///
/// Splits on character counts only; with overlap 0 a text of L characters
/// yields ceil(L / chunk_size) chunks, each at most chunk_size characters,
/// in original order.
pub struct TextChunker {
    /// Maximum chunk size in characters
    chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    overlap: usize,
}

impl TextChunker {
    /// Create a new chunker
    ///
    /// Overlap is clamped below chunk_size so the window always advances.
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            overlap: overlap.min(chunk_size - 1),
        }
    }

    /// Chunk a sequence of pages into ordered chunks
    ///
    /// Ordinals run across the whole document, pages are never merged.
    pub fn chunk_pages(&self, document_id: i64, pages: &[String]) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut ordinal = 0u64;

        for (page_idx, page) in pages.iter().enumerate() {
            for piece in self.split_text(page) {
                chunks.push(Chunk::new(document_id, ordinal, page_idx as u32 + 1, piece));
                ordinal += 1;
            }
        }

        chunks
    }

    /// Split one text into windows of at most chunk_size characters
    fn split_text(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }

        let byte_offsets: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        let total_chars = byte_offsets.len();
        let step = self.chunk_size - self.overlap;

        let mut pieces = Vec::new();
        let mut start = 0usize;

        while start < total_chars {
            let end = (start + self.chunk_size).min(total_chars);
            let byte_start = byte_offsets[start];
            let byte_end = if end == total_chars {
                text.len()
            } else {
                byte_offsets[end]
            };

            pieces.push(text[byte_start..byte_end].to_string());

            if end == total_chars {
                break;
            }
            start += step;
        }

        pieces
    }
}
