//! Response body types

use serde::{Deserialize, Serialize};

/// Response of `POST /upload`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Identifier of the created document record
    pub file_id: i64,
}

/// Response of `POST /convert` for non-image files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertResponse {
    /// Page-level extracted text, in document order
    pub file_content: Vec<String>,
}

/// Structured result of vision-model text extraction from an image
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageExtraction {
    /// Recognized textual content
    pub image_content: String,
}

/// Response of `POST /chat` and `POST /summary`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Generated answer text
    pub chat_response: String,
}
