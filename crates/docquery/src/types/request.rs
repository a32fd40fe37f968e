//! Request body types

use serde::{Deserialize, Serialize};

/// Body of `POST /chat`
///
/// Both fields are optional at the serde level so that a missing field
/// produces a 400 with a message naming the field, not a deserialization
/// rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's question
    pub current_message: Option<String>,
    /// Target document
    pub document_id: Option<i64>,
}

/// Body of `POST /summary`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRequest {
    /// Target document
    pub document_id: Option<i64>,
}
