//! Chat and summary endpoints

use axum::{extract::State, Json};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{ChatRequest, ChatResponse, SummaryRequest};

/// POST /chat - answer a question grounded in one document
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    let message = request
        .current_message
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| Error::validation("current_message not provided"))?;
    let document_id = request
        .document_id
        .ok_or_else(|| Error::validation("document_id not provided"))?;

    let answer = state.orchestrator().answer(document_id, &message).await?;

    Ok(Json(ChatResponse {
        chat_response: answer,
    }))
}

/// POST /summary - summarize one document with a fixed internal prompt
pub async fn summary(
    State(state): State<AppState>,
    Json(request): Json<SummaryRequest>,
) -> Result<Json<ChatResponse>> {
    let document_id = request
        .document_id
        .ok_or_else(|| Error::validation("document_id not provided"))?;

    let answer = state.orchestrator().summarize(document_id).await?;

    Ok(Json(ChatResponse {
        chat_response: answer,
    }))
}
