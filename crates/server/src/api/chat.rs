//! Mock seller chat.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use bookbridge_core::chat::{ChatSession, ChatThread, Message, SELLER_REPLY_DELAY};

use super::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct OpenChatRequest {
    pub listing_id: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub listing_id: String,
    pub session: ChatSession,
    pub messages: Vec<Message>,
    /// How long a UI should wait before revealing the seller's reply.
    pub reply_delay_ms: u64,
}

/// Open a conversation with a listing's seller
pub async fn open_chat(
    State(state): State<Arc<AppState>>,
    Json(body): Json<OpenChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let catalogue = state.catalogue().await;
    let listing = catalogue
        .iter()
        .find(|l| l.id == body.listing_id)
        .ok_or_else(|| ApiError::NotFound(format!("Listing {} not found", body.listing_id)))?;

    let mut thread = ChatThread::open(listing);
    thread.seller_reply();

    Ok(Json(ChatResponse {
        listing_id: thread.listing_id.clone(),
        session: thread.summary(),
        messages: thread.messages.clone(),
        reply_delay_ms: SELLER_REPLY_DELAY.as_millis() as u64,
    }))
}
