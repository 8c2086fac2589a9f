//! AI librarian handlers.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use bookbridge_core::librarian::SUGGESTED_QUERIES;

use super::error::ApiError;
use super::listings::ListingView;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AskResponse {
    pub message: String,
    pub recommended_book_ids: Vec<String>,
    /// Recommended listings that exist in the catalogue, in order.
    pub books: Vec<ListingView>,
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<&'static str>,
}

/// Ask the librarian about the current catalogue
pub async fn ask(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let query = body.query.trim();
    if query.is_empty() {
        return Err(ApiError::BadRequest("Query is required".to_string()));
    }

    let catalogue = state.catalogue().await;
    debug!(query, listings = catalogue.len(), "Asking librarian");
    let response = state.librarian().ask(query, &catalogue).await;

    let books = response
        .resolve(&catalogue)
        .into_iter()
        .cloned()
        .map(ListingView::from)
        .collect();
    Ok(Json(AskResponse {
        message: response.message,
        recommended_book_ids: response.recommended_book_ids,
        books,
    }))
}

/// Starter queries for the librarian widget
pub async fn suggestions() -> Json<SuggestionsResponse> {
    Json(SuggestionsResponse {
        suggestions: SUGGESTED_QUERIES.to_vec(),
    })
}
