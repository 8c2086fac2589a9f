//! Librarian - natural-language book recommendations.
//!
//! A query plus the listings currently on screen go in; a friendly message
//! and the ids of listings worth a look come out. The call never fails:
//! without a model credential the [`OfflineLibrarian`] answers with a canned
//! suggestion, and any model failure degrades to [`FALLBACK_MESSAGE`].
//!
//! ```ignore
//! use bookbridge_core::librarian::create_librarian;
//!
//! let librarian = create_librarian(&config.librarian)?;
//! let response = librarian.ask("Books for JEE Advanced", &listings).await;
//! println!("{}", response.message);
//! ```

mod assistant;
mod llm;
mod offline;

pub use assistant::LlmLibrarian;
pub use llm::{CompletionRequest, CompletionResponse, GeminiClient, LlmClient, LlmError, LlmUsage};
pub use offline::OfflineLibrarian;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::LibrarianConfig;
use crate::listing::Listing;

/// Answer shown when no model credential is configured.
pub const OFFLINE_MESSAGE: &str = "I'm currently in offline demo mode. Based on your query, I'd suggest checking out HC Verma for physics or Laxmikanth for polity if you are preparing for exams!";

/// Listing ids recommended in offline mode.
pub const OFFLINE_RECOMMENDATIONS: [&str; 2] = ["l1", "l2"];

/// Answer shown when the model call fails for any reason.
pub const FALLBACK_MESSAGE: &str = "I'm having trouble connecting to the library network right now. Please try searching manually.";

/// Starter prompts offered next to the chat box.
pub const SUGGESTED_QUERIES: [&str; 4] = [
    "Books for JEE Advanced",
    "UPSC Prelims History",
    "Second hand novels near me",
    "Class 10 Reference Books",
];

/// What the librarian says back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibrarianResponse {
    pub message: String,
    #[serde(default)]
    pub recommended_book_ids: Vec<String>,
}

impl LibrarianResponse {
    pub fn offline() -> Self {
        Self {
            message: OFFLINE_MESSAGE.to_string(),
            recommended_book_ids: OFFLINE_RECOMMENDATIONS
                .iter()
                .map(|id| id.to_string())
                .collect(),
        }
    }

    pub fn fallback() -> Self {
        Self {
            message: FALLBACK_MESSAGE.to_string(),
            recommended_book_ids: Vec::new(),
        }
    }

    /// Recommended listings that exist in `listings`, in recommendation order.
    pub fn resolve<'a>(&self, listings: &'a [Listing]) -> Vec<&'a Listing> {
        self.recommended_book_ids
            .iter()
            .filter_map(|id| listings.iter().find(|l| &l.id == id))
            .collect()
    }
}

/// Something that can answer a shopper's question.
#[async_trait]
pub trait Librarian: Send + Sync {
    /// "offline" or the model provider name.
    fn mode(&self) -> &str;

    /// Answer `query` using `listings` as the catalogue. Never fails.
    async fn ask(&self, query: &str, listings: &[Listing]) -> LibrarianResponse;
}

/// Build the librarian described by `config`.
///
/// A missing or blank API key selects the offline librarian.
pub fn create_librarian(config: &LibrarianConfig) -> Result<Arc<dyn Librarian>, LlmError> {
    match config.credential() {
        None => {
            info!("No librarian API key configured, using offline mode");
            Ok(Arc::new(OfflineLibrarian::new(Duration::from_millis(
                config.offline_latency_ms,
            ))))
        }
        Some(api_key) => {
            let mut client = GeminiClient::new(api_key, &config.model)
                .with_timeout(Duration::from_secs(config.timeout_secs))?;
            if let Some(api_base) = &config.api_base {
                client = client.with_api_base(api_base);
            }
            info!("Librarian using {} model {}", client.provider(), client.model());
            Ok(Arc::new(LlmLibrarian::with_settings(
                Arc::new(client),
                config.max_tokens,
                config.temperature,
            )))
        }
    }
}
