//! Model-backed librarian.
//!
//! Describes every listing on one line, wraps the lines and the shopper's
//! question in the librarian persona, and asks the model for a JSON answer.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error};

use super::llm::{CompletionRequest, LlmClient};
use super::{Librarian, LibrarianResponse};
use crate::listing::Listing;
use crate::metrics::{LIBRARIAN_REQUESTS, LLM_TOKENS};

/// Librarian that asks a generative model.
///
/// Generic over the client so tests can substitute a mock.
pub struct LlmLibrarian<C: LlmClient> {
    client: Arc<C>,
    max_tokens: u32,
    temperature: f32,
}

impl<C: LlmClient> LlmLibrarian<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self::with_settings(client, 1024, 0.7)
    }

    pub fn with_settings(client: Arc<C>, max_tokens: u32, temperature: f32) -> Self {
        Self {
            client,
            max_tokens,
            temperature,
        }
    }

    /// One line per listing: id, title, author, exams, price, condition.
    fn describe_listings(listings: &[Listing]) -> String {
        listings
            .iter()
            .map(|l| {
                let exams = l
                    .tags
                    .iter()
                    .map(|t| t.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!(
                    "ID: {}, Title: {}, Author: {}, Exam: {}, Price: {}, Condition: {}",
                    l.id, l.title, l.author, exams, l.price, l.condition
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn build_system_prompt(query: &str, listings: &[Listing]) -> String {
        format!(
            r#"You are 'BookBridge Librarian', a helpful, Indian-English speaking assistant for a used book marketplace.
Your goal is to help students find books for exams (JEE, NEET, UPSC) or leisure.

Current available listings:
{listings}

User Query: "{query}"

1. Answer the user in a friendly, concise manner.
2. If any listings match, recommend them.
3. Return your response in strictly VALID JSON format:
{{
  "message": "Your text response here...",
  "recommendedBookIds": ["id1", "id2"]
}}
Do not use markdown code blocks for the JSON. Just return the JSON string."#,
            listings = Self::describe_listings(listings),
            query = query,
        )
    }
}

#[async_trait]
impl<C: LlmClient + 'static> Librarian for LlmLibrarian<C> {
    fn mode(&self) -> &str {
        self.client.provider()
    }

    async fn ask(&self, query: &str, listings: &[Listing]) -> LibrarianResponse {
        let request = CompletionRequest::new(query)
            .with_system(Self::build_system_prompt(query, listings))
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature)
            .with_json_output();

        debug!(
            "Asking librarian model: query='{}', listings={}",
            query,
            listings.len()
        );

        match self.client.complete_json::<LibrarianResponse>(request).await {
            Ok((response, usage)) => {
                let provider = self.client.provider();
                LLM_TOKENS
                    .with_label_values(&[provider, "input"])
                    .inc_by(u64::from(usage.input_tokens));
                LLM_TOKENS
                    .with_label_values(&[provider, "output"])
                    .inc_by(u64::from(usage.output_tokens));
                LIBRARIAN_REQUESTS.with_label_values(&["answered"]).inc();
                response
            }
            Err(e) => {
                error!("Librarian model error: {}", e);
                LIBRARIAN_REQUESTS.with_label_values(&["fallback"]).inc();
                LibrarianResponse::fallback()
            }
        }
    }
}
