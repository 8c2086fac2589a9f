//! Mock generative model client for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::librarian::{CompletionRequest, CompletionResponse, LlmClient, LlmError, LlmUsage};

/// Mock implementation of the LlmClient trait.
///
/// Replies are queued with [`push_text`](Self::push_text) or
/// [`push_error`](Self::push_error) and consumed in order. An empty queue
/// answers with an empty text, which callers treat as a failed completion.
#[derive(Debug, Clone, Default)]
pub struct MockLlmClient {
    replies: Arc<RwLock<VecDeque<Result<String, LlmError>>>>,
    requests: Arc<RwLock<Vec<CompletionRequest>>>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful completion.
    pub async fn push_text(&self, text: &str) {
        self.replies.write().await.push_back(Ok(text.to_string()));
    }

    /// Queue a failed completion.
    pub async fn push_error(&self, error: LlmError) {
        self.replies.write().await.push_back(Err(error));
    }

    /// Requests received so far, oldest first.
    pub async fn recorded_requests(&self) -> Vec<CompletionRequest> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    fn provider(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let output_tokens = request.max_tokens.min(32);
        let input_tokens = (request.prompt.len() / 4) as u32;
        self.requests.write().await.push(request);

        let text = self
            .replies
            .write()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))?;

        Ok(CompletionResponse {
            text,
            usage: LlmUsage {
                input_tokens,
                output_tokens,
            },
            model: "mock-model".to_string(),
        })
    }
}
