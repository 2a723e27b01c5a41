//! Mock completion provider.

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use ideaforge_core::{AppError, AppResult};
use std::sync::Mutex;

/// Mock provider for testing and offline development.
///
/// Replies with a fixed text, or echoes the prompt when none is set. Every
/// request is recorded so callers can inspect what would have been sent.
#[derive(Debug, Default)]
pub struct MockClient {
    reply: Option<String>,
    failure: Option<String>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl MockClient {
    /// Create a mock that echoes each prompt back.
    pub fn echo() -> Self {
        Self::default()
    }

    /// Create a mock that always replies with `reply`.
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            ..Self::default()
        }
    }

    /// Create a mock whose calls all fail with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of requests received so far.
    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

#[async_trait::async_trait]
impl LlmClient for MockClient {
    fn provider_name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request.clone());

        if let Some(ref message) = self.failure {
            return Err(AppError::Llm(message.clone()));
        }

        let content = self.reply.clone().unwrap_or_else(|| request.prompt.clone());
        let usage = LlmUsage::new(
            request.prompt.split_whitespace().count() as u32,
            content.split_whitespace().count() as u32,
        );

        Ok(LlmResponse {
            content,
            model: request.model.clone(),
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_echo() {
        let client = MockClient::echo();
        let response = client
            .complete(&LlmRequest::new("two words", "m"))
            .await
            .unwrap();
        assert_eq!(response.content, "two words");
        assert_eq!(response.usage.prompt_tokens, 2);
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_failing_still_records() {
        let client = MockClient::failing("backend down");
        let result = client.complete(&LlmRequest::new("p", "m")).await;
        assert!(matches!(result, Err(AppError::Llm(_))));
        assert_eq!(client.requests()[0].prompt, "p");
    }
}
