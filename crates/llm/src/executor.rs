//! Completion executor.
//!
//! The single boundary through which prompt text reaches the text-generation
//! backend. No retry and no timeout are applied here.

use crate::client::{LlmClient, LlmRequest};
use crate::types::GenerationConfig;
use ideaforge_core::{AppError, AppResult};
use std::sync::Arc;

/// Executes finished prompts against a completion client.
#[derive(Clone)]
pub struct CompletionExecutor {
    client: Arc<dyn LlmClient>,
}

impl CompletionExecutor {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }

    /// Provider behind this executor.
    pub fn provider_name(&self) -> &str {
        self.client.provider_name()
    }

    /// Run `prompt` on `model` and return the completion text.
    ///
    /// # Errors
    /// - [`AppError::ModelUnavailable`] if `model` is missing or blank
    /// - [`AppError::Validation`] if `config` is out of range
    /// - [`AppError::Execution`] wrapping the backend failure
    pub async fn execute(
        &self,
        prompt: &str,
        model: Option<&str>,
        config: &GenerationConfig,
    ) -> AppResult<String> {
        let model = model
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .ok_or(AppError::ModelUnavailable)?;

        config.validate()?;

        let request = LlmRequest::new(prompt, model).with_config(config);

        tracing::info!(
            provider = self.client.provider_name(),
            model,
            "Executing prompt"
        );

        let response = self
            .client
            .complete(&request)
            .await
            .map_err(|e| AppError::execution(model, e))?;

        tracing::debug!(
            "Token usage - Prompt: {}, Completion: {}, Total: {}",
            response.usage.prompt_tokens,
            response.usage.completion_tokens,
            response.usage.total_tokens
        );

        Ok(response.content)
    }
}

impl std::fmt::Debug for CompletionExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionExecutor")
            .field("provider", &self.client.provider_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MockClient;
    use std::error::Error as _;

    #[tokio::test]
    async fn test_execute_returns_completion() {
        let client = Arc::new(MockClient::replying("a solar kite"));
        let executor = CompletionExecutor::new(client.clone());

        let text = executor
            .execute("Give me an idea", Some("llama3.2"), &GenerationConfig::default())
            .await
            .unwrap();

        assert_eq!(text, "a solar kite");
        assert_eq!(client.requests()[0].model, "llama3.2");
    }

    #[tokio::test]
    async fn test_config_forwarded() {
        let client = Arc::new(MockClient::echo());
        let executor = CompletionExecutor::new(client.clone());

        executor
            .execute("p", Some("m"), &GenerationConfig::new(Some(0.3), Some(0.8)))
            .await
            .unwrap();

        let request = &client.requests()[0];
        assert_eq!(request.temperature, Some(0.3));
        assert_eq!(request.top_p, Some(0.8));
    }

    #[tokio::test]
    async fn test_missing_model() {
        let client = Arc::new(MockClient::echo());
        let executor = CompletionExecutor::new(client.clone());

        for model in [None, Some(""), Some("  ")] {
            let result = executor
                .execute("p", model, &GenerationConfig::default())
                .await;
            assert!(matches!(result, Err(AppError::ModelUnavailable)));
        }
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_config_not_sent() {
        let client = Arc::new(MockClient::echo());
        let executor = CompletionExecutor::new(client.clone());

        let result = executor
            .execute("p", Some("m"), &GenerationConfig::new(Some(2.0), None))
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_backend_failure_wrapped() {
        let executor = CompletionExecutor::new(Arc::new(MockClient::failing("backend down")));

        let err = executor
            .execute("p", Some("llama3.2"), &GenerationConfig::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Execution { ref model, .. } if model == "llama3.2"));
        assert!(err.source().unwrap().to_string().contains("backend down"));
    }
}
