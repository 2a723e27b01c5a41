//! Completion provider factory.
//!
//! Builds a client for the configured provider name and endpoint.

use crate::client::LlmClient;
use crate::providers::{MockClient, OllamaClient, DEFAULT_OLLAMA_URL};
use ideaforge_core::{AppError, AppResult};
use std::sync::Arc;

/// Create a completion client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("ollama", or "mock" to echo prompts offline)
/// * `endpoint` - Optional custom endpoint URL
///
/// # Errors
/// [`AppError::Config`] if the provider is unknown.
pub fn create_client(provider: &str, endpoint: Option<&str>) -> AppResult<Arc<dyn LlmClient>> {
    match provider.to_lowercase().as_str() {
        "ollama" => {
            let base_url = endpoint.unwrap_or(DEFAULT_OLLAMA_URL);
            tracing::debug!("Using Ollama at {}", base_url);
            Ok(Arc::new(OllamaClient::with_base_url(base_url)))
        }
        "mock" => {
            tracing::warn!("Using mock provider: prompts are echoed, not generated");
            Ok(Arc::new(MockClient::echo()))
        }
        _ => Err(AppError::Config(format!(
            "Unknown provider: {}. Supported: ollama, mock",
            provider
        ))),
    }
}
