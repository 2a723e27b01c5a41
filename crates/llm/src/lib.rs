//! Completion backend integration for Ideaforge.
//!
//! This crate provides a provider-agnostic abstraction over the external
//! text-generation service and the [`CompletionExecutor`] every prompt flow
//! calls through.
//!
//! # Providers
//! - **Ollama**: Local LLM runtime (default)
//! - **Mock**: Echoes prompts, for tests and offline runs
//!
//! # Example
//! ```no_run
//! use ideaforge_llm::{CompletionExecutor, GenerationConfig, OllamaClient};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let executor = CompletionExecutor::new(Arc::new(OllamaClient::new()));
//! let text = executor
//!     .execute("Hello, world!", Some("llama3.2"), &GenerationConfig::default())
//!     .await?;
//! println!("{}", text);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod executor;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use executor::CompletionExecutor;
pub use factory::create_client;
pub use providers::{MockClient, OllamaClient};
pub use types::GenerationConfig;
