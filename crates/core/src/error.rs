//! Error types for Ideaforge.
//!
//! This module defines a unified error enum covering every failure category
//! of the prompt pipeline: configuration, template reads, validation,
//! authenticated decryption, and completion execution.

use thiserror::Error;

/// Unified error type for Ideaforge.
///
/// All fallible functions in the workspace return `Result<T, AppError>`.
/// Wrapping variants keep the underlying cause reachable through
/// [`std::error::Error::source`].
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or unusable process configuration (key, model, provider)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A template could not be read from the store
    #[error("Failed to read template '{name}': {source}")]
    TemplateRead {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// Malformed input, naming-convention violations, empty resolved prompts
    #[error("Validation error: {0}")]
    Validation(String),

    /// AEAD tag verification failed
    #[error("Authentication failed: ciphertext or tag did not verify")]
    Authentication,

    /// Symmetric key of the wrong length
    #[error("Invalid key: expected 32 bytes, got {len}")]
    InvalidKey { len: usize },

    /// No model identifier was resolved for a completion call
    #[error("No model identifier resolved for completion")]
    ModelUnavailable,

    /// The completion backend failed while executing a prompt
    #[error("Completion with model '{model}' failed: {source}")]
    Execution {
        model: String,
        #[source]
        source: Box<AppError>,
    },

    /// LLM provider transport errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AppError {
    /// Wrap a backend failure for the given model.
    pub fn execution(model: impl Into<String>, source: AppError) -> Self {
        AppError::Execution {
            model: model.into(),
            source: Box::new(source),
        }
    }

    /// Build a template read failure naming the file that could not be read.
    pub fn template_read(name: impl Into<String>, source: std::io::Error) -> Self {
        AppError::TemplateRead {
            name: name.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
