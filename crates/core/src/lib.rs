//! Ideaforge Core Library
//!
//! This crate provides the foundational utilities shared by every Ideaforge crate:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management, including the explicit `PipelineSettings`
//!   handed to each prompt orchestrator

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::{AppConfig, PipelineSettings, PromptKey};
pub use error::{AppError, AppResult};
