//! Command handlers for the Ideaforge CLI.
//!
//! This module organizes all CLI commands into separate submodules, plus the
//! wiring they share.

pub mod compose;
pub mod deliver;
pub mod execute;
pub mod keygen;
pub mod run;
pub mod templates;

pub use compose::ComposeCommand;
pub use deliver::DeliverCommand;
pub use execute::ExecuteCommand;
pub use keygen::KeygenCommand;
pub use run::RunCommand;
pub use templates::TemplatesCommand;

use ideaforge_core::{config::AppConfig, AppError, AppResult};
use ideaforge_llm::{create_client, CompletionExecutor};
use ideaforge_prompt::{FsTemplateStore, SubstitutionContext, TemplateStore};
use std::sync::Arc;

/// Parse a `name=value` argument.
pub(crate) fn parse_key_value(arg: &str) -> Result<(String, String), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{}'", arg))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing name in '{}'", arg));
    }

    Ok((name.to_string(), value.to_string()))
}

/// Build a substitution context from parsed `name=value` pairs.
///
/// Values stay text; a later pair overrides an earlier one with the same name.
pub(crate) fn context_from(pairs: &[(String, String)]) -> SubstitutionContext {
    pairs
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect()
}

pub(crate) fn template_store(config: &AppConfig) -> Arc<dyn TemplateStore> {
    Arc::new(FsTemplateStore::new(config.templates_dir.clone()))
}

pub(crate) fn completion_executor(config: &AppConfig) -> AppResult<CompletionExecutor> {
    let client = create_client(&config.provider, config.endpoint.as_deref())?;
    Ok(CompletionExecutor::new(client))
}

pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> AppResult<()> {
    let json =
        serde_json::to_string_pretty(value).map_err(|e| AppError::Serialization(e.to_string()))?;
    println!("{}", json);
    Ok(())
}
