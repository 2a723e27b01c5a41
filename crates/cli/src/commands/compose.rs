//! Compose command handler.
//!
//! Resolves a chain of interdependent templates into one prompt.

use super::{completion_executor, context_from, parse_key_value, template_store};
use clap::Args;
use ideaforge_core::{config::AppConfig, AppResult};
use ideaforge_pipeline::{CompositeChain, CompositeResolver};

/// Resolve a chain of templates into one prompt and run it
#[derive(Args, Debug)]
pub struct ComposeCommand {
    /// Scalar parameter (name=value, repeatable)
    #[arg(long = "param", value_parser = parse_key_value)]
    pub params: Vec<(String, String)>,

    /// Template key taking part in the chain (repeatable; default: idea, scoring, result)
    #[arg(long = "template")]
    pub templates: Vec<String>,

    /// Template key whose resolved text is executed
    #[arg(long = "final", default_value = "result")]
    pub final_key: String,

    /// Print the resolved prompt without executing it
    #[arg(long)]
    pub dry_run: bool,
}

impl ComposeCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing compose command");
        tracing::debug!("Compose options: {:?}", self);

        let chain = if self.templates.is_empty() {
            CompositeChain::default()
        } else {
            CompositeChain::new(self.templates.clone(), self.final_key.as_str())?
        };

        let resolver = CompositeResolver::new(
            template_store(config),
            completion_executor(config)?,
            config.pipeline_settings(),
        )
        .with_chain(chain);

        let params = context_from(&self.params);

        let text = if self.dry_run {
            resolver.resolve_prompt(&params).await?
        } else {
            resolver.resolve(&params).await?
        };

        println!("{}", text);
        Ok(())
    }
}
