//! Deliver command handler.
//!
//! Refines a private template through its meta template and prints the
//! encrypted result as JSON.

use super::{completion_executor, print_json, template_store};
use clap::Args;
use ideaforge_core::{config::AppConfig, AppError, AppResult};
use ideaforge_pipeline::SecurePromptDelivery;
use std::path::PathBuf;

/// Refine a private prompt and print it encrypted
#[derive(Args, Debug)]
pub struct DeliverCommand {
    /// Private prompt name (e.g., _pitch)
    pub prompt_name: String,

    /// Context the prompt is generated for
    #[arg(short, long)]
    pub generator: String,

    /// Write the payload to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl DeliverCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing deliver command");
        tracing::debug!("Deliver options: {:?}", self);

        let delivery = SecurePromptDelivery::new(
            template_store(config),
            completion_executor(config)?,
            config.pipeline_settings(),
        );

        let payload = delivery.deliver(&self.generator, &self.prompt_name).await?;

        match self.output {
            Some(ref path) => {
                let json = serde_json::to_string_pretty(&payload)
                    .map_err(|e| AppError::Serialization(e.to_string()))?;
                tokio::fs::write(path, json).await?;
                tracing::info!("Payload written to {:?}", path);
            }
            None => print_json(&payload)?,
        }

        Ok(())
    }
}
