//! Run command handler.

use super::{completion_executor, context_from, parse_key_value, template_store};
use clap::Args;
use ideaforge_core::{config::AppConfig, AppResult};
use ideaforge_pipeline::TemplateFlow;

/// Run a single template
#[derive(Args, Debug)]
pub struct RunCommand {
    /// Template key (e.g., names for names.prompt)
    pub template: String,

    /// Scalar parameter (name=value, repeatable)
    #[arg(long = "param", value_parser = parse_key_value)]
    pub params: Vec<(String, String)>,

    /// Print the resolved prompt without executing it
    #[arg(long)]
    pub dry_run: bool,
}

impl RunCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing run command");
        tracing::debug!("Run options: {:?}", self);

        let flow = TemplateFlow::new(
            template_store(config),
            completion_executor(config)?,
            config.pipeline_settings(),
        );

        let params = context_from(&self.params);

        let text = if self.dry_run {
            flow.render(&self.template, &params).await?
        } else {
            flow.run(&self.template, &params).await?
        };

        println!("{}", text);
        Ok(())
    }
}
