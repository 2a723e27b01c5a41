//! Templates command handler.
//!
//! Lists the templates in the configured directory.

use super::{print_json, template_store};
use clap::Args;
use ideaforge_core::{config::AppConfig, AppResult};
use ideaforge_prompt::TEMPLATE_EXTENSION;

/// List available templates
#[derive(Args, Debug)]
pub struct TemplatesCommand {
    /// Show each template's description from its frontmatter
    #[arg(short, long)]
    pub detailed: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl TemplatesCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing templates command");

        let store = template_store(config);
        let names = store.list().await?;

        let mut entries = Vec::with_capacity(names.len());
        for name in names {
            let key = name
                .strip_suffix(&format!(".{}", TEMPLATE_EXTENSION))
                .unwrap_or(&name)
                .to_string();

            let description = if self.detailed || self.json {
                let template = store.load(&name).await?;
                template.metadata().ok().and_then(|meta| meta.description)
            } else {
                None
            };

            entries.push((key, description));
        }

        if self.json {
            let output: Vec<_> = entries
                .iter()
                .map(|(key, description)| {
                    serde_json::json!({ "key": key, "description": description })
                })
                .collect();
            return print_json(&output);
        }

        if entries.is_empty() {
            println!("No templates found in {:?}", config.templates_dir);
            return Ok(());
        }

        for (key, description) in entries {
            match description {
                Some(description) => println!("{:<24} {}", key, description),
                None => println!("{}", key),
            }
        }

        Ok(())
    }
}
