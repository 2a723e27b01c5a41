//! Single-template flows.
//!
//! Most product flows forward user input into one template and return the
//! model's text. They share the composite resolver's failure policy: every
//! error propagates.

use ideaforge_core::{AppError, AppResult, PipelineSettings};
use ideaforge_llm::{CompletionExecutor, GenerationConfig};
use ideaforge_prompt::{
    placeholders, substitute_scalars, template_file_name, SubstitutionContext, Template,
    TemplateStore,
};
use std::sync::Arc;

/// Runs one named template with scalar parameters.
pub struct TemplateFlow {
    store: Arc<dyn TemplateStore>,
    executor: CompletionExecutor,
    settings: PipelineSettings,
}

impl TemplateFlow {
    pub fn new(
        store: Arc<dyn TemplateStore>,
        executor: CompletionExecutor,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            store,
            executor,
            settings,
        }
    }

    /// Resolve template `key` with `params` without executing it.
    pub async fn render(&self, key: &str, params: &SubstitutionContext) -> AppResult<String> {
        let (_, prompt) = self.prepare(key, params).await?;
        Ok(prompt)
    }

    /// Resolve template `key` with `params` and execute it.
    pub async fn run(&self, key: &str, params: &SubstitutionContext) -> AppResult<String> {
        let (config, prompt) = self.prepare(key, params).await?;
        let model = self.settings.resolve_model()?;

        self.executor.execute(&prompt, Some(model), &config).await
    }

    async fn prepare(
        &self,
        key: &str,
        params: &SubstitutionContext,
    ) -> AppResult<(GenerationConfig, String)> {
        let template = self.store.load(&template_file_name(key)).await?;
        let config = generation_for(&template)?;
        let prompt = substitute_scalars(template.body(), params);

        if prompt.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "Template '{}' resolved to an empty prompt",
                template.identifier
            )));
        }

        let unresolved = placeholders(&prompt);
        if !unresolved.is_empty() {
            tracing::debug!("Unresolved placeholders in {}: {:?}", key, unresolved);
        }

        Ok((config, prompt))
    }
}

/// Sampling parameters declared in a template's frontmatter.
///
/// # Errors
/// [`AppError::Serialization`] if the frontmatter block is not valid YAML.
pub(crate) fn generation_for(template: &Template) -> AppResult<GenerationConfig> {
    let meta = template.metadata()?;

    Ok(meta
        .config
        .map(|hints| GenerationConfig::new(hints.temperature, hints.top_p))
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ideaforge_llm::MockClient;
    use ideaforge_prompt::MemoryTemplateStore;

    fn settings() -> PipelineSettings {
        PipelineSettings::new(Some("llama3.2".to_string()), None)
    }

    fn flow_with(store: MemoryTemplateStore, client: Arc<MockClient>) -> TemplateFlow {
        TemplateFlow::new(
            Arc::new(store),
            CompletionExecutor::new(client),
            settings(),
        )
    }

    #[tokio::test]
    async fn test_run_substitutes_and_executes() {
        let store = MemoryTemplateStore::new().with(
            "names.prompt",
            "---\nconfig:\n  temperature: 0.9\n---\nName ideas for {{product}}",
        );
        let client = Arc::new(MockClient::replying("Kitewatt"));
        let flow = flow_with(store, client.clone());

        let params = SubstitutionContext::new().with("product", "a solar kite");
        assert_eq!(flow.run("names", &params).await.unwrap(), "Kitewatt");

        let request = &client.requests()[0];
        assert_eq!(request.prompt, "Name ideas for a solar kite");
        assert_eq!(request.temperature, Some(0.9));
    }

    #[tokio::test]
    async fn test_render_does_not_execute() {
        let store = MemoryTemplateStore::new().with("names.prompt", "Names for {{product}}");
        let client = Arc::new(MockClient::echo());
        let flow = flow_with(store, client.clone());

        let prompt = flow
            .render("names", &SubstitutionContext::new())
            .await
            .unwrap();
        assert_eq!(prompt, "Names for {{product}}");
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_template_is_fatal() {
        let flow = flow_with(MemoryTemplateStore::new(), Arc::new(MockClient::echo()));

        let result = flow.run("absent", &SubstitutionContext::new()).await;
        assert!(matches!(
            result,
            Err(AppError::TemplateRead { ref name, .. }) if name == "absent.prompt"
        ));
    }

    #[tokio::test]
    async fn test_missing_model_is_config_error() {
        let store = Arc::new(MemoryTemplateStore::new().with("names.prompt", "Names"));
        let client = Arc::new(MockClient::echo());
        let flow = TemplateFlow::new(
            store,
            CompletionExecutor::new(client.clone()),
            PipelineSettings::default(),
        );

        let result = flow.run("names", &SubstitutionContext::new()).await;
        assert!(matches!(result, Err(AppError::Config(_))));
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unreadable_frontmatter_is_fatal() {
        let store = MemoryTemplateStore::new()
            .with("names.prompt", "---\nconfig: [unclosed\n---\nNames for {{product}}");
        let client = Arc::new(MockClient::echo());
        let flow = flow_with(store, client.clone());

        let params = SubstitutionContext::new().with("product", "kites");
        assert!(matches!(
            flow.run("names", &params).await,
            Err(AppError::Serialization(_))
        ));
        assert!(matches!(
            flow.render("names", &params).await,
            Err(AppError::Serialization(_))
        ));
        assert_eq!(client.call_count(), 0);
    }

    #[test]
    fn test_generation_for_reads_hints() {
        let template = Template::new("x.prompt", "---\nconfig:\n  topP: 0.5\n---\nbody");
        assert_eq!(
            generation_for(&template).unwrap(),
            GenerationConfig::new(None, Some(0.5))
        );

        let plain = Template::new("y.prompt", "body");
        assert_eq!(generation_for(&plain).unwrap(), GenerationConfig::default());
    }
}
