//! Composite template resolution.
//!
//! A fixed set of templates is resolved in two passes. Pass 1 substitutes
//! the caller's scalar parameters into each template. Pass 2 lets templates
//! reference each other by key, in one non-recursive round. The designated
//! final template is then executed.

use crate::flow::generation_for;
use ideaforge_core::{AppError, AppResult, PipelineSettings};
use ideaforge_llm::{CompletionExecutor, GenerationConfig};
use ideaforge_prompt::{
    compose_templates, substitute_scalars, template_file_name, ResolvedTemplateMap,
    SubstitutionContext, TemplateStore,
};
use std::collections::HashSet;
use std::sync::Arc;

/// Which templates take part in a composition and which one is executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeChain {
    templates: Vec<String>,
    final_key: String,
}

impl CompositeChain {
    /// # Errors
    /// [`AppError::Validation`] if the list is empty, has duplicates, or does
    /// not contain `final_key`.
    pub fn new(templates: Vec<String>, final_key: impl Into<String>) -> AppResult<Self> {
        let final_key = final_key.into();

        if templates.is_empty() {
            return Err(AppError::Validation(
                "Composite needs at least one template".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for key in &templates {
            if !seen.insert(key.as_str()) {
                return Err(AppError::Validation(format!(
                    "Template '{}' listed twice in composite",
                    key
                )));
            }
        }

        if !seen.contains(final_key.as_str()) {
            return Err(AppError::Validation(format!(
                "Final template '{}' is not part of the composite",
                final_key
            )));
        }

        Ok(Self {
            templates,
            final_key,
        })
    }

    pub fn templates(&self) -> &[String] {
        &self.templates
    }

    pub fn final_key(&self) -> &str {
        &self.final_key
    }
}

impl Default for CompositeChain {
    /// The idea / scoring / result chain.
    fn default() -> Self {
        Self {
            templates: vec![
                "idea".to_string(),
                "scoring".to_string(),
                "result".to_string(),
            ],
            final_key: "result".to_string(),
        }
    }
}

/// Resolves and runs a composite prompt.
pub struct CompositeResolver {
    store: Arc<dyn TemplateStore>,
    executor: CompletionExecutor,
    settings: PipelineSettings,
    chain: CompositeChain,
}

impl CompositeResolver {
    pub fn new(
        store: Arc<dyn TemplateStore>,
        executor: CompletionExecutor,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            store,
            executor,
            settings,
            chain: CompositeChain::default(),
        }
    }

    pub fn with_chain(mut self, chain: CompositeChain) -> Self {
        self.chain = chain;
        self
    }

    /// Resolve the final prompt text without executing it.
    ///
    /// # Errors
    /// - [`AppError::TemplateRead`] naming the first template that cannot be read
    /// - [`AppError::Validation`] if the final prompt is empty
    /// - [`AppError::Serialization`] if the final template's frontmatter is
    ///   not valid YAML
    pub async fn resolve_prompt(&self, params: &SubstitutionContext) -> AppResult<String> {
        let (_, prompt) = self.prepare(params).await?;
        Ok(prompt)
    }

    /// Resolve the final prompt and execute it.
    ///
    /// Sampling parameters come from the final template's frontmatter.
    ///
    /// # Errors
    /// Those of [`resolve_prompt`](Self::resolve_prompt), plus
    /// [`AppError::Config`] without a model and [`AppError::Execution`] when
    /// the backend call fails.
    pub async fn resolve(&self, params: &SubstitutionContext) -> AppResult<String> {
        let (config, prompt) = self.prepare(params).await?;
        let model = self.settings.resolve_model()?;

        tracing::info!(
            final_template = self.chain.final_key(),
            "Executing composite prompt"
        );

        self.executor.execute(&prompt, Some(model), &config).await
    }

    async fn prepare(
        &self,
        params: &SubstitutionContext,
    ) -> AppResult<(GenerationConfig, String)> {
        let mut first_pass = ResolvedTemplateMap::new();
        let mut final_template = None;

        for key in self.chain.templates() {
            let template = self.store.load(&template_file_name(key)).await?;
            first_pass.insert(key.as_str(), substitute_scalars(template.body(), params));

            if key == self.chain.final_key() {
                final_template = Some(template);
            }
        }

        let second_pass = compose_templates(&first_pass);
        tracing::debug!("Composed {} templates", second_pass.len());

        let prompt = second_pass
            .get(self.chain.final_key())
            .unwrap_or_default()
            .to_string();

        if prompt.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "Composite prompt '{}' resolved to an empty prompt",
                self.chain.final_key()
            )));
        }

        let final_template = final_template.ok_or_else(|| {
            AppError::Validation(format!(
                "Final template '{}' was not loaded",
                self.chain.final_key()
            ))
        })?;

        Ok((generation_for(&final_template)?, prompt))
    }
}
