//! Secure prompt delivery.
//!
//! A private template is refined by its meta template at temperature 0 and
//! handed back encrypted, so the client can hold the prompt without being
//! able to read it.

use crate::naming::{meta_template_key, private_base_name, validate_generator};
use ideaforge_cipher::{EncryptedPayload, PromptCipher};
use ideaforge_core::{AppError, AppResult, PipelineSettings};
use ideaforge_llm::{CompletionExecutor, GenerationConfig};
use ideaforge_prompt::{substitute_scalars, template_file_name, SubstitutionContext, TemplateStore};
use std::sync::Arc;

/// Produces encrypted, refined private prompts.
pub struct SecurePromptDelivery {
    store: Arc<dyn TemplateStore>,
    executor: CompletionExecutor,
    settings: PipelineSettings,
}

impl SecurePromptDelivery {
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

    /// Refine the private prompt `prompt_name` for `generator` and encrypt it.
    ///
    /// Every failure propagates.
    ///
    /// # Errors
    /// - [`AppError::Validation`] for a bad name or generator (before any
    ///   read) or when the refinement comes back empty
    /// - [`AppError::TemplateRead`] if the base or meta template is missing
    /// - [`AppError::Config`] if no model or key is configured
    /// - [`AppError::InvalidKey`] if the key does not decode to 32 bytes
    /// - [`AppError::Execution`] if the backend call fails
    pub async fn deliver(&self, generator: &str, prompt_name: &str) -> AppResult<EncryptedPayload> {
        let base = private_base_name(prompt_name)?;
        let generator = validate_generator(generator)?;

        let template = self.store.load(&template_file_name(base)).await?;
        let params = SubstitutionContext::new()
            .with("generator", generator)
            .with("prompt", template.body());

        let model = self.settings.resolve_model()?;
        let cipher = PromptCipher::from_prompt_key(self.settings.resolve_key()?)?;

        let meta = self
            .store
            .load(&template_file_name(&meta_template_key(base)))
            .await?;
        let meta_prompt = substitute_scalars(meta.body(), &params);

        tracing::info!(prompt = base, "Refining private prompt");

        let refined = self
            .executor
            .execute(&meta_prompt, Some(model), &GenerationConfig::deterministic())
            .await?;

        if refined.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "Meta template for '{}' produced an empty prompt",
                prompt_name
            )));
        }

        let payload = cipher.encrypt(&refined)?;
        tracing::debug!(prompt = base, "Private prompt encrypted");

        Ok(payload)
    }
}
