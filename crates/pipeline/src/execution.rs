//! Secure prompt execution.
//!
//! Opens a payload produced by [`SecurePromptDelivery`](crate::SecurePromptDelivery),
//! injects runtime variables and runs the prompt. Stale, foreign or tampered
//! payloads are declined rather than raised; a missing model or a failing
//! backend still propagates.

use crate::outcome::{DeclineReason, ExecutionOutcome};
use ideaforge_cipher::{EncryptedPayload, PromptCipher};
use ideaforge_core::{AppError, AppResult, PipelineSettings};
use ideaforge_llm::{CompletionExecutor, GenerationConfig};
use ideaforge_prompt::{substitute_scalars, SubstitutionContext};

/// Runs encrypted prompts.
pub struct SecurePromptExecution {
    executor: CompletionExecutor,
    settings: PipelineSettings,
    generation: GenerationConfig,
}

impl SecurePromptExecution {
    pub fn new(executor: CompletionExecutor, settings: PipelineSettings) -> Self {
        Self {
            executor,
            settings,
            generation: GenerationConfig::default(),
        }
    }

    /// Sampling parameters used for every execution.
    pub fn with_generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    /// Decrypt `payload`, inject `variables` and execute the result.
    ///
    /// Returns [`ExecutionOutcome::Declined`] when the prompt cannot be
    /// opened; no completion call is made in that case.
    ///
    /// # Errors
    /// - [`AppError::Config`] if no model is configured
    /// - [`AppError::Validation`] if the sampling parameters are out of range
    /// - [`AppError::Execution`] if the backend call fails
    pub async fn execute(
        &self,
        payload: &EncryptedPayload,
        variables: &SubstitutionContext,
    ) -> AppResult<ExecutionOutcome> {
        let prompt = match self.open(payload) {
            Ok(prompt) => prompt,
            Err(reason) => {
                tracing::warn!(reason = reason.as_str(), "Declining encrypted prompt");
                return Ok(ExecutionOutcome::Declined(reason));
            }
        };

        let prompt = substitute_scalars(&prompt, variables);
        let model = self.settings.resolve_model()?;

        let text = self
            .executor
            .execute(&prompt, Some(model), &self.generation)
            .await?;

        Ok(ExecutionOutcome::Completed(text))
    }

    fn open(&self, payload: &EncryptedPayload) -> Result<String, DeclineReason> {
        let key = self
            .settings
            .resolve_key()
            .map_err(|_| DeclineReason::MissingKey)?;

        let cipher = PromptCipher::from_prompt_key(key).map_err(|e| {
            tracing::debug!("Prompt key unusable: {}", e);
            DeclineReason::InvalidKey
        })?;

        payload.validate().map_err(|e| {
            tracing::debug!("{}", e);
            DeclineReason::MalformedPayload
        })?;

        let prompt = cipher.decrypt(payload).map_err(|e| match e {
            AppError::Authentication => DeclineReason::AuthenticationFailed,
            _ => DeclineReason::MalformedPayload,
        })?;

        if prompt.trim().is_empty() {
            return Err(DeclineReason::EmptyPrompt);
        }

        Ok(prompt)
    }
}
