//! Execute command handler.
//!
//! Runs an encrypted prompt produced by `deliver`.

use super::{completion_executor, context_from, parse_key_value, print_json};
use clap::Args;
use ideaforge_cipher::EncryptedPayload;
use ideaforge_core::{config::AppConfig, AppResult};
use ideaforge_llm::GenerationConfig;
use ideaforge_pipeline::{DeclineReason, ExecutionOutcome, SecurePromptExecution};
use ideaforge_prompt::SubstitutionContext;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

/// Run an encrypted prompt
#[derive(Args, Debug)]
pub struct ExecuteCommand {
    /// Payload JSON file, or - for stdin
    #[arg(default_value = "-")]
    pub payload: PathBuf,

    /// Runtime variable injected into the prompt (name=value, repeatable)
    #[arg(long = "var", value_parser = parse_key_value)]
    pub vars: Vec<(String, String)>,

    /// Sampling temperature (0.0-1.0)
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Nucleus sampling threshold (0.0-1.0)
    #[arg(long)]
    pub top_p: Option<f32>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ExecuteCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing execute command");

        let raw = read_payload(&self.payload).await?;

        let execution =
            SecurePromptExecution::new(completion_executor(config)?, config.pipeline_settings())
                .with_generation(GenerationConfig::new(self.temperature, self.top_p));

        let outcome = run_payload(&execution, &raw, &context_from(&self.vars)).await?;

        if self.json {
            print_json(&serde_json::json!({
                "completed": outcome.is_completed(),
                "text": outcome.text(),
                "declineReason": outcome.decline_reason(),
            }))?;
        } else if outcome.is_completed() {
            println!("{}", outcome.into_text());
        }

        Ok(())
    }
}

/// Read the payload text from `path`, or stdin for `-`.
async fn read_payload(path: &Path) -> AppResult<String> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        tokio::io::stdin().read_to_string(&mut buffer).await?;
        Ok(buffer)
    } else {
        Ok(tokio::fs::read_to_string(path).await?)
    }
}

/// Parse `raw` and execute it.
///
/// Text that is not a JSON object is declined as a malformed payload, the
/// same as a payload whose fields do not validate.
async fn run_payload(
    execution: &SecurePromptExecution,
    raw: &str,
    variables: &SubstitutionContext,
) -> AppResult<ExecutionOutcome> {
    let payload: EncryptedPayload = match serde_json::from_str(raw) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(
                reason = DeclineReason::MalformedPayload.as_str(),
                "Declining encrypted prompt: {}",
                e
            );
            return Ok(ExecutionOutcome::Declined(DeclineReason::MalformedPayload));
        }
    };

    execution.execute(&payload, variables).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use ideaforge_cipher::{generate_key_base64, PromptCipher};
    use ideaforge_core::{AppError, PipelineSettings, PromptKey};
    use ideaforge_llm::{CompletionExecutor, MockClient};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn execution(client: Arc<MockClient>, key: &str) -> SecurePromptExecution {
        SecurePromptExecution::new(
            CompletionExecutor::new(client),
            PipelineSettings::new(Some("llama3.2".to_string()), Some(PromptKey::new(key))),
        )
    }

    #[tokio::test]
    async fn test_read_payload_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("payload.json");
        tokio::fs::write(&path, r#"{"iv":"00","ciphertext":"","authTag":"11"}"#)
            .await
            .unwrap();

        let raw = read_payload(&path).await.unwrap();
        let payload: EncryptedPayload = serde_json::from_str(&raw).unwrap();
        assert_eq!(payload.iv.as_deref(), Some("00"));
        assert_eq!(payload.auth_tag.as_deref(), Some("11"));
    }

    #[tokio::test]
    async fn test_unreadable_payload_file_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.json");

        assert!(matches!(read_payload(&path).await, Err(AppError::Io(_))));
    }

    #[tokio::test]
    async fn test_sealed_payload_completes() {
        let key = generate_key_base64();
        let client = Arc::new(MockClient::echo());
        let payload = PromptCipher::from_prompt_key(&PromptKey::new(key.clone()))
            .unwrap()
            .encrypt("Pitch {{topic}}")
            .unwrap();
        let raw = serde_json::to_string(&payload).unwrap();

        let variables = SubstitutionContext::new().with("topic", "kites");
        let outcome = run_payload(&execution(client.clone(), &key), &raw, &variables)
            .await
            .unwrap();

        assert_eq!(outcome.into_text(), "Pitch kites");
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_malformed_payload_text_declined() {
        let key = generate_key_base64();
        let client = Arc::new(MockClient::echo());
        let execution = execution(client.clone(), &key);

        let inputs = [
            "not json",
            "[1, 2, 3]",
            r#"{"iv":null,"ciphertext":"ab","authTag":"00000000000000000000000000000000"}"#,
            r#"{"iv":123,"ciphertext":"ab","authTag":"00000000000000000000000000000000"}"#,
            r#"{"iv":"000000000000000000000000","ciphertext":7,"authTag":null}"#,
        ];

        for raw in inputs {
            let outcome = run_payload(&execution, raw, &SubstitutionContext::new())
                .await
                .unwrap();
            assert_eq!(
                outcome.decline_reason(),
                Some(DeclineReason::MalformedPayload),
                "input: {}",
                raw
            );
        }
        assert_eq!(client.call_count(), 0);
    }
}
