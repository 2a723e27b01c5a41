//! Configuration management for Ideaforge.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Defaults
//! - Config file (`ideaforge.yaml`, or the path in `IDEAFORGE_CONFIG`)
//! - Environment variables
//! - Command-line flags
//!
//! The prompt key and model are optional at load time. Flows that need them
//! report a configuration error at the point of use.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{AppError, AppResult};

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "ideaforge.yaml";

/// Base64-encoded 32-byte symmetric key for prompt encryption.
///
/// The encoded value is wiped on drop and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct PromptKey(String);

impl PromptKey {
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// The base64 text as configured.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PromptKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PromptKey(<redacted>)")
    }
}

/// Process-wide settings handed explicitly to each orchestrator.
#[derive(Debug, Clone, Default)]
pub struct PipelineSettings {
    /// Selected model identifier
    pub model: Option<String>,

    /// Prompt encryption key
    pub prompt_key: Option<PromptKey>,
}

impl PipelineSettings {
    pub fn new(model: Option<String>, prompt_key: Option<PromptKey>) -> Self {
        Self { model, prompt_key }
    }

    /// Resolve the model identifier, treating blank values as unset.
    pub fn resolve_model(&self) -> AppResult<&str> {
        self.model
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .ok_or_else(|| AppError::Config("No model identifier configured".to_string()))
    }

    /// Resolve the prompt key, treating blank values as unset.
    pub fn resolve_key(&self) -> AppResult<&PromptKey> {
        self.prompt_key
            .as_ref()
            .filter(|k| !k.expose().trim().is_empty())
            .ok_or_else(|| AppError::Config("No prompt encryption key configured".to_string()))
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding `.prompt` templates
    pub templates_dir: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Completion provider (e.g., "ollama")
    pub provider: String,

    /// Provider endpoint override
    pub endpoint: Option<String>,

    /// Selected model identifier
    pub model: Option<String>,

    /// Prompt encryption key (base64)
    pub prompt_key: Option<PromptKey>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    templates: Option<TemplatesConfig>,
    completion: Option<CompletionConfig>,
    security: Option<SecurityConfig>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TemplatesConfig {
    dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CompletionConfig {
    provider: Option<String>,
    endpoint: Option<String>,
    model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SecurityConfig {
    /// Name of the environment variable holding the base64 prompt key
    #[serde(rename = "promptKeyEnv")]
    prompt_key_env: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            templates_dir: PathBuf::from("prompts"),
            config_file: None,
            provider: "ollama".to_string(),
            endpoint: None,
            model: None,
            prompt_key: None,
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the YAML file and environment variables.
    ///
    /// Environment variables:
    /// - `IDEAFORGE_CONFIG`: Path to config file
    /// - `IDEAFORGE_TEMPLATES`: Template directory
    /// - `IDEAFORGE_PROVIDER`: Completion provider
    /// - `IDEAFORGE_ENDPOINT`: Provider endpoint
    /// - `IDEAFORGE_MODEL`: Model identifier
    /// - `IDEAFORGE_PROMPT_KEY`: Base64 prompt encryption key
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load() -> AppResult<Self> {
        Self::load_with(None)
    }

    /// Like [`load`](Self::load), with an explicit config file taking
    /// precedence over `IDEAFORGE_CONFIG`.
    pub fn load_with(config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        config.config_file = config_file.or_else(|| {
            std::env::var("IDEAFORGE_CONFIG")
                .ok()
                .map(PathBuf::from)
        });

        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        } else if config.config_file.is_some() {
            return Err(AppError::Config(format!(
                "Config file does not exist: {:?}",
                config_path
            )));
        }

        // Environment variables override YAML config
        if let Ok(dir) = std::env::var("IDEAFORGE_TEMPLATES") {
            config.templates_dir = PathBuf::from(dir);
        }

        if let Ok(provider) = std::env::var("IDEAFORGE_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(endpoint) = std::env::var("IDEAFORGE_ENDPOINT") {
            config.endpoint = Some(endpoint);
        }

        if let Ok(model) = std::env::var("IDEAFORGE_MODEL") {
            config.model = Some(model);
        }

        if let Ok(key) = std::env::var("IDEAFORGE_PROMPT_KEY") {
            config.prompt_key = Some(PromptKey::new(key));
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    pub fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(dir) = config_file.templates.and_then(|t| t.dir) {
            result.templates_dir = dir;
        }

        if let Some(completion) = config_file.completion {
            if let Some(provider) = completion.provider {
                result.provider = provider;
            }
            if completion.endpoint.is_some() {
                result.endpoint = completion.endpoint;
            }
            if completion.model.is_some() {
                result.model = completion.model;
            }
        }

        // The key itself never lives in the file, only the variable naming it
        if let Some(env_var) = config_file.security.and_then(|s| s.prompt_key_env) {
            if let Ok(key) = std::env::var(&env_var) {
                result.prompt_key = Some(PromptKey::new(key));
            } else {
                tracing::debug!("Prompt key variable {} is not set", env_var);
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over environment variables and the
    /// config file.
    pub fn with_overrides(
        mut self,
        templates_dir: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(dir) = templates_dir {
            self.templates_dir = dir;
        }

        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = Some(model);
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Settings for the prompt orchestrators.
    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings::new(self.model.clone(), self.prompt_key.clone())
    }
}
