//! Template stores.
//!
//! A store hands out raw template text by name. Nothing is cached: every call
//! goes back to the underlying storage, so edits to template files take effect
//! on the next invocation.

use ideaforge_core::{AppError, AppResult};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use crate::types::Template;

/// File extension for template files.
pub const TEMPLATE_EXTENSION: &str = "prompt";

/// Read access to named templates.
#[async_trait::async_trait]
pub trait TemplateStore: Send + Sync {
    /// Read the raw text of `name` (e.g., "idea.prompt").
    ///
    /// # Errors
    /// [`AppError::TemplateRead`] naming the template when it cannot be read.
    async fn read(&self, name: &str) -> AppResult<String>;

    /// Names of all templates in the store, sorted.
    async fn list(&self) -> AppResult<Vec<String>>;

    /// Read `name` into a [`Template`].
    async fn load(&self, name: &str) -> AppResult<Template> {
        let raw_text = self.read(name).await?;
        Ok(Template::new(name, raw_text))
    }
}

/// File name for a template key (`idea` → `idea.prompt`).
pub fn template_file_name(key: &str) -> String {
    format!("{}.{}", key, TEMPLATE_EXTENSION)
}

/// Templates stored as files in one directory.
#[derive(Debug, Clone)]
pub struct FsTemplateStore {
    root: PathBuf,
}

impl FsTemplateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve `name` inside the store root, refusing paths that escape it.
    fn resolve(&self, name: &str) -> AppResult<PathBuf> {
        let relative = Path::new(name);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));

        if name.is_empty() || escapes {
            return Err(AppError::Validation(format!(
                "Template name must be a plain relative path: {:?}",
                name
            )));
        }

        Ok(self.root.join(relative))
    }
}

#[async_trait::async_trait]
impl TemplateStore for FsTemplateStore {
    async fn read(&self, name: &str) -> AppResult<String> {
        let path = self.resolve(name)?;
        tracing::debug!("Reading template from: {:?}", path);

        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| AppError::template_read(name, e))
    }

    async fn list(&self) -> AppResult<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();

        for entry in walkdir::WalkDir::new(&self.root)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file()
                && path.extension().and_then(|s| s.to_str()) == Some(TEMPLATE_EXTENSION)
            {
                if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
                    names.push(name.to_string());
                }
            }
        }

        names.sort();
        Ok(names)
    }
}

/// In-process template store.
///
/// Counts reads so callers can assert when a flow touched storage.
#[derive(Debug, Default)]
pub struct MemoryTemplateStore {
    templates: RwLock<HashMap<String, String>>,
    reads: AtomicUsize,
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(name, text);
        self
    }

    pub fn insert(&self, name: impl Into<String>, text: impl Into<String>) {
        let mut templates = self
            .templates
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        templates.insert(name.into(), text.into());
    }

    /// Number of `read` calls served so far, successful or not.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl TemplateStore for MemoryTemplateStore {
    async fn read(&self, name: &str) -> AppResult<String> {
        self.reads.fetch_add(1, Ordering::SeqCst);

        let templates = self
            .templates
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        templates.get(name).cloned().ok_or_else(|| {
            AppError::template_read(
                name,
                std::io::Error::new(std::io::ErrorKind::NotFound, "template not found"),
            )
        })
    }

    async fn list(&self) -> AppResult<Vec<String>> {
        let templates = self
            .templates
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut names: Vec<String> = templates.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}
