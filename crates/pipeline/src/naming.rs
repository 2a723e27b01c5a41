//! Naming rules for private prompts.
//!
//! A private prompt is requested as `_name`. Its base template lives in
//! `name.prompt` and its refinement meta prompt in `meta-name.prompt`.

use ideaforge_core::{AppError, AppResult};

/// Prefix marking a prompt as private.
pub const PRIVATE_MARKER: char = '_';

/// Prefix of the meta template that refines a private prompt.
pub const META_PREFIX: &str = "meta-";

/// Longest generator context accepted, in characters.
pub const MAX_GENERATOR_CHARS: usize = 120;

/// Validate a private prompt name and return its base key.
///
/// `_pitch` yields `pitch`. The key may contain ASCII letters, digits, `-`
/// and `_`.
pub fn private_base_name(prompt_name: &str) -> AppResult<&str> {
    let base = prompt_name.strip_prefix(PRIVATE_MARKER).ok_or_else(|| {
        AppError::Validation(format!(
            "Prompt name '{}' must start with '{}'",
            prompt_name, PRIVATE_MARKER
        ))
    })?;

    if base.is_empty() {
        return Err(AppError::Validation(
            "Prompt name has nothing after the private marker".to_string(),
        ));
    }

    if !base
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::Validation(format!(
            "Prompt name '{}' may only contain letters, digits, '-' and '_'",
            prompt_name
        )));
    }

    Ok(base)
}

/// Meta template key for a base key (`pitch` → `meta-pitch`).
pub fn meta_template_key(base: &str) -> String {
    format!("{}{}", META_PREFIX, base)
}

/// Validate the generator context string, returning it trimmed.
pub fn validate_generator(generator: &str) -> AppResult<&str> {
    let trimmed = generator.trim();

    if trimmed.is_empty() {
        return Err(AppError::Validation("Generator must not be empty".to_string()));
    }

    let len = trimmed.chars().count();
    if len > MAX_GENERATOR_CHARS {
        return Err(AppError::Validation(format!(
            "Generator is {} characters, limit is {}",
            len, MAX_GENERATOR_CHARS
        )));
    }

    Ok(trimmed)
}
