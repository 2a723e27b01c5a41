//! Prompt templating for Ideaforge.
//!
//! This crate provides:
//! - Template stores (filesystem and in-memory)
//! - Frontmatter stripping and metadata parsing
//! - Two-pass `{{placeholder}}` substitution: scalar values, then
//!   cross-template injection

pub mod frontmatter;
pub mod store;
pub mod substitution;
pub mod types;

// Re-export main types
pub use frontmatter::{SamplingHints, TemplateMetadata};
pub use store::{
    template_file_name, FsTemplateStore, MemoryTemplateStore, TemplateStore, TEMPLATE_EXTENSION,
};
pub use substitution::{compose_templates, placeholders, substitute_scalars};
pub use types::{ResolvedTemplateMap, ScalarValue, SubstitutionContext, Template};
