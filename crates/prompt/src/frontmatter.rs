//! Frontmatter handling for template files.
//!
//! A template may open with a metadata block:
//!
//! ```text
//! ---
//! description: Scores an idea
//! config:
//!   temperature: 0.2
//! ---
//! Score this idea out of {{maxscore}}: {{idea}}
//! ```
//!
//! Only a block at the very start of the text counts. Both LF and CRLF line
//! endings are accepted.

use ideaforge_core::AppResult;
use serde::{Deserialize, Serialize};

const DELIMITER: &str = "---";

/// Remove a leading frontmatter block, returning the template body.
///
/// Text without a complete block at its start is returned unchanged.
pub fn strip(raw: &str) -> &str {
    split(raw).1
}

/// Split text into its frontmatter header (without delimiters) and body.
pub fn split(raw: &str) -> (Option<&str>, &str) {
    let Some(after_open) = raw
        .strip_prefix("---\r\n")
        .or_else(|| raw.strip_prefix("---\n"))
    else {
        return (None, raw);
    };

    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == DELIMITER {
            let header = &after_open[..offset];
            let body = &after_open[offset + line.len()..];
            return (Some(header), body);
        }
        offset += line.len();
    }

    // Unterminated block: not frontmatter
    (None, raw)
}

/// Sampling hints a template may declare.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SamplingHints {
    #[serde(default)]
    pub temperature: Option<f32>,

    #[serde(rename = "topP", default)]
    pub top_p: Option<f32>,
}

/// Metadata parsed from a frontmatter block.
///
/// Unknown keys are ignored so templates written for other tooling still load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateMetadata {
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub config: Option<SamplingHints>,
}

impl TemplateMetadata {
    /// Parse the frontmatter of `raw`, defaulting when there is none.
    pub fn parse(raw: &str) -> AppResult<Self> {
        match split(raw).0 {
            Some(header) if !header.trim().is_empty() => Ok(serde_yaml::from_str(header)?),
            _ => Ok(Self::default()),
        }
    }
}
