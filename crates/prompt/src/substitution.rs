//! Placeholder substitution engine.
//!
//! Placeholders are written `{{name}}`, with optional whitespace inside the
//! braces (`{{ name }}`). Names cannot contain whitespace or braces.
//!
//! Two passes are provided:
//! - [`substitute_scalars`] fills placeholders from caller-supplied values.
//! - [`compose_templates`] injects other templates' text into placeholders
//!   named after them, in one non-recursive round.
//!
//! Both passes scan the input once. Text that was substituted in is never
//! scanned again, so neither pass can loop.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::types::{ResolvedTemplateMap, SubstitutionContext};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([^\s{}]+)\s*\}\}").expect("Invalid placeholder regex")
});

/// Replace every placeholder whose name is in `context` with the value's
/// string form.
///
/// Placeholders with no matching value are left exactly as written.
///
/// # Example
/// ```
/// use ideaforge_prompt::{substitute_scalars, SubstitutionContext};
///
/// let context = SubstitutionContext::new().with("idea", "solar kite");
/// assert_eq!(substitute_scalars("Idea: {{ idea }}", &context), "Idea: solar kite");
/// assert_eq!(
///     substitute_scalars("Idea: {{idea}}", &SubstitutionContext::new()),
///     "Idea: {{idea}}"
/// );
/// ```
pub fn substitute_scalars(text: &str, context: &SubstitutionContext) -> String {
    replace_placeholders(text, |name| context.get(name).map(|v| v.to_string()))
}

/// Inject each template's pass-1 text into the other templates.
///
/// For every entry, placeholders naming any key of `resolved` (the entry's
/// own key included) are replaced with that key's text as it appears in
/// `resolved`. Injected text is not expanded further, and mutually
/// referencing templates each receive the other's pre-injection text.
pub fn compose_templates(resolved: &ResolvedTemplateMap) -> ResolvedTemplateMap {
    resolved
        .iter()
        .map(|(key, text)| {
            let composed =
                replace_placeholders(text, |name| resolved.get(name).map(str::to_string));
            (key, composed)
        })
        .collect()
}

/// Distinct placeholder names in `text`, in order of first appearance.
pub fn placeholders(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(text) {
        let name = &caps[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

fn replace_placeholders<F>(text: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    PLACEHOLDER
        .replace_all(text, |caps: &Captures| {
            lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
