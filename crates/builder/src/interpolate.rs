//! Flat `{{ name }}` placeholder substitution

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::Bindings;

/// `{{`, optional whitespace, an ASCII word identifier, optional whitespace, `}}`
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}").expect("placeholder pattern is valid")
});

/// Substitute every placeholder in `template` with its bound value
///
/// Unbound or empty names become the empty string. Text that does not form
/// a complete placeholder is copied through unchanged.
pub fn interpolate(template: &str, bindings: &Bindings) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            bindings.get(&caps[1]).unwrap_or_default().to_string()
        })
        .into_owned()
}

/// Placeholder names in order of appearance (repeats included)
pub fn placeholders(template: &str) -> Vec<&str> {
    PLACEHOLDER
        .captures_iter(template)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}
