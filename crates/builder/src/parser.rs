//! Tolerant normalization of raw prompt documents
//!
//! The source documents are hand-written YAML, so nothing is assumed to be
//! present or well-typed. Every deviation falls back to a default instead of
//! failing.

use serde_json::Value;

use crate::field::resolve_field_spec;
use crate::{BuilderConfig, Step, TemplateDocument};

/// Key holding the document title
pub const TITLE_KEY: &str = "prompt_name";
/// Key holding the list of step entries
pub const STEPS_KEY: &str = "templates";
/// Wrapper key around each step entry
pub const STEP_WRAPPER_KEY: &str = "template";
/// Wrapper key around each field entry
pub const FIELD_WRAPPER_KEY: &str = "item";

/// Normalize a raw document using the default configuration
pub fn normalize(raw: &Value) -> TemplateDocument {
    normalize_with(raw, &BuilderConfig::default())
}

/// Normalize a raw document
///
/// Never fails: a missing title takes `config.default_title`, a missing or
/// malformed step list yields a document with zero steps.
pub fn normalize_with(raw: &Value, config: &BuilderConfig) -> TemplateDocument {
    let title =
        scalar_to_string(raw.get(TITLE_KEY)).unwrap_or_else(|| config.default_title.clone());

    let steps: Vec<Step> = match raw.get(STEPS_KEY) {
        Some(Value::Array(entries)) => entries.iter().map(normalize_step).collect(),
        Some(other) => {
            log::warn!("`{}` is not a sequence ({}), no steps built", STEPS_KEY, kind_of(other));
            Vec::new()
        }
        None => Vec::new(),
    };

    log::debug!("normalized document '{}' with {} step(s)", title, steps.len());

    TemplateDocument { title, steps }
}

/// Normalize a single step entry
fn normalize_step(entry: &Value) -> Step {
    let Some(body) = unwrap_entry(entry, STEP_WRAPPER_KEY) else {
        log::warn!("step entry is not a mapping ({}), using an empty step", kind_of(entry));
        return Step::default();
    };

    let fields = match body.get("form") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match unwrap_entry(item, FIELD_WRAPPER_KEY) {
                Some(field) => Some(resolve_field_spec(field)),
                None => {
                    log::warn!("skipping field entry that is not a mapping ({})", kind_of(item));
                    None
                }
            })
            .collect(),
        _ => Vec::new(),
    };

    Step {
        phase: scalar_to_string(body.get("phase")).unwrap_or_default(),
        fields,
        template: scalar_to_string(body.get("prompt")).unwrap_or_default(),
    }
}

/// Unwrap an entry that may be nested under a singular wrapper key
///
/// `{ template: {...} }` yields the inner mapping. A mapping without the
/// wrapper is used as-is. Anything else yields `None`.
pub fn unwrap_entry<'a>(entry: &'a Value, wrapper: &str) -> Option<&'a Value> {
    match entry.get(wrapper) {
        Some(inner @ Value::Object(_)) => Some(inner),
        Some(_) => None,
        None if entry.is_object() => Some(entry),
        None => None,
    }
}

/// Convert a loosely-typed scalar to text
///
/// Strings are kept verbatim, numbers and booleans are formatted. Falsy
/// values (`null`, `false`, `0`, `""`) and non-scalars count as absent.
pub fn scalar_to_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(true) => Some("true".to_string()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(number_to_string(n)),
        Value::Bool(false) | Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

// Whole floats print without a fraction, so YAML `1.0` reads "1"
fn number_to_string(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{:.0}", f),
        _ => n.to_string(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
