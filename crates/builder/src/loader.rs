//! Decoding document text into the raw shape the normalizer consumes

use std::path::Path;

use serde_json::Value;

use crate::parser::normalize_with;
use crate::{BuilderConfig, BuilderError, Result, TemplateDocument};

/// Text format of a prompt document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DocumentFormat {
    /// YAML (also accepts JSON, which is a YAML subset)
    #[default]
    Yaml,
    Json,
}

impl DocumentFormat {
    /// Guess the format from a file name or URL
    ///
    /// Anything not ending in `.json` is treated as YAML.
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or(path);
        if path.to_ascii_lowercase().ends_with(".json") {
            DocumentFormat::Json
        } else {
            DocumentFormat::Yaml
        }
    }
}

/// Decode document text into a raw value
///
/// Blank text decodes to `null`, which normalizes to an empty document.
pub fn decode_document(text: &str, format: DocumentFormat) -> Result<Value> {
    match format {
        _ if text.trim().is_empty() => Ok(Value::Null),
        DocumentFormat::Yaml => Ok(serde_yaml::from_str(text)?),
        DocumentFormat::Json => Ok(serde_json::from_str(text)?),
    }
}

/// Decode and normalize document text
pub fn parse_document(
    text: &str,
    format: DocumentFormat,
    config: &BuilderConfig,
) -> Result<TemplateDocument> {
    let raw = decode_document(text, format)?;
    Ok(normalize_with(&raw, config))
}

/// Read, decode and normalize a document from disk
pub fn load_document(path: impl AsRef<Path>, config: &BuilderConfig) -> Result<TemplateDocument> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| {
        BuilderError::AcquisitionError(format!("Failed to read {}: {}", path.display(), e))
    })?;
    parse_document(
        &text,
        DocumentFormat::from_path(&path.to_string_lossy()),
        config,
    )
}
