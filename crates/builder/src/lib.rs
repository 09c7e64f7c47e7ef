//! Prompt Builder - schema-driven forms with live template substitution
//!
//! This crate provides:
//! - Tolerant normalization of hand-written prompt documents (YAML or JSON)
//! - Field kind mapping to input widget descriptors
//! - Flat `{{ name }}` placeholder interpolation
//! - Per-step binding state with whole-step recomputation on every edit
//!
//! Presentation and document retrieval are left to the host; see the
//! `prompt-builder-wasm` crate for the browser adapter.
//!
//! # Example
//!
//! ```ignore
//! use prompt_builder::{parse_document, BuilderConfig, DocumentFormat, StepBuilder};
//!
//! let document = parse_document(yaml_text, DocumentFormat::Yaml, &BuilderConfig::default())?;
//! let mut builder = StepBuilder::new(document);
//!
//! builder.subscribe(0, |step, text| println!("step {step}: {text}"))?;
//! builder.set_field(0, "topic", "lifetimes")?;
//! ```

mod builder;
mod config;
pub mod field;
pub mod interpolate;
mod loader;
pub mod parser;
mod schema;
mod step;

pub use builder::{OutputListener, StepBuilder};
pub use config::*;
pub use field::{control_id, resolve_field_spec, widget_for, Widget, WidgetKind};
pub use interpolate::interpolate;
pub use loader::{decode_document, load_document, parse_document, DocumentFormat};
pub use parser::{normalize, normalize_with};
pub use schema::*;
pub use step::{Bindings, StepController};

use thiserror::Error;

/// Errors that can occur while loading or driving a builder
#[derive(Debug, Error)]
pub enum BuilderError {
    #[error("Failed to load document: {0}")]
    AcquisitionError(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("No step at index {0}")]
    UnknownStep(usize),

    #[error("Step {step} has no field named '{name}'")]
    UnknownField { step: usize, name: String },
}

impl BuilderError {
    /// Whether the error means the document could not be obtained at all
    ///
    /// Such failures are terminal for a build: no steps are shown.
    pub fn is_acquisition_failure(&self) -> bool {
        matches!(
            self,
            BuilderError::AcquisitionError(_) | BuilderError::JsonError(_) | BuilderError::YamlError(_)
        )
    }
}

/// Result type for builder operations
pub type Result<T> = std::result::Result<T, BuilderError>;

/// Build a live step builder from a normalized document
pub fn build(document: TemplateDocument) -> StepBuilder {
    StepBuilder::new(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquisition_failure_classification() {
        assert!(BuilderError::AcquisitionError("offline".into()).is_acquisition_failure());
        assert!(!BuilderError::UnknownStep(3).is_acquisition_failure());
        assert_eq!(
            BuilderError::UnknownField {
                step: 1,
                name: "x".into()
            }
            .to_string(),
            "Step 1 has no field named 'x'"
        );
    }
}
