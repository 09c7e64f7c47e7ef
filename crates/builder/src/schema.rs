//! Normalized document model

use serde::{Deserialize, Serialize};

/// Root of a normalized prompt document
///
/// Built once by [`crate::normalize`] and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDocument {
    /// Page title (`prompt_name` in the source document)
    pub title: String,

    /// Ordered steps
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl TemplateDocument {
    /// Whether the document has no steps at all
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// One form / template pair
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Phase label shown in the step headings
    #[serde(default)]
    pub phase: String,

    /// Input fields, in declaration order
    #[serde(default)]
    pub fields: Vec<FieldSpec>,

    /// Template text containing `{{ name }}` placeholders
    #[serde(default)]
    pub template: String,
}

impl Step {
    /// Whether `name` is declared by some field of this step
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }
}

/// A single input field of a step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Substitution key and form-control name
    pub name: String,

    /// Label text (`description`, falling back to `name`)
    pub label: String,

    /// Input kind
    #[serde(default)]
    pub kind: FieldKind,

    /// Initial value, kept as plain text
    #[serde(rename = "defaultValue")]
    #[serde(default)]
    pub default_value: String,
}

impl FieldSpec {
    /// Date format hint, if the field is a `date(<hint>)` field
    pub fn date_format_hint(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Date { hint } => hint.as_deref(),
            _ => None,
        }
    }
}

/// Input kind parsed from the loosely-typed `input` descriptor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum FieldKind {
    /// Single-line text input
    #[default]
    Text,

    /// Multi-line text area (`multiline_text`)
    Multiline,

    /// Date input, optionally with a cosmetic format hint (`date(YYYY-MM-DD)`)
    Date { hint: Option<String> },

    /// Any other input type, passed through verbatim (`email`, `number`, ...)
    Other(String),
}

impl FieldKind {
    /// Descriptor value selecting a multi-line widget
    pub const MULTILINE: &'static str = "multiline_text";

    /// Parse an `input` descriptor
    ///
    /// Rules are applied in order, first match wins:
    /// 1. `multiline_text` is a text area
    /// 2. anything starting with `date` is a date input; `date(<hint>)` carries a hint
    /// 3. anything else is an input of that native type, `text` when empty
    pub fn parse(descriptor: &str) -> Self {
        if descriptor == Self::MULTILINE {
            return FieldKind::Multiline;
        }

        if descriptor.starts_with("date") {
            let hint = descriptor
                .strip_prefix("date(")
                .and_then(|rest| rest.strip_suffix(')'))
                .filter(|hint| !hint.is_empty())
                .map(str::to_string);
            return FieldKind::Date { hint };
        }

        match descriptor {
            "" | "text" => FieldKind::Text,
            other => FieldKind::Other(other.to_string()),
        }
    }

    /// Native input type for single-line widgets
    ///
    /// Returns `None` for multi-line fields, which are not `<input>` elements.
    pub fn input_type(&self) -> Option<&str> {
        match self {
            FieldKind::Text => Some("text"),
            FieldKind::Multiline => None,
            FieldKind::Date { .. } => Some("date"),
            FieldKind::Other(raw) => Some(raw.as_str()),
        }
    }
}
