//! Field descriptors and widget mapping
//!
//! Turns raw field entries into [`FieldSpec`]s and describes the input
//! control a host should render for each of them. Values are always plain
//! text; nothing here validates or coerces what the user types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::parser::scalar_to_string;
use crate::{FieldKind, FieldSpec};

/// Resolve a raw (already unwrapped) field entry into a [`FieldSpec`]
///
/// Reads `name`, `description`, `input` and `default`. The label falls back
/// to the name when the description is missing or empty.
pub fn resolve_field_spec(entry: &Value) -> FieldSpec {
    let name = scalar_to_string(entry.get("name")).unwrap_or_default();
    let label = scalar_to_string(entry.get("description")).unwrap_or_else(|| name.clone());
    let kind = FieldKind::parse(&scalar_to_string(entry.get("input")).unwrap_or_default());
    let default_value = scalar_to_string(entry.get("default")).unwrap_or_default();

    FieldSpec {
        name,
        label,
        kind,
        default_value,
    }
}

/// Form-control id for a field, unique across the whole builder
pub fn control_id(step_index: usize, name: &str) -> String {
    format!("in-{}-{}", step_index, name)
}

/// Element a widget is rendered as
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "element", rename_all = "lowercase")]
pub enum WidgetKind {
    /// `<textarea>`
    TextArea,

    /// `<input type="...">`
    Input {
        #[serde(rename = "inputType")]
        input_type: String,
    },
}

/// Everything a host needs to render one field's control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Widget {
    /// Form-control name, also the substitution key
    pub name: String,

    /// Label text
    pub label: String,

    /// Element and native input type
    pub kind: WidgetKind,

    /// Initial value
    #[serde(rename = "defaultValue")]
    pub default_value: String,

    /// Placeholder guidance text (date format hints)
    #[serde(default)]
    pub placeholder: Option<String>,
}

/// Describe the widget for a field
pub fn widget_for(field: &FieldSpec) -> Widget {
    let kind = match field.kind.input_type() {
        None => WidgetKind::TextArea,
        Some(input_type) => WidgetKind::Input {
            input_type: input_type.to_string(),
        },
    };

    Widget {
        name: field.name.clone(),
        label: field.label.clone(),
        kind,
        default_value: field.default_value.clone(),
        placeholder: field.date_format_hint().map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_minimal_field() {
        let spec = resolve_field_spec(&json!({ "name": "topic" }));
        assert_eq!(spec.name, "topic");
        assert_eq!(spec.label, "topic");
        assert_eq!(spec.kind, FieldKind::Text);
        assert_eq!(spec.default_value, "");
    }

    #[test]
    fn test_resolve_full_field() {
        let spec = resolve_field_spec(&json!({
            "name": "count",
            "description": "How many",
            "input": "number",
            "default": 5
        }));
        assert_eq!(spec.label, "How many");
        assert_eq!(spec.kind, FieldKind::Other("number".to_string()));
        assert_eq!(spec.default_value, "5");
    }

    #[test]
    fn test_widget_for_multiline() {
        let spec = resolve_field_spec(&json!({ "name": "body", "input": "multiline_text" }));
        let widget = widget_for(&spec);
        assert_eq!(widget.kind, WidgetKind::TextArea);
        assert_eq!(widget.placeholder, None);
    }

    #[test]
    fn test_widget_for_date_hint_is_cosmetic() {
        let spec = resolve_field_spec(&json!({
            "name": "due",
            "input": "date(YYYY-MM-DD)",
            "default": "tomorrow"
        }));
        let widget = widget_for(&spec);

        assert_eq!(
            widget.kind,
            WidgetKind::Input {
                input_type: "date".to_string()
            }
        );
        assert_eq!(widget.placeholder.as_deref(), Some("YYYY-MM-DD"));
        // Defaults are not reformatted to match the hint
        assert_eq!(widget.default_value, "tomorrow");
    }

    #[test]
    fn test_widget_for_passthrough_type() {
        let spec = resolve_field_spec(&json!({ "name": "mail", "input": "email" }));
        assert_eq!(
            widget_for(&spec).kind,
            WidgetKind::Input {
                input_type: "email".to_string()
            }
        );
    }

    #[test]
    fn test_control_id() {
        assert_eq!(control_id(0, "topic"), "in-0-topic");
        assert_eq!(control_id(12, "x"), "in-12-x");
    }
}
