//! Per-step binding state and recomputation

use std::collections::HashMap;

use crate::interpolate::{interpolate, placeholders};
use crate::{BuilderError, Result, Step};

/// Current field values of one step, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings(HashMap<String, String>);

impl Bindings {
    /// Seed bindings from a step's field defaults
    ///
    /// Duplicate names collapse into one binding; the last default wins.
    pub fn from_defaults(step: &Step) -> Self {
        step.fields
            .iter()
            .map(|f| (f.name.clone(), f.default_value.clone()))
            .collect()
    }

    /// Current value for `name`
    ///
    /// Empty values are reported as absent, so they substitute the same way
    /// as names that were never bound.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Set the value for `name`, returning the previous one
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(name.into(), value.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Owns one step's bindings and its resolved text
///
/// Every change re-interpolates the whole template from the full binding set.
#[derive(Debug, Clone)]
pub struct StepController {
    index: usize,
    step: Step,
    bindings: Bindings,
    resolved: String,
}

impl StepController {
    /// Create a controller seeded with the step's defaults
    ///
    /// The resolved text already reflects the defaults.
    pub fn new(index: usize, step: Step) -> Self {
        for name in placeholders(&step.template) {
            if !step.has_field(name) {
                log::warn!(
                    "step {} ('{}'): placeholder '{}' has no matching field",
                    index,
                    step.phase,
                    name
                );
            }
        }

        let bindings = Bindings::from_defaults(&step);
        let resolved = interpolate(&step.template, &bindings);

        Self {
            index,
            step,
            bindings,
            resolved,
        }
    }

    /// Zero-based position of the step in its document
    pub fn index(&self) -> usize {
        self.index
    }

    /// The step this controller was built from
    pub fn step(&self) -> &Step {
        &self.step
    }

    /// Current bindings
    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Current resolved text
    pub fn resolved_text(&self) -> &str {
        &self.resolved
    }

    /// Apply an edit to one of this step's fields and recompute
    ///
    /// Fails with [`BuilderError::UnknownField`] if the step declares no
    /// field called `name`; nothing changes in that case.
    pub fn on_field_changed(&mut self, name: &str, value: impl Into<String>) -> Result<&str> {
        if !self.step.has_field(name) {
            return Err(BuilderError::UnknownField {
                step: self.index,
                name: name.to_string(),
            });
        }

        self.bindings.set(name, value);
        self.recompute();
        Ok(self.resolved.as_str())
    }

    fn recompute(&mut self) {
        self.resolved = interpolate(&self.step.template, &self.bindings);
        log::debug!("step {} recomputed ({} bytes)", self.index, self.resolved.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldKind, FieldSpec};

    fn field(name: &str, default_value: &str) -> FieldSpec {
        FieldSpec {
            name: name.to_string(),
            label: name.to_string(),
            kind: FieldKind::Text,
            default_value: default_value.to_string(),
        }
    }

    fn step(fields: Vec<FieldSpec>, template: &str) -> Step {
        Step {
            phase: "Test".to_string(),
            fields,
            template: template.to_string(),
        }
    }

    #[test]
    fn test_initial_text_uses_defaults() {
        let controller = StepController::new(0, step(vec![field("x", "hi")], "Hello {{x}}!"));
        assert_eq!(controller.resolved_text(), "Hello hi!");
    }

    #[test]
    fn test_field_change_recomputes_whole_template() {
        let mut controller = StepController::new(
            0,
            step(vec![field("a", "1"), field("b", "2")], "{{a}}+{{b}}={{a}}{{b}}"),
        );
        assert_eq!(controller.resolved_text(), "1+2=12");

        assert_eq!(controller.on_field_changed("a", "3").unwrap(), "3+2=32");
        assert_eq!(controller.on_field_changed("b", "").unwrap(), "3+=3");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut controller = StepController::new(4, step(vec![field("x", "hi")], "{{x}}"));

        let err = controller.on_field_changed("y", "nope").unwrap_err();
        assert!(matches!(err, BuilderError::UnknownField { step: 4, ref name } if name == "y"));
        assert_eq!(controller.resolved_text(), "hi");
        assert_eq!(controller.bindings().get("y"), None);
    }

    #[test]
    fn test_duplicate_names_share_binding() {
        let mut controller = StepController::new(
            0,
            step(vec![field("x", "first"), field("x", "second")], "{{x}}"),
        );
        assert_eq!(controller.resolved_text(), "second");
        assert_eq!(controller.bindings().len(), 1);

        controller.on_field_changed("x", "edited").unwrap();
        assert_eq!(controller.resolved_text(), "edited");
    }

    #[test]
    fn test_bindings_treat_empty_as_absent() {
        let mut bindings = Bindings::default();
        bindings.set("x", "");
        assert_eq!(bindings.get("x"), None);
        assert_eq!(bindings.len(), 1);

        assert_eq!(bindings.set("x", "v"), Some(String::new()));
        assert_eq!(bindings.get("x"), Some("v"));
    }
}
