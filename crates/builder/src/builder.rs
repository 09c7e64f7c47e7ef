//! Step builder orchestration

use std::fmt;

use crate::field::{widget_for, Widget};
use crate::step::StepController;
use crate::{BuilderError, FieldSpec, Result, TemplateDocument};

/// Callback receiving `(step_index, resolved_text)` after every recomputation
pub type OutputListener = Box<dyn FnMut(usize, &str)>;

/// Live builder over a normalized document
///
/// Holds one [`StepController`] per step. Edits are routed to the owning
/// step only, and that step's listeners are notified synchronously before
/// the call returns. Taking `&mut self` for edits means a listener can never
/// trigger another recomputation while one is in progress.
pub struct StepBuilder {
    title: String,
    controllers: Vec<StepController>,
    listeners: Vec<Vec<OutputListener>>,
}

impl StepBuilder {
    /// Build controllers for every step of `document`
    ///
    /// Each controller is seeded from its field defaults and has already
    /// resolved its template once, so the initial text reflects defaults.
    pub fn new(document: TemplateDocument) -> Self {
        let TemplateDocument { title, steps } = document;

        let controllers: Vec<StepController> = steps
            .into_iter()
            .enumerate()
            .map(|(index, step)| StepController::new(index, step))
            .collect();
        let listeners = controllers.iter().map(|_| Vec::new()).collect();

        log::debug!("built '{}' with {} step(s)", title, controllers.len());

        Self {
            title,
            controllers,
            listeners,
        }
    }

    /// Document title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Number of steps
    pub fn step_count(&self) -> usize {
        self.controllers.len()
    }

    /// Iterate over step controllers in document order
    pub fn steps(&self) -> impl Iterator<Item = &StepController> {
        self.controllers.iter()
    }

    /// Controller for one step
    pub fn step(&self, step: usize) -> Result<&StepController> {
        self.controllers
            .get(step)
            .ok_or(BuilderError::UnknownStep(step))
    }

    /// Phase label of a step
    pub fn phase(&self, step: usize) -> Result<&str> {
        Ok(self.step(step)?.step().phase.as_str())
    }

    /// Field specs of a step, in declaration order
    pub fn fields(&self, step: usize) -> Result<&[FieldSpec]> {
        Ok(self.step(step)?.step().fields.as_slice())
    }

    /// Widget descriptors of a step, in declaration order
    pub fn widgets(&self, step: usize) -> Result<Vec<Widget>> {
        Ok(self.fields(step)?.iter().map(widget_for).collect())
    }

    /// Current resolved text of a step
    pub fn resolved_text(&self, step: usize) -> Result<&str> {
        Ok(self.step(step)?.resolved_text())
    }

    /// Route an edit to its step, recompute and notify that step's listeners
    ///
    /// Returns the new resolved text. Other steps are never touched.
    pub fn set_field(&mut self, step: usize, name: &str, value: impl Into<String>) -> Result<&str> {
        let controller = self
            .controllers
            .get_mut(step)
            .ok_or(BuilderError::UnknownStep(step))?;
        let text = controller.on_field_changed(name, value)?;

        for listener in &mut self.listeners[step] {
            listener(step, text);
        }

        Ok(text)
    }

    /// Register a listener for a step's resolved text
    ///
    /// The listener is not called on registration; use [`Self::refresh`] or
    /// [`Self::resolved_text`] to paint the current state.
    pub fn subscribe<F>(&mut self, step: usize, listener: F) -> Result<()>
    where
        F: FnMut(usize, &str) + 'static,
    {
        let listeners = self
            .listeners
            .get_mut(step)
            .ok_or(BuilderError::UnknownStep(step))?;
        listeners.push(Box::new(listener));
        Ok(())
    }

    /// Notify every listener of every step with the current resolved text
    pub fn refresh(&mut self) {
        for (controller, listeners) in self.controllers.iter().zip(self.listeners.iter_mut()) {
            for listener in listeners.iter_mut() {
                listener(controller.index(), controller.resolved_text());
            }
        }
    }
}

impl fmt::Debug for StepBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepBuilder")
            .field("title", &self.title)
            .field("controllers", &self.controllers)
            .field(
                "listeners",
                &self.listeners.iter().map(Vec::len).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn two_step_builder() -> StepBuilder {
        StepBuilder::new(normalize(&json!({
            "prompt_name": "Two",
            "templates": [
                { "template": {
                    "phase": "One",
                    "form": [{ "item": { "name": "a", "default": "x" } }],
                    "prompt": "first {{a}}"
                } },
                { "template": {
                    "phase": "Two",
                    "form": [{ "item": { "name": "a", "default": "y" } }],
                    "prompt": "second {{a}}"
                } }
            ]
        })))
    }

    #[test]
    fn test_initial_pass_applies_defaults() {
        let builder = two_step_builder();
        assert_eq!(builder.title(), "Two");
        assert_eq!(builder.step_count(), 2);
        assert_eq!(builder.resolved_text(0).unwrap(), "first x");
        assert_eq!(builder.resolved_text(1).unwrap(), "second y");
    }

    #[test]
    fn test_edits_stay_within_their_step() {
        let mut builder = two_step_builder();
        assert_eq!(builder.set_field(0, "a", "edited").unwrap(), "first edited");
        assert_eq!(builder.resolved_text(1).unwrap(), "second y");
    }

    #[test]
    fn test_listeners_fire_for_own_step_only() {
        let mut builder = two_step_builder();
        let seen: Rc<RefCell<Vec<(usize, String)>>> = Rc::default();

        for step in 0..builder.step_count() {
            let seen = Rc::clone(&seen);
            builder
                .subscribe(step, move |index, text| {
                    seen.borrow_mut().push((index, text.to_string()))
                })
                .unwrap();
        }

        builder.set_field(1, "a", "z").unwrap();
        assert_eq!(*seen.borrow(), vec![(1, "second z".to_string())]);

        seen.borrow_mut().clear();
        builder.refresh();
        assert_eq!(
            *seen.borrow(),
            vec![(0, "first x".to_string()), (1, "second z".to_string())]
        );
    }

    #[test]
    fn test_unknown_step_and_field() {
        let mut builder = two_step_builder();

        assert!(matches!(
            builder.set_field(7, "a", "v"),
            Err(BuilderError::UnknownStep(7))
        ));
        assert!(matches!(
            builder.set_field(0, "nope", "v"),
            Err(BuilderError::UnknownField { step: 0, .. })
        ));
        assert!(builder.subscribe(2, |_, _| {}).is_err());
        assert!(builder.phase(2).is_err());
    }

    #[test]
    fn test_failed_edit_does_not_notify() {
        let mut builder = two_step_builder();
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);
        builder
            .subscribe(0, move |_, _| *counter.borrow_mut() += 1)
            .unwrap();

        let _ = builder.set_field(0, "nope", "v");
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn test_widgets() {
        let builder = two_step_builder();
        let widgets = builder.widgets(0).unwrap();
        assert_eq!(widgets.len(), 1);
        assert_eq!(widgets[0].name, "a");
        assert_eq!(widgets[0].default_value, "x");
        assert_eq!(builder.phase(1).unwrap(), "Two");
    }
}
