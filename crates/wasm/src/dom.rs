//! DOM rendering and input wiring for a live builder

use std::cell::RefCell;
use std::rc::Rc;

use prompt_builder::{control_id, BuilderConfig, StepBuilder, Widget, WidgetKind};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, HtmlTextAreaElement};

/// A rendered form control
#[derive(Clone)]
enum Control {
    Input(HtmlInputElement),
    TextArea(HtmlTextAreaElement),
}

impl Control {
    fn value(&self) -> String {
        match self {
            Control::Input(el) => el.value(),
            Control::TextArea(el) => el.value(),
        }
    }

    fn element(&self) -> &Element {
        match self {
            Control::Input(el) => el.as_ref(),
            Control::TextArea(el) => el.as_ref(),
        }
    }
}

fn form_heading(index: usize, phase: &str) -> String {
    format!("ステップ {}：{}", index + 1, phase)
}

fn prompt_heading(index: usize, phase: &str) -> String {
    format!("ステップ {} プロンプト：{}", index + 1, phase)
}

fn create(document: &Document, tag: &str, class: Option<&str>) -> Result<Element, JsValue> {
    let el = document.create_element(tag)?;
    if let Some(class) = class {
        el.set_class_name(class);
    }
    Ok(el)
}

fn create_control(
    document: &Document,
    step: usize,
    widget: &Widget,
) -> Result<Control, JsValue> {
    let control = match &widget.kind {
        WidgetKind::TextArea => {
            let el: HtmlTextAreaElement = document.create_element("textarea")?.dyn_into()?;
            el.set_value(&widget.default_value);
            Control::TextArea(el)
        }
        WidgetKind::Input { input_type } => {
            let el: HtmlInputElement = document.create_element("input")?.dyn_into()?;
            el.set_type(input_type);
            if let Some(placeholder) = &widget.placeholder {
                el.set_placeholder(placeholder);
            }
            el.set_value(&widget.default_value);
            Control::Input(el)
        }
    };

    let el = control.element();
    el.set_id(&control_id(step, &widget.name));
    el.set_attribute("name", &widget.name)?;
    Ok(control)
}

/// Render `builder` into `container`, replacing its contents
///
/// Each step becomes a form column and an output column. Every control's
/// `input` event feeds its own step; the output column is repainted from the
/// builder's change notifications.
pub fn mount(
    container: &HtmlElement,
    builder: StepBuilder,
    config: &BuilderConfig,
) -> Result<(), JsValue> {
    let document = container
        .owner_document()
        .ok_or_else(|| JsValue::from_str("container is not attached to a document"))?;

    container.set_inner_html("");
    let title = create(&document, "h2", Some("page-title"))?;
    title.set_text_content(Some(builder.title()));
    container.append_child(&title)?;

    let mut controls: Vec<(usize, String, Control)> = Vec::new();
    let mut outputs: Vec<Element> = Vec::with_capacity(builder.step_count());

    for controller in builder.steps() {
        let index = controller.index();
        let phase = controller.step().phase.as_str();

        let step_div = create(&document, "div", Some("step-container"))?;

        let form_div = create(&document, "div", Some("step-form"))?;
        let heading = create(&document, "h3", None)?;
        heading.set_text_content(Some(&form_heading(index, phase)));
        form_div.append_child(&heading)?;

        for widget in builder.widgets(index).map_err(|e| JsValue::from_str(&e.to_string()))? {
            let group = create(&document, "div", Some("form-group"))?;

            let label = create(&document, "label", None)?;
            label.set_attribute("for", &control_id(index, &widget.name))?;
            label.set_text_content(Some(&widget.label));

            let control = create_control(&document, index, &widget)?;
            group.append_child(&label)?;
            group.append_child(control.element())?;
            form_div.append_child(&group)?;

            controls.push((index, widget.name, control));
        }

        let prompt_div = create(&document, "div", Some("step-prompt"))?;
        let heading = create(&document, "h3", None)?;
        heading.set_text_content(Some(&prompt_heading(index, phase)));
        let output = create(&document, "div", Some("prompt-text"))?;
        output.set_text_content(Some(&config.loading_text));
        prompt_div.append_child(&heading)?;
        prompt_div.append_child(&output)?;

        step_div.append_child(&form_div)?;
        step_div.append_child(&prompt_div)?;
        container.append_child(&step_div)?;

        outputs.push(output);
    }

    let builder = Rc::new(RefCell::new(builder));

    for (index, output) in outputs.into_iter().enumerate() {
        builder
            .borrow_mut()
            .subscribe(index, move |_, text| output.set_text_content(Some(text)))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
    }

    for (index, name, control) in controls {
        let builder = Rc::clone(&builder);
        let source = control.clone();
        let on_input = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
            if let Err(e) = builder.borrow_mut().set_field(index, &name, source.value()) {
                web_sys::console::warn_1(&JsValue::from_str(&e.to_string()));
            }
        });
        control
            .element()
            .add_event_listener_with_callback("input", on_input.as_ref().unchecked_ref())?;
        // The listener lives as long as the page
        on_input.forget();
    }

    builder.borrow_mut().refresh();
    Ok(())
}
