//! WASM bindings for prompt-builder
//!
//! This crate provides the browser host for the builder engine:
//! - Fetching a YAML prompt document and rendering it into a container
//! - Automatic mounting on `#builder-root` and `div[yaml]` elements
//! - A JavaScript-friendly `PromptBuilder` class for custom front ends
//!
//! # Example (HTML)
//!
//! ```html
//! <div id="builder-root" data-yaml="/prompts/review.yaml"></div>
//! <div yaml="/prompts/summary.yaml"></div>
//! ```
//!
//! # Example (JavaScript)
//!
//! ```javascript
//! import init, { initPromptBuilder, PromptBuilder } from 'prompt-builder-wasm';
//!
//! await init();
//!
//! // Render into an element
//! await initPromptBuilder(document.querySelector('#my-root'), '/prompts/review.yaml');
//!
//! // Or drive the engine yourself
//! const builder = PromptBuilder.fromYaml(yamlText);
//! builder.subscribe(0, (step, text) => console.log(step, text));
//! builder.setField(0, 'topic', 'lifetimes');
//! ```

mod dom;
mod fetch;
mod style;

use prompt_builder::{BuilderConfig, BuilderError, DocumentFormat, StepBuilder, TemplateDocument};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, UrlSearchParams};

pub use style::STYLESHEET;

fn to_js(e: BuilderError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

// Initialize panic hook, styles and auto-mounting on module load
#[wasm_bindgen(start)]
pub fn init() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    // Nothing to mount outside a page (workers, Node)
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return Ok(());
    };
    style::inject(&document)?;

    if document.ready_state() == "loading" {
        let on_ready = Closure::<dyn FnMut()>::new(move || {
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                auto_mount(&document);
            }
        });
        document.add_event_listener_with_callback(
            "DOMContentLoaded",
            on_ready.as_ref().unchecked_ref(),
        )?;
        on_ready.forget();
    } else {
        auto_mount(&document);
    }

    Ok(())
}

/// Mount builders on every recognised host element
///
/// - `#builder-root`: document URL from the `template` or `url` query
///   parameter, else its `data-yaml` attribute
/// - every `div[yaml]`: document URL from its `yaml` attribute
fn auto_mount(document: &Document) {
    if let Some(root) = document.get_element_by_id("builder-root") {
        let params = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .and_then(|search| UrlSearchParams::new_with_str(&search).ok());
        let url = pick_url(
            params.as_ref().and_then(|p| p.get("template")),
            params.as_ref().and_then(|p| p.get("url")),
            root.get_attribute("data-yaml"),
        );

        if let (Some(url), Ok(root)) = (url, root.dyn_into::<HtmlElement>()) {
            spawn_mount(root, url);
        }
    }

    if let Ok(widgets) = document.query_selector_all("div[yaml]") {
        for i in 0..widgets.length() {
            let Some(el) = widgets
                .item(i)
                .and_then(|node| node.dyn_into::<HtmlElement>().ok())
            else {
                continue;
            };
            match el.get_attribute("yaml") {
                Some(url) if !url.is_empty() => spawn_mount(el, url),
                _ => {}
            }
        }
    }
}

/// Document URL for `#builder-root`
///
/// First non-empty of the `template` query parameter, the `url` query
/// parameter and the `data-yaml` attribute. `None` leaves the root untouched.
fn pick_url(
    template: Option<String>,
    url: Option<String>,
    data_yaml: Option<String>,
) -> Option<String> {
    [template, url, data_yaml]
        .into_iter()
        .flatten()
        .find(|candidate| !candidate.is_empty())
}

fn spawn_mount(container: HtmlElement, url: String) {
    wasm_bindgen_futures::spawn_local(async move {
        let config = BuilderConfig::default();
        // Acquisition failures are already shown and logged by `load_or_report`
        if let Ok(document) = load_or_report(&container, &url, &config).await {
            if let Err(e) = dom::mount(&container, StepBuilder::new(document), &config) {
                web_sys::console::error_1(&e);
            }
        }
    });
}

/// Load the document at `url`, reporting a failure in `container`
///
/// On failure the container shows the configured message and the cause is
/// logged to the console; no steps are rendered and nothing is retried.
async fn load_or_report(
    container: &HtmlElement,
    url: &str,
    config: &BuilderConfig,
) -> prompt_builder::Result<TemplateDocument> {
    fetch::load(url, config).await.map_err(|e| {
        container.set_text_content(Some(&config.load_failure_message));
        web_sys::console::error_1(&JsValue::from_str(&e.to_string()));
        e
    })
}

/// Load the document at `url` and render a builder into `container`
///
/// Rejects with the configured failure message if the document cannot be
/// obtained.
async fn mount(container: &HtmlElement, url: &str, config: &BuilderConfig) -> Result<(), JsValue> {
    let document = load_or_report(container, url, config)
        .await
        .map_err(|_| JsValue::from_str(&config.load_failure_message))?;

    dom::mount(container, StepBuilder::new(document), config)
}

/// Render the prompt document at `yamlUrl` into `container`
///
/// @param container - Host element (its contents are replaced)
/// @param yamlUrl - Document URL
/// @returns Promise rejected with the failure message if loading fails
#[wasm_bindgen(js_name = initPromptBuilder)]
pub async fn init_prompt_builder(container: HtmlElement, yaml_url: String) -> Result<(), JsValue> {
    mount(&container, &yaml_url, &BuilderConfig::default()).await
}

/// Same as `initPromptBuilder` with custom strings
///
/// @param config - `{ defaultTitle, loadFailureMessage, loadingText }`, all optional
#[wasm_bindgen(js_name = initPromptBuilderWith)]
pub async fn init_prompt_builder_with(
    container: HtmlElement,
    yaml_url: String,
    config: JsValue,
) -> Result<(), JsValue> {
    let config: BuilderConfig = if config.is_undefined() || config.is_null() {
        BuilderConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config)?
    };
    mount(&container, &yaml_url, &config).await
}

/// Headless builder for custom front ends
#[wasm_bindgen]
pub struct PromptBuilder {
    inner: StepBuilder,
}

impl PromptBuilder {
    fn from_text(text: &str, format: DocumentFormat) -> Result<PromptBuilder, JsValue> {
        let document = prompt_builder::parse_document(text, format, &BuilderConfig::default())
            .map_err(to_js)?;
        Ok(PromptBuilder {
            inner: StepBuilder::new(document),
        })
    }
}

#[wasm_bindgen]
impl PromptBuilder {
    /// Create a builder from YAML text
    ///
    /// @param yaml - Document text
    /// @returns PromptBuilder instance
    #[wasm_bindgen(js_name = fromYaml)]
    pub fn from_yaml(yaml: &str) -> Result<PromptBuilder, JsValue> {
        Self::from_text(yaml, DocumentFormat::Yaml)
    }

    /// Create a builder from JSON text
    ///
    /// @param json - Document text
    /// @returns PromptBuilder instance
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(json: &str) -> Result<PromptBuilder, JsValue> {
        Self::from_text(json, DocumentFormat::Json)
    }

    pub fn title(&self) -> String {
        self.inner.title().to_string()
    }

    #[wasm_bindgen(js_name = stepCount)]
    pub fn step_count(&self) -> usize {
        self.inner.step_count()
    }

    pub fn phase(&self, step: usize) -> Result<String, JsValue> {
        self.inner.phase(step).map(str::to_string).map_err(to_js)
    }

    /// Widget descriptors of a step
    ///
    /// @returns Array of `{ name, label, kind, defaultValue, placeholder }`
    pub fn fields(&self, step: usize) -> Result<JsValue, JsValue> {
        let widgets = self.inner.widgets(step).map_err(to_js)?;
        Ok(serde_wasm_bindgen::to_value(&widgets)?)
    }

    /// Apply an edit
    ///
    /// @returns The step's new resolved text
    #[wasm_bindgen(js_name = setField)]
    pub fn set_field(&mut self, step: usize, name: &str, value: &str) -> Result<String, JsValue> {
        self.inner
            .set_field(step, name, value)
            .map(str::to_string)
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = resolvedText)]
    pub fn resolved_text(&self, step: usize) -> Result<String, JsValue> {
        self.inner
            .resolved_text(step)
            .map(str::to_string)
            .map_err(to_js)
    }

    /// Register `callback(step, text)` for a step's resolved text
    pub fn subscribe(&mut self, step: usize, callback: js_sys::Function) -> Result<(), JsValue> {
        self.inner
            .subscribe(step, move |index, text| {
                let result = callback.call2(
                    &JsValue::NULL,
                    &JsValue::from(index as u32),
                    &JsValue::from_str(text),
                );
                if let Err(e) = result {
                    web_sys::console::error_1(&e);
                }
            })
            .map_err(to_js)
    }

    /// Re-send the current text of every step to its subscribers
    pub fn refresh(&mut self) {
        self.inner.refresh();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    const DEMO: &str = r#"
prompt_name: Demo
templates:
  - template:
      phase: Intro
      form:
        - item: { name: x, input: text, default: hi }
      prompt: "Hello {{x}}!"
"#;

    #[wasm_bindgen_test]
    fn test_prompt_builder_from_yaml() {
        let mut builder = PromptBuilder::from_yaml(DEMO).unwrap();
        assert_eq!(builder.title(), "Demo");
        assert_eq!(builder.step_count(), 1);
        assert_eq!(builder.resolved_text(0).unwrap(), "Hello hi!");
        assert_eq!(builder.set_field(0, "x", "world").unwrap(), "Hello world!");
    }

    #[test]
    fn test_pick_url_prefers_template_param() {
        assert_eq!(
            pick_url(
                Some("t.yaml".into()),
                Some("u.yaml".into()),
                Some("d.yaml".into())
            ),
            Some("t.yaml".to_string())
        );
        assert_eq!(
            pick_url(None, Some("u.yaml".into()), Some("d.yaml".into())),
            Some("u.yaml".to_string())
        );
        assert_eq!(
            pick_url(None, None, Some("d.yaml".into())),
            Some("d.yaml".to_string())
        );
    }

    #[test]
    fn test_pick_url_skips_empty_values() {
        // `?template=&url=a.yaml`
        assert_eq!(
            pick_url(Some(String::new()), Some("a.yaml".into()), None),
            Some("a.yaml".to_string())
        );
        assert_eq!(
            pick_url(Some(String::new()), Some(String::new()), Some("d.yaml".into())),
            Some("d.yaml".to_string())
        );
        // `data-yaml=""` and no query: nothing to mount
        assert_eq!(pick_url(None, None, Some(String::new())), None);
        assert_eq!(pick_url(None, None, None), None);
    }

    #[wasm_bindgen_test]
    fn test_prompt_builder_from_json() {
        let builder = PromptBuilder::from_json(r#"{ "templates": [] }"#).unwrap();
        assert_eq!(builder.step_count(), 0);
        assert_eq!(builder.title(), prompt_builder::DEFAULT_TITLE);
    }
}
