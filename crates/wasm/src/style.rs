//! Stylesheet injected once per page

use wasm_bindgen::prelude::*;
use web_sys::Document;

const STYLE_ID: &str = "prompt-builder-styles";

pub const STYLESHEET: &str = r#"
.page-title { font-family: sans-serif; margin-bottom:1em; }
.step-container { display: flex; gap: 1em; margin-bottom: 2em; }
.step-form, .step-prompt { flex: 1; box-sizing: border-box; }
.step-form { border-right:1px solid #ccc; padding-right:1em; }
.step-prompt { padding-left:1em; }
.step-form h3,
.step-prompt h3 { margin-top:0; font-size:1.1em; }
.form-group { margin-bottom:.75em; }
.form-group label { display:block; margin-bottom:.25em; }
.form-group input, .form-group textarea { width:100%; padding:.5em; box-sizing:border-box; }
.form-group textarea { min-height:100px; resize:vertical; }
.prompt-text { white-space: pre-wrap; background:#f1f1f1; padding:.5em; border-radius:3px; }
"#;

/// Append the builder stylesheet to `<head>` unless it is already there
pub fn inject(document: &Document) -> Result<(), JsValue> {
    if document.get_element_by_id(STYLE_ID).is_some() {
        return Ok(());
    }

    let head = document
        .head()
        .ok_or_else(|| JsValue::from_str("document has no <head>"))?;
    let style = document.create_element("style")?;
    style.set_id(STYLE_ID);
    style.set_text_content(Some(STYLESHEET));
    head.append_child(&style)?;
    Ok(())
}
