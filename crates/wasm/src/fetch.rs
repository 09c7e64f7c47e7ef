//! Document retrieval over `fetch`

use prompt_builder::{
    parse_document, BuilderConfig, BuilderError, DocumentFormat, Result, TemplateDocument,
};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

fn acquisition(context: &str, detail: impl std::fmt::Debug) -> BuilderError {
    BuilderError::AcquisitionError(format!("{}: {:?}", context, detail))
}

/// GET `url` and return the response body as text
async fn fetch_text(url: &str) -> Result<String> {
    let window = web_sys::window().ok_or_else(|| acquisition("fetch error", "no window"))?;

    let resp_value = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| acquisition("fetch error", e))?;
    let resp: Response = resp_value
        .dyn_into()
        .map_err(|_| acquisition("fetch error", "response is not a Response"))?;

    if !resp.ok() {
        return Err(BuilderError::AcquisitionError(format!(
            "HTTP {} for {}",
            resp.status(),
            url
        )));
    }

    let body = JsFuture::from(resp.text().map_err(|e| acquisition("body error", e))?)
        .await
        .map_err(|e| acquisition("body error", e))?;

    body.as_string()
        .ok_or_else(|| acquisition("body error", "response body is not text"))
}

/// Fetch, decode and normalize the document at `url`
///
/// This is the only asynchronous step of a build.
pub async fn load(url: &str, config: &BuilderConfig) -> Result<TemplateDocument> {
    let text = fetch_text(url).await?;
    parse_document(&text, DocumentFormat::from_path(url), config)
}
