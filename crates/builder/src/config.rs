//! Builder configuration

use serde::{Deserialize, Serialize};

/// Title used when the document has no `prompt_name`
pub const DEFAULT_TITLE: &str = "テンプレート";

/// Message shown in place of the builder when the document cannot be loaded
pub const DEFAULT_LOAD_FAILURE_MESSAGE: &str = "テンプレート読み込みに失敗しました";

/// Text shown in a step's output area before the first recomputation lands
pub const DEFAULT_LOADING_TEXT: &str = "読み込み中…";

/// User-facing strings and defaults applied while loading a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Title applied when the document does not provide one
    #[serde(rename = "defaultTitle")]
    pub default_title: String,

    /// Message reported once if the document cannot be obtained
    #[serde(rename = "loadFailureMessage")]
    pub load_failure_message: String,

    /// Placeholder for output areas before the first render
    #[serde(rename = "loadingText")]
    pub loading_text: String,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            default_title: DEFAULT_TITLE.to_string(),
            load_failure_message: DEFAULT_LOAD_FAILURE_MESSAGE.to_string(),
            loading_text: DEFAULT_LOADING_TEXT.to_string(),
        }
    }
}

impl BuilderConfig {
    /// Override the default title
    pub fn with_default_title(mut self, title: impl Into<String>) -> Self {
        self.default_title = title.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: BuilderConfig =
            serde_json::from_str(r#"{ "defaultTitle": "Prompt" }"#).unwrap();

        assert_eq!(config.default_title, "Prompt");
        assert_eq!(config.load_failure_message, DEFAULT_LOAD_FAILURE_MESSAGE);
        assert_eq!(config.loading_text, DEFAULT_LOADING_TEXT);
    }
}
