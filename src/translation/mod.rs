mod chat;
mod dispatch;
mod error;
mod language;
mod mtran;
mod prompt;
mod provider;

use crate::config::Settings;

pub use chat::{ChatClient, normalize_chat_endpoint};
pub use dispatch::{HttpTranslator, Translator, provider_cache_scope, provider_prompt_hash};
pub use error::TranslateError;
pub use language::{
    COMMON_LANGUAGES, print_languages, validate_language, validate_source_language,
};
pub use mtran::{DEFAULT_API_URL, MTranClient, normalize_api_url};
pub use prompt::DEFAULT_SYSTEM_PROMPT;
pub use provider::ProviderKind;

/// Upper bound for a single backend request.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

pub const DEFAULT_SOURCE_LANGUAGE: &str = "auto";
pub const DEFAULT_TARGET_LANGUAGE: &str = "zh-Hant";

/// Text to translate plus the language pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub source_text: String,
    pub from: String,
    pub to: String,
}

impl TranslationRequest {
    pub fn new(source_text: &str, from: &str, to: &str) -> Self {
        Self {
            source_text: source_text.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    pub fn from_settings(settings: &Settings, source_text: &str) -> Self {
        Self::new(source_text, &settings.from, &settings.to)
    }

    /// Source language, `auto` when unset.
    pub fn source_language(&self) -> &str {
        non_empty_or(&self.from, DEFAULT_SOURCE_LANGUAGE)
    }

    /// Target language, `zh-Hant` when unset.
    pub fn target_language(&self) -> &str {
        non_empty_or(&self.to, DEFAULT_TARGET_LANGUAGE)
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}
