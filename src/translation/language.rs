//! Language code validation and the codes common translation backends accept.

use anyhow::Result;

use super::DEFAULT_SOURCE_LANGUAGE;
use crate::ui::Style;

/// Language codes (ISO 639-1, with script subtags for Chinese) and their names.
pub const COMMON_LANGUAGES: &[(&str, &str)] = &[
    ("ar", "Arabic"),
    ("bg", "Bulgarian"),
    ("cs", "Czech"),
    ("da", "Danish"),
    ("de", "German"),
    ("el", "Greek"),
    ("en", "English"),
    ("es", "Spanish"),
    ("et", "Estonian"),
    ("fa", "Persian"),
    ("fi", "Finnish"),
    ("fr", "French"),
    ("he", "Hebrew"),
    ("hi", "Hindi"),
    ("hr", "Croatian"),
    ("hu", "Hungarian"),
    ("id", "Indonesian"),
    ("it", "Italian"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("lt", "Lithuanian"),
    ("lv", "Latvian"),
    ("ms", "Malay"),
    ("nl", "Dutch"),
    ("no", "Norwegian"),
    ("pl", "Polish"),
    ("pt", "Portuguese"),
    ("ro", "Romanian"),
    ("ru", "Russian"),
    ("sk", "Slovak"),
    ("sl", "Slovenian"),
    ("sv", "Swedish"),
    ("th", "Thai"),
    ("tr", "Turkish"),
    ("uk", "Ukrainian"),
    ("vi", "Vietnamese"),
    ("zh", "Chinese"),
    ("zh-Hans", "Chinese (Simplified)"),
    ("zh-Hant", "Chinese (Traditional)"),
];

/// Prints all known language codes to stdout.
pub fn print_languages() {
    println!("{}", Style::header("Common language codes"));
    println!(
        "  {:8} {}",
        Style::code(DEFAULT_SOURCE_LANGUAGE),
        Style::secondary("Detect automatically (source only)")
    );
    for (code, name) in COMMON_LANGUAGES {
        println!("  {:8} {}", Style::code(code), Style::secondary(name));
    }
}

/// Validates a target language code.
///
/// # Errors
///
/// Returns an error if the language code is not in the known list.
pub fn validate_language(lang: &str) -> Result<()> {
    if COMMON_LANGUAGES.iter().any(|(code, _)| *code == lang) {
        Ok(())
    } else {
        anyhow::bail!(
            "Invalid language code: '{lang}'\n\n\
             Valid language codes: en, ja, ko, zh-Hans, zh-Hant, fr, de, ...\n\
             Run 'ct languages' to see all known codes."
        )
    }
}

/// Validates a source language code, which may also be `auto`.
pub fn validate_source_language(lang: &str) -> Result<()> {
    if lang == DEFAULT_SOURCE_LANGUAGE {
        Ok(())
    } else {
        validate_language(lang)
    }
}
