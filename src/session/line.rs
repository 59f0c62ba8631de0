use crate::comment::{build_translated_line, parse_comment_line};
use crate::config::Settings;
use crate::translation::{TranslateError, TranslationRequest, Translator};

/// Result of translating a comment line in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTranslation {
    /// The full replacement line, markers and indentation preserved.
    pub line: String,
    /// The translated comment body alone.
    pub translation: String,
}

/// Translates the comment on `line`, rebuilding it around the new text.
///
/// Returns `Ok(None)` when the line holds no comment or an empty one.
/// The in-memory cache is not consulted.
pub async fn translate_comment_line(
    translator: &dyn Translator,
    settings: &Settings,
    line: &str,
) -> Result<Option<LineTranslation>, TranslateError> {
    let Some(parsed) = parse_comment_line(line).filter(|p| p.is_translatable()) else {
        return Ok(None);
    };

    let request = TranslationRequest::from_settings(settings, &parsed.content);
    let translation = translator.translate(settings, &request).await?;

    Ok(Some(LineTranslation {
        line: build_translated_line(&parsed, &translation),
        translation,
    }))
}
