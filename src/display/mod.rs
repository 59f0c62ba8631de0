//! Rendering of translations for the two display modes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of characters of a translation shown in an inline title.
pub const MAX_LENS_TITLE_LEN: usize = 120;

/// Icon token prepended to inline titles.
pub const LENS_ICON: &str = "$(globe) ";

const ELLIPSIS: &str = "...";

/// Where a translation is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Annotation above the comment line, refreshed as the cursor moves.
    #[default]
    Inline,
    /// Tooltip resolved on demand when the pointer rests on a comment.
    Hover,
}

impl DisplayMode {
    /// Maps a configured value to a display mode.
    ///
    /// Only `hover` (case-insensitive, surrounding whitespace ignored) selects
    /// [`DisplayMode::Hover`]; every other value falls back to inline.
    pub fn normalize(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("hover") {
            Self::Hover
        } else {
            Self::Inline
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inline => "inline",
            Self::Hover => "hover",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders the title of an inline annotation, clipping long translations.
pub fn lens_title(translated: &str) -> String {
    if translated.chars().count() > MAX_LENS_TITLE_LEN {
        let clipped: String = translated.chars().take(MAX_LENS_TITLE_LEN).collect();
        format!("{LENS_ICON}{clipped}{ELLIPSIS}")
    } else {
        format!("{LENS_ICON}{translated}")
    }
}

/// Renders hover contents. Hover text carries no icon token.
pub fn hover_text(translated: &str) -> String {
    translated.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lens_title_renders_icon() {
        assert_eq!(lens_title("你好"), "$(globe) 你好");
    }

    #[test]
    fn test_lens_title_truncates_long_translation() {
        let text = "a".repeat(200);
        let title = lens_title(&text);
        assert!(title.starts_with(LENS_ICON));
        assert!(title.ends_with("..."));
        assert_eq!(
            title.chars().count(),
            LENS_ICON.len() + MAX_LENS_TITLE_LEN + ELLIPSIS.len()
        );
    }

    #[test]
    fn test_lens_title_at_cap_is_not_clipped() {
        let text = "b".repeat(MAX_LENS_TITLE_LEN);
        let title = lens_title(&text);
        assert!(!title.ends_with("..."));
    }

    #[test]
    fn test_lens_title_counts_characters_not_bytes() {
        let text = "字".repeat(MAX_LENS_TITLE_LEN + 1);
        let title = lens_title(&text);
        assert!(title.ends_with("..."));
        assert_eq!(
            title.chars().count(),
            LENS_ICON.len() + MAX_LENS_TITLE_LEN + ELLIPSIS.len()
        );
    }

    #[test]
    fn test_hover_text_has_no_icon() {
        assert_eq!(hover_text("你好"), "你好");
    }

    #[test]
    fn test_display_mode_defaults_to_inline() {
        assert_eq!(DisplayMode::normalize(""), DisplayMode::Inline);
        assert_eq!(DisplayMode::normalize("codelens"), DisplayMode::Inline);
        assert_eq!(DisplayMode::normalize("tooltip"), DisplayMode::Inline);
    }

    #[test]
    fn test_display_mode_accepts_hover() {
        assert_eq!(DisplayMode::normalize("hover"), DisplayMode::Hover);
        assert_eq!(DisplayMode::normalize(" HOVER "), DisplayMode::Hover);
    }
}
