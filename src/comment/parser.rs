use regex::Regex;
use std::sync::LazyLock;

static LINE_COMMENT: LazyLock<Regex> = LazyLock::new(|| compile(r"^(\s*)(//+)(\s?)(.*)$"));

static SHORT_MARKER_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^(\s*)(#|;|--)(\s?)(.*)$"));

static BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^(\s*)(/\*)(\s?)(.*?)\s*(\*/)\s*$"));

#[allow(clippy::expect_used)]
fn compile(pattern: &str) -> Regex {
    // expect is safe: patterns are compile-time constants covered by tests
    Regex::new(pattern).expect("comment pattern must be valid")
}

/// A single source line split into indentation, delimiters, and payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedComment {
    pub indent: String,
    pub marker_start: String,
    /// `*/` for single-line block comments, empty otherwise.
    pub marker_end: String,
    /// `" "` when whitespace separated the opening marker from the payload.
    pub spacer_after_start: String,
    pub content: String,
}

impl ParsedComment {
    /// Returns `false` when the payload is blank and there is nothing to translate.
    pub fn is_translatable(&self) -> bool {
        !self.content.trim().is_empty()
    }

    pub fn is_block(&self) -> bool {
        !self.marker_end.is_empty()
    }
}

/// Parses a line as a `//`, `#`/`;`/`--`, or single-line `/* */` comment.
///
/// Returns `None` when the line matches none of these shapes. Block comments
/// must close on the same line.
pub fn parse_comment_line(line: &str) -> Option<ParsedComment> {
    if let Some(caps) = LINE_COMMENT
        .captures(line)
        .or_else(|| SHORT_MARKER_COMMENT.captures(line))
    {
        return Some(ParsedComment {
            indent: caps[1].to_string(),
            marker_start: caps[2].to_string(),
            marker_end: String::new(),
            spacer_after_start: spacer(&caps[3]),
            content: caps[4].to_string(),
        });
    }

    BLOCK_COMMENT.captures(line).map(|caps| ParsedComment {
        indent: caps[1].to_string(),
        marker_start: caps[2].to_string(),
        marker_end: caps[5].to_string(),
        spacer_after_start: spacer(&caps[3]),
        content: caps[4].to_string(),
    })
}

fn spacer(captured: &str) -> String {
    if captured.is_empty() {
        String::new()
    } else {
        " ".to_string()
    }
}

/// Rebuilds a full line from a parsed comment and a replacement payload,
/// keeping the original indentation and delimiter spacing.
pub fn build_translated_line(parsed: &ParsedComment, translated: &str) -> String {
    let mut line = format!(
        "{}{}{}{}",
        parsed.indent, parsed.marker_start, parsed.spacer_after_start, translated
    );
    if parsed.is_block() {
        line.push(' ');
        line.push_str(&parsed.marker_end);
    }
    line
}
