use sha2::{Digest, Sha256};

pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a translation engine for source code comments. Return only translated text.";

pub const USER_PROMPT_TEMPLATE: &str = "Translate this code comment from {from} to {to}. \
     Return translated text only.\n{text}";

/// Picks the configured system prompt, falling back to the built-in one when blank.
pub fn system_prompt(configured: Option<&str>) -> &str {
    configured
        .filter(|p| !p.trim().is_empty())
        .unwrap_or(DEFAULT_SYSTEM_PROMPT)
}

/// Hash of the effective prompt pair, so cached chat translations are
/// invalidated when either prompt changes.
pub fn prompt_hash(configured: Option<&str>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(system_prompt(configured).as_bytes());
    hasher.update([0]);
    hasher.update(USER_PROMPT_TEMPLATE.as_bytes());
    hex::encode(hasher.finalize())
}

#[allow(clippy::literal_string_with_formatting_args)]
pub fn build_user_prompt(from: &str, to: &str, text: &str) -> String {
    // {from}/{to}/{text} are placeholders for string replacement, not format arguments
    USER_PROMPT_TEMPLATE
        .replace("{from}", from)
        .replace("{to}", to)
        .replace("{text}", text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_user_prompt() {
        let prompt = build_user_prompt("en", "ja", "open the file");
        assert_eq!(
            prompt,
            "Translate this code comment from en to ja. Return translated text only.\nopen the file"
        );
    }

    #[test]
    fn test_text_containing_placeholder_is_not_expanded_twice() {
        let prompt = build_user_prompt("en", "ja", "keep {to} literal");
        assert!(prompt.ends_with("\nkeep {to} literal"));
    }

    #[test]
    fn test_system_prompt_fallback() {
        assert_eq!(system_prompt(None), DEFAULT_SYSTEM_PROMPT);
        assert_eq!(system_prompt(Some("  ")), DEFAULT_SYSTEM_PROMPT);
        assert_eq!(system_prompt(Some("Be terse.")), "Be terse.");
    }

    #[test]
    fn test_prompt_hash_follows_effective_prompt() {
        assert_eq!(prompt_hash(None), prompt_hash(Some("   ")));
        assert_eq!(prompt_hash(None), prompt_hash(Some(DEFAULT_SYSTEM_PROMPT)));
        assert_ne!(prompt_hash(None), prompt_hash(Some("Be terse.")));
        assert_eq!(prompt_hash(None).len(), 64);
    }
}
