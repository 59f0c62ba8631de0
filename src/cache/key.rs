use crate::translation::{DEFAULT_SOURCE_LANGUAGE, DEFAULT_TARGET_LANGUAGE, normalize_api_url};

/// Builds the key shared by the translation cache and the in-flight map.
///
/// `scope` is either a provider scope (a JSON object) or a raw API URL; the
/// latter is normalized so a trailing slash never splits the cache.
pub fn make_cache_key(scope: &str, from: &str, to: &str, text: &str) -> String {
    let scope = scope.trim();
    let scope = if scope.starts_with('{') {
        scope.to_string()
    } else {
        normalize_api_url(scope)
    };

    let from = if from.is_empty() {
        DEFAULT_SOURCE_LANGUAGE
    } else {
        from
    };
    let to = if to.is_empty() {
        DEFAULT_TARGET_LANGUAGE
    } else {
        to
    };

    serde_json::json!({
        "scope": scope,
        "from": from,
        "to": to,
        "text": text,
    })
    .to_string()
}
