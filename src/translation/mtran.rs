//! Client for a local MTran server's `/translate` endpoint.

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::TranslateError;
use super::provider::ProviderKind;
use super::{DEFAULT_TIMEOUT_SECS, TranslationRequest};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8989";

/// Trims the API URL, falls back to the local default, and drops one trailing slash.
pub fn normalize_api_url(url: &str) -> String {
    let trimmed = url.trim();
    let value = if trimmed.is_empty() {
        DEFAULT_API_URL
    } else {
        trimmed
    };
    value.strip_suffix('/').unwrap_or(value).to_string()
}

#[derive(Debug, Serialize)]
struct TranslateBody<'a> {
    from: &'a str,
    to: &'a str,
    text: &'a str,
    html: bool,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(default, rename = "translatedText")]
    translated_text: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

pub struct MTranClient {
    client: Client,
    api_url: String,
    api_token: Option<String>,
    timeout_secs: u64,
}

impl MTranClient {
    pub fn new(api_url: &str, api_token: Option<&str>) -> Self {
        Self {
            client: Client::new(),
            api_url: normalize_api_url(api_url),
            api_token: api_token
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Reuses an existing connection pool.
    #[must_use]
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    fn translate_url(&self) -> Result<Url, TranslateError> {
        let mut url = Url::parse(&format!("{}/translate", self.api_url)).map_err(|e| {
            TranslateError::config(format!("Invalid MTran API URL '{}': {e}", self.api_url))
        })?;
        if let Some(token) = &self.api_token {
            url.query_pairs_mut().append_pair("token", token);
        }
        Ok(url)
    }

    pub async fn translate(&self, request: &TranslationRequest) -> Result<String, TranslateError> {
        if request.source_text.is_empty() {
            return Err(TranslateError::EmptyInput);
        }

        let url = self.translate_url()?;
        let body = TranslateBody {
            from: request.source_language(),
            to: request.target_language(),
            text: &request.source_text,
            html: false,
        };

        let mut http_request = self
            .client
            .post(url)
            .timeout(Duration::from_secs(self.timeout_secs))
            .json(&body);
        if let Some(token) = &self.api_token {
            http_request = http_request.bearer_auth(token);
        }

        let response = http_request
            .send()
            .await
            .map_err(|e| TranslateError::from_reqwest(&e, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslateError::Http {
                provider: ProviderKind::MTran.display_name(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| TranslateError::from_reqwest(&e, self.timeout_secs))?;

        extract_translation(&body)
    }
}

fn extract_translation(body: &str) -> Result<String, TranslateError> {
    let parsed: Option<TranslateResponse> = serde_json::from_str(body)
        .map_err(|e| TranslateError::malformed(format!("Invalid MTran response: {e}")))?;

    let data = parsed.ok_or_else(|| TranslateError::malformed("Empty response from MTran."))?;

    if let Some(error) = data.error.filter(|e| !e.is_empty()) {
        return Err(TranslateError::MalformedResponse(error));
    }

    data.result
        .filter(|t| !t.is_empty())
        .or_else(|| data.translated_text.filter(|t| !t.is_empty()))
        .ok_or_else(|| TranslateError::malformed("No translated text in response."))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(text: &str) -> TranslationRequest {
        TranslationRequest::new(text, "en", "zh-Hant")
    }

    #[test]
    fn test_normalize_api_url() {
        assert_eq!(normalize_api_url("http://h:1/"), "http://h:1");
        assert_eq!(normalize_api_url(" http://h:1 "), "http://h:1");
        assert_eq!(normalize_api_url(""), DEFAULT_API_URL);
        assert_eq!(normalize_api_url("   "), DEFAULT_API_URL);
    }

    #[test]
    fn test_extract_translation_prefers_result() {
        let text = extract_translation(r#"{"result":"你好","translatedText":"哈囉"}"#).unwrap();
        assert_eq!(text, "你好");
    }

    #[test]
    fn test_extract_translation_falls_back_to_translated_text() {
        let text = extract_translation(r#"{"result":"","translatedText":"哈囉"}"#).unwrap();
        assert_eq!(text, "哈囉");
    }

    #[test]
    fn test_extract_translation_errors() {
        assert_eq!(
            extract_translation(r#"{"error":"model not loaded"}"#),
            Err(TranslateError::MalformedResponse("model not loaded".to_string()))
        );
        assert!(matches!(
            extract_translation("null"),
            Err(TranslateError::MalformedResponse(_))
        ));
        assert!(matches!(
            extract_translation("{}"),
            Err(TranslateError::MalformedResponse(_))
        ));
        assert!(matches!(
            extract_translation("<html>"),
            Err(TranslateError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_translate_posts_body_and_token() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/translate"))
            .and(query_param("token", "secret"))
            .and(header("Authorization", "Bearer secret"))
            .and(body_json(serde_json::json!({
                "from": "en",
                "to": "zh-Hant",
                "text": "hello",
                "html": false
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"result": "你好"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = MTranClient::new(&format!("{}/", server.uri()), Some("secret"));
        let translated = client.translate(&request("hello")).await.unwrap();
        assert_eq!(translated, "你好");
    }

    #[tokio::test]
    async fn test_translate_without_token_sends_no_auth() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/translate"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"translatedText": "你好"})),
            )
            .mount(&server)
            .await;

        let client = MTranClient::new(&server.uri(), Some("  "));
        let translated = client.translate(&request("hello")).await.unwrap();
        assert_eq!(translated, "你好");

        let received = server.received_requests().await.unwrap();
        assert_eq!(received.len(), 1);
        assert!(received[0].headers.get("authorization").is_none());
        assert!(received[0].url.query().is_none());
    }

    #[tokio::test]
    async fn test_translate_http_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = MTranClient::new(&server.uri(), None);
        let err = client.translate(&request("hello")).await.unwrap_err();
        assert_eq!(
            err,
            TranslateError::Http {
                provider: "MTran",
                status: 500
            }
        );
    }

    #[tokio::test]
    async fn test_translate_timeout() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"result": "late"}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let client = MTranClient::new(&server.uri(), None).with_timeout(1);
        let err = client.translate(&request("hello")).await.unwrap_err();
        assert_eq!(err, TranslateError::Timeout(1));
    }

    #[tokio::test]
    async fn test_translate_empty_text_skips_network() {
        let client = MTranClient::new("http://127.0.0.1:9", None);
        let err = client.translate(&request("")).await.unwrap_err();
        assert_eq!(err, TranslateError::EmptyInput);
    }
}
