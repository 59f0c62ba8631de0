//! Client for OpenAI-compatible chat completion endpoints.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::time::Duration;

use super::error::TranslateError;
use super::prompt::{build_user_prompt, system_prompt};
use super::provider::ProviderKind;
use super::{DEFAULT_TIMEOUT_SECS, TranslationRequest};

const COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Completes a base URL to the chat completions path.
///
/// `host` and `host/v1` gain the missing suffix, a full endpoint is kept, and
/// trailing slashes are removed first. A blank endpoint stays blank.
pub fn normalize_chat_endpoint(endpoint: &str) -> String {
    let base = endpoint.trim().trim_end_matches('/');
    if base.is_empty() {
        return String::new();
    }

    if base.ends_with(COMPLETIONS_PATH) {
        base.to_string()
    } else if base.ends_with("/v1") {
        format!("{base}/chat/completions")
    } else {
        format!("{base}{COMPLETIONS_PATH}")
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    temperature: u8,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: Cow<'a, str>,
}

#[derive(Debug, Default, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    result: Option<String>,
    #[serde(default, rename = "translatedText")]
    translated_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

pub struct ChatClient {
    client: Client,
    endpoint: String,
    token: String,
    model: String,
    system_prompt: Option<String>,
    timeout_secs: u64,
}

impl ChatClient {
    /// Validates the endpoint, token, and model and builds the client.
    pub fn new(
        endpoint: &str,
        token: Option<&str>,
        model: &str,
        system_prompt: Option<&str>,
    ) -> Result<Self, TranslateError> {
        let endpoint = normalize_chat_endpoint(endpoint);
        let token = token.map(str::trim).unwrap_or_default();
        let model = model.trim();

        if endpoint.is_empty() {
            return Err(TranslateError::config("Chat endpoint is required."));
        }
        if token.is_empty() {
            return Err(TranslateError::config("Chat token is required."));
        }
        if model.is_empty() {
            return Err(TranslateError::config("Chat model is required."));
        }

        Ok(Self {
            client: Client::new(),
            endpoint,
            token: token.to_string(),
            model: model.to_string(),
            system_prompt: system_prompt.map(str::to_string),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
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

    pub async fn translate(&self, request: &TranslationRequest) -> Result<String, TranslateError> {
        if request.source_text.is_empty() {
            return Err(TranslateError::EmptyInput);
        }

        let user_prompt = build_user_prompt(
            request.source_language(),
            request.target_language(),
            &request.source_text,
        );

        let chat_request = ChatCompletionRequest {
            model: &self.model,
            temperature: 0,
            messages: vec![
                Message {
                    role: "system",
                    content: Cow::Borrowed(system_prompt(self.system_prompt.as_deref())),
                },
                Message {
                    role: "user",
                    content: Cow::Owned(user_prompt),
                },
            ],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .timeout(Duration::from_secs(self.timeout_secs))
            .bearer_auth(&self.token)
            .json(&chat_request)
            .send()
            .await
            .map_err(|e| TranslateError::from_reqwest(&e, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslateError::Http {
                provider: ProviderKind::OpenAi.display_name(),
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
    let response: Option<ChatCompletionResponse> = serde_json::from_str(body)
        .map_err(|e| TranslateError::malformed(format!("Invalid chat response: {e}")))?;
    let response = response.unwrap_or_default();

    let from_choice = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content);

    [from_choice, response.result, response.translated_text]
        .into_iter()
        .flatten()
        .map(|t| t.trim().to_string())
        .find(|t| !t.is_empty())
        .ok_or_else(|| TranslateError::malformed("No translated text in chat response."))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::translation::prompt::DEFAULT_SYSTEM_PROMPT;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_normalize_appends_completions_path() {
        assert_eq!(
            normalize_chat_endpoint("http://localhost:13000"),
            "http://localhost:13000/v1/chat/completions"
        );
    }

    #[test]
    fn test_normalize_handles_v1_input() {
        assert_eq!(
            normalize_chat_endpoint("http://localhost:13000/v1"),
            "http://localhost:13000/v1/chat/completions"
        );
        assert_eq!(
            normalize_chat_endpoint("http://localhost:13000/v1//"),
            "http://localhost:13000/v1/chat/completions"
        );
    }

    #[test]
    fn test_normalize_keeps_full_endpoint() {
        assert_eq!(
            normalize_chat_endpoint("http://localhost:13000/v1/chat/completions"),
            "http://localhost:13000/v1/chat/completions"
        );
    }

    #[test]
    fn test_normalize_blank_endpoint() {
        assert_eq!(normalize_chat_endpoint("  "), "");
        assert_eq!(normalize_chat_endpoint("/"), "");
    }

    #[test]
    fn test_new_requires_endpoint_token_and_model() {
        let missing_endpoint = ChatClient::new("", Some("t"), "m", None);
        assert!(matches!(missing_endpoint, Err(TranslateError::Config(m)) if m.contains("endpoint")));

        let missing_token = ChatClient::new("http://h", Some(" "), "m", None);
        assert!(matches!(missing_token, Err(TranslateError::Config(m)) if m.contains("token")));

        let missing_model = ChatClient::new("http://h", Some("t"), "", None);
        assert!(matches!(missing_model, Err(TranslateError::Config(m)) if m.contains("model")));
    }

    #[test]
    fn test_extract_translation_trims_content() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"  你好\n"}}]}"#;
        assert_eq!(extract_translation(body).unwrap(), "你好");
    }

    #[test]
    fn test_extract_translation_fallback_fields() {
        assert_eq!(extract_translation(r#"{"result":"你好"}"#).unwrap(), "你好");
        assert_eq!(
            extract_translation(r#"{"choices":[],"translatedText":"哈囉"}"#).unwrap(),
            "哈囉"
        );
    }

    #[test]
    fn test_extract_translation_missing_content() {
        assert!(matches!(
            extract_translation(r#"{"choices":[{"message":{"content":""}}]}"#),
            Err(TranslateError::MalformedResponse(_))
        ));
        assert!(matches!(
            extract_translation("null"),
            Err(TranslateError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_translate_sends_prompt_pair() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer sk-test"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-4.1-mini",
                "temperature": 0,
                "messages": [
                    {"role": "system", "content": DEFAULT_SYSTEM_PROMPT},
                    {
                        "role": "user",
                        "content": "Translate this code comment from auto to ja. Return translated text only.\nhello"
                    }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "こんにちは"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ChatClient::new(&server.uri(), Some("sk-test"), "gpt-4.1-mini", None).unwrap();
        let request = TranslationRequest::new("hello", "", "ja");
        assert_eq!(client.translate(&request).await.unwrap(), "こんにちは");
    }

    #[tokio::test]
    async fn test_translate_http_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = ChatClient::new(&server.uri(), Some("bad"), "m", None).unwrap();
        let err = client
            .translate(&TranslationRequest::new("hello", "en", "ja"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Chat endpoint HTTP 401");
    }

    #[tokio::test]
    async fn test_translate_timeout() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(3)))
            .mount(&server)
            .await;

        let client = ChatClient::new(&server.uri(), Some("t"), "m", None)
            .unwrap()
            .with_timeout(1);
        let err = client
            .translate(&TranslationRequest::new("hello", "en", "ja"))
            .await
            .unwrap_err();
        assert_eq!(err, TranslateError::Timeout(1));
    }
}
