use async_trait::async_trait;
use reqwest::Client;

use super::chat::{ChatClient, normalize_chat_endpoint};
use super::error::TranslateError;
use super::mtran::{MTranClient, normalize_api_url};
use super::prompt::prompt_hash;
use super::provider::ProviderKind;
use super::TranslationRequest;
use crate::config::Settings;

/// Seam between translation callers and the network.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(
        &self,
        settings: &Settings,
        request: &TranslationRequest,
    ) -> Result<String, TranslateError>;
}

/// Routes each request to the backend selected by `settings.provider`,
/// sharing one connection pool across calls.
#[derive(Debug, Clone, Default)]
pub struct HttpTranslator {
    client: Client,
}

impl HttpTranslator {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(
        &self,
        settings: &Settings,
        request: &TranslationRequest,
    ) -> Result<String, TranslateError> {
        match settings.provider {
            ProviderKind::MTran => {
                MTranClient::new(&settings.api_url, settings.api_token.as_deref())
                    .with_client(self.client.clone())
                    .translate(request)
                    .await
            }
            ProviderKind::OpenAi => {
                ChatClient::new(
                    &settings.chat_endpoint,
                    settings.chat_token.as_deref(),
                    &settings.chat_model,
                    settings.chat_system_prompt.as_deref(),
                )?
                .with_client(self.client.clone())
                .translate(request)
                .await
            }
        }
    }
}

/// Identity of the active provider configuration, so cached translations
/// from one backend are never served for another.
pub fn provider_cache_scope(settings: &Settings) -> String {
    let scope = match settings.provider {
        ProviderKind::MTran => serde_json::json!({
            "provider": settings.provider.as_str(),
            "apiUrl": normalize_api_url(&settings.api_url),
        }),
        ProviderKind::OpenAi => serde_json::json!({
            "provider": settings.provider.as_str(),
            "endpoint": normalize_chat_endpoint(&settings.chat_endpoint),
            "model": settings.chat_model.trim(),
        }),
    };
    scope.to_string()
}

/// Hash of the prompts the active provider sends. MTran takes no prompt,
/// so its hash is empty.
pub fn provider_prompt_hash(settings: &Settings) -> String {
    match settings.provider {
        ProviderKind::MTran => String::new(),
        ProviderKind::OpenAi => prompt_hash(settings.chat_system_prompt.as_deref()),
    }
}
