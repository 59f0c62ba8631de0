use async_trait::async_trait;

use super::{CacheManager, make_cache_key};
use crate::config::Settings;
use crate::translation::{
    TranslateError, TranslationRequest, Translator, provider_cache_scope,
    provider_prompt_hash,
};

/// Wraps a [`Translator`] with the persistent cache.
///
/// Cache failures are reported as warnings and never fail the translation.
pub struct CachedTranslator<T> {
    inner: T,
    cache: CacheManager,
}

impl<T: Translator> CachedTranslator<T> {
    pub const fn new(inner: T, cache: CacheManager) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl<T: Translator> Translator for CachedTranslator<T> {
    async fn translate(
        &self,
        settings: &Settings,
        request: &TranslationRequest,
    ) -> Result<String, TranslateError> {
        let scope = provider_cache_scope(settings);
        let key = make_cache_key(&scope, &request.from, &request.to, &request.source_text);
        let prompt_hash = provider_prompt_hash(settings);

        match self.cache.get(&key, &prompt_hash) {
            Ok(Some(hit)) => {
                crate::debug!("cache hit for {:?}", request.source_text);
                return Ok(hit);
            }
            Ok(None) => {}
            Err(e) => {
                crate::warn!("Warning: Failed to read cache: {e}");
            }
        }

        let translated = self.inner.translate(settings, request).await?;

        if let Err(e) = self.cache.put(&key, &prompt_hash, &scope, request, &translated) {
            crate::warn!("Warning: Failed to write cache: {e}");
        }

        Ok(translated)
    }
}
