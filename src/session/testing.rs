//! Test doubles for the translation seam.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::config::Settings;
use crate::translation::{TranslateError, TranslationRequest, Translator};

/// Answers every request with a fixed reply, counting calls.
pub struct StubTranslator {
    reply: Result<String, TranslateError>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    seen: Mutex<Vec<TranslationRequest>>,
}

impl StubTranslator {
    pub fn new(reply: &str) -> Self {
        Self::with_reply(Ok(reply.to_string()))
    }

    pub fn failing(err: TranslateError) -> Self {
        Self::with_reply(Err(err))
    }

    fn with_reply(reply: Result<String, TranslateError>) -> Self {
        Self {
            reply,
            delay: None,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<TranslationRequest> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Translator for StubTranslator {
    async fn translate(
        &self,
        _settings: &Settings,
        request: &TranslationRequest,
    ) -> Result<String, TranslateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.reply.clone()
    }
}
