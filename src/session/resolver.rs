use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::cache::make_cache_key;
use crate::config::Settings;
use crate::translation::{TranslateError, TranslationRequest, Translator, provider_cache_scope};

type Job = Shared<BoxFuture<'static, Result<String, TranslateError>>>;

enum Lookup {
    Hit(String),
    Job(Job),
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Memoizes translations and collapses concurrent requests for the same key
/// into one backend call.
///
/// Lookup order is cache, then in-flight jobs, then a new backend call. Jobs
/// run on their own task, so a caller that stops waiting never stalls the
/// others sharing the job.
pub struct TranslationResolver {
    translator: Arc<dyn Translator>,
    cache: Arc<Mutex<HashMap<String, String>>>,
    pending: Arc<Mutex<HashMap<String, Job>>>,
    // Bumped by `clear`; jobs started before a clear leave both maps alone.
    epoch: Arc<AtomicU64>,
}

impl TranslationResolver {
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self {
            translator,
            cache: Arc::new(Mutex::new(HashMap::new())),
            pending: Arc::new(Mutex::new(HashMap::new())),
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    pub async fn resolve(&self, settings: &Settings, content: &str) -> Result<String, TranslateError> {
        let scope = provider_cache_scope(settings);
        let key = make_cache_key(&scope, &settings.from, &settings.to, content);

        match self.lookup(settings, content, key) {
            Lookup::Hit(hit) => Ok(hit),
            Lookup::Job(job) => job.await,
        }
    }

    // The cache is read under the pending lock. A job that finishes between
    // the two reads has already filled the cache, so it is never started twice.
    fn lookup(&self, settings: &Settings, content: &str, key: String) -> Lookup {
        let mut pending = lock(&self.pending);

        if let Some(hit) = lock(&self.cache).get(&key) {
            return Lookup::Hit(hit.clone());
        }
        if let Some(job) = pending.get(&key) {
            return Lookup::Job(job.clone());
        }

        let job = self.start_job(settings.clone(), content.to_string(), key.clone());
        pending.insert(key, job.clone());
        Lookup::Job(job)
    }

    fn start_job(&self, settings: Settings, content: String, key: String) -> Job {
        let translator = Arc::clone(&self.translator);
        let cache = Arc::clone(&self.cache);
        let pending = Arc::clone(&self.pending);
        let epoch = Arc::clone(&self.epoch);
        let started_in = epoch.load(Ordering::SeqCst);

        let handle = tokio::spawn(async move {
            let request = TranslationRequest::from_settings(&settings, &content);
            let result = translator.translate(&settings, &request).await;

            if epoch.load(Ordering::SeqCst) == started_in {
                if let Ok(translated) = &result {
                    lock(&cache).insert(key.clone(), translated.clone());
                }
                lock(&pending).remove(&key);
            }

            result
        });

        async move {
            handle.await.unwrap_or_else(|e| {
                Err(TranslateError::Transport(format!(
                    "Translation task failed: {e}"
                )))
            })
        }
        .boxed()
        .shared()
    }

    /// Drops every cached translation and forgets in-flight jobs.
    pub fn clear(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        lock(&self.cache).clear();
        lock(&self.pending).clear();
    }

    pub fn cached_len(&self) -> usize {
        lock(&self.cache).len()
    }

    pub fn pending_len(&self) -> usize {
        lock(&self.pending).len()
    }
}
