use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use sha2::{Digest, Sha256};
use std::path::PathBuf;

use crate::paths;
use crate::translation::TranslationRequest;

/// Persistent translation cache used by the one-shot commands.
pub struct CacheManager {
    db_path: PathBuf,
}

impl CacheManager {
    pub fn new() -> Result<Self> {
        let cache_dir = paths::cache_dir()?;

        std::fs::create_dir_all(&cache_dir).with_context(|| {
            format!("Failed to create cache directory: {}", cache_dir.display())
        })?;

        Self::open(cache_dir.join("translations.db"))
    }

    pub fn open(db_path: PathBuf) -> Result<Self> {
        let manager = Self { db_path };
        manager.init_db()?;
        Ok(manager)
    }

    fn init_db(&self) -> Result<()> {
        let conn = self.connect()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS translations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                key_hash TEXT NOT NULL,
                prompt_hash TEXT NOT NULL,
                scope TEXT NOT NULL,
                source_text TEXT NOT NULL,
                translated_text TEXT NOT NULL,
                source_language TEXT NOT NULL,
                target_language TEXT NOT NULL,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                accessed_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                UNIQUE (key_hash, prompt_hash)
            )",
            [],
        )
        .context("Failed to create translations table")?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_key_prompt ON translations(key_hash, prompt_hash)",
            [],
        )
        .context("Failed to create index")?;

        Ok(())
    }

    fn connect(&self) -> Result<Connection> {
        Connection::open(&self.db_path)
            .with_context(|| format!("Failed to open cache database: {}", self.db_path.display()))
    }

    fn key_hash(cache_key: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(cache_key.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Looks up a translation by the key from [`crate::cache::make_cache_key`]
    /// and the hash of the prompts it was produced with.
    pub fn get(&self, cache_key: &str, prompt_hash: &str) -> Result<Option<String>> {
        let key_hash = Self::key_hash(cache_key);
        let conn = self.connect()?;

        let result: Option<String> = conn
            .query_row(
                "SELECT translated_text FROM translations
                 WHERE key_hash = ?1 AND prompt_hash = ?2",
                [key_hash.as_str(), prompt_hash],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to read translation cache")?;

        if result.is_some() {
            conn.execute(
                "UPDATE translations SET accessed_at = CURRENT_TIMESTAMP
                 WHERE key_hash = ?1 AND prompt_hash = ?2",
                [key_hash.as_str(), prompt_hash],
            )?;
        }

        Ok(result)
    }

    pub fn put(
        &self,
        cache_key: &str,
        prompt_hash: &str,
        scope: &str,
        request: &TranslationRequest,
        translated_text: &str,
    ) -> Result<()> {
        let conn = self.connect()?;

        conn.execute(
            "INSERT OR REPLACE INTO translations
             (key_hash, prompt_hash, scope, source_text, translated_text,
              source_language, target_language)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                Self::key_hash(cache_key),
                prompt_hash,
                scope,
                request.source_text,
                translated_text,
                request.source_language(),
                request.target_language(),
            ],
        )
        .context("Failed to insert translation into cache")?;

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cache::make_cache_key;
    use tempfile::TempDir;

    fn create_test_manager(temp_dir: &TempDir) -> CacheManager {
        CacheManager::open(temp_dir.path().join("translations.db")).unwrap()
    }

    fn create_test_request() -> TranslationRequest {
        TranslationRequest::new("Hello, World!", "en", "ja")
    }

    #[test]
    fn test_cache_miss() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        let key = make_cache_key("http://localhost:8989", "en", "ja", "Hello, World!");

        assert!(manager.get(&key, "").unwrap().is_none());
    }

    #[test]
    fn test_cache_hit() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        let request = create_test_request();
        let key = make_cache_key("http://localhost:8989", "en", "ja", &request.source_text);

        manager
            .put(&key, "", "http://localhost:8989", &request, "こんにちは、世界！")
            .unwrap();

        assert_eq!(
            manager.get(&key, "").unwrap(),
            Some("こんにちは、世界！".to_string())
        );
    }

    #[test]
    fn test_put_replaces_existing_entry() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        let request = create_test_request();
        let key = make_cache_key("s", "en", "ja", &request.source_text);

        manager.put(&key, "", "s", &request, "first").unwrap();
        manager.put(&key, "", "s", &request, "second").unwrap();

        assert_eq!(manager.get(&key, "").unwrap(), Some("second".to_string()));
    }

    #[test]
    fn test_different_scopes_different_entries() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        let request = create_test_request();

        let local = make_cache_key("http://localhost:8989", "en", "ja", "Hello");
        let remote = make_cache_key("http://production:8989", "en", "ja", "Hello");

        manager.put(&local, "", "local", &request, "Local").unwrap();
        manager.put(&remote, "", "remote", &request, "Remote").unwrap();

        assert_eq!(manager.get(&local, "").unwrap(), Some("Local".to_string()));
        assert_eq!(manager.get(&remote, "").unwrap(), Some("Remote".to_string()));
    }

    #[test]
    fn test_prompt_hash_separates_entries() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        let request = create_test_request();
        let key = make_cache_key("s", "en", "ja", &request.source_text);

        manager.put(&key, "old-prompt", "s", &request, "casual").unwrap();

        assert_eq!(manager.get(&key, "new-prompt").unwrap(), None);

        manager.put(&key, "new-prompt", "s", &request, "formal").unwrap();
        assert_eq!(manager.get(&key, "old-prompt").unwrap(), Some("casual".to_string()));
        assert_eq!(manager.get(&key, "new-prompt").unwrap(), Some("formal".to_string()));
    }

    #[test]
    fn test_entries_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let request = create_test_request();
        let key = make_cache_key("s", "en", "ja", &request.source_text);

        create_test_manager(&temp_dir)
            .put(&key, "", "s", &request, "persisted")
            .unwrap();

        let reopened = create_test_manager(&temp_dir);
        assert_eq!(reopened.get(&key, "").unwrap(), Some("persisted".to_string()));
    }
}
