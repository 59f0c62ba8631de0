//! XDG-style path utilities for configuration and cache directories.
//!
//! This module provides consistent path resolution across platforms,
//! preferring XDG Base Directory Specification conventions over
//! OS-specific locations.

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_DIR: &str = "ct";

/// Returns the configuration directory for ct.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/ct` if `XDG_CONFIG_HOME` is set
/// 2. `~/.config/ct` otherwise
pub fn config_dir() -> Result<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config")
}

/// Returns the cache directory for ct.
///
/// Resolution order:
/// 1. `$XDG_CACHE_HOME/ct` if `XDG_CACHE_HOME` is set
/// 2. `~/.cache/ct` otherwise
pub fn cache_dir() -> Result<PathBuf> {
    xdg_dir("XDG_CACHE_HOME", ".cache")
}

fn xdg_dir(env_var: &str, home_fallback: &str) -> Result<PathBuf> {
    match std::env::var(env_var) {
        Ok(xdg) if !xdg.is_empty() => Ok(PathBuf::from(xdg).join(APP_DIR)),
        _ => Ok(dirs::home_dir()
            .context("Failed to determine home directory")?
            .join(home_fallback)
            .join(APP_DIR)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn with_env<F: FnOnce()>(key: &str, value: Option<&str>, f: F) {
        let original = std::env::var(key).ok();
        // SAFETY: callers are #[serial]
        unsafe {
            match value {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
        }

        f();

        // SAFETY: callers are #[serial]
        unsafe {
            match original {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
        }
    }

    #[test]
    #[serial]
    fn test_config_dir_default() {
        with_env("XDG_CONFIG_HOME", None, || {
            assert!(config_dir().unwrap().ends_with(".config/ct"));
        });
    }

    #[test]
    #[serial]
    fn test_config_dir_xdg_override() {
        with_env("XDG_CONFIG_HOME", Some("/custom/config"), || {
            assert_eq!(config_dir().unwrap(), PathBuf::from("/custom/config/ct"));
        });
    }

    #[test]
    #[serial]
    fn test_cache_dir_default() {
        with_env("XDG_CACHE_HOME", None, || {
            assert!(cache_dir().unwrap().ends_with(".cache/ct"));
        });
    }

    #[test]
    #[serial]
    fn test_cache_dir_xdg_override() {
        with_env("XDG_CACHE_HOME", Some("/custom/cache"), || {
            assert_eq!(cache_dir().unwrap(), PathBuf::from("/custom/cache/ct"));
        });
    }

    #[test]
    #[serial]
    fn test_empty_xdg_value_is_ignored() {
        with_env("XDG_CACHE_HOME", Some(""), || {
            assert!(cache_dir().unwrap().ends_with(".cache/ct"));
        });
    }
}
