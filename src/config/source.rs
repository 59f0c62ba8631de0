use std::sync::{Mutex, PoisonError};

use super::manager::{ConfigFile, ConfigManager, ResolveOptions, Settings, resolve_settings};

/// Supplies a fresh settings snapshot each time an event needs one.
pub trait SettingsSource: Send + Sync {
    fn load(&self) -> Settings;
}

/// Re-reads the config file on every load so edits apply without a restart.
///
/// A file that fails to parse falls back to the defaults. The failure is
/// warned about once until the message changes.
#[derive(Debug)]
pub struct FileSettings {
    manager: ConfigManager,
    options: ResolveOptions,
    last_error: Mutex<Option<String>>,
}

impl FileSettings {
    pub const fn new(manager: ConfigManager, options: ResolveOptions) -> Self {
        Self {
            manager,
            options,
            last_error: Mutex::new(None),
        }
    }

    fn read_config(&self) -> ConfigFile {
        let result = self.manager.load_existing();
        let mut last_error = self.last_error.lock().unwrap_or_else(PoisonError::into_inner);

        match result {
            Ok(config_file) => {
                *last_error = None;
                config_file
            }
            Err(e) => {
                let message = format!("{e:#}");
                if last_error.as_deref() != Some(message.as_str()) {
                    crate::warn!(
                        "Warning: {} ignored, using defaults: {message}",
                        self.manager.config_path().display()
                    );
                    *last_error = Some(message);
                }
                ConfigFile::default()
            }
        }
    }
}

impl SettingsSource for FileSettings {
    fn load(&self) -> Settings {
        resolve_settings(&self.options, &self.read_config())
    }
}

impl SettingsSource for Settings {
    fn load(&self) -> Settings {
        self.clone()
    }
}
