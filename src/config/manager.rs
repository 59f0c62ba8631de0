use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::display::DisplayMode;
use crate::paths;
use crate::translation::{
    DEFAULT_SOURCE_LANGUAGE, DEFAULT_TARGET_LANGUAGE, ProviderKind, normalize_api_url,
};

pub const DEFAULT_DEBOUNCE_MS: u64 = 400;

/// Default settings in the `[ct]` section of config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CtConfig {
    /// Provider name (`mtran` or `openai`).
    pub provider: Option<String>,
    /// Source language code, `auto` to let the backend detect it.
    pub from: Option<String>,
    /// Target language code.
    pub to: Option<String>,
    /// `inline` or `hover`.
    pub display_mode: Option<String>,
}

/// The `[auto_translate]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AutoTranslateConfig {
    pub enabled: Option<bool>,
    pub debounce_ms: Option<u64>,
}

/// The `[mtran]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MTranConfig {
    pub api_url: Option<String>,
    /// Token stored directly in config (not recommended).
    pub api_token: Option<String>,
    /// Environment variable name containing the token.
    pub api_token_env: Option<String>,
}

impl MTranConfig {
    pub fn get_api_token(&self) -> Option<String> {
        resolve_secret(self.api_token.as_deref(), self.api_token_env.as_deref())
    }
}

/// The `[openai]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// Base URL or full `/v1/chat/completions` endpoint.
    pub endpoint: Option<String>,
    pub model: Option<String>,
    /// Token stored directly in config (not recommended).
    pub token: Option<String>,
    /// Environment variable name containing the token.
    pub token_env: Option<String>,
    pub system_prompt: Option<String>,
}

impl OpenAiConfig {
    pub fn get_token(&self) -> Option<String> {
        resolve_secret(self.token.as_deref(), self.token_env.as_deref())
    }
}

/// Prefers the environment variable over the literal value; blanks count as unset.
fn resolve_secret(literal: Option<&str>, env_var: Option<&str>) -> Option<String> {
    if let Some(env_var) = env_var
        && let Ok(value) = std::env::var(env_var)
        && !value.trim().is_empty()
    {
        return Some(value);
    }
    literal
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/ct/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub ct: CtConfig,
    #[serde(default)]
    pub auto_translate: AutoTranslateConfig,
    #[serde(default)]
    pub mtran: MTranConfig,
    #[serde(default)]
    pub openai: OpenAiConfig,
}

/// Flat configuration snapshot used by every translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub provider: ProviderKind,
    pub api_url: String,
    pub api_token: Option<String>,
    pub chat_endpoint: String,
    pub chat_token: Option<String>,
    pub chat_model: String,
    pub chat_system_prompt: Option<String>,
    pub from: String,
    pub to: String,
    pub display_mode: DisplayMode,
    pub auto_enabled: bool,
    pub debounce_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::MTran,
            api_url: normalize_api_url(""),
            api_token: None,
            chat_endpoint: String::new(),
            chat_token: None,
            chat_model: String::new(),
            chat_system_prompt: None,
            from: DEFAULT_SOURCE_LANGUAGE.to_string(),
            to: DEFAULT_TARGET_LANGUAGE.to_string(),
            display_mode: DisplayMode::Hover,
            auto_enabled: true,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

/// CLI overrides that take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    pub provider: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Merges CLI options with config file settings.
///
/// CLI options take precedence over the file, and the file over built-in
/// defaults. Provider-specific requirements (chat token, model) are checked
/// by the backend when it is used, not here.
pub fn resolve_settings(options: &ResolveOptions, config_file: &ConfigFile) -> Settings {
    let defaults = Settings::default();
    let pick = |cli: Option<&String>, file: Option<&String>, fallback: String| {
        cli.or(file)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(fallback)
    };

    let provider = options
        .provider
        .as_ref()
        .or(config_file.ct.provider.as_ref())
        .map_or(defaults.provider, |name| ProviderKind::normalize(name));

    let display_mode = config_file
        .ct
        .display_mode
        .as_deref()
        .map_or(defaults.display_mode, DisplayMode::normalize);

    Settings {
        provider,
        api_url: normalize_api_url(config_file.mtran.api_url.as_deref().unwrap_or_default()),
        api_token: config_file.mtran.get_api_token(),
        chat_endpoint: config_file.openai.endpoint.clone().unwrap_or_default(),
        chat_token: config_file.openai.get_token(),
        chat_model: config_file.openai.model.clone().unwrap_or_default(),
        chat_system_prompt: config_file.openai.system_prompt.clone(),
        from: pick(options.from.as_ref(), config_file.ct.from.as_ref(), defaults.from),
        to: pick(options.to.as_ref(), config_file.ct.to.as_ref(), defaults.to),
        display_mode,
        auto_enabled: config_file
            .auto_translate
            .enabled
            .unwrap_or(defaults.auto_enabled),
        debounce_ms: config_file
            .auto_translate
            .debounce_ms
            .unwrap_or(defaults.debounce_ms),
    }
}

/// Manages loading and saving configuration files.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager.
    ///
    /// Configuration is stored at `$XDG_CONFIG_HOME/ct/config.toml`
    /// or `~/.config/ct/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_dir()?.join("config.toml"),
        })
    }

    /// Uses an explicit config file instead of the XDG location.
    pub fn at(path: impl AsRef<Path>) -> Self {
        Self {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    pub const fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config_file: ConfigFile =
            toml::from_str(&contents).with_context(|| "Failed to parse config file")?;

        Ok(config_file)
    }

    pub fn save(&self, config: &ConfigFile) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;

        fs::write(&self.config_path, contents).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })?;

        Ok(())
    }

    /// Loads the config file, or the defaults when there is none yet.
    ///
    /// A file that exists but does not parse is an error.
    pub fn load_existing(&self) -> Result<ConfigFile> {
        if self.config_path.exists() {
            self.load()
        } else {
            Ok(ConfigFile::default())
        }
    }
}
