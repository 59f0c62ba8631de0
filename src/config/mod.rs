mod manager;
mod source;

pub use manager::{
    AutoTranslateConfig, ConfigFile, ConfigManager, CtConfig, DEFAULT_DEBOUNCE_MS, MTranConfig,
    OpenAiConfig, ResolveOptions, Settings, resolve_settings,
};
pub use source::{FileSettings, SettingsSource};
