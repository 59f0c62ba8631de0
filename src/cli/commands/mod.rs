//! Subcommand implementations.

use anyhow::Result;
use std::path::Path;

use crate::config::{ConfigManager, FileSettings, ResolveOptions};

/// Configure command handler.
pub mod configure;

/// One-shot `line` and `file` command handlers.
pub mod line;

/// JSON-lines session handler.
pub mod serve;

/// Reported when the requested line holds no comment text.
pub const NOT_A_COMMENT: &str = "Current line is not a translatable comment.";

/// Opens the config file given by `--config`, or the default location.
pub fn config_manager(path: Option<&Path>) -> Result<ConfigManager> {
    path.map_or_else(ConfigManager::new, |p| Ok(ConfigManager::at(p)))
}

/// Builds a settings source that re-reads the file on every load.
pub fn file_settings(path: Option<&Path>, options: ResolveOptions) -> Result<FileSettings> {
    Ok(FileSettings::new(config_manager(path)?, options))
}
