//! # ct - Comment Translator
//!
//! `ct` translates source-code comments one line at a time through a local
//! MTran server or an OpenAI-compatible chat endpoint. Results render either
//! as an inline annotation above the comment under the cursor or as a hover
//! tooltip, driven by an editor over the `ct serve` JSON-lines protocol.
//!
//! ## Quick Start
//!
//! ```bash
//! # Translate one comment line
//! ct line "  // hello world"
//!
//! # Rewrite the comment on line 12 of a file
//! ct file src/main.rs --line 12 --write
//!
//! # Editor session over stdio
//! ct serve
//! ```
//!
//! ## Configuration
//!
//! Settings are stored in `~/.config/ct/config.toml`:
//!
//! ```toml
//! [ct]
//! provider = "mtran"
//! to = "zh-Hant"
//! display_mode = "inline"
//!
//! [mtran]
//! api_url = "http://127.0.0.1:8989"
//! ```

/// Translation caching (in-memory keys and the persistent `SQLite` store).
pub mod cache;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Comment line parsing and rebuilding.
pub mod comment;

/// Configuration file management and settings resolution.
pub mod config;

/// Display modes and rendering of translations.
pub mod display;

/// File system utilities.
pub mod fs;

/// Input reading from arguments, files, and stdin.
pub mod input;

/// Global output configuration (quiet mode, colors, stderr/stdout routing).
pub mod output;

/// XDG-style path utilities for configuration and cache.
pub mod paths;

/// Auto-translate controller, request dedup, and explicit line translation.
pub mod session;

/// Translation backends.
pub mod translation;

/// Terminal UI components (spinner, colors, prompts).
pub mod ui;
