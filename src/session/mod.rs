//! Editor-facing translation session.
//!
//! [`AutoTranslateController`] follows the cursor and keeps a
//! [`DisplayState`] current, [`TranslationResolver`] memoizes and dedups
//! backend calls, and [`translate_comment_line`] performs the explicit
//! rewrite of one line.

mod controller;
mod line;
mod resolver;

#[cfg(test)]
pub(crate) mod testing;

pub use controller::{AutoTranslateController, DisplayState, EditorSnapshot};
pub use line::{LineTranslation, translate_comment_line};
pub use resolver::TranslationResolver;
