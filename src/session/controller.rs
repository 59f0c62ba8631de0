use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::resolver::TranslationResolver;
use crate::comment::{ParsedComment, parse_comment_line};
use crate::config::SettingsSource;
use crate::display::{DisplayMode, hover_text};
use crate::translation::{TranslateError, Translator};

/// The cursor line of the active editor at the moment of an event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EditorSnapshot {
    pub uri: String,
    pub line: u32,
    pub text: String,
}

/// What the editor should currently render.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DisplayState {
    #[default]
    Idle,
    Showing {
        uri: String,
        line: u32,
        translation: String,
        display_mode: DisplayMode,
    },
}

/// Keeps the translation of the comment under the cursor up to date.
///
/// Every cursor move or document change restarts a single debounce timer.
/// When it fires, the line is parsed and translated through the shared
/// [`TranslationResolver`]. Background failures fall back to
/// [`DisplayState::Idle`] without surfacing.
pub struct AutoTranslateController {
    settings: Arc<dyn SettingsSource>,
    resolver: TranslationResolver,
    state: watch::Sender<DisplayState>,
    timer: Mutex<Option<JoinHandle<()>>>,
    // Incremented per scheduled update and per reset; only the latest may publish.
    generation: AtomicU64,
}

impl AutoTranslateController {
    pub fn new(settings: Arc<dyn SettingsSource>, translator: Arc<dyn Translator>) -> Arc<Self> {
        let (state, _) = watch::channel(DisplayState::Idle);
        Arc::new(Self {
            settings,
            resolver: TranslationResolver::new(translator),
            state,
            timer: Mutex::new(None),
            generation: AtomicU64::new(0),
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<DisplayState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> DisplayState {
        self.state.borrow().clone()
    }

    pub const fn resolver(&self) -> &TranslationResolver {
        &self.resolver
    }

    /// Restarts the debounce timer for a cursor move or document change.
    ///
    /// Does nothing but reset to idle when auto-translate is off or the
    /// display mode is not inline.
    pub fn schedule(self: &Arc<Self>, snapshot: EditorSnapshot) {
        let settings = self.settings.load();
        if settings.display_mode != DisplayMode::Inline || !settings.auto_enabled {
            self.cancel_timer();
            self.clear_state();
            return;
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let delay = Duration::from_millis(settings.debounce_ms);
        let controller = Arc::clone(self);

        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Detached so a later reschedule cannot abort a running translation
            tokio::spawn(async move { controller.update(snapshot, generation).await });
        });

        if let Some(previous) = self.lock_timer().replace(timer) {
            previous.abort();
        }
    }

    /// Handles a configuration change: drops all memoized translations and
    /// reschedules for the active editor, if any.
    pub fn config_changed(self: &Arc<Self>, active: Option<EditorSnapshot>) {
        self.resolver.clear();
        match active {
            Some(snapshot) => self.schedule(snapshot),
            None => {
                self.cancel_timer();
                self.clear_state();
            }
        }
    }

    /// Resolves hover contents for a line when the display mode is hover.
    pub async fn hover(&self, line_text: &str) -> Result<Option<String>, TranslateError> {
        let settings = self.settings.load();
        if settings.display_mode != DisplayMode::Hover {
            return Ok(None);
        }

        let Some(parsed) = translatable(line_text) else {
            return Ok(None);
        };

        let translation = self.resolver.resolve(&settings, &parsed.content).await?;
        Ok(Some(hover_text(&translation)))
    }

    async fn update(&self, snapshot: EditorSnapshot, generation: u64) {
        let Some(parsed) = translatable(&snapshot.text) else {
            self.publish(generation, DisplayState::Idle);
            return;
        };

        let settings = self.settings.load();
        match self.resolver.resolve(&settings, &parsed.content).await {
            Ok(translation) => self.publish(
                generation,
                DisplayState::Showing {
                    uri: snapshot.uri,
                    line: snapshot.line,
                    translation,
                    display_mode: settings.display_mode,
                },
            ),
            Err(err) => {
                crate::debug!("auto-translate of {}:{} failed: {err}", snapshot.uri, snapshot.line);
                self.publish(generation, DisplayState::Idle);
            }
        }
    }

    fn publish(&self, generation: u64, next: DisplayState) {
        if self.generation.load(Ordering::SeqCst) != generation {
            return;
        }
        self.state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }

    /// Returns to idle and invalidates any update still in flight.
    pub fn clear_state(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.publish(generation, DisplayState::Idle);
    }

    fn cancel_timer(&self) {
        if let Some(timer) = self.lock_timer().take() {
            timer.abort();
        }
    }

    fn lock_timer(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stops the pending debounce timer.
    pub fn shutdown(&self) {
        self.cancel_timer();
    }
}

fn translatable(line_text: &str) -> Option<ParsedComment> {
    parse_comment_line(line_text).filter(ParsedComment::is_translatable)
}
