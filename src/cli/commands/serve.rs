//! JSON-lines session over stdio.
//!
//! Each input line is one event object tagged by `"event"`; each output line
//! is one reply tagged by `"kind"`. Display state changes are pushed as they
//! happen. Hover and explicit translate requests run concurrently and answer
//! with the `id` they were sent with.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use crate::config::{ResolveOptions, SettingsSource};
use crate::display::lens_title;
use crate::session::{AutoTranslateController, DisplayState, EditorSnapshot, translate_comment_line};
use crate::translation::{HttpTranslator, Translator};

use super::{NOT_A_COMMENT, file_settings};

pub struct ServeOptions {
    pub resolve: ResolveOptions,
    pub config: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
enum Event {
    Cursor(EditorSnapshot),
    Change(EditorSnapshot),
    Config {
        uri: Option<String>,
        line: Option<u32>,
        text: Option<String>,
    },
    Hover {
        id: Value,
        text: String,
    },
    Translate {
        id: Value,
        text: String,
    },
    Shutdown,
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum Reply {
    State {
        state: DisplayState,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    Hover {
        id: Value,
        contents: Option<String>,
    },
    Translated {
        id: Value,
        line: String,
        translation: String,
    },
    Error {
        id: Value,
        message: String,
    },
}

impl Reply {
    fn state(state: DisplayState) -> Self {
        let title = match &state {
            DisplayState::Showing { translation, .. } => Some(lens_title(translation)),
            DisplayState::Idle => None,
        };
        Self::State { state, title }
    }

    fn error(id: Value, message: impl Into<String>) -> Self {
        Self::Error {
            id,
            message: message.into(),
        }
    }
}

pub async fn run_serve(options: ServeOptions) -> Result<()> {
    let settings = Arc::new(file_settings(options.config.as_deref(), options.resolve)?);
    let session = ServeSession::new(settings, Arc::new(HttpTranslator::new()));

    crate::debug!("serve: waiting for events on stdin");
    session
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await?;
    Ok(())
}

/// Routes protocol events to the auto-translate controller and the explicit
/// translate path.
pub struct ServeSession {
    settings: Arc<dyn SettingsSource>,
    translator: Arc<dyn Translator>,
    controller: Arc<AutoTranslateController>,
}

impl ServeSession {
    pub fn new(settings: Arc<dyn SettingsSource>, translator: Arc<dyn Translator>) -> Self {
        let controller = AutoTranslateController::new(Arc::clone(&settings), Arc::clone(&translator));
        Self {
            settings,
            translator,
            controller,
        }
    }

    /// Processes events until `shutdown` or end of input, then waits for
    /// outstanding replies and hands the writer back.
    pub async fn run<R, W>(&self, reader: R, writer: W) -> Result<W>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let writer_task = tokio::spawn(write_replies(rx, writer));

        let mut states = self.controller.subscribe();
        let state_tx = tx.clone();
        let watcher = tokio::spawn(async move {
            while states.changed().await.is_ok() {
                let state = states.borrow_and_update().clone();
                if state_tx.send(Reply::state(state)).is_err() {
                    break;
                }
            }
        });

        let mut lines = reader.lines();
        while let Some(line) = lines
            .next_line()
            .await
            .context("Failed to read event from stdin")?
        {
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<Event>(&line) {
                Ok(Event::Shutdown) => break,
                Ok(event) => self.handle(event, &tx),
                Err(e) => {
                    crate::debug!("serve: rejected event {line:?}: {e}");
                    let _ = tx.send(Reply::error(Value::Null, format!("Invalid event: {e}")));
                }
            }
        }

        self.controller.shutdown();
        watcher.abort();
        drop(tx);

        writer_task.await.context("Reply writer stopped unexpectedly")?
    }

    fn handle(&self, event: Event, tx: &mpsc::UnboundedSender<Reply>) {
        match event {
            Event::Cursor(snapshot) | Event::Change(snapshot) => self.controller.schedule(snapshot),
            Event::Config { uri, line, text } => {
                let active = match (uri, line, text) {
                    (Some(uri), Some(line), Some(text)) => Some(EditorSnapshot { uri, line, text }),
                    _ => None,
                };
                crate::debug!("serve: configuration changed, cached translations dropped");
                self.controller.config_changed(active);
            }
            Event::Hover { id, text } => {
                let controller = Arc::clone(&self.controller);
                let tx = tx.clone();
                tokio::spawn(async move {
                    let reply = match controller.hover(&text).await {
                        Ok(contents) => Reply::Hover { id, contents },
                        Err(e) => Reply::error(id, e.to_string()),
                    };
                    let _ = tx.send(reply);
                });
            }
            Event::Translate { id, text } => {
                let settings = self.settings.load();
                let translator = Arc::clone(&self.translator);
                let tx = tx.clone();
                tokio::spawn(async move {
                    let reply =
                        match translate_comment_line(translator.as_ref(), &settings, &text).await {
                            Ok(Some(result)) => Reply::Translated {
                                id,
                                line: result.line,
                                translation: result.translation,
                            },
                            Ok(None) => Reply::error(id, NOT_A_COMMENT),
                            Err(e) => Reply::error(id, format!("Translate failed: {e}")),
                        };
                    let _ = tx.send(reply);
                });
            }
            Event::Shutdown => {}
        }
    }
}

async fn write_replies<W>(mut rx: mpsc::UnboundedReceiver<Reply>, mut writer: W) -> Result<W>
where
    W: AsyncWrite + Unpin,
{
    while let Some(reply) = rx.recv().await {
        let mut line = serde_json::to_string(&reply).context("Failed to encode reply")?;
        line.push('\n');
        writer
            .write_all(line.as_bytes())
            .await
            .context("Failed to write reply")?;
        writer.flush().await.context("Failed to flush reply")?;
    }
    Ok(writer)
}
