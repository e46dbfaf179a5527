//! Opening the links file in an editor, and closing it again on shutdown.
//!
//! [`select`] picks the implementation once at startup: a spawned editor
//! process (platform opener or a configured program), or nothing at all.

mod process;

#[cfg(unix)]
#[path = "unix.rs"]
mod platform;
#[cfg(not(unix))]
#[path = "other.rs"]
mod platform;

use std::path::Path;

use crate::config::LinkwatchConfig;
use crate::error::LinkwatchError;

pub use platform::default_opener;
pub use process::{EditorCommand, ProcessEditor};

/// What `close` found and did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// No editor was opened.
    NotOpen,
    /// The editor process had already exited.
    AlreadyExited,
    /// Exited after the graceful terminate request.
    Terminated,
    /// Had to be killed.
    Killed,
}

pub trait EditorSession: Send {
    fn open(&mut self, path: &Path) -> Result<(), LinkwatchError>;
    fn close(&mut self) -> Result<CloseOutcome, LinkwatchError>;
}

/// Used when the editor is disabled.
#[derive(Debug, Default)]
pub struct NoEditor;

impl EditorSession for NoEditor {
    fn open(&mut self, path: &Path) -> Result<(), LinkwatchError> {
        tracing::debug!(path = %path.display(), "editor disabled");
        Ok(())
    }

    fn close(&mut self) -> Result<CloseOutcome, LinkwatchError> {
        Ok(CloseOutcome::NotOpen)
    }
}

/// Choose the editor session for this run.
pub fn select(cfg: &LinkwatchConfig) -> Box<dyn EditorSession> {
    if !cfg.open_editor {
        return Box::new(NoEditor);
    }
    let command = match cfg.editor.as_deref().and_then(EditorCommand::parse) {
        Some(command) => command,
        None => default_opener(),
    };
    tracing::debug!(program = %command.program(), "editor selected");
    Box::new(ProcessEditor::new(command, cfg.editor_close_grace()))
}

/// Startup note for the default opener: it exits right after handing the
/// file over, so the editor it starts cannot be closed on shutdown.
pub fn close_hint(cfg: &LinkwatchConfig) -> Option<&'static str> {
    let configured = cfg.editor.as_deref().and_then(EditorCommand::parse).is_some();
    (cfg.open_editor && !configured).then_some(
        "Note: the editor stays open after Ctrl+C with the default opener; \
         set `editor = \"<program>\"` in the config to have it closed on exit.",
    )
}
