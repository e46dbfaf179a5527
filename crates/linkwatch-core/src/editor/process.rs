use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use super::{platform, CloseOutcome, EditorSession};
use crate::error::LinkwatchError;

/// Program plus leading arguments; the file path is appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorCommand {
    program: String,
    args: Vec<String>,
}

impl EditorCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn args_from<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Split a config value like `"code --new-window"` on whitespace.
    pub fn parse(spec: &str) -> Option<Self> {
        let mut parts = spec.split_whitespace();
        let program = parts.next()?;
        Some(Self::new(program).args_from(parts))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

/// Editor running as a child process of ours.
#[derive(Debug)]
pub struct ProcessEditor {
    command: EditorCommand,
    grace: Duration,
    child: Option<Child>,
}

impl ProcessEditor {
    pub fn new(command: EditorCommand, grace: Duration) -> Self {
        Self {
            command,
            grace,
            child: None,
        }
    }

    pub fn pid(&self) -> Option<u32> {
        self.child.as_ref().map(Child::id)
    }
}

impl EditorSession for ProcessEditor {
    fn open(&mut self, path: &Path) -> Result<(), LinkwatchError> {
        let child = Command::new(&self.command.program)
            .args(&self.command.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| LinkwatchError::Spawn {
                program: self.command.program.clone(),
                source,
            })?;
        tracing::info!(program = %self.command.program, pid = child.id(), "editor opened");
        self.child = Some(child);
        Ok(())
    }

    fn close(&mut self) -> Result<CloseOutcome, LinkwatchError> {
        let Some(mut child) = self.child.take() else {
            return Ok(CloseOutcome::NotOpen);
        };
        let spawn_err = |source| LinkwatchError::Spawn {
            program: self.command.program.clone(),
            source,
        };
        if child.try_wait().map_err(spawn_err)?.is_some() {
            return Ok(CloseOutcome::AlreadyExited);
        }
        platform::terminate(&mut child, self.grace).map_err(spawn_err)
    }
}
