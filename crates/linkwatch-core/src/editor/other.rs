//! Windows and other non-Unix targets: `cmd /C start`; no graceful signal, kill directly.

use std::io;
use std::process::Child;
use std::time::Duration;

use super::{CloseOutcome, EditorCommand};

pub fn default_opener() -> EditorCommand {
    // The empty string is `start`'s window title argument.
    EditorCommand::new("cmd").args_from(["/C", "start", ""])
}

pub(super) fn terminate(child: &mut Child, _grace: Duration) -> io::Result<CloseOutcome> {
    child.kill()?;
    child.wait()?;
    Ok(CloseOutcome::Killed)
}
