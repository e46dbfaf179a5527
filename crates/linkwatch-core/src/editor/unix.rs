//! Unix: `xdg-open` (or `open` on macOS); SIGTERM, then SIGKILL after a grace period.

use std::io;
use std::process::Child;
use std::time::{Duration, Instant};

use super::{CloseOutcome, EditorCommand};

const POLL: Duration = Duration::from_millis(25);

pub fn default_opener() -> EditorCommand {
    if cfg!(target_os = "macos") {
        EditorCommand::new("open")
    } else {
        EditorCommand::new("xdg-open")
    }
}

pub(super) fn terminate(child: &mut Child, grace: Duration) -> io::Result<CloseOutcome> {
    let pid = child.id() as libc::pid_t;
    // SAFETY: `pid` belongs to a child we have not yet reaped, so it cannot
    // have been reused by an unrelated process.
    let rc = unsafe { libc::kill(pid, libc::SIGTERM) };
    if rc != 0 {
        let err = io::Error::last_os_error();
        if err.raw_os_error() == Some(libc::ESRCH) {
            return Ok(CloseOutcome::AlreadyExited);
        }
        return Err(err);
    }

    let started = Instant::now();
    while started.elapsed() < grace {
        if child.try_wait()?.is_some() {
            return Ok(CloseOutcome::Terminated);
        }
        std::thread::sleep(POLL);
    }
    if child.try_wait()?.is_some() {
        return Ok(CloseOutcome::Terminated);
    }

    child.kill()?;
    child.wait()?;
    Ok(CloseOutcome::Killed)
}
