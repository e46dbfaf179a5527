use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind};
use std::path::Path;

/// What happened to the links file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkFileEvent {
    /// Written, created, or renamed into place.
    Changed,
    /// Deleted or renamed away.
    Removed,
}

/// Map a raw notify event to a links-file event, or None if it concerns
/// another path or carries no change (plain reads).
pub fn classify(event: &Event, target: &Path) -> Option<LinkFileEvent> {
    let position = event.paths.iter().position(|p| is_target(p, target))?;
    match event.kind {
        EventKind::Access(notify::event::AccessKind::Close(notify::event::AccessMode::Write)) => {
            Some(LinkFileEvent::Changed)
        }
        EventKind::Access(_) => None,
        EventKind::Remove(_) => Some(LinkFileEvent::Removed),
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => Some(LinkFileEvent::Removed),
        // Both: paths are [from, to].
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) if position == 0 => {
            Some(LinkFileEvent::Removed)
        }
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Any | EventKind::Other => {
            Some(LinkFileEvent::Changed)
        }
    }
}

/// Exact path match, falling back to comparing canonical parents when the
/// backend reports a differently spelled directory.
fn is_target(path: &Path, target: &Path) -> bool {
    if path == target {
        return true;
    }
    if path.file_name() != target.file_name() {
        return false;
    }
    match (path.parent(), target.parent()) {
        (Some(a), Some(b)) => a.canonicalize().map(|a| a == b).unwrap_or(false),
        _ => false,
    }
}
