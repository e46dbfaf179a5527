//! Filesystem watch on the links file's directory.
//!
//! The platform-native backend is tried first (inotify, kqueue/FSEvents,
//! ReadDirectoryChanges); if it cannot start, a `PollWatcher` takes over.
//! Events are filtered to the links file and forwarded to a Tokio queue.
//! Debouncing happens in the consumer, not here.

pub mod event;

use notify::{Config as NotifyConfig, Event, PollWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::error::LinkwatchError;
use crate::link_file::LinkFile;

pub use event::{classify, LinkFileEvent};

const POLL_INTERVAL: Duration = Duration::from_millis(500);
const QUEUE_DEPTH: usize = 64;

/// Keeps the OS watcher alive; dropping it stops watching.
pub struct LinkFileWatcher {
    _watcher: Box<dyn Watcher + Send>,
    dir: PathBuf,
}

impl std::fmt::Debug for LinkFileWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkFileWatcher")
            .field("dir", &self.dir)
            .finish_non_exhaustive()
    }
}

fn make_handler(
    target: PathBuf,
    tx: mpsc::Sender<LinkFileEvent>,
) -> impl Fn(notify::Result<Event>) + Send + 'static {
    move |result: notify::Result<Event>| match result {
        Ok(event) => {
            if let Some(ev) = classify(&event, &target) {
                tracing::trace!(?ev, kind = ?event.kind, "links file event");
                // A full queue already holds a pending event; the debounce
                // pass re-reads the file anyway.
                if let Err(mpsc::error::TrySendError::Closed(_)) = tx.try_send(ev) {
                    tracing::debug!("watch queue closed");
                }
            }
        }
        Err(e) => tracing::warn!("watcher error: {}", e),
    }
}

/// Which notify backend to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Platform-native, falling back to polling every 500 ms.
    Native,
    /// Polling only, at the given interval.
    Poll(Duration),
}

/// Start watching `link_file` with the native backend. Returns the handle
/// (keep it alive) and the receiving end of the event queue.
pub fn start(
    link_file: &LinkFile,
) -> Result<(LinkFileWatcher, mpsc::Receiver<LinkFileEvent>), LinkwatchError> {
    start_with(link_file, Backend::Native)
}

pub fn start_with(
    link_file: &LinkFile,
    backend: Backend,
) -> Result<(LinkFileWatcher, mpsc::Receiver<LinkFileEvent>), LinkwatchError> {
    let (tx, rx) = mpsc::channel(QUEUE_DEPTH);
    let dir = link_file.dir().to_path_buf();
    let target = link_file.path().to_path_buf();

    // The poll backend accepts a missing path silently.
    if !dir.is_dir() {
        return Err(LinkwatchError::WatchBackend {
            source: notify::Error::path_not_found().add_path(dir.clone()),
            path: dir,
        });
    }

    let watcher: Box<dyn Watcher + Send> = match backend {
        Backend::Native => {
            let native = notify::recommended_watcher(make_handler(target.clone(), tx.clone()))
                .and_then(|mut w| w.watch(&dir, RecursiveMode::NonRecursive).map(|()| w));
            match native {
                Ok(w) => {
                    tracing::debug!("watcher: using native backend");
                    Box::new(w)
                }
                Err(e) => {
                    tracing::warn!(
                        "watcher: native backend unavailable ({}); falling back to polling",
                        e
                    );
                    Box::new(start_poll(&dir, target, tx, POLL_INTERVAL)?)
                }
            }
        }
        Backend::Poll(interval) => {
            tracing::debug!(?interval, "watcher: using poll backend");
            Box::new(start_poll(&dir, target, tx, interval)?)
        }
    };

    tracing::info!(dir = %dir.display(), "watching {}", link_file.path().display());
    Ok((
        LinkFileWatcher {
            _watcher: watcher,
            dir,
        },
        rx,
    ))
}

fn start_poll(
    dir: &Path,
    target: PathBuf,
    tx: mpsc::Sender<LinkFileEvent>,
    interval: Duration,
) -> Result<PollWatcher, LinkwatchError> {
    let backend_err = |source| LinkwatchError::WatchBackend {
        path: dir.to_path_buf(),
        source,
    };
    let config = NotifyConfig::default()
        .with_poll_interval(interval)
        .with_compare_contents(true);
    let mut poll = PollWatcher::new(make_handler(target, tx), config).map_err(backend_err)?;
    poll.watch(dir, RecursiveMode::NonRecursive)
        .map_err(backend_err)?;
    Ok(poll)
}
