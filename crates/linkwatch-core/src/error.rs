//! Error type shared by the core modules.

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum LinkwatchError {
    /// Neither a bundled copy nor a `PATH` entry provides the downloader.
    #[error("downloader `{name}` not found next to the executable or on PATH; install it or set `downloader` in the config")]
    DownloaderNotFound { name: String },

    /// Neither the native nor the polling watcher could be started.
    #[error("filesystem watch backend unavailable for {path}: {source}")]
    WatchBackend {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    /// The links file could not be created, read or recreated.
    #[error("links file {path}: {source}")]
    LinkFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Spawning a child process failed.
    #[error("spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// Config file is unreadable or malformed.
    #[error("config {path}: {message}")]
    Config { path: PathBuf, message: String },
}

impl LinkwatchError {
    pub(crate) fn link_file(path: impl Into<PathBuf>, source: io::Error) -> Self {
        LinkwatchError::LinkFile {
            path: path.into(),
            source,
        }
    }
}
