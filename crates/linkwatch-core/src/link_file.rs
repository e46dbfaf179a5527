//! The watched links file: creation, reading, recreation after deletion.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::LinkwatchError;

/// Contents of the links file at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub bytes: Vec<u8>,
    /// The file was missing and has been recreated empty.
    pub recreated: bool,
}

impl Snapshot {
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}

#[derive(Debug, Clone)]
pub struct LinkFile {
    path: PathBuf,
}

impl LinkFile {
    /// Resolve `path` against `base` (if relative), create the file empty if
    /// absent, and canonicalize it so event paths can be compared exactly.
    pub fn ensure(path: &Path, base: &Path) -> Result<Self, LinkwatchError> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            base.join(path)
        };
        if create_if_missing(&absolute)? {
            tracing::info!(path = %absolute.display(), "created empty links file");
        }
        let path = absolute
            .canonicalize()
            .map_err(|e| LinkwatchError::link_file(&absolute, e))?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new("/"))
    }

    /// Read the current contents. A missing file is recreated empty.
    pub fn read(&self) -> Result<Snapshot, LinkwatchError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Snapshot {
                bytes,
                recreated: false,
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                create_if_missing(&self.path)?;
                tracing::warn!(path = %self.path.display(), "links file was deleted; recreated empty");
                Ok(Snapshot {
                    bytes: Vec::new(),
                    recreated: true,
                })
            }
            Err(e) => Err(LinkwatchError::link_file(&self.path, e)),
        }
    }
}

/// Returns true if the file was created.
fn create_if_missing(path: &Path) -> Result<bool, LinkwatchError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| LinkwatchError::link_file(path, e))?;
    }
    match fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
    {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(LinkwatchError::link_file(path, e)),
    }
}
