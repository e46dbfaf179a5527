//! Downloader binary lookup: next to our own executable first, then `PATH`.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::error::LinkwatchError;

/// Find `program` the same way at every startup.
pub fn locate_downloader(program: &str) -> Result<PathBuf, LinkwatchError> {
    let bundled_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf));
    let path_var = std::env::var_os("PATH");
    locate_in(program, bundled_dir.as_deref(), path_var.as_deref()).ok_or_else(|| {
        LinkwatchError::DownloaderNotFound {
            name: program.to_string(),
        }
    })
}

/// Lookup against explicit search locations.
///
/// A program given with a directory component (`./aria2c`, `/opt/bin/aria2c`)
/// is only checked as given.
pub fn locate_in(
    program: &str,
    bundled_dir: Option<&Path>,
    path_var: Option<&OsStr>,
) -> Option<PathBuf> {
    if program.is_empty() {
        return None;
    }
    let as_path = Path::new(program);
    if as_path.components().count() > 1 || as_path.is_absolute() {
        return as_path.is_file().then(|| as_path.to_path_buf());
    }

    let names = candidate_names(program);
    if let Some(dir) = bundled_dir {
        if let Some(found) = first_file_in(dir, &names) {
            return Some(found);
        }
    }
    for dir in std::env::split_paths(path_var?) {
        if let Some(found) = first_file_in(&dir, &names) {
            return Some(found);
        }
    }
    None
}

fn candidate_names(program: &str) -> Vec<String> {
    let suffix = std::env::consts::EXE_SUFFIX;
    if suffix.is_empty() || program.ends_with(suffix) {
        vec![program.to_string()]
    } else {
        vec![format!("{program}{suffix}"), program.to_string()]
    }
}

fn first_file_in(dir: &Path, names: &[String]) -> Option<PathBuf> {
    names
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::fs;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(format!("{name}{}", std::env::consts::EXE_SUFFIX));
        fs::write(&path, b"").unwrap();
        path
    }

    #[test]
    fn bundled_copy_wins_over_path() {
        let bundled = tempfile::tempdir().unwrap();
        let on_path = tempfile::tempdir().unwrap();
        let expected = touch(bundled.path(), "aria2c");
        touch(on_path.path(), "aria2c");
        let path_var = std::env::join_paths([on_path.path()]).unwrap();
        let found = locate_in("aria2c", Some(bundled.path()), Some(&path_var)).unwrap();
        assert_eq!(found, expected);
    }

    #[test]
    fn falls_back_to_path_in_order() {
        let empty = tempfile::tempdir().unwrap();
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        touch(second.path(), "aria2c");
        let expected = touch(first.path(), "aria2c");
        let path_var: OsString =
            std::env::join_paths([empty.path(), first.path(), second.path()]).unwrap();
        let found = locate_in("aria2c", Some(empty.path()), Some(&path_var)).unwrap();
        assert_eq!(found, expected);
    }

    #[test]
    fn missing_everywhere_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path_var = std::env::join_paths([dir.path()]).unwrap();
        assert!(locate_in("aria2c", Some(dir.path()), Some(&path_var)).is_none());
        assert!(locate_in("aria2c", None, None).is_none());
        assert!(locate_in("", Some(dir.path()), Some(&path_var)).is_none());
    }

    #[test]
    fn explicit_path_is_checked_as_given() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("my-downloader");
        fs::write(&path, b"").unwrap();
        let program = path.to_str().unwrap();
        assert_eq!(locate_in(program, None, None), Some(path.clone()));
        let missing = dir.path().join("nope");
        assert!(locate_in(missing.to_str().unwrap(), None, None).is_none());
    }

    #[test]
    fn locate_downloader_reports_name() {
        let err = locate_downloader("linkwatch-test-no-such-downloader").unwrap_err();
        assert!(err.to_string().contains("linkwatch-test-no-such-downloader"));
    }
}
