//! Handing new links to the external downloader.
//!
//! One child process per link, spawned without waiting. A background task
//! reaps each child and reports its exit status.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use crate::error::LinkwatchError;
use crate::link_set::LinkSet;

/// Starts a download for one URL.
pub trait Launcher {
    fn launch(&self, url: &str) -> Result<(), LinkwatchError>;
}

/// Launches `<program> [args...] <url>` as a child process.
#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    program: PathBuf,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl ProcessLauncher {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_working_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.working_dir = dir;
        self
    }

    fn command(&self, url: &str) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(&self.args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

impl Launcher for ProcessLauncher {
    /// Must be called from within a Tokio runtime.
    fn launch(&self, url: &str) -> Result<(), LinkwatchError> {
        let mut child = self
            .command(url)
            .spawn()
            .map_err(|source| LinkwatchError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;
        tracing::debug!(url, pid = ?child.id(), "downloader started");

        let url = url.to_string();
        let program = self.program.clone();
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) if status.success() => {
                    tracing::info!(url = %url, "downloader finished");
                    println!("Finished: {url}");
                }
                Ok(status) => {
                    let code = status
                        .code()
                        .map(|c| c.to_string())
                        .unwrap_or_else(|| "signal".to_string());
                    tracing::warn!(url = %url, code = %code, "downloader exited with failure");
                    println!("Downloader exited with code {code} for {url}");
                    if let Some(hint) = exit_hint(&program, status.code()) {
                        println!("  {hint}");
                    }
                }
                Err(e) => tracing::warn!(url = %url, "waiting for downloader: {}", e),
            }
        });
        Ok(())
    }
}

/// Extra explanation for well-known downloader exit codes.
fn exit_hint(program: &Path, code: Option<i32>) -> Option<&'static str> {
    let is_aria2c = program
        .file_stem()
        .is_some_and(|stem| stem == std::ffi::OsStr::new("aria2c"));
    match (is_aria2c, code) {
        (true, Some(28)) => {
            Some("aria2c reported an I/O error (code 28); check disk space and download folder permissions")
        }
        _ => None,
    }
}

/// Outcome of one processing pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub launched: Vec<String>,
    pub failed: Vec<String>,
}

impl DispatchReport {
    pub fn attempted(&self) -> usize {
        self.launched.len() + self.failed.len()
    }
}

/// Launches every link in `content` that `links` has not seen.
///
/// A link is marked seen before its launch, so a spawn failure is not retried
/// on the next pass.
pub fn dispatch_new<L: Launcher + ?Sized>(
    links: &mut LinkSet,
    content: &str,
    launcher: &L,
) -> DispatchReport {
    let mut report = DispatchReport::default();
    for url in links.take_new(content) {
        match launcher.launch(&url) {
            Ok(()) => {
                tracing::info!(url = %url, "dispatched");
                println!("Dispatched: {url}");
                report.launched.push(url);
            }
            Err(e) => {
                tracing::error!(url = %url, "dispatch failed: {}", e);
                println!("Could not start downloader for {url}: {e}");
                report.failed.push(url);
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recording {
        calls: RefCell<Vec<String>>,
        fail_on: Option<&'static str>,
    }

    impl Launcher for Recording {
        fn launch(&self, url: &str) -> Result<(), LinkwatchError> {
            self.calls.borrow_mut().push(url.to_string());
            if self.fail_on == Some(url) {
                return Err(LinkwatchError::Spawn {
                    program: "fake".to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "fake"),
                });
            }
            Ok(())
        }
    }

    #[test]
    fn dispatches_each_new_link_once() {
        let launcher = Recording::default();
        let mut links = LinkSet::new();
        let first = dispatch_new(&mut links, "http://a/x\nhttp://b/y", &launcher);
        assert_eq!(first.launched, vec!["http://a/x", "http://b/y"]);
        let second = dispatch_new(&mut links, "http://a/x\nhttp://c/z", &launcher);
        assert_eq!(second.launched, vec!["http://c/z"]);
        assert_eq!(
            *launcher.calls.borrow(),
            vec!["http://a/x", "http://b/y", "http://c/z"]
        );
    }

    #[test]
    fn spawn_failure_is_not_retried() {
        let launcher = Recording {
            fail_on: Some("http://bad/"),
            ..Default::default()
        };
        let mut links = LinkSet::new();
        let report = dispatch_new(&mut links, "http://bad/\nhttp://ok/", &launcher);
        assert_eq!(report.failed, vec!["http://bad/"]);
        assert_eq!(report.launched, vec!["http://ok/"]);
        assert_eq!(report.attempted(), 2);

        let again = dispatch_new(&mut links, "http://bad/\nhttp://ok/", &launcher);
        assert_eq!(again.attempted(), 0);
        assert_eq!(launcher.calls.borrow().len(), 2);
    }

    #[test]
    fn aria2c_io_error_gets_a_hint() {
        let hint = exit_hint(Path::new("/usr/bin/aria2c"), Some(28)).unwrap();
        assert!(hint.contains("disk space"));
        assert!(exit_hint(Path::new("aria2c.exe"), Some(28)).is_some());
        assert!(exit_hint(Path::new("/usr/bin/aria2c"), Some(1)).is_none());
        assert!(exit_hint(Path::new("/usr/bin/wget"), Some(28)).is_none());
        assert!(exit_hint(Path::new("/usr/bin/aria2c"), None).is_none());
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let launcher = ProcessLauncher::new(dir.path().join("no-such-downloader"));
        let err = launcher.launch("http://a/x").unwrap_err();
        assert!(matches!(err, LinkwatchError::Spawn { .. }), "{err}");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn process_launcher_passes_url_last() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake-dl.sh");
        let out = dir.path().join("args.txt");
        std::fs::write(
            &script,
            format!("#!/bin/sh\necho \"$@\" >> '{}'\n", out.display()),
        )
        .unwrap();

        let launcher = ProcessLauncher::new("/bin/sh")
            .with_args(vec![
                script.display().to_string(),
                "--continue=true".to_string(),
            ])
            .with_working_dir(Some(dir.path().to_path_buf()));
        launcher.launch("http://a/x").unwrap();

        let mut written = String::new();
        for _ in 0..100 {
            written = std::fs::read_to_string(&out).unwrap_or_default();
            if !written.is_empty() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        assert_eq!(written.trim(), "--continue=true http://a/x");
    }
}
