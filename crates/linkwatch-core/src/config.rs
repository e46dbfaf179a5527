use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::LinkwatchError;
use crate::paths;

/// Global configuration loaded from `~/.config/linkwatch/config.toml`.
///
/// Every field has a default, so a partial file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkwatchConfig {
    /// Watched links file. Relative paths resolve against the working directory.
    pub link_file: PathBuf,
    /// Downloader program name or path.
    pub downloader: String,
    /// Extra arguments placed before the URL (the URL is always last).
    pub downloader_args: Vec<String>,
    /// Working directory for downloader processes; created at startup.
    /// Relative paths resolve against the working directory; `""` = current directory.
    pub download_dir: PathBuf,
    /// Quiet period after the last file event before the file is processed.
    pub debounce_ms: u64,
    /// Open the links file in an editor at startup.
    pub open_editor: bool,
    /// Editor program; None = platform default opener.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,
    /// How long to wait after a graceful terminate before killing the editor.
    pub editor_close_grace_ms: u64,
    /// Dispatch links already present in the file at startup.
    pub dispatch_existing: bool,
}

impl Default for LinkwatchConfig {
    fn default() -> Self {
        Self {
            link_file: PathBuf::from("links.txt"),
            downloader: "aria2c".to_string(),
            downloader_args: Vec::new(),
            download_dir: PathBuf::from("downloads"),
            debounce_ms: 500,
            open_editor: true,
            editor: None,
            editor_close_grace_ms: 1000,
            dispatch_existing: true,
        }
    }
}

impl LinkwatchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn editor_close_grace(&self) -> Duration {
        Duration::from_millis(self.editor_close_grace_ms)
    }

    /// Download directory, or None when downloads go to the current directory.
    pub fn download_dir(&self) -> Option<&Path> {
        if self.download_dir.as_os_str().is_empty() {
            None
        } else {
            Some(&self.download_dir)
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    paths::config_path()
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<LinkwatchConfig> {
    let path = config_path()?;
    load_or_init_at(&path)
}

/// Same as [`load_or_init`] but for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<LinkwatchConfig> {
    if !path.exists() {
        let default_cfg = LinkwatchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
        fs::write(path, toml).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: LinkwatchConfig = toml::from_str(&data).map_err(|e| LinkwatchError::Config {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(cfg)
}
