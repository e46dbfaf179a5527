//! Locations of the config file and state (log) directory.
//!
//! On Unix these follow the XDG base directory spec via the `xdg` crate.
//! Elsewhere they sit next to the executable.

use anyhow::Result;
use std::path::PathBuf;

const APP: &str = "linkwatch";

#[cfg(unix)]
pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix(APP)?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

#[cfg(unix)]
pub fn state_dir() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix(APP)?;
    Ok(xdg_dirs.get_state_home())
}

#[cfg(not(unix))]
pub fn config_path() -> Result<PathBuf> {
    Ok(exe_dir()?.join(format!("{APP}.toml")))
}

#[cfg(not(unix))]
pub fn state_dir() -> Result<PathBuf> {
    Ok(exe_dir()?)
}

#[cfg(not(unix))]
fn exe_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    exe.parent()
        .map(|p| p.to_path_buf())
        .ok_or_else(|| anyhow::anyhow!("executable {} has no parent directory", exe.display()))
}
