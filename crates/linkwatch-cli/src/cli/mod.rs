//! CLI for linkwatch. Runs with no arguments; every flag overrides one config value.

mod commands;

use anyhow::Result;
use clap::Parser;
use linkwatch_core::config::{self, LinkwatchConfig};
use std::path::PathBuf;

use commands::run_watch;

/// Watch a links file and hand each new link to a downloader.
#[derive(Debug, Parser)]
#[command(name = "linkwatch")]
#[command(about = "Watch links.txt and start a downloader for every new line", long_about = None)]
pub struct Cli {
    /// Links file to watch (default from config: links.txt in the current directory).
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Downloader program name or path (default from config: aria2c).
    #[arg(long, value_name = "PROGRAM")]
    pub downloader: Option<String>,

    /// Quiet period in milliseconds after the last change before the file is read.
    #[arg(long, value_name = "MS")]
    pub debounce_ms: Option<u64>,

    /// Do not open the links file in an editor.
    #[arg(long)]
    pub no_editor: bool,

    /// Do not dispatch links already in the file at startup.
    #[arg(long)]
    pub skip_existing: bool,
}

impl Cli {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = cli.apply(config::load_or_init()?);
        tracing::debug!("effective config: {:?}", cfg);
        run_watch(&cfg).await
    }

    /// Overlay command-line flags on the loaded config.
    pub fn apply(self, mut cfg: LinkwatchConfig) -> LinkwatchConfig {
        if let Some(file) = self.file {
            cfg.link_file = file;
        }
        if let Some(downloader) = self.downloader {
            cfg.downloader = downloader;
        }
        if let Some(ms) = self.debounce_ms {
            cfg.debounce_ms = ms;
        }
        if self.no_editor {
            cfg.open_editor = false;
        }
        if self.skip_existing {
            cfg.dispatch_existing = false;
        }
        cfg
    }
}
