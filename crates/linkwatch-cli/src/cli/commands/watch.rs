//! `linkwatch` – open the editor, watch the links file, dispatch until Ctrl-C.

use anyhow::{Context, Result};
use linkwatch_core::config::LinkwatchConfig;
use linkwatch_core::dispatch::ProcessLauncher;
use linkwatch_core::link_file::LinkFile;
use linkwatch_core::session::Session;
use linkwatch_core::{editor, locate, watcher};
use std::path::{Path, PathBuf};

pub async fn run_watch(cfg: &LinkwatchConfig) -> Result<()> {
    let downloader = locate::locate_downloader(&cfg.downloader)?;
    tracing::info!(path = %downloader.display(), "using downloader");

    let cwd = std::env::current_dir().context("current directory")?;
    let download_dir = match cfg.download_dir() {
        Some(dir) => Some(prepare_download_dir(dir, &cwd)?),
        None => None,
    };

    let link_file = LinkFile::ensure(&cfg.link_file, &cwd)?;
    let (_watcher, events) = watcher::start(&link_file)?;

    println!("Watching {} for new links.", link_file.path().display());
    println!("Downloader: {}", downloader.display());
    println!("Press Ctrl+C to stop (this also closes the editor).");
    if let Some(hint) = editor::close_hint(cfg) {
        println!("{hint}");
    }

    let launcher = ProcessLauncher::new(downloader)
        .with_args(cfg.downloader_args.clone())
        .with_working_dir(download_dir);
    let mut session = Session::new(link_file, launcher, editor::select(cfg), cfg.debounce());
    let outcome = session
        .run(events, cfg.dispatch_existing, shutdown_signal())
        .await;

    tracing::info!(
        dispatched = session.links().len(),
        editor = ?outcome,
        "linkwatch stopped"
    );
    println!("Stopped after {} link(s).", session.links().len());
    Ok(())
}

fn prepare_download_dir(dir: &Path, cwd: &Path) -> Result<PathBuf> {
    let dir = if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        cwd.join(dir)
    };
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("create download directory {}", dir.display()))?;
    Ok(dir)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => println!("\nStopping..."),
        Err(e) => {
            // Without a signal handler the default Ctrl-C behaviour still ends the process.
            tracing::error!("cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
