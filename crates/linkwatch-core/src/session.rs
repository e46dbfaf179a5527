//! One run of the tool: `Idle -> EditorOpen -> Watching -> ShuttingDown -> Terminated`.
//!
//! The session owns every piece of mutable state (seen links, debounce
//! bookkeeping, the editor). Watcher events arrive on a single queue and are
//! handled serially by [`Session::watch`], so nothing here needs a lock.

use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::dispatch::{dispatch_new, DispatchReport, Launcher};
use crate::editor::{CloseOutcome, EditorSession, NoEditor};
use crate::error::LinkwatchError;
use crate::link_file::LinkFile;
use crate::link_set::LinkSet;
use crate::watch_state::WatchState;
use crate::watcher::LinkFileEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    EditorOpen,
    Watching,
    ShuttingDown,
    Terminated,
}

pub struct Session<L: Launcher> {
    phase: Phase,
    link_file: LinkFile,
    links: LinkSet,
    state: WatchState,
    launcher: L,
    editor: Box<dyn EditorSession>,
}

impl<L: Launcher> Session<L> {
    pub fn new(
        link_file: LinkFile,
        launcher: L,
        editor: Box<dyn EditorSession>,
        debounce: Duration,
    ) -> Self {
        Self {
            phase: Phase::Idle,
            link_file,
            links: LinkSet::new(),
            state: WatchState::new(debounce),
            launcher,
            editor,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn links(&self) -> &LinkSet {
        &self.links
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    pub fn link_file(&self) -> &LinkFile {
        &self.link_file
    }

    fn enter(&mut self, phase: Phase) {
        tracing::debug!(from = ?self.phase, to = ?phase, "session phase");
        self.phase = phase;
    }

    /// Open the links file in the editor. Failure only costs convenience.
    pub fn open_editor(&mut self) {
        let path = self.link_file.path().to_path_buf();
        if let Err(e) = self.editor.open(&path) {
            tracing::warn!("could not open editor: {}", e);
            println!("Could not open an editor ({e}); open {} manually.", path.display());
        }
        self.enter(Phase::EditorOpen);
    }

    /// Read the links file and dispatch whatever is new.
    pub fn process(&mut self) -> Result<DispatchReport, LinkwatchError> {
        let snapshot = self.link_file.read()?;
        if snapshot.recreated {
            println!("{} was deleted; recreated it empty.", self.link_file.path().display());
        }
        if !self.state.record_content(&snapshot.bytes) {
            tracing::debug!("links file content unchanged");
            return Ok(DispatchReport::default());
        }
        tracing::debug!(
            quiet_for = ?self.state.last_event().map(|t| t.elapsed()),
            "processing links file"
        );
        let report = dispatch_new(&mut self.links, &snapshot.text(), &self.launcher);
        if report.attempted() == 0 {
            tracing::debug!("no new links");
        }
        Ok(report)
    }

    /// Handle watcher events until `shutdown` resolves or the queue closes.
    ///
    /// Each event pushes the processing deadline out by the debounce
    /// interval; the file is read once the deadline passes with no further
    /// events.
    pub async fn watch<F>(&mut self, mut events: mpsc::Receiver<LinkFileEvent>, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        self.enter(Phase::Watching);
        tokio::pin!(shutdown);
        loop {
            let deadline = self.state.deadline();
            tokio::select! {
                () = &mut shutdown => {
                    tracing::info!("shutdown requested");
                    break;
                }
                event = events.recv() => match event {
                    Some(event) => {
                        tracing::trace!(?event, "queued for debounce");
                        self.state.note_event(Instant::now());
                    }
                    None => {
                        tracing::warn!("watch queue closed");
                        break;
                    }
                },
                () = wait_until(deadline) => {
                    if self.state.take_due(Instant::now()) {
                        if let Err(e) = self.process() {
                            tracing::error!("processing links file: {}", e);
                            println!("Could not process links file: {e}");
                        }
                    }
                }
            }
        }
        self.enter(Phase::ShuttingDown);
    }

    /// Close the editor and finish. Only the first call does anything.
    ///
    /// The close may wait out the editor's grace period, so it runs on the
    /// blocking pool.
    pub async fn shutdown(&mut self) -> Option<CloseOutcome> {
        if self.phase == Phase::Terminated {
            return None;
        }
        if self.phase != Phase::ShuttingDown {
            self.enter(Phase::ShuttingDown);
        }
        let mut editor = std::mem::replace(&mut self.editor, Box::new(NoEditor));
        let joined = tokio::task::spawn_blocking(move || {
            let result = editor.close();
            (editor, result)
        })
        .await;
        let outcome = match joined {
            Ok((editor, result)) => {
                self.editor = editor;
                match result {
                    Ok(outcome) => {
                        tracing::info!(?outcome, "editor closed");
                        Some(outcome)
                    }
                    Err(e) => {
                        tracing::warn!("could not close editor: {}", e);
                        None
                    }
                }
            }
            Err(e) => {
                tracing::warn!("editor close task failed: {}", e);
                None
            }
        };
        self.enter(Phase::Terminated);
        outcome
    }

    /// The whole lifecycle: editor, optional initial pass, watch, shutdown.
    pub async fn run<F>(
        &mut self,
        events: mpsc::Receiver<LinkFileEvent>,
        dispatch_existing: bool,
        shutdown: F,
    ) -> Option<CloseOutcome>
    where
        F: Future<Output = ()>,
    {
        self.open_editor();
        if dispatch_existing {
            if let Err(e) = self.process() {
                tracing::error!("initial pass over links file: {}", e);
            }
        } else {
            // Mark existing links seen without launching anything.
            match self.link_file.read() {
                Ok(snapshot) => {
                    self.state.record_content(&snapshot.bytes);
                    let skipped = self.links.take_new(&snapshot.text()).len();
                    tracing::info!(skipped, "skipping links already in file");
                }
                Err(e) => tracing::warn!("reading links file at startup: {}", e),
            }
        }
        self.watch(events, shutdown).await;
        self.shutdown().await
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
