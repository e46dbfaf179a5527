//! CLI command handlers.

mod watch;

pub use watch::run_watch;
