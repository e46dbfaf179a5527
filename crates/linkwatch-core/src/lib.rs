pub mod config;
pub mod error;
pub mod logging;
pub mod paths;

pub mod dispatch;
pub mod editor;
pub mod link_file;
pub mod link_set;
pub mod locate;
pub mod session;
pub mod watch_state;
pub mod watcher;

pub use error::LinkwatchError;
