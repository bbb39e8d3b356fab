pub mod actor;
mod server;
pub mod store;

pub mod config;
pub mod dirs;

mod daemon;
pub use daemon::{Daemon, DaemonError, RuntimeConfig};
