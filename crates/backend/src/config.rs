//! Configuration loading.
//!
//! A single optional TOML file (see [`crate::dirs::default_config_path`])
//! with serde defaults for every key, so an absent or partial file always
//! yields a usable config. A malformed file is reported and replaced by
//! defaults rather than aborting; the backing data file is the only thing
//! the process refuses to start without.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::dirs;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Port the HTTP server listens on.
  pub port: u16,
  /// Backing text file; defaults to `<data dir>/todo.txt`.
  pub data_file: Option<PathBuf>,
  /// Store actor job queue capacity (producers block when full).
  pub job_queue_capacity: usize,
  /// Admission queue capacity.
  pub admission_queue_capacity: usize,
  /// Log level for the serve command: off, error, warn, info, debug, trace.
  pub log_level: String,
  /// Log rotation for the serve command: hourly, daily, never.
  pub log_rotation: String,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      port: 8080,
      data_file: None,
      job_queue_capacity: 100,
      admission_queue_capacity: 32,
      log_level: "info".to_string(),
      log_rotation: "daily".to_string(),
    }
  }
}

impl Config {
  /// Load the config file, falling back to defaults when it is absent or
  /// unreadable.
  pub async fn load() -> Self {
    let path = dirs::default_config_path();
    let contents = match tokio::fs::read_to_string(&path).await {
      Ok(contents) => contents,
      Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
        debug!(path = %path.display(), "no config file, using defaults");
        return Self::default();
      }
      Err(err) => {
        warn!(path = %path.display(), error = %err, "failed to read config, using defaults");
        return Self::default();
      }
    };

    match toml::from_str(&contents) {
      Ok(config) => config,
      Err(err) => {
        warn!(path = %path.display(), error = %err, "failed to parse config, using defaults");
        Self::default()
      }
    }
  }

  /// Resolve the backing data file path.
  pub fn data_file(&self) -> PathBuf {
    self.data_file.clone().unwrap_or_else(dirs::default_data_file)
  }
}
