//! Logging setup for CLI commands and the serve daemon.

use taskstore::config::Config;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Initialize logging for one-shot CLI commands (stderr only, so stdout
/// stays reserved for list output).
pub fn init_cli_logging() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()))
    .with_writer(std::io::stderr)
    .init();
}

/// Parse log level from config string.
fn parse_log_level(level: &str) -> tracing::Level {
  match level.to_lowercase().as_str() {
    "off" | "error" => tracing::Level::ERROR,
    "warn" => tracing::Level::WARN,
    "info" => tracing::Level::INFO,
    "debug" => tracing::Level::DEBUG,
    "trace" => tracing::Level::TRACE,
    _ => tracing::Level::INFO,
  }
}

/// Initialize logging for the serve command with config-driven settings.
///
/// Console with colors by default; with `to_file` a rolling file in the
/// data directory, rotated per the config.
///
/// Returns the guard that must be kept alive for the duration of the
/// program when file logging is active.
pub fn init_serve_logging(config: &Config, to_file: bool) -> Option<WorkerGuard> {
  let level = parse_log_level(&config.log_level);
  // RUST_LOG still wins over the config file.
  let env_filter = EnvFilter::builder().with_default_directive(level.into()).from_env_lossy();

  if !to_file {
    tracing_subscriber::fmt()
      .with_env_filter(env_filter)
      .with_target(true)
      .with_ansi(true)
      .init();
    return None;
  }

  let log_dir = taskstore::dirs::default_data_dir();
  if std::fs::create_dir_all(&log_dir).is_err() {
    init_cli_logging();
    return None;
  }

  let file_appender = match config.log_rotation.as_str() {
    "hourly" => tracing_appender::rolling::hourly(&log_dir, "taskstore.log"),
    "never" => tracing_appender::rolling::never(&log_dir, "taskstore.log"),
    _ => tracing_appender::rolling::daily(&log_dir, "taskstore.log"),
  };
  let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

  tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_target(true)
    .with_ansi(false)
    .with_writer(file_writer)
    .init();

  Some(guard)
}
