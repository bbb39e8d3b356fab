//! Default filesystem locations.

/// Get the default base path for taskstore data.
///
/// Respects the following environment variables (in order of precedence):
/// 1. TASKSTORE_DATA_DIR - explicit data directory override
/// 2. XDG_DATA_HOME - standard XDG data home directory
/// 3. dirs::data_local_dir() - platform default
pub fn default_data_dir() -> std::path::PathBuf {
  if let Ok(dir) = std::env::var("TASKSTORE_DATA_DIR") {
    return std::path::PathBuf::from(dir);
  }

  if let Ok(xdg_data) = std::env::var("XDG_DATA_HOME") {
    return std::path::PathBuf::from(xdg_data).join("taskstore");
  }

  dirs::data_local_dir()
    .unwrap_or_else(|| std::path::PathBuf::from("."))
    .join("taskstore")
}

/// Get the default backing data file.
pub fn default_data_file() -> std::path::PathBuf {
  default_data_dir().join("todo.txt")
}

/// Get the default config file path.
///
/// Respects the following environment variables (in order of precedence):
/// 1. TASKSTORE_CONFIG - explicit config file override
/// 2. XDG_CONFIG_HOME - standard XDG config home directory
/// 3. dirs::config_dir() - platform default
pub fn default_config_path() -> std::path::PathBuf {
  if let Ok(path) = std::env::var("TASKSTORE_CONFIG") {
    return std::path::PathBuf::from(path);
  }

  if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
    return std::path::PathBuf::from(xdg_config).join("taskstore").join("config.toml");
  }

  dirs::config_dir()
    .unwrap_or_else(|| std::path::PathBuf::from("."))
    .join("taskstore")
    .join("config.toml")
}
