//! The serve command: run the HTTP daemon.

use anyhow::Result;
use taskstore::{Daemon, RuntimeConfig, config::Config};

pub async fn cmd_serve(config: Config, port: Option<u16>) -> Result<()> {
  let runtime_config = RuntimeConfig {
    port: port.unwrap_or(config.port),
    data_file: config.data_file(),
    config,
  };

  Daemon::new(runtime_config).run().await?;
  Ok(())
}
