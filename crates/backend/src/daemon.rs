//! Daemon lifecycle for the `serve` command.
//!
//! # Architecture
//!
//! ```text
//! Daemon (supervisor)
//!   ├── Server (axum listener, spawns connection tasks)
//!   ├── AdmissionQueue (one inbound request at a time)
//!   └── StoreActor (owns the store, one job at a time)
//! ```
//!
//! # Lifecycle
//!
//! 1. Create the master `CancellationToken`
//! 2. Spawn the store actor and submit the startup `Load` (failure is
//!    fatal: the process must not serve a silently empty store)
//! 3. Spawn the admission worker, then run the server until ctrl-c or
//!    `GET /shutdown` fires the token
//! 4. Drain: the server drop closes the admission queue; await the worker
//!    so every admitted request finishes
//! 5. Submit `Persist`; a failure here is logged, never blocks exit

use std::path::PathBuf;

use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::{
  actor::{SendError, StoreActor, StoreActorConfig, StoreOp, admission::AdmissionQueue},
  config::Config,
  server::{Server, ServerConfig},
  store::StoreError,
};

/// Errors that abort daemon startup.
#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
  #[error("failed to load backing file: {0}")]
  Load(StoreError),
  #[error("store actor unavailable: {0}")]
  Actor(#[from] SendError),
  #[error("server error: {0}")]
  Io(#[from] std::io::Error),
}

// ============================================================================
// Configuration
// ============================================================================

/// Daemon runtime configuration, from the config file with CLI overrides.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
  /// Port the HTTP server listens on.
  pub port: u16,
  /// Backing text file, loaded at startup and rewritten at shutdown.
  pub data_file: PathBuf,
  /// Full configuration (queue capacities, logging).
  pub config: Config,
}

// ============================================================================
// Daemon
// ============================================================================

/// The taskstore daemon: supervises the actor, the admission queue, and the
/// HTTP server, and owns the load-on-start / persist-on-shutdown cycle.
pub struct Daemon {
  runtime_config: RuntimeConfig,
}

impl Daemon {
  pub fn new(runtime_config: RuntimeConfig) -> Self {
    Self { runtime_config }
  }

  /// Run the daemon, blocking until shutdown.
  pub async fn run(self) -> Result<(), DaemonError> {
    let RuntimeConfig {
      port,
      data_file,
      config,
    } = self.runtime_config;

    info!(port, data_file = %data_file.display(), "starting taskstore daemon");

    // Master cancellation token for the serving side (server + signal).
    let cancel = CancellationToken::new();

    // The actor outlives the master token on purpose: it must still be
    // alive for the shutdown persist after the server has stopped.
    let actor_cancel = CancellationToken::new();
    let store = StoreActor::spawn(
      StoreActorConfig {
        queue_capacity: config.job_queue_capacity,
      },
      actor_cancel.clone(),
    );

    // Startup load is fatal on error; serving a half-initialized store
    // would silently look like an empty one.
    let loaded = store
      .request("startup-load".into(), String::new(), StoreOp::Load {
        path: data_file.clone(),
      })
      .await?;
    if let Err(err) = loaded {
      error!(error = %err, "failed to load backing file, aborting");
      return Err(DaemonError::Load(err));
    }

    let (admission, admission_join) = AdmissionQueue::spawn(store.clone(), config.admission_queue_capacity);

    // Handle ctrl-c gracefully.
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
      if let Err(e) = signal::ctrl_c().await {
        warn!("failed to listen for ctrl-c: {}", e);
        return;
      }
      info!("received ctrl-c, shutting down...");
      cancel_for_signal.cancel();
    });

    // The server state holds the only admission handle; when run returns
    // the queue closes and the worker drains.
    let server = Server::new(ServerConfig {
      port,
      admission,
      cancel: cancel.clone(),
    });
    server.run().await?;

    info!("shutting down...");
    if let Err(e) = admission_join.await {
      warn!(error = %e, "admission worker ended abnormally");
    }

    // Persist failures are logged only; they must not prevent exit.
    match store
      .request("shutdown-persist".into(), String::new(), StoreOp::Persist {
        path: data_file.clone(),
      })
      .await
    {
      Ok(Ok(_)) => info!(data_file = %data_file.display(), "persisted store"),
      Ok(Err(err)) => error!(error = %err, "failed to persist store on shutdown"),
      Err(err) => error!(error = %err, "store actor gone before shutdown persist"),
    }

    actor_cancel.cancel();
    info!("daemon shutdown complete");
    Ok(())
  }
}
