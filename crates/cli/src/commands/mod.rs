//! CLI command implementations.
//!
//! The one-shot commands run the whole lifecycle in-process: spawn the
//! store actor, load the backing file, perform the operation, render the
//! list, persist, exit. The HTTP adapter is not involved; the commands are
//! just another producer on the actor's job queue.

mod ops;
mod repl;
mod serve;

pub use ops::{cmd_add, cmd_delete, cmd_list, cmd_update};
pub use repl::cmd_repl;
pub use serve::cmd_serve;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use taskstore::{
  actor::{StoreActor, StoreActorConfig, StoreHandle, StoreOp, StoreReply},
  config::Config,
};
use tokio_util::sync::CancellationToken;
use tracing::error;

/// Mint a request id for log correlation, one per submitted job.
pub(crate) fn new_request_id() -> String {
  uuid::Uuid::new_v4().to_string()
}

/// An in-process store session: actor spawned, backing file loaded.
///
/// Dropping without [`Session::finish`] skips persistence, which is what
/// error paths that never mutated want anyway.
pub(crate) struct Session {
  pub store: StoreHandle,
  data_file: PathBuf,
  cancel: CancellationToken,
}

impl Session {
  /// Spawn the actor and load the backing file. A load failure is fatal:
  /// operating on a silently empty store would look like data loss.
  pub async fn start() -> Result<Self> {
    let config = Config::load().await;
    let data_file = config.data_file();

    let cancel = CancellationToken::new();
    let store = StoreActor::spawn(
      StoreActorConfig {
        queue_capacity: config.job_queue_capacity,
      },
      cancel.clone(),
    );

    let loaded = store
      .request(new_request_id(), String::new(), StoreOp::Load {
        path: data_file.clone(),
      })
      .await
      .context("store actor unavailable")?;
    loaded.map_err(|err| anyhow!("could not load todo list from {}: {err}", data_file.display()))?;

    Ok(Self {
      store,
      data_file,
      cancel,
    })
  }

  /// Submit one operation for `uid` and wait for the store's verdict.
  pub async fn request(&self, uid: &str, op: StoreOp) -> Result<StoreReply> {
    self
      .store
      .request(new_request_id(), uid.to_string(), op)
      .await
      .context("store actor unavailable")
  }

  /// Persist the store and stop the actor.
  pub async fn finish(self) -> Result<()> {
    let result = self
      .store
      .request(new_request_id(), String::new(), StoreOp::Persist {
        path: self.data_file.clone(),
      })
      .await;
    self.cancel.cancel();

    match result {
      Ok(Ok(_)) => Ok(()),
      Ok(Err(err)) => {
        error!(error = %err, data_file = %self.data_file.display(), "could not save todo list");
        Err(anyhow!("could not save todo list: {err}"))
      }
      Err(err) => Err(anyhow!("store actor gone before save: {err}")),
    }
  }
}
