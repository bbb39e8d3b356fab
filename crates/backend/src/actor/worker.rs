//! The store actor: a single serializing worker that owns the store.
//!
//! The actor drains a bounded FIFO queue of [`StoreJob`]s and applies each
//! operation against the store before reading the next. This total ordering
//! is the core correctness property: no two mutations ever interleave, and
//! every fetch observes a fully applied prior mutation sequence. The store
//! itself needs no locking because it never leaves this task.
//!
//! # Lifecycle
//!
//! The actor runs until one of:
//! - The `CancellationToken` is triggered
//! - The job queue is closed (all handles dropped)
//!
//! Jobs are processed in submission order; there is no reordering, no
//! priority, and no retry. Store errors are forwarded verbatim on the
//! job's reply channel.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::{
  handle::StoreHandle,
  message::{StoreJob, StoreOp},
};
use crate::store::{ListSnapshot, Store, persist};

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for the store actor.
#[derive(Debug, Clone)]
pub struct StoreActorConfig {
  /// Capacity of the job queue. Producers suspend once it is full.
  pub queue_capacity: usize,
}

impl Default for StoreActorConfig {
  fn default() -> Self {
    Self { queue_capacity: 100 }
  }
}

// ============================================================================
// StoreActor
// ============================================================================

/// The single-consumer worker that serializes all store access.
pub struct StoreActor {
  store: Store,
  job_rx: mpsc::Receiver<StoreJob>,
  cancel: CancellationToken,
}

impl StoreActor {
  /// Spawn the actor and return a handle for submitting jobs.
  pub fn spawn(config: StoreActorConfig, cancel: CancellationToken) -> StoreHandle {
    let (tx, rx) = mpsc::channel(config.queue_capacity);

    let actor = Self {
      store: Store::new(),
      job_rx: rx,
      cancel,
    };
    tokio::spawn(actor.run());

    StoreHandle::new(tx)
  }

  /// Main actor event loop: one job at a time, FIFO.
  async fn run(mut self) {
    info!("store actor started");

    loop {
      tokio::select! {
        biased;

        _ = self.cancel.cancelled() => {
          info!("store actor shutting down (cancelled)");
          break;
        }

        job = self.job_rx.recv() => {
          match job {
            Some(job) => self.handle_job(job).await,
            None => {
              info!("store actor shutting down (queue closed)");
              break;
            }
          }
        }
      }
    }

    info!("store actor stopped");
  }

  /// Dispatch one job to the store and send its single reply.
  async fn handle_job(&mut self, job: StoreJob) {
    let StoreJob {
      request_id,
      owner,
      op,
      reply,
    } = job;
    debug!(request_id = %request_id, owner = %owner, op = op_name(&op), "processing job");

    let result = match op {
      StoreOp::Load { path } => persist::load(&mut self.store, &path)
        .await
        .map(|()| self.store.fetch(&owner)),
      StoreOp::Fetch => Ok(self.store.fetch(&owner)),
      StoreOp::Add { text } => self.store.add(&owner, text),
      StoreOp::Update { text, replace_with } => self.store.update(&owner, &text, replace_with),
      StoreOp::Delete { text } => self.store.delete(&owner, &text),
      StoreOp::Persist { path } => persist::persist(&self.store, &path)
        .await
        .map(|()| ListSnapshot::default()),
    };

    if let Err(ref err) = result {
      debug!(request_id = %request_id, error = %err, "job failed");
    }

    // A oneshot send never blocks; a caller that went away just drops the
    // reply on the floor.
    if reply.send(result).is_err() {
      debug!(request_id = %request_id, "caller gone before reply");
    }
  }
}

fn op_name(op: &StoreOp) -> &'static str {
  match op {
    StoreOp::Load { .. } => "load",
    StoreOp::Fetch => "fetch",
    StoreOp::Add { .. } => "add",
    StoreOp::Update { .. } => "update",
    StoreOp::Delete { .. } => "delete",
    StoreOp::Persist { .. } => "persist",
  }
}
