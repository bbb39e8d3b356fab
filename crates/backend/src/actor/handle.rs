//! Handle for communicating with the store actor.
//!
//! Handles are cheap to clone and can be shared across tasks. Each request
//! creates a fresh oneshot reply channel, so an abandoned caller can never
//! block the actor: the actor's send into a oneshot always completes
//! immediately, read or not.

use tokio::sync::{mpsc, oneshot};

use super::message::{RequestId, SendError, StoreJob, StoreOp, StoreReply};

/// Handle to the store actor's job queue.
///
/// The queue is bounded; `request` suspends while it is full, which is the
/// backpressure mechanism for producers.
#[derive(Clone, Debug)]
pub struct StoreHandle {
  pub tx: mpsc::Sender<StoreJob>,
}

impl StoreHandle {
  /// Create a new handle from a sender.
  pub fn new(tx: mpsc::Sender<StoreJob>) -> Self {
    Self { tx }
  }

  /// Submit a job and wait for its single reply.
  ///
  /// The outer `Result` is the transport: `ActorGone` when the actor has
  /// stopped (queue closed, or actor dropped the reply sender). The inner
  /// [`StoreReply`] is the store's own verdict, forwarded verbatim.
  pub async fn request(&self, request_id: RequestId, owner: String, op: StoreOp) -> Result<StoreReply, SendError> {
    let (reply_tx, reply_rx) = oneshot::channel();
    let job = StoreJob {
      request_id,
      owner,
      op,
      reply: reply_tx,
    };
    self.tx.send(job).await.map_err(|_| SendError::ActorGone)?;
    reply_rx.await.map_err(|_| SendError::ActorGone)
  }
}
