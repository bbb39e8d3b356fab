//! Job types for the store actor.
//!
//! Every operation against the store travels as a [`StoreJob`]: the
//! operation, the owner it targets, a request id for log correlation, and a
//! dedicated single-use reply channel. A job is submitted exactly once and
//! receives exactly one reply; dropping the reply sender (actor death)
//! surfaces to the caller as [`SendError::ActorGone`].
//!
//! The request id is an explicit field, passed by value, never looked up
//! from ambient context.

use std::path::PathBuf;

use tokio::sync::oneshot;

use crate::store::{ListSnapshot, StoreError};

/// Unique identifier for a request (for correlation in logs).
pub type RequestId = String;

/// The operation a job asks the actor to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
  /// Merge the backing file at `path` into the store. Submitted once at
  /// startup; an error here is fatal to the process.
  Load { path: PathBuf },
  /// Snapshot the owner's current list.
  Fetch,
  /// Append an item, rejecting exact-text duplicates.
  Add { text: String },
  /// Replace the text of the item currently reading `text`.
  Update { text: String, replace_with: String },
  /// Remove the item reading `text`; `"*"` clears the owner's list.
  Delete { text: String },
  /// Write the whole store to the backing file at `path`. Submitted on
  /// graceful shutdown; an error here is logged, not fatal.
  Persist { path: PathBuf },
}

/// What comes back on a job's reply channel: the owner's updated snapshot,
/// or the store error forwarded verbatim.
pub type StoreReply = Result<ListSnapshot, StoreError>;

/// A single operation request plus its reply channel.
#[derive(Debug)]
pub struct StoreJob {
  /// Request id for correlation in logs.
  pub request_id: RequestId,
  /// The owner identity the operation applies to.
  pub owner: String,
  /// The operation to perform.
  pub op: StoreOp,
  /// Single-use reply channel, consumed by exactly one waiting caller.
  pub reply: oneshot::Sender<StoreReply>,
}

/// Error when submitting a job to the actor.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SendError {
  #[error("store actor has shut down")]
  ActorGone,
}
