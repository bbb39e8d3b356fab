//! The request admission queue: one HTTP request at a time, system-wide.
//!
//! HTTP handler tasks run in parallel, but none of them touches the store
//! actor directly. Each handler packages its request (method, owner, raw
//! body) into an [`AdmissionJob`] and suspends on a single-use completion
//! channel. A dedicated worker drains the queue and runs the entire handler
//! sequence serially: decode body, validate, submit the store job, await
//! the reply, map it to a protocol-level [`Outcome`].
//!
//! This is a deliberate simplification trading throughput for correctness
//! by construction: with one admitted request in flight there are no
//! concurrent handler instances, even though the store is already
//! actor-protected.
//!
//! # Completion signaling
//!
//! Every admitted request receives exactly one completion, whichever branch
//! it takes (success, validation error, unsupported method). The worker
//! guarantees this structurally: `process` always returns an [`Outcome`],
//! and the loop performs the single send.

use std::collections::HashMap;

use axum::{body::Bytes, http::Method};
use tokio::{
  sync::{mpsc, oneshot},
  task::JoinHandle,
};
use tracing::{debug, info, warn};

use super::{
  handle::StoreHandle,
  message::{SendError, StoreOp, StoreReply},
};
use crate::store::{DisplayItem, StoreError};

// ============================================================================
// Requests and outcomes
// ============================================================================

/// An inbound network request, reduced to what the worker needs.
///
/// The request id and owner are explicit fields carried by value; the
/// worker never consults ambient request context.
#[derive(Debug)]
pub struct InboundRequest {
  /// Request id for correlation in logs (from `X-Request-ID` or generated).
  pub request_id: String,
  /// Owner identity, from the `uid` query parameter.
  pub owner: String,
  /// HTTP method; selects the operation.
  pub method: Method,
  /// Raw request body, decoded as JSON by the worker.
  pub body: Bytes,
}

/// Protocol-level result of an admitted request. The adapter translates
/// this into its own response encoding; the worker never sees HTTP types
/// beyond [`Method`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
  /// Fetched list, rendered with display ids.
  List(Vec<DisplayItem>),
  /// Mutation applied.
  Done,
  /// Add rejected: exact text already present.
  AlreadyExists,
  /// Update/Delete rejected: exact text absent.
  NotFound,
  /// Body failed to decode or required fields were missing.
  BadRequest(String),
  /// Method is not part of the contract.
  MethodNotAllowed,
  /// Store or actor failure the caller cannot fix.
  Internal(String),
}

/// One admitted request plus its single-use completion channel.
#[derive(Debug)]
pub struct AdmissionJob {
  pub request: InboundRequest,
  pub done: oneshot::Sender<Outcome>,
}

// ============================================================================
// Handle
// ============================================================================

/// Handle to the admission queue. Cheap to clone; one lives in the HTTP
/// server state. The worker exits once every handle is dropped and the
/// queue has drained, which is what sequences persistence after the last
/// in-flight request.
#[derive(Clone, Debug)]
pub struct AdmissionHandle {
  tx: mpsc::Sender<AdmissionJob>,
}

impl AdmissionHandle {
  /// Submit a request and wait for its completion signal.
  pub async fn admit(&self, request: InboundRequest) -> Result<Outcome, SendError> {
    let (done_tx, done_rx) = oneshot::channel();
    let job = AdmissionJob {
      request,
      done: done_tx,
    };
    self.tx.send(job).await.map_err(|_| SendError::ActorGone)?;
    done_rx.await.map_err(|_| SendError::ActorGone)
  }
}

// ============================================================================
// Worker
// ============================================================================

/// The admission worker task.
pub struct AdmissionQueue {
  store: StoreHandle,
  job_rx: mpsc::Receiver<AdmissionJob>,
}

impl AdmissionQueue {
  /// Spawn the worker and return its handle plus the task's join handle.
  ///
  /// The join handle lets the daemon await the drain: the worker finishes
  /// every queued request after the last [`AdmissionHandle`] is dropped,
  /// then exits.
  pub fn spawn(store: StoreHandle, queue_capacity: usize) -> (AdmissionHandle, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(queue_capacity);
    let worker = Self { store, job_rx: rx };
    let join = tokio::spawn(worker.run());
    (AdmissionHandle { tx }, join)
  }

  /// Drain the queue, one request at a time, until it closes.
  async fn run(mut self) {
    info!("admission queue started");

    while let Some(job) = self.job_rx.recv().await {
      let AdmissionJob { request, done } = job;
      debug!(
        request_id = %request.request_id,
        owner = %request.owner,
        method = %request.method,
        "admitting request"
      );

      let outcome = self.process(request).await;

      // Exactly one completion per admitted request, on every branch.
      if done.send(outcome).is_err() {
        warn!("caller gone before completion signal");
      }
    }

    info!("admission queue stopped (drained)");
  }

  /// Run one request end to end against the store actor.
  async fn process(&self, request: InboundRequest) -> Outcome {
    let InboundRequest {
      request_id,
      owner,
      method,
      body,
    } = request;

    let op = match method.as_str() {
      "GET" => StoreOp::Fetch,
      "POST" => {
        let fields = match decode_body(&body) {
          Ok(fields) => fields,
          Err(outcome) => return outcome,
        };
        match field(&fields, "item") {
          Some(text) => StoreOp::Add { text },
          None => return Outcome::BadRequest("missing field: item".into()),
        }
      }
      "PUT" => {
        let fields = match decode_body(&body) {
          Ok(fields) => fields,
          Err(outcome) => return outcome,
        };
        match (field(&fields, "item"), field(&fields, "replacewith")) {
          (Some(text), Some(replace_with)) => StoreOp::Update { text, replace_with },
          _ => return Outcome::BadRequest("missing field: item or replacewith".into()),
        }
      }
      "DELETE" => {
        let fields = match decode_body(&body) {
          Ok(fields) => fields,
          Err(outcome) => return outcome,
        };
        match field(&fields, "item") {
          Some(text) => StoreOp::Delete { text },
          None => return Outcome::BadRequest("missing field: item".into()),
        }
      }
      _ => {
        debug!(method = %method, "unsupported method");
        return Outcome::MethodNotAllowed;
      }
    };

    let fetch = matches!(op, StoreOp::Fetch);
    match self.store.request(request_id, owner, op).await {
      Ok(reply) => reply_to_outcome(reply, fetch),
      Err(SendError::ActorGone) => Outcome::Internal("store actor unavailable".into()),
    }
  }
}

/// Map a store reply to the protocol-level outcome.
fn reply_to_outcome(reply: StoreReply, fetch: bool) -> Outcome {
  match reply {
    Ok(snapshot) if fetch => Outcome::List(snapshot.display_items()),
    Ok(_) => Outcome::Done,
    Err(StoreError::AlreadyExists) => Outcome::AlreadyExists,
    Err(StoreError::NotFound) => Outcome::NotFound,
    Err(StoreError::Io(message)) => Outcome::Internal(message),
  }
}

/// Decode a request body as a flat JSON string map.
fn decode_body(body: &Bytes) -> Result<HashMap<String, String>, Outcome> {
  serde_json::from_slice(body).map_err(|err| Outcome::BadRequest(format!("error decoding body: {err}")))
}

/// Fetch a non-empty field from a decoded body.
fn field(fields: &HashMap<String, String>, name: &str) -> Option<String> {
  fields.get(name).filter(|value| !value.is_empty()).cloned()
}
