//! Test helpers for actor and admission-queue tests.

use axum::{body::Bytes, http::Method};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::actor::{
  StoreActor, StoreActorConfig, StoreHandle, StoreOp, StoreReply,
  admission::{AdmissionHandle, AdmissionQueue, InboundRequest, Outcome},
};

/// Spawn a store actor with default config and return its handle plus the
/// cancellation token that stops it.
pub fn spawn_store() -> (StoreHandle, CancellationToken) {
  let cancel = CancellationToken::new();
  let handle = StoreActor::spawn(StoreActorConfig::default(), cancel.clone());
  (handle, cancel)
}

/// Spawn the full admission stack: store actor plus admission worker.
pub fn spawn_stack() -> (AdmissionHandle, StoreHandle, CancellationToken, JoinHandle<()>) {
  let (store, cancel) = spawn_store();
  let (admission, join) = AdmissionQueue::spawn(store.clone(), 32);
  (admission, store, cancel, join)
}

pub async fn add(handle: &StoreHandle, owner: &str, text: &str) -> StoreReply {
  handle
    .request("test-add".into(), owner.into(), StoreOp::Add { text: text.into() })
    .await
    .expect("store actor alive")
}

pub async fn update(handle: &StoreHandle, owner: &str, text: &str, replace_with: &str) -> StoreReply {
  let op = StoreOp::Update {
    text: text.into(),
    replace_with: replace_with.into(),
  };
  handle
    .request("test-update".into(), owner.into(), op)
    .await
    .expect("store actor alive")
}

pub async fn delete(handle: &StoreHandle, owner: &str, text: &str) -> StoreReply {
  handle
    .request("test-delete".into(), owner.into(), StoreOp::Delete { text: text.into() })
    .await
    .expect("store actor alive")
}

pub async fn fetch(handle: &StoreHandle, owner: &str) -> StoreReply {
  handle
    .request("test-fetch".into(), owner.into(), StoreOp::Fetch)
    .await
    .expect("store actor alive")
}

/// Run one request through the admission queue.
pub async fn admit(admission: &AdmissionHandle, method: Method, owner: &str, body: &str) -> Outcome {
  let request = InboundRequest {
    request_id: "test-admit".into(),
    owner: owner.into(),
    method,
    body: Bytes::copy_from_slice(body.as_bytes()),
  };
  admission.admit(request).await.expect("admission worker alive")
}
