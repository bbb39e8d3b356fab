//! Tests for the store actor's one-at-a-time discipline.

use pretty_assertions::assert_eq;
use tokio::sync::oneshot;

use super::helpers::{add, delete, fetch, spawn_store, update};
use crate::{
  actor::{StoreJob, StoreOp},
  store::{DisplayItem, StoreError},
};

#[tokio::test]
async fn concurrent_producers_lose_no_updates() {
  let (handle, cancel) = spawn_store();

  let mut tasks = Vec::new();
  for producer in 0..8 {
    let handle = handle.clone();
    tasks.push(tokio::spawn(async move {
      for i in 0..25 {
        let text = format!("item-{producer}-{i}");
        add(&handle, "alice", &text).await.expect("add should succeed");
      }
    }));
  }
  for task in tasks {
    task.await.unwrap();
  }

  let snapshot = fetch(&handle, "alice").await.unwrap();
  assert_eq!(snapshot.len(), 200);

  // Display ids are a dense 1..N renumbering regardless of arrival order.
  let display = snapshot.display_items();
  let ids: Vec<usize> = display.iter().map(|item| item.id).collect();
  assert_eq!(ids, (1..=200).collect::<Vec<_>>());

  cancel.cancel();
}

#[tokio::test]
async fn jobs_apply_in_submission_order() {
  let (handle, cancel) = spawn_store();

  // Submit a whole sequence before reading any reply; the actor must
  // apply it in FIFO order for the replies to come out as asserted.
  let ops = vec![
    StoreOp::Add { text: "a".into() },
    StoreOp::Add { text: "a".into() },
    StoreOp::Update {
      text: "a".into(),
      replace_with: "b".into(),
    },
    StoreOp::Delete { text: "b".into() },
    StoreOp::Fetch,
  ];

  let mut replies = Vec::new();
  for op in ops {
    let (reply_tx, reply_rx) = oneshot::channel();
    let job = StoreJob {
      request_id: "fifo".into(),
      owner: "alice".into(),
      op,
      reply: reply_tx,
    };
    handle.tx.send(job).await.unwrap();
    replies.push(reply_rx);
  }

  let first = replies.remove(0).await.unwrap();
  assert!(first.is_ok());
  let second = replies.remove(0).await.unwrap();
  assert_eq!(second.unwrap_err(), StoreError::AlreadyExists);
  let third = replies.remove(0).await.unwrap();
  assert!(third.is_ok());
  let fourth = replies.remove(0).await.unwrap();
  assert!(fourth.is_ok());
  let last = replies.remove(0).await.unwrap().unwrap();
  assert!(last.is_empty());

  cancel.cancel();
}

#[tokio::test]
async fn rejected_operations_leave_state_unchanged() {
  let (handle, cancel) = spawn_store();

  add(&handle, "alice", "buy milk").await.unwrap();
  let before = fetch(&handle, "alice").await.unwrap();

  assert_eq!(
    add(&handle, "alice", "buy milk").await.unwrap_err(),
    StoreError::AlreadyExists
  );
  assert_eq!(
    update(&handle, "alice", "missing", "x").await.unwrap_err(),
    StoreError::NotFound
  );
  assert_eq!(delete(&handle, "alice", "missing").await.unwrap_err(), StoreError::NotFound);

  let after = fetch(&handle, "alice").await.unwrap();
  assert_eq!(before, after);
  assert_eq!(after.display_items(), vec![DisplayItem { id: 1, text: "buy milk".into() }]);

  cancel.cancel();
}

#[tokio::test]
async fn delete_star_empties_only_that_owner() {
  let (handle, cancel) = spawn_store();

  add(&handle, "alice", "a").await.unwrap();
  add(&handle, "alice", "b").await.unwrap();
  add(&handle, "bob", "c").await.unwrap();

  let cleared = delete(&handle, "alice", "*").await.unwrap();
  assert!(cleared.is_empty());
  assert_eq!(fetch(&handle, "bob").await.unwrap().len(), 1);

  cancel.cancel();
}

#[tokio::test]
async fn deletion_renumbers_display_ids() {
  let (handle, cancel) = spawn_store();

  add(&handle, "alice", "a").await.unwrap();
  add(&handle, "alice", "b").await.unwrap();
  delete(&handle, "alice", "a").await.unwrap();

  let snapshot = fetch(&handle, "alice").await.unwrap();
  assert_eq!(snapshot.display_items(), vec![DisplayItem { id: 1, text: "b".into() }]);

  cancel.cancel();
}

#[tokio::test]
async fn load_failure_is_forwarded_verbatim() {
  let (handle, cancel) = spawn_store();

  // A directory path cannot be read as a file.
  let dir = tempfile::tempdir().unwrap();
  let reply = handle
    .request(
      "test-load".into(),
      String::new(),
      StoreOp::Load {
        path: dir.path().to_path_buf(),
      },
    )
    .await
    .unwrap();

  assert!(matches!(reply, Err(StoreError::Io(_))));

  cancel.cancel();
}

#[tokio::test]
async fn cancelled_actor_reports_actor_gone() {
  let (handle, cancel) = spawn_store();
  cancel.cancel();

  // The actor observes cancellation asynchronously; poll until the queue
  // is rejected.
  let deadline = std::time::Instant::now() + std::time::Duration::from_secs(2);
  loop {
    if fetch_raw(&handle, "alice").await.is_err() {
      break;
    }
    assert!(std::time::Instant::now() < deadline, "actor never shut down");
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
  }
}

async fn fetch_raw(
  handle: &crate::actor::StoreHandle,
  owner: &str,
) -> Result<crate::actor::StoreReply, crate::actor::SendError> {
  handle.request("test-fetch".into(), owner.into(), StoreOp::Fetch).await
}
