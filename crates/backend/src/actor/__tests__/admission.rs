//! Tests for the request admission queue.

use std::time::Duration;

use axum::http::Method;
use pretty_assertions::assert_eq;
use tokio::time::timeout;

use super::helpers::{admit, spawn_stack};
use crate::{actor::admission::Outcome, store::DisplayItem};

#[tokio::test]
async fn get_renders_display_list() {
  let (admission, _store, cancel, _join) = spawn_stack();

  admit(&admission, Method::POST, "alice", r#"{"item":"a"}"#).await;
  admit(&admission, Method::POST, "alice", r#"{"item":"b"}"#).await;

  let outcome = admit(&admission, Method::GET, "alice", "").await;
  assert_eq!(
    outcome,
    Outcome::List(vec![
      DisplayItem { id: 1, text: "a".into() },
      DisplayItem { id: 2, text: "b".into() },
    ])
  );

  cancel.cancel();
}

#[tokio::test]
async fn duplicate_add_reports_already_exists() {
  let (admission, _store, cancel, _join) = spawn_stack();

  let first = admit(&admission, Method::POST, "alice", r#"{"item":"buy milk"}"#).await;
  assert_eq!(first, Outcome::Done);

  let second = admit(&admission, Method::POST, "alice", r#"{"item":"buy milk"}"#).await;
  assert_eq!(second, Outcome::AlreadyExists);

  // State unchanged after the rejection.
  let outcome = admit(&admission, Method::GET, "alice", "").await;
  assert_eq!(outcome, Outcome::List(vec![DisplayItem { id: 1, text: "buy milk".into() }]));

  cancel.cancel();
}

#[tokio::test]
async fn update_and_delete_report_not_found() {
  let (admission, _store, cancel, _join) = spawn_stack();

  let update = admit(
    &admission,
    Method::PUT,
    "alice",
    r#"{"item":"missing","replacewith":"x"}"#,
  )
  .await;
  assert_eq!(update, Outcome::NotFound);

  let delete = admit(&admission, Method::DELETE, "alice", r#"{"item":"missing"}"#).await;
  assert_eq!(delete, Outcome::NotFound);

  cancel.cancel();
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
  let (admission, _store, cancel, _join) = spawn_stack();

  let outcome = admit(&admission, Method::POST, "alice", "not json").await;
  assert!(matches!(outcome, Outcome::BadRequest(_)));

  cancel.cancel();
}

#[tokio::test]
async fn missing_fields_are_bad_requests() {
  let (admission, _store, cancel, _join) = spawn_stack();

  let no_item = admit(&admission, Method::POST, "alice", r#"{}"#).await;
  assert!(matches!(no_item, Outcome::BadRequest(_)));

  let empty_replace = admit(&admission, Method::PUT, "alice", r#"{"item":"a","replacewith":""}"#).await;
  assert!(matches!(empty_replace, Outcome::BadRequest(_)));

  cancel.cancel();
}

#[tokio::test]
async fn unsupported_method_is_rejected() {
  let (admission, _store, cancel, _join) = spawn_stack();

  let outcome = admit(&admission, Method::PATCH, "alice", "").await;
  assert_eq!(outcome, Outcome::MethodNotAllowed);

  cancel.cancel();
}

#[tokio::test]
async fn every_branch_signals_completion_exactly_once() {
  let (admission, _store, cancel, _join) = spawn_stack();

  // Each admit call returns iff the worker fired the single completion
  // signal for that request; a missed branch would hang here.
  let branches = [
    (Method::POST, r#"{"item":"a"}"#),
    (Method::POST, r#"{"item":"a"}"#), // AlreadyExists
    (Method::PUT, r#"{"item":"a","replacewith":"b"}"#),
    (Method::DELETE, r#"{"item":"missing"}"#), // NotFound
    (Method::GET, ""),
    (Method::POST, "garbage"),  // BadRequest
    (Method::PATCH, ""),        // MethodNotAllowed
  ];

  for (method, body) in branches {
    let result = timeout(Duration::from_secs(2), admit(&admission, method.clone(), "alice", body)).await;
    assert!(result.is_ok(), "admission never signalled completion for {method}");
  }

  cancel.cancel();
}

#[tokio::test]
async fn star_delete_through_admission_clears_owner() {
  let (admission, _store, cancel, _join) = spawn_stack();

  admit(&admission, Method::POST, "alice", r#"{"item":"a"}"#).await;
  admit(&admission, Method::POST, "bob", r#"{"item":"b"}"#).await;

  let outcome = admit(&admission, Method::DELETE, "alice", r#"{"item":"*"}"#).await;
  assert_eq!(outcome, Outcome::Done);

  assert_eq!(admit(&admission, Method::GET, "alice", "").await, Outcome::List(vec![]));
  assert_eq!(
    admit(&admission, Method::GET, "bob", "").await,
    Outcome::List(vec![DisplayItem { id: 1, text: "b".into() }])
  );

  cancel.cancel();
}

#[tokio::test]
async fn worker_drains_queue_after_handles_drop() {
  let (admission, _store, cancel, join) = spawn_stack();

  admit(&admission, Method::POST, "alice", r#"{"item":"a"}"#).await;
  drop(admission);

  // With every handle gone the worker must finish and exit on its own.
  timeout(Duration::from_secs(2), join)
    .await
    .expect("worker should exit once the queue drains")
    .unwrap();

  cancel.cancel();
}

#[tokio::test]
async fn concurrent_admissions_all_complete() {
  let (admission, _store, cancel, _join) = spawn_stack();

  let mut tasks = Vec::new();
  for i in 0..32 {
    let admission = admission.clone();
    tasks.push(tokio::spawn(async move {
      let body = format!(r#"{{"item":"item-{i}"}}"#);
      admit(&admission, Method::POST, "alice", &body).await
    }));
  }
  for task in tasks {
    assert_eq!(task.await.unwrap(), Outcome::Done);
  }

  let Outcome::List(items) = admit(&admission, Method::GET, "alice", "").await else {
    panic!("expected list outcome");
  };
  assert_eq!(items.len(), 32);

  cancel.cancel();
}
