//! One-shot commands: add, update, delete, list.
//!
//! Each command mirrors the implicit list-at-exit behavior: after a
//! successful operation the updated list is rendered before persisting.

use anyhow::{Result, bail};
use taskstore::actor::StoreOp;

use super::Session;
use crate::format::print_list;

pub async fn cmd_add(uid: &str, text: &str) -> Result<()> {
  run_mutation(uid, "add", StoreOp::Add { text: text.to_string() }).await
}

pub async fn cmd_update(uid: &str, text: &str, replace_with: &str) -> Result<()> {
  let op = StoreOp::Update {
    text: text.to_string(),
    replace_with: replace_with.to_string(),
  };
  run_mutation(uid, "update", op).await
}

pub async fn cmd_delete(uid: &str, text: &str) -> Result<()> {
  run_mutation(uid, "delete", StoreOp::Delete { text: text.to_string() }).await
}

pub async fn cmd_list(uid: &str, json: bool) -> Result<()> {
  let session = Session::start().await?;
  let snapshot = session.request(uid, StoreOp::Fetch).await?.unwrap_or_default();
  if json {
    println!("{}", serde_json::to_string_pretty(&snapshot.display_items())?);
  } else {
    print_list(uid, &snapshot);
  }
  session.finish().await
}

async fn run_mutation(uid: &str, verb: &str, op: StoreOp) -> Result<()> {
  let session = Session::start().await?;

  if let Err(err) = session.request(uid, op).await? {
    // Nothing mutated; skip the persist and report the rejection.
    bail!("could not {verb}: {err}");
  }

  let snapshot = session.request(uid, StoreOp::Fetch).await?.unwrap_or_default();
  print_list(uid, &snapshot);
  session.finish().await
}
