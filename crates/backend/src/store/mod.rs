//! The in-memory multi-owner todo store.
//!
//! The store maps an owner identity to an ordered list of text items, each
//! keyed by a storage id. It is plain mutable state with no internal
//! locking: mutual exclusion comes from routing every operation through the
//! single [`StoreActor`](crate::actor::StoreActor) task that owns it.
//!
//! # Two numbering schemes
//!
//! Items carry two kinds of number:
//!
//! - **Storage id**: assigned at insert time as `max existing id + 1` (or 1
//!   for an empty list). Monotonic per owner for the life of the process,
//!   not contiguous after deletions, and the key used for allocation and
//!   ordering.
//! - **Display id**: a dense 1..N renumbering in ascending storage-id
//!   order, recomputed on every read. Purely presentational, never stored.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

pub mod persist;

// ============================================================================
// Errors
// ============================================================================

/// Errors produced by store operations.
///
/// All three variants are recoverable at the adapter boundary. `Io` is fatal
/// only when it occurs during the startup load.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum StoreError {
  #[error("not found")]
  NotFound,
  #[error("already exists")]
  AlreadyExists,
  #[error("io error: {0}")]
  Io(String),
}

impl From<std::io::Error> for StoreError {
  fn from(err: std::io::Error) -> Self {
    StoreError::Io(err.to_string())
  }
}

// ============================================================================
// Items and snapshots
// ============================================================================

/// An item as rendered to a caller: display id plus text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayItem {
  pub id: usize,
  pub text: String,
}

/// A point-in-time copy of one owner's list, in ascending storage-id order.
///
/// Snapshots are what the actor sends back on reply channels; the owner's
/// live list never leaves the actor task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListSnapshot {
  entries: Vec<(u64, String)>,
}

impl ListSnapshot {
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Iterate over `(storage_id, text)` pairs in ascending storage-id order.
  pub fn entries(&self) -> impl Iterator<Item = (u64, &str)> {
    self.entries.iter().map(|(id, text)| (*id, text.as_str()))
  }

  /// Render the snapshot with display ids: a dense 1..N renumbering in
  /// ascending storage-id order, recomputed on every call.
  pub fn display_items(&self) -> Vec<DisplayItem> {
    self
      .entries
      .iter()
      .enumerate()
      .map(|(index, (_, text))| DisplayItem {
        id: index + 1,
        text: text.clone(),
      })
      .collect()
  }
}

// ============================================================================
// Store
// ============================================================================

/// One owner's list: storage id -> item text.
///
/// A `BTreeMap` keeps iteration in ascending storage-id order, which is the
/// order both display renumbering and persistence rely on.
pub type UserList = BTreeMap<u64, String>;

/// The process-wide store: owner identity -> [`UserList`].
///
/// A lookup for an unknown owner behaves as an empty list; the entry is
/// created lazily on first mutation and is skipped by persistence while it
/// holds no items.
#[derive(Debug, Default)]
pub struct Store {
  lists: HashMap<String, UserList>,
}

impl Store {
  pub fn new() -> Self {
    Self::default()
  }

  /// Snapshot the current list for `owner`. Empty if the owner is unknown.
  pub fn fetch(&self, owner: &str) -> ListSnapshot {
    let entries = self
      .lists
      .get(owner)
      .map(|list| list.iter().map(|(id, text)| (*id, text.clone())).collect())
      .unwrap_or_default();
    ListSnapshot { entries }
  }

  /// Add `text` to `owner`'s list under a freshly allocated storage id.
  ///
  /// Fails with [`StoreError::AlreadyExists`] when the exact text is
  /// already present; the store is unchanged on failure.
  pub fn add(&mut self, owner: &str, text: String) -> Result<ListSnapshot, StoreError> {
    let list = self.lists.entry(owner.to_string()).or_default();
    if find_by_text(list, &text).is_some() {
      return Err(StoreError::AlreadyExists);
    }
    let id = next_id(list);
    list.insert(id, text);
    Ok(self.fetch(owner))
  }

  /// Replace the text of the item currently reading `text` with
  /// `replace_with`. The storage id is unchanged.
  ///
  /// Items are addressed by exact text, not display id. When the list holds
  /// duplicate texts (reachable only via a persisted file, never via
  /// `add`), the entry with the lowest storage id is the one updated.
  pub fn update(&mut self, owner: &str, text: &str, replace_with: String) -> Result<ListSnapshot, StoreError> {
    let list = self.lists.entry(owner.to_string()).or_default();
    let Some(id) = find_by_text(list, text) else {
      return Err(StoreError::NotFound);
    };
    list.insert(id, replace_with);
    Ok(self.fetch(owner))
  }

  /// Remove the item reading `text` from `owner`'s list.
  ///
  /// `"*"` clears the whole list, which also restarts id allocation at 1.
  /// Duplicate texts are resolved as in [`Store::update`]: lowest storage
  /// id wins.
  pub fn delete(&mut self, owner: &str, text: &str) -> Result<ListSnapshot, StoreError> {
    let list = self.lists.entry(owner.to_string()).or_default();
    if text == "*" {
      list.clear();
      return Ok(self.fetch(owner));
    }
    let Some(id) = find_by_text(list, text) else {
      return Err(StoreError::NotFound);
    };
    list.remove(&id);
    Ok(self.fetch(owner))
  }

  /// Insert `text` for `owner` under a fresh storage id without the
  /// duplicate check. Used by [`persist::load`], which must tolerate
  /// duplicate lines in the backing file.
  pub(crate) fn insert_unchecked(&mut self, owner: &str, text: String) {
    let list = self.lists.entry(owner.to_string()).or_default();
    let id = next_id(list);
    list.insert(id, text);
  }

  /// Iterate over `(owner, list)` pairs. Owner order is unspecified; order
  /// within a list is ascending storage id.
  pub(crate) fn owners(&self) -> impl Iterator<Item = (&str, &UserList)> {
    self.lists.iter().map(|(owner, list)| (owner.as_str(), list))
  }
}

/// Allocate the next storage id for a list: max existing id + 1, or 1 when
/// the list is empty.
fn next_id(list: &UserList) -> u64 {
  list.keys().next_back().map_or(1, |max| max + 1)
}

/// Find the storage id of the first item with exactly `text`, scanning in
/// ascending id order.
fn find_by_text(list: &UserList, text: &str) -> Option<u64> {
  list.iter().find(|(_, item)| item.as_str() == text).map(|(id, _)| *id)
}

// ============================================================================
// Tests
// ============================================================================
