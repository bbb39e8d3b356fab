//! Loading and persisting the backing text file.
//!
//! The format is newline-delimited `owner,text` records. Commas and
//! backslashes inside either field are escaped as `\,` and `\\` so that a
//! comma in item text survives a round trip; the record separator is the
//! first unescaped comma. Blank lines and lines without a separator are
//! silently skipped on load.
//!
//! Persistence is deliberately simple: the file is rewritten in place with
//! no atomic replace, so a write failure can leave a partial file behind.

use std::path::Path;

use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::{Store, StoreError};

/// Read `path` into `store`, creating the file if it does not exist.
///
/// Each well-formed record gets a fresh storage id via the normal
/// allocation rule. Duplicate texts in the file are kept as-is; the
/// duplicate check applies only to `add`.
pub async fn load(store: &mut Store, path: &Path) -> Result<(), StoreError> {
  let contents = match tokio::fs::read_to_string(path).await {
    Ok(contents) => contents,
    Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
      // First run: create an empty backing file so later persistence
      // failures surface as write errors, not missing directories.
      if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
      }
      tokio::fs::File::create(path).await?;
      String::new()
    }
    Err(err) => return Err(err.into()),
  };

  let mut loaded = 0usize;
  let mut skipped = 0usize;
  for line in contents.lines() {
    if line.is_empty() {
      continue;
    }
    match split_record(line) {
      Some((owner, text)) => {
        store.insert_unchecked(&owner, text);
        loaded += 1;
      }
      None => {
        skipped += 1;
      }
    }
  }

  if skipped > 0 {
    warn!(path = %path.display(), skipped, "skipped malformed records while loading");
  }
  debug!(path = %path.display(), loaded, "loaded backing file");
  Ok(())
}

/// Write every owner's items to `path` as `owner,text` lines, ascending by
/// storage id within each owner. Owners with no items are skipped.
pub async fn persist(store: &Store, path: &Path) -> Result<(), StoreError> {
  let mut file = tokio::fs::File::create(path).await?;
  let mut written = 0usize;

  for (owner, list) in store.owners() {
    for text in list.values() {
      let line = format!("{},{}\n", escape(owner), escape(text));
      file.write_all(line.as_bytes()).await?;
      written += 1;
    }
  }

  file.flush().await?;
  debug!(path = %path.display(), written, "persisted backing file");
  Ok(())
}

/// Escape backslashes and commas so a field can hold either literally.
fn escape(field: &str) -> String {
  let mut out = String::with_capacity(field.len());
  for c in field.chars() {
    match c {
      '\\' => out.push_str("\\\\"),
      ',' => out.push_str("\\,"),
      c => out.push(c),
    }
  }
  out
}

/// Split a record at the first unescaped comma, unescaping both fields.
///
/// Returns `None` for lines with no separator; those are skipped by
/// [`load`].
fn split_record(line: &str) -> Option<(String, String)> {
  let mut owner = String::new();
  let mut chars = line.char_indices();

  while let Some((index, c)) = chars.next() {
    match c {
      '\\' => match chars.next() {
        Some((_, escaped)) => owner.push(escaped),
        // Trailing lone backslash, treat it literally.
        None => owner.push('\\'),
      },
      ',' => return Some((owner, unescape(&line[index + 1..]))),
      c => owner.push(c),
    }
  }

  None
}

fn unescape(field: &str) -> String {
  let mut out = String::with_capacity(field.len());
  let mut chars = field.chars();
  while let Some(c) = chars.next() {
    if c == '\\' {
      match chars.next() {
        Some(escaped) => out.push(escaped),
        None => out.push('\\'),
      }
    } else {
      out.push(c);
    }
  }
  out
}

// ============================================================================
// Tests
// ============================================================================
