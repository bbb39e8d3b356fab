//! Interactive prompt loop.
//!
//! Prompts for a user id and a command (`add`/`upd`/`del`/`lst`/`quit`),
//! runs it against the in-process store actor, and repeats. An empty
//! command defaults to `lst`. Ctrl-c or end of input ends the loop; the
//! list is persisted on the way out.

use std::io::Write;

use anyhow::Result;
use taskstore::actor::StoreOp;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use super::Session;
use crate::format::print_list;

pub async fn cmd_repl() -> Result<()> {
  let session = Session::start().await?;
  let mut lines = BufReader::new(tokio::io::stdin()).lines();

  println!("\nctrl+c to quit\n");

  loop {
    let Some(uid) = prompt(&mut lines, "Enter user id: ").await? else {
      break;
    };
    let uid = if uid.is_empty() { "Anonymous User".to_string() } else { uid };

    let Some(command) = prompt(&mut lines, "Enter command (add/upd/del/lst/quit): ").await? else {
      break;
    };
    let command = if command.is_empty() {
      "lst".to_string()
    } else {
      command.to_lowercase()
    };

    match command.as_str() {
      "add" => {
        let Some(item) = prompt(&mut lines, "Enter todo item to add: ").await? else {
          break;
        };
        if let Err(err) = session.request(&uid, StoreOp::Add { text: item }).await? {
          println!("\ncould not add: {err}\n");
        }
      }
      "del" => {
        let Some(item) = prompt(&mut lines, "Enter todo item to delete: ").await? else {
          break;
        };
        if let Err(err) = session.request(&uid, StoreOp::Delete { text: item }).await? {
          println!("\ncould not delete: {err}\n");
        }
      }
      "upd" => {
        let Some(item) = prompt(&mut lines, "Enter todo item to replace: ").await? else {
          break;
        };
        let Some(replace_with) = prompt(&mut lines, "Now enter the item to replace it with: ").await? else {
          break;
        };
        let op = StoreOp::Update {
          text: item,
          replace_with,
        };
        if let Err(err) = session.request(&uid, op).await? {
          println!("\ncould not update: {err}\n");
        }
      }
      "lst" => {
        let snapshot = session.request(&uid, StoreOp::Fetch).await?.unwrap_or_default();
        print_list(&uid, &snapshot);
      }
      "quit" => break,
      _ => println!("\ninvalid command\n"),
    }
  }

  println!("\nclosing down...");
  session.finish().await
}

/// Print a prompt and read one trimmed line. Returns `None` on ctrl-c or
/// end of input.
async fn prompt(lines: &mut Lines<BufReader<Stdin>>, message: &str) -> Result<Option<String>> {
  print!("{message}");
  std::io::stdout().flush()?;

  tokio::select! {
    _ = tokio::signal::ctrl_c() => Ok(None),
    line = lines.next_line() => Ok(line?.map(|line| line.trim().to_string())),
  }
}
