//! Rendering todo lists for the terminal.

use taskstore::store::ListSnapshot;

/// Print one owner's list with display ids.
pub fn print_list(uid: &str, snapshot: &ListSnapshot) {
  println!("\n{uid} TO DO LIST");
  println!("--------------------");
  for item in snapshot.display_items() {
    println!("{}. {}", item.id, item.text);
  }
  println!("--------------------");
}
