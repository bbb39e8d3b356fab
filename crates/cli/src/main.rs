//! taskstore CLI - serialized multi-owner todo lists over one store actor

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod format;
mod logging;

use commands::{cmd_add, cmd_delete, cmd_list, cmd_repl, cmd_serve, cmd_update};
use logging::{init_cli_logging, init_serve_logging};
use taskstore::config::Config;

#[derive(Parser)]
#[command(name = "taskstore")]
#[command(about = "Multi-owner todo lists, serialized through a single store actor")]
#[command(after_help = "\
QUICK START:
  taskstore --uid simon add \"buy milk\"   # Add an entry
  taskstore --uid simon list              # Show the list
  taskstore serve                         # Run the HTTP server
  taskstore repl                          # Interactive prompt loop")]
struct Cli {
  /// Owner of the todo list
  #[arg(long, global = true, default_value = "Anonymous User")]
  uid: String,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Run the HTTP server
  Serve {
    /// Port to listen on (overrides the config file)
    #[arg(long)]
    port: Option<u16>,
    /// Log to a rolling file in the data directory instead of the console
    #[arg(long)]
    log_file: bool,
  },
  /// Add a todo entry
  Add {
    /// Entry text, e.g. "buy milk"
    text: String,
  },
  /// Replace an entry's text
  Update {
    /// Current entry text
    text: String,
    /// Replacement text
    replace_with: String,
  },
  /// Delete an entry; use "*" to delete all
  Delete {
    /// Entry text, or "*"
    text: String,
  },
  /// Show the list
  List {
    /// Output as JSON
    #[arg(long)]
    json: bool,
  },
  /// Interactive prompt loop (add/upd/del/lst/quit)
  Repl,
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  // File logging is only offered for serve; one-shot commands log to
  // stderr so list output on stdout stays clean.
  let config = Config::load().await;
  let _guard = match &cli.command {
    Commands::Serve { log_file, .. } => init_serve_logging(&config, *log_file),
    _ => {
      init_cli_logging();
      None
    }
  };

  match cli.command {
    Commands::Serve { port, .. } => cmd_serve(config, port).await,
    Commands::Add { text } => cmd_add(&cli.uid, &text).await,
    Commands::Update { text, replace_with } => cmd_update(&cli.uid, &text, &replace_with).await,
    Commands::Delete { text } => cmd_delete(&cli.uid, &text).await,
    Commands::List { json } => cmd_list(&cli.uid, json).await,
    Commands::Repl => cmd_repl().await,
  }
}
