//! # taskdeck - a small personal task list
//!
//! Add, toggle and remove short text tasks from a full-screen terminal UI or
//! from the command line. Every change is written straight to a local JSON
//! file, and the UI shows live Total / Completed / Pending counts.
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the interactive UI (default command)
//! taskdeck
//!
//! # Add a task from the shell
//! taskdeck add Buy milk
//!
//! # List, toggle and remove by 1-based position
//! taskdeck list --pending
//! taskdeck toggle 1
//! taskdeck remove 2
//! ```
//!
//! Data lives in `./tarefas.json` unless `--file` points elsewhere. The file
//! is a JSON array of `{ "nome", "concluida", "data_criacao" }` records, so
//! lists written by earlier versions of the tool open unchanged. A missing or
//! unreadable file starts an empty list instead of failing.
//!
//! Set `RUST_LOG=debug` for diagnostics. The UI writes them to
//! `<file>.log` next to the data file; CLI commands write to stderr.

use std::io;

use clap::Parser;

pub mod cli;
pub mod cmd;
pub mod controller;
pub mod error;
pub mod logging;
pub mod store;
pub mod task;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use controller::TaskList;
use logging::LogTarget;
use store::Store;

fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Ui);

    let target = match command {
        Commands::Ui => LogTarget::File(logging::log_path_for(&cli.file)),
        _ => LogTarget::Stderr,
    };
    logging::init(target);

    let result = match command {
        Commands::Ui => cmd_ui(&cli.file),
        Commands::Completions { shell } => {
            cmd_completions(shell);
            Ok(())
        }
        command => {
            let mut list = TaskList::initialize(Store::new(&cli.file));
            let mut console = Console::new(io::stdout());
            match command {
                Commands::Add { text } => cmd_add(&mut list, &mut console, &text),
                Commands::List { pending, done } => {
                    cmd_list(&list, &mut io::stdout(), ListFilter::from_flags(pending, done))
                }
                Commands::Toggle { position } => cmd_toggle(&mut list, &mut console, position),
                Commands::Remove { position, yes } => {
                    cmd_remove(&mut list, &mut console, &mut io::stdin().lock(), position, yes)
                }
                Commands::Stats => cmd_stats(&list, &mut io::stdout()),
                Commands::Backup => cmd_backup(&list, &mut io::stdout()),
                Commands::Ui | Commands::Completions { .. } => unreachable!("handled above"),
            }
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
