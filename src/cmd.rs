//! Command implementations for the CLI interface.
//!
//! Each handler drives the same `TaskList` the terminal UI uses, with a
//! `Console` presenter that prints the list after every change.

use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::Path;

use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::controller::{Presenter, RemovalRequest, Summary, TaskList};
use crate::error::StoreError;
use crate::task::Task;
use crate::tui::run::run_tui;

type CmdResult = Result<(), Box<dyn Error>>;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive UI (default).
    Ui,

    /// Add a new task.
    Add {
        /// Task text. Multiple words are joined with spaces.
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// List tasks in order.
    List {
        /// Only tasks not yet completed.
        #[arg(long, conflicts_with = "done")]
        pending: bool,
        /// Only completed tasks.
        #[arg(long)]
        done: bool,
    },

    /// Toggle completion of the task at a 1-based position.
    Toggle {
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        position: u64,
    },

    /// Remove the task at a 1-based position after confirmation.
    Remove {
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        position: u64,
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },

    /// Show total/completed/pending counts.
    Stats,

    /// Copy the task file into a timestamped backup.
    Backup,

    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Which tasks `list` prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFilter {
    All,
    Pending,
    Done,
}

impl ListFilter {
    pub fn from_flags(pending: bool, done: bool) -> Self {
        match (pending, done) {
            (true, _) => ListFilter::Pending,
            (_, true) => ListFilter::Done,
            _ => ListFilter::All,
        }
    }

    fn keeps(self, task: &Task) -> bool {
        match self {
            ListFilter::All => true,
            ListFilter::Pending => !task.completed,
            ListFilter::Done => task.completed,
        }
    }
}

/// Presenter that writes plain text.
pub struct Console<W: Write> {
    out: W,
    pending: Option<RemovalRequest>,
    save_failed: bool,
}

impl<W: Write> Console<W> {
    pub fn new(out: W) -> Self {
        Console {
            out,
            pending: None,
            save_failed: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for Console<W> {
    fn render(&mut self, tasks: &[Task], summary: Summary) {
        let rows: Vec<(usize, &Task)> = tasks.iter().enumerate().collect();
        let _ = print_table(&mut self.out, &rows, summary);
    }

    fn confirm_removal(&mut self, request: RemovalRequest) {
        self.pending = Some(request);
    }

    fn save_failed(&mut self, error: &StoreError) {
        eprintln!("Error saving: {error}");
        self.save_failed = true;
    }
}

/// Print tasks with their 1-based positions, then the summary line.
pub fn print_table<W: Write>(out: &mut W, rows: &[(usize, &Task)], summary: Summary) -> io::Result<()> {
    if rows.is_empty() {
        writeln!(out, "No tasks.")?;
    } else {
        writeln!(out, "{:>4}  {:<3}  {:<16}  {}", "#", "", "Created", "Task")?;
        for (index, task) in rows {
            let mark = if task.completed { "[x]" } else { "[ ]" };
            let created = if task.created_at.is_empty() { "-" } else { task.created_at.as_str() };
            writeln!(out, "{:>4}  {}  {:<16}  {}", index + 1, mark, created, task.text)?;
        }
    }
    writeln!(out, "{}", format_summary(summary))
}

pub fn format_summary(summary: Summary) -> String {
    format!(
        "Total: {}  Completed: {}  Pending: {}",
        summary.total, summary.completed, summary.pending
    )
}

fn to_index(position: u64) -> usize {
    usize::try_from(position.saturating_sub(1)).unwrap_or(usize::MAX)
}

fn saved<W: Write>(console: &Console<W>) -> CmdResult {
    if console.save_failed {
        Err("change kept in memory only; the task file was not updated".into())
    } else {
        Ok(())
    }
}

/// Launch the terminal user interface.
pub fn cmd_ui(path: &Path) -> CmdResult {
    run_tui(path)?;
    Ok(())
}

/// Add a task from the joined words.
pub fn cmd_add<W: Write>(list: &mut TaskList, console: &mut Console<W>, words: &[String]) -> CmdResult {
    let index = list.add(&words.join(" "), console)?;
    writeln!(console.out, "Added task {}", index + 1)?;
    saved(console)
}

/// Print the list, optionally filtered by completion.
pub fn cmd_list<W: Write>(list: &TaskList, out: &mut W, filter: ListFilter) -> CmdResult {
    let rows: Vec<(usize, &Task)> = list
        .tasks()
        .iter()
        .enumerate()
        .filter(|(_, t)| filter.keeps(t))
        .collect();
    print_table(out, &rows, list.summary())?;
    Ok(())
}

/// Toggle completion of one task.
pub fn cmd_toggle<W: Write>(list: &mut TaskList, console: &mut Console<W>, position: u64) -> CmdResult {
    let completed = list.toggle(to_index(position), console)?;
    let state = if completed { "completed" } else { "pending" };
    writeln!(console.out, "Task {position} marked {state}")?;
    saved(console)
}

/// Remove one task, asking on `input` unless `yes` is set.
pub fn cmd_remove<W: Write, R: BufRead>(
    list: &mut TaskList,
    console: &mut Console<W>,
    input: &mut R,
    position: u64,
    yes: bool,
) -> CmdResult {
    list.request_remove(to_index(position), console)?;
    let Some(request) = console.pending.take() else {
        return Ok(());
    };
    if !yes {
        write!(console.out, "Do you really want to remove \"{}\"? [y/N] ", request.text)?;
        console.out.flush()?;
        let mut answer = String::new();
        input.read_line(&mut answer)?;
        if !matches!(answer.trim(), "y" | "Y" | "yes") {
            writeln!(console.out, "Cancelled.")?;
            return Ok(());
        }
    }
    let removed = list.confirm_remove(request, console)?;
    writeln!(console.out, "Removed \"{}\"", removed.text)?;
    saved(console)
}

/// Print the summary counts.
pub fn cmd_stats<W: Write>(list: &TaskList, out: &mut W) -> CmdResult {
    writeln!(out, "{}", format_summary(list.summary()))?;
    Ok(())
}

/// Create a timestamped backup of the task file.
pub fn cmd_backup<W: Write>(list: &TaskList, out: &mut W) -> CmdResult {
    let path = list.store().backup()?;
    writeln!(out, "Backup written to {}", path.display())?;
    Ok(())
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TaskError;
    use crate::store::{Store, DEFAULT_FILE};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn setup(dir: &TempDir, texts: &[&str]) -> TaskList {
        let mut list = TaskList::initialize(Store::new(dir.path().join(DEFAULT_FILE)));
        let mut sink = Console::new(Vec::new());
        for text in texts {
            list.add(text, &mut sink).unwrap();
        }
        list
    }

    fn words(s: &str) -> Vec<String> {
        s.split(' ').map(String::from).collect()
    }

    fn output(console: Console<Vec<u8>>) -> String {
        String::from_utf8(console.into_inner()).unwrap()
    }

    #[test]
    fn add_prints_list_and_position() {
        let dir = TempDir::new().unwrap();
        let mut list = setup(&dir, &["first"]);
        let mut console = Console::new(Vec::new());
        cmd_add(&mut list, &mut console, &words("Buy milk")).unwrap();
        let out = output(console);
        assert!(out.contains("[ ]"));
        assert!(out.contains("Buy milk"));
        assert!(out.contains("Total: 2  Completed: 0  Pending: 2"));
        assert!(out.ends_with("Added task 2\n"));
    }

    #[test]
    fn add_blank_is_validation_error() {
        let dir = TempDir::new().unwrap();
        let mut list = setup(&dir, &[]);
        let mut console = Console::new(Vec::new());
        let err = cmd_add(&mut list, &mut console, &words("   ")).unwrap_err();
        assert_eq!(err.downcast_ref::<TaskError>(), Some(&TaskError::EmptyText));
        assert!(list.is_empty());
    }

    #[test]
    fn toggle_uses_one_based_positions() {
        let dir = TempDir::new().unwrap();
        let mut list = setup(&dir, &["a", "b"]);
        let mut console = Console::new(Vec::new());
        cmd_toggle(&mut list, &mut console, 2).unwrap();
        assert!(!list.tasks()[0].completed);
        assert!(list.tasks()[1].completed);
        assert!(output(console).contains("Task 2 marked completed"));
    }

    #[test]
    fn toggle_out_of_range_reports_index_error() {
        let dir = TempDir::new().unwrap();
        let mut list = setup(&dir, &["a", "b"]);
        let mut console = Console::new(Vec::new());
        let err = cmd_toggle(&mut list, &mut console, 6).unwrap_err();
        assert_eq!(
            err.downcast_ref::<TaskError>(),
            Some(&TaskError::IndexOutOfRange { index: 5, len: 2 })
        );
    }

    #[test]
    fn remove_asks_and_honours_no() {
        let dir = TempDir::new().unwrap();
        let mut list = setup(&dir, &["a", "b"]);
        let mut console = Console::new(Vec::new());
        cmd_remove(&mut list, &mut console, &mut "n\n".as_bytes(), 1, false).unwrap();
        assert_eq!(list.len(), 2);
        let out = output(console);
        assert!(out.contains("Do you really want to remove \"a\"? [y/N] "));
        assert!(out.contains("Cancelled."));
    }

    #[test]
    fn remove_confirmed_by_answer() {
        let dir = TempDir::new().unwrap();
        let mut list = setup(&dir, &["a", "b", "c"]);
        let mut console = Console::new(Vec::new());
        cmd_remove(&mut list, &mut console, &mut "y\n".as_bytes(), 2, false).unwrap();
        let texts: Vec<&str> = list.tasks().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "c"]);
        assert!(output(console).contains("Removed \"b\""));
    }

    #[test]
    fn remove_with_yes_skips_prompt() {
        let dir = TempDir::new().unwrap();
        let mut list = setup(&dir, &["a"]);
        let mut console = Console::new(Vec::new());
        cmd_remove(&mut list, &mut console, &mut io::empty(), 1, true).unwrap();
        assert!(list.is_empty());
        assert!(!output(console).contains("[y/N]"));
    }

    #[test]
    fn list_filters_keep_original_positions() {
        let dir = TempDir::new().unwrap();
        let mut list = setup(&dir, &["a", "b", "c"]);
        list.toggle(1, &mut Console::new(Vec::new())).unwrap();

        let mut out = Vec::new();
        cmd_list(&list, &mut out, ListFilter::Done).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("   2  [x]"));
        assert!(!out.contains("   1  "));

        let mut out = Vec::new();
        cmd_list(&list, &mut out, ListFilter::from_flags(true, false)).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("   1  [ ]"));
        assert!(out.contains("   3  [ ]"));
        assert!(!out.contains("[x]"));
    }

    #[test]
    fn empty_list_prints_placeholder() {
        let dir = TempDir::new().unwrap();
        let list = setup(&dir, &[]);
        let mut out = Vec::new();
        cmd_list(&list, &mut out, ListFilter::All).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "No tasks.\nTotal: 0  Completed: 0  Pending: 0\n"
        );
    }

    #[test]
    fn stats_prints_counts() {
        let dir = TempDir::new().unwrap();
        let mut list = setup(&dir, &["a", "b"]);
        list.toggle(0, &mut Console::new(Vec::new())).unwrap();
        let mut out = Vec::new();
        cmd_stats(&list, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Total: 2  Completed: 1  Pending: 1\n"
        );
    }

    #[test]
    fn save_failure_is_reported_after_change() {
        let dir = TempDir::new().unwrap();
        let mut list = TaskList::initialize(Store::new(dir.path().join("gone").join(DEFAULT_FILE)));
        let mut console = Console::new(Vec::new());
        assert!(cmd_add(&mut list, &mut console, &words("kept")).is_err());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn backup_reports_path() {
        let dir = TempDir::new().unwrap();
        let list = setup(&dir, &["a"]);
        let mut out = Vec::new();
        cmd_backup(&list, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with("Backup written to "));
    }
}
