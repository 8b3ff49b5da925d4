use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;
use crate::store::DEFAULT_FILE;

/// File-backed task list with a terminal UI.
/// Storage defaults to ./tarefas.json or a path passed via --file.
#[derive(Parser)]
#[command(name = "taskdeck", version, about = "Simple personal task list")]
pub struct Cli {
    /// Path to the JSON task file.
    #[arg(long, global = true, default_value = DEFAULT_FILE)]
    pub file: PathBuf,

    /// Defaults to `ui` when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_ui_with_default_file() {
        let cli = Cli::try_parse_from(["taskdeck"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.file, PathBuf::from(DEFAULT_FILE));
    }

    #[test]
    fn add_joins_words_and_file_is_global() {
        let cli = Cli::try_parse_from(["taskdeck", "add", "Buy", "milk", "--file", "x.json"]).unwrap();
        assert_eq!(cli.file, PathBuf::from("x.json"));
        match cli.command {
            Some(Commands::Add { text }) => assert_eq!(text, vec!["Buy", "milk"]),
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn remove_takes_position_and_yes() {
        let cli = Cli::try_parse_from(["taskdeck", "remove", "2", "--yes"]).unwrap();
        match cli.command {
            Some(Commands::Remove { position, yes }) => {
                assert_eq!(position, 2u64);
                assert!(yes);
            }
            _ => panic!("expected remove"),
        }
    }

    #[test]
    fn positions_are_one_based() {
        assert!(Cli::try_parse_from(["taskdeck", "toggle", "0"]).is_err());
        assert!(Cli::try_parse_from(["taskdeck", "toggle", "1"]).is_ok());
    }

    #[test]
    fn list_filters_conflict() {
        assert!(Cli::try_parse_from(["taskdeck", "list", "--pending", "--done"]).is_err());
    }
}
