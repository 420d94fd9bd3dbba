//! Command-line interface for skyrecords.
//!
//! This module provides the CLI structure for the `skyrec` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ConfigCommand, FindCommand, ListCommand, NewCommand, ShowCommand, StatusCommand,
};

/// skyrec - Client service records
///
/// Keeps one plain-text record per client with the history of services they
/// have requested. Run without a command for the interactive menu.
#[derive(Debug, Parser)]
#[command(name = "skyrec")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the client records (overrides configuration)
    #[arg(short, long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute (defaults to the interactive menu)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the interactive menu
    Menu,

    /// Register a new client
    New(NewCommand),

    /// Add a service to an existing client
    Add(AddCommand),

    /// Show a client's record
    Show(ShowCommand),

    /// List all clients
    List(ListCommand),

    /// Check whether a client exists
    Find(FindCommand),

    /// Show storage status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                2 => crate::logging::Verbosity::Debug,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::Verbosity;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "skyrec");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_command_means_menu() {
        let cli = parse(&["skyrec"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(parse(&["skyrec", "-q"]).verbosity(), Verbosity::Quiet);
        assert_eq!(parse(&["skyrec"]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["skyrec", "-v"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["skyrec", "-vv"]).verbosity(), Verbosity::Debug);
        assert_eq!(parse(&["skyrec", "-vvv"]).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_new() {
        let cli = parse(&[
            "skyrec",
            "new",
            "Juan Perez",
            "--contact",
            "555-1234",
            "-s",
            "internet",
            "-d",
            "alta nueva",
        ]);
        let Some(Command::New(cmd)) = cli.command else {
            panic!("expected new command");
        };
        assert_eq!(cmd.name, "Juan Perez");
        assert_eq!(cmd.contact.as_deref(), Some("555-1234"));
        assert_eq!(cmd.service, "internet");
        assert_eq!(cmd.description, "alta nueva");
    }

    #[test]
    fn test_parse_new_requires_service() {
        let result = Cli::try_parse_from(["skyrec", "new", "Juan", "-d", "x"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_add() {
        let cli = parse(&["skyrec", "add", "Juan", "-s", "tv de paga", "-d", "upgrade"]);
        assert!(matches!(cli.command, Some(Command::Add(_))));
    }

    #[test]
    fn test_parse_show_json() {
        let cli = parse(&["skyrec", "show", "Juan", "--json"]);
        let Some(Command::Show(cmd)) = cli.command else {
            panic!("expected show command");
        };
        assert!(cmd.json);
    }

    #[test]
    fn test_parse_list_and_find() {
        assert!(matches!(
            parse(&["skyrec", "list"]).command,
            Some(Command::List(_))
        ));
        assert!(matches!(
            parse(&["skyrec", "find", "Ana"]).command,
            Some(Command::Find(_))
        ));
    }

    #[test]
    fn test_parse_config_validate() {
        let cli = parse(&["skyrec", "config", "validate", "-f", "/tmp/c.toml"]);
        assert!(matches!(
            cli.command,
            Some(Command::Config(ConfigCommand::Validate { file: Some(_) }))
        ));
    }

    #[test]
    fn test_parse_with_config_and_root() {
        let cli = parse(&[
            "skyrec",
            "-c",
            "/custom/config.toml",
            "--root",
            "/srv/clientes",
            "status",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
        assert_eq!(cli.root, Some(PathBuf::from("/srv/clientes")));
        assert!(matches!(cli.command, Some(Command::Status(_))));
    }
}
