//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Arguments for creating a new client record.
#[derive(Debug, Args)]
pub struct NewCommand {
    /// Client name (person or business)
    pub name: String,

    /// Contact phone or email
    #[arg(long)]
    pub contact: Option<String>,

    /// Requested service (telephony, internet, pay TV, ...)
    #[arg(short, long)]
    pub service: String,

    /// Description of the request
    #[arg(short, long)]
    pub description: String,
}

/// Arguments for adding a service to an existing client.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Client name
    pub name: String,

    /// Requested service
    #[arg(short, long)]
    pub service: String,

    /// Description of the request
    #[arg(short, long)]
    pub description: String,
}

/// Arguments for showing a client record.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Client name
    pub name: String,

    /// Output the parsed record as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Arguments for listing client records.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Arguments for looking up a client by name.
#[derive(Debug, Args)]
pub struct FindCommand {
    /// Client name
    pub name: String,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
