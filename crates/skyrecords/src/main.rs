//! `skyrec` - CLI for skyrecords
//!
//! Runs the interactive client menu by default, or a single record operation
//! when given a subcommand.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use skyrecords::cli::{
    AddCommand, Cli, Command, ConfigCommand, FindCommand, ListCommand, NewCommand, ShowCommand,
};
use skyrecords::{init_logging, Config, RecordStore, Shell};

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;
    let root = cli.root.clone().unwrap_or_else(|| config.storage_root());

    match cli.command {
        None | Some(Command::Menu) => run_menu(&config, root),
        Some(Command::New(cmd)) => handle_new(&RecordStore::open(root)?, &cmd),
        Some(Command::Add(cmd)) => handle_add(&RecordStore::new(root), &cmd),
        Some(Command::Show(cmd)) => handle_show(&RecordStore::new(root), &cmd),
        Some(Command::List(cmd)) => handle_list(&RecordStore::new(root), &cmd),
        Some(Command::Find(cmd)) => handle_find(&RecordStore::new(root), &cmd),
        Some(Command::Status(cmd)) => handle_status(&RecordStore::new(root), cmd.json),
        Some(Command::Config(cmd)) => handle_config(&config, cmd),
    }
}

fn run_menu(config: &Config, root: PathBuf) -> anyhow::Result<ExitCode> {
    let store = RecordStore::open(root)?;
    let stdin = io::stdin();
    Shell::new(&store, stdin.lock(), io::stdout().lock())
        .pause_after_action(config.shell.pause_after_action)
        .run()?;
    Ok(ExitCode::SUCCESS)
}

fn handle_new(store: &RecordStore, cmd: &NewCommand) -> anyhow::Result<ExitCode> {
    let key = store
        .create_record(
            &cmd.name,
            cmd.contact.as_deref(),
            &cmd.service,
            &cmd.description,
        )
        .with_context(|| format!("cannot register client '{}'", cmd.name))?;
    println!("Created {}", store.path_for(&key).display());
    Ok(ExitCode::SUCCESS)
}

fn handle_add(store: &RecordStore, cmd: &AddCommand) -> anyhow::Result<ExitCode> {
    let entry = store
        .append_entry(&cmd.name, &cmd.service, &cmd.description)
        .with_context(|| format!("cannot add service for '{}'", cmd.name))?;
    println!("{}", entry.to_line());
    Ok(ExitCode::SUCCESS)
}

fn handle_show(store: &RecordStore, cmd: &ShowCommand) -> anyhow::Result<ExitCode> {
    if cmd.json {
        let record = store.load_record(&cmd.name)?;
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print!("{}", store.read_record(&cmd.name)?);
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_list(store: &RecordStore, cmd: &ListCommand) -> anyhow::Result<ExitCode> {
    let keys = store
        .list_records()?
        .collect::<skyrecords::Result<Vec<_>>>()?;

    if cmd.json {
        let records: Vec<_> = keys
            .iter()
            .map(|key| serde_json::json!({ "key": key, "file": key.file_name() }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else if keys.is_empty() {
        println!("No hay clientes registrados.");
    } else {
        for key in &keys {
            println!("- {}", key.file_name());
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_find(store: &RecordStore, cmd: &FindCommand) -> anyhow::Result<ExitCode> {
    if store.exists(&cmd.name)? {
        println!("Cliente encontrado.");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("Cliente no encontrado.");
        Ok(ExitCode::FAILURE)
    }
}

fn handle_status(store: &RecordStore, json: bool) -> anyhow::Result<ExitCode> {
    let stats = store.stats()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("skyrec status");
        println!("-------------");
        println!("Storage root:  {}", stats.root.display());
        println!("Initialized:   {}", stats.root.is_dir());
        println!("Records:       {}", stats.total_records);
        println!("Total size:    {} bytes", stats.total_bytes);
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<ExitCode> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Root:               {}", config.storage_root().display());
                println!();
                println!("[Shell]");
                println!(
                    "  Pause after action: {}",
                    config.shell.pause_after_action
                );
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => {
                    println!("Configuration error: {e}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
