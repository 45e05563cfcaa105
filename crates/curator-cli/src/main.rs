//! Curator CLI - Knowledge-base curation from the command line.

use anyhow::Context;
use clap::Parser;
use curator_cli::commands;
use curator_cli::{Cli, Command, Config, Formatter};
use curator_store::SqliteStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let Cli {
        format,
        no_color,
        config: config_override,
        database,
        command,
    } = Cli::parse();

    let config_path = match config_override {
        Some(path) => path,
        None => Config::path()?,
    };
    let config = Config::load_from(&config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;

    // Determine output format
    let format = format.map(Into::into).unwrap_or(config.settings.format);
    let formatter = Formatter::new(format, !no_color && config.settings.color);

    let open_store = || -> anyhow::Result<SqliteStore> {
        let path = match &database {
            Some(path) => path.clone(),
            None => config.database_path()?,
        };
        SqliteStore::new(&path).with_context(|| format!("Failed to open database {}", path))
    };

    match command {
        Command::Import(args) => commands::execute_import(args, &mut open_store()?, &formatter)?,
        Command::List => commands::execute_list(&open_store()?, &formatter)?,
        Command::Report(args) => commands::execute_report(args, &config, &open_store()?, &formatter)?,
        Command::Scan => commands::execute_scan(&open_store()?, &formatter)?,
        Command::Review(args) => {
            commands::execute_review(args, &config, &mut open_store()?, &formatter).await?
        }
        Command::Config(args) => commands::execute_config(args, &config, &config_path, &formatter)?,
    }

    Ok(())
}
