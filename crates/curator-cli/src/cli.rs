//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Curator CLI - Keep a knowledge base current and consistent.
#[derive(Debug, Parser)]
#[command(name = "curator")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "CURATOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// SQLite database to use instead of the configured one
    #[arg(short, long, global = true, env = "CURATOR_DB")]
    pub database: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Markdown document
    Markdown,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Import .md, .html and .txt articles from a directory
    Import(ImportArgs),

    /// List stored articles
    List,

    /// Conflict, deprecation and relevance report over stored articles
    Report(ReportArgs),

    /// Heuristic scan for versions, dates and insecure advice
    Scan,

    /// LLM review of one stored article
    Review(ReviewArgs),

    /// Inspect configuration
    Config(ConfigArgs),
}

/// Arguments for the import command.
#[derive(Debug, Parser)]
pub struct ImportArgs {
    /// Directory to import recursively
    pub dir: PathBuf,

    /// Parse files without saving them
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the report command.
#[derive(Debug, Parser)]
pub struct ReportArgs {
    /// Override the conflict significance threshold (0.0-1.0)
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the review command.
#[derive(Debug, Parser)]
pub struct ReviewArgs {
    /// Article ID
    pub id: String,

    /// Ollama model to use instead of the configured one
    #[arg(short, long)]
    pub model: Option<String>,

    /// Do not store the review alongside the article
    #[arg(long)]
    pub no_save: bool,
}

/// Arguments for configuration inspection.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Print the configuration file location
    Path,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Markdown => crate::config::OutputFormat::Markdown,
        }
    }
}
