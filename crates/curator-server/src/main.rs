//! Curator server binary
//!
//! Starts the HTTP server for knowledge-base curation.

use curator_server::{config::ServerConfig, start_server, ServerError};
use std::env;
use std::process;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Initialize tracing (log to stderr)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    let args: Vec<String> = env::args().collect();

    let config = if args.len() > 2 && args[1] == "--config" {
        ServerConfig::from_file(&args[2])?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        return Ok(());
    } else {
        eprintln!("Warning: No config file specified, using an in-memory store");
        eprintln!("Usage: curator-server --config <path-to-config.toml>");
        eprintln!();
        ServerConfig::default_test_config()
    };

    start_server(config).await
}

fn print_help() {
    println!("Curator Server - Knowledge-base conflict and relevance analysis");
    println!();
    println!("USAGE:");
    println!("    curator-server --config <path-to-config.toml>");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("CONFIGURATION:");
    println!("    The TOML config file should contain:");
    println!("    - bind_address: IP address to bind (e.g., '127.0.0.1')");
    println!("    - bind_port: Port number (e.g., 8080)");
    println!("    - database_path: SQLite database file");
    println!("    - max_articles: Per-request article cap (default: 500)");
    println!("    - [engine]: Scoring thresholds (optional)");
    println!("    - lexicon_path: Custom keyword lexicon TOML (optional)");
    println!("    - [ollama]: endpoint and model for LLM reviews (optional)");
    println!();
    println!("LOGGING:");
    println!("    Set RUST_LOG (e.g., RUST_LOG=curator_server=debug) to adjust verbosity");
}
