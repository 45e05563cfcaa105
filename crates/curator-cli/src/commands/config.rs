//! Config command implementation.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::{Config, OutputFormat};
use crate::error::Result;
use crate::output::Formatter;
use std::path::Path;

/// Execute the config command.
pub fn execute_config(args: ConfigArgs, config: &Config, path: &Path, formatter: &Formatter) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            if formatter.format() == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("# {}", path.display());
                println!("{}", config.to_toml()?);
            }
        }
        ConfigAction::Path => {
            println!("{}", path.display());
            if !path.exists() {
                println!("{}", formatter.info("File does not exist yet; defaults are in use"));
            }
        }
    }
    Ok(())
}
