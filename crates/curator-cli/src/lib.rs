//! Curator CLI library.
//!
//! Configuration, file import, command execution and output formatting for
//! the `curator` command-line tool.

#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod parser;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
