//! Report command implementation.

use crate::cli::ReportArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use curator_domain::traits::ArticleStore;
use curator_engine::{Engine, Report};
use curator_store::SqliteStore;
use std::fs;
use tracing::info;

/// Run the engine over every stored article.
pub fn build_report(config: &Config, threshold: Option<f64>, store: &SqliteStore, now: i64) -> Result<Report> {
    let mut engine_config = config.engine.clone();
    if let Some(threshold) = threshold {
        if !(0.0..1.0).contains(&threshold) {
            return Err(CliError::InvalidInput(
                "Threshold must be in [0.0, 1.0)".to_string(),
            ));
        }
        engine_config.significance_threshold = threshold;
    }

    let engine = Engine::new(config.lexicon()?, engine_config)?;
    let articles = store.list_articles()?;
    Ok(engine.generate_report(&articles, now)?)
}

/// Execute the report command.
pub fn execute_report(args: ReportArgs, config: &Config, store: &SqliteStore, formatter: &Formatter) -> Result<()> {
    let report = build_report(config, args.threshold, store, super::unix_now())?;
    info!(
        articles = report.summary.total_articles,
        conflicts = report.summary.conflicts_found,
        "Report generated"
    );

    let rendered = formatter.format_report(&report)?;
    match args.output {
        Some(path) => {
            fs::write(&path, rendered)?;
            println!("{}", formatter.success(&format!("Report written to {}", path.display())));
        }
        None => println!("{}", rendered),
    }
    Ok(())
}
