//! Import command implementation.

use crate::cli::ImportArgs;
use crate::error::Result;
use crate::output::Formatter;
use crate::parser::{collect_files, parse_file};
use curator_domain::traits::ArticleStore;
use curator_store::SqliteStore;
use std::path::Path;
use tracing::{info, warn};

/// Outcome of an import run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    /// Files parsed (and saved, unless dry run)
    pub imported: usize,
    /// Files that failed to parse or save
    pub skipped: usize,
}

/// Parse every supported file under `dir` and save it to the store.
///
/// A file whose metadata carries a `date` keeps it as its creation time.
/// A file that cannot be parsed or saved is logged and skipped.
pub fn import_dir(dir: &Path, store: &mut SqliteStore, dry_run: bool) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();

    for path in collect_files(dir)? {
        let document = match parse_file(&path) {
            Ok(document) => document,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping file");
                summary.skipped += 1;
                continue;
            }
        };

        if dry_run {
            info!(path = %path.display(), title = %document.title, "Parsed");
            summary.imported += 1;
            continue;
        }

        let created_at = document.created_at;
        let article = document.into_new_article();
        let saved = match created_at {
            Some(timestamp) => store.save_article_at(article, timestamp),
            None => store.save_article(article),
        };
        match saved {
            Ok(article) => {
                info!(path = %path.display(), article_id = %article.id, "Imported");
                summary.imported += 1;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to save article");
                summary.skipped += 1;
            }
        }
    }

    Ok(summary)
}

/// Execute the import command.
pub fn execute_import(args: ImportArgs, store: &mut SqliteStore, formatter: &Formatter) -> Result<()> {
    let summary = import_dir(&args.dir, store, args.dry_run)?;

    let verb = if args.dry_run { "Parsed" } else { "Imported" };
    println!(
        "{}",
        formatter.success(&format!("{} {} article(s) from {}", verb, summary.imported, args.dir.display()))
    );
    if summary.skipped > 0 {
        println!("{}", formatter.warning(&format!("Skipped {} file(s)", summary.skipped)));
    }
    Ok(())
}
