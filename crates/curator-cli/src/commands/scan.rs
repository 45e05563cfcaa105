//! Scan command implementation.

use crate::error::Result;
use crate::output::Formatter;
use curator_analyzer::{scan_batch, BatchScan, ScanInput};
use curator_domain::traits::ArticleStore;
use curator_store::SqliteStore;

/// Heuristic scan of every stored article.
pub fn scan_store(store: &SqliteStore) -> Result<BatchScan> {
    let inputs: Vec<ScanInput> = store.list_articles()?.iter().map(ScanInput::from).collect();
    Ok(scan_batch(&inputs))
}

/// Execute the scan command.
pub fn execute_scan(store: &SqliteStore, formatter: &Formatter) -> Result<()> {
    let scan = scan_store(store)?;
    if scan.total_articles == 0 {
        println!("{}", formatter.info("No articles to scan. Use 'import' first."));
        return Ok(());
    }
    println!("{}", formatter.format_scan(&scan)?);
    Ok(())
}
