//! List command implementation.

use crate::error::Result;
use crate::output::Formatter;
use curator_domain::traits::ArticleStore;
use curator_store::SqliteStore;

/// Execute the list command.
pub fn execute_list(store: &SqliteStore, formatter: &Formatter) -> Result<()> {
    let articles = store.list_articles()?;
    println!("{}", formatter.format_articles(&articles)?);
    Ok(())
}
