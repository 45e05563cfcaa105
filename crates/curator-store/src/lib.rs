//! Curator Storage Layer
//!
//! Implements the ArticleStore trait on top of SQLite.
//!
//! # Architecture
//!
//! - `kb_articles` holds the knowledge-base documents
//! - `article_analyses` keeps the JSON output of every review run, keyed by article
//!
//! # Examples
//!
//! ```no_run
//! use curator_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for article operations
//! ```

#![warn(missing_docs)]

use curator_domain::traits::ArticleStore;
use curator_domain::{Article, ArticleId, NewArticle};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS kb_articles (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    author TEXT,
    version TEXT,
    created_at INTEGER NOT NULL,
    updated_at INTEGER
);

CREATE INDEX IF NOT EXISTS idx_kb_articles_touched
    ON kb_articles (COALESCE(updated_at, created_at));

CREATE TABLE IF NOT EXISTS article_analyses (
    id TEXT PRIMARY KEY,
    article_id TEXT NOT NULL REFERENCES kb_articles(id) ON DELETE CASCADE,
    analysis_data TEXT NOT NULL,
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_article_analyses_article
    ON article_analyses (article_id);
";

const ARTICLE_COLUMNS: &str = "id, title, content, author, version, created_at, updated_at";

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Article not found
    #[error("Article not found: {0}")]
    NotFound(String),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// A stored analysis run for one article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    /// Analysis identifier (UUIDv7)
    pub id: String,
    /// Article the analysis belongs to
    pub article_id: ArticleId,
    /// Analysis payload as JSON
    pub analysis_data: serde_json::Value,
    /// When the analysis was recorded (Unix seconds)
    pub created_at: i64,
}

/// SQLite-based implementation of ArticleStore
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own
/// SqliteStore instance, or share one behind a mutex.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Persist a new article with an explicit creation time
    ///
    /// The CLI importer uses this when a file's metadata carries a date.
    pub fn save_article_at(&mut self, article: NewArticle, created_at: i64) -> Result<Article, StoreError> {
        article.validate().map_err(StoreError::InvalidData)?;

        let stored = Article {
            id: ArticleId::generate(),
            title: article.title,
            content: article.content,
            author: article.author,
            version: article.version,
            created_at,
            updated_at: None,
        };

        self.conn.execute(
            "INSERT INTO kb_articles (id, title, content, author, version, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, NULL)",
            params![
                stored.id.as_str(),
                &stored.title,
                &stored.content,
                &stored.author,
                &stored.version,
                stored.created_at,
            ],
        )?;

        Ok(stored)
    }

    /// Replace an article's fields and stamp `updated_at`
    pub fn update_article(&mut self, id: &ArticleId, article: NewArticle) -> Result<Article, StoreError> {
        self.update_article_at(id, article, unix_now())
    }

    /// Replace an article's fields with an explicit update time
    pub fn update_article_at(
        &mut self,
        id: &ArticleId,
        article: NewArticle,
        updated_at: i64,
    ) -> Result<Article, StoreError> {
        article.validate().map_err(StoreError::InvalidData)?;

        let changed = self.conn.execute(
            "UPDATE kb_articles
             SET title = ?2, content = ?3, author = ?4, version = ?5, updated_at = ?6
             WHERE id = ?1",
            params![
                id.as_str(),
                &article.title,
                &article.content,
                &article.author,
                &article.version,
                updated_at,
            ],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }

        self.get_article(id)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Every analysis recorded for an article, oldest first
    pub fn list_analyses(&self, article_id: &ArticleId) -> Result<Vec<AnalysisRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, article_id, analysis_data, created_at
             FROM article_analyses WHERE article_id = ?1
             ORDER BY created_at ASC, id ASC",
        )?;

        let rows = stmt
            .query_map(params![article_id.as_str()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, article_id, data, created_at)| {
                let analysis_data = serde_json::from_str(&data).map_err(|e| {
                    StoreError::InvalidData(format!("analysis {} is not valid JSON: {}", id, e))
                })?;
                Ok(AnalysisRecord {
                    id,
                    article_id: ArticleId::new(article_id),
                    analysis_data,
                    created_at,
                })
            })
            .collect()
    }

    /// Number of stored articles
    pub fn count_articles(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM kb_articles", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn row_to_article(row: &Row<'_>) -> rusqlite::Result<Article> {
        Ok(Article {
            id: ArticleId::new(row.get::<_, String>(0)?),
            title: row.get(1)?,
            content: row.get(2)?,
            author: row.get(3)?,
            version: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }
}

impl ArticleStore for SqliteStore {
    type Error = StoreError;

    fn list_articles(&self) -> Result<Vec<Article>, Self::Error> {
        let sql = format!(
            "SELECT {} FROM kb_articles ORDER BY COALESCE(updated_at, created_at) DESC, id ASC",
            ARTICLE_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let articles = stmt
            .query_map([], Self::row_to_article)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(articles)
    }

    fn get_article(&self, id: &ArticleId) -> Result<Option<Article>, Self::Error> {
        let sql = format!("SELECT {} FROM kb_articles WHERE id = ?1", ARTICLE_COLUMNS);
        let article = self
            .conn
            .query_row(&sql, params![id.as_str()], Self::row_to_article)
            .optional()?;
        Ok(article)
    }

    fn save_article(&mut self, article: NewArticle) -> Result<Article, Self::Error> {
        self.save_article_at(article, unix_now())
    }

    fn save_analysis(&mut self, article_id: &ArticleId, analysis_json: &str) -> Result<(), Self::Error> {
        serde_json::from_str::<serde_json::Value>(analysis_json)
            .map_err(|e| StoreError::InvalidData(format!("analysis is not valid JSON: {}", e)))?;

        let exists: bool = self
            .conn
            .query_row(
                "SELECT 1 FROM kb_articles WHERE id = ?1",
                params![article_id.as_str()],
                |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);

        if !exists {
            return Err(StoreError::NotFound(article_id.to_string()));
        }

        self.conn.execute(
            "INSERT INTO article_analyses (id, article_id, analysis_data, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                uuid::Uuid::now_v7().to_string(),
                article_id.as_str(),
                analysis_json,
                unix_now(),
            ],
        )?;

        Ok(())
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
