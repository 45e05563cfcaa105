//! Article module - the documents a knowledge base is made of

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of seconds in a day, used for age computations
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Identifier of an article in the content store
///
/// Store-generated identifiers are UUIDv7 strings, but any non-empty string
/// supplied by an external store is accepted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleId(String);

impl ArticleId {
    /// Wrap an existing identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh UUIDv7-based identifier
    ///
    /// # Examples
    ///
    /// ```
    /// use curator_domain::ArticleId;
    ///
    /// let a = ArticleId::generate();
    /// let b = ArticleId::generate();
    /// assert_ne!(a, b);
    /// assert_eq!(a.as_str().len(), 36);
    /// ```
    pub fn generate() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }

    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is empty (or whitespace only)
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ArticleId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ArticleId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A knowledge-base article
///
/// Timestamps are Unix seconds. They are signed so that a clock-skewed
/// `updated_at` in the future produces a negative age instead of wrapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Store identifier
    pub id: ArticleId,

    /// Human-readable title
    pub title: String,

    /// Free-text body
    pub content: String,

    /// Optional author name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Optional version label, typically "major.minor[.patch]"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Creation time (Unix seconds)
    pub created_at: i64,

    /// Last update time (Unix seconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

impl Article {
    /// Timestamp the article's freshness is measured from
    ///
    /// `updated_at` wins when present.
    pub fn reference_timestamp(&self) -> i64 {
        self.updated_at.unwrap_or(self.created_at)
    }

    /// Age in (fractional) days relative to `now`
    ///
    /// Negative when the reference timestamp lies in the future.
    ///
    /// # Examples
    ///
    /// ```
    /// use curator_domain::{Article, ArticleId};
    ///
    /// let article = Article {
    ///     id: ArticleId::new("a1"),
    ///     title: "Hashing".to_string(),
    ///     content: "use bcrypt".to_string(),
    ///     author: None,
    ///     version: None,
    ///     created_at: 0,
    ///     updated_at: Some(86_400),
    /// };
    /// assert_eq!(article.age_days(86_400 * 11), 10.0);
    /// ```
    pub fn age_days(&self, now: i64) -> f64 {
        (now - self.reference_timestamp()) as f64 / SECONDS_PER_DAY
    }

    /// Lightweight reference used inside analysis records
    pub fn to_ref(&self) -> ArticleRef {
        ArticleRef {
            id: self.id.clone(),
            title: self.title.clone(),
            author: self.author.clone(),
            version: self.version.clone(),
        }
    }
}

/// Reference to an article carried by analysis records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRef {
    /// Store identifier
    pub id: ArticleId,
    /// Title at analysis time
    pub title: String,
    /// Author at analysis time
    pub author: Option<String>,
    /// Version label at analysis time
    pub version: Option<String>,
}

/// Article submitted for storage; the store assigns id and timestamps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewArticle {
    /// Title
    pub title: String,
    /// Body
    pub content: String,
    /// Optional author
    #[serde(default)]
    pub author: Option<String>,
    /// Optional version label
    #[serde(default)]
    pub version: Option<String>,
}

impl NewArticle {
    /// Check that the fields a store requires are present
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title is required".to_string());
        }
        if self.content.trim().is_empty() {
            return Err("content is required".to_string());
        }
        Ok(())
    }
}
