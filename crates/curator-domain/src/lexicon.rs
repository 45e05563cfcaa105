//! Lexicon value types: topic phrase sets and deprecated-feature descriptors

use serde::{Deserialize, Serialize};

/// Positive and negative practice phrases for one topic category
///
/// Phrases are stored lowercase; matching is a case-insensitive substring test
/// against already-lowercased content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryLexicon {
    /// Category name (e.g. "password_hashing")
    pub category: String,

    /// Phrases that indicate recommended practice
    pub positive: Vec<String>,

    /// Phrases that indicate discouraged practice
    pub negative: Vec<String>,
}

impl CategoryLexicon {
    /// Build a lexicon, lowercasing every phrase
    pub fn new<S: AsRef<str>>(category: impl Into<String>, positive: &[S], negative: &[S]) -> Self {
        Self {
            category: category.into(),
            positive: positive.iter().map(|p| p.as_ref().to_lowercase()).collect(),
            negative: negative.iter().map(|p| p.as_ref().to_lowercase()).collect(),
        }
    }

    /// Count positive phrases present in lowercased content
    pub fn positive_hits(&self, lowered: &str) -> usize {
        self.positive.iter().filter(|p| lowered.contains(p.as_str())).count()
    }

    /// Count negative phrases present in lowercased content
    pub fn negative_hits(&self, lowered: &str) -> usize {
        self.negative.iter().filter(|p| lowered.contains(p.as_str())).count()
    }

    /// Positive hits minus negative hits
    ///
    /// # Examples
    ///
    /// ```
    /// use curator_domain::CategoryLexicon;
    ///
    /// let lex = CategoryLexicon::new("password_hashing", &["bcrypt", "argon2"], &["md5"]);
    /// assert_eq!(lex.signed_score("we use bcrypt and argon2"), 2);
    /// assert_eq!(lex.signed_score("md5 is fine"), -1);
    /// ```
    pub fn signed_score(&self, lowered: &str) -> i64 {
        self.positive_hits(lowered) as i64 - self.negative_hits(lowered) as i64
    }
}

/// A technology or practice flagged as obsolete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeprecatedFeature {
    /// Lowercase token searched for in content
    pub feature: String,

    /// Date the feature was deprecated (YYYY-MM-DD)
    pub deprecated_date: String,

    /// Why the feature is considered obsolete
    pub reason: String,
}

impl DeprecatedFeature {
    /// Create a descriptor; the feature token is lowercased
    pub fn new(
        feature: impl AsRef<str>,
        deprecated_date: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            feature: feature.as_ref().to_lowercase(),
            deprecated_date: deprecated_date.into(),
            reason: reason.into(),
        }
    }

    /// Whether lowercased content mentions this feature
    pub fn is_mentioned_in(&self, lowered: &str) -> bool {
        lowered.contains(self.feature.as_str())
    }
}
