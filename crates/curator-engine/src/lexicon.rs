//! Keyword lexicon: topic phrase tables and the deprecated-feature list

use crate::EngineError;
use curator_domain::{CategoryLexicon, DeprecatedFeature};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Built-in topic tables as (category, positive phrases, negative phrases)
const BUILTIN_CATEGORIES: &[(&str, &[&str], &[&str])] = &[
    (
        "api_security",
        &["environment variables", "secure storage", "never store in plain text", "secret management"],
        &["plain text", "config file", "hardcode", "source code"],
    ),
    (
        "password_hashing",
        &["bcrypt", "argon2", "scrypt", "secure hashing"],
        &["md5", "sha1", "plain text password"],
    ),
    (
        "http_security",
        &["https", "ssl", "tls", "encrypted"],
        &["http://", "unencrypted", "plain http"],
    ),
    (
        "cookie_security",
        &["secure flag", "httponly", "samesite"],
        &["without secure", "no security flags"],
    ),
    (
        "file_upload",
        &["validation", "sanitization", "virus scan", "type checking"],
        &["without validation", "all file types", "no restrictions"],
    ),
    (
        "backup_security",
        &["encryption", "secure storage", "offsite backup"],
        &["without encryption", "same server", "unencrypted"],
    ),
    (
        "sql_security",
        &["parameterized queries", "prepared statements", "orm"],
        &["concatenation", "string concatenation", "direct input"],
    ),
];

/// Built-in deprecated features as (feature, deprecated date, reason)
const BUILTIN_DEPRECATED: &[(&str, &str, &str)] = &[
    ("md5", "2020-01-01", "Cryptographically broken"),
    ("sha1", "2017-01-01", "Collision vulnerabilities"),
    ("http", "2018-01-01", "Insecure protocol"),
    ("flash", "2020-12-31", "End of life"),
    ("ftp", "2019-01-01", "Insecure file transfer"),
];

/// Read-only phrase tables consulted by the scorers
///
/// Categories are iterated in registration order, which fixes the discovery
/// order of conflicts within an article pair.
///
/// # Examples
///
/// ```
/// use curator_engine::KeywordLexicon;
///
/// let lexicon = KeywordLexicon::builtin();
/// let hashing = lexicon.lookup("password_hashing").unwrap();
/// assert!(hashing.positive.contains(&"bcrypt".to_string()));
/// assert!(lexicon.lookup("astrology").is_none());
/// assert_eq!(lexicon.deprecated_features()[0].feature, "md5");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLexicon")]
pub struct KeywordLexicon {
    categories: Vec<CategoryLexicon>,
    deprecated: Vec<DeprecatedFeature>,
}

/// Unchecked wire form; every deserialized lexicon passes through `new`
#[derive(Deserialize)]
struct RawLexicon {
    categories: Vec<CategoryLexicon>,
    deprecated: Vec<DeprecatedFeature>,
}

impl TryFrom<RawLexicon> for KeywordLexicon {
    type Error = EngineError;

    fn try_from(raw: RawLexicon) -> Result<Self, Self::Error> {
        Self::new(raw.categories, raw.deprecated)
    }
}

impl KeywordLexicon {
    /// The lexicon shipped with Curator
    pub fn builtin() -> Self {
        let categories = BUILTIN_CATEGORIES
            .iter()
            .map(|(name, positive, negative)| CategoryLexicon::new(*name, *positive, *negative))
            .collect();
        let deprecated = BUILTIN_DEPRECATED
            .iter()
            .map(|(feature, date, reason)| DeprecatedFeature::new(feature, *date, *reason))
            .collect();

        Self { categories, deprecated }
    }

    /// Build a custom lexicon, failing fast if it is empty or malformed
    pub fn new(
        categories: Vec<CategoryLexicon>,
        deprecated: Vec<DeprecatedFeature>,
    ) -> Result<Self, EngineError> {
        let lexicon = Self { categories, deprecated }.normalized();
        lexicon.validate()?;
        Ok(lexicon)
    }

    /// Load a lexicon from TOML
    ///
    /// ```toml
    /// [[categories]]
    /// category = "password_hashing"
    /// positive = ["bcrypt", "argon2"]
    /// negative = ["md5"]
    ///
    /// [[deprecated]]
    /// feature = "md5"
    /// deprecated_date = "2020-01-01"
    /// reason = "Cryptographically broken"
    /// ```
    pub fn from_toml(toml_str: &str) -> Result<Self, EngineError> {
        toml::from_str(toml_str)
            .map_err(|e| EngineError::Configuration(format!("Failed to parse lexicon TOML: {}", e)))
    }

    /// Phrase sets for a category, if registered
    pub fn lookup(&self, category: &str) -> Option<&CategoryLexicon> {
        self.categories.iter().find(|c| c.category == category)
    }

    /// All categories in registration order
    pub fn categories(&self) -> &[CategoryLexicon] {
        &self.categories
    }

    /// Deprecated features in registration order
    pub fn deprecated_features(&self) -> &[DeprecatedFeature] {
        &self.deprecated
    }

    /// Check the tables are usable
    ///
    /// Both tables must be non-empty, names and phrases non-blank and unique,
    /// and every category needs at least one phrase on each side.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.categories.is_empty() {
            return Err(EngineError::Configuration("lexicon has no categories".to_string()));
        }
        if self.deprecated.is_empty() {
            return Err(EngineError::Configuration(
                "deprecated-feature list is empty".to_string(),
            ));
        }

        let mut names = HashSet::new();
        for lex in &self.categories {
            if lex.category.trim().is_empty() {
                return Err(EngineError::Configuration("category name is blank".to_string()));
            }
            if !names.insert(lex.category.as_str()) {
                return Err(EngineError::Configuration(format!(
                    "category '{}' is registered twice",
                    lex.category
                )));
            }
            check_phrases(&lex.category, "positive", &lex.positive)?;
            check_phrases(&lex.category, "negative", &lex.negative)?;
        }

        let mut features = HashSet::new();
        for item in &self.deprecated {
            if item.feature.trim().is_empty() {
                return Err(EngineError::Configuration(
                    "deprecated feature token is blank".to_string(),
                ));
            }
            if !features.insert(item.feature.as_str()) {
                return Err(EngineError::Configuration(format!(
                    "deprecated feature '{}' is registered twice",
                    item.feature
                )));
            }
        }

        Ok(())
    }

    /// Lowercase every phrase and token
    fn normalized(self) -> Self {
        let categories = self
            .categories
            .into_iter()
            .map(|c| CategoryLexicon::new(c.category, c.positive.as_slice(), c.negative.as_slice()))
            .collect();
        let deprecated = self
            .deprecated
            .into_iter()
            .map(|d| DeprecatedFeature::new(&d.feature, d.deprecated_date, d.reason))
            .collect();
        Self { categories, deprecated }
    }
}

impl Default for KeywordLexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

fn check_phrases(category: &str, side: &str, phrases: &[String]) -> Result<(), EngineError> {
    if phrases.is_empty() {
        return Err(EngineError::Configuration(format!(
            "category '{}' has no {} phrases",
            category, side
        )));
    }
    let mut seen = HashSet::new();
    for phrase in phrases {
        if phrase.trim().is_empty() {
            return Err(EngineError::Configuration(format!(
                "category '{}' has a blank {} phrase",
                category, side
            )));
        }
        if !seen.insert(phrase.as_str()) {
            return Err(EngineError::Configuration(format!(
                "category '{}' repeats {} phrase '{}'",
                category, side, phrase
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_valid() {
        let lexicon = KeywordLexicon::builtin();
        assert!(lexicon.validate().is_ok());
        assert_eq!(lexicon.categories().len(), 7);
        assert_eq!(lexicon.deprecated_features().len(), 5);
    }

    #[test]
    fn test_category_order_is_stable() {
        let lexicon = KeywordLexicon::builtin();
        let names: Vec<&str> = lexicon
            .categories()
            .iter()
            .map(|c| c.category.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "api_security",
                "password_hashing",
                "http_security",
                "cookie_security",
                "file_upload",
                "backup_security",
                "sql_security",
            ]
        );
    }

    #[test]
    fn test_empty_tables_rejected() {
        let result = KeywordLexicon::new(Vec::new(), Vec::new());
        assert!(matches!(result, Err(EngineError::Configuration(_))));

        let result = KeywordLexicon::new(
            vec![CategoryLexicon::new("x", &["a"], &["b"])],
            Vec::new(),
        );
        assert!(matches!(result, Err(EngineError::Configuration(msg)) if msg.contains("deprecated")));
    }

    #[test]
    fn test_duplicate_phrase_rejected() {
        let result = KeywordLexicon::new(
            vec![CategoryLexicon::new("x", &["Bcrypt", "bcrypt"], &["md5"])],
            vec![DeprecatedFeature::new("md5", "2020-01-01", "broken")],
        );
        assert!(matches!(result, Err(EngineError::Configuration(msg)) if msg.contains("repeats")));
    }

    #[test]
    fn test_duplicate_category_rejected() {
        let result = KeywordLexicon::new(
            vec![
                CategoryLexicon::new("x", &["a"], &["b"]),
                CategoryLexicon::new("x", &["c"], &["d"]),
            ],
            vec![DeprecatedFeature::new("md5", "2020-01-01", "broken")],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_from_toml_normalizes_case() {
        let toml_str = r#"
            [[categories]]
            category = "password_hashing"
            positive = ["BCrypt"]
            negative = ["MD5"]

            [[deprecated]]
            feature = "MD5"
            deprecated_date = "2020-01-01"
            reason = "Cryptographically broken"
        "#;
        let lexicon = KeywordLexicon::from_toml(toml_str).unwrap();
        let hashing = lexicon.lookup("password_hashing").unwrap();
        assert_eq!(hashing.positive, vec!["bcrypt"]);
        assert_eq!(lexicon.deprecated_features()[0].feature, "md5");
    }

    #[test]
    fn test_json_deserialization_normalizes_and_validates() {
        let json = r#"{
            "categories": [{"category": "transfer", "positive": ["SFTP"], "negative": ["FTP"]}],
            "deprecated": [{"feature": "FTP", "deprecated_date": "2019-01-01", "reason": "Insecure"}]
        }"#;
        let lexicon: KeywordLexicon = serde_json::from_str(json).unwrap();
        assert_eq!(lexicon.lookup("transfer").unwrap().negative, vec!["ftp"]);
        assert_eq!(lexicon.deprecated_features()[0].feature, "ftp");

        let empty = r#"{"categories": [], "deprecated": []}"#;
        let err = serde_json::from_str::<KeywordLexicon>(empty).unwrap_err();
        assert!(err.to_string().contains("no categories"));
    }

    #[test]
    fn test_serialized_lexicon_reloads() {
        let lexicon = KeywordLexicon::builtin();
        let json = serde_json::to_string(&lexicon).unwrap();
        let reloaded: KeywordLexicon = serde_json::from_str(&json).unwrap();
        assert_eq!(lexicon, reloaded);
    }

    #[test]
    fn test_from_toml_rejects_garbage() {
        let result = KeywordLexicon::from_toml("categories = 3");
        assert!(matches!(result, Err(EngineError::Configuration(_))));
    }
}
