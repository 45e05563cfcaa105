//! Deterministic content scan: versions, dates and known-bad advice

use curator_domain::Article;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

static VERSION_MENTION: OnceLock<Regex> = OnceLock::new();
static DATE_MENTION: OnceLock<Regex> = OnceLock::new();

fn version_mention() -> &'static Regex {
    VERSION_MENTION.get_or_init(|| Regex::new(r"v\d+\.\d+(?:\.\d+)?").expect("valid version regex"))
}

fn date_mention() -> &'static Regex {
    DATE_MENTION.get_or_init(|| {
        Regex::new(
            r"(?i)\b(Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|June?|July?|Aug(?:ust)?|Sep(?:tember)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)\s+(\d{1,2}),\s+(\d{4})\b",
        )
        .expect("valid date regex")
    })
}

const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

/// A content rule: every group must have at least one phrase present
struct IssueRule {
    groups: &'static [&'static [&'static str]],
    issue: &'static str,
    recommendation: &'static str,
}

const ISSUE_RULES: &[IssueRule] = &[
    IssueRule {
        groups: &[&["plain text"], &["api key"]],
        issue: "Recommends storing API keys in plain text",
        recommendation: "Advise against storing API keys in plain text for security reasons",
    },
    IssueRule {
        groups: &[&["http://", "http "]],
        issue: "Suggests using HTTP for all API endpoints",
        recommendation: "Recommend using HTTPS for all API endpoints to ensure data security",
    },
    IssueRule {
        groups: &[&["md5"]],
        issue: "Advises using MD5 for password hashing",
        recommendation:
            "Recommend using a more secure method for password hashing, such as bcrypt or Argon2",
    },
    IssueRule {
        groups: &[&["without"], &["secure flag"]],
        issue: "Recommends storing tokens in cookies without the secure flag",
        recommendation:
            "Suggest storing tokens in cookies with the secure flag to prevent cross-site scripting attacks",
    },
];

impl IssueRule {
    fn matches(&self, lowered: &str) -> bool {
        self.groups
            .iter()
            .all(|group| group.iter().any(|phrase| lowered.contains(phrase)))
    }
}

/// Version and date mentions found in an article
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    /// Every `vX.Y[.Z]` mention, in order of appearance
    pub versions_mentioned: Vec<String>,
    /// Last version mentioned
    pub latest_version: Option<String>,
    /// Latest "Month D, YYYY" date mentioned, rendered with the full month name
    pub release_date: Option<String>,
}

/// Result of scanning one article
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentScan {
    /// Version and date mentions
    pub version_info: VersionInfo,
    /// Problems detected, in rule order
    pub issues_found: Vec<String>,
    /// One recommendation per issue, aligned with `issues_found`
    pub recommended_updates: Vec<String>,
}

impl ContentScan {
    /// Whether any rule fired
    pub fn has_issues(&self) -> bool {
        !self.issues_found.is_empty()
    }
}

/// Scan an article body
pub fn scan_content(content: &str) -> ContentScan {
    let versions_mentioned: Vec<String> = version_mention()
        .find_iter(content)
        .map(|m| m.as_str().to_string())
        .collect();
    let latest_version = versions_mentioned.last().cloned();

    let release_date = date_mention()
        .captures_iter(content)
        .filter_map(|caps| {
            let month = month_index(&caps[1])?;
            let day: u32 = caps[2].parse().ok()?;
            let year: u32 = caps[3].parse().ok()?;
            (1..=31).contains(&day).then_some((year, month, day))
        })
        .max()
        .map(|(year, month, day)| format!("{} {}, {}", MONTHS[month], day, year));

    let lowered = content.to_lowercase();
    let (issues_found, recommended_updates): (Vec<String>, Vec<String>) = ISSUE_RULES
        .iter()
        .filter(|rule| rule.matches(&lowered))
        .map(|rule| (rule.issue.to_string(), rule.recommendation.to_string()))
        .unzip();

    ContentScan {
        version_info: VersionInfo {
            versions_mentioned,
            latest_version,
            release_date,
        },
        issues_found,
        recommended_updates,
    }
}

fn month_index(name: &str) -> Option<usize> {
    let prefix = name.get(..3)?.to_lowercase();
    MONTHS
        .iter()
        .position(|m| m[..3].eq_ignore_ascii_case(&prefix))
}

/// Minimal article shape accepted by batch scans
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanInput {
    /// Title, if known
    #[serde(default)]
    pub title: Option<String>,
    /// Body
    pub content: String,
}

impl From<&Article> for ScanInput {
    fn from(article: &Article) -> Self {
        Self {
            title: Some(article.title.clone()),
            content: article.content.clone(),
        }
    }
}

/// Scan result for one article in a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannedArticle {
    /// Article title ("Untitled" when absent)
    pub title: String,
    /// Scan result
    pub analysis: ContentScan,
}

/// Scan results for a batch of articles
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchScan {
    /// Articles scanned
    pub total_articles: usize,
    /// Articles where at least one rule fired
    pub articles_with_issues: usize,
    /// Per-article results in input order
    pub analyses: Vec<ScannedArticle>,
}

/// Scan every article in order
pub fn scan_batch(articles: &[ScanInput]) -> BatchScan {
    let analyses: Vec<ScannedArticle> = articles
        .iter()
        .map(|a| ScannedArticle {
            title: a
                .title
                .clone()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| "Untitled".to_string()),
            analysis: scan_content(&a.content),
        })
        .collect();

    BatchScan {
        total_articles: analyses.len(),
        articles_with_issues: analyses.iter().filter(|a| a.analysis.has_issues()).count(),
        analyses,
    }
}
