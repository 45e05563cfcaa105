//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use curator_analyzer::{BatchScan, ReviewOutcome};
use curator_domain::{Article, Severity};
use curator_engine::Report;
use colored::*;
use std::fmt::Write as _;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format stored articles.
    pub fn format_articles(&self, articles: &[Article]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(articles)?),
            OutputFormat::Table => Ok(self.format_articles_table(articles)),
            OutputFormat::Markdown => Ok(format_articles_markdown(articles)),
        }
    }

    fn format_articles_table(&self, articles: &[Article]) -> String {
        if articles.is_empty() {
            return self.colorize("No articles found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Title", "Author", "Version", "Updated"]);
        for article in articles {
            builder.push_record([
                short_id(article.id.as_str()),
                truncate(&article.title, 48),
                article.author.clone().unwrap_or_default(),
                article.version.clone().unwrap_or_default(),
                article.reference_timestamp().to_string(),
            ]);
        }
        render(builder)
    }

    /// Format a conflict and relevance report.
    pub fn format_report(&self, report: &Report) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Table => Ok(self.format_report_table(report)),
            OutputFormat::Markdown => Ok(format_report_markdown(report)),
        }
    }

    fn format_report_table(&self, report: &Report) -> String {
        let mut out = String::new();

        if let Some(message) = &report.message {
            return self.warning(message);
        }

        let health = report.recommendations.total_kb_health_score;
        let health_text = format!("Knowledge base health: {}/100", health);
        let color = match health {
            80..=100 => "green",
            50..=79 => "yellow",
            _ => "red",
        };
        let _ = writeln!(out, "{}", self.colorize(&health_text, color));
        let _ = writeln!(
            out,
            "{} articles, {} conflicts, {} deprecated, {} high-priority updates",
            report.summary.total_articles,
            report.summary.conflicts_found,
            report.summary.deprecated_articles,
            report.summary.high_priority_updates
        );
        let _ = writeln!(
            out,
            "Immediate action: {}  Review needed: {}",
            report.recommendations.immediate_action, report.recommendations.review_needed
        );

        if !report.conflicts.is_empty() {
            let mut builder = Builder::default();
            builder.push_record(["Severity", "Score", "Category", "Article 1", "Article 2"]);
            for conflict in &report.conflicts {
                builder.push_record([
                    self.severity_label(conflict.severity),
                    format!("{:.2}", conflict.conflict_score),
                    conflict.conflict_category.clone(),
                    truncate(&conflict.article1.title, 32),
                    truncate(&conflict.article2.title, 32),
                ]);
            }
            let _ = writeln!(out, "\nConflicts\n{}", render(builder));
        }

        if !report.deprecated_articles.is_empty() {
            let mut builder = Builder::default();
            builder.push_record(["ID", "Title", "Deprecated features"]);
            for article in &report.deprecated_articles {
                let features: Vec<&str> = article
                    .deprecated_features
                    .iter()
                    .map(|d| d.feature.as_str())
                    .collect();
                builder.push_record([
                    short_id(article.id.as_str()),
                    truncate(&article.title, 40),
                    features.join(", "),
                ]);
            }
            let _ = writeln!(out, "\nDeprecated content\n{}", render(builder));
        }

        let mut builder = Builder::default();
        builder.push_record(["Relevance", "Priority", "ID", "Title"]);
        for record in &report.relevance_scores {
            builder.push_record([
                format!("{:.2}", record.relevance_score),
                record.priority.as_str().to_string(),
                short_id(record.article.id.as_str()),
                truncate(&record.article.title, 40),
            ]);
        }
        let _ = write!(out, "\nRelevance\n{}", render(builder));

        out
    }

    /// Format a heuristic scan.
    pub fn format_scan(&self, scan: &BatchScan) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(scan)?),
            OutputFormat::Table => Ok(self.format_scan_table(scan)),
            OutputFormat::Markdown => Ok(format_scan_markdown(scan)),
        }
    }

    fn format_scan_table(&self, scan: &BatchScan) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Title", "Latest version", "Latest date", "Issues"]);
        for entry in &scan.analyses {
            let info = &entry.analysis.version_info;
            builder.push_record([
                truncate(&entry.title, 40),
                info.latest_version.clone().unwrap_or_default(),
                info.release_date.clone().unwrap_or_default(),
                entry.analysis.issues_found.join("\n"),
            ]);
        }

        let headline = format!(
            "{} of {} articles have issues",
            scan.articles_with_issues, scan.total_articles
        );
        let color = if scan.articles_with_issues == 0 { "green" } else { "yellow" };
        format!("{}\n{}", self.colorize(&headline, color), render(builder))
    }

    /// Format an LLM review.
    pub fn format_review(&self, outcome: &ReviewOutcome) -> Result<String> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(outcome)?);
        }

        let Some(review) = &outcome.parsed else {
            return Ok(format!(
                "{}\n\n{}",
                self.warning("Model response was not structured"),
                outcome.raw_analysis
            ));
        };

        let mut out = String::new();
        let _ = writeln!(out, "Quality score: {:.2}", review.score);
        let _ = writeln!(out, "\n{}", review.summary);
        if !review.issues.is_empty() {
            let _ = writeln!(out, "\nIssues:");
            for issue in &review.issues {
                let _ = writeln!(
                    out,
                    "  - [{}/{}] {}",
                    issue.kind, issue.severity, issue.description
                );
                if !issue.suggestion.is_empty() {
                    let _ = writeln!(out, "    Suggestion: {}", issue.suggestion);
                }
            }
        }
        if !review.suggested_updates.is_empty() {
            let _ = writeln!(out, "\nSuggested updates:\n{}", review.suggested_updates);
        }
        Ok(out.trim_end().to_string())
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn severity_label(&self, severity: Severity) -> String {
        let color = match severity {
            Severity::High => "red",
            Severity::Medium => "yellow",
            Severity::Low => "cyan",
        };
        self.colorize(severity.as_str(), color)
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn render(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

/// First eight characters, enough to tell UUIDs apart in a listing
fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

/// Escape a value for a markdown table cell
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

fn format_articles_markdown(articles: &[Article]) -> String {
    let mut out = String::from("| ID | Title | Author | Version |\n|---|---|---|---|\n");
    for article in articles {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} |",
            article.id,
            cell(&article.title),
            cell(article.author.as_deref().unwrap_or("")),
            cell(article.version.as_deref().unwrap_or(""))
        );
    }
    out
}

fn format_report_markdown(report: &Report) -> String {
    let mut out = String::from("# Knowledge Base Health Report\n\n");

    if let Some(message) = &report.message {
        let _ = writeln!(out, "_{}_", message);
        return out;
    }

    let summary = &report.summary;
    let recommendations = &report.recommendations;
    let _ = writeln!(out, "## Summary\n");
    let _ = writeln!(out, "- Total articles: {}", summary.total_articles);
    let _ = writeln!(out, "- Conflicts found: {}", summary.conflicts_found);
    let _ = writeln!(out, "- Deprecated articles: {}", summary.deprecated_articles);
    let _ = writeln!(out, "- High-priority updates: {}", summary.high_priority_updates);
    let _ = writeln!(out, "- Immediate action: {}", recommendations.immediate_action);
    let _ = writeln!(out, "- Review needed: {}", recommendations.review_needed);
    let _ = writeln!(out, "- Health score: {}/100\n", recommendations.total_kb_health_score);

    if !report.conflicts.is_empty() {
        let _ = writeln!(out, "## Conflicts\n");
        for conflict in &report.conflicts {
            let _ = writeln!(
                out,
                "### {} vs {}\n\n**{}** ({:.2}) in `{}`\n\n{}\n",
                conflict.article1.title,
                conflict.article2.title,
                conflict.severity,
                conflict.conflict_score,
                conflict.conflict_category,
                conflict.recommendation
            );
        }
    }

    if !report.deprecated_articles.is_empty() {
        let _ = writeln!(out, "## Deprecated Content\n");
        for article in &report.deprecated_articles {
            let _ = writeln!(out, "### {}\n", article.title);
            for item in &article.deprecated_features {
                let _ = writeln!(
                    out,
                    "- `{}` (deprecated {}): {}",
                    item.feature, item.deprecated_date, item.reason
                );
            }
            out.push('\n');
        }
    }

    let _ = writeln!(out, "## Relevance\n");
    let _ = writeln!(out, "| Score | Priority | Title |\n|---|---|---|");
    for record in &report.relevance_scores {
        let _ = writeln!(
            out,
            "| {:.2} | {} | {} |",
            record.relevance_score,
            record.priority.as_str(),
            cell(&record.article.title)
        );
    }
    out
}

fn format_scan_markdown(scan: &BatchScan) -> String {
    let mut out = String::from("# Content Scan\n\n");
    let _ = writeln!(
        out,
        "Articles with issues: {} of {}\n",
        scan.articles_with_issues, scan.total_articles
    );
    for entry in scan.analyses.iter().filter(|e| e.analysis.has_issues()) {
        let _ = writeln!(out, "## {}\n", entry.title);
        for (issue, fix) in entry
            .analysis
            .issues_found
            .iter()
            .zip(&entry.analysis.recommended_updates)
        {
            let _ = writeln!(out, "- {}\n  - {}", issue, fix);
        }
        out.push('\n');
    }
    out
}
