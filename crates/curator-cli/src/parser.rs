//! Turn knowledge-base files into articles.
//!
//! Markdown may carry a YAML front-matter block delimited by `---` lines.
//! HTML contributes its `<title>` and `<meta name=.. content=..>` pairs and is
//! reduced to plain text. Text files are taken verbatim. A `date` field in
//! either kind of metadata becomes the article's creation time.

use crate::error::{CliError, Result};
use chrono::{DateTime, NaiveDate};
use curator_domain::NewArticle;
use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::warn;
use walkdir::WalkDir;

/// Extensions `import` picks up.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["md", "html", "txt"];

/// Source format of an imported file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Markdown with optional front matter
    Markdown,
    /// HTML page
    Html,
    /// Plain text
    Text,
}

impl DocumentKind {
    /// Kind for a path, by extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "md" => Some(DocumentKind::Markdown),
            "html" => Some(DocumentKind::Html),
            "txt" => Some(DocumentKind::Text),
            _ => None,
        }
    }
}

/// A parsed file, ready to store.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    /// Where it came from
    pub path: PathBuf,
    /// Source format
    pub kind: DocumentKind,
    /// Title from metadata, a heading, or the file name
    pub title: String,
    /// Plain-text body
    pub content: String,
    /// Author from metadata
    pub author: Option<String>,
    /// Version from metadata
    pub version: Option<String>,
    /// Creation time from a `date` metadata field (Unix seconds)
    pub created_at: Option<i64>,
}

impl ParsedDocument {
    /// Convert into a store submission.
    pub fn into_new_article(self) -> NewArticle {
        NewArticle {
            title: self.title,
            content: self.content,
            author: self.author,
            version: self.version,
        }
    }
}

/// Supported files under `dir`, in a stable order.
pub fn collect_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(CliError::InvalidInput(format!("Directory not found: {}", dir.display())));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry");
                continue;
            }
        };
        if entry.file_type().is_file() && DocumentKind::from_path(entry.path()).is_some() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Read and parse one file.
pub fn parse_file(path: &Path) -> Result<ParsedDocument> {
    let kind = DocumentKind::from_path(path).ok_or_else(|| parse_error(path, "unsupported file type"))?;
    let raw = fs::read_to_string(path).map_err(|e| parse_error(path, &e.to_string()))?;
    parse_str(path, kind, &raw)
}

/// Parse already-loaded file contents.
pub fn parse_str(path: &Path, kind: DocumentKind, raw: &str) -> Result<ParsedDocument> {
    let raw = raw.trim_start_matches('\u{feff}');
    let mut doc = match kind {
        DocumentKind::Markdown => parse_markdown(path, raw)?,
        DocumentKind::Html => parse_html(path, raw),
        DocumentKind::Text => ParsedDocument {
            path: path.to_path_buf(),
            kind,
            title: String::new(),
            content: raw.trim().to_string(),
            author: None,
            version: None,
            created_at: None,
        },
    };

    if doc.title.trim().is_empty() {
        doc.title = title_from_file_name(path);
    }
    if doc.content.trim().is_empty() {
        return Err(parse_error(path, "no content"));
    }
    Ok(doc)
}

fn parse_error(path: &Path, reason: &str) -> CliError {
    CliError::Parse {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

fn title_from_file_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.replace(['-', '_'], " "))
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "Untitled".to_string())
}

fn parse_markdown(path: &Path, raw: &str) -> Result<ParsedDocument> {
    let (front_matter, body) = split_front_matter(raw);

    let metadata: BTreeMap<String, serde_yaml::Value> = match front_matter {
        Some(yaml) if !yaml.trim().is_empty() => {
            serde_yaml::from_str(yaml).map_err(|e| parse_error(path, &format!("front matter: {}", e)))?
        }
        _ => BTreeMap::new(),
    };

    let title = yaml_string(&metadata, "title")
        .or_else(|| {
            body.lines()
                .find_map(|line| line.strip_prefix("# "))
                .map(|heading| heading.trim().to_string())
        })
        .unwrap_or_default();

    Ok(ParsedDocument {
        path: path.to_path_buf(),
        kind: DocumentKind::Markdown,
        title,
        content: body.trim().to_string(),
        author: yaml_string(&metadata, "author"),
        version: yaml_string(&metadata, "version"),
        created_at: yaml_string(&metadata, "date").and_then(|d| parse_date(path, &d)),
    })
}

/// Split a leading `---` block from the rest of a markdown file.
fn split_front_matter(raw: &str) -> (Option<&str>, &str) {
    let Some(rest) = raw.strip_prefix("---") else {
        return (None, raw);
    };
    let Some(rest) = rest.strip_prefix('\n').or_else(|| rest.strip_prefix("\r\n")) else {
        return (None, raw);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return (Some(&rest[..offset]), &rest[offset + line.len()..]);
        }
        offset += line.len();
    }
    // Unterminated block: treat the whole file as body
    (None, raw)
}

/// `YYYY-MM-DD` (midnight UTC) or RFC 3339 to Unix seconds.
///
/// An unreadable date is logged and ignored; the article is still imported.
fn parse_date(path: &Path, value: &str) -> Option<i64> {
    let value = value.trim();
    let parsed = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp())
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.timestamp()));
    if parsed.is_none() {
        warn!(path = %path.display(), date = value, "Ignoring unreadable date");
    }
    parsed
}

fn yaml_string(metadata: &BTreeMap<String, serde_yaml::Value>, key: &str) -> Option<String> {
    let value = match metadata.get(key)? {
        serde_yaml::Value::String(s) => s.trim().to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!value.is_empty()).then_some(value)
}

static TITLE_TAG: OnceLock<Regex> = OnceLock::new();
static META_TAG: OnceLock<Regex> = OnceLock::new();
static META_ATTR: OnceLock<Regex> = OnceLock::new();
static INVISIBLE: OnceLock<Regex> = OnceLock::new();
static ANY_TAG: OnceLock<Regex> = OnceLock::new();
static WHITESPACE: OnceLock<Regex> = OnceLock::new();

fn title_tag() -> &'static Regex {
    TITLE_TAG.get_or_init(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid title regex"))
}

fn meta_tag() -> &'static Regex {
    META_TAG.get_or_init(|| Regex::new(r"(?is)<meta\b[^>]*>").expect("valid meta regex"))
}

fn meta_attr() -> &'static Regex {
    META_ATTR.get_or_init(|| {
        Regex::new(r#"(?i)\b(name|property|content)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid attribute regex")
    })
}

fn invisible() -> &'static Regex {
    INVISIBLE.get_or_init(|| {
        Regex::new(r"(?is)<head\b.*?</head>|<script\b.*?</script>|<style\b.*?</style>|<!--.*?-->")
            .expect("valid invisible-block regex")
    })
}

fn any_tag() -> &'static Regex {
    ANY_TAG.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid tag regex"))
}

fn whitespace() -> &'static Regex {
    WHITESPACE.get_or_init(|| Regex::new(r"[ \t\r\f\v]+").expect("valid whitespace regex"))
}

fn parse_html(path: &Path, raw: &str) -> ParsedDocument {
    let mut metadata = BTreeMap::new();
    for tag in meta_tag().find_iter(raw) {
        let mut name = None;
        let mut content = None;
        for attr in meta_attr().captures_iter(tag.as_str()) {
            let value = attr.get(2).or_else(|| attr.get(3)).map(|m| decode_entities(m.as_str()));
            match attr[1].to_ascii_lowercase().as_str() {
                "content" => content = value,
                _ => name = value.map(|v| v.to_ascii_lowercase()),
            }
        }
        if let (Some(name), Some(content)) = (name, content) {
            metadata.insert(name, content);
        }
    }

    let title = title_tag()
        .captures(raw)
        .map(|c| html_to_text(&c[1]))
        .filter(|t| !t.is_empty())
        .or_else(|| metadata.get("title").cloned())
        .unwrap_or_default();

    ParsedDocument {
        path: path.to_path_buf(),
        kind: DocumentKind::Html,
        title,
        content: html_to_text(&invisible().replace_all(raw, " ")),
        author: metadata.get("author").cloned(),
        version: metadata.get("version").cloned(),
        created_at: metadata.get("date").and_then(|d| parse_date(path, d)),
    }
}

/// Strip tags, decode common entities and normalise whitespace.
fn html_to_text(html: &str) -> String {
    let text = any_tag().replace_all(html, " ");
    let text = decode_entities(&text);
    text.lines()
        .map(|line| whitespace().replace_all(line, " ").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn md(raw: &str) -> Result<ParsedDocument> {
        parse_str(Path::new("kb/password-storage.md"), DocumentKind::Markdown, raw)
    }

    #[test]
    fn test_markdown_front_matter() {
        let doc = md("---\ntitle: Hashing passwords\nauthor: alice\nversion: 3.1\n---\n# Heading\nUse bcrypt.\n").unwrap();
        assert_eq!(doc.title, "Hashing passwords");
        assert_eq!(doc.author.as_deref(), Some("alice"));
        assert_eq!(doc.version.as_deref(), Some("3.1"));
        assert_eq!(doc.content, "# Heading\nUse bcrypt.");
    }

    #[test]
    fn test_front_matter_date_sets_created_at() {
        let doc = md("---\ntitle: Dated\ndate: 2023-11-14\n---\nUse bcrypt.\n").unwrap();
        assert_eq!(doc.created_at, Some(1_699_920_000));

        let doc = md("---\ndate: 2023-11-14T22:13:20Z\n---\nUse bcrypt.\n").unwrap();
        assert_eq!(doc.created_at, Some(1_700_000_000));
    }

    #[test]
    fn test_unreadable_date_is_ignored() {
        let doc = md("---\ndate: last tuesday\n---\nUse bcrypt.\n").unwrap();
        assert!(doc.created_at.is_none());
    }

    #[test]
    fn test_markdown_without_front_matter_uses_heading() {
        let doc = md("Intro line\n# Storing passwords\nUse argon2.").unwrap();
        assert_eq!(doc.title, "Storing passwords");
        assert!(doc.author.is_none());
    }

    #[test]
    fn test_markdown_falls_back_to_file_name() {
        let doc = md("---\nauthor: bob\n---\nplain body").unwrap();
        assert_eq!(doc.title, "password storage");
    }

    #[test]
    fn test_unterminated_front_matter_is_body() {
        let doc = md("---\ntitle: x\nno closing fence").unwrap();
        assert!(doc.content.starts_with("---"));
    }

    #[test]
    fn test_bad_front_matter_is_an_error() {
        let result = md("---\ntitle: [unclosed\n---\nbody");
        assert!(matches!(result, Err(CliError::Parse { .. })));
    }

    #[test]
    fn test_empty_body_is_an_error() {
        assert!(md("---\ntitle: Empty\n---\n   \n").is_err());
    }

    #[test]
    fn test_html_title_meta_and_text() {
        let html = r#"<!DOCTYPE html>
<html>
<head>
  <title>API &amp; Security</title>
  <meta name="author" content="carol">
  <meta content='2.4' name='version'>
  <style>body { color: red; }</style>
</head>
<body>
  <h1>Endpoints</h1>
  <p>Always use <b>https</b> &lt;not http&gt;.</p>
  <script>var http = 1;</script>
</body>
</html>"#;
        let doc = parse_str(Path::new("api.html"), DocumentKind::Html, html).unwrap();
        assert_eq!(doc.title, "API & Security");
        assert_eq!(doc.author.as_deref(), Some("carol"));
        assert_eq!(doc.version.as_deref(), Some("2.4"));
        assert_eq!(doc.content, "Endpoints\nAlways use https <not http>.");
    }

    #[test]
    fn test_text_file() {
        let doc = parse_str(Path::new("notes/old_ftp_guide.txt"), DocumentKind::Text, "  upload via ftp  ").unwrap();
        assert_eq!(doc.title, "old ftp guide");
        assert_eq!(doc.content, "upload via ftp");
    }

    #[test]
    fn test_kind_from_path() {
        assert_eq!(DocumentKind::from_path(Path::new("a.MD")), Some(DocumentKind::Markdown));
        assert_eq!(DocumentKind::from_path(Path::new("a.html")), Some(DocumentKind::Html));
        assert_eq!(DocumentKind::from_path(Path::new("a.pdf")), None);
        assert_eq!(DocumentKind::from_path(Path::new("README")), None);
    }

    #[test]
    fn test_collect_files_recurses_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("b.md"), "b").unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::write(dir.path().join("image.png"), "x").unwrap();
        fs::write(dir.path().join("sub").join("c.html"), "<p>c</p>").unwrap();

        let files = collect_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.md", "c.html"]);
    }

    #[test]
    fn test_collect_files_missing_dir() {
        assert!(matches!(
            collect_files(Path::new("/nonexistent/kb")),
            Err(CliError::InvalidInput(_))
        ));
    }
}
