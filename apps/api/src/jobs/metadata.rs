//! Job page metadata scraper: Open Graph, Twitter and HTML meta tags read with regexes.

use std::sync::OnceLock;

use regex::Regex;
use reqwest::{Client, Response, Url};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Length of the visible-text fallback used when the page has no description meta.
const TEXT_FALLBACK_CHARS: usize = 1600;

/// Bytes of a job page read at most. Meta tags sit in `<head>`, well inside this.
const MAX_PAGE_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JobMetadata {
    pub title: Option<String>,
    pub company: Option<String>,
    pub company_logo: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
}

struct MetaPatterns {
    title: Vec<Regex>,
    company: Vec<Regex>,
    logo: Vec<Regex>,
    location: Vec<Regex>,
    description: Vec<Regex>,
}

fn meta_property(attr: &str, name: &str) -> Regex {
    let pattern = format!(
        r#"(?i)<meta[^>]+{attr}=["']{name}["'][^>]+content=(?:"([^"]*)"|'([^']*)')[^>]*>"#,
        name = regex::escape(name)
    );
    Regex::new(&pattern).expect("static meta pattern")
}

fn link_rel(rel: &str) -> Regex {
    let pattern = format!(
        r#"(?i)<link[^>]+rel=["']{rel}["'][^>]+href=(?:"([^"]*)"|'([^']*)')[^>]*>"#,
        rel = regex::escape(rel)
    );
    Regex::new(&pattern).expect("static link pattern")
}

fn patterns() -> &'static MetaPatterns {
    static PATTERNS: OnceLock<MetaPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| MetaPatterns {
        title: vec![
            meta_property("property", "og:title"),
            meta_property("name", "twitter:title"),
            Regex::new(r"(?i)<title>([^<]+)</title>").expect("static title pattern"),
        ],
        company: vec![
            meta_property("property", "og:site_name"),
            meta_property("name", "application-name"),
        ],
        logo: vec![
            meta_property("property", "og:image"),
            link_rel("icon"),
            link_rel("shortcut icon"),
        ],
        location: vec![meta_property("property", "og:locale")],
        description: vec![
            meta_property("name", "description"),
            meta_property("property", "og:description"),
            meta_property("name", "twitter:description"),
        ],
    })
}

/// First non-empty capture across the patterns, in priority order.
/// Attribute values are captured in group 1 (double quotes) or group 2 (single quotes).
fn first_match(html: &str, patterns: &[Regex]) -> Option<String> {
    patterns.iter().find_map(|re| {
        re.captures(html)
            .and_then(|c| c.get(1).or_else(|| c.get(2)))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
    })
}

/// Page text with scripts, styles and tags removed and whitespace collapsed.
pub fn visible_text(html: &str) -> String {
    static STRIP: OnceLock<[Regex; 4]> = OnceLock::new();
    let [script, style, tag, space] = STRIP.get_or_init(|| {
        [
            Regex::new(r"(?is)<script[^>]*>.*?</script>").expect("static script pattern"),
            Regex::new(r"(?is)<style[^>]*>.*?</style>").expect("static style pattern"),
            Regex::new(r"<[^>]+>").expect("static tag pattern"),
            Regex::new(r"\s+").expect("static space pattern"),
        ]
    });

    let text = script.replace_all(html, " ");
    let text = style.replace_all(&text, " ");
    let text = tag.replace_all(&text, " ");
    space.replace_all(&text, " ").trim().to_string()
}

/// Extracts metadata from raw HTML. Without a description tag, the start of the
/// visible text stands in for it.
pub fn extract_metadata(html: &str) -> JobMetadata {
    let p = patterns();
    let description = first_match(html, &p.description).or_else(|| {
        let text: String = visible_text(html).chars().take(TEXT_FALLBACK_CHARS).collect();
        Some(text).filter(|t| !t.is_empty())
    });

    JobMetadata {
        title: first_match(html, &p.title),
        company: first_match(html, &p.company),
        company_logo: first_match(html, &p.logo),
        location: first_match(html, &p.location),
        description,
    }
}

/// Fetches a job page and extracts its metadata. Only http(s) URLs are accepted.
pub async fn fetch_job_metadata(client: &Client, url: &str) -> Result<JobMetadata, ScrapeError> {
    let parsed = Url::parse(url.trim()).map_err(|e| ScrapeError::InvalidUrl(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ScrapeError::InvalidUrl(format!(
            "unsupported scheme '{}'",
            parsed.scheme()
        )));
    }

    let response = client.get(parsed.clone()).send().await?;
    let status = response.status();
    if !status.is_success() {
        // Error pages often still carry usable meta tags.
        warn!("Job page {parsed} answered {status}; extracting anyway");
    }
    let html = read_capped(response, MAX_PAGE_BYTES).await?;
    debug!("Fetched job page {parsed} ({} bytes)", html.len());

    Ok(extract_metadata(&html))
}

/// Reads the body chunk by chunk and stops at `limit` bytes.
async fn read_capped(mut response: Response, limit: usize) -> Result<String, reqwest::Error> {
    let mut body: Vec<u8> = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        let room = limit - body.len();
        body.extend_from_slice(&chunk[..chunk.len().min(room)]);
        if body.len() >= limit {
            warn!("Job page truncated at {limit} bytes");
            break;
        }
    }
    // A cut can split a multi-byte character; the lossy decode only affects the tail.
    Ok(String::from_utf8_lossy(&body).into_owned())
}
