//! HTML parser for extracting links and titles
//!
//! This module handles parsing fetched content to extract:
//! - Links to follow (from `<a href>` tags)
//! - The page title, formatted for the site tree

use crate::url::{fragment_label, has_any_scheme, normalize_url};
use scraper::{Html, Selector};
use std::collections::HashSet;

/// Maximum title length, in characters
pub const MAX_TITLE_CHARS: usize = 96;

/// Title used when a page has no `<title>` element
pub const UNKNOWN_TITLE: &str = "Unknown";

/// Link schemes that are never followed
const EXCLUDED_SCHEMES: &[&str] = &["tel", "mailto"];

/// Extracted information from a fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPage {
    /// Display title, already formatted
    pub title: String,

    /// Outbound links (absolute, filtered, deduplicated)
    pub links: Vec<String>,
}

/// Parses page content and extracts its title and outbound links
///
/// # Link Extraction Rules
///
/// 1. Every `<a>` element with an `href` attribute is a candidate
/// 2. Hrefs are resolved against `page_url` with [`normalize_url`]
/// 3. `tel:` and `mailto:` links are dropped
/// 4. Links equal to `page_url` (exact string match) are dropped
/// 5. Duplicates are dropped, keeping the first occurrence
///
/// Content that is not HTML (including empty content after a failed fetch)
/// simply yields no links and the `"Unknown"` title.
///
/// # Example
///
/// ```
/// use site_arbor::crawler::parse_page;
///
/// let html = r#"<html><head><title>Test</title></head>
///     <body><a href="/page">Link</a><a href="mailto:a@b.com">Mail</a></body></html>"#;
/// let parsed = parse_page(html, "https://example.com/");
/// assert_eq!(parsed.title, "Test");
/// assert_eq!(parsed.links, vec!["https://example.com/page".to_string()]);
/// ```
pub fn parse_page(content: &str, page_url: &str) -> ParsedPage {
    let document = Html::parse_document(content);

    let title = format_title(extract_title(&document).as_deref(), page_url);
    let links = extract_links(&document, page_url);

    ParsedPage { title, links }
}

/// Returns the text of the first `<title>` element, if any
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>())
}

/// Formats a raw page title for the site tree
///
/// The raw title is cut to [`MAX_TITLE_CHARS`] characters and then trimmed.
/// A missing title becomes `"Unknown"`. If `page_url` has a fragment, the
/// title gets a `" (#fragment)"` suffix so that anchors into the same page
/// remain distinguishable in the tree.
///
/// # Examples
///
/// ```
/// use site_arbor::crawler::format_title;
///
/// assert_eq!(format_title(Some("  Home "), "https://a.com/"), "Home");
/// assert_eq!(format_title(None, "https://a.com/#sec"), "Unknown (#sec)");
/// ```
pub fn format_title(raw: Option<&str>, page_url: &str) -> String {
    let mut title = match raw {
        Some(raw) => raw
            .chars()
            .take(MAX_TITLE_CHARS)
            .collect::<String>()
            .trim()
            .to_string(),
        None => UNKNOWN_TITLE.to_string(),
    };

    if let Some(fragment) = fragment_label(page_url) {
        title.push_str(&format!(" (#{})", fragment));
    }

    title
}

/// Extracts the filtered, deduplicated outbound links of a document
fn extract_links(document: &Html, page_url: &str) -> Vec<String> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&a_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        if has_any_scheme(href, EXCLUDED_SCHEMES) {
            tracing::trace!("Skipping excluded link: {}", href);
            continue;
        }

        let link = normalize_url(href, page_url);

        if has_any_scheme(&link, EXCLUDED_SCHEMES) || link == page_url {
            continue;
        }

        if seen.insert(link.clone()) {
            links.push(link);
        }
    }

    links
}
