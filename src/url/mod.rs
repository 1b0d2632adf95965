//! URL handling module for Site-Arbor
//!
//! This module resolves hrefs found on crawled pages into absolute URLs.
//! Splitting is deliberately lenient: hrefs are user content and are often
//! not valid URLs.

mod normalize;
mod parts;

// Re-export main functions
pub use normalize::normalize_url;
pub use parts::{split_url, UrlParts};

/// Returns true if the string carries one of the given schemes
///
/// # Examples
///
/// ```
/// use site_arbor::url::has_any_scheme;
///
/// assert!(has_any_scheme("mailto:a@b.com", &["tel", "mailto"]));
/// assert!(!has_any_scheme("https://a.com/", &["tel", "mailto"]));
/// ```
pub fn has_any_scheme(url: &str, schemes: &[&str]) -> bool {
    let parts = split_url(url);
    schemes.iter().any(|scheme| parts.has_scheme(scheme))
}

/// Returns the fragment label of a URL: the text between its first and second `#`
///
/// # Examples
///
/// ```
/// use site_arbor::url::fragment_label;
///
/// assert_eq!(fragment_label("https://a.com/#sec"), Some("sec"));
/// assert_eq!(fragment_label("https://a.com/"), None);
/// ```
pub fn fragment_label(url: &str) -> Option<&str> {
    url.split('#').nth(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_label_empty() {
        assert_eq!(fragment_label("https://a.com/#"), Some(""));
    }

    #[test]
    fn test_fragment_label_stops_at_second_hash() {
        assert_eq!(fragment_label("https://a.com/#one#two"), Some("one"));
    }

    #[test]
    fn test_has_any_scheme_relative() {
        assert!(!has_any_scheme("/contact", &["tel", "mailto"]));
    }
}
