//! Lenient URL splitting
//!
//! Hrefs found in the wild are frequently not valid URLs, so the pieces the
//! normalizer needs are located with plain string scanning instead of a full
//! parse. Nothing here fails: a missing component is simply `None`.

/// The scheme and network location of a URL-like string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlParts<'a> {
    /// Scheme without the trailing `:` (e.g. `https`, `mailto`)
    pub scheme: Option<&'a str>,

    /// Network location (`host[:port]`, possibly with userinfo)
    pub netloc: Option<&'a str>,
}

impl<'a> UrlParts<'a> {
    /// Returns true if the scheme matches `scheme`, ignoring ASCII case
    pub fn has_scheme(&self, scheme: &str) -> bool {
        self.scheme
            .is_some_and(|s| s.eq_ignore_ascii_case(scheme))
    }

    /// Returns `scheme://netloc`, with empty pieces where a component is missing
    pub fn origin(&self) -> String {
        format!(
            "{}://{}",
            self.scheme.unwrap_or_default(),
            self.netloc.unwrap_or_default()
        )
    }
}

/// Splits a URL-like string into its scheme and network location
///
/// # Examples
///
/// ```
/// use site_arbor::url::split_url;
///
/// let parts = split_url("https://example.com:8080/path?q=1");
/// assert_eq!(parts.scheme, Some("https"));
/// assert_eq!(parts.netloc, Some("example.com:8080"));
///
/// let parts = split_url("//cdn.example.com/lib.js");
/// assert_eq!(parts.scheme, None);
/// assert_eq!(parts.netloc, Some("cdn.example.com"));
/// ```
pub fn split_url(input: &str) -> UrlParts<'_> {
    let (scheme, rest) = match scheme_end(input) {
        Some(idx) => (Some(&input[..idx]), &input[idx + 1..]),
        None => (None, input),
    };

    let netloc = rest.strip_prefix("//").and_then(|after| {
        let end = after.find(['/', '?', '#']).unwrap_or(after.len());
        let netloc = &after[..end];
        (!netloc.is_empty()).then_some(netloc)
    });

    UrlParts { scheme, netloc }
}

/// Finds the index of the `:` terminating a syntactically valid scheme
fn scheme_end(input: &str) -> Option<usize> {
    let colon = input.find(':')?;
    let candidate = &input[..colon];
    let mut chars = candidate.chars();

    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }

    chars
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        .then_some(colon)
}
