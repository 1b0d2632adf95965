use super::parts::split_url;
use url::Url;

/// Resolves an href found on a page into an absolute URL
///
/// # Resolution Rules
///
/// 1. No network location, contains `#`: the origin of `base` joined to the
///    href with a single `/`. The base path is ignored, so `#top` on
///    `https://a.com/docs/page` becomes `https://a.com/#top`.
/// 2. No network location, no `#`: standard relative reference resolution
///    against `base` (`Url::join`).
/// 3. Network location but no scheme (`//cdn.example.com/x`): prefixed with
///    `https:`.
/// 4. Anything else is already absolute and returned unchanged.
///
/// Resolution never fails. If `base` cannot be parsed for rule 2 the href is
/// returned as is.
///
/// # Examples
///
/// ```
/// use site_arbor::url::normalize_url;
///
/// assert_eq!(normalize_url("/y", "https://a.com/x"), "https://a.com/y");
/// assert_eq!(normalize_url("//cdn.com/y", "https://a.com/x"), "https://cdn.com/y");
/// assert_eq!(normalize_url("#sec2", "https://a.com/x"), "https://a.com/#sec2");
/// ```
pub fn normalize_url(href: &str, base: &str) -> String {
    let parts = split_url(href);

    if parts.netloc.is_none() {
        if href.contains('#') {
            return format!("{}/{}", split_url(base).origin(), href);
        }

        return match Url::parse(base).and_then(|base| base.join(href)) {
            Ok(joined) => joined.to_string(),
            Err(e) => {
                tracing::debug!("Cannot resolve {} against {}: {}", href, base, e);
                href.to_string()
            }
        };
    }

    if parts.scheme.is_none() {
        return format!("https:{}", href);
    }

    href.to_string()
}
