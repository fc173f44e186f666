use crate::{UrlError, UrlResult};
use url::Url;

/// Normalizes an absolute URL into the form used as a registry key
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Require an `http` or `https` scheme
/// 3. Require a host
/// 4. Remove the fragment (everything after #)
///
/// Host lowercasing, default-port elision and dot-segment removal are applied
/// by the parser itself, so two spellings of the same resource share one key.
///
/// # Examples
///
/// ```
/// use link_trawler::url::normalize_url;
///
/// let url = normalize_url("http://EXAMPLE.com:80/a/../b#top").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/b");
/// ```
pub fn normalize_url(url_str: &str) -> UrlResult<Url> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::UnsupportedScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    Ok(url)
}

/// Resolves a possibly-relative reference against a base URL
///
/// The result has its fragment stripped. Returns `None` when the reference is
/// not a syntactically valid URL reference; callers drop such references
/// silently.
///
/// # Examples
///
/// ```
/// use link_trawler::url::resolve_url;
/// use url::Url;
///
/// let base = Url::parse("http://example.com/docs/index.html").unwrap();
/// let resolved = resolve_url("../about#team", &base).unwrap();
/// assert_eq!(resolved.as_str(), "http://example.com/about");
/// ```
pub fn resolve_url(reference: &str, base: &Url) -> Option<Url> {
    let mut resolved = base.join(reference.trim()).ok()?;
    resolved.set_fragment(None);
    Some(resolved)
}
