//! Link extraction from fetched bodies
//!
//! The declared content type picks one of three strategies:
//! - markup (the default): walk the parsed tag tree and read link attributes
//! - meta refresh: scan the raw markup for a `<meta http-equiv="refresh">` target
//! - generic text: scrape absolute `http(s)://` URLs out of script, style and
//!   other inert text bodies
//!
//! Binary content types (images, media, archives) cannot be parsed as markup
//! and fail extraction without looking at the body.
//!
//! Every strategy produces a map from resolved URL to a flag telling whether
//! the URL should be traversed as a page (`true`) or recorded as a leaf
//! resource (`false`).

use crate::url::resolve_url;
use crate::ExtractError;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Node};
use std::collections::HashMap;
use url::Url;

/// Discovered URL mapped to "should this be traversed as a page"
pub type ExtractedLinks = HashMap<String, bool>;

static META_REFRESH_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)<meta\s+http-equiv=["']?refresh["']?\s+content=["']?[^;]+;\s*url=([^"'>\s]+)["']?"#,
    )
    .expect("META_REFRESH_REGEX: hardcoded regex is valid")
});

static ABSOLUTE_URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"https?://[^\s"'<>()]+"#).expect("ABSOLUTE_URL_REGEX: hardcoded regex is valid")
});

/// Content-type fragments whose bodies carry no tag structure
const INERT_TYPE_MARKERS: &[&str] = &["/javascript", "/ecmascript", "/css", "/json"];

/// Top-level types whose bodies are never markup
const BINARY_TYPE_PREFIXES: &[&str] = &["image/", "audio/", "video/", "font/"];

/// Individual application types whose bodies are never markup
const BINARY_APPLICATION_TYPES: &[&str] = &[
    "application/octet-stream",
    "application/pdf",
    "application/zip",
    "application/gzip",
    "application/wasm",
];

/// Extraction strategy chosen for a content type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Tag-tree walk plus meta refresh
    Markup,
    /// URL-shaped pattern scan over raw text
    GenericText,
    /// Binary payload with nothing to extract
    Binary,
}

impl Strategy {
    /// Picks the strategy for a declared Content-Type header value
    ///
    /// Anything not recognised as inert text is assumed to be markup.
    pub fn for_content_type(content_type: &str) -> Self {
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_lowercase();

        if mime == "text/plain" || INERT_TYPE_MARKERS.iter().any(|m| mime.contains(m)) {
            Self::GenericText
        } else if BINARY_TYPE_PREFIXES.iter().any(|p| mime.starts_with(p))
            || BINARY_APPLICATION_TYPES.contains(&mime.as_str())
        {
            Self::Binary
        } else {
            Self::Markup
        }
    }
}

/// Extracts links from a body according to its content type
///
/// Fails only when the declared content type is binary, so the body cannot be
/// parsed at all; a single malformed reference is dropped without failing the
/// extraction.
///
/// # Example
///
/// ```
/// use link_trawler::crawler::extract_links;
/// use url::Url;
///
/// let base = Url::parse("http://example.com/").unwrap();
/// let html = r#"<a href="/page1">Page 1</a><img src="/logo.png">"#;
/// let links = extract_links(&base, html, "text/html").unwrap();
///
/// assert_eq!(links.get("http://example.com/page1"), Some(&true));
/// assert_eq!(links.get("http://example.com/logo.png"), Some(&false));
/// ```
pub fn extract_links(
    base_url: &Url,
    body: &str,
    content_type: &str,
) -> Result<ExtractedLinks, ExtractError> {
    match Strategy::for_content_type(content_type) {
        Strategy::GenericText => Ok(extract_text_links(base_url, body)),
        Strategy::Binary => Err(ExtractError::Markup {
            reason: format!("{} is a binary content type", content_type.trim()),
        }),
        Strategy::Markup => {
            let mut links = extract_markup_links(base_url, body);

            if let Some(target) = extract_meta_refresh(body) {
                if let Some(resolved) = resolve_url(&target, base_url) {
                    links.insert(resolved.to_string(), true);
                }
            }

            Ok(links)
        }
    }
}

/// Walks the tag tree and records one link attribute per element
///
/// | element(s) | attribute(s), first match wins | traverse |
/// |---|---|---|
/// | `img` | `src` | no |
/// | `a`, `link`, `iframe`, `embed`, `object`, `source`, `script` | `src`, `href` | yes |
/// | `form` | `action` | no |
///
/// An empty or blank attribute counts as absent, so `<a src="" href="/x">`
/// yields `/x`. When the same URL is found with both flags on one page,
/// traversal wins.
///
/// The HTML parser recovers from any malformed markup, stray NUL bytes
/// included, so this never fails.
pub fn extract_markup_links(base_url: &Url, body: &str) -> ExtractedLinks {
    let document = Html::parse_document(body);
    let mut links = ExtractedLinks::new();

    // `descendants` is a depth-first, document-order walk of the tag tree
    for node in document.tree.root().descendants() {
        let Node::Element(element) = node.value() else {
            continue;
        };

        let (attrs, traverse): (&[&str], bool) = match element.name() {
            "img" => (&["src"], false),
            "a" | "link" | "iframe" | "embed" | "object" | "source" | "script" => {
                (&["src", "href"], true)
            }
            "form" => (&["action"], false),
            _ => continue,
        };

        let Some(value) = attrs
            .iter()
            .filter_map(|attr| element.attr(attr))
            .map(str::trim)
            .find(|v| !v.is_empty())
        else {
            continue;
        };

        match resolve_url(value, base_url) {
            Some(resolved) => {
                let entry = links.entry(resolved.to_string()).or_insert(traverse);
                *entry |= traverse;
            }
            None => tracing::trace!("Dropping unresolvable reference {:?}", value),
        }
    }

    links
}

/// Returns the raw target of the first meta-refresh directive in `body`
pub fn extract_meta_refresh(body: &str) -> Option<String> {
    META_REFRESH_REGEX
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Scrapes absolute URLs out of a text body; every hit is a traversal candidate
pub fn extract_text_links(base_url: &Url, body: &str) -> ExtractedLinks {
    ABSOLUTE_URL_REGEX
        .find_iter(body)
        .filter_map(|m| resolve_url(m.as_str(), base_url))
        .map(|url| (url.to_string(), true))
        .collect()
}
