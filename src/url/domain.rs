use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// The port is not part of the domain.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use link_trawler::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM:8443/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Allow-list of host suffixes permitted for traversal
///
/// A host is allowed when it equals an entry or is a proper subdomain of one.
/// An empty allow-list denies every host; callers wanting an unrestricted crawl
/// pass the seed's own host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainPolicy {
    allowed: Vec<String>,
}

impl DomainPolicy {
    /// Creates a policy from an ordered list of host suffixes
    ///
    /// Entries are trimmed and lowercased; blank entries are ignored.
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed = domains
            .into_iter()
            .map(|d| d.as_ref().trim().to_lowercase())
            .filter(|d| !d.is_empty())
            .collect();

        Self { allowed }
    }

    /// Returns true if `host` equals an allowed entry or ends with `"." + entry`
    ///
    /// # Examples
    ///
    /// ```
    /// use link_trawler::url::DomainPolicy;
    ///
    /// let policy = DomainPolicy::new(["example.com"]);
    /// assert!(policy.allows("a.b.example.com"));
    /// assert!(!policy.allows("notexample.com"));
    /// ```
    pub fn allows(&self, host: &str) -> bool {
        let host = host.to_lowercase();

        self.allowed.iter().any(|entry| {
            host == *entry
                || (host.len() > entry.len()
                    && host.ends_with(entry.as_str())
                    && host.as_bytes()[host.len() - entry.len() - 1] == b'.')
        })
    }

    /// Returns true if the URL has a host that passes [`DomainPolicy::allows`]
    pub fn allows_url(&self, url: &Url) -> bool {
        url.host_str().map_or(false, |host| self.allows(host))
    }

    /// The configured host suffixes, in order
    pub fn domains(&self) -> &[String] {
        &self.allowed
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }
}
