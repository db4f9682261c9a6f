use crate::UrlError;
use std::fmt;
use url::Url;

/// The scheme, host and port a crawl is confined to
///
/// Computed once from the seed URL. The serialized form
/// (`scheme://host[:port]`, default ports omitted) is what scope decisions
/// compare against, and the origin root is the base every href is resolved
/// against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    serialized: String,
    base: Url,
}

impl Origin {
    /// Derives the origin from a seed URL string
    ///
    /// # Examples
    ///
    /// ```
    /// use ripple_scrape::url::Origin;
    ///
    /// let origin = Origin::from_seed("https://Example.com:443/docs/intro?x=1").unwrap();
    /// assert_eq!(origin.as_str(), "https://example.com");
    ///
    /// let origin = Origin::from_seed("http://localhost:8080/").unwrap();
    /// assert_eq!(origin.as_str(), "http://localhost:8080");
    /// ```
    pub fn from_seed(seed: &str) -> Result<Self, UrlError> {
        let url = Url::parse(seed.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
        Self::from_url(&url)
    }

    /// Derives the origin from an already parsed URL
    pub fn from_url(url: &Url) -> Result<Self, UrlError> {
        match url.scheme() {
            "http" | "https" => {}
            other => return Err(UrlError::UnsupportedScheme(other.to_string())),
        }

        if url.host_str().map_or(true, str::is_empty) {
            return Err(UrlError::MissingHost);
        }

        let serialized = url.origin().ascii_serialization();
        let base = Url::parse(&serialized).map_err(|e| UrlError::Parse(e.to_string()))?;

        Ok(Self { serialized, base })
    }

    /// The serialized origin, e.g. `https://example.com`
    pub fn as_str(&self) -> &str {
        &self.serialized
    }

    pub fn scheme(&self) -> &str {
        self.base.scheme()
    }

    pub fn host(&self) -> &str {
        self.base.host_str().unwrap_or_default()
    }

    /// The explicit port, `None` when the scheme default is in use
    pub fn port(&self) -> Option<u16> {
        self.base.port()
    }

    /// Resolves an href against the origin root
    ///
    /// Relative references become absolute (`/a` and `a` both land on
    /// `scheme://host/a`); absolute references pass through unchanged.
    pub fn resolve(&self, href: &str) -> Result<Url, url::ParseError> {
        self.base.join(href)
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialized)
    }
}
