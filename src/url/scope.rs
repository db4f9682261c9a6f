use crate::url::Origin;

/// Decides whether a resolved link belongs to the crawl origin
///
/// The default check is a plain string prefix test against the serialized
/// origin. That accepts `https://example.com.evil.com/` and
/// `https://example.com:8443/` for an origin of `https://example.com`; strict
/// mode additionally requires the prefix to end on a host boundary.
#[derive(Debug, Clone)]
pub struct ScopeGuard {
    origin: Origin,
    strict: bool,
}

impl ScopeGuard {
    /// Creates a guard using the prefix check
    pub fn new(origin: Origin) -> Self {
        Self {
            origin,
            strict: false,
        }
    }

    /// Creates a guard that also checks the host boundary
    pub fn strict(origin: Origin) -> Self {
        Self {
            origin,
            strict: true,
        }
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Returns true if the absolute URL is inside the crawl origin
    ///
    /// # Examples
    ///
    /// ```
    /// use ripple_scrape::url::{Origin, ScopeGuard};
    ///
    /// let guard = ScopeGuard::new(Origin::from_seed("https://example.com/").unwrap());
    /// assert!(guard.allows("https://example.com/about"));
    /// assert!(!guard.allows("https://other.com/x"));
    /// ```
    pub fn allows(&self, candidate: &str) -> bool {
        let Some(rest) = candidate.strip_prefix(self.origin.as_str()) else {
            return false;
        };

        if !self.strict {
            return true;
        }

        matches!(rest.chars().next(), None | Some('/') | Some('?') | Some('#'))
    }
}
