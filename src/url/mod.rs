//! URL handling module for Ripple-Scrape
//!
//! This module derives the crawl [`Origin`] from the seed URL and decides
//! whether discovered links stay inside it.

mod origin;
mod scope;

// Re-export main types
pub use origin::Origin;
pub use scope::ScopeGuard;
