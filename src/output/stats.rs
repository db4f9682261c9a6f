//! Crawl statistics
//!
//! Counters are filled in by the coordinator while it crawls and travel with
//! the outcome.

use crate::crawler::Termination;
use serde::Serialize;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlStatistics {
    /// Distinct URLs visited, including ones skipped after a failure
    pub pages_visited: usize,

    /// Frontier entries popped after their URL was already visited
    pub revisits_skipped: usize,

    /// In-scope links found on rendered pages
    pub links_discovered: usize,

    /// Links that made it into the frontier
    pub links_enqueued: usize,

    /// Links dropped for leaving the origin
    pub links_out_of_scope: usize,

    /// Hrefs that could not be resolved
    pub links_malformed: usize,

    /// Characters across all extracted text
    pub characters_extracted: usize,

    /// Extra render attempts made under the skip policy
    pub render_retries: u32,

    /// URLs skipped after their render failed
    pub failed_urls: Vec<String>,

    /// Wall-clock crawl time
    pub duration_ms: u64,
}

impl CrawlStatistics {
    /// Pages per second over the whole crawl
    pub fn pages_per_second(&self) -> f64 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        self.pages_visited as f64 / (self.duration_ms as f64 / 1000.0)
    }
}

/// Formats statistics as plain text
pub fn format_statistics(stats: &CrawlStatistics, termination: Termination) -> String {
    let mut out = String::new();

    out.push_str("=== Crawl Statistics ===\n\n");
    out.push_str(&format!("Stopped: {}\n", termination));
    out.push_str(&format!("Pages visited: {}\n", stats.pages_visited));
    out.push_str(&format!("Revisits skipped: {}\n", stats.revisits_skipped));
    out.push_str(&format!(
        "Links: {} discovered, {} enqueued, {} out of scope, {} malformed\n",
        stats.links_discovered, stats.links_enqueued, stats.links_out_of_scope, stats.links_malformed
    ));
    out.push_str(&format!("Characters extracted: {}\n", stats.characters_extracted));
    out.push_str(&format!(
        "Duration: {:.2}s ({:.2} pages/sec)\n",
        stats.duration_ms as f64 / 1000.0,
        stats.pages_per_second()
    ));

    if stats.render_retries > 0 {
        out.push_str(&format!("Render retries: {}\n", stats.render_retries));
    }

    if !stats.failed_urls.is_empty() {
        out.push_str(&format!("\nSkipped after failure ({}):\n", stats.failed_urls.len()));
        for url in &stats.failed_urls {
            out.push_str(&format!("  - {}\n", url));
        }
    }

    out
}

/// Prints statistics to stderr
pub fn print_statistics(stats: &CrawlStatistics, termination: Termination) {
    eprint!("{}", format_statistics(stats, termination));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_per_second() {
        let stats = CrawlStatistics {
            pages_visited: 10,
            duration_ms: 2000,
            ..CrawlStatistics::default()
        };
        assert!((stats.pages_per_second() - 5.0).abs() < f64::EPSILON);
        assert_eq!(CrawlStatistics::default().pages_per_second(), 0.0);
    }

    #[test]
    fn test_format_statistics() {
        let stats = CrawlStatistics {
            pages_visited: 3,
            revisits_skipped: 1,
            links_discovered: 4,
            links_enqueued: 2,
            links_out_of_scope: 5,
            links_malformed: 1,
            ..CrawlStatistics::default()
        };

        let text = format_statistics(&stats, Termination::PageCeiling);

        assert!(text.contains("Stopped: page ceiling reached"));
        assert!(text.contains("Pages visited: 3"));
        assert!(text.contains("4 discovered, 2 enqueued, 5 out of scope, 1 malformed"));
        assert!(!text.contains("Skipped after failure"));
    }

    #[test]
    fn test_format_lists_failed_urls() {
        let stats = CrawlStatistics {
            failed_urls: vec!["https://example.com/broken".to_string()],
            ..CrawlStatistics::default()
        };

        let text = format_statistics(&stats, Termination::FrontierExhausted);
        assert!(text.contains("Skipped after failure (1):"));
        assert!(text.contains("  - https://example.com/broken"));
    }
}
