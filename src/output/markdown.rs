//! Markdown report generation
//!
//! One section per visited page, in visit order, under a short run header.

use crate::crawler::CrawlOutcome;
use chrono::Utc;

/// Formats a crawl outcome as markdown
pub fn format_markdown_report(outcome: &CrawlOutcome) -> String {
    let mut md = String::new();

    md.push_str("# Ripple Scrape Report\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Seed**: {}\n", outcome.seed));
    md.push_str(&format!("- **Origin**: {}\n", outcome.origin));
    md.push_str(&format!("- **Started**: {}\n", outcome.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", outcome.finished_at.to_rfc3339()));
    md.push_str(&format!("- **Pages**: {}\n", outcome.pages.len()));
    md.push_str(&format!("- **Stopped**: {}\n", outcome.termination));
    if !outcome.stats.failed_urls.is_empty() {
        md.push_str(&format!(
            "- **Skipped after failure**: {}\n",
            outcome.stats.failed_urls.len()
        ));
    }
    md.push_str(&format!("- **Generated**: {}\n\n", Utc::now().to_rfc3339()));

    for page in &outcome.pages {
        md.push_str(&format!("## {}\n\n", page.url));
        if page.text.is_empty() {
            md.push_str("_No text extracted._\n\n");
        } else {
            md.push_str(&page.text);
            md.push_str("\n\n");
        }
    }

    md
}
