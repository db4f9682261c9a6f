//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: lifecycle of one crawl invocation (idle, running, completed, failed)

mod crawl_state;

// Re-export main types
pub use crawl_state::CrawlState;
