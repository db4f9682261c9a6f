//! Crawl state definitions for tracking one crawl invocation
//!
//! A crawl moves `Idle -> Running` when the seed is enqueued, and leaves
//! `Running` exactly once, for either `Completed` or `Failed`.

use crate::CrawlError;
use std::fmt;

/// Represents the lifecycle state of a crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    /// No crawl in progress
    Idle,

    /// Actively popping, fetching and extracting
    Running,

    /// Frontier exhausted or page ceiling reached; rendering session torn down
    Completed,

    /// An unrecoverable error occurred; rendering session torn down
    Failed,
}

impl CrawlState {
    /// Returns true if the transition `self -> next` is allowed
    pub fn can_transition_to(&self, next: CrawlState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running)
                | (Self::Running, Self::Completed)
                | (Self::Running, Self::Failed)
        )
    }

    /// Performs a checked transition
    pub fn transition(self, next: CrawlState) -> Result<CrawlState, CrawlError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CrawlError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl Default for CrawlState {
    fn default() -> Self {
        Self::Idle
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
