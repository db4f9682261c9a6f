//! Network-idle detection
//!
//! A page counts as settled once no more than `max_inflight` requests have
//! been outstanding for a full quiet window. The tracker is fed request
//! start/finish events by an engine and knows nothing about the engine
//! itself.

use std::collections::HashSet;
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct NetworkIdle {
    inflight: HashSet<String>,
    max_inflight: usize,
    window: Duration,
    quiet_since: Option<Instant>,
}

impl NetworkIdle {
    /// Starts tracking at `now` with nothing in flight
    pub fn new(max_inflight: usize, window: Duration, now: Instant) -> Self {
        Self {
            inflight: HashSet::new(),
            max_inflight,
            window,
            quiet_since: Some(now),
        }
    }

    pub fn request_started(&mut self, request_id: impl Into<String>, now: Instant) {
        self.inflight.insert(request_id.into());
        self.update(now);
    }

    /// Records a finished or failed request; unknown ids are ignored
    pub fn request_finished(&mut self, request_id: &str, now: Instant) {
        self.inflight.remove(request_id);
        self.update(now);
    }

    pub fn inflight(&self) -> usize {
        self.inflight.len()
    }

    /// Returns true once the quiet window has fully elapsed
    pub fn is_settled(&self, now: Instant) -> bool {
        self.quiet_since
            .map_or(false, |since| now.saturating_duration_since(since) >= self.window)
    }

    /// Time left until the page settles if nothing else starts
    ///
    /// `None` while too many requests are in flight.
    pub fn time_until_settled(&self, now: Instant) -> Option<Duration> {
        self.quiet_since
            .map(|since| self.window.saturating_sub(now.saturating_duration_since(since)))
    }

    fn update(&mut self, now: Instant) {
        if self.inflight.len() <= self.max_inflight {
            self.quiet_since.get_or_insert(now);
        } else {
            self.quiet_since = None;
        }
    }
}
