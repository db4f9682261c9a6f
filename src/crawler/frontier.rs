//! Frontier queue and visited set
//!
//! The frontier is a FIFO of URL strings, which gives breadth-first traversal.
//! Identity is exact string equality; no URL normalization happens here.
//!
//! `Frontier::push` only consults the visited set, so a URL discovered from
//! several pages before it is visited sits in the queue several times. The
//! coordinator skips popped URLs that are already visited. With
//! `with_pending_dedup` a pending set drops those duplicates at push time
//! instead; the first occurrence keeps its place, so visit order is unchanged.

use std::collections::{HashSet, VecDeque};

/// URLs that have been fully processed
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: HashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    /// Marks a URL as processed; returns false if it already was
    pub fn add(&mut self, url: String) -> bool {
        self.urls.insert(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// Breadth-first work queue of URLs awaiting a visit
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<String>,
    pending: Option<HashSet<String>>,
}

impl Frontier {
    /// Creates a frontier that allows duplicate entries
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a frontier that drops URLs already waiting in the queue
    pub fn with_pending_dedup() -> Self {
        Self {
            queue: VecDeque::new(),
            pending: Some(HashSet::new()),
        }
    }

    /// Appends a URL at the tail unless it has already been visited
    ///
    /// Returns true if the URL was enqueued.
    pub fn push(&mut self, url: String, visited: &VisitedSet) -> bool {
        if visited.contains(&url) {
            return false;
        }

        if let Some(pending) = self.pending.as_mut() {
            if !pending.insert(url.clone()) {
                return false;
            }
        }

        self.queue.push_back(url);
        true
    }

    /// Removes and returns the head of the queue
    pub fn pop(&mut self) -> Option<String> {
        let url = self.queue.pop_front()?;
        if let Some(pending) = self.pending.as_mut() {
            pending.remove(&url);
        }
        Some(url)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_frontier_is_empty() {
        let mut frontier = Frontier::new();
        assert!(frontier.is_empty());
        assert_eq!(frontier.len(), 0);
        assert_eq!(frontier.pop(), None);
    }

    #[test]
    fn test_fifo_order() {
        let visited = VisitedSet::new();
        let mut frontier = Frontier::new();

        frontier.push("https://example.com/a".to_string(), &visited);
        frontier.push("https://example.com/b".to_string(), &visited);
        frontier.push("https://example.com/c".to_string(), &visited);

        assert_eq!(frontier.pop().as_deref(), Some("https://example.com/a"));
        assert_eq!(frontier.pop().as_deref(), Some("https://example.com/b"));
        assert_eq!(frontier.pop().as_deref(), Some("https://example.com/c"));
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_push_drops_visited_urls() {
        let mut visited = VisitedSet::new();
        visited.add("https://example.com/".to_string());

        let mut frontier = Frontier::new();
        assert!(!frontier.push("https://example.com/".to_string(), &visited));
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_push_allows_duplicates_by_default() {
        let visited = VisitedSet::new();
        let mut frontier = Frontier::new();

        assert!(frontier.push("https://example.com/x".to_string(), &visited));
        assert!(frontier.push("https://example.com/x".to_string(), &visited));
        assert_eq!(frontier.len(), 2);
    }

    #[test]
    fn test_pending_dedup_drops_queued_duplicates() {
        let visited = VisitedSet::new();
        let mut frontier = Frontier::with_pending_dedup();

        assert!(frontier.push("https://example.com/x".to_string(), &visited));
        assert!(frontier.push("https://example.com/y".to_string(), &visited));
        assert!(!frontier.push("https://example.com/x".to_string(), &visited));
        assert_eq!(frontier.len(), 2);

        assert_eq!(frontier.pop().as_deref(), Some("https://example.com/x"));
        // Popped entries leave the pending set; the visited set takes over from here.
        assert!(frontier.push("https://example.com/x".to_string(), &visited));
    }

    #[test]
    fn test_exact_string_identity() {
        let visited = VisitedSet::new();
        let mut frontier = Frontier::with_pending_dedup();

        assert!(frontier.push("https://example.com".to_string(), &visited));
        assert!(frontier.push("https://example.com/".to_string(), &visited));
        assert_eq!(frontier.len(), 2);
    }

    #[test]
    fn test_visited_set() {
        let mut visited = VisitedSet::new();
        assert!(visited.is_empty());

        assert!(visited.add("https://example.com/".to_string()));
        assert!(!visited.add("https://example.com/".to_string()));
        assert!(visited.contains("https://example.com/"));
        assert!(!visited.contains("https://example.com"));
        assert_eq!(visited.len(), 1);
    }
}
