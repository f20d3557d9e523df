//! Monotonic request tokens
//!
//! The store is reached over the network and nothing cancels an in-flight
//! request when a newer one starts. Without a guard, a slow response can
//! land after a faster, newer one and overwrite fresher state. Each request
//! takes a token at start; only the most recently issued token may commit.

use std::sync::atomic::{AtomicU64, Ordering};

/// Token identifying one in-flight request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Issues monotonically increasing tokens and tells stale ones apart
#[derive(Debug, Default)]
pub struct RequestTracker {
    issued: AtomicU64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding every earlier one
    pub fn begin(&self) -> RequestToken {
        RequestToken(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// True while no newer request has begun since `token` was issued
    pub fn is_current(&self, token: RequestToken) -> bool {
        self.issued.load(Ordering::SeqCst) == token.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_increase() {
        let tracker = RequestTracker::new();
        let a = tracker.begin();
        let b = tracker.begin();
        assert!(b.value() > a.value());
    }

    #[test]
    fn test_superseded_token_is_stale() {
        let tracker = RequestTracker::new();
        let first = tracker.begin();
        assert!(tracker.is_current(first));

        let second = tracker.begin();
        assert!(!tracker.is_current(first));
        assert!(tracker.is_current(second));
    }
}
