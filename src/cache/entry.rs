//! Cache entry bookkeeping.

use std::time::{Duration, Instant};

use crate::domain::attributes::AttributeMap;

/// One stored value together with its last-access timestamp.
///
/// The timestamp is refreshed on every read and write, so an entry only
/// expires after it has been left untouched for the full idle window.
#[derive(Debug, Clone)]
pub(crate) struct CacheEntry {
    pub(crate) value: AttributeMap,
    last_access: Instant,
}

impl CacheEntry {
    pub(crate) fn new(value: AttributeMap, now: Instant) -> Self {
        Self {
            value,
            last_access: now,
        }
    }

    /// Reset the idle countdown.
    pub(crate) fn touch(&mut self, now: Instant) {
        self.last_access = now;
    }

    /// Check whether the entry has been idle for at least `idle_ttl`.
    pub(crate) fn is_idle_expired(&self, now: Instant, idle_ttl: Duration) -> bool {
        now.saturating_duration_since(self.last_access) >= idle_ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_entry_is_not_expired() {
        let now = Instant::now();
        let entry = CacheEntry::new(AttributeMap::new(), now);
        assert!(!entry.is_idle_expired(now, Duration::from_secs(60)));
    }

    #[test]
    fn expires_once_idle_window_elapses() {
        let now = Instant::now();
        let entry = CacheEntry::new(AttributeMap::new(), now);
        let ttl = Duration::from_secs(60);

        assert!(!entry.is_idle_expired(now + Duration::from_secs(59), ttl));
        assert!(entry.is_idle_expired(now + Duration::from_secs(60), ttl));
        assert!(entry.is_idle_expired(now + Duration::from_secs(61), ttl));
    }

    #[test]
    fn touch_restarts_the_countdown() {
        let start = Instant::now();
        let mut entry = CacheEntry::new(AttributeMap::new(), start);
        let ttl = Duration::from_secs(60);

        let later = start + Duration::from_secs(45);
        entry.touch(later);

        assert!(!entry.is_idle_expired(start + Duration::from_secs(90), ttl));
        assert!(entry.is_idle_expired(later + Duration::from_secs(60), ttl));
    }
}
