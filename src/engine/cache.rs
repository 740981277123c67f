//! Parsed-rule memoization.
//!
//! Parsing is pure, so a rule parsed once for a given sign text is valid
//! forever; the cache is keyed by the raw text itself. Eviction is LRU and
//! only bounds memory, never correctness.
//!
//! The cache is shared by every caller of an [`Engine`](crate::Engine). Parsing
//! happens outside the lock: two threads missing on the same text may both
//! parse it, and both store the identical result.

use crate::Rule;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Snapshot of cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub len: usize,
    pub capacity: usize,
}

/// LRU cache of parsed rules keyed by raw sign text.
#[derive(Debug)]
pub struct RuleCache {
    /// `None` when caching is disabled (capacity 0).
    entries: Option<Mutex<LruCache<String, Rule>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl RuleCache {
    pub fn new(capacity: usize) -> Self {
        RuleCache {
            entries: NonZeroUsize::new(capacity).map(|cap| Mutex::new(LruCache::new(cap))),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Cached rule for `text`, parsing with `parse` on a miss.
    ///
    /// The flag is `true` on a cache hit.
    pub fn get_or_parse(&self, text: &str, parse: impl FnOnce(&str) -> Rule) -> (Rule, bool) {
        let Some(entries) = &self.entries else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return (parse(text), false);
        };

        if let Some(rule) = lock(entries).get(text) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(text, "rule cache hit");
            return (rule.clone(), true);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(text, "rule cache miss");
        let rule = parse(text);
        lock(entries).put(text.to_string(), rule.clone());
        (rule, false)
    }

    pub fn stats(&self) -> CacheStats {
        let (len, capacity) = match &self.entries {
            Some(entries) => {
                let guard = lock(entries);
                (guard.len(), guard.cap().get())
            }
            None => (0, 0),
        };
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            len,
            capacity,
        }
    }

    pub fn clear(&self) {
        if let Some(entries) = &self.entries {
            lock(entries).clear();
        }
    }
}

// Entries are immutable parse results, so a panic while holding the lock
// cannot leave them half-written.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::parse;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn second_lookup_hits() {
        let cache = RuleCache::new(8);
        let (first, hit) = cache.get_or_parse("NO PARKING 8AM-6PM", parse);
        assert!(!hit);
        let (second, hit) = cache.get_or_parse("NO PARKING 8AM-6PM", parse);
        assert!(hit);
        assert_eq!(first, second);

        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses, stats.len, stats.capacity), (1, 1, 1, 8));
    }

    #[test]
    fn least_recently_used_entry_is_evicted() {
        let cache = RuleCache::new(2);
        cache.get_or_parse("A NO PARKING", parse);
        cache.get_or_parse("B NO PARKING", parse);
        cache.get_or_parse("A NO PARKING", parse);
        cache.get_or_parse("C NO PARKING", parse);

        assert!(cache.get_or_parse("A NO PARKING", parse).1);
        assert!(!cache.get_or_parse("B NO PARKING", parse).1);
    }

    #[test]
    fn zero_capacity_disables_caching() {
        let cache = RuleCache::new(0);
        cache.get_or_parse("NO PARKING", parse);
        assert!(!cache.get_or_parse("NO PARKING", parse).1);
        assert_eq!(cache.stats(), CacheStats { hits: 0, misses: 2, len: 0, capacity: 0 });
    }

    #[test]
    fn clear_drops_entries_but_keeps_counters() {
        let cache = RuleCache::new(4);
        cache.get_or_parse("NO PARKING", parse);
        cache.clear();
        assert_eq!(cache.stats().len, 0);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn shared_across_threads() {
        let cache = Arc::new(RuleCache::new(16));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || cache.get_or_parse("NO STANDING ANYTIME", parse).0)
            })
            .collect();
        let rules: Vec<Rule> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(rules.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(cache.stats().len, 1);
    }
}
