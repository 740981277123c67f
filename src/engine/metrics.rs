//! Evaluation metrics.
//!
//! Collected only by the verbose facade (`evaluate_segment_verbose`); the
//! plain path does not read the clock.
//!
//! ## Design notes
//!
//! - Cache counters are per call, not the cache's lifetime totals (those are
//!   in [`CacheStats`](super::CacheStats)).

use std::time::Duration;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EvalMetrics {
    /// Total elapsed time for the evaluation.
    pub total: Duration,
    /// Time spent parsing (or fetching cached) rules.
    pub parse: Duration,
    /// Time spent resolving status and next change.
    pub resolve: Duration,
    /// Texts served from the rule cache.
    pub cache_hits: usize,
    /// Texts parsed fresh.
    pub cache_misses: usize,
}
