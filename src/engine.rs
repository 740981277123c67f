//! Temporal evaluation engine.
//!
//! Where `rules.rs` turns text into [`Rule`](crate::Rule)s, this module answers
//! the question a driver actually asks: *may I park here now, and until when?*
//!
//! ## How the parts work together
//!
//! ```text
//! raw texts ── RuleCache::get_or_parse ──┐            (cache.rs)
//!                                        v
//!                                   Vec<Rule>
//!                                        │
//! query time ── zone wall clock ── WallClock │
//!                                   │    v
//!                                   └─ is_active (per rule)     (evaluate.rs)
//!                                        │
//!                                        v
//!                                   resolve                     (resolve.rs)
//!                                     - most restrictive active type
//!                                     - aggregate confidence
//!                                     - next-change scan (7 days)
//!                                        │
//!                                        v
//!                                   StatusResult
//! ```
//!
//! ## Responsibilities by module
//!
//! - `evaluate.rs`: single-rule activity test on a local wall-clock instant.
//! - `resolve.rs`: combines every rule on a segment into one status and finds
//!   the next instant that status changes.
//! - `cache.rs`: read-through memoization of parsed rules keyed by raw text.
//! - `metrics.rs`: timings and cache counters for verbose evaluation.
//!
//! Nothing here blocks or allocates shared state beyond the cache; every
//! function is deterministic for identical input.

#[path = "engine/cache.rs"]
mod cache;
#[path = "engine/evaluate.rs"]
mod evaluate;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/resolve.rs"]
mod resolve;

pub use cache::{CacheStats, RuleCache};
pub use evaluate::is_active;
pub use metrics::EvalMetrics;
pub use resolve::resolve;
pub(crate) use resolve::{DEFAULT_HORIZON_DAYS, DEFAULT_ZONE, resolve_within};
