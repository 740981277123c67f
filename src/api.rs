use crate::engine::{self, CacheStats, EvalMetrics, RuleCache};
use crate::rules::{self, DEFAULT_MAX_TEXT_LEN};
use crate::{Rule, StatusResult, WallClock};
use chrono::{DateTime, TimeZone};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::time::Instant;

static DEFAULT_ENGINE: Lazy<Engine> = Lazy::new(Engine::default);

/// Options that affect parsing and resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// How far ahead to look for the next status change.
    pub horizon_days: u32,
    /// Distinct sign texts kept in the parse cache. `0` disables caching.
    pub cache_capacity: usize,
    /// Characters of a sign text that are parsed; the rest is ignored.
    pub max_text_len: usize,
    /// Zone whose wall clock the signs refer to. Query times are converted
    /// into it whatever offset they carry.
    pub zone: chrono_tz::Tz,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            horizon_days: engine::DEFAULT_HORIZON_DAYS,
            cache_capacity: 1024,
            max_text_len: DEFAULT_MAX_TEXT_LEN,
            zone: engine::DEFAULT_ZONE,
        }
    }
}

/// A point in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// One side of one street block, with the rules posted along it.
///
/// Produced by the ingestion side; the engine only reads `rules`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurbSegment {
    pub id: String,
    pub street: String,
    pub side: String,
    pub geometry: Vec<GeoPoint>,
    pub rules: Vec<Rule>,
}

/// Geospatial lookup supplied by the caller.
pub trait SegmentSource {
    /// Segments within `radius_m` meters of `point`.
    fn find_segments_near(&self, point: GeoPoint, radius_m: f64) -> Vec<CurbSegment>;
}

/// Status of one segment returned by [`Engine::evaluate_nearby`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyStatus {
    pub segment_id: String,
    pub street: String,
    pub side: String,
    #[serde(flatten)]
    pub result: StatusResult,
}

/// A parsed rule and whether it was in force at the query time.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleTrace {
    pub rule: Rule,
    pub active: bool,
    /// Served from the parse cache.
    pub cached: bool,
}

/// Result of [`evaluate_segment_verbose`].
#[derive(Debug, Clone)]
pub struct SegmentDetails {
    pub result: StatusResult,
    pub rules: Vec<RuleTrace>,
    pub metrics: EvalMetrics,
}

/// Parser and resolver with a shared parse cache.
///
/// `Engine` is `Send + Sync`; one instance can serve every request thread.
#[derive(Debug)]
pub struct Engine {
    options: Options,
    cache: RuleCache,
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new(Options::default())
    }
}

impl Engine {
    pub fn new(options: Options) -> Self {
        let cache = RuleCache::new(options.cache_capacity);
        Engine { options, cache }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Parse one sign text, through the cache.
    pub fn parse_rule(&self, text: &str) -> Rule {
        self.cached_rule(text).0
    }

    /// Parse every text in order; convenient for building a [`CurbSegment`].
    pub fn parse_rules<S: AsRef<str>>(&self, texts: &[S]) -> Vec<Rule> {
        texts.iter().map(|t| self.parse_rule(t.as_ref())).collect()
    }

    /// Resolve the status of a segment given its raw sign texts.
    ///
    /// `at` is an instant; it is read on the wall clock of [`Options::zone`].
    pub fn evaluate_segment<S: AsRef<str>, Tz: TimeZone>(&self, raw_texts: &[S], at: &DateTime<Tz>) -> StatusResult {
        let rules = self.parse_rules(raw_texts);
        engine::resolve_within(&rules, at, &self.options.zone, self.options.horizon_days)
    }

    /// Like [`Engine::evaluate_segment`], also returning per-rule activity and timings.
    pub fn evaluate_segment_verbose<S: AsRef<str>, Tz: TimeZone>(
        &self,
        raw_texts: &[S],
        at: &DateTime<Tz>,
    ) -> SegmentDetails {
        let started = Instant::now();
        let mut metrics = EvalMetrics::default();

        let parsed: Vec<(Rule, bool)> = raw_texts.iter().map(|t| self.cached_rule(t.as_ref())).collect();
        metrics.parse = started.elapsed();
        metrics.cache_hits = parsed.iter().filter(|(_, hit)| *hit).count();
        metrics.cache_misses = parsed.len() - metrics.cache_hits;

        let (rules, hits): (Vec<Rule>, Vec<bool>) = parsed.into_iter().unzip();

        let resolve_started = Instant::now();
        let result = engine::resolve_within(&rules, at, &self.options.zone, self.options.horizon_days);
        metrics.resolve = resolve_started.elapsed();

        let clock = WallClock::from(at.with_timezone(&self.options.zone).naive_local());
        let traces = rules
            .into_iter()
            .zip(hits)
            .map(|(rule, cached)| RuleTrace { active: engine::is_active(&rule, clock), rule, cached })
            .collect();

        metrics.total = started.elapsed();
        SegmentDetails { result, rules: traces, metrics }
    }

    /// Resolve a segment whose rules were parsed at ingestion time.
    pub fn evaluate_curb_segment<Tz: TimeZone>(&self, segment: &CurbSegment, at: &DateTime<Tz>) -> StatusResult {
        engine::resolve_within(&segment.rules, at, &self.options.zone, self.options.horizon_days)
    }

    /// Resolve every segment `source` reports around `point`.
    pub fn evaluate_nearby<Src, Tz>(&self, source: &Src, point: GeoPoint, radius_m: f64, at: &DateTime<Tz>) -> Vec<NearbyStatus>
    where
        Src: SegmentSource + ?Sized,
        Tz: TimeZone,
    {
        let segments = source.find_segments_near(point, radius_m);
        tracing::debug!(lat = point.lat, lon = point.lon, radius_m, segments = segments.len(), "evaluating nearby segments");

        segments
            .into_iter()
            .map(|segment| NearbyStatus {
                result: self.evaluate_curb_segment(&segment, at),
                segment_id: segment.id,
                street: segment.street,
                side: segment.side,
            })
            .collect()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    fn cached_rule(&self, text: &str) -> (Rule, bool) {
        let max_len = self.options.max_text_len;
        self.cache.get_or_parse(text, |t| rules::parse_limited(t, max_len))
    }
}

/// Parse one sign text with the process-wide default engine.
pub fn parse_rule(text: &str) -> Rule {
    DEFAULT_ENGINE.parse_rule(text)
}

/// Resolve a segment's raw sign texts at `at` with the process-wide default engine.
///
/// # Example
/// ```
/// use chrono::{TimeZone, Utc};
/// use curbside::{Color, Status, evaluate_segment};
///
/// // Monday 2024-01-15, 14:00 in New York.
/// let at = Utc.with_ymd_and_hms(2024, 1, 15, 19, 0, 0).unwrap();
///
/// let res = evaluate_segment(&["NO PARKING 8AM-6PM MON THRU FRI"], &at);
/// assert_eq!(res.status, Status::NoParking);
/// assert_eq!(res.color, Color::Red);
/// assert_eq!(res.next_change, Some(Utc.with_ymd_and_hms(2024, 1, 15, 23, 0, 0).unwrap()));
/// ```
pub fn evaluate_segment<S: AsRef<str>, Tz: TimeZone>(raw_texts: &[S], at: &DateTime<Tz>) -> StatusResult {
    DEFAULT_ENGINE.evaluate_segment(raw_texts, at)
}

/// [`evaluate_segment`] plus per-rule traces and timings.
pub fn evaluate_segment_verbose<S: AsRef<str>, Tz: TimeZone>(raw_texts: &[S], at: &DateTime<Tz>) -> SegmentDetails {
    DEFAULT_ENGINE.evaluate_segment_verbose(raw_texts, at)
}
