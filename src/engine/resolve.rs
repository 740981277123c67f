//! Segment status resolution.
//!
//! All rules on a curb segment collapse into one [`StatusResult`]:
//!
//! - **status**: the most restrictive type among active rules (see
//!   [`RuleType::restrictiveness`](crate::RuleType::restrictiveness)), or
//!   `ALLOWED` when nothing is active.
//! - **confidence**: the winning rule's confidence; when allowed, the mean
//!   confidence of the segment's recognized rules (1.0 for a bare curb).
//! - **next_change**: the nearest future instant, within the horizon, where
//!   the resolved status differs.
//!
//! ## Next-change search
//!
//! A rule can only switch on or off at local midnight (day gates) or at one
//! of its window bounds. Status is therefore piecewise constant between those
//! *boundary minutes*, and checking each boundary in order, day by day, finds
//! the same instant as a minute-by-minute scan:
//!
//! ```text
//! boundaries = {00:00} ∪ {start, end of every window}
//! for day in today ..= today + horizon:
//!     for minute in boundaries (ascending):
//!         skip if <= now, stop if > now + horizon
//!         status(day, minute) != status(now)  ->  found
//! ```
//!
//! The scan runs on local wall-clock time in the segment's zone (New York by
//! default). Every hit is mapped back through that zone before it counts:
//!
//! - a wall-clock minute erased by a spring-forward jump resolves to the
//!   first minute that exists after it, and the status is re-checked there;
//! - a minute repeated by a fall-back jump resolves to whichever of its two
//!   instants lies after the query time.
//!
//! The result is reported in UTC.

use super::evaluate::is_active;
use crate::{Rule, Status, StatusResult, WallClock};
use chrono::{DateTime, Days, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc};
use std::collections::BTreeSet;

/// Default next-change search horizon.
pub(crate) const DEFAULT_HORIZON_DAYS: u32 = 7;

/// Zone the curb regulations are posted in.
pub(crate) const DEFAULT_ZONE: chrono_tz::Tz = chrono_tz::America::New_York;

/// Largest DST jump the localizer steps over.
const MAX_GAP_MINUTES: i64 = 180;

/// Resolve `rules` at the instant `at` with the default 7-day horizon.
///
/// `at` may carry any offset; it is converted to New York wall-clock time
/// before day and time logic run.
pub fn resolve<Tz: TimeZone>(rules: &[Rule], at: &DateTime<Tz>) -> StatusResult {
    resolve_within(rules, at, &DEFAULT_ZONE, DEFAULT_HORIZON_DAYS)
}

pub(crate) fn resolve_within<Tz: TimeZone, Z: TimeZone>(
    rules: &[Rule],
    at: &DateTime<Tz>,
    zone: &Z,
    horizon_days: u32,
) -> StatusResult {
    let now = at.with_timezone(&Utc);
    let local = at.with_timezone(zone).naive_local();
    let clock = WallClock::from(local);

    let (status, confidence) = match winning_rule(rules, clock) {
        Some(rule) => (Status::from(rule.rule_type), rule.confidence),
        None => (Status::Allowed, allowed_confidence(rules)),
    };
    let next_change = next_change(rules, zone, now, local, status, horizon_days);

    tracing::debug!(
        rules = rules.len(),
        at = %local,
        status = ?status,
        confidence,
        next_change = ?next_change,
        "resolved segment status"
    );

    StatusResult { status, color: status.color(), next_change, confidence }
}

/// Most restrictive active rule; higher confidence breaks ties within a type.
fn winning_rule(rules: &[Rule], clock: WallClock) -> Option<&Rule> {
    rules.iter().filter(|r| is_active(r, clock)).max_by(|a, b| {
        a.rule_type
            .restrictiveness()
            .cmp(&b.rule_type.restrictiveness())
            .then_with(|| a.confidence.total_cmp(&b.confidence))
    })
}

fn status_at(rules: &[Rule], clock: WallClock) -> Status {
    winning_rule(rules, clock).map_or(Status::Allowed, |r| Status::from(r.rule_type))
}

/// Confidence that parking is allowed when no rule is in force.
///
/// Mean over recognized rules. A segment whose signs were all unreadable
/// keeps their (low) mean instead of claiming certainty.
fn allowed_confidence(rules: &[Rule]) -> f64 {
    if rules.is_empty() {
        return 1.0;
    }
    let known: Vec<f64> = rules.iter().filter(|r| !r.is_unknown()).map(|r| r.confidence).collect();
    let pool: Vec<f64> = if known.is_empty() { rules.iter().map(|r| r.confidence).collect() } else { known };
    pool.iter().sum::<f64>() / pool.len() as f64
}

fn boundary_minutes(rules: &[Rule]) -> BTreeSet<u16> {
    let mut minutes = BTreeSet::from([0]);
    for range in rules.iter().filter(|r| !r.is_unknown()).filter_map(|r| r.time_range) {
        minutes.insert(range.start);
        minutes.insert(range.end);
    }
    minutes
}

fn next_change<Z: TimeZone>(
    rules: &[Rule],
    zone: &Z,
    now: DateTime<Utc>,
    local: NaiveDateTime,
    current: Status,
    horizon_days: u32,
) -> Option<DateTime<Utc>> {
    let boundaries = boundary_minutes(rules);
    let horizon = local.checked_add_days(Days::new(u64::from(horizon_days)))?;

    for offset in 0..=u64::from(horizon_days) {
        let date = local.date().checked_add_days(Days::new(offset))?;
        for &minute in &boundaries {
            let time = NaiveTime::from_hms_opt(u32::from(minute / 60), u32::from(minute % 60), 0)?;
            let candidate = date.and_time(time);
            if candidate <= local {
                continue;
            }
            if candidate > horizon {
                return None;
            }
            if status_at(rules, WallClock::from(candidate)) == current {
                continue;
            }
            let Some(instant) = localize(zone, candidate, now) else {
                continue;
            };
            // A gap shift can land where the status has not changed after all.
            let landed = instant.with_timezone(zone).naive_local();
            if status_at(rules, WallClock::from(landed)) != current {
                return Some(instant);
            }
        }
    }

    None
}

/// First real instant for the wall-clock time `local` that lies after `now`.
fn localize<Z: TimeZone>(zone: &Z, local: NaiveDateTime, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    (0..=MAX_GAP_MINUTES).find_map(|shift| {
        let shifted = local.checked_add_signed(TimeDelta::minutes(shift))?;
        let mapped = zone.from_local_datetime(&shifted);
        [mapped.clone().earliest(), mapped.latest()]
            .into_iter()
            .flatten()
            .map(|dt| dt.with_timezone(&Utc))
            .find(|dt| *dt > now)
    })
}
