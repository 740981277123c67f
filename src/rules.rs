//! Regulation text parser.
//!
//! Turns one raw sign string into a [`Rule`]. Parsing is a fixed cascade of
//! extraction steps over a normalized copy of the text:
//!
//! ```text
//! raw text
//!   │ normalize            (normalize.rs)   uppercase, A.M. -> AM, NOON -> 12PM, ...
//!   │ TriggerInfo::scan    (trigger.rs)     coarse buckets to skip dead steps
//!   │ classify             (classify.rs)    keyword cascade -> RuleType | stop (UNKNOWN)
//!   │ time_window::extract (time_window.rs) "7:30AM-9:30AM" -> TimeRange
//!   │ days::extract        (days.rs)        "MON THRU FRI", "EXCEPT SUN"
//!   v
//! Rule + confidence
//! ```
//!
//! Every step works on a [`Scratch`] buffer: a recognized span is blanked out
//! once accounted for, so later steps never re-read it and whatever survives
//! at the end is text the parser could not explain.
//!
//! ## Failure policy
//!
//! Parsing is total. A step that finds nothing returns `None` and is skipped;
//! text with no recognizable restriction keyword becomes `UNKNOWN`.
//!
//! ## Confidence
//!
//! Scored in integer points and divided by 100 at the end so that sums like
//! `0.5 + 0.25 + 0.15 + 0.1` land on exact values:
//!
//! | evidence                          | points |
//! |-----------------------------------|--------|
//! | restriction keyword (base)        | +50    |
//! | valid time window                 | +25    |
//! | malformed time window             | -20    |
//! | day or exception information      | +15    |
//! | nothing left unaccounted for      | +10    |

#[path = "rules/classify.rs"]
mod classify;
#[path = "rules/days.rs"]
mod days;
#[path = "rules/normalize.rs"]
mod normalize;
#[path = "rules/time_window.rs"]
mod time_window;
#[path = "rules/trigger.rs"]
mod trigger;

#[cfg(test)]
#[path = "rules/tests.rs"]
mod tests;

pub(crate) use normalize::normalize;
pub(crate) use trigger::{BucketMask, TriggerInfo};

use crate::{DaySet, Rule};
use std::ops::Range;
use time_window::TimeWindow;

/// Longest sign text parsed in full; longer input is parsed on its prefix.
pub(crate) const DEFAULT_MAX_TEXT_LEN: usize = 500;

const BASE_POINTS: i32 = 50;
const TIME_WINDOW_POINTS: i32 = 25;
const MALFORMED_TIME_PENALTY: i32 = 20;
const DAY_POINTS: i32 = 15;
const FULLY_CONSUMED_POINTS: i32 = 10;

/// Normalized sign text with consumed spans blanked out.
#[derive(Debug, Clone)]
pub(crate) struct Scratch {
    text: String,
}

impl Scratch {
    pub(crate) fn new(normalized: String) -> Self {
        Scratch { text: normalized }
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.text
    }

    /// Mark `span` as accounted for.
    ///
    /// The buffer is ASCII after normalization, so replacing bytes with
    /// spaces keeps every other offset valid.
    pub(crate) fn consume(&mut self, span: Range<usize>) {
        let blank = " ".repeat(span.len());
        self.text.replace_range(span, &blank);
    }

    /// True when only separators remain.
    pub(crate) fn is_exhausted(&self) -> bool {
        self.text.chars().all(|c| c.is_whitespace() || matches!(c, ',' | '&' | '-' | ':'))
    }

    pub(crate) fn leftover(&self) -> String {
        self.text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// Parse one regulation string with the default length limit.
///
/// # Example
/// ```
/// use curbside::{RuleType, parse};
///
/// let rule = parse("NO PARKING 8AM-6PM MON THRU FRI");
/// assert_eq!(rule.rule_type, RuleType::NoParking);
/// assert_eq!(rule.days.indices(), vec![0, 1, 2, 3, 4]);
/// ```
pub fn parse(text: &str) -> Rule {
    parse_limited(text, DEFAULT_MAX_TEXT_LEN)
}

pub(crate) fn parse_limited(text: &str, max_len: usize) -> Rule {
    let input = truncate_chars(text, max_len);
    if input.len() < text.len() {
        tracing::debug!(len = text.chars().count(), max_len, "regulation text truncated for parsing");
    }

    let mut scratch = Scratch::new(normalize(input));
    let triggers = TriggerInfo::scan(scratch.as_str());

    let Some(rule_type) = classify::classify(&mut scratch) else {
        tracing::debug!(text, "no restriction keyword, falling back to UNKNOWN");
        return Rule::unknown(text);
    };

    let mut points = BASE_POINTS;

    let mut time_range = None;
    if triggers.buckets.intersects(BucketMask::HAS_DIGITS | BucketMask::HAS_ANYTIME) {
        match time_window::extract(&mut scratch, triggers.buckets) {
            Some(TimeWindow::Range(range)) => {
                time_range = Some(range);
                points += TIME_WINDOW_POINTS;
            }
            Some(TimeWindow::Malformed) => points -= MALFORMED_TIME_PENALTY,
            Some(TimeWindow::Anytime) | None => {}
        }
    }

    let mut day_set = DaySet::empty();
    let mut exceptions = Vec::new();
    if triggers.buckets.contains(BucketMask::WEEKDAYISH) {
        if let Some(found) = days::extract(&mut scratch, triggers.buckets) {
            day_set = found.days;
            exceptions = found.exceptions;
            points += DAY_POINTS;
        }
    }

    if scratch.is_exhausted() {
        points += FULLY_CONSUMED_POINTS;
    } else {
        tracing::trace!(leftover = %scratch.leftover(), "unconsumed regulation text");
    }

    let confidence = f64::from(points.clamp(0, 100)) / 100.0;
    tracing::debug!(text, rule_type = rule_type.as_str(), confidence, "parsed regulation");

    Rule { original_text: text.to_string(), rule_type, days: day_set, time_range, exceptions, confidence }
}

fn truncate_chars(text: &str, max_len: usize) -> &str {
    match text.char_indices().nth(max_len) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
