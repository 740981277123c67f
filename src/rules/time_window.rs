//! Daily time-window extraction.
//!
//! Recognized shapes (after normalization):
//!
//! ```text
//! 8AM-6PM        7:30AM-9:30AM     10PM-6AM (overnight)
//! 8AM TO 6PM     12PM-12AM         8-6PM    (meridiem inferred)
//! ANYTIME        (explicit all-day, no window)
//! ```
//!
//! A missing meridiem on the first bound is inferred only when the second
//! bound is PM and the first hour, read literally, is earlier than the second
//! bound in 24h terms (`8-6PM` -> 08:00-18:00, `12-6PM` -> 12:00-18:00).
//! Anything else clock-like that does not form a complete window (a lone
//! `8AM`, `8AM-6`, `13PM-2PM`) is malformed: the window stays unset and the
//! parser lowers its confidence.

use super::{BucketMask, Scratch};
use crate::TimeRange;
use regex::Captures;

/// Outcome of a successful time-window search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimeWindow {
    Range(TimeRange),
    Anytime,
    Malformed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    fn from_text(text: &str) -> Option<Self> {
        match text {
            "AM" => Some(Meridiem::Am),
            "PM" => Some(Meridiem::Pm),
            _ => None,
        }
    }
}

/// A 12-hour clock reading, minutes optional.
#[derive(Debug, Clone, Copy)]
struct ClockBound {
    hour: u16,
    minute: u16,
    meridiem: Option<Meridiem>,
}

impl ClockBound {
    fn from_captures(caps: &Captures<'_>, hour: usize, minute: usize, meridiem: usize) -> Option<Self> {
        let hour: u16 = caps.get(hour)?.as_str().parse().ok()?;
        let minute: u16 = match caps.get(minute) {
            Some(m) => m.as_str().parse().ok()?,
            None => 0,
        };
        if !(1..=12).contains(&hour) || minute > 59 {
            return None;
        }
        Some(ClockBound { hour, minute, meridiem: caps.get(meridiem).and_then(|m| Meridiem::from_text(m.as_str())) })
    }

    /// Minutes since midnight when the meridiem is known.
    fn to_minutes(self) -> Option<u16> {
        let hour = match (self.meridiem?, self.hour) {
            (Meridiem::Am, 12) => 0,
            (Meridiem::Am, h) => h,
            (Meridiem::Pm, 12) => 12,
            (Meridiem::Pm, h) => h + 12,
        };
        Some(hour * 60 + self.minute)
    }
}

/// Search for a time window and consume what was recognized.
///
/// Returns `None` when the text carries no clock information at all.
pub(crate) fn extract(scratch: &mut Scratch, buckets: BucketMask) -> Option<TimeWindow> {
    let window = regex!(r"\b(\d{1,2})(?::(\d{2}))?(AM|PM)?(?:-| TO )(\d{1,2})(?::(\d{2}))?(AM|PM)?\b");

    if let Some(caps) = window.captures(scratch.as_str()) {
        let span = caps.get(0)?.range();
        let range = resolve_window(&caps);
        scratch.consume(span);
        return Some(match range {
            Some(range) => TimeWindow::Range(range),
            None => {
                tracing::trace!("malformed time window");
                TimeWindow::Malformed
            }
        });
    }

    if buckets.contains(BucketMask::HAS_AMPM) {
        let lone = regex!(r"\b\d{1,2}(?::\d{2})?(?:AM|PM)\b");
        if let Some((span, bound)) = lone.find(scratch.as_str()).map(|m| (m.range(), m.as_str().to_string())) {
            scratch.consume(span);
            tracing::trace!(bound, "time window with a single bound");
            return Some(TimeWindow::Malformed);
        }
    }

    if buckets.contains(BucketMask::HAS_ANYTIME) {
        if let Some(span) = regex!(r"\bANYTIME\b").find(scratch.as_str()).map(|m| m.range()) {
            scratch.consume(span);
            return Some(TimeWindow::Anytime);
        }
    }

    None
}

fn resolve_window(caps: &Captures<'_>) -> Option<TimeRange> {
    let first = ClockBound::from_captures(caps, 1, 2, 3)?;
    let second = ClockBound::from_captures(caps, 4, 5, 6)?;
    let end = second.to_minutes()?;

    let start = match first.meridiem {
        Some(_) => first.to_minutes()?,
        None => {
            let literal = first.hour * 60 + first.minute;
            if second.meridiem == Some(Meridiem::Pm) && literal < end {
                literal
            } else {
                return None;
            }
        }
    };

    TimeRange::new(start, end)
}
