extern crate self as curbside;

#[macro_use]
mod macros;
mod api;
mod engine;
mod rules;
mod wire;

pub use api::{
    CurbSegment, Engine, GeoPoint, NearbyStatus, Options, RuleTrace, SegmentDetails, SegmentSource, evaluate_segment,
    evaluate_segment_verbose, parse_rule,
};
pub use engine::{CacheStats, EvalMetrics, is_active, resolve};
pub use rules::parse;

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

// --- Regulation model -------------------------------------------------------

/// Kind of restriction a sign imposes.
///
/// Variants compare by [`RuleType::restrictiveness`], not declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleType {
    NoParking,
    NoStanding,
    NoStopping,
    StreetCleaning,
    Metered,
    Unknown,
}

impl RuleType {
    /// Rank used for "most restrictive wins" (higher = more restrictive).
    ///
    /// ```text
    /// NO_STANDING > NO_STOPPING > NO_PARKING > STREET_CLEANING > METERED > UNKNOWN
    /// ```
    pub fn restrictiveness(self) -> u8 {
        match self {
            RuleType::NoStanding => 5,
            RuleType::NoStopping => 4,
            RuleType::NoParking => 3,
            RuleType::StreetCleaning => 2,
            RuleType::Metered => 1,
            RuleType::Unknown => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RuleType::NoParking => "NO_PARKING",
            RuleType::NoStanding => "NO_STANDING",
            RuleType::NoStopping => "NO_STOPPING",
            RuleType::StreetCleaning => "STREET_CLEANING",
            RuleType::Metered => "METERED",
            RuleType::Unknown => "UNKNOWN",
        }
    }
}

bitflags::bitflags! {
    /// Set of weekdays a rule applies to. Empty means "every day".
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DaySet: u8 {
        const MON = 1 << 0;
        const TUE = 1 << 1;
        const WED = 1 << 2;
        const THU = 1 << 3;
        const FRI = 1 << 4;
        const SAT = 1 << 5;
        const SUN = 1 << 6;
    }
}

impl DaySet {
    /// Single-day set for a weekday index (0 = Monday .. 6 = Sunday).
    pub fn from_index(idx: u8) -> Option<Self> {
        if idx < 7 { Self::from_bits(1 << idx) } else { None }
    }

    pub fn from_weekday(day: Weekday) -> Self {
        Self::from_bits_truncate(1 << day.num_days_from_monday())
    }

    /// Inclusive span `from..=to`, wrapping past Sunday when `to < from`.
    pub fn span(from: Weekday, to: Weekday) -> Self {
        let mut set = Self::empty();
        let mut day = from;
        loop {
            set |= Self::from_weekday(day);
            if day == to {
                break;
            }
            day = day.succ();
        }
        set
    }

    pub fn contains_weekday(&self, day: Weekday) -> bool {
        self.contains(Self::from_weekday(day))
    }

    /// Weekday indices in ascending order.
    pub fn indices(&self) -> Vec<u8> {
        (0u8..7).filter(|i| self.bits() & (1 << i) != 0).collect()
    }
}

/// Daily time window in local wall-clock minutes since midnight.
///
/// `end < start` is an overnight window that wraps through midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeRange {
    pub start: u16,
    pub end: u16,
}

impl TimeRange {
    pub const MINUTES_PER_DAY: u16 = 24 * 60;

    pub fn new(start: u16, end: u16) -> Option<Self> {
        if start < Self::MINUTES_PER_DAY && end < Self::MINUTES_PER_DAY { Some(Self { start, end }) } else { None }
    }

    pub fn is_overnight(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, minute: u16) -> bool {
        if self.start <= self.end {
            self.start <= minute && minute < self.end
        } else {
            minute >= self.start || minute < self.end
        }
    }
}

/// One parsed regulation.
///
/// Rules are built once per distinct sign text and are read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Source string, verbatim.
    pub original_text: String,
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    #[serde(with = "wire::day_set")]
    pub days: DaySet,
    #[serde(with = "wire::time_range")]
    pub time_range: Option<TimeRange>,
    /// Explicitly excluded weekdays, in order of appearance, without duplicates.
    #[serde(with = "wire::weekdays")]
    pub exceptions: Vec<Weekday>,
    pub confidence: f64,
}

impl Rule {
    /// Fallback for text the parser cannot classify.
    pub fn unknown(original_text: impl Into<String>) -> Self {
        Rule {
            original_text: original_text.into(),
            rule_type: RuleType::Unknown,
            days: DaySet::empty(),
            time_range: None,
            exceptions: Vec::new(),
            confidence: 0.1,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.rule_type == RuleType::Unknown
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

// --- Evaluation model -------------------------------------------------------

/// A local wall-clock instant as seen by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WallClock {
    pub weekday: Weekday,
    /// Minutes since local midnight (`0..1440`).
    pub minute: u16,
}

impl WallClock {
    /// `None` unless `hour < 24` and `minute < 60`.
    pub fn new(weekday: Weekday, hour: u32, minute: u32) -> Option<Self> {
        if hour < 24 && minute < 60 { Some(WallClock { weekday, minute: (hour * 60 + minute) as u16 }) } else { None }
    }
}

impl From<NaiveDateTime> for WallClock {
    fn from(local: NaiveDateTime) -> Self {
        WallClock { weekday: local.weekday(), minute: (local.hour() * 60 + local.minute()) as u16 }
    }
}

/// Resolved parking permission state for a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Allowed,
    NoParking,
    NoStanding,
    NoStopping,
    StreetCleaning,
    Metered,
    Unknown,
}

impl From<RuleType> for Status {
    fn from(rule_type: RuleType) -> Self {
        match rule_type {
            RuleType::NoParking => Status::NoParking,
            RuleType::NoStanding => Status::NoStanding,
            RuleType::NoStopping => Status::NoStopping,
            RuleType::StreetCleaning => Status::StreetCleaning,
            RuleType::Metered => Status::Metered,
            RuleType::Unknown => Status::Unknown,
        }
    }
}

impl Status {
    pub fn color(self) -> Color {
        match self {
            Status::NoParking | Status::NoStanding | Status::NoStopping | Status::StreetCleaning => Color::Red,
            Status::Metered => Color::Blue,
            Status::Allowed => Color::Green,
            Status::Unknown => Color::Gray,
        }
    }

    pub fn is_allowed(self) -> bool {
        self == Status::Allowed
    }
}

/// Display color for a status.
///
/// `Yellow` is never produced by [`Status::color`]; callers use it to ask the
/// driver to check the sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Green,
    Red,
    Blue,
    Yellow,
    Gray,
}

/// Engine output for one segment at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResult {
    pub status: Status,
    pub color: Color,
    /// Next instant the status differs. `None` means the current status is
    /// effectively permanent within the search horizon.
    #[serde(with = "wire::utc_timestamp")]
    pub next_change: Option<chrono::DateTime<chrono::Utc>>,
    pub confidence: f64,
}

impl StatusResult {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wall_clock_rejects_out_of_range_input() {
        assert_eq!(WallClock::new(Weekday::Mon, 23, 59).map(|c| c.minute), Some(1439));
        assert_eq!(WallClock::new(Weekday::Mon, 0, 0).map(|c| c.minute), Some(0));
        assert_eq!(WallClock::new(Weekday::Mon, 24, 0), None);
        assert_eq!(WallClock::new(Weekday::Mon, 8, 60), None);
        assert_eq!(WallClock::new(Weekday::Mon, u32::MAX, 0), None);
    }
}
