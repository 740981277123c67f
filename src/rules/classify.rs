//! Restriction keyword cascade.
//!
//! Sign text often mentions several restriction kinds at once ("NO PARKING
//! ... STREET CLEANING"), so the first keyword in *priority* order wins, not
//! the first one in reading order:
//!
//! ```text
//! NO STANDING -> NO STOPPING -> NO PARKING -> STREET CLEANING -> METER -> HOUR PARKING
//! ```
//!
//! `HOUR PARKING` ("2 HOUR PARKING 9AM-7PM") is the time-limited form the
//! upstream feeds use for metered blocks. A duration prefix (`1 HR`,
//! `2 HOUR`) is consumed with the meter keywords.
//!
//! All keyword phrases present are consumed, winner or not: a secondary
//! keyword is understood text, not leftover noise.

use super::Scratch;
use crate::RuleType;
use regex::Regex;

fn cascade() -> [(RuleType, &'static Regex); 6] {
    [
        (RuleType::NoStanding, regex!(r"\bNO STANDING\b")),
        (RuleType::NoStopping, regex!(r"\bNO STOPPING\b")),
        (RuleType::NoParking, regex!(r"\bNO PARKING\b")),
        (RuleType::StreetCleaning, regex!(r"\bSTREET CLEANING\b")),
        (RuleType::Metered, regex!(r"(?:\b\d+ ?(?:HOURS?|HRS?) )?(?:MUNI-?)?METER(?:ED|S)?(?: PARKING\b)?")),
        (RuleType::Metered, regex!(r"(?:\b\d+ ?)?\b(?:HOURS?|HRS?) PARKING\b")),
    ]
}

/// Classify the sign and consume every keyword phrase found.
///
/// Returns `None` when no restriction keyword is present.
pub(crate) fn classify(scratch: &mut Scratch) -> Option<RuleType> {
    let mut winner = None;

    for (rule_type, pattern) in cascade() {
        let spans: Vec<_> = pattern.find_iter(scratch.as_str()).map(|m| m.range()).collect();
        if spans.is_empty() {
            continue;
        }
        winner.get_or_insert(rule_type);
        for span in spans {
            scratch.consume(span);
        }
    }

    winner
}
