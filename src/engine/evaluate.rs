//! Rule activity on a single instant.

use crate::{Rule, WallClock};

/// Is `rule` in force at the local wall-clock instant `at`?
///
/// ```text
/// UNKNOWN type                          -> inactive
/// days non-empty, weekday not in days   -> inactive
/// weekday in exceptions                 -> inactive
/// no time range                         -> active (all day)
/// start <= end                          -> start <= minute < end
/// start >  end (overnight)              -> minute >= start || minute < end
/// ```
pub fn is_active(rule: &Rule, at: WallClock) -> bool {
    if rule.is_unknown() {
        return false;
    }
    if !rule.days.is_empty() && !rule.days.contains_weekday(at.weekday) {
        return false;
    }
    if rule.exceptions.contains(&at.weekday) {
        return false;
    }
    match rule.time_range {
        Some(range) => range.contains(at.minute),
        None => true,
    }
}
