//! Weekday extraction.
//!
//! A *day phrase* is a run of weekday tokens joined by list separators
//! (`,`, `&`, `AND`, plain spaces) or range connectors (`THRU`, `THROUGH`,
//! `TO`, `-`). Ranges are inclusive and may wrap past Sunday:
//!
//! ```text
//! MON THRU FRI      -> Mon Tue Wed Thu Fri
//! TUE & FRI         -> Tue Fri
//! MON, WED, FRI     -> Mon Wed Fri
//! FRI-MON           -> Fri Sat Sun Mon
//! ```
//!
//! `EXCEPT <day phrase>` is read first and feeds `exceptions` instead; those
//! days are then removed from the rule's own day set when present. Exception
//! lists keep first-seen order and never repeat a day.

use super::{BucketMask, Scratch};
use crate::DaySet;
use chrono::Weekday;

/// Days recovered from a sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DayInfo {
    pub days: DaySet,
    pub exceptions: Vec<Weekday>,
}

fn weekday_from_token(token: &str) -> Option<Weekday> {
    let day = match token.get(..3)? {
        "MON" => Weekday::Mon,
        "TUE" => Weekday::Tue,
        "WED" => Weekday::Wed,
        "THU" => Weekday::Thu,
        "FRI" => Weekday::Fri,
        "SAT" => Weekday::Sat,
        "SUN" => Weekday::Sun,
        _ => return None,
    };
    Some(day)
}

/// Expand one day phrase into weekdays, in reading order, without repeats.
fn expand_phrase(phrase: &str) -> Vec<Weekday> {
    let tokens = regex!(
        r"\b(?:MON(?:DAYS?)?|TUE(?:S(?:DAYS?)?)?|WED(?:NESDAYS?)?|THU(?:RS?(?:DAYS?)?)?|FRI(?:DAYS?)?|SAT(?:URDAYS?)?|SUN(?:DAYS?)?)\b|\b(?:THRU|THROUGH|TO)\b|-"
    );

    let mut out: Vec<Weekday> = Vec::new();
    let mut last: Option<Weekday> = None;
    let mut ranging = false;

    for tok in tokens.find_iter(phrase).map(|m| m.as_str()) {
        let Some(day) = weekday_from_token(tok) else {
            ranging = last.is_some();
            continue;
        };

        let span: Vec<Weekday> = match (ranging, last) {
            (true, Some(from)) => {
                let mut span = Vec::new();
                let mut d = from;
                while d != day {
                    d = d.succ();
                    span.push(d);
                }
                span
            }
            _ => vec![day],
        };
        for d in span {
            if !out.contains(&d) {
                out.push(d);
            }
        }
        last = Some(day);
        ranging = false;
    }

    out
}

/// Pull exception and day phrases out of `scratch`.
///
/// Returns `None` when no weekday information was found.
pub(crate) fn extract(scratch: &mut Scratch, buckets: BucketMask) -> Option<DayInfo> {
    let mut exceptions: Vec<Weekday> = Vec::new();

    if buckets.contains(BucketMask::HAS_EXCEPT) {
        let except = regex!(
            r"\b(?P<kw>EXCEPT) (?:HOLIDAYS?(?: ?,| &| AND)? )?(?P<days>(?:MON(?:DAYS?)?|TUE(?:S(?:DAYS?)?)?|WED(?:NESDAYS?)?|THU(?:RS?(?:DAYS?)?)?|FRI(?:DAYS?)?|SAT(?:URDAYS?)?|SUN(?:DAYS?)?)\b(?:(?:, ?|-| ?& ?| (?:AND|THRU|THROUGH|TO) | )(?:MON(?:DAYS?)?|TUE(?:S(?:DAYS?)?)?|WED(?:NESDAYS?)?|THU(?:RS?(?:DAYS?)?)?|FRI(?:DAYS?)?|SAT(?:URDAYS?)?|SUN(?:DAYS?)?)\b)*)"
        );
        // A holiday word between EXCEPT and the days stays unconsumed.
        let found: Vec<_> = except
            .captures_iter(scratch.as_str())
            .filter_map(|caps| {
                let (kw, days) = (caps.name("kw")?, caps.name("days")?);
                Some((kw.range(), days.range(), days.as_str().to_string()))
            })
            .collect();
        for (kw, span, text) in found {
            for day in expand_phrase(&text) {
                if !exceptions.contains(&day) {
                    exceptions.push(day);
                }
            }
            scratch.consume(kw);
            scratch.consume(span);
        }
    }

    let phrase = regex!(
        r"\b(?:MON(?:DAYS?)?|TUE(?:S(?:DAYS?)?)?|WED(?:NESDAYS?)?|THU(?:RS?(?:DAYS?)?)?|FRI(?:DAYS?)?|SAT(?:URDAYS?)?|SUN(?:DAYS?)?)\b(?:(?:, ?|-| ?& ?| (?:AND|THRU|THROUGH|TO) | )(?:MON(?:DAYS?)?|TUE(?:S(?:DAYS?)?)?|WED(?:NESDAYS?)?|THU(?:RS?(?:DAYS?)?)?|FRI(?:DAYS?)?|SAT(?:URDAYS?)?|SUN(?:DAYS?)?)\b)*"
    );
    let found: Vec<_> = phrase.find_iter(scratch.as_str()).map(|m| (m.range(), m.as_str().to_string())).collect();

    let mut days = DaySet::empty();
    for (span, text) in found {
        for day in expand_phrase(&text) {
            days |= DaySet::from_weekday(day);
        }
        scratch.consume(span);
    }

    if days.is_empty() && exceptions.is_empty() {
        return None;
    }

    let mut remaining = days;
    for day in &exceptions {
        remaining.remove(DaySet::from_weekday(*day));
    }
    // An empty set means "every day", so never empty it by subtraction.
    if !remaining.is_empty() {
        days = remaining;
    }

    Some(DayInfo { days, exceptions })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{TriggerInfo, normalize};
    use chrono::Weekday::*;

    fn days_of(text: &str) -> Option<DayInfo> {
        let mut scratch = Scratch::new(normalize(text));
        let buckets = TriggerInfo::scan(scratch.as_str()).buckets;
        extract(&mut scratch, buckets)
    }

    fn set(days: &[Weekday]) -> DaySet {
        days.iter().fold(DaySet::empty(), |acc, d| acc | DaySet::from_weekday(*d))
    }

    #[test]
    fn ranges_expand_inclusively() {
        assert_eq!(days_of("MON THRU FRI").unwrap().days, set(&[Mon, Tue, Wed, Thu, Fri]));
        assert_eq!(days_of("MONDAY THROUGH FRIDAY").unwrap().days, set(&[Mon, Tue, Wed, Thu, Fri]));
        assert_eq!(days_of("TUE TO THURS").unwrap().days, set(&[Tue, Wed, Thu]));
        assert_eq!(days_of("MON-FRI").unwrap().days, set(&[Mon, Tue, Wed, Thu, Fri]));
    }

    #[test]
    fn ranges_wrap_past_sunday() {
        assert_eq!(days_of("FRI THRU MON").unwrap().days, set(&[Fri, Sat, Sun, Mon]));
    }

    #[test]
    fn lists_and_single_days() {
        assert_eq!(days_of("TUE & FRI").unwrap().days, set(&[Tue, Fri]));
        assert_eq!(days_of("MON, WED, FRI").unwrap().days, set(&[Mon, Wed, Fri]));
        assert_eq!(days_of("SAT AND SUN").unwrap().days, set(&[Sat, Sun]));
        assert_eq!(days_of("TUESDAYS").unwrap().days, set(&[Tue]));
    }

    #[test]
    fn except_clause_feeds_exceptions() {
        let info = days_of("EXCEPT SUNDAY").unwrap();
        assert!(info.days.is_empty());
        assert_eq!(info.exceptions, vec![Sun]);

        let info = days_of("EXCEPT SAT & SUN").unwrap();
        assert_eq!(info.exceptions, vec![Sat, Sun]);
    }

    #[test]
    fn exceptions_are_removed_from_days() {
        let info = days_of("MON THRU SAT EXCEPT WED").unwrap();
        assert_eq!(info.days, set(&[Mon, Tue, Thu, Fri, Sat]));
        assert_eq!(info.exceptions, vec![Wed]);
    }

    #[test]
    fn redundant_exception_is_a_noop() {
        let info = days_of("MON THRU FRI EXCEPT SUNDAY").unwrap();
        assert_eq!(info.days, set(&[Mon, Tue, Wed, Thu, Fri]));
        assert_eq!(info.exceptions, vec![Sun]);
    }

    #[test]
    fn repeated_exceptions_are_listed_once() {
        let info = days_of("EXCEPT SUN EXCEPT SUNDAY").unwrap();
        assert_eq!(info.exceptions, vec![Sun]);
    }

    #[test]
    fn excepting_every_listed_day_keeps_the_day_set() {
        let info = days_of("SUN EXCEPT SUN").unwrap();
        assert_eq!(info.days, set(&[Sun]));
        assert_eq!(info.exceptions, vec![Sun]);
    }

    #[test]
    fn no_days_is_none() {
        assert_eq!(days_of("8AM-6PM"), None);
        assert_eq!(days_of("EXCEPT HOLIDAYS"), None);
    }

    #[test]
    fn day_phrases_are_consumed() {
        let mut scratch = Scratch::new(normalize("NO PARKING MON THRU FRI EXCEPT HOLIDAYS"));
        let buckets = TriggerInfo::scan(scratch.as_str()).buckets;
        extract(&mut scratch, buckets);
        assert_eq!(scratch.leftover(), "NO PARKING EXCEPT HOLIDAYS");
    }

    #[test]
    fn days_after_an_except_holidays_word_are_exceptions() {
        let info = days_of("EXCEPT HOLIDAYS & SUNDAYS").unwrap();
        assert!(info.days.is_empty());
        assert_eq!(info.exceptions, vec![Sun]);

        let info = days_of("MON THRU SAT EXCEPT HOLIDAY AND SAT").unwrap();
        assert_eq!(info.days, set(&[Mon, Tue, Wed, Thu, Fri]));
        assert_eq!(info.exceptions, vec![Sat]);
    }
}
