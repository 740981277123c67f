use crate::rules::{parse, parse_limited};
use crate::{DaySet, RuleType, TimeRange};
use chrono::Weekday;

fn weekdays(days: &[u8]) -> DaySet {
    days.iter().filter_map(|i| DaySet::from_index(*i)).fold(DaySet::empty(), |acc, d| acc | d)
}

#[test]
fn parse_examples_matching() {
    // (input, type, days, time range, confidence)
    let cases: Vec<(&str, RuleType, &[u8], Option<(u16, u16)>, f64)> = vec![
        ("NO PARKING 8AM-6PM MON THRU FRI", RuleType::NoParking, &[0, 1, 2, 3, 4], Some((480, 1080)), 1.0),
        ("no parking 8 a.m. - 6 p.m. mon thru fri", RuleType::NoParking, &[0, 1, 2, 3, 4], Some((480, 1080)), 1.0),
        ("NO PARKING", RuleType::NoParking, &[], None, 0.6),
        ("NO STANDING 10PM-6AM", RuleType::NoStanding, &[], Some((1320, 360)), 0.85),
        ("NO STOPPING 7AM-10AM 4PM-7PM MON-FRI", RuleType::NoStopping, &[0, 1, 2, 3, 4], Some((420, 600)), 0.9),
        ("NO STANDING ANYTIME", RuleType::NoStanding, &[], None, 0.6),
        ("NO PARKING 11AM-12:30PM TUE & FRI STREET CLEANING", RuleType::NoParking, &[1, 4], Some((660, 750)), 1.0),
        (
            "NO PARKING (SANITATION BROOM SYMBOL) 8AM-9:30AM TUES",
            RuleType::NoParking,
            &[1],
            Some((480, 570)),
            0.9,
        ),
        ("STREET CLEANING 9AM-10:30AM MON, THU", RuleType::StreetCleaning, &[0, 3], Some((540, 630)), 1.0),
        ("1 HR METER", RuleType::Metered, &[], None, 0.6),
        ("METERED PARKING 9AM-7PM MON THRU SAT", RuleType::Metered, &[0, 1, 2, 3, 4, 5], Some((540, 1140)), 1.0),
        ("NO PARKING 8-6PM", RuleType::NoParking, &[], Some((480, 1080)), 0.85),
        ("NO PARKING 8-6AM", RuleType::NoParking, &[], None, 0.4),
        ("NO PARKING 8AM", RuleType::NoParking, &[], None, 0.4),
        ("NO PARKING NOON-MIDNIGHT SAT SUN", RuleType::NoParking, &[5, 6], Some((720, 0)), 1.0),
    ];

    for (input, ty, days, range, confidence) in cases {
        let rule = parse(input);
        assert_eq!(rule.original_text, input, "{input}");
        assert_eq!(rule.rule_type, ty, "{input}");
        assert_eq!(rule.days, weekdays(days), "{input}");
        assert_eq!(rule.time_range, range.and_then(|(s, e)| TimeRange::new(s, e)), "{input}");
        assert_eq!(rule.confidence, confidence, "{input}");
    }
}

#[test]
fn hour_parking_with_exception() {
    let rule = parse("2 HOUR PARKING 9AM-7PM EXCEPT SUNDAY");
    assert_eq!(rule.rule_type, RuleType::Metered);
    assert_eq!(rule.time_range, TimeRange::new(540, 1140));
    assert!(rule.days.is_empty());
    assert_eq!(rule.exceptions, vec![Weekday::Sun]);
    assert_eq!(rule.confidence, 1.0);
}

#[test]
fn holiday_exception_keeps_the_days_it_names() {
    let cases: Vec<(&str, &[u8], Vec<Weekday>)> = vec![
        ("NO PARKING 8AM-6PM EXCEPT HOLIDAYS & SUNDAYS", &[], vec![Weekday::Sun]),
        ("NO PARKING 8AM-6PM EXCEPT HOLIDAYS AND SAT & SUN", &[], vec![Weekday::Sat, Weekday::Sun]),
        ("NO STANDING 7AM-7PM MON THRU SAT EXCEPT HOLIDAY, SAT", &[0, 1, 2, 3, 4], vec![Weekday::Sat]),
    ];

    for (input, days, exceptions) in cases {
        let rule = parse(input);
        assert_eq!(rule.days, weekdays(days), "{input}");
        assert_eq!(rule.exceptions, exceptions, "{input}");
        // The holiday word itself stays unexplained.
        assert_eq!(rule.confidence, 0.9, "{input}");
    }
}

#[test]
fn unrecognized_text_is_unknown() {
    for input in ["", "   ", "BUS STOP", "8AM-6PM MON THRU FRI", "PARKING ALLOWED"] {
        let rule = parse(input);
        assert_eq!(rule.rule_type, RuleType::Unknown, "{input}");
        assert!(rule.days.is_empty(), "{input}");
        assert!(rule.time_range.is_none(), "{input}");
        assert!(rule.exceptions.is_empty(), "{input}");
        assert!(rule.confidence <= 0.3, "{input}");
        assert_eq!(rule.original_text, input);
    }
}

#[test]
fn sunday_exception_is_not_listed_twice() {
    let rule = parse("NO PARKING 8AM-6PM MON THRU FRI EXCEPT HOLIDAYS EXCEPT SUN EXCEPT SUNDAY");
    assert_eq!(rule.exceptions, vec![Weekday::Sun]);
    assert_eq!(rule.days, weekdays(&[0, 1, 2, 3, 4]));
}

#[test]
fn leftover_text_costs_the_completeness_bonus() {
    let full = parse("NO PARKING 8AM-6PM MON THRU FRI");
    let noisy = parse("NO PARKING 8AM-6PM MON THRU FRI EXCEPT HOLIDAYS");
    assert_eq!(full.confidence, 1.0);
    assert_eq!(noisy.confidence, 0.9);
}

#[test]
fn confidence_is_monotonic_in_evidence() {
    let full = parse("NO PARKING 8AM-6PM MON THRU FRI").confidence;
    let bare = parse("NO PARKING").confidence;
    let empty = parse("").confidence;
    assert!(full >= bare);
    assert!(bare >= empty);
}

#[test]
fn confidence_stays_in_unit_interval() {
    for input in ["NO PARKING 13PM-2PM 8AM", "NO STANDING", "STREET CLEANING x y z", "NO PARKING 8AM-6PM MON-FRI"] {
        let c = parse(input).confidence;
        assert!((0.0..=1.0).contains(&c), "{input}: {c}");
    }
}

#[test]
fn parsing_is_deterministic() {
    let text = "NO STANDING 7AM-7PM EXCEPT SAT & SUN";
    assert_eq!(parse(text), parse(text));
}

#[test]
fn long_text_is_parsed_on_its_prefix() {
    let text = format!("NO PARKING 8AM-6PM {}", "X".repeat(600));
    let rule = parse_limited(&text, 500);
    assert_eq!(rule.rule_type, RuleType::NoParking);
    assert_eq!(rule.time_range, TimeRange::new(480, 1080));
    assert_eq!(rule.original_text, text);

    let tail = format!("{} NO PARKING", "X ".repeat(300));
    assert_eq!(parse_limited(&tail, 500).rule_type, RuleType::Unknown);
}
