//! Serde field adapters for the JSON wire forms.
//!
//! ```text
//! days         DaySet            <-> [0,1,2,3,4]
//! exceptions   Vec<Weekday>      <-> [6]
//! time_range   Option<TimeRange> <-> ["08:00:00","18:00:00"] | null
//! next_change  Option<DateTime>  <-> "2024-01-15T18:00:00Z" | null
//! ```

use chrono::Weekday;

fn weekday_from_index(idx: u8) -> Option<Weekday> {
    Weekday::try_from(idx).ok()
}

pub(crate) mod day_set {
    use crate::DaySet;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(days: &DaySet, s: S) -> Result<S::Ok, S::Error> {
        days.indices().serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DaySet, D::Error> {
        let raw = Vec::<u8>::deserialize(d)?;
        raw.into_iter().try_fold(DaySet::empty(), |acc, idx| {
            DaySet::from_index(idx).map(|day| acc | day).ok_or_else(|| D::Error::custom(format!("invalid weekday {idx}")))
        })
    }
}

pub(crate) mod weekdays {
    use chrono::Weekday;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(days: &[Weekday], s: S) -> Result<S::Ok, S::Error> {
        let idx: Vec<u8> = days.iter().map(|d| d.num_days_from_monday() as u8).collect();
        idx.serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Weekday>, D::Error> {
        let raw = Vec::<u8>::deserialize(d)?;
        let mut out = Vec::with_capacity(raw.len());
        for idx in raw {
            let day = super::weekday_from_index(idx).ok_or_else(|| D::Error::custom(format!("invalid weekday {idx}")))?;
            if !out.contains(&day) {
                out.push(day);
            }
        }
        Ok(out)
    }
}

pub(crate) mod time_range {
    use crate::TimeRange;
    use chrono::{NaiveTime, Timelike};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    fn format_minute(minute: u16) -> String {
        format!("{:02}:{:02}:00", minute / 60, minute % 60)
    }

    fn parse_minute(text: &str) -> Option<u16> {
        let time = NaiveTime::parse_from_str(text, "%H:%M:%S").or_else(|_| NaiveTime::parse_from_str(text, "%H:%M")).ok()?;
        Some((time.hour() * 60 + time.minute()) as u16)
    }

    pub fn serialize<S: Serializer>(range: &Option<TimeRange>, s: S) -> Result<S::Ok, S::Error> {
        range.map(|r| [format_minute(r.start), format_minute(r.end)]).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<TimeRange>, D::Error> {
        let Some([start, end]) = Option::<[String; 2]>::deserialize(d)? else {
            return Ok(None);
        };
        let start = parse_minute(&start).ok_or_else(|| D::Error::custom(format!("invalid time '{start}'")))?;
        let end = parse_minute(&end).ok_or_else(|| D::Error::custom(format!("invalid time '{end}'")))?;
        TimeRange::new(start, end).map(Some).ok_or_else(|| D::Error::custom("time range out of bounds"))
    }
}

pub(crate) mod utc_timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(ts: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error> {
        ts.map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true)).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
        let Some(raw) = Option::<String>::deserialize(d)? else {
            return Ok(None);
        };
        DateTime::parse_from_rfc3339(&raw).map(|t| Some(t.with_timezone(&Utc))).map_err(D::Error::custom)
    }
}
