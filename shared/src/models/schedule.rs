//! Schedule Entry Model

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Weekly opening-hours entry of a store
///
/// `day_of_week` is 0 = Monday .. 6 = Sunday. An entry with
/// `next_day_closing` closes on the following calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ScheduleEntry {
    pub id: i64,
    pub profile_id: i64,
    pub day_of_week: i32,
    #[serde(with = "hhmm")]
    pub opening_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub closing_time: NaiveTime,
    pub is_open: bool,
    pub is_holiday: bool,
    pub next_day_closing: bool,
}

/// Schedule entry as submitted by the owner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntryInput {
    pub day_of_week: i32,
    #[serde(with = "hhmm")]
    pub opening_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub closing_time: NaiveTime,
    #[serde(default = "default_true")]
    pub is_open: bool,
    #[serde(default)]
    pub is_holiday: bool,
}

fn default_true() -> bool {
    true
}

/// `HH:MM` wire format for times; `HH:MM:SS` is accepted on input and the
/// seconds are dropped, so what is stored is what is served.
pub mod hhmm {
    use chrono::{NaiveTime, Timelike};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(time: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveTime::parse_from_str(&raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .ok()
            .and_then(|t| t.with_second(0))
            .ok_or_else(|| D::Error::custom(format!("invalid time '{raw}', expected HH:MM")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_accepts_both_time_formats() {
        let json = r#"{"day_of_week":4,"opening_time":"18:00","closing_time":"02:00:00"}"#;
        let input: ScheduleEntryInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.opening_time, NaiveTime::from_hms_opt(18, 0, 0).unwrap());
        assert_eq!(input.closing_time, NaiveTime::from_hms_opt(2, 0, 0).unwrap());
        assert!(input.is_open);
        assert!(!input.is_holiday);
    }

    #[test]
    fn test_input_drops_seconds() {
        let json = r#"{"day_of_week":1,"opening_time":"08:15:45","closing_time":"17:59:59"}"#;
        let input: ScheduleEntryInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.opening_time, NaiveTime::from_hms_opt(8, 15, 0).unwrap());
        assert_eq!(input.closing_time, NaiveTime::from_hms_opt(17, 59, 0).unwrap());
    }

    #[test]
    fn test_input_rejects_bad_time() {
        let json = r#"{"day_of_week":0,"opening_time":"25:00","closing_time":"02:00"}"#;
        assert!(serde_json::from_str::<ScheduleEntryInput>(json).is_err());
    }

    #[test]
    fn test_entry_serializes_hhmm() {
        let entry = ScheduleEntry {
            id: 1,
            profile_id: 1,
            day_of_week: 0,
            opening_time: NaiveTime::from_hms_opt(8, 30, 0).unwrap(),
            closing_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            is_open: true,
            is_holiday: false,
            next_day_closing: false,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["opening_time"], "08:30");
        assert_eq!(json["closing_time"], "18:00");
    }
}
