//! Opening-hours evaluation
//!
//! Decides whether a store is open from its weekly schedule. Days are
//! numbered 0 = Monday .. 6 = Sunday. An overnight entry (closing time
//! before opening time) stays open past midnight into the next day.
//! Evaluation fails closed: no matching entry means closed.

use chrono::{DateTime, Datelike, NaiveTime, Utc};
use chrono_tz::Tz;
use shared::models::ScheduleEntry;

/// Whether the store is open at `as_of`, evaluated in the store's timezone
pub fn is_open(entries: &[ScheduleEntry], as_of: DateTime<Utc>, tz: Tz) -> bool {
    let local = as_of.with_timezone(&tz);
    is_open_at(
        entries,
        local.weekday().num_days_from_monday() as i32,
        local.time(),
    )
}

/// Whether any open entry covers local `weekday` and `time`
pub fn is_open_at(entries: &[ScheduleEntry], weekday: i32, time: NaiveTime) -> bool {
    entries
        .iter()
        .filter(|entry| entry.is_open)
        .any(|entry| entry_covers(entry, weekday, time))
}

fn entry_covers(entry: &ScheduleEntry, weekday: i32, time: NaiveTime) -> bool {
    if entry.next_day_closing {
        let opening_day = weekday == entry.day_of_week && time >= entry.opening_time;
        let following_day =
            weekday == (entry.day_of_week + 1) % 7 && time <= entry.closing_time;
        opening_day || following_day
    } else {
        weekday == entry.day_of_week
            && entry.opening_time <= time
            && time <= entry.closing_time
    }
}

/// An entry closes on the following day when it closes before it opens
pub fn is_overnight(opening_time: NaiveTime, closing_time: NaiveTime) -> bool {
    closing_time < opening_time
}

/// Parse an IANA timezone name
pub fn parse_timezone(name: &str) -> Option<Tz> {
    name.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn entry(day: i32, open: NaiveTime, close: NaiveTime) -> ScheduleEntry {
        ScheduleEntry {
            id: day as i64,
            profile_id: 1,
            day_of_week: day,
            opening_time: open,
            closing_time: close,
            is_open: true,
            is_holiday: false,
            next_day_closing: is_overnight(open, close),
        }
    }

    #[test]
    fn test_overnight_entry() {
        // Friday 08:00 until Saturday 02:00
        let entries = vec![entry(4, t(8, 0), t(2, 0))];
        assert!(entries[0].next_day_closing);

        assert!(is_open_at(&entries, 4, t(23, 0)));
        assert!(is_open_at(&entries, 5, t(1, 0)));
        assert!(!is_open_at(&entries, 5, t(3, 0)));
        assert!(!is_open_at(&entries, 4, t(7, 59)));
    }

    #[test]
    fn test_overnight_wraps_sunday_to_monday() {
        let entries = vec![entry(6, t(18, 0), t(1, 30))];
        assert!(is_open_at(&entries, 6, t(22, 0)));
        assert!(is_open_at(&entries, 0, t(1, 30)));
        assert!(!is_open_at(&entries, 0, t(1, 31)));
    }

    #[test]
    fn test_same_day_entry() {
        let entries = vec![entry(2, t(8, 0), t(18, 0))];
        assert!(is_open_at(&entries, 2, t(12, 0)));
        assert!(is_open_at(&entries, 2, t(8, 0)));
        assert!(is_open_at(&entries, 2, t(18, 0)));
        assert!(!is_open_at(&entries, 2, t(19, 0)));
        for other_day in [0, 1, 3, 4, 5, 6] {
            assert!(!is_open_at(&entries, other_day, t(12, 0)));
        }
    }

    #[test]
    fn test_fails_closed() {
        assert!(!is_open_at(&[], 0, t(12, 0)));

        let mut closed = entry(0, t(0, 0), t(23, 59));
        closed.is_open = false;
        assert!(!is_open_at(&[closed], 0, t(12, 0)));
    }

    #[test]
    fn test_any_entry_matches() {
        let entries = vec![entry(0, t(11, 0), t(14, 0)), entry(0, t(18, 0), t(23, 0))];
        assert!(is_open_at(&entries, 0, t(12, 0)));
        assert!(is_open_at(&entries, 0, t(20, 0)));
        assert!(!is_open_at(&entries, 0, t(16, 0)));
    }

    #[test]
    fn test_is_open_converts_to_local_time() {
        // Monday 12:00 to 15:00 in São Paulo (UTC-3)
        let entries = vec![entry(0, t(12, 0), t(15, 0))];
        let tz = parse_timezone("America/Sao_Paulo").unwrap();

        // 2025-03-03 is a Monday; 14:00 UTC is 11:00 local
        let before = Utc.with_ymd_and_hms(2025, 3, 3, 14, 0, 0).unwrap();
        assert!(!is_open(&entries, before, tz));

        // 16:00 UTC is 13:00 local
        let during = Utc.with_ymd_and_hms(2025, 3, 3, 16, 0, 0).unwrap();
        assert!(is_open(&entries, during, tz));
    }

    #[test]
    fn test_local_weekday_differs_from_utc() {
        // Sunday 22:00 local in São Paulo is Monday 01:00 UTC
        let entries = vec![entry(6, t(20, 0), t(23, 0))];
        let tz = parse_timezone("America/Sao_Paulo").unwrap();
        let instant = Utc.with_ymd_and_hms(2025, 3, 3, 1, 0, 0).unwrap();
        assert!(is_open(&entries, instant, tz));
    }

    #[test]
    fn test_parse_timezone() {
        assert!(parse_timezone("Europe/Lisbon").is_some());
        assert!(parse_timezone("Mars/Olympus").is_none());
    }
}
