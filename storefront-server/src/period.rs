//! Reporting periods evaluated in a store's local calendar

use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate, TimeZone};
use chrono_tz::Tz;
use shared::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Today,
    /// The last 7 days plus today
    Week,
    /// The last 30 days plus today
    Month,
    /// The previous calendar month
    LastMonth,
    All,
    Custom,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Week => "week",
            Self::Month => "month",
            Self::LastMonth => "last_month",
            Self::All => "all",
            Self::Custom => "custom",
        }
    }
}

impl FromStr for Period {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "today" => Ok(Self::Today),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "last_month" | "lastMonth" => Ok(Self::LastMonth),
            "all" => Ok(Self::All),
            "custom" => Ok(Self::Custom),
            other => Err(AppError::invalid_field(
                "period",
                format!("unknown period '{other}'"),
            )),
        }
    }
}

/// Inclusive range of local calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// `[from, to)` bounds in Unix millis for the local days of the range
    pub fn to_millis(&self, tz: Tz) -> (i64, i64) {
        let next = self.end.checked_add_days(Days::new(1)).unwrap_or(self.end);
        (local_midnight_millis(self.start, tz), local_midnight_millis(next, tz))
    }
}

/// Unix millis of the first instant of `date` in `tz`
pub fn local_midnight_millis(date: NaiveDate, tz: Tz) -> i64 {
    let midnight = date.and_hms_opt(0, 0, 0).unwrap_or_default();
    // DST gaps at midnight resolve to the earliest valid instant
    tz.from_local_datetime(&midnight)
        .earliest()
        .unwrap_or_else(|| tz.from_utc_datetime(&midnight))
        .timestamp_millis()
}

fn days_before(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(days)).unwrap_or(date)
}

/// Resolve a period to its local date range; `None` means unbounded
pub fn resolve(
    period: Period,
    today: NaiveDate,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<Option<DateRange>, AppError> {
    let range = match period {
        Period::Today => DateRange::day(today),
        Period::Week => DateRange {
            start: days_before(today, 7),
            end: today,
        },
        Period::Month => DateRange {
            start: days_before(today, 30),
            end: today,
        },
        Period::LastMonth => {
            let first_of_month = today.with_day(1).unwrap_or(today);
            let end = days_before(first_of_month, 1);
            DateRange {
                start: end.with_day(1).unwrap_or(end),
                end,
            }
        }
        Period::All => return Ok(None),
        Period::Custom => {
            let start = start
                .ok_or_else(|| AppError::invalid_field("start", "start is required for custom periods"))?;
            let end =
                end.ok_or_else(|| AppError::invalid_field("end", "end is required for custom periods"))?;
            if end < start {
                return Err(AppError::invalid_field("end", "end must not be before start"));
            }
            DateRange { start, end }
        }
    };
    Ok(Some(range))
}
