//! Schedule entry persistence
//!
//! Entries are always written through [`normalize_entries`], which derives
//! the overnight flag and enforces one regular plus one holiday entry per day.

use std::collections::HashSet;

use shared::error::{AppError, ErrorCode};
use shared::models::{ScheduleEntry, ScheduleEntryInput};
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::hours::is_overnight;

/// Validate owner input and turn it into rows for `profile_id`
pub fn normalize_entries(
    profile_id: i64,
    inputs: Vec<ScheduleEntryInput>,
) -> Result<Vec<ScheduleEntry>, AppError> {
    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(inputs.len());

    for (index, input) in inputs.into_iter().enumerate() {
        if !(0..=6).contains(&input.day_of_week) {
            return Err(AppError::with_message(
                ErrorCode::ScheduleInvalid,
                "day_of_week must be between 0 (Monday) and 6 (Sunday)",
            )
            .with_detail("field", format!("[{index}].day_of_week"))
            .with_detail("value", input.day_of_week));
        }
        if !seen.insert((input.day_of_week, input.is_holiday)) {
            return Err(AppError::new(ErrorCode::ScheduleDuplicateDay)
                .with_detail("day_of_week", input.day_of_week)
                .with_detail("is_holiday", input.is_holiday));
        }

        entries.push(ScheduleEntry {
            id: shared::util::snowflake_id(),
            profile_id,
            day_of_week: input.day_of_week,
            opening_time: input.opening_time,
            closing_time: input.closing_time,
            is_open: input.is_open,
            is_holiday: input.is_holiday,
            next_day_closing: is_overnight(input.opening_time, input.closing_time),
        });
    }

    entries.sort_by_key(|e| (e.day_of_week, e.is_holiday));
    Ok(entries)
}

pub async fn list<'e, E>(executor: E, profile_id: i64) -> Result<Vec<ScheduleEntry>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        "SELECT * FROM schedule_entries WHERE profile_id = ?1 ORDER BY day_of_week, is_holiday",
    )
    .bind(profile_id)
    .fetch_all(executor)
    .await
}

/// Replace every schedule entry of a profile in one transaction
pub async fn replace(
    pool: &SqlitePool,
    profile_id: i64,
    entries: &[ScheduleEntry],
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM schedule_entries WHERE profile_id = ?1")
        .bind(profile_id)
        .execute(&mut *tx)
        .await?;

    for entry in entries {
        sqlx::query(
            "INSERT INTO schedule_entries (
                id, profile_id, day_of_week, opening_time, closing_time,
                is_open, is_holiday, next_day_closing
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(entry.id)
        .bind(profile_id)
        .bind(entry.day_of_week)
        .bind(entry.opening_time)
        .bind(entry.closing_time)
        .bind(entry.is_open)
        .bind(entry.is_holiday)
        .bind(entry.next_day_closing)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}
