use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::info;

use crate::db::repository;
use crate::error::AppError;
use crate::models::ClassSession;
use crate::services::schedule;

/// Expands every active timetable entry matching the date's weekday into one
/// class-session shell. The downstream attendance generator fans each shell
/// out into per-student records; its summation logic lives outside this
/// engine. The `(entry_id, section_id, period_id, day_of_week)` key is stable
/// until the entry is explicitly edited or deleted.
pub async fn sessions_for_date(
    db: &SqlitePool,
    date: NaiveDate,
) -> Result<Vec<ClassSession>, AppError> {
    let day_of_week = schedule::weekday_index(date);
    let entries = repository::fetch_day_entries(db, day_of_week).await?;
    let date = date.format("%Y-%m-%d").to_string();

    let sessions: Vec<ClassSession> = entries
        .into_iter()
        .map(|entry| ClassSession {
            entry_id: entry.id,
            date: date.clone(),
            day_of_week: entry.day_of_week,
            section_id: entry.section_id,
            section_name: entry.section_name,
            subject_id: entry.subject_id,
            subject_name: entry.subject_name,
            teacher_id: entry.teacher_id,
            period_id: entry.period_id,
            period_name: entry.period_name,
            start_time: entry.start_time,
            end_time: entry.end_time,
            campus_id: entry.campus_id,
        })
        .collect();

    info!(%date, day_of_week, count = sessions.len(), "expanded class sessions");
    Ok(sessions)
}
