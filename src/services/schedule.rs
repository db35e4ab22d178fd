use chrono::{Datelike, NaiveDate, NaiveTime};
use sqlx::SqlitePool;

use crate::db::repository;
use crate::error::AppError;
use crate::models::{SubjectOption, TimetableEntryView};

/// Monday-first day index for a calendar date (0 = Monday .. 6 = Sunday),
/// the domain timetable entries are keyed in.
pub fn weekday_index(date: NaiveDate) -> i64 {
    i64::from(date.weekday().num_days_from_monday())
}

fn clock_label(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Full week grid for a section, ordered by day then period sort order.
pub async fn by_section(
    db: &SqlitePool,
    section_id: &str,
    academic_year_id: &str,
) -> Result<Vec<TimetableEntryView>, AppError> {
    repository::find_section(db, section_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("section {section_id}")))?;

    Ok(repository::fetch_section_schedule(db, section_id, academic_year_id).await?)
}

/// Week grid for one teacher across every campus they teach at.
pub async fn by_teacher(
    db: &SqlitePool,
    teacher_id: &str,
    academic_year_id: &str,
) -> Result<Vec<TimetableEntryView>, AppError> {
    repository::find_teacher(db, teacher_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("teacher {teacher_id}")))?;

    Ok(repository::fetch_teacher_schedule(db, teacher_id, academic_year_id).await?)
}

/// The class the teacher is in right now, if any: the period whose
/// [start, end) window contains `now` on the given day. Returns the first
/// match by start time if the period calendar is malformed with overlaps.
pub async fn current_class(
    db: &SqlitePool,
    teacher_id: &str,
    academic_year_id: &str,
    day_of_week: i64,
    now: NaiveTime,
) -> Result<Option<TimetableEntryView>, AppError> {
    let now = clock_label(now);
    Ok(repository::fetch_class_at(db, teacher_id, academic_year_id, day_of_week, &now).await?)
}

/// The teacher's next class today: smallest start time strictly after `now`.
/// No roll-over to the next day; callers re-query for tomorrow.
pub async fn next_class(
    db: &SqlitePool,
    teacher_id: &str,
    academic_year_id: &str,
    day_of_week: i64,
    now: NaiveTime,
) -> Result<Option<TimetableEntryView>, AppError> {
    let now = clock_label(now);
    Ok(repository::fetch_class_after(db, teacher_id, academic_year_id, day_of_week, &now).await?)
}

/// Subjects the section may legally schedule, derived from existing
/// teacher-subject assignments. Soft guidance for the admin UI; the store
/// does not enforce it.
pub async fn available_subjects(
    db: &SqlitePool,
    section_id: &str,
    academic_year_id: &str,
) -> Result<Vec<SubjectOption>, AppError> {
    repository::find_section(db, section_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("section {section_id}")))?;

    Ok(repository::fetch_available_subjects(db, section_id, academic_year_id).await?)
}
