use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::repository;
use crate::error::AppError;
use crate::models::{NewEntryRequest, TimetableEntry, TimetableEntryView, UpdateEntryRequest};
use crate::services::{conflict, hierarchy};

fn validate_day_of_week(day: i64) -> Result<(), AppError> {
    if !(0..=6).contains(&day) {
        return Err(AppError::Validation(format!(
            "day_of_week must be 0 (Monday) through 6 (Sunday), got {day}"
        )));
    }
    Ok(())
}

fn require_non_blank(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} must not be blank")));
    }
    Ok(())
}

/// Creates a timetable entry. The campus is derived from the section's own
/// organizational unit and the main school from the campus; the caller's
/// school/campus hints are advisory only. Conflict check and insert run in one
/// transaction so two concurrent creates cannot both pass the check.
pub async fn create_entry(
    db: &SqlitePool,
    req: NewEntryRequest,
) -> Result<TimetableEntryView, AppError> {
    validate_day_of_week(req.day_of_week)?;
    require_non_blank(&req.section_id, "section_id")?;
    require_non_blank(&req.subject_id, "subject_id")?;
    require_non_blank(&req.teacher_id, "teacher_id")?;
    require_non_blank(&req.period_id, "period_id")?;
    require_non_blank(&req.academic_year_id, "academic_year_id")?;
    require_non_blank(&req.created_by, "created_by")?;

    let section = repository::find_section(db, &req.section_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("section {}", req.section_id)))?;

    // Sections are the source of truth for "where" the class occurs.
    let campus_id = section.org_unit_id;
    let main_school_id = hierarchy::resolve_main_school(db, &campus_id).await?;

    if let Some(hint) = req.school_id.as_deref() {
        if hint != main_school_id {
            warn!(
                section_id = %req.section_id,
                hint,
                resolved = %main_school_id,
                "ignoring caller school hint, using resolved main school"
            );
        }
    }

    repository::find_teacher(db, &req.teacher_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("teacher {}", req.teacher_id)))?;
    repository::find_subject(db, &req.subject_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("subject {}", req.subject_id)))?;
    repository::find_period(db, &req.period_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("period {}", req.period_id)))?;
    repository::find_academic_year(db, &req.academic_year_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("academic year {}", req.academic_year_id)))?;

    let mut tx = db.begin().await?;

    let check = conflict::check_conflict(
        &mut *tx,
        &req.teacher_id,
        req.day_of_week,
        &req.period_id,
        &req.academic_year_id,
        None,
    )
    .await?;
    if check.has_conflict {
        return Err(AppError::Conflict(
            check.conflict_details.unwrap_or_else(|| "slot already taken".to_string()),
        ));
    }

    let now = Utc::now().to_rfc3339();
    let entry = TimetableEntry {
        id: Uuid::new_v4().to_string(),
        main_school_id,
        campus_id,
        academic_year_id: req.academic_year_id,
        section_id: req.section_id,
        subject_id: req.subject_id,
        teacher_id: req.teacher_id,
        period_id: req.period_id,
        day_of_week: req.day_of_week,
        room_number: req.room_number,
        is_active: true,
        created_by: req.created_by,
        created_at: now.clone(),
        updated_at: now,
    };
    repository::insert_entry(&mut *tx, &entry).await?;
    tx.commit().await?;

    info!(
        entry_id = %entry.id,
        teacher_id = %entry.teacher_id,
        day_of_week = entry.day_of_week,
        "timetable entry created"
    );

    repository::fetch_entry_view(db, &entry.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("timetable entry {}", entry.id)))
}

/// Partial update. When the update touches the slot tuple (teacher, day,
/// period) or reactivates the entry, the conflict check re-runs against the
/// effective post-update values, excluding the entry itself.
pub async fn update_entry(
    db: &SqlitePool,
    id: &str,
    req: UpdateEntryRequest,
) -> Result<TimetableEntryView, AppError> {
    let mut current = repository::find_entry(db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("timetable entry {id}")))?;

    let reactivating = req.is_active == Some(true) && !current.is_active;
    let slot_touched = req.teacher_id.is_some()
        || req.day_of_week.is_some()
        || req.period_id.is_some()
        || reactivating;

    if let Some(day) = req.day_of_week {
        validate_day_of_week(day)?;
        current.day_of_week = day;
    }
    if let Some(teacher_id) = req.teacher_id {
        repository::find_teacher(db, &teacher_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("teacher {teacher_id}")))?;
        current.teacher_id = teacher_id;
    }
    if let Some(subject_id) = req.subject_id {
        repository::find_subject(db, &subject_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("subject {subject_id}")))?;
        current.subject_id = subject_id;
    }
    if let Some(period_id) = req.period_id {
        repository::find_period(db, &period_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("period {period_id}")))?;
        current.period_id = period_id;
    }
    if let Some(room_number) = req.room_number {
        current.room_number = Some(room_number);
    }
    if let Some(is_active) = req.is_active {
        current.is_active = is_active;
    }
    current.updated_at = Utc::now().to_rfc3339();

    let mut tx = db.begin().await?;

    if slot_touched && current.is_active {
        let check = conflict::check_conflict(
            &mut *tx,
            &current.teacher_id,
            current.day_of_week,
            &current.period_id,
            &current.academic_year_id,
            Some(id),
        )
        .await?;
        if check.has_conflict {
            return Err(AppError::Conflict(
                check.conflict_details.unwrap_or_else(|| "slot already taken".to_string()),
            ));
        }
    }

    repository::update_entry(&mut *tx, &current).await?;
    tx.commit().await?;

    info!(entry_id = %id, "timetable entry updated");

    repository::fetch_entry_view(db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("timetable entry {id}")))
}

/// Unconditional hard delete. Unlike most of the surrounding admin app this is
/// not a soft delete: the vacated slot must be immediately reusable under the
/// active-slot unique index, and downstream consumers must not assume a
/// deleted entry id remains queryable.
pub async fn delete_entry(db: &SqlitePool, id: &str) -> Result<(), AppError> {
    let deleted = repository::delete_entry(db, id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("timetable entry {id}")));
    }
    info!(entry_id = %id, "timetable entry deleted");
    Ok(())
}
