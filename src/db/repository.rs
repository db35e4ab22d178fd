use sqlx::{Sqlite, SqlitePool};

use crate::models::{
    AcademicYear, OrgUnit, Period, Section, Subject, SubjectOption, Teacher, TimetableEntry,
    TimetableEntryView,
};

/// Shared SELECT for the joined entry view; callers append WHERE/ORDER BY.
const ENTRY_VIEW_SQL: &str = r#"
    SELECT
        e.id, e.main_school_id, e.campus_id, e.academic_year_id,
        e.section_id, s.name AS section_name,
        e.subject_id, sub.name AS subject_name,
        e.teacher_id, t.name AS teacher_name,
        e.period_id, p.name AS period_name, p.start_time, p.end_time,
        e.day_of_week, e.room_number, e.is_active
    FROM timetable_entries e
    JOIN sections s ON s.id = e.section_id
    JOIN subjects sub ON sub.id = e.subject_id
    JOIN teachers t ON t.id = e.teacher_id
    JOIN periods p ON p.id = e.period_id
"#;

pub async fn find_org_unit(db: &SqlitePool, id: &str) -> Result<Option<OrgUnit>, sqlx::Error> {
    sqlx::query_as::<_, OrgUnit>("SELECT id, name, parent_id FROM organizational_units WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn find_section(db: &SqlitePool, id: &str) -> Result<Option<Section>, sqlx::Error> {
    sqlx::query_as::<_, Section>(
        "SELECT id, name, grade_level, org_unit_id FROM sections WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn find_teacher(db: &SqlitePool, id: &str) -> Result<Option<Teacher>, sqlx::Error> {
    sqlx::query_as::<_, Teacher>("SELECT id, name FROM teachers WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn find_subject(db: &SqlitePool, id: &str) -> Result<Option<Subject>, sqlx::Error> {
    sqlx::query_as::<_, Subject>("SELECT id, name, code FROM subjects WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn find_period(db: &SqlitePool, id: &str) -> Result<Option<Period>, sqlx::Error> {
    sqlx::query_as::<_, Period>(
        "SELECT id, name, start_time, end_time, sort_order FROM periods WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn find_academic_year(
    db: &SqlitePool,
    id: &str,
) -> Result<Option<AcademicYear>, sqlx::Error> {
    sqlx::query_as::<_, AcademicYear>(
        "SELECT id, name, is_current FROM academic_years WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn find_current_academic_year(
    db: &SqlitePool,
) -> Result<Option<AcademicYear>, sqlx::Error> {
    sqlx::query_as::<_, AcademicYear>(
        "SELECT id, name, is_current FROM academic_years WHERE is_current = 1 LIMIT 1",
    )
    .fetch_optional(db)
    .await
}

/// Active entry already holding the slot, if any. Generic over the executor so
/// the write path can run it inside its open transaction.
pub async fn find_conflicting_entry<'e, E>(
    executor: E,
    teacher_id: &str,
    day_of_week: i64,
    period_id: &str,
    academic_year_id: &str,
    exclude_entry_id: Option<&str>,
) -> Result<Option<TimetableEntryView>, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "{ENTRY_VIEW_SQL}
        WHERE e.is_active = 1
          AND e.teacher_id = ?1
          AND e.day_of_week = ?2
          AND e.period_id = ?3
          AND e.academic_year_id = ?4
          AND (?5 IS NULL OR e.id != ?5)
        LIMIT 1"
    );
    sqlx::query_as::<_, TimetableEntryView>(&sql)
        .bind(teacher_id)
        .bind(day_of_week)
        .bind(period_id)
        .bind(academic_year_id)
        .bind(exclude_entry_id)
        .fetch_optional(executor)
        .await
}

pub async fn insert_entry<'e, E>(executor: E, entry: &TimetableEntry) -> Result<(), sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO timetable_entries
            (id, main_school_id, campus_id, academic_year_id, section_id, subject_id,
            teacher_id, period_id, day_of_week, room_number, is_active,
            created_by, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&entry.id)
    .bind(&entry.main_school_id)
    .bind(&entry.campus_id)
    .bind(&entry.academic_year_id)
    .bind(&entry.section_id)
    .bind(&entry.subject_id)
    .bind(&entry.teacher_id)
    .bind(&entry.period_id)
    .bind(entry.day_of_week)
    .bind(&entry.room_number)
    .bind(entry.is_active)
    .bind(&entry.created_by)
    .bind(&entry.created_at)
    .bind(&entry.updated_at)
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn update_entry<'e, E>(executor: E, entry: &TimetableEntry) -> Result<(), sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        UPDATE timetable_entries
        SET subject_id = ?, teacher_id = ?, period_id = ?, day_of_week = ?,
            room_number = ?, is_active = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&entry.subject_id)
    .bind(&entry.teacher_id)
    .bind(&entry.period_id)
    .bind(entry.day_of_week)
    .bind(&entry.room_number)
    .bind(entry.is_active)
    .bind(&entry.updated_at)
    .bind(&entry.id)
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn find_entry(db: &SqlitePool, id: &str) -> Result<Option<TimetableEntry>, sqlx::Error> {
    sqlx::query_as::<_, TimetableEntry>(
        r#"
        SELECT id, main_school_id, campus_id, academic_year_id, section_id, subject_id,
            teacher_id, period_id, day_of_week, room_number, is_active,
            created_by, created_at, updated_at
        FROM timetable_entries
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

/// Hard delete. A vacated slot is immediately reusable; the partial unique
/// index only covers rows that still exist and are active.
pub async fn delete_entry(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM timetable_entries WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

pub async fn fetch_entry_view(
    db: &SqlitePool,
    id: &str,
) -> Result<Option<TimetableEntryView>, sqlx::Error> {
    let sql = format!("{ENTRY_VIEW_SQL} WHERE e.id = ?");
    sqlx::query_as::<_, TimetableEntryView>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn fetch_section_schedule(
    db: &SqlitePool,
    section_id: &str,
    academic_year_id: &str,
) -> Result<Vec<TimetableEntryView>, sqlx::Error> {
    let sql = format!(
        "{ENTRY_VIEW_SQL}
        WHERE e.is_active = 1 AND e.section_id = ? AND e.academic_year_id = ?
        ORDER BY e.day_of_week, p.sort_order"
    );
    sqlx::query_as::<_, TimetableEntryView>(&sql)
        .bind(section_id)
        .bind(academic_year_id)
        .fetch_all(db)
        .await
}

/// Deliberately not filtered by school or campus: a teacher id is unique and
/// may appear under any campus of the same main school.
pub async fn fetch_teacher_schedule(
    db: &SqlitePool,
    teacher_id: &str,
    academic_year_id: &str,
) -> Result<Vec<TimetableEntryView>, sqlx::Error> {
    let sql = format!(
        "{ENTRY_VIEW_SQL}
        WHERE e.is_active = 1 AND e.teacher_id = ? AND e.academic_year_id = ?
        ORDER BY e.day_of_week, p.sort_order"
    );
    sqlx::query_as::<_, TimetableEntryView>(&sql)
        .bind(teacher_id)
        .bind(academic_year_id)
        .fetch_all(db)
        .await
}

/// Entry whose period contains `now` ([start, end) on zero-padded "HH:MM").
/// LIMIT 1 ordered by start time keeps the result deterministic even if the
/// period calendar is malformed with overlaps.
pub async fn fetch_class_at(
    db: &SqlitePool,
    teacher_id: &str,
    academic_year_id: &str,
    day_of_week: i64,
    now: &str,
) -> Result<Option<TimetableEntryView>, sqlx::Error> {
    let sql = format!(
        "{ENTRY_VIEW_SQL}
        WHERE e.is_active = 1 AND e.teacher_id = ?1 AND e.academic_year_id = ?2
          AND e.day_of_week = ?3 AND p.start_time <= ?4 AND ?4 < p.end_time
        ORDER BY p.start_time
        LIMIT 1"
    );
    sqlx::query_as::<_, TimetableEntryView>(&sql)
        .bind(teacher_id)
        .bind(academic_year_id)
        .bind(day_of_week)
        .bind(now)
        .fetch_optional(db)
        .await
}

/// Next entry strictly after `now`, same day only; no roll-over to tomorrow.
pub async fn fetch_class_after(
    db: &SqlitePool,
    teacher_id: &str,
    academic_year_id: &str,
    day_of_week: i64,
    now: &str,
) -> Result<Option<TimetableEntryView>, sqlx::Error> {
    let sql = format!(
        "{ENTRY_VIEW_SQL}
        WHERE e.is_active = 1 AND e.teacher_id = ?1 AND e.academic_year_id = ?2
          AND e.day_of_week = ?3 AND p.start_time > ?4
        ORDER BY p.start_time
        LIMIT 1"
    );
    sqlx::query_as::<_, TimetableEntryView>(&sql)
        .bind(teacher_id)
        .bind(academic_year_id)
        .bind(day_of_week)
        .bind(now)
        .fetch_optional(db)
        .await
}

pub async fn fetch_available_subjects(
    db: &SqlitePool,
    section_id: &str,
    academic_year_id: &str,
) -> Result<Vec<SubjectOption>, sqlx::Error> {
    sqlx::query_as::<_, SubjectOption>(
        r#"
        SELECT DISTINCT ts.subject_id, sub.name AS subject_name,
            ts.teacher_id, t.name AS teacher_name
        FROM teacher_subjects ts
        JOIN subjects sub ON sub.id = ts.subject_id
        JOIN teachers t ON t.id = ts.teacher_id
        WHERE ts.section_id = ? AND ts.academic_year_id = ?
        ORDER BY sub.name
        "#,
    )
    .bind(section_id)
    .bind(academic_year_id)
    .fetch_all(db)
    .await
}

pub async fn fetch_day_entries(
    db: &SqlitePool,
    day_of_week: i64,
) -> Result<Vec<TimetableEntryView>, sqlx::Error> {
    let sql = format!(
        "{ENTRY_VIEW_SQL}
        WHERE e.is_active = 1 AND e.day_of_week = ?
        ORDER BY e.section_id, p.sort_order"
    );
    sqlx::query_as::<_, TimetableEntryView>(&sql)
        .bind(day_of_week)
        .fetch_all(db)
        .await
}
