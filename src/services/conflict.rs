use sqlx::Sqlite;

use crate::db::repository;
use crate::models::ConflictResult;

/// Checks whether an active entry already claims the teacher for this
/// day/period/academic-year slot. Exact equality on all four keys; campus and
/// section are irrelevant because a teacher's identity is shared across
/// campuses of the same main school.
///
/// Generic over the executor: the write path runs this inside the same
/// transaction as its insert/update so check-then-write is atomic, while the
/// dry-run endpoint passes the plain pool.
pub async fn check_conflict<'e, E>(
    executor: E,
    teacher_id: &str,
    day_of_week: i64,
    period_id: &str,
    academic_year_id: &str,
    exclude_entry_id: Option<&str>,
) -> Result<ConflictResult, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let existing = repository::find_conflicting_entry(
        executor,
        teacher_id,
        day_of_week,
        period_id,
        academic_year_id,
        exclude_entry_id,
    )
    .await?;

    Ok(match existing {
        Some(entry) => ConflictResult::conflicting(format!(
            "{} already teaches {} to {} during {}",
            entry.teacher_name, entry.subject_name, entry.section_name, entry.period_name
        )),
        None => ConflictResult::clear(),
    })
}
