use sqlx::SqlitePool;

use crate::db::repository;
use crate::error::AppError;

/// Resolves the main-school id for any organizational unit: a campus resolves
/// to its parent, a main school to itself. Callers must never trust a
/// client-supplied school id here; a campus id masquerading as a main-school
/// id would shard the conflict-check scope.
pub async fn resolve_main_school(db: &SqlitePool, unit_id: &str) -> Result<String, AppError> {
    let unit = repository::find_org_unit(db, unit_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("organizational unit {unit_id}")))?;

    Ok(unit.parent_id.unwrap_or(unit.id))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test_db() -> SqlitePool {
        // One connection: every pool connection to :memory: is a distinct db.
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create test db");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");
        pool
    }

    #[tokio::test]
    async fn test_campus_resolves_to_parent_school() {
        let pool = setup_test_db().await;
        sqlx::query("INSERT INTO organizational_units (id, name, parent_id) VALUES ('school-1', 'Main', NULL)")
            .execute(&pool)
            .await
            .expect("Failed to insert school");
        sqlx::query("INSERT INTO organizational_units (id, name, parent_id) VALUES ('campus-1', 'North', 'school-1')")
            .execute(&pool)
            .await
            .expect("Failed to insert campus");

        assert_eq!(
            resolve_main_school(&pool, "campus-1").await.expect("resolve failed"),
            "school-1"
        );
        assert_eq!(
            resolve_main_school(&pool, "school-1").await.expect("resolve failed"),
            "school-1"
        );
    }

    #[tokio::test]
    async fn test_unknown_unit_is_not_found() {
        let pool = setup_test_db().await;
        let err = resolve_main_school(&pool, "nope").await.expect_err("should fail");
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
