#![allow(dead_code)]

use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use timetable_engine::models::NewEntryRequest;

pub async fn setup_db() -> SqlitePool {
    // One connection: every pool connection to :memory: is a distinct db.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test db");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    seed(&pool).await;
    pool
}

/// One main school with two campuses, a second standalone school, an
/// academic year flagged current, a morning-to-afternoon period ladder and
/// enough teachers/subjects/sections to exercise every query.
async fn seed(pool: &SqlitePool) {
    for (id, name, parent) in [
        ("school-1", "Greenfield Main", None),
        ("campus-1", "Greenfield North", Some("school-1")),
        ("campus-2", "Greenfield South", Some("school-1")),
        ("school-2", "Hillside", None),
    ] {
        sqlx::query("INSERT INTO organizational_units (id, name, parent_id) VALUES (?, ?, ?)")
            .bind(id)
            .bind(name)
            .bind(parent)
            .execute(pool)
            .await
            .expect("Failed to insert org unit");
    }

    sqlx::query("INSERT INTO academic_years (id, name, is_current) VALUES ('ay-2025', '2025-26', 1)")
        .execute(pool)
        .await
        .expect("Failed to insert academic year");
    sqlx::query("INSERT INTO academic_years (id, name, is_current) VALUES ('ay-2024', '2024-25', 0)")
        .execute(pool)
        .await
        .expect("Failed to insert academic year");

    for (id, name, start, end, sort) in [
        ("p-1", "Period 1", "08:10", "08:55", 1),
        ("p-2", "Period 2", "09:00", "09:45", 2),
        ("p-3", "Period 3", "10:00", "10:45", 3),
        ("p-4", "Period 4", "11:00", "11:45", 4),
        ("p-5", "Period 5", "13:00", "13:45", 5),
    ] {
        sqlx::query(
            "INSERT INTO periods (id, name, start_time, end_time, sort_order) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(name)
        .bind(start)
        .bind(end)
        .bind(sort)
        .execute(pool)
        .await
        .expect("Failed to insert period");
    }

    for (id, name) in [("t-1", "A. Khan"), ("t-2", "B. Osei")] {
        sqlx::query("INSERT INTO teachers (id, name) VALUES (?, ?)")
            .bind(id)
            .bind(name)
            .execute(pool)
            .await
            .expect("Failed to insert teacher");
    }

    for (id, name, code) in [("sub-1", "Mathematics", "MATH"), ("sub-2", "Physics", "PHY")] {
        sqlx::query("INSERT INTO subjects (id, name, code) VALUES (?, ?, ?)")
            .bind(id)
            .bind(name)
            .bind(code)
            .execute(pool)
            .await
            .expect("Failed to insert subject");
    }

    for (id, name, org) in [
        ("sec-a", "Section A", "campus-1"),
        ("sec-b", "Section B", "campus-2"),
        ("sec-c", "Section C", "school-2"),
    ] {
        sqlx::query(
            "INSERT INTO sections (id, name, grade_level, org_unit_id) VALUES (?, ?, '7', ?)",
        )
        .bind(id)
        .bind(name)
        .bind(org)
        .execute(pool)
        .await
        .expect("Failed to insert section");
    }

    for (id, teacher, subject, section) in [
        ("ts-1", "t-1", "sub-1", "sec-a"),
        ("ts-2", "t-2", "sub-2", "sec-a"),
        ("ts-3", "t-1", "sub-1", "sec-b"),
    ] {
        sqlx::query(
            "INSERT INTO teacher_subjects (id, teacher_id, subject_id, section_id, academic_year_id) VALUES (?, ?, ?, ?, 'ay-2025')",
        )
        .bind(id)
        .bind(teacher)
        .bind(subject)
        .bind(section)
        .execute(pool)
        .await
        .expect("Failed to insert teacher subject");
    }
}

pub fn entry_req(section_id: &str, teacher_id: &str, day_of_week: i64, period_id: &str) -> NewEntryRequest {
    NewEntryRequest {
        school_id: None,
        campus_id: None,
        academic_year_id: "ay-2025".to_string(),
        section_id: section_id.to_string(),
        subject_id: "sub-1".to_string(),
        teacher_id: teacher_id.to_string(),
        period_id: period_id.to_string(),
        day_of_week,
        room_number: None,
        created_by: "admin-1".to_string(),
    }
}
