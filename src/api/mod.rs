use axum::Json;
use axum::extract::{Path, Query};
use axum::routing::{post, put};
use axum::{Router, extract::State, http::StatusCode, routing::get};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::db::repository;
use crate::error::AppError;
use crate::models::*;
use crate::services::{attendance, conflict, schedule, timetable};
use crate::state::AppState;

/// Uniform success envelope; errors render through `AppError::into_response`.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse { success: true, data })
}

#[derive(Deserialize)]
struct YearParams {
    academic_year_id: String,
}

#[derive(Deserialize)]
struct ConflictParams {
    teacher_id: String,
    day_of_week: i64,
    period_id: String,
    academic_year_id: String,
    #[serde(default)]
    exclude_entry_id: Option<String>,
}

#[derive(Deserialize)]
struct ClockParams {
    /// RFC3339 instant to evaluate against instead of the server clock.
    #[serde(default)]
    at: Option<String>,
}

#[derive(Deserialize)]
struct DateParams {
    date: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/timetable/entries", post(create_entry))
        .route("/timetable/entries/{id}", put(update_entry).delete(delete_entry))
        .route("/timetable/section/{section_id}", get(section_timetable))
        .route(
            "/timetable/section/{section_id}/available-subjects",
            get(available_subjects),
        )
        .route("/timetable/teacher/{teacher_id}", get(teacher_timetable))
        .route("/timetable/teacher/{teacher_id}/current-class", get(current_class))
        .route("/timetable/teacher/{teacher_id}/next-class", get(next_class))
        .route("/timetable/conflict-check", get(conflict_check))
        .route("/attendance/sessions", get(attendance_sessions))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

async fn section_timetable(
    State(state): State<AppState>,
    Path(section_id): Path<String>,
    Query(params): Query<YearParams>,
) -> Result<Json<ApiResponse<Vec<TimetableEntryView>>>, AppError> {
    let entries = schedule::by_section(&state.db, &section_id, &params.academic_year_id).await?;
    Ok(ok(entries))
}

async fn teacher_timetable(
    State(state): State<AppState>,
    Path(teacher_id): Path<String>,
    Query(params): Query<YearParams>,
) -> Result<Json<ApiResponse<Vec<TimetableEntryView>>>, AppError> {
    let entries = schedule::by_teacher(&state.db, &teacher_id, &params.academic_year_id).await?;
    Ok(ok(entries))
}

async fn available_subjects(
    State(state): State<AppState>,
    Path(section_id): Path<String>,
    Query(params): Query<YearParams>,
) -> Result<Json<ApiResponse<Vec<SubjectOption>>>, AppError> {
    let subjects =
        schedule::available_subjects(&state.db, &section_id, &params.academic_year_id).await?;
    Ok(ok(subjects))
}

async fn conflict_check(
    State(state): State<AppState>,
    Query(params): Query<ConflictParams>,
) -> Result<Json<ApiResponse<ConflictResult>>, AppError> {
    let result = conflict::check_conflict(
        &state.db,
        &params.teacher_id,
        params.day_of_week,
        &params.period_id,
        &params.academic_year_id,
        params.exclude_entry_id.as_deref(),
    )
    .await?;
    Ok(ok(result))
}

async fn create_entry(
    State(state): State<AppState>,
    Json(req): Json<NewEntryRequest>,
) -> Result<Json<ApiResponse<TimetableEntryView>>, AppError> {
    let entry = timetable::create_entry(&state.db, req).await?;
    Ok(ok(entry))
}

async fn update_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateEntryRequest>,
) -> Result<Json<ApiResponse<TimetableEntryView>>, AppError> {
    let entry = timetable::update_entry(&state.db, &id, req).await?;
    Ok(ok(entry))
}

async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    timetable::delete_entry(&state.db, &id).await?;
    Ok(ok(()))
}

async fn current_class(
    State(state): State<AppState>,
    Path(teacher_id): Path<String>,
    Query(params): Query<ClockParams>,
) -> Result<Json<ApiResponse<Option<TimetableEntryView>>>, AppError> {
    let (academic_year_id, day_of_week, now) = resolve_clock(&state, params.at.as_deref()).await?;
    let entry =
        schedule::current_class(&state.db, &teacher_id, &academic_year_id, day_of_week, now)
            .await?;
    Ok(ok(entry))
}

async fn next_class(
    State(state): State<AppState>,
    Path(teacher_id): Path<String>,
    Query(params): Query<ClockParams>,
) -> Result<Json<ApiResponse<Option<TimetableEntryView>>>, AppError> {
    let (academic_year_id, day_of_week, now) = resolve_clock(&state, params.at.as_deref()).await?;
    let entry = schedule::next_class(&state.db, &teacher_id, &academic_year_id, day_of_week, now)
        .await?;
    Ok(ok(entry))
}

async fn attendance_sessions(
    State(state): State<AppState>,
    Query(params): Query<DateParams>,
) -> Result<Json<ApiResponse<Vec<ClassSession>>>, AppError> {
    let date = NaiveDate::parse_from_str(&params.date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("invalid date '{}'", params.date)))?;
    let sessions = attendance::sessions_for_date(&state.db, date).await?;
    Ok(ok(sessions))
}

/// Resolves the flagged-current academic year and the evaluation instant for
/// time-relative queries. The academic year is looked up here once and
/// threaded down as a plain parameter; services never consult the flag.
async fn resolve_clock(
    state: &AppState,
    at: Option<&str>,
) -> Result<(String, i64, NaiveTime), AppError> {
    let year = repository::find_current_academic_year(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("no academic year is flagged current".to_string()))?;

    let instant: NaiveDateTime = match at {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map_err(|_| AppError::Validation(format!("invalid RFC3339 instant '{raw}'")))?
            .naive_local(),
        None => Local::now().naive_local(),
    };

    let day_of_week = schedule::weekday_index(instant.date());
    let now = NaiveTime::from_hms_opt(instant.time().hour(), instant.time().minute(), 0)
        .unwrap_or(instant.time());

    Ok((year.id, day_of_week, now))
}
