use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TimetableEntry {
    pub id: String,
    pub main_school_id: String,
    pub campus_id: String,
    pub academic_year_id: String,
    pub section_id: String,
    pub subject_id: String,
    pub teacher_id: String,
    pub period_id: String,
    /// 0 = Monday .. 6 = Sunday.
    pub day_of_week: i64,
    pub room_number: Option<String>,
    pub is_active: bool,
    pub created_by: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Entry joined with display labels for immediate rendering.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TimetableEntryView {
    pub id: String,
    pub main_school_id: String,
    pub campus_id: String,
    pub academic_year_id: String,
    pub section_id: String,
    pub section_name: String,
    pub subject_id: String,
    pub subject_name: String,
    pub teacher_id: String,
    pub teacher_name: String,
    pub period_id: String,
    pub period_name: String,
    pub start_time: String,
    pub end_time: String,
    pub day_of_week: i64,
    pub room_number: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEntryRequest {
    /// Advisory only; the authoritative campus comes from the section.
    pub school_id: Option<String>,
    pub campus_id: Option<String>,
    pub academic_year_id: String,
    pub section_id: String,
    pub subject_id: String,
    pub teacher_id: String,
    pub period_id: String,
    pub day_of_week: i64,
    pub room_number: Option<String>,
    pub created_by: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEntryRequest {
    pub subject_id: Option<String>,
    pub teacher_id: Option<String>,
    pub period_id: Option<String>,
    pub day_of_week: Option<i64>,
    pub room_number: Option<String>,
    pub is_active: Option<bool>,
}
