use serde::{Deserialize, Serialize};

/// One class session that occurred (or will occur) on a concrete date.
/// The stable `(entry_id, section_id, period_id, day_of_week)` key is the
/// contract the downstream attendance generator relies on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassSession {
    pub entry_id: String,
    pub date: String,
    pub day_of_week: i64,
    pub section_id: String,
    pub section_name: String,
    pub subject_id: String,
    pub subject_name: String,
    pub teacher_id: String,
    pub period_id: String,
    pub period_name: String,
    pub start_time: String,
    pub end_time: String,
    pub campus_id: String,
}
