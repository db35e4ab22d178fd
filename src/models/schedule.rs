use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Result of a slot conflict check. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictResult {
    pub has_conflict: bool,
    pub conflict_details: Option<String>,
}

impl ConflictResult {
    pub fn clear() -> Self {
        Self {
            has_conflict: false,
            conflict_details: None,
        }
    }

    pub fn conflicting(details: String) -> Self {
        Self {
            has_conflict: true,
            conflict_details: Some(details),
        }
    }
}

/// A subject a section may legally schedule, with the assigned teacher.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SubjectOption {
    pub subject_id: String,
    pub subject_name: String,
    pub teacher_id: String,
    pub teacher_name: String,
}
