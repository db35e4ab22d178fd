use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// School or campus. A unit with no parent is a main school; a unit with a
/// parent is a campus of that main school (hierarchy depth is exactly 2).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrgUnit {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AcademicYear {
    pub id: String,
    pub name: String,
    pub is_current: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Section {
    pub id: String,
    pub name: String,
    pub grade_level: Option<String>,
    pub org_unit_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Teacher {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Period {
    pub id: String,
    pub name: String,
    pub start_time: String,
    pub end_time: String,
    pub sort_order: i64,
}
