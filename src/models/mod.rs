pub mod attendance;
pub mod org;
pub mod schedule;
pub mod timetable;

pub use attendance::ClassSession;
pub use org::{AcademicYear, OrgUnit, Period, Section, Subject, Teacher};
pub use schedule::{ConflictResult, SubjectOption};
pub use timetable::{NewEntryRequest, TimetableEntry, TimetableEntryView, UpdateEntryRequest};
