pub mod attendance;
pub mod conflict;
pub mod hierarchy;
pub mod schedule;
pub mod timetable;
