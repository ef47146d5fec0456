//! Data models for the roster and attendance table.

pub mod attendance;
pub mod student;

pub use attendance::{AttendanceRecord, AttendanceStatus, AttendanceTable, percentage, status_on};
pub use student::{Student, StudentId};
