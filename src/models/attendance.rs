//! Attendance records and the per-student attendance table.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::student::StudentId;

/// Attendance status for one student on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    /// Also the implicit status of any day without a record.
    #[default]
    Absent,
}

impl AttendanceStatus {
    /// The opposite status.
    pub fn toggled(self) -> Self {
        match self {
            Self::Present => Self::Absent,
            Self::Absent => Self::Present,
        }
    }

    /// Lowercase name, as stored and exported.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
        }
    }

    pub fn is_present(self) -> bool {
        self == Self::Present
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single date-status pair. Dates are unique within one student's list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

impl AttendanceRecord {
    pub fn new(date: NaiveDate, status: AttendanceStatus) -> Self {
        Self { date, status }
    }
}

/// Student id to that student's records, in insertion order.
pub type AttendanceTable = BTreeMap<StudentId, Vec<AttendanceRecord>>;

/// Status of `student_id` on `date`, defaulting to absent when no record exists.
pub fn status_on(table: &AttendanceTable, student_id: StudentId, date: NaiveDate) -> AttendanceStatus {
    table
        .get(&student_id)
        .and_then(|records| records.iter().find(|r| r.date == date))
        .map(|r| r.status)
        .unwrap_or_default()
}

/// Share of present records, rounded to the nearest whole percent.
///
/// The denominator is the number of recorded days, not calendar days.
pub fn percentage(records: &[AttendanceRecord]) -> u8 {
    if records.is_empty() {
        return 0;
    }
    let present = records.iter().filter(|r| r.status.is_present()).count();
    (present as f64 * 100.0 / records.len() as f64).round() as u8
}
