//! Attendance state: the roster, the attendance table, and their persistence.
//!
//! Every mutation rewrites the affected key in the backing [`KeyValueStore`].
//! Storage failures are logged and never surface to callers; the in-memory
//! state stays authoritative for the rest of the session.

use chrono::NaiveDate;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::AppError;
use crate::export::render_csv;
use crate::import::parse_roster_text;
use crate::models::{
    AttendanceRecord, AttendanceStatus, AttendanceTable, Student, StudentId, percentage, status_on,
};
use crate::storage::{ATTENDANCE_KEY, KeyValueStore, STUDENTS_KEY};

#[cfg(test)]
mod tests;

/// One line of the roster table as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterRow {
    pub id: StudentId,
    pub name: String,
    pub today: AttendanceStatus,
    pub percentage: u8,
}

/// Roster and attendance table backed by a key-value store.
pub struct AttendanceStore<S, C = SystemClock> {
    storage: S,
    clock: C,
    dedupe_within_batch: bool,
    students: Vec<Student>,
    attendance: AttendanceTable,
}

impl<S: KeyValueStore> AttendanceStore<S> {
    /// Load state from `storage` using the system clock.
    pub fn load(storage: S) -> Self {
        Self::load_with_clock(storage, SystemClock)
    }
}

impl<S: KeyValueStore, C: Clock> AttendanceStore<S, C> {
    /// Load state from `storage`. Missing or unreadable keys start empty.
    pub fn load_with_clock(storage: S, clock: C) -> Self {
        let students: Vec<Student> = load_key(&storage, STUDENTS_KEY);
        let attendance: AttendanceTable = load_key(&storage, ATTENDANCE_KEY);
        info!(
            "Loaded {} students, {} attendance records",
            students.len(),
            attendance.values().map(Vec::len).sum::<usize>()
        );

        Self {
            storage,
            clock,
            dedupe_within_batch: true,
            students,
            attendance,
        }
    }

    /// Choose whether names repeated within one import are collapsed.
    pub fn with_batch_dedup(mut self, enabled: bool) -> Self {
        self.dedupe_within_batch = enabled;
        self
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn attendance(&self) -> &AttendanceTable {
        &self.attendance
    }

    pub fn student(&self, id: StudentId) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    /// Records for one student, in insertion order.
    pub fn records_for(&self, id: StudentId) -> &[AttendanceRecord] {
        self.attendance.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Add a student by name.
    ///
    /// The name is trimmed; blank names are ignored and return `None`.
    pub fn add_student(&mut self, name: &str) -> Option<Student> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let student = Student::new(self.next_id(), name);
        self.students.push(student.clone());
        self.save_students();
        info!("Added student {} ({})", student.name, student.id);
        Some(student)
    }

    /// Flip today's status for a student and return the new status.
    ///
    /// Without a record for today the student is absent, so the first toggle
    /// records them present. Unknown ids are ignored.
    pub fn toggle_today(&mut self, id: StudentId) -> Option<AttendanceStatus> {
        if self.student(id).is_none() {
            warn!("Toggle ignored for unknown student {}", id);
            return None;
        }

        let today = self.clock.today();
        let records = self.attendance.entry(id).or_default();
        let status = match records.iter_mut().find(|r| r.date == today) {
            Some(record) => {
                record.status = record.status.toggled();
                record.status
            }
            None => {
                records.push(AttendanceRecord::new(today, AttendanceStatus::Present));
                AttendanceStatus::Present
            }
        };

        self.save_attendance();
        debug!("Student {} is {} on {}", id, status, today);
        Some(status)
    }

    /// Today's status, absent when nothing is recorded.
    pub fn status_for_today(&self, id: StudentId) -> AttendanceStatus {
        status_on(&self.attendance, id, self.clock.today())
    }

    /// Percentage of recorded days the student was present; 0 with no records.
    pub fn attendance_percentage(&self, id: StudentId) -> u8 {
        percentage(self.records_for(id))
    }

    /// Add every name in `text` not already on the roster.
    ///
    /// Matching is case-insensitive and existing roster names win. Repeats
    /// inside `text` are only collapsed when batch dedup is enabled. No
    /// attendance records are created. Returns the students added.
    pub fn import_from_text(&mut self, text: &str) -> Vec<Student> {
        let existing: Vec<String> = self.students.iter().map(|s| s.name.to_lowercase()).collect();
        let mut seen_in_batch: Vec<String> = Vec::new();
        let mut added = Vec::new();

        for name in parse_roster_text(text) {
            let key = name.to_lowercase();
            if existing.contains(&key) {
                continue;
            }
            if self.dedupe_within_batch {
                if seen_in_batch.contains(&key) {
                    continue;
                }
                seen_in_batch.push(key);
            }

            let student = Student::new(self.next_id(), name);
            self.students.push(student.clone());
            added.push(student);
        }

        if !added.is_empty() {
            self.save_students();
        }
        info!("Imported {} students", added.len());
        added
    }

    /// Export the roster and every record as CSV text.
    pub fn export_csv(&self) -> String {
        render_csv(&self.students, &self.attendance)
    }

    /// Per-student name, today's status, and running percentage.
    pub fn roster_rows(&self) -> Vec<RosterRow> {
        self.students
            .iter()
            .map(|s| RosterRow {
                id: s.id,
                name: s.name.clone(),
                today: self.status_for_today(s.id),
                percentage: self.attendance_percentage(s.id),
            })
            .collect()
    }

    /// Clear the roster and attendance table and erase persisted state.
    pub fn reset(&mut self) {
        self.students.clear();
        self.attendance.clear();

        for key in [STUDENTS_KEY, ATTENDANCE_KEY] {
            if let Err(e) = self.storage.remove(key) {
                error!("Failed to erase {}: {}", key, e);
            }
        }
        info!("Attendance data reset");
    }

    /// Time-derived id, bumped past the largest id issued so far.
    fn next_id(&self) -> StudentId {
        let now = self.clock.now_millis();
        match self.students.iter().map(|s| s.id).max() {
            Some(max) if now <= max => max + 1,
            _ => now,
        }
    }

    fn save_students(&mut self) {
        save_key(&mut self.storage, STUDENTS_KEY, &self.students);
    }

    fn save_attendance(&mut self) {
        save_key(&mut self.storage, ATTENDANCE_KEY, &self.attendance);
    }
}

fn load_key<T: DeserializeOwned + Default>(storage: &impl KeyValueStore, key: &str) -> T {
    match storage.get(key) {
        Ok(Some(text)) => serde_json::from_str(&text).unwrap_or_else(|e| {
            warn!("Stored {} is malformed, starting empty: {}", key, e);
            T::default()
        }),
        Ok(None) => T::default(),
        Err(e) => {
            warn!("Failed to read {}, starting empty: {}", key, e);
            T::default()
        }
    }
}

fn save_key<T: Serialize + ?Sized>(storage: &mut impl KeyValueStore, key: &str, value: &T) {
    let result = serde_json::to_string(value)
        .map_err(AppError::from)
        .and_then(|json| storage.set(key, &json));
    if let Err(e) = result {
        error!("Failed to save {}: {}", key, e);
    }
}
