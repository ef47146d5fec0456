//! Unit tests for the attendance store.

use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;

use chrono::{Days, NaiveDate};

use super::AttendanceStore;
use crate::clock::{Clock, FixedClock};
use crate::error::{AppError, Result};
use crate::models::AttendanceStatus;
use crate::storage::{ATTENDANCE_KEY, FileStore, KeyValueStore, MemoryStore, STUDENTS_KEY};

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
}

fn memory_store() -> AttendanceStore<MemoryStore, FixedClock> {
    AttendanceStore::load_with_clock(MemoryStore::new(), FixedClock::new(day()))
}

fn names<S: KeyValueStore, C: Clock>(store: &AttendanceStore<S, C>) -> Vec<&str> {
    store.students().iter().map(|s| s.name.as_str()).collect()
}

/// Clock whose date can be advanced from outside the store.
#[derive(Clone)]
struct SteppingClock {
    today: Rc<Cell<NaiveDate>>,
}

impl SteppingClock {
    fn advance(&self) {
        self.today.set(self.today.get() + Days::new(1));
    }
}

impl Clock for SteppingClock {
    fn today(&self) -> NaiveDate {
        self.today.get()
    }

    fn now_millis(&self) -> i64 {
        1_760_659_200_000
    }
}

/// Store whose writes always fail.
#[derive(Default)]
struct ReadOnlyStore;

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn set(&mut self, key: &str, _value: &str) -> Result<()> {
        Err(AppError::validation(format!("{key} is read-only")))
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        Err(AppError::validation(format!("{key} is read-only")))
    }
}

#[test]
fn test_add_student_trims_name() {
    let mut store = memory_store();

    let student = store.add_student("  Alice  ").unwrap();
    assert_eq!(student.name, "Alice");
    assert_eq!(store.student(student.id), Some(&student));
}

#[test]
fn test_add_blank_name_is_ignored() {
    let mut store = memory_store();

    assert!(store.add_student("").is_none());
    assert!(store.add_student("   ").is_none());
    assert!(store.add_student("\t\n").is_none());
    assert!(store.students().is_empty());
    assert!(store.storage().is_empty());
}

#[test]
fn test_add_allows_duplicate_names() {
    let mut store = memory_store();
    store.add_student("Alice");
    store.add_student("alice");
    assert_eq!(names(&store), ["Alice", "alice"]);
}

#[test]
fn test_ids_unique_under_frozen_clock() {
    let mut store = memory_store();

    let a = store.add_student("Alice").unwrap();
    let b = store.add_student("Bob").unwrap();
    let imported = store.import_from_text("Carol\nDave");

    assert_eq!(a.id, FixedClock::new(day()).now_millis());
    assert_eq!(b.id, a.id + 1);
    assert_eq!(imported[0].id, b.id + 1);
    assert_eq!(imported[1].id, b.id + 2);
}

#[test]
fn test_status_without_record_is_absent() {
    let mut store = memory_store();
    let alice = store.add_student("Alice").unwrap();

    assert_eq!(store.status_for_today(alice.id), AttendanceStatus::Absent);
    assert!(store.records_for(alice.id).is_empty());
}

#[test]
fn test_toggle_cycles_present_then_absent() {
    let mut store = memory_store();
    let alice = store.add_student("Alice").unwrap();
    let bob = store.add_student("Bob").unwrap();

    assert_eq!(store.toggle_today(alice.id), Some(AttendanceStatus::Present));
    assert_eq!(store.status_for_today(alice.id), AttendanceStatus::Present);

    assert_eq!(store.toggle_today(alice.id), Some(AttendanceStatus::Absent));
    assert_eq!(store.status_for_today(alice.id), AttendanceStatus::Absent);

    // Still exactly one record for today
    assert_eq!(store.records_for(alice.id).len(), 1);
    assert_eq!(store.status_for_today(bob.id), AttendanceStatus::Absent);
    assert!(store.records_for(bob.id).is_empty());
}

#[test]
fn test_double_toggle_restores_status() {
    let mut store = memory_store();
    let alice = store.add_student("Alice").unwrap();
    store.toggle_today(alice.id);

    let before = store.status_for_today(alice.id);
    store.toggle_today(alice.id);
    store.toggle_today(alice.id);
    assert_eq!(store.status_for_today(alice.id), before);
}

#[test]
fn test_toggle_unknown_student_is_ignored() {
    let mut store = memory_store();
    assert_eq!(store.toggle_today(42), None);
    assert!(store.attendance().is_empty());
}

#[test]
fn test_percentage_over_recorded_days() {
    let clock = SteppingClock {
        today: Rc::new(Cell::new(day())),
    };
    let mut store = AttendanceStore::load_with_clock(MemoryStore::new(), clock.clone());
    let alice = store.add_student("Alice").unwrap();

    assert_eq!(store.attendance_percentage(alice.id), 0);

    // present, present, absent
    store.toggle_today(alice.id);
    clock.advance();
    store.toggle_today(alice.id);
    clock.advance();
    store.toggle_today(alice.id);
    store.toggle_today(alice.id);

    assert_eq!(store.records_for(alice.id).len(), 3);
    assert_eq!(store.attendance_percentage(alice.id), 67);
}

#[test]
fn test_import_dedupes_within_batch_by_default() {
    let mut store = memory_store();

    let added = store.import_from_text("Alice\nBob\nAlice\n\n  Carol  ");
    let added: Vec<&str> = added.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(added, ["Alice", "Bob", "Carol"]);
    assert_eq!(names(&store), ["Alice", "Bob", "Carol"]);
}

#[test]
fn test_import_without_batch_dedup_keeps_repeats() {
    let mut store = memory_store().with_batch_dedup(false);

    store.import_from_text("Alice\nBob\nAlice\n\n  Carol  ");
    assert_eq!(names(&store), ["Alice", "Bob", "Alice", "Carol"]);
}

#[test]
fn test_import_skips_existing_names_case_insensitively() {
    let mut store = memory_store().with_batch_dedup(false);
    store.add_student("Alice");

    let added = store.import_from_text("ALICE\r\nbob\r\nalice");
    assert_eq!(added.len(), 1);
    assert_eq!(names(&store), ["Alice", "bob"]);
}

#[test]
fn test_import_creates_no_records() {
    let mut store = memory_store();
    store.import_from_text("Alice\nBob");
    assert!(store.attendance().is_empty());
    assert_eq!(store.storage().get(ATTENDANCE_KEY).unwrap(), None);
}

#[test]
fn test_import_nothing_new_leaves_storage_untouched() {
    let mut store = memory_store();
    assert!(store.import_from_text("\n  \n").is_empty());
    assert!(store.storage().is_empty());
}

#[test]
fn test_export_student_without_records() {
    let mut store = memory_store();
    store.add_student("Alice");

    let csv = store.export_csv();
    let rows: Vec<Vec<&str>> = csv.lines().map(|l| l.split(',').collect()).collect();
    assert_eq!(rows[0], ["Student Name", "Date", "Status"]);
    assert_eq!(rows[1], ["Alice", "", "No records"]);
}

#[test]
fn test_export_lists_each_record() {
    let mut store = memory_store();
    let alice = store.add_student("Alice").unwrap();
    store.add_student("Bob");
    store.toggle_today(alice.id);

    assert_eq!(
        store.export_csv(),
        "Student Name,Date,Status\nAlice,2026-10-17,present\nBob,,No records"
    );
}

#[test]
fn test_export_then_import_round_trip() {
    let mut source = memory_store();
    let alice = source.add_student("Alice").unwrap();
    source.add_student("Bob");
    source.toggle_today(alice.id);
    let csv = source.export_csv();

    // Same store: nothing new
    assert!(source.import_from_text(&csv).is_empty());
    assert_eq!(source.students().len(), 2);

    // Fresh store: same names, no history
    let mut target = memory_store();
    target.import_from_text(&csv);
    let expected: HashSet<String> = ["alice", "bob"].iter().map(|s| s.to_string()).collect();
    let actual: HashSet<String> = target.students().iter().map(|s| s.name.to_lowercase()).collect();
    assert_eq!(actual, expected);
    assert_eq!(target.students().len(), 2);
    assert!(target.attendance().is_empty());
}

#[test]
fn test_roster_rows() {
    let mut store = memory_store();
    let alice = store.add_student("Alice").unwrap();
    store.add_student("Bob");
    store.toggle_today(alice.id);

    let rows = store.roster_rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].name, "Alice");
    assert_eq!(rows[0].today, AttendanceStatus::Present);
    assert_eq!(rows[0].percentage, 100);
    assert_eq!(rows[1].today, AttendanceStatus::Absent);
    assert_eq!(rows[1].percentage, 0);
}

#[test]
fn test_state_survives_reload() {
    let mut store = memory_store();
    let alice = store.add_student("Alice").unwrap();
    store.toggle_today(alice.id);

    let reloaded = AttendanceStore::load_with_clock(store.storage().clone(), FixedClock::new(day()));
    assert_eq!(reloaded.students(), store.students());
    assert_eq!(reloaded.status_for_today(alice.id), AttendanceStatus::Present);
}

#[test]
fn test_malformed_storage_loads_empty() {
    let mut storage = MemoryStore::new();
    storage.set(STUDENTS_KEY, "not json").unwrap();
    storage.set(ATTENDANCE_KEY, r#"{"1": "oops"}"#).unwrap();

    let store = AttendanceStore::load_with_clock(storage, FixedClock::new(day()));
    assert!(store.students().is_empty());
    assert!(store.attendance().is_empty());
}

#[test]
fn test_malformed_key_does_not_discard_the_other() {
    let mut storage = MemoryStore::new();
    storage.set(STUDENTS_KEY, r#"[{"id": 7, "name": "Alice"}]"#).unwrap();
    storage.set(ATTENDANCE_KEY, "[").unwrap();

    let store = AttendanceStore::load_with_clock(storage, FixedClock::new(day()));
    assert_eq!(names(&store), ["Alice"]);
    assert!(store.attendance().is_empty());
}

#[test]
fn test_reset_clears_state_and_storage() {
    let mut store = memory_store();
    let alice = store.add_student("Alice").unwrap();
    store.toggle_today(alice.id);
    assert_eq!(store.storage().len(), 2);

    store.reset();
    assert!(store.students().is_empty());
    assert!(store.attendance().is_empty());
    assert!(store.storage().is_empty());
}

#[test]
fn test_write_failures_keep_memory_state() {
    let mut store = AttendanceStore::load_with_clock(ReadOnlyStore, FixedClock::new(day()));

    let alice = store.add_student("Alice").unwrap();
    assert_eq!(store.toggle_today(alice.id), Some(AttendanceStatus::Present));
    assert_eq!(store.status_for_today(alice.id), AttendanceStatus::Present);

    store.reset();
    assert!(store.students().is_empty());
}

#[test]
fn test_file_store_persists_across_sessions() {
    let dir = tempfile::tempdir().unwrap();

    {
        let storage = FileStore::open(dir.path()).unwrap();
        let mut store = AttendanceStore::load_with_clock(storage, FixedClock::new(day()));
        let alice = store.add_student("Alice").unwrap();
        store.toggle_today(alice.id);
    }

    let storage = FileStore::open(dir.path()).unwrap();
    let store = AttendanceStore::load_with_clock(storage, FixedClock::new(day()));
    assert_eq!(names(&store), ["Alice"]);
    assert_eq!(store.status_for_today(store.students()[0].id), AttendanceStatus::Present);

    let raw = std::fs::read_to_string(dir.path().join("attendance.json")).unwrap();
    assert!(raw.contains(r#""status":"present""#));
}
