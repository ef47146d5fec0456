//! CSV export functionality.

use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::models::{AttendanceTable, Student};

/// Default name for the exported file.
pub const DEFAULT_EXPORT_FILE: &str = "attendance.csv";

/// Header columns of the export.
pub const CSV_HEADERS: [&str; 3] = ["Student Name", "Date", "Status"];

/// Status cell for a student without any records.
pub const NO_RECORDS: &str = "No records";

/// Render the roster and attendance table as CSV text.
///
/// One row per (student, record) in roster order. A student with no records
/// gets a single row with an empty date. Fields are not quoted, so names
/// containing commas produce extra columns.
pub fn render_csv(students: &[Student], table: &AttendanceTable) -> String {
    let mut rows = vec![CSV_HEADERS.join(",")];

    for student in students {
        match table.get(&student.id).filter(|records| !records.is_empty()) {
            Some(records) => {
                for record in records {
                    rows.push(format!("{},{},{}", student.name, record.date.format("%Y-%m-%d"), record.status));
                }
            }
            None => rows.push(format!("{},,{}", student.name, NO_RECORDS)),
        }
    }

    rows.join("\n")
}

/// Write CSV text to `path`.
pub fn write_csv(csv: &str, path: &Path) -> Result<()> {
    if path.is_dir() {
        return Err(AppError::export(format!("{} is a directory", path.display())));
    }
    std::fs::write(path, csv)?;
    tracing::info!("Exported attendance to {:?}", path);
    Ok(())
}

/// Open save file dialog and return selected path.
pub fn show_save_dialog(default_name: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_file_name(default_name)
        .add_filter("CSV Files", &["csv"])
        .save_file()
}

/// Open file picker for a roster to import.
pub fn show_open_dialog() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("Roster Files", &["csv", "txt"])
        .add_filter("All Files", &["*"])
        .pick_file()
}
