//! Headless command-line interface.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::clock::Clock;
use crate::config::AppConfig;
use crate::error::{AppError, Result};
use crate::export::write_csv;
use crate::import::read_import_file;
use crate::models::StudentId;
use crate::storage::KeyValueStore;
use crate::store::AttendanceStore;

/// Desktop attendance tracker with roster import and CSV export.
#[derive(Parser, Debug)]
#[command(name = "roll-call", version)]
pub struct Cli {
    /// Use config.toml from current directory (dev mode)
    #[arg(long)]
    pub dev: bool,

    /// Override the directory holding attendance data
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Run a single command instead of opening the window
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show every student with today's status and attendance percentage
    List,
    /// Add a student to the roster
    Add {
        /// Student name
        name: String,
    },
    /// Toggle today's attendance for a student
    Toggle {
        /// Student id as shown by `list`
        id: StudentId,
    },
    /// Add students from a file with one name per line
    Import {
        /// Roster file (plain names or a previous export)
        file: PathBuf,
    },
    /// Write all attendance records as CSV
    Export {
        /// Output file, or `-` for stdout (defaults to the configured file name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Erase every student and attendance record
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

/// Execute one command against `store`.
///
/// Output goes to `out`; the reset confirmation is read from `input`.
pub fn run<S, C>(
    command: Command,
    store: &mut AttendanceStore<S, C>,
    config: &AppConfig,
    out: &mut impl Write,
    input: &mut impl BufRead,
) -> Result<()>
where
    S: KeyValueStore,
    C: Clock,
{
    match command {
        Command::List => {
            let rows = store.roster_rows();
            if rows.is_empty() {
                writeln!(out, "No students yet")?;
            }
            for row in rows {
                writeln!(out, "{}\t{}\t{}\t{}%", row.id, row.name, row.today, row.percentage)?;
            }
        }
        Command::Add { name } => {
            let student = store
                .add_student(&name)
                .ok_or_else(|| AppError::validation("Student name cannot be empty"))?;
            writeln!(out, "Added {} ({})", student.name, student.id)?;
        }
        Command::Toggle { id } => {
            let status = store
                .toggle_today(id)
                .ok_or_else(|| AppError::not_found(format!("student {id}")))?;
            let name = store.student(id).map(|s| s.name.as_str()).unwrap_or_default();
            writeln!(out, "{} is {} on {}", name, status, store.today())?;
        }
        Command::Import { file } => {
            let rt = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
            let text = rt.block_on(read_import_file(&file))?;
            let added = store.import_from_text(&text);
            writeln!(out, "Imported {} students", added.len())?;
        }
        Command::Export { output } => {
            let csv = store.export_csv();
            let path = output.unwrap_or_else(|| PathBuf::from(&config.export.file_name));
            if path.as_os_str() == "-" {
                writeln!(out, "{csv}")?;
            } else {
                write_csv(&csv, &path)?;
                writeln!(out, "Exported to {}", path.display())?;
            }
        }
        Command::Reset { yes } => {
            if !yes && !confirm(out, input, "Erase all students and attendance records? [y/N] ")? {
                writeln!(out, "Reset cancelled")?;
                return Ok(());
            }
            store.reset();
            writeln!(out, "All attendance data erased")?;
        }
    }
    Ok(())
}

fn confirm(out: &mut impl Write, input: &mut impl BufRead, prompt: &str) -> Result<bool> {
    write!(out, "{prompt}")?;
    out.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
