//! Main application UI.

use std::path::PathBuf;

use chrono::{DateTime, Local};
use eframe::egui::{self, Align, Layout};
use tokio::sync::oneshot::{self, error::TryRecvError};

use crate::config::AppConfig;
use crate::error::Result;
use crate::export::{show_open_dialog, show_save_dialog, write_csv};
use crate::import::spawn_import_read;
use crate::models::StudentId;
use crate::storage::FileStore;
use crate::store::AttendanceStore;

use super::components::{self, colors};
use super::roster_panel;

/// An import file being read in the background.
pub struct PendingImport {
    pub path: PathBuf,
    rx: oneshot::Receiver<Result<String>>,
}

/// Main application state.
pub struct App {
    // Runtime for background file reads
    pub rt: tokio::runtime::Runtime,

    pub store: AttendanceStore<FileStore>,
    pub config: AppConfig,

    // Forms
    pub new_student_name: String,

    // Import in flight
    pending_import: Option<PendingImport>,

    // Dialogs
    pub show_reset_confirm: bool,
    pub error_message: Option<String>,
    pub success_message: Option<String>,

    // Status bar
    pub last_action: Option<(DateTime<Local>, String)>,
}

impl App {
    pub fn new(store: AttendanceStore<FileStore>, config: AppConfig, rt: tokio::runtime::Runtime) -> Self {
        Self {
            rt,
            store,
            config,
            new_student_name: String::new(),
            pending_import: None,
            show_reset_confirm: false,
            error_message: None,
            success_message: None,
            last_action: None,
        }
    }

    /// Record an action for the status bar.
    fn note(&mut self, message: impl Into<String>) {
        self.last_action = Some((Local::now(), message.into()));
    }

    /// Add the student typed into the name field.
    pub fn add_student(&mut self) {
        if let Some(student) = self.store.add_student(&self.new_student_name) {
            self.note(format!("Added {}", student.name));
        }
        self.new_student_name.clear();
    }

    /// Toggle today's status for a student.
    pub fn toggle(&mut self, id: StudentId) {
        if let Some(status) = self.store.toggle_today(id) {
            let name = self.store.student(id).map(|s| s.name.clone()).unwrap_or_default();
            self.note(format!("{name} marked {status}"));
        }
    }

    pub fn is_importing(&self) -> bool {
        self.pending_import.is_some()
    }

    /// Pick a roster file and start reading it.
    pub fn start_import(&mut self) {
        if self.is_importing() {
            return;
        }
        let Some(path) = show_open_dialog() else {
            return;
        };

        tracing::info!("Importing roster from {:?}", path);
        let rx = spawn_import_read(&self.rt, path.clone());
        self.pending_import = Some(PendingImport { path, rx });
    }

    /// Pick a destination and write the CSV export.
    pub fn export_csv(&mut self) {
        let Some(path) = show_save_dialog(&self.config.export.file_name) else {
            return;
        };

        match write_csv(&self.store.export_csv(), &path) {
            Ok(()) => {
                self.success_message = Some(format!("Exported to: {}", path.display()));
                self.note("Exported attendance");
            }
            Err(e) => {
                tracing::error!("Export failed: {}", e);
                self.error_message = Some(format!("Export failed: {}", e));
            }
        }
    }

    /// Erase all data after the user confirmed.
    fn confirm_reset(&mut self) {
        self.store.reset();
        self.note("All attendance data erased");
    }

    /// Apply a finished import read exactly once.
    fn poll_async_results(&mut self) {
        let Some(mut pending) = self.pending_import.take() else {
            return;
        };

        match pending.rx.try_recv() {
            Ok(Ok(text)) => {
                let added = self.store.import_from_text(&text);
                self.success_message = Some(format!(
                    "Imported {} new students from {}",
                    added.len(),
                    pending.path.display()
                ));
                self.note(format!("Imported {} students", added.len()));
            }
            Ok(Err(e)) => {
                tracing::error!("Import failed: {}", e);
                self.error_message = Some(format!("Import failed: {}", e));
            }
            Err(TryRecvError::Empty) => {
                self.pending_import = Some(pending);
            }
            Err(TryRecvError::Closed) => {
                self.error_message = Some("Import was interrupted".to_string());
            }
        }
    }

    /// Render status bar (display only, no interaction).
    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .min_height(28.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(colors::NEUTRAL, format!("Data: {}", self.store.storage().dir().display()));

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some((at, message)) = &self.last_action {
                            ui.label(format!("{} {}", at.format("%H:%M:%S"), message));
                        }
                    });
                });
            });
    }

    /// Render modal dialogs (error, success, reset confirmation).
    fn show_dialogs(&mut self, ctx: &egui::Context) {
        // Error dialog
        if let Some(ref error) = self.error_message.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(colors::ERROR, error);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.error_message = None;
                    }
                });
        }

        // Success dialog
        if let Some(ref msg) = self.success_message.clone() {
            egui::Window::new("Success")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(colors::SUCCESS, msg);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.success_message = None;
                    }
                });
        }

        // Reset confirmation dialog
        if self.show_reset_confirm {
            egui::Window::new("Reset All Data")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label("Erase every student and attendance record? This cannot be undone.");
                    ui.add_space(10.0);
                    ui.horizontal(|ui| {
                        if ui.button("Cancel").clicked() {
                            self.show_reset_confirm = false;
                        }
                        if ui.button("Reset").clicked() {
                            self.confirm_reset();
                            self.show_reset_confirm = false;
                        }
                    });
                });
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Poll async results
        self.poll_async_results();

        // Request repaint while a file is being read
        if self.is_importing() {
            ctx.request_repaint();
        }

        // Status bar
        self.show_status_bar(ctx);

        // Modal dialogs (error, success, reset confirmation)
        self.show_dialogs(ctx);

        // Main content
        egui::CentralPanel::default().show(ctx, |ui| {
            roster_panel::show(self, ui);
        });
    }
}

/// Open the main window.
pub fn run(store: AttendanceStore<FileStore>, config: AppConfig, rt: tokio::runtime::Runtime) -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Roll Call")
            .with_inner_size([config.ui.window_width, config.ui.window_height])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Roll Call",
        options,
        Box::new(|cc| {
            components::install_fonts(&cc.egui_ctx);
            Ok(Box::new(App::new(store, config, rt)))
        }),
    )
}
