//! Roster panel: add, import, toggle, export, and reset.

use eframe::egui::{self, Align, Layout, Ui};
use egui_extras::{Column, TableBuilder};
use egui_phosphor::regular::{DOWNLOAD_SIMPLE, PLUS, TRASH, UPLOAD_SIMPLE};

use super::app::App;
use super::components::{danger_button, icon_button, icon_button_enabled, panel_header, percentage_label, status_button};
use crate::models::StudentId;

/// Show the roster panel.
pub fn show(app: &mut App, ui: &mut Ui) {
    panel_header(ui, &format!("Attendance for {}", app.store.today().format("%Y-%m-%d")));

    // Toolbar row 1: add student
    ui.horizontal(|ui| {
        ui.label("Student name:");
        let response = ui.add(
            egui::TextEdit::singleline(&mut app.new_student_name)
                .desired_width(220.0)
                .hint_text("Full name..."),
        );
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        if icon_button(ui, PLUS, "Add").clicked() || submitted {
            app.add_student();
            response.request_focus();
        }
    });

    ui.add_space(10.0);

    // Toolbar row 2: file actions
    ui.horizontal(|ui| {
        let importing = app.is_importing();
        if icon_button_enabled(ui, !importing, UPLOAD_SIMPLE, "Import Roster").clicked() {
            app.start_import();
        }
        if importing {
            ui.spinner();
            ui.label("Reading file...");
        }

        ui.add_space(10.0);

        if icon_button(ui, DOWNLOAD_SIMPLE, "Export CSV").clicked() {
            app.export_csv();
        }

        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            if danger_button(ui, TRASH, "Reset").clicked() {
                app.show_reset_confirm = true;
            }
        });
    });

    ui.add_space(15.0);

    show_table(app, ui);
}

fn show_table(app: &mut App, ui: &mut Ui) {
    let rows = app.store.roster_rows();

    ui.label(format!("{} students", rows.len()));
    ui.add_space(10.0);

    if rows.is_empty() {
        ui.weak("Add a student or import a roster to get started.");
        return;
    }

    let mut toggled: Option<StudentId> = None;

    TableBuilder::new(ui)
        .striped(true)
        .cell_layout(Layout::left_to_right(Align::Center))
        .column(Column::remainder().at_least(180.0))
        .column(Column::exact(140.0))
        .column(Column::exact(100.0))
        .header(24.0, |mut header| {
            header.col(|ui| {
                ui.strong("Student");
            });
            header.col(|ui| {
                ui.strong("Today");
            });
            header.col(|ui| {
                ui.strong("Attendance");
            });
        })
        .body(|mut body| {
            for row in &rows {
                let has_records = !app.store.records_for(row.id).is_empty();
                body.row(30.0, |mut table_row| {
                    table_row.col(|ui| {
                        ui.label(&row.name);
                    });
                    table_row.col(|ui| {
                        if status_button(ui, row.today).clicked() {
                            toggled = Some(row.id);
                        }
                    });
                    table_row.col(|ui| {
                        percentage_label(ui, row.percentage, has_records);
                    });
                });
            }
        });

    if let Some(id) = toggled {
        app.toggle(id);
    }
}
