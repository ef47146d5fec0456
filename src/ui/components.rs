//! Shared UI components.

use eframe::egui::{self, Color32, Response, RichText, Ui};
use egui_phosphor::regular::{CHECK_CIRCLE, X_CIRCLE};

use crate::models::AttendanceStatus;

/// Status indicator colors.
pub mod colors {
    use super::Color32;

    pub const SUCCESS: Color32 = Color32::from_rgb(100, 200, 100);
    pub const ERROR: Color32 = Color32::from_rgb(255, 100, 100);
    pub const WARNING: Color32 = Color32::from_rgb(255, 200, 100);
    pub const NEUTRAL: Color32 = Color32::from_rgb(150, 150, 150);
}

/// Register the Phosphor icon font.
pub fn install_fonts(ctx: &egui::Context) {
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
    ctx.set_fonts(fonts);
}

/// Render a panel header with title.
pub fn panel_header(ui: &mut Ui, title: &str) {
    ui.heading(RichText::new(title).size(24.0));
    ui.add_space(10.0);
    ui.separator();
    ui.add_space(10.0);
}

/// Button with a leading icon.
pub fn icon_button(ui: &mut Ui, icon: &str, label: &str) -> Response {
    ui.button(RichText::new(format!("{icon} {label}")).size(14.0))
}

/// Icon button that is greyed out when `enabled` is false.
pub fn icon_button_enabled(ui: &mut Ui, enabled: bool, icon: &str, label: &str) -> Response {
    ui.add_enabled(enabled, egui::Button::new(RichText::new(format!("{icon} {label}")).size(14.0)))
}

/// Red button for destructive actions.
pub fn danger_button(ui: &mut Ui, icon: &str, label: &str) -> Response {
    ui.button(RichText::new(format!("{icon} {label}")).size(14.0).color(colors::ERROR))
}

/// Clickable today-status cell.
pub fn status_button(ui: &mut Ui, status: AttendanceStatus) -> Response {
    let (icon, text, color) = match status {
        AttendanceStatus::Present => (CHECK_CIRCLE, "Present", colors::SUCCESS),
        AttendanceStatus::Absent => (X_CIRCLE, "Absent", colors::NEUTRAL),
    };
    ui.add(egui::Button::new(RichText::new(format!("{icon} {text}")).color(color)).min_size(egui::vec2(110.0, 0.0)))
        .on_hover_text("Click to toggle today's attendance")
}

/// Percentage label colored by how good it is.
pub fn percentage_label(ui: &mut Ui, percentage: u8, has_records: bool) {
    let color = if !has_records {
        colors::NEUTRAL
    } else if percentage >= 80 {
        colors::SUCCESS
    } else if percentage >= 50 {
        colors::WARNING
    } else {
        colors::ERROR
    };
    ui.colored_label(color, format!("{percentage}%"));
}
