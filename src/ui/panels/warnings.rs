// ImageRef - ui/panels/warnings.rs
//
// Warnings window: every non-fatal problem of the session (unreadable files,
// payloads that were not images, config problems), newest first.

use crate::app::state::AppState;
use crate::ui::theme;

/// Render the warnings window (if `state.show_warnings` is true).
pub fn render(ctx: &egui::Context, state: &mut AppState) {
    if !state.show_warnings {
        return;
    }

    let mut open = true;
    let mut clear = false;
    egui::Window::new(format!("Warnings ({})", state.warnings.len()))
        .id(egui::Id::new("warnings_window"))
        .open(&mut open)
        .collapsible(false)
        .default_width(480.0)
        .default_height(300.0)
        .show(ctx, |ui| {
            if state.warnings.is_empty() {
                ui.label(egui::RichText::new("No warnings.").weak());
                return;
            }
            egui::ScrollArea::vertical()
                .max_height(260.0)
                .show(ui, |ui| {
                    for warning in state.warnings.iter().rev() {
                        ui.label(egui::RichText::new(warning).color(theme::WARNING_TEXT));
                        ui.separator();
                    }
                });
            if ui.button("Clear").clicked() {
                clear = true;
            }
        });

    if clear {
        state.warnings.clear();
    }
    if !open {
        state.show_warnings = false;
    }
}
