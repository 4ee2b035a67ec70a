// ImageRef - ui/panels/viewer.rs
//
// Right pane: the selected record at the largest size that fits, with its
// label and timestamp underneath, or a placeholder when nothing is selected.

use crate::app::state::AppState;
use crate::core::fit;
use crate::ui::textures::TextureCache;
use crate::ui::theme;
use egui::{vec2, RichText};

/// Render the detail viewer (central panel).
pub fn render(ui: &mut egui::Ui, state: &AppState, textures: &mut TextureCache) {
    let Some(record) = state.gallery.selected() else {
        render_placeholder(ui);
        return;
    };

    let available = ui.available_size();
    let image_area = (
        available.x,
        (available.y - theme::VIEWER_CAPTION_HEIGHT).max(0.0),
    );
    let full = &record.data.full;
    let (w, h) = fit::contain_size((full.width as f32, full.height as f32), image_area);
    let texture = textures.full(ui.ctx(), record);

    ui.vertical_centered(|ui| {
        ui.add_space(((image_area.1 - h) / 2.0).max(0.0));
        ui.add(egui::Image::from_texture(
            egui::load::SizedTexture::new(texture.id(), vec2(w, h)),
        ))
        .on_hover_text(format!("{} \u{00d7} {} px", full.width, full.height));
        ui.add_space(12.0);
        ui.label(
            RichText::new(format!("{} \u{2022} {}", record.label, record.captured_at))
                .color(theme::MUTED_TEXT),
        );
    });
}

fn render_placeholder(ui: &mut egui::Ui) {
    let available = ui.available_height();
    ui.vertical_centered(|ui| {
        ui.add_space((available / 2.0 - 60.0).max(0.0));
        ui.label(RichText::new("\u{1f5bc}").size(48.0).color(theme::PLACEHOLDER_TEXT));
        ui.add_space(20.0);
        ui.label(
            RichText::new("Select an image from the sidebar to view it here")
                .size(18.0)
                .color(theme::PLACEHOLDER_TEXT),
        );
    });
}
