// ImageRef - ui/theme.rs
//
// Colour scheme, text sizing, and layout constants.
// No dependencies on app state or business logic.

use egui::Color32;

/// Upload button fill and selection highlight.
pub const ACCENT: Color32 = Color32::from_rgb(74, 158, 255);

/// Camera button fill.
pub const CAMERA: Color32 = Color32::from_rgb(255, 74, 158);

/// Thumbnail card background.
pub const CARD_BG: Color32 = Color32::from_rgb(51, 51, 51);

/// Unselected thumbnail card border.
pub const CARD_BORDER: Color32 = Color32::from_rgb(68, 68, 68);

/// Card border while hovered.
pub const CARD_BORDER_HOVER: Color32 = Color32::from_rgb(110, 110, 110);

/// Label text on cards.
pub const CARD_TEXT: Color32 = Color32::from_rgb(240, 240, 240);

/// Secondary text: timestamps, tips, captions.
pub const MUTED_TEXT: Color32 = Color32::from_rgb(136, 136, 136);

/// Placeholder text in empty states.
pub const PLACEHOLDER_TEXT: Color32 = Color32::from_rgb(102, 102, 102);

/// Translucent backdrop behind the remove button.
pub const REMOVE_BUTTON_BG: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 180);
pub const REMOVE_BUTTON_BG_HOVER: Color32 = Color32::from_rgb(200, 40, 40);

/// Warning text in the status bar.
pub const WARNING_TEXT: Color32 = Color32::from_rgb(217, 119, 6); // Amber 600

/// Layout constants.
pub const CARD_ROUNDING: f32 = 8.0;
pub const CARD_STROKE_WIDTH: f32 = 2.0;
pub const CARD_PADDING: f32 = 8.0;
pub const CARD_TEXT_HEIGHT: f32 = 44.0;
pub const CARD_SPACING: f32 = 10.0;
pub const CARD_LABEL_SIZE: f32 = 12.0;
pub const CARD_TIMESTAMP_SIZE: f32 = 10.0;
pub const REMOVE_BUTTON_SIZE: [f32; 2] = [24.0, 24.0];
pub const ACTION_BUTTON_HEIGHT: f32 = 36.0;
pub const VIEWER_CAPTION_HEIGHT: f32 = 40.0;

/// Apply the light/dark theme and body font size to every style.
pub fn apply(ctx: &egui::Context, dark_mode: bool, font_size: f32) {
    ctx.set_theme(if dark_mode {
        egui::Theme::Dark
    } else {
        egui::Theme::Light
    });

    ctx.all_styles_mut(|style| {
        for (text_style, font_id) in style.text_styles.iter_mut() {
            font_id.size = match text_style {
                egui::TextStyle::Small => font_size * 0.75,
                egui::TextStyle::Heading => font_size * 1.6,
                _ => font_size,
            };
        }
    });

    tracing::debug!(dark_mode, font_size, "Theme applied");
}
