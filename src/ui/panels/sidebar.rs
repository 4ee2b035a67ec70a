// ImageRef - ui/panels/sidebar.rs
//
// Left pane: ingest buttons, paste tip, and the thumbnail list.
//
// The buttons only set request flags on `AppState`; gui.rs opens dialogs and
// starts ingestion. Selection and removal change the gallery directly.
// No direct I/O (presentation layer boundary).

use crate::app::state::AppState;
use crate::core::fit;
use crate::core::model::{ImageRecord, RecordId};
use crate::ui::textures::TextureCache;
use crate::ui::theme;
use egui::{pos2, vec2, Align2, FontId, Rect, RichText, Sense, Stroke};

/// What the user did to a card this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CardAction {
    None,
    Select(RecordId),
    Remove(RecordId),
}

/// Render the sidebar contents.
pub fn render(ui: &mut egui::Ui, state: &mut AppState, textures: &mut TextureCache) {
    ui.add_space(4.0);
    ui.heading("Reference Images");
    ui.add_space(12.0);

    render_ingest_buttons(ui, state);

    ui.add_space(8.0);
    ui.label(
        RichText::new("\u{1f4a1} Tip: You can also paste images directly (Ctrl/Cmd + V)")
            .small()
            .color(theme::MUTED_TEXT),
    );
    ui.add_space(12.0);

    if state.gallery.is_empty() {
        ui.add_space(40.0);
        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new("No reference images yet.\nUpload or capture one to get started!")
                    .color(theme::PLACEHOLDER_TEXT),
            );
        });
        return;
    }

    let mut action = CardAction::None;
    let selected = state.gallery.selected_id();
    let preview_height = state.display.thumbnail_height;

    egui::ScrollArea::vertical()
        .id_salt("thumbnail_list")
        .auto_shrink([false; 2])
        .show(ui, |ui| {
            for record in state.gallery.records() {
                let is_selected = selected == Some(record.id);
                let (_, card_action) =
                    render_card(ui, record, is_selected, preview_height, textures);
                match card_action {
                    CardAction::None => {}
                    other => action = other,
                }
                ui.add_space(theme::CARD_SPACING);
            }
        });

    // Applied after the loop: the list is borrowed while it is drawn.
    match action {
        CardAction::None => {}
        CardAction::Select(id) => state.select(id),
        CardAction::Remove(id) => state.remove(id),
    }
}

fn render_ingest_buttons(ui: &mut egui::Ui, state: &mut AppState) {
    let size = vec2(ui.available_width(), theme::ACTION_BUTTON_HEIGHT);

    let upload = egui::Button::new(
        RichText::new("\u{1f4c1} Upload Images")
            .color(egui::Color32::WHITE)
            .strong(),
    )
    .fill(theme::ACCENT)
    .min_size(size);
    if ui.add(upload).on_hover_text("Choose one or more image files").clicked() {
        state.request_upload = true;
    }

    ui.add_space(6.0);

    let camera = egui::Button::new(
        RichText::new("\u{1f4f7} Take Photo")
            .color(egui::Color32::WHITE)
            .strong(),
    )
    .fill(theme::CAMERA)
    .min_size(size);
    if ui.add(camera).clicked() {
        state.request_camera = true;
    }
}

/// Draw one thumbnail card. Returns the card's rect and what was clicked.
///
/// The card's own click area is allocated before the remove button, so the
/// button sits on top and a click on it never reaches the card.
fn render_card(
    ui: &mut egui::Ui,
    record: &ImageRecord,
    is_selected: bool,
    preview_height: f32,
    textures: &mut TextureCache,
) -> (Rect, CardAction) {
    let width = ui.available_width();
    let (rect, response) = ui.allocate_exact_size(
        vec2(width, preview_height + theme::CARD_TEXT_HEIGHT),
        Sense::click(),
    );
    let response = response.on_hover_cursor(egui::CursorIcon::PointingHand);

    if ui.is_rect_visible(rect) {
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, theme::CARD_ROUNDING, theme::CARD_BG);

        // Cover-fit preview across the top of the card.
        let preview = Rect::from_min_size(rect.min, vec2(width, preview_height));
        let thumb = &record.data.thumbnail;
        let uv = fit::cover_uv(
            (thumb.width as f32, thumb.height as f32),
            (preview.width(), preview.height()),
        );
        let texture = textures.thumbnail(ui.ctx(), record);
        painter.image(
            texture.id(),
            preview,
            Rect::from_min_max(pos2(uv.min.0, uv.min.1), pos2(uv.max.0, uv.max.1)),
            egui::Color32::WHITE,
        );

        // Label and timestamp, truncated to a single line each.
        let text_left = rect.left() + theme::CARD_PADDING;
        let text_width = (width - 2.0 * theme::CARD_PADDING).max(0.0);
        let label = one_line(ui, &record.label, theme::CARD_LABEL_SIZE, theme::CARD_TEXT, text_width);
        painter.galley(
            pos2(text_left, preview.bottom() + theme::CARD_PADDING),
            label,
            theme::CARD_TEXT,
        );
        painter.text(
            pos2(text_left, preview.bottom() + theme::CARD_PADDING + 18.0),
            Align2::LEFT_TOP,
            &record.captured_at,
            FontId::proportional(theme::CARD_TIMESTAMP_SIZE),
            theme::MUTED_TEXT,
        );

        let border = if is_selected {
            theme::ACCENT
        } else if response.hovered() {
            theme::CARD_BORDER_HOVER
        } else {
            theme::CARD_BORDER
        };
        painter.rect_stroke(
            rect,
            theme::CARD_ROUNDING,
            Stroke::new(theme::CARD_STROKE_WIDTH, border),
            egui::StrokeKind::Inside,
        );
    }

    let button_rect = remove_button_rect(rect);
    // Interacted after the card so it wins the hit test. Painted by hand
    // rather than added as a widget to leave the list cursor alone.
    let remove = ui
        .interact(button_rect, ui.id().with(("remove", record.id)), Sense::click())
        .on_hover_cursor(egui::CursorIcon::PointingHand)
        .on_hover_text("Remove");
    if ui.is_rect_visible(button_rect) {
        let painter = ui.painter();
        let fill = if remove.hovered() {
            theme::REMOVE_BUTTON_BG_HOVER
        } else {
            theme::REMOVE_BUTTON_BG
        };
        painter.circle_filled(button_rect.center(), button_rect.size().min_elem() / 2.0, fill);
        painter.text(
            button_rect.center(),
            Align2::CENTER_CENTER,
            "\u{2715}",
            FontId::proportional(theme::CARD_LABEL_SIZE),
            egui::Color32::WHITE,
        );
    }

    let action = if remove.clicked() {
        CardAction::Remove(record.id)
    } else if response.clicked() {
        CardAction::Select(record.id)
    } else {
        CardAction::None
    };
    (rect, action)
}

/// The remove button's hit area, in the top-right corner of a card.
fn remove_button_rect(card: Rect) -> Rect {
    let [bw, bh] = theme::REMOVE_BUTTON_SIZE;
    Rect::from_min_size(
        pos2(
            card.right() - theme::CARD_PADDING - bw,
            card.top() + theme::CARD_PADDING,
        ),
        vec2(bw, bh),
    )
}

/// Lay out `text` on a single line, truncated with an ellipsis to `max_width`.
fn one_line(
    ui: &egui::Ui,
    text: &str,
    size: f32,
    color: egui::Color32,
    max_width: f32,
) -> std::sync::Arc<egui::Galley> {
    let mut job = egui::text::LayoutJob::single_section(
        text.to_owned(),
        egui::TextFormat::simple(FontId::proportional(size), color),
    );
    job.wrap = egui::text::TextWrapping::truncate_at_width(max_width);
    ui.fonts(|fonts| fonts.layout_job(job))
}
