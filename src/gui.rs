// ImageRef - gui.rs
//
// Top-level eframe::App implementation.
// Wires together the panels, applies ingestion events, and turns the request
// flags panels set into dialogs and background ingestion tasks.

use crate::app::ingest::IngestManager;
use crate::app::state::AppState;
use crate::core::decode::is_supported_image_path;
use crate::core::model::IngestSource;
use crate::platform::camera::{self, CommandCapture};
use crate::platform::clipboard::SystemClipboard;
use crate::ui;
use crate::ui::textures::TextureCache;
use crate::util::constants;
use std::path::PathBuf;
use std::sync::Arc;

/// The ImageRef application.
pub struct ImageRefApp {
    pub state: AppState,
    pub ingest: IngestManager,
    pub textures: TextureCache,
    /// External capture program; `None` uses the capture dialog.
    capture_command: Option<CommandCapture>,
}

impl ImageRefApp {
    /// Create a new application instance with the given state.
    pub fn new(
        state: AppState,
        mut ingest: IngestManager,
        capture_command: Option<CommandCapture>,
        ctx: &egui::Context,
    ) -> Self {
        let repaint = ctx.clone();
        ingest.set_waker(Arc::new(move || repaint.request_repaint()));
        Self {
            state,
            ingest,
            textures: TextureCache::new(),
            capture_command,
        }
    }

    /// Apply every finished ingestion task, one event at a time.
    fn drain_ingest_events(&mut self) {
        for event in self.ingest.poll_events() {
            self.state.apply_event(event);
        }
    }

    /// Window-wide input: paste shortcut, dropped files, and keyboard navigation.
    fn handle_input(&mut self, ctx: &egui::Context) {
        let ui::input::FrameInput {
            paste,
            dropped,
            delete,
            escape,
            next,
            previous,
        } = ctx.input(ui::input::read);

        if paste {
            self.state.request_paste = true;
        }

        if !dropped.is_empty() {
            let (images, others): (Vec<PathBuf>, Vec<PathBuf>) =
                dropped.into_iter().partition(|p| is_supported_image_path(p));
            for path in others {
                let msg = format!("Ignored dropped file '{}': not an image.", path.display());
                tracing::info!("{}", msg);
                self.state.status_message = msg.clone();
                self.state.push_warning(msg);
            }
            if !images.is_empty() {
                self.state.status_message = format!("Adding {} image(s)...", images.len());
                self.ingest.ingest_files(IngestSource::Upload, images);
            }
        }

        if delete {
            self.state.remove_selected();
        }
        if escape {
            self.state.gallery.clear_selection();
        }
        if next {
            self.state.gallery.select_next();
        }
        if previous {
            self.state.gallery.select_previous();
        }
    }

    /// Act on the request flags panels and menus set this frame.
    fn handle_requests(&mut self) {
        if std::mem::take(&mut self.state.request_upload) {
            if let Some(files) = rfd::FileDialog::new()
                .set_title("Upload Images")
                .add_filter("Images", constants::SUPPORTED_EXTENSIONS)
                .pick_files()
            {
                self.state.status_message = format!("Adding {} image(s)...", files.len());
                self.ingest.ingest_files(IngestSource::Upload, files);
            }
        }

        if std::mem::take(&mut self.state.request_camera) {
            match self.capture_command {
                Some(ref command) => {
                    self.state.status_message =
                        format!("Capturing with {}...", command.program());
                    self.ingest.capture(command.clone());
                }
                None => {
                    if let Some(path) = camera::pick_capture_file() {
                        self.ingest.ingest_files(IngestSource::Camera, vec![path]);
                    }
                }
            }
        }

        if std::mem::take(&mut self.state.request_paste) {
            self.ingest.ingest_clipboard(SystemClipboard);
        }
    }

    fn render_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Upload Images\u{2026}").clicked() {
                        self.state.request_upload = true;
                        ui.close_menu();
                    }
                    if ui.button("Take Photo\u{2026}").clicked() {
                        self.state.request_camera = true;
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("Edit", |ui| {
                    if ui
                        .add(egui::Button::new("Paste Image").shortcut_text("Ctrl+V"))
                        .clicked()
                    {
                        self.state.request_paste = true;
                        ui.close_menu();
                    }
                    let has_selection = self.state.gallery.selected_id().is_some();
                    ui.add_enabled_ui(has_selection, |ui| {
                        if ui
                            .add(egui::Button::new("Remove Selected").shortcut_text("Del"))
                            .clicked()
                        {
                            self.state.remove_selected();
                            ui.close_menu();
                        }
                    });
                });
                ui.menu_button("Help", |ui| {
                    if ui.button("Warnings").clicked() {
                        self.state.show_warnings = true;
                        ui.close_menu();
                    }
                    if ui.button("About").clicked() {
                        self.state.show_about = true;
                        ui.close_menu();
                    }
                });
            });
        });
    }

    fn render_status_bar(&mut self, ctx: &egui::Context) {
        let in_flight = self.ingest.in_flight();
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if in_flight > 0 {
                    ui.spinner();
                }
                ui.label(&self.state.status_message);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!("{} image(s)", self.state.gallery.len()));
                    if self.state.debug_mode && !self.textures.is_empty() {
                        ui.separator();
                        ui.label(
                            egui::RichText::new(format!("{} texture set(s)", self.textures.len()))
                                .weak(),
                        );
                    }
                    if in_flight > 0 {
                        ui.separator();
                        ui.label(format!("{in_flight} decoding"));
                    }
                    if !self.state.warnings.is_empty() {
                        ui.separator();
                        let text = egui::RichText::new(format!(
                            "\u{26a0} {}",
                            self.state.warnings.len()
                        ))
                        .color(ui::theme::WARNING_TEXT);
                        if ui.link(text).on_hover_text("Show warnings").clicked() {
                            self.state.show_warnings = true;
                        }
                    }
                });
            });
        });
    }
}

impl eframe::App for ImageRefApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_ingest_events();
        self.textures.retain(&self.state.gallery);

        self.handle_input(ctx);

        self.render_menu_bar(ctx);
        self.render_status_bar(ctx);

        // Left sidebar: fixed width, scrolls independently of the viewer.
        egui::SidePanel::left("sidebar")
            .exact_width(self.state.display.sidebar_width)
            .resizable(false)
            .show(ctx, |ui| {
                ui::panels::sidebar::render(ui, &mut self.state, &mut self.textures);
            });

        // Central panel (detail viewer)
        egui::CentralPanel::default().show(ctx, |ui| {
            ui::panels::viewer::render(ui, &self.state, &mut self.textures);
        });

        ui::panels::warnings::render(ctx, &mut self.state);
        ui::panels::about::render(ctx, &mut self.state);

        // Dialogs block, so they run after the frame has been laid out.
        self.handle_requests();

        // Keep the spinner moving while decodes are outstanding.
        if self.ingest.in_flight() > 0 {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}
