// ImageRef - app/state.rs
//
// Application state management. Holds the gallery (records + selection),
// status line, warnings, display options, and the request flags that panels
// set for gui.rs to act on.
// Owned by the eframe::App implementation and passed to panels by reference.

use crate::core::gallery::Gallery;
use crate::core::model::{ImageRecord, IngestEvent, IngestSource, RecordId};
use crate::util::constants;
use chrono::{DateTime, Local};

/// Display options derived from config.toml.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayOptions {
    /// chrono strftime pattern for `captured_at`.
    pub timestamp_format: String,
    /// Width of the thumbnail sidebar (points).
    pub sidebar_width: f32,
    /// Height of the cropped preview in each thumbnail card (points).
    pub thumbnail_height: f32,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            timestamp_format: constants::DEFAULT_TIMESTAMP_FORMAT.to_string(),
            sidebar_width: constants::DEFAULT_SIDEBAR_WIDTH,
            thumbnail_height: constants::DEFAULT_THUMBNAIL_HEIGHT,
        }
    }
}

/// Top-level application state.
#[derive(Debug)]
pub struct AppState {
    /// Ingested records and the current selection.
    pub gallery: Gallery,

    /// Display options.
    pub display: DisplayOptions,

    /// Status message for the status bar.
    pub status_message: String,

    /// Non-fatal warnings accumulated during the session (newest last).
    pub warnings: Vec<String>,

    /// Whether to show the warnings window.
    pub show_warnings: bool,

    /// Whether to show the About dialog.
    pub show_about: bool,

    /// Whether debug mode is enabled (--debug). Adds diagnostics to the status bar.
    pub debug_mode: bool,

    // ---- Requests written by panels, consumed by gui.rs each frame ----
    /// Open the multi-select upload dialog.
    pub request_upload: bool,

    /// Start a camera capture.
    pub request_camera: bool,

    /// Read the clipboard and ingest any image on it.
    pub request_paste: bool,

    /// Id to hand out to the next record.
    next_id: u64,
}

impl AppState {
    /// Create an empty session.
    pub fn new(display: DisplayOptions, debug_mode: bool) -> Self {
        Self {
            gallery: Gallery::new(),
            display,
            status_message: "Ready. Upload, capture, or paste an image to begin.".to_string(),
            warnings: Vec::new(),
            show_warnings: false,
            show_about: false,
            debug_mode,
            request_upload: false,
            request_camera: false,
            request_paste: false,
            next_id: 1,
        }
    }

    /// Apply a completion event from a background ingestion task.
    ///
    /// This is the only place records are created.
    pub fn apply_event(&mut self, event: IngestEvent) {
        self.apply_event_at(event, Local::now());
    }

    /// As `apply_event`, with an explicit creation time.
    pub fn apply_event_at(&mut self, event: IngestEvent, now: DateTime<Local>) {
        match event {
            IngestEvent::Decoded {
                source,
                file_name,
                data,
            } => {
                let record = ImageRecord {
                    id: self.next_record_id(),
                    data,
                    label: label_for(source, file_name.as_deref()),
                    captured_at: now.format(&self.display.timestamp_format).to_string(),
                    source,
                };
                tracing::info!(
                    id = %record.id,
                    %source,
                    label = %record.label,
                    width = record.data.full.width,
                    height = record.data.full.height,
                    "Record added"
                );
                self.status_message = format!("Added \"{}\".", record.label);
                self.gallery.append(record);
            }
            IngestEvent::Failed {
                source,
                origin,
                error,
            } => {
                tracing::warn!(%source, origin = %origin, error = %error, "Ingestion failed");
                let msg = format!("Could not add {origin}: {error}");
                self.status_message = msg.clone();
                self.push_warning(msg);
            }
            IngestEvent::CaptureCancelled => {
                tracing::debug!("Camera capture cancelled");
            }
        }
    }

    /// Focus `id` in the detail pane. Unknown ids clear the selection.
    pub fn select(&mut self, id: RecordId) {
        self.gallery.select(id);
        tracing::debug!(%id, selected = self.gallery.selected_id().is_some(), "Selection changed");
    }

    /// Remove `id` from the gallery. No-op if it is not present.
    pub fn remove(&mut self, id: RecordId) {
        if let Some(record) = self.gallery.remove(id) {
            tracing::info!(%id, label = %record.label, "Record removed");
            self.status_message = format!("Removed \"{}\".", record.label);
        }
    }

    /// Remove whichever record is selected.
    pub fn remove_selected(&mut self) {
        if let Some(id) = self.gallery.selected_id() {
            self.remove(id);
        }
    }

    /// Record a non-fatal warning, discarding the oldest beyond the cap.
    pub fn push_warning(&mut self, message: String) {
        self.warnings.push(message);
        if self.warnings.len() > constants::MAX_RETAINED_WARNINGS {
            let excess = self.warnings.len() - constants::MAX_RETAINED_WARNINGS;
            self.warnings.drain(..excess);
        }
    }

    fn next_record_id(&mut self) -> RecordId {
        let id = RecordId(self.next_id);
        self.next_id += 1;
        id
    }
}

/// Display label for a new record.
///
/// Uploads keep their original file name; camera and paste use fixed labels.
pub fn label_for(source: IngestSource, file_name: Option<&str>) -> String {
    if let Some(fixed) = source.fixed_label() {
        return fixed.to_string();
    }
    match file_name {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        _ => constants::UNNAMED_UPLOAD_LABEL.to_string(),
    }
}
