// ImageRef - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// These types are the shared vocabulary across all layers.

use crate::util::constants;
use crate::util::error::ImageRefError;
use std::fmt;
use std::sync::Arc;

// =============================================================================
// Ingest source
// =============================================================================

/// The input channel a payload arrived through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IngestSource {
    /// Native file dialog, drag-and-drop, or a path given on the command line.
    Upload,
    /// Camera capture dialog or external capture program.
    Camera,
    /// System clipboard.
    Paste,
}

impl IngestSource {
    /// The fixed display label used by channels that carry no file name.
    ///
    /// Uploads are labelled with their original file name instead, so this
    /// returns `None` for `Upload`.
    pub fn fixed_label(&self) -> Option<&'static str> {
        match self {
            IngestSource::Upload => None,
            IngestSource::Camera => Some(constants::CAMERA_LABEL),
            IngestSource::Paste => Some(constants::PASTE_LABEL),
        }
    }

    /// Human-readable channel name for logs and the status bar.
    pub fn label(&self) -> &'static str {
        match self {
            IngestSource::Upload => "upload",
            IngestSource::Camera => "camera",
            IngestSource::Paste => "paste",
        }
    }
}

impl fmt::Display for IngestSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Records
// =============================================================================

/// Opaque identifier of a record, unique within the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A decoded bitmap in straight (unpremultiplied) RGBA8, row-major.
///
/// The pixel buffer is shared, so cloning a record never copies pixels.
#[derive(Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Arc<[u8]>,
}

impl DecodedImage {
    /// `[width, height]` as `usize`, the shape egui texture uploads expect.
    pub fn size(&self) -> [usize; 2] {
        [self.width as usize, self.height as usize]
    }
}

// Pixel buffers are far too large to be useful in debug output.
impl fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba.len())
            .finish()
    }
}

/// The renderable form of an ingested image: the full-resolution bitmap and a
/// downscaled copy for the sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub full: DecodedImage,
    pub thumbnail: DecodedImage,
}

/// One ingested image plus its display metadata.
///
/// Records are immutable once created; the gallery only ever appends or
/// removes whole records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub id: RecordId,
    pub data: ImageData,
    /// Original file name for uploads, or the channel's fixed label.
    pub label: String,
    /// Local-time creation timestamp, preformatted for display.
    pub captured_at: String,
    pub source: IngestSource,
}

// =============================================================================
// Payloads and ingestion events
// =============================================================================

/// A raw image payload obtained from an input channel, not yet decoded.
#[derive(Clone, PartialEq, Eq)]
pub enum RawPayload {
    /// Encoded file contents (PNG, JPEG, ...). The format is sniffed from the bytes.
    Encoded { bytes: Vec<u8> },
    /// An already-decoded RGBA8 bitmap, as the OS clipboard hands them out.
    Rgba {
        width: u32,
        height: u32,
        bytes: Vec<u8>,
    },
}

impl fmt::Debug for RawPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawPayload::Encoded { bytes } => f
                .debug_struct("Encoded")
                .field("bytes", &bytes.len())
                .finish(),
            RawPayload::Rgba {
                width,
                height,
                bytes,
            } => f
                .debug_struct("Rgba")
                .field("width", width)
                .field("height", height)
                .field("bytes", &bytes.len())
                .finish(),
        }
    }
}

/// Completion message sent from a background ingestion task to the UI thread.
///
/// Every task sends exactly one event.
#[derive(Debug)]
pub enum IngestEvent {
    /// The payload decoded successfully; the owner should create a record.
    Decoded {
        source: IngestSource,
        /// File name for uploads; `None` for channels with a fixed label.
        file_name: Option<String>,
        data: ImageData,
    },

    /// The payload could not be read or decoded. No record is created.
    Failed {
        source: IngestSource,
        /// What the user would recognise the payload as (file name or channel).
        origin: String,
        error: ImageRefError,
    },

    /// A capture produced no image (the user backed out). Not an error.
    CaptureCancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_labels() {
        assert_eq!(IngestSource::Upload.fixed_label(), None);
        assert_eq!(IngestSource::Camera.fixed_label(), Some("Camera capture"));
        assert_eq!(IngestSource::Paste.fixed_label(), Some("Pasted image"));
    }

    #[test]
    fn test_payload_debug_omits_bytes() {
        let payload = RawPayload::Encoded {
            bytes: vec![0xAB; 4096],
        };
        let dbg = format!("{payload:?}");
        assert!(dbg.contains("4096"), "{dbg}");
        assert!(!dbg.contains("171"), "raw bytes leaked into debug output: {dbg}");
    }
}
