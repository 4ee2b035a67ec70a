// ImageRef - platform/clipboard.rs
//
// System clipboard access via arboard.
//
// arboard exposes at most one bitmap and one text item at a time. Both are
// reported so the paste filter in core/clipboard.rs decides what is ingested.

use crate::app::ingest::ClipboardSource;
use crate::core::clipboard::ClipboardItem;

/// The OS clipboard. A new connection is opened per read because paste is
/// infrequent and some platforms drop idle clipboard connections.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl ClipboardSource for SystemClipboard {
    fn read_items(&mut self) -> Vec<ClipboardItem> {
        read_clipboard_items()
    }
}

/// Read every item currently on the clipboard.
///
/// An unavailable clipboard or an empty one yields an empty list.
pub fn read_clipboard_items() -> Vec<ClipboardItem> {
    let mut clip = match arboard::Clipboard::new() {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(error = %e, "Cannot open system clipboard");
            return Vec::new();
        }
    };

    let mut items = Vec::new();

    match clip.get_image() {
        Ok(img) => items.push(ClipboardItem::Image {
            width: img.width as u32,
            height: img.height as u32,
            bytes: img.bytes.into_owned(),
        }),
        Err(arboard::Error::ContentNotAvailable) => {}
        Err(e) => tracing::debug!(error = %e, "Clipboard image unavailable"),
    }

    match clip.get_text() {
        Ok(text) => items.push(ClipboardItem::Text(text)),
        Err(arboard::Error::ContentNotAvailable) => {}
        Err(e) => tracing::debug!(error = %e, "Clipboard text unavailable"),
    }

    items
}
