// ImageRef - core/clipboard.rs
//
// Platform-neutral view of clipboard contents and the image-only filter
// applied on paste. Reading the OS clipboard lives in platform/clipboard.rs.

use crate::core::model::RawPayload;

/// One item found on the clipboard.
#[derive(Clone, PartialEq, Eq)]
pub enum ClipboardItem {
    /// A bitmap in straight RGBA8.
    Image {
        width: u32,
        height: u32,
        bytes: Vec<u8>,
    },
    /// Plain text. Never ingested.
    Text(String),
}

impl ClipboardItem {
    pub fn is_image(&self) -> bool {
        matches!(self, ClipboardItem::Image { .. })
    }
}

impl std::fmt::Debug for ClipboardItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClipboardItem::Image { width, height, .. } => {
                write!(f, "Image({width}x{height})")
            }
            // Clipboard text may be sensitive; only its length is shown.
            ClipboardItem::Text(text) => write!(f, "Text({} chars)", text.chars().count()),
        }
    }
}

/// Keep the image-typed items and turn each into a payload for decoding.
pub fn image_payloads(items: Vec<ClipboardItem>) -> Vec<RawPayload> {
    items
        .into_iter()
        .filter_map(|item| match item {
            ClipboardItem::Image {
                width,
                height,
                bytes,
            } => Some(RawPayload::Rgba {
                width,
                height,
                bytes,
            }),
            ClipboardItem::Text(_) => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_item() -> ClipboardItem {
        ClipboardItem::Image {
            width: 1,
            height: 1,
            bytes: vec![0, 0, 0, 255],
        }
    }

    #[test]
    fn test_image_and_text_yields_one_payload() {
        let items = vec![image_item(), ClipboardItem::Text("hello".to_string())];
        let payloads = image_payloads(items);
        assert_eq!(payloads.len(), 1);
        assert!(matches!(
            payloads[0],
            RawPayload::Rgba {
                width: 1,
                height: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_text_only_yields_nothing() {
        let payloads = image_payloads(vec![ClipboardItem::Text("a.png".to_string())]);
        assert!(payloads.is_empty());
    }

    #[test]
    fn test_debug_hides_text_content() {
        let dbg = format!("{:?}", ClipboardItem::Text("secret".to_string()));
        assert_eq!(dbg, "Text(6 chars)");
        assert!(image_item().is_image());
    }
}
