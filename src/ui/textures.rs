// ImageRef - ui/textures.rs
//
// GPU texture cache keyed by record id.
//
// Thumbnails are uploaded the first time a card is drawn; full-size textures
// only when a record is first shown in the viewer. Textures of removed
// records are dropped by `retain`, which frees them on the GPU.

use crate::core::decode;
use crate::core::gallery::Gallery;
use crate::core::model::{DecodedImage, ImageRecord, RecordId};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
struct RecordTextures {
    thumbnail: Option<egui::TextureHandle>,
    full: Option<egui::TextureHandle>,
}

/// Per-record texture handles.
#[derive(Default)]
pub struct TextureCache {
    entries: HashMap<RecordId, RecordTextures>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Thumbnail texture for `record`, uploading it on first use.
    pub fn thumbnail(&mut self, ctx: &egui::Context, record: &ImageRecord) -> egui::TextureHandle {
        let shares_pixels = Arc::ptr_eq(&record.data.thumbnail.rgba, &record.data.full.rgba);
        let entry = self.entries.entry(record.id).or_default();
        if let Some(ref handle) = entry.thumbnail {
            return handle.clone();
        }
        let handle = match (&entry.full, shares_pixels) {
            (Some(full), true) => full.clone(),
            _ => upload(ctx, format!("thumb_{}", record.id.0), &record.data.thumbnail),
        };
        entry.thumbnail = Some(handle.clone());
        handle
    }

    /// Full-resolution texture for `record`, uploading it on first use.
    pub fn full(&mut self, ctx: &egui::Context, record: &ImageRecord) -> egui::TextureHandle {
        let shares_pixels = Arc::ptr_eq(&record.data.thumbnail.rgba, &record.data.full.rgba);
        let entry = self.entries.entry(record.id).or_default();
        if let Some(ref handle) = entry.full {
            return handle.clone();
        }
        let handle = match (&entry.thumbnail, shares_pixels) {
            (Some(thumb), true) => thumb.clone(),
            _ => upload(ctx, format!("full_{}", record.id.0), &record.data.full),
        };
        entry.full = Some(handle.clone());
        handle
    }

    /// Drop textures of records no longer in the gallery.
    pub fn retain(&mut self, gallery: &Gallery) {
        let before = self.entries.len();
        self.entries.retain(|id, _| gallery.contains(*id));
        let evicted = before - self.entries.len();
        if evicted > 0 {
            tracing::debug!(evicted, "Released textures of removed records");
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Upload `image`, first shrinking it to the backend's maximum texture side.
fn upload(ctx: &egui::Context, name: String, image: &DecodedImage) -> egui::TextureHandle {
    let max_side = u32::try_from(ctx.input(|i| i.max_texture_side)).unwrap_or(u32::MAX);
    let scaled = decode::downscale_to_side(image, max_side);
    if let Some(ref s) = scaled {
        tracing::debug!(
            texture = %name,
            from = ?image.size(),
            to = ?s.size(),
            max_side,
            "Downscaled image to the GPU texture limit"
        );
    }
    let image = scaled.as_ref().unwrap_or(image);
    let color_image = egui::ColorImage::from_rgba_unmultiplied(image.size(), &image.rgba);
    ctx.load_texture(name, color_image, egui::TextureOptions::LINEAR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{ImageData, IngestSource};

    fn record(id: u64, width: u32, height: u32) -> ImageRecord {
        let image = DecodedImage {
            width,
            height,
            rgba: Arc::from(vec![128u8; (width * height * 4) as usize]),
        };
        ImageRecord {
            id: RecordId(id),
            data: ImageData {
                full: image.clone(),
                thumbnail: image,
            },
            label: "test.png".to_string(),
            captured_at: "2026-01-01 00:00:00".to_string(),
            source: IngestSource::Upload,
        }
    }

    /// Run one headless frame with the given texture limit.
    fn with_frame(max_texture_side: usize, f: impl FnOnce(&egui::Context)) {
        let ctx = egui::Context::default();
        let input = egui::RawInput {
            max_texture_side: Some(max_texture_side),
            ..Default::default()
        };
        let mut f = Some(f);
        let _ = ctx.run(input, |ctx| {
            if let Some(f) = f.take() {
                f(ctx);
            }
        });
    }

    #[test]
    fn test_full_texture_is_clamped_to_max_side() {
        with_frame(64, |ctx| {
            let mut cache = TextureCache::new();
            let handle = cache.full(ctx, &record(1, 200, 50));
            assert_eq!(handle.size(), [64, 16]);
        });
    }

    #[test]
    fn test_fitting_texture_keeps_its_size() {
        with_frame(2048, |ctx| {
            let mut cache = TextureCache::new();
            let handle = cache.full(ctx, &record(1, 30, 20));
            assert_eq!(handle.size(), [30, 20]);
        });
    }

    #[test]
    fn test_shared_pixels_share_one_texture() {
        with_frame(2048, |ctx| {
            let mut cache = TextureCache::new();
            let r = record(3, 8, 8);
            let thumb = cache.thumbnail(ctx, &r);
            let full = cache.full(ctx, &r);
            assert_eq!(thumb.id(), full.id());
            assert_eq!(cache.len(), 1);
        });
    }

    #[test]
    fn test_retain_drops_removed_records() {
        with_frame(2048, |ctx| {
            let mut cache = TextureCache::new();
            let mut gallery = Gallery::new();
            let kept = record(1, 2, 2);
            let gone = record(2, 2, 2);
            cache.thumbnail(ctx, &kept);
            cache.thumbnail(ctx, &gone);
            assert!(gallery.append(kept));
            cache.retain(&gallery);
            assert_eq!(cache.len(), 1);
            cache.retain(&Gallery::new());
            assert!(cache.is_empty());
        });
    }
}
