// ImageRef - core/fit.rs
//
// Geometry for placing an image inside a frame. Pure functions over plain
// floats so they can be tested without a rendering context.

/// Normalised texture coordinates: `(min_u, min_v)` to `(max_u, max_v)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvRect {
    pub min: (f32, f32),
    pub max: (f32, f32),
}

impl UvRect {
    pub const FULL: UvRect = UvRect {
        min: (0.0, 0.0),
        max: (1.0, 1.0),
    };
}

/// Centre crop that makes `image` cover `frame` completely (CSS `object-fit: cover`).
///
/// Returns the sub-rectangle of the texture to draw stretched over the whole
/// frame. Degenerate sizes return the full texture.
pub fn cover_uv(image: (f32, f32), frame: (f32, f32)) -> UvRect {
    let (iw, ih) = image;
    let (fw, fh) = frame;
    if iw <= 0.0 || ih <= 0.0 || fw <= 0.0 || fh <= 0.0 {
        return UvRect::FULL;
    }

    let image_aspect = iw / ih;
    let frame_aspect = fw / fh;

    if image_aspect > frame_aspect {
        // Image is wider than the frame: trim left and right.
        let visible = frame_aspect / image_aspect;
        let margin = (1.0 - visible) / 2.0;
        UvRect {
            min: (margin, 0.0),
            max: (1.0 - margin, 1.0),
        }
    } else {
        let visible = image_aspect / frame_aspect;
        let margin = (1.0 - visible) / 2.0;
        UvRect {
            min: (0.0, margin),
            max: (1.0, 1.0 - margin),
        }
    }
}

/// Largest size with the image's aspect ratio that fits inside `available`
/// (CSS `object-fit: contain`), never enlarged beyond the image's own size.
pub fn contain_size(image: (f32, f32), available: (f32, f32)) -> (f32, f32) {
    let (iw, ih) = image;
    let (aw, ah) = available;
    if iw <= 0.0 || ih <= 0.0 || aw <= 0.0 || ah <= 0.0 {
        return (0.0, 0.0);
    }
    let scale = (aw / iw).min(ah / ih).min(1.0);
    (iw * scale, ih * scale)
}

/// Pixel size of `size` shrunk so neither side exceeds `max_side`, keeping
/// the aspect ratio. Sizes already within bounds are returned unchanged.
pub fn clamp_to_side(size: (u32, u32), max_side: u32) -> (u32, u32) {
    let (w, h) = size;
    let longest = w.max(h);
    if longest <= max_side || max_side == 0 {
        return size;
    }
    let scale = max_side as f64 / longest as f64;
    let shrink = |side: u32| ((side as f64 * scale).round() as u32).clamp(1, max_side);
    (shrink(w), shrink(h))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_cover_wide_image_crops_sides() {
        // 400x100 into a 200x100 frame: only half the width is visible.
        let uv = cover_uv((400.0, 100.0), (200.0, 100.0));
        assert!(approx(uv.min.0, 0.25) && approx(uv.max.0, 0.75), "{uv:?}");
        assert!(approx(uv.min.1, 0.0) && approx(uv.max.1, 1.0), "{uv:?}");
    }

    #[test]
    fn test_cover_tall_image_crops_top_and_bottom() {
        let uv = cover_uv((100.0, 400.0), (100.0, 100.0));
        assert!(approx(uv.min.1, 0.375) && approx(uv.max.1, 0.625), "{uv:?}");
        assert!(approx(uv.min.0, 0.0) && approx(uv.max.0, 1.0), "{uv:?}");
    }

    #[test]
    fn test_cover_same_aspect_is_full() {
        assert_eq!(cover_uv((640.0, 480.0), (320.0, 240.0)), UvRect::FULL);
        assert_eq!(cover_uv((0.0, 10.0), (5.0, 5.0)), UvRect::FULL);
    }

    #[test]
    fn test_contain_shrinks_preserving_aspect() {
        let (w, h) = contain_size((2000.0, 1000.0), (800.0, 800.0));
        assert!(approx(w, 800.0) && approx(h, 400.0), "{w}x{h}");
    }

    #[test]
    fn test_contain_never_upscales() {
        assert_eq!(contain_size((100.0, 50.0), (1000.0, 1000.0)), (100.0, 50.0));
    }

    #[test]
    fn test_contain_degenerate_is_zero() {
        assert_eq!(contain_size((100.0, 50.0), (0.0, 300.0)), (0.0, 0.0));
    }

    #[test]
    fn test_clamp_to_side_shrinks_longest_edge() {
        assert_eq!(clamp_to_side((9000, 3000), 8192), (8192, 2731));
        assert_eq!(clamp_to_side((3000, 16384), 8192), (1500, 8192));
    }

    #[test]
    fn test_clamp_to_side_keeps_fitting_sizes() {
        assert_eq!(clamp_to_side((8192, 8192), 8192), (8192, 8192));
        assert_eq!(clamp_to_side((10, 5), 2048), (10, 5));
    }

    #[test]
    fn test_clamp_to_side_never_reaches_zero() {
        assert_eq!(clamp_to_side((10_000, 1), 100), (100, 1));
    }
}
