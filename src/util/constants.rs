// ImageRef - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "ImageRef";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "ImageRef";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Record labels
// =============================================================================

/// Label given to every record captured through the camera channel.
pub const CAMERA_LABEL: &str = "Camera capture";

/// Label given to every record created from a clipboard paste.
pub const PASTE_LABEL: &str = "Pasted image";

/// Label used when an uploaded path has no usable file name.
pub const UNNAMED_UPLOAD_LABEL: &str = "Untitled image";

// =============================================================================
// Ingestion limits
// =============================================================================

/// Image file extensions offered by the upload dialog and accepted on drop.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "bmp", "tif", "tiff", "ico",
];

/// Default maximum size of a single image file, in megabytes.
pub const DEFAULT_MAX_FILE_SIZE_MB: u64 = 64;

/// Minimum configurable file size limit (MB).
pub const MIN_MAX_FILE_SIZE_MB: u64 = 1;

/// Maximum configurable file size limit (MB).
/// Anything larger is almost certainly not a reference image.
pub const MAX_MAX_FILE_SIZE_MB: u64 = 1_024;

/// Hard limit on either side of a decoded image, in pixels.
/// Guards against decompression bombs exhausting memory.
pub const MAX_IMAGE_DIMENSION: u32 = 16_384;

/// Retry limits for transient I/O errors while reading an image file.
pub const MAX_READ_RETRIES: u32 = 3;
pub const READ_RETRY_DELAYS_MS: [u64; 3] = [50, 100, 200];

/// Upper bound on payloads decoding at the same time. Each decode holds the
/// encoded bytes, the decoded bitmap and its RGBA copy.
pub const MAX_DECODE_WORKERS: usize = 4;

// =============================================================================
// Thumbnails
// =============================================================================

/// Default longest edge of a generated thumbnail, in pixels.
pub const DEFAULT_THUMBNAIL_EDGE: u32 = 320;

/// Minimum configurable thumbnail edge (pixels).
pub const MIN_THUMBNAIL_EDGE: u32 = 64;

/// Maximum configurable thumbnail edge (pixels).
pub const MAX_THUMBNAIL_EDGE: u32 = 1_024;

// =============================================================================
// UI defaults
// =============================================================================

/// Default UI body font size in points.
pub const DEFAULT_FONT_SIZE: f32 = 14.0;

/// Minimum user-configurable UI font size (points).
pub const MIN_FONT_SIZE: f32 = 10.0;

/// Maximum user-configurable UI font size (points).
pub const MAX_FONT_SIZE: f32 = 24.0;

/// Default width of the thumbnail sidebar (points).
pub const DEFAULT_SIDEBAR_WIDTH: f32 = 300.0;

/// Minimum configurable sidebar width (points).
pub const MIN_SIDEBAR_WIDTH: f32 = 180.0;

/// Maximum configurable sidebar width (points).
pub const MAX_SIDEBAR_WIDTH: f32 = 600.0;

/// Default height of the cropped preview inside a thumbnail card (points).
pub const DEFAULT_THUMBNAIL_HEIGHT: f32 = 120.0;

/// Minimum configurable thumbnail card preview height (points).
pub const MIN_THUMBNAIL_HEIGHT: f32 = 48.0;

/// Maximum configurable thumbnail card preview height (points).
pub const MAX_THUMBNAIL_HEIGHT: f32 = 400.0;

/// Default chrono strftime pattern for record timestamps.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Maximum number of warnings retained for the warnings window.
/// Older warnings are discarded first.
pub const MAX_RETAINED_WARNINGS: usize = 200;

// =============================================================================
// Camera
// =============================================================================

/// Placeholder substituted with the output file path in `capture_command`.
pub const CAPTURE_OUTPUT_PLACEHOLDER: &str = "{output}";

/// Extension of the temporary file a capture command writes into.
pub const CAPTURE_OUTPUT_EXTENSION: &str = "jpg";

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
