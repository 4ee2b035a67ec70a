// ImageRef - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation. All errors keep their causal chain so
// the status bar and the log can both show where a failure came from.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all ImageRef operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum ImageRefError {
    /// A payload could not be turned into a renderable image.
    Decode(DecodeError),

    /// A payload could not be obtained from its input channel.
    Ingest(IngestError),

    /// The external capture program failed.
    Capture(CaptureError),
}

impl fmt::Display for ImageRefError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(e) => write!(f, "Decode error: {e}"),
            Self::Ingest(e) => write!(f, "Ingest error: {e}"),
            Self::Capture(e) => write!(f, "Capture error: {e}"),
        }
    }
}

impl std::error::Error for ImageRefError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode(e) => Some(e),
            Self::Ingest(e) => Some(e),
            Self::Capture(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Decode errors
// ---------------------------------------------------------------------------

/// Errors raised while decoding a raw payload into pixels.
#[derive(Debug)]
pub enum DecodeError {
    /// The bytes are not an image in any supported format, or are corrupt.
    Image(image::ImageError),

    /// The payload was empty.
    Empty,

    /// A raw RGBA buffer did not match its declared dimensions.
    PixelBufferMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// The image exceeds the maximum supported dimension.
    TooLarge {
        width: u32,
        height: u32,
        max_dimension: u32,
    },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image(e) => write!(f, "not a decodable image: {e}"),
            Self::Empty => write!(f, "payload is empty"),
            Self::PixelBufferMismatch {
                width,
                height,
                expected,
                actual,
            } => write!(
                f,
                "pixel buffer for {width}x{height} image has {actual} bytes, expected {expected}"
            ),
            Self::TooLarge {
                width,
                height,
                max_dimension,
            } => write!(
                f,
                "image is {width}x{height}, larger than the {max_dimension}px limit"
            ),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Image(e) => Some(e),
            _ => None,
        }
    }
}

impl From<image::ImageError> for DecodeError {
    fn from(e: image::ImageError) -> Self {
        Self::Image(e)
    }
}

impl From<DecodeError> for ImageRefError {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

// ---------------------------------------------------------------------------
// Ingest errors
// ---------------------------------------------------------------------------

/// Errors raised while obtaining the raw bytes of a payload.
#[derive(Debug)]
pub enum IngestError {
    /// The file could not be read.
    Io { path: PathBuf, source: io::Error },

    /// The file exceeds the configured maximum size.
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// A worker panicked while handling the payload.
    WorkerPanicked { message: String },

    /// No worker thread could be started.
    WorkerUnavailable { source: io::Error },
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read '{}': {source}", path.display())
            }
            Self::FileTooLarge {
                path,
                size,
                max_size,
            } => write!(
                f,
                "'{}' is {size} bytes, larger than the {max_size} byte limit",
                path.display()
            ),
            Self::WorkerPanicked { message } => {
                write!(f, "worker stopped unexpectedly: {message}")
            }
            Self::WorkerUnavailable { source } => {
                write!(f, "cannot start worker thread: {source}")
            }
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::WorkerUnavailable { source } => Some(source),
            _ => None,
        }
    }
}

impl From<IngestError> for ImageRefError {
    fn from(e: IngestError) -> Self {
        Self::Ingest(e)
    }
}

// ---------------------------------------------------------------------------
// Capture errors
// ---------------------------------------------------------------------------

/// Errors raised by the external camera capture program.
#[derive(Debug)]
pub enum CaptureError {
    /// The configured command line has no program.
    EmptyCommand,

    /// The program could not be started.
    Spawn { program: String, source: io::Error },

    /// The program ran but exited unsuccessfully.
    Failed {
        program: String,
        code: Option<i32>,
    },
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCommand => write!(f, "capture command is empty"),
            Self::Spawn { program, source } => {
                write!(f, "cannot start capture program '{program}': {source}")
            }
            Self::Failed { program, code } => match code {
                Some(code) => write!(f, "capture program '{program}' exited with status {code}"),
                None => write!(f, "capture program '{program}' was terminated by a signal"),
            },
        }
    }
}

impl std::error::Error for CaptureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Spawn { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<CaptureError> for ImageRefError {
    fn from(e: CaptureError) -> Self {
        Self::Capture(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_ingest_error_preserves_io_source() {
        let err: ImageRefError = IngestError::Io {
            path: PathBuf::from("missing.png"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        }
        .into();
        assert!(err.to_string().contains("missing.png"));
        let ingest = err.source().expect("top-level error has a source");
        assert!(ingest.source().is_some(), "io::Error should be chained");
    }

    #[test]
    fn test_pixel_mismatch_message_names_sizes() {
        let err = DecodeError::PixelBufferMismatch {
            width: 2,
            height: 2,
            expected: 16,
            actual: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("2x2"), "{msg}");
        assert!(msg.contains("16"), "{msg}");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_capture_failed_without_code_mentions_signal() {
        let err = CaptureError::Failed {
            program: "fswebcam".to_string(),
            code: None,
        };
        assert!(err.to_string().contains("signal"));
    }
}
