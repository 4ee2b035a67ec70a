// ImageRef - platform/config.rs
//
// Platform-specific configuration directory resolution and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for ImageRef configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/imageref/ or %APPDATA%\ImageRef\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[ui]` section.
    pub ui: UiSection,
    /// `[ingest]` section.
    pub ingest: IngestSection,
    /// `[camera]` section.
    pub camera: CameraSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[ui]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct UiSection {
    /// Theme: "dark" or "light".
    pub theme: Option<String>,
    /// Body font size in points.
    pub font_size: Option<f32>,
    /// Thumbnail sidebar width in points.
    pub sidebar_width: Option<f32>,
    /// Height of the cropped preview in each thumbnail card.
    pub thumbnail_height: Option<f32>,
    /// chrono strftime pattern for record timestamps.
    pub timestamp_format: Option<String>,
}

/// `[ingest]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct IngestSection {
    /// Largest accepted image file, in megabytes.
    pub max_file_size_mb: Option<u64>,
    /// Longest edge of generated thumbnails, in pixels.
    pub thumbnail_edge: Option<u32>,
}

/// `[camera]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct CameraSection {
    /// External capture program; `{output}` is replaced with the target file.
    pub capture_command: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// All values are validated against named constants at load time.
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    // -- UI --
    /// Dark mode (true) or light mode (false).
    pub dark_mode: bool,
    /// Body font size in points.
    pub font_size: f32,
    /// Thumbnail sidebar width in points.
    pub sidebar_width: f32,
    /// Thumbnail card preview height in points.
    pub thumbnail_height: f32,
    /// strftime pattern for record timestamps.
    pub timestamp_format: String,

    // -- Ingest --
    /// Largest accepted image file, in megabytes.
    pub max_file_size_mb: u64,
    /// Thumbnail longest edge, in pixels.
    pub thumbnail_edge: u32,

    // -- Camera --
    /// External capture command. `None` uses the capture file dialog.
    pub capture_command: Option<String>,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dark_mode: true,
            font_size: constants::DEFAULT_FONT_SIZE,
            sidebar_width: constants::DEFAULT_SIDEBAR_WIDTH,
            thumbnail_height: constants::DEFAULT_THUMBNAIL_HEIGHT,
            timestamp_format: constants::DEFAULT_TIMESTAMP_FORMAT.to_string(),
            max_file_size_mb: constants::DEFAULT_MAX_FILE_SIZE_MB,
            thumbnail_edge: constants::DEFAULT_THUMBNAIL_EDGE,
            capture_command: None,
            log_level: None,
        }
    }
}

/// Path of config.toml inside `config_dir`.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(constants::CONFIG_FILE_NAME)
}

/// Load and validate `config.toml` from the given config directory.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first run).
/// If the file is unreadable or unparseable, returns defaults with a warning;
/// the application still starts but the user is informed.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<String>) {
    let config_path = config_file_path(config_dir);
    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(source) => {
            let err = crate::util::error::ConfigError::Io {
                path: config_path.clone(),
                source,
            };
            let msg = format!("{err}. Using defaults.");
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(source) => {
            let err = crate::util::error::ConfigError::TomlParse {
                path: config_path.clone(),
                source,
            };
            let msg = format!("{err}. Using defaults.");
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");

    let config = validate(raw, &mut warnings);

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}

/// Validate each field against named constants, accumulating all problems.
fn validate(raw: RawConfig, warnings: &mut Vec<String>) -> AppConfig {
    let mut config = AppConfig::default();

    // -- UI: theme --
    if let Some(ref theme) = raw.ui.theme {
        match theme.to_lowercase().as_str() {
            "dark" => config.dark_mode = true,
            "light" => config.dark_mode = false,
            other => {
                warnings.push(format!(
                    "[ui] theme = \"{other}\" is not recognised. Expected \"dark\" or \"light\". Using default (dark).",
                ));
            }
        }
    }

    // -- UI: font_size --
    if let Some(size) = raw.ui.font_size {
        if (constants::MIN_FONT_SIZE..=constants::MAX_FONT_SIZE).contains(&size) {
            config.font_size = size;
        } else {
            warnings.push(format!(
                "[ui] font_size = {size} is out of range ({}-{}). Using default ({}).",
                constants::MIN_FONT_SIZE,
                constants::MAX_FONT_SIZE,
                constants::DEFAULT_FONT_SIZE,
            ));
        }
    }

    // -- UI: sidebar_width --
    if let Some(width) = raw.ui.sidebar_width {
        if (constants::MIN_SIDEBAR_WIDTH..=constants::MAX_SIDEBAR_WIDTH).contains(&width) {
            config.sidebar_width = width;
        } else {
            warnings.push(format!(
                "[ui] sidebar_width = {width} is out of range ({}-{}). Using default ({}).",
                constants::MIN_SIDEBAR_WIDTH,
                constants::MAX_SIDEBAR_WIDTH,
                constants::DEFAULT_SIDEBAR_WIDTH,
            ));
        }
    }

    // -- UI: thumbnail_height --
    if let Some(height) = raw.ui.thumbnail_height {
        if (constants::MIN_THUMBNAIL_HEIGHT..=constants::MAX_THUMBNAIL_HEIGHT).contains(&height) {
            config.thumbnail_height = height;
        } else {
            warnings.push(format!(
                "[ui] thumbnail_height = {height} is out of range ({}-{}). Using default ({}).",
                constants::MIN_THUMBNAIL_HEIGHT,
                constants::MAX_THUMBNAIL_HEIGHT,
                constants::DEFAULT_THUMBNAIL_HEIGHT,
            ));
        }
    }

    // -- UI: timestamp_format --
    if let Some(ref fmt) = raw.ui.timestamp_format {
        if is_valid_timestamp_format(fmt) {
            config.timestamp_format = fmt.clone();
        } else {
            warnings.push(format!(
                "[ui] timestamp_format = \"{fmt}\" is not a valid strftime pattern. Using default (\"{}\").",
                constants::DEFAULT_TIMESTAMP_FORMAT,
            ));
        }
    }

    // -- Ingest: max_file_size_mb --
    if let Some(mb) = raw.ingest.max_file_size_mb {
        if (constants::MIN_MAX_FILE_SIZE_MB..=constants::MAX_MAX_FILE_SIZE_MB).contains(&mb) {
            config.max_file_size_mb = mb;
        } else {
            warnings.push(format!(
                "[ingest] max_file_size_mb = {mb} is out of range ({}-{}). Using default ({}).",
                constants::MIN_MAX_FILE_SIZE_MB,
                constants::MAX_MAX_FILE_SIZE_MB,
                constants::DEFAULT_MAX_FILE_SIZE_MB,
            ));
        }
    }

    // -- Ingest: thumbnail_edge --
    if let Some(edge) = raw.ingest.thumbnail_edge {
        if (constants::MIN_THUMBNAIL_EDGE..=constants::MAX_THUMBNAIL_EDGE).contains(&edge) {
            config.thumbnail_edge = edge;
        } else {
            warnings.push(format!(
                "[ingest] thumbnail_edge = {edge} is out of range ({}-{}). Using default ({}).",
                constants::MIN_THUMBNAIL_EDGE,
                constants::MAX_THUMBNAIL_EDGE,
                constants::DEFAULT_THUMBNAIL_EDGE,
            ));
        }
    }

    // -- Camera: capture_command --
    if let Some(ref cmd) = raw.camera.capture_command {
        let trimmed = cmd.trim();
        if trimmed.is_empty() {
            // Explicitly empty: use the dialog.
        } else if trimmed.contains(constants::CAPTURE_OUTPUT_PLACEHOLDER) {
            config.capture_command = Some(trimmed.to_string());
        } else {
            warnings.push(format!(
                "[camera] capture_command must contain \"{}\" where the photo should be written. \
                 Using the capture dialog instead.",
                constants::CAPTURE_OUTPUT_PLACEHOLDER,
            ));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    config
}

/// A strftime pattern is usable when chrono can parse every item in it.
/// Formatting with an invalid pattern would otherwise panic at display time.
fn is_valid_timestamp_format(fmt: &str) -> bool {
    use chrono::format::{Item, StrftimeItems};
    !fmt.is_empty() && !StrftimeItems::new(fmt).any(|item| matches!(item, Item::Error))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_from(toml_text: &str) -> (AppConfig, Vec<String>) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(config_file_path(dir.path()), toml_text).unwrap();
        load_config(dir.path())
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, warnings) = load_config(dir.path());
        assert_eq!(config, AppConfig::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_valid_values_are_applied() {
        let (config, warnings) = load_from(
            r#"
            [ui]
            theme = "Light"
            font_size = 16.0
            sidebar_width = 360.0
            timestamp_format = "%d/%m %H:%M"

            [ingest]
            max_file_size_mb = 10
            thumbnail_edge = 128

            [camera]
            capture_command = "fswebcam --no-banner {output}"

            [logging]
            level = "DEBUG"
            "#,
        );
        assert!(warnings.is_empty(), "{warnings:?}");
        assert!(!config.dark_mode);
        assert_eq!(config.font_size, 16.0);
        assert_eq!(config.sidebar_width, 360.0);
        assert_eq!(config.timestamp_format, "%d/%m %H:%M");
        assert_eq!(config.max_file_size_mb, 10);
        assert_eq!(config.thumbnail_edge, 128);
        assert_eq!(
            config.capture_command.as_deref(),
            Some("fswebcam --no-banner {output}")
        );
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_out_of_range_values_warn_and_default() {
        let (config, warnings) = load_from(
            r#"
            [ui]
            font_size = 99.0
            thumbnail_height = 1.0

            [ingest]
            max_file_size_mb = 0
            "#,
        );
        assert_eq!(warnings.len(), 3, "{warnings:?}");
        assert_eq!(config.font_size, constants::DEFAULT_FONT_SIZE);
        assert_eq!(config.thumbnail_height, constants::DEFAULT_THUMBNAIL_HEIGHT);
        assert_eq!(config.max_file_size_mb, constants::DEFAULT_MAX_FILE_SIZE_MB);
    }

    #[test]
    fn test_capture_command_without_placeholder_is_rejected() {
        let (config, warnings) = load_from("[camera]\ncapture_command = \"fswebcam out.jpg\"\n");
        assert_eq!(config.capture_command, None);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_bad_timestamp_format_is_rejected() {
        let (config, warnings) = load_from("[ui]\ntimestamp_format = \"%Q oops\"\n");
        assert_eq!(config.timestamp_format, constants::DEFAULT_TIMESTAMP_FORMAT);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_unparseable_file_warns() {
        let (config, warnings) = load_from("[ui\ntheme = ");
        assert_eq!(config, AppConfig::default());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Config parse error"), "{warnings:?}");
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let (_, warnings) = load_from("[future]\nsetting = 1\n[ui]\nnew_option = true\n");
        assert!(warnings.is_empty(), "{warnings:?}");
    }
}
