// ImageRef - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading
// 3. Logging initialisation (debug mode support)
// 4. eframe GUI launch

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod gui;

// Re-export modules from the library crate so that `gui.rs` and other
// binary-side code can still use `crate::app::...`, `crate::core::...` etc.
pub use imageref::app;

pub use imageref::core;
pub use imageref::platform;
pub use imageref::ui;
pub use imageref::util;

use clap::Parser;
use std::path::PathBuf;

/// ImageRef - Reference image board.
///
/// Collect images by upload, camera capture, or clipboard paste and browse
/// them in a gallery. Nothing is saved between sessions.
#[derive(Parser, Debug)]
#[command(name = "ImageRef", version, about)]
struct Cli {
    /// Image files to add at startup.
    paths: Vec<PathBuf>,

    /// Directory containing config.toml (defaults to the platform config directory).
    #[arg(short = 'c', long = "config-dir")]
    config_dir: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    // Config is read before logging starts so [logging] level can apply;
    // its warnings are logged once the subscriber is up.
    let config_dir = cli
        .config_dir
        .clone()
        .unwrap_or_else(|| platform::config::PlatformPaths::resolve().config_dir);
    let (config, config_warnings) = platform::config::load_config(&config_dir);

    util::logging::init(cli.debug, config.log_level.as_deref());

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        config = %config_dir.display(),
        "ImageRef starting"
    );
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    let capture_command = match config.capture_command.as_deref() {
        Some(cmd) => match platform::camera::CommandCapture::parse(cmd) {
            Ok(capture) => Some(capture),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring capture_command");
                None
            }
        },
        None => None,
    };

    let display = app::state::DisplayOptions {
        timestamp_format: config.timestamp_format.clone(),
        sidebar_width: config.sidebar_width,
        thumbnail_height: config.thumbnail_height,
    };
    let mut state = app::state::AppState::new(display, cli.debug);
    for warning in config_warnings {
        state.push_warning(warning);
    }

    let ingest = app::ingest::IngestManager::new(app::ingest::IngestSettings {
        max_file_bytes: config.max_file_size_mb * 1024 * 1024,
        thumbnail_edge: config.thumbnail_edge,
    });

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!(
                "{} v{}",
                util::constants::APP_NAME,
                util::constants::APP_VERSION
            ))
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([640.0, 400.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    let startup_paths = cli.paths;
    let dark_mode = config.dark_mode;
    let font_size = config.font_size;

    let result = eframe::run_native(
        util::constants::APP_NAME,
        native_options,
        Box::new(move |cc| {
            ui::theme::apply(&cc.egui_ctx, dark_mode, font_size);
            let app = gui::ImageRefApp::new(state, ingest, capture_command, &cc.egui_ctx);
            if !startup_paths.is_empty() {
                app.ingest
                    .ingest_files(core::model::IngestSource::Upload, startup_paths);
            }
            Ok(Box::new(app))
        }),
    );

    if let Err(e) = result {
        tracing::error!(error = %e, "Failed to launch GUI");
        eprintln!("Error: Failed to launch ImageRef GUI: {e}");
        std::process::exit(1);
    }
}
