// ImageRef - platform/mod.rs
//
// Platform abstraction layer: config directories, native dialogs, the system
// clipboard, and external capture programs.
// Implements the seams declared in app::ingest.
// Must NOT depend on: ui.

pub mod camera;
pub mod clipboard;
pub mod config;
