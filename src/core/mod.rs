// ImageRef - core/mod.rs
//
// Core business logic layer.
// Dependencies: util, image codecs.
// Must NOT depend on: ui, platform, app, or any OS integration crate.

pub mod clipboard;
pub mod decode;
pub mod fit;
pub mod gallery;
pub mod model;
