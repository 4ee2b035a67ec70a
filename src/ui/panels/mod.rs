// ImageRef - ui/panels/mod.rs

pub mod about;
pub mod sidebar;
pub mod viewer;
pub mod warnings;
