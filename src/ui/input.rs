// ImageRef - ui/input.rs
//
// Window-wide keyboard and drag-and-drop input, read once per frame.
//
// Paste: egui-winit swallows the Cmd/Ctrl+V *press* and only turns it into
// `Event::Paste` when the clipboard holds text, so an image-only clipboard
// produces nothing on press. The *release* of V is always forwarded as a key
// event, so paste fires on that. `Event::Paste` is not matched, since
// a clipboard holding both text and an image would then be pasted twice.

use std::path::PathBuf;

/// What the user asked for this frame, independent of any widget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub paste: bool,
    pub dropped: Vec<PathBuf>,
    pub delete: bool,
    pub escape: bool,
    pub next: bool,
    pub previous: bool,
}

/// Collect this frame's window-wide input.
pub fn read(i: &egui::InputState) -> FrameInput {
    FrameInput {
        paste: paste_requested(i),
        dropped: i
            .raw
            .dropped_files
            .iter()
            .filter_map(|f| f.path.clone())
            .collect(),
        delete: i.key_pressed(egui::Key::Delete),
        escape: i.key_pressed(egui::Key::Escape),
        next: i.key_pressed(egui::Key::ArrowDown),
        previous: i.key_pressed(egui::Key::ArrowUp),
    }
}

/// True when Cmd/Ctrl+V was released this frame.
pub fn paste_requested(i: &egui::InputState) -> bool {
    i.events.iter().any(|e| {
        matches!(
            e,
            egui::Event::Key {
                key: egui::Key::V,
                pressed: false,
                modifiers,
                ..
            } if modifiers.command
        )
    })
}
