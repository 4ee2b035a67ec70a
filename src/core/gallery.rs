// ImageRef - core/gallery.rs
//
// The ordered record collection and the single-record selection.
//
// Invariants maintained here:
//   - Records are kept in insertion order; new records go to the tail.
//   - Record ids are unique within the collection.
//   - The selection, when set, always names a record that is present.

use crate::core::model::{ImageRecord, RecordId};

/// Ordered collection of ingested records plus the current selection.
#[derive(Debug, Default)]
pub struct Gallery {
    records: Vec<ImageRecord>,
    selected: Option<RecordId>,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record at the tail.
    ///
    /// Returns `false` (and drops the record) if a record with the same id is
    /// already held.
    pub fn append(&mut self, record: ImageRecord) -> bool {
        if self.contains(record.id) {
            tracing::warn!(id = %record.id, "Duplicate record id rejected");
            return false;
        }
        self.records.push(record);
        true
    }

    /// Focus `id` for detail viewing.
    ///
    /// An id that is not present clears the selection. Calling this twice
    /// with the same id is the same as calling it once.
    pub fn select(&mut self, id: RecordId) {
        self.selected = if self.contains(id) { Some(id) } else { None };
    }

    /// Clear the selection.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Remove the record with `id`, clearing the selection if it pointed at it.
    ///
    /// Returns the removed record, or `None` if no such record exists.
    pub fn remove(&mut self, id: RecordId) -> Option<ImageRecord> {
        let pos = self.records.iter().position(|r| r.id == id)?;
        let removed = self.records.remove(pos);
        if self.selected == Some(id) {
            self.selected = None;
        }
        Some(removed)
    }

    /// Move the selection one record towards the tail. Selects the first
    /// record when nothing is selected.
    pub fn select_next(&mut self) {
        let next = match self.selected_position() {
            Some(pos) => self.records.get(pos + 1).or(self.records.get(pos)),
            None => self.records.first(),
        };
        self.selected = next.map(|r| r.id);
    }

    /// Move the selection one record towards the head. Selects the last
    /// record when nothing is selected.
    pub fn select_previous(&mut self) {
        let prev = match self.selected_position() {
            Some(pos) => self.records.get(pos.saturating_sub(1)),
            None => self.records.last(),
        };
        self.selected = prev.map(|r| r.id);
    }

    pub fn selected_id(&self) -> Option<RecordId> {
        self.selected
    }

    /// The currently selected record, if any.
    pub fn selected(&self) -> Option<&ImageRecord> {
        self.selected.and_then(|id| self.get(id))
    }

    pub fn get(&self, id: RecordId) -> Option<&ImageRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.records.iter().any(|r| r.id == id)
    }

    /// Records in display order.
    pub fn records(&self) -> &[ImageRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn selected_position(&self) -> Option<usize> {
        let id = self.selected?;
        self.records.iter().position(|r| r.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{DecodedImage, ImageData, IngestSource};
    use std::sync::Arc;

    fn make_record(id: u64, label: &str) -> ImageRecord {
        let pixel = DecodedImage {
            width: 1,
            height: 1,
            rgba: Arc::from(vec![255u8, 0, 0, 255]),
        };
        ImageRecord {
            id: RecordId(id),
            data: ImageData {
                full: pixel.clone(),
                thumbnail: pixel,
            },
            label: label.to_string(),
            captured_at: "2026-01-01 12:00:00".to_string(),
            source: IngestSource::Upload,
        }
    }

    fn gallery_with(ids: &[u64]) -> Gallery {
        let mut g = Gallery::new();
        for &id in ids {
            assert!(g.append(make_record(id, &format!("img{id}.png"))));
        }
        g
    }

    fn ids(g: &Gallery) -> Vec<u64> {
        g.records().iter().map(|r| r.id.0).collect()
    }

    #[test]
    fn test_append_preserves_insertion_order() {
        let g = gallery_with(&[3, 1, 2]);
        assert_eq!(ids(&g), vec![3, 1, 2]);
        assert_eq!(g.selected_id(), None);
    }

    #[test]
    fn test_append_rejects_duplicate_id() {
        let mut g = gallery_with(&[1]);
        assert!(!g.append(make_record(1, "other.png")));
        assert_eq!(g.len(), 1);
        assert_eq!(g.records()[0].label, "img1.png");
    }

    #[test]
    fn test_select_is_idempotent() {
        let mut g = gallery_with(&[1, 2]);
        g.select(RecordId(2));
        let once = g.selected_id();
        g.select(RecordId(2));
        assert_eq!(g.selected_id(), once);
        assert_eq!(g.selected().map(|r| r.label.as_str()), Some("img2.png"));
    }

    #[test]
    fn test_select_unknown_id_clears_selection() {
        let mut g = gallery_with(&[1]);
        g.select(RecordId(1));
        g.select(RecordId(99));
        assert_eq!(g.selected_id(), None);
    }

    #[test]
    fn test_remove_selected_clears_selection() {
        let mut g = gallery_with(&[1, 2]);
        g.select(RecordId(1));
        let removed = g.remove(RecordId(1)).unwrap();
        assert_eq!(removed.label, "img1.png");
        assert_eq!(g.selected_id(), None);
        assert!(g.selected().is_none());
        assert_eq!(ids(&g), vec![2]);
    }

    #[test]
    fn test_remove_other_keeps_selection() {
        let mut g = gallery_with(&[1, 2, 3]);
        g.select(RecordId(3));
        g.remove(RecordId(1));
        assert_eq!(g.selected_id(), Some(RecordId(3)));
        assert_eq!(ids(&g), vec![2, 3]);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut g = gallery_with(&[1]);
        g.select(RecordId(1));
        assert!(g.remove(RecordId(42)).is_none());
        assert_eq!(g.len(), 1);
        assert_eq!(g.selected_id(), Some(RecordId(1)));
    }

    #[test]
    fn test_keyboard_navigation_clamps_at_ends() {
        let mut g = gallery_with(&[10, 20, 30]);
        g.select_next();
        assert_eq!(g.selected_id(), Some(RecordId(10)));
        g.select_next();
        g.select_next();
        g.select_next();
        assert_eq!(g.selected_id(), Some(RecordId(30)));
        g.select_previous();
        assert_eq!(g.selected_id(), Some(RecordId(20)));
        g.select_previous();
        g.select_previous();
        assert_eq!(g.selected_id(), Some(RecordId(10)));
    }

    #[test]
    fn test_navigation_on_empty_gallery_selects_nothing() {
        let mut g = Gallery::new();
        g.select_next();
        assert_eq!(g.selected_id(), None);
        g.select_previous();
        assert_eq!(g.selected_id(), None);
    }

    #[test]
    fn test_select_previous_from_none_picks_last() {
        let mut g = gallery_with(&[1, 2]);
        g.select_previous();
        assert_eq!(g.selected_id(), Some(RecordId(2)));
    }
}
