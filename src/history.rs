//! Bounded snapshot history across both surfaces.
//!
//! Entries are paired whole-surface snapshots taken only at gesture
//! boundaries, never mid-stroke. The cursor is `Option<usize>`: `None`
//! means "before the first entry", a distinct blank state reachable by
//! undoing past entry 0 (entry 0 already holds the first thing drawn, so
//! stepping back from it must mean blank canvases).

use image::RgbaImage;

use crate::surface::{PanelId, SurfaceManager};

pub const DEFAULT_CAPACITY: usize = 20;

/// Point-in-time raster snapshot of both panels. An absent side means that
/// panel was empty (or had no surface yet) when the snapshot was taken.
#[derive(Debug, Clone, Default)]
pub struct HistoryEntry {
    passage: Option<RgbaImage>,
    questions: Option<RgbaImage>,
}

impl HistoryEntry {
    fn capture(surfaces: &SurfaceManager) -> Self {
        let grab = |panel: PanelId| {
            surfaces
                .get(panel)
                .filter(|surface| !surface.is_blank())
                .map(|surface| surface.buffer().clone())
        };
        Self {
            passage: grab(PanelId::Passage),
            questions: grab(PanelId::Questions),
        }
    }

    fn side(&self, panel: PanelId) -> Option<&RgbaImage> {
        match panel {
            PanelId::Passage => self.passage.as_ref(),
            PanelId::Questions => self.questions.as_ref(),
        }
    }
}

#[derive(Debug)]
pub struct History {
    entries: Vec<HistoryEntry>,
    cursor: Option<usize>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: None,
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Records the current state of both surfaces as a new entry.
    ///
    /// Entries beyond the cursor are discarded first (linear undo, no redo
    /// branches), then the oldest entry is evicted past capacity.
    pub fn snapshot(&mut self, surfaces: &SurfaceManager) {
        match self.cursor {
            Some(index) => self.entries.truncate(index + 1),
            None => self.entries.clear(),
        }

        self.entries.push(HistoryEntry::capture(surfaces));
        if self.entries.len() > self.capacity {
            self.entries.remove(0);
        }
        self.cursor = Some(self.entries.len() - 1);
        tracing::debug!(entries = self.entries.len(), "history snapshot recorded");
    }

    /// Steps both surfaces back one entry. Returns whether anything changed.
    pub fn undo(&mut self, surfaces: &mut SurfaceManager) -> bool {
        match self.cursor {
            None => false,
            Some(0) => {
                surfaces.clear_all();
                self.cursor = None;
                tracing::debug!("undo stepped before first entry; surfaces cleared");
                true
            }
            Some(index) => {
                self.cursor = Some(index - 1);
                self.restore(surfaces, index - 1);
                true
            }
        }
    }

    fn restore(&self, surfaces: &mut SurfaceManager, index: usize) {
        let Some(entry) = self.entries.get(index) else {
            return;
        };
        for panel in PanelId::ALL {
            match (entry.side(panel), surfaces.get_mut(panel)) {
                (Some(snapshot), Some(surface)) => surface.restore_from(snapshot),
                // A side with no recorded content is cleared, never left
                // stale.
                (None, Some(surface)) => surface.clear(),
                (_, None) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Color, ViewRect};
    use crate::raster;
    use crate::surface::PanelMetrics;

    fn metrics() -> PanelMetrics {
        PanelMetrics {
            bounds: ViewRect::new(0.0, 0.0, 64.0, 64.0),
            content_width: 64,
            content_height: 64,
        }
    }

    fn surfaces_with_both_panels() -> SurfaceManager {
        let mut surfaces = SurfaceManager::new();
        surfaces.ensure(PanelId::Passage, &metrics());
        surfaces.ensure(PanelId::Questions, &metrics());
        surfaces
    }

    fn paint(surfaces: &mut SurfaceManager, panel: PanelId, shade: u8) {
        let surface = surfaces.get_mut(panel).expect("surface");
        raster::fill_rect(
            surface.buffer_mut(),
            0.0,
            0.0,
            8.0,
            8.0,
            Color::new(shade, shade, shade),
        );
    }

    fn shade_at_origin(surfaces: &SurfaceManager, panel: PanelId) -> [u8; 4] {
        surfaces
            .get(panel)
            .expect("surface")
            .buffer()
            .get_pixel(0, 0)
            .0
    }

    #[test]
    fn undo_with_no_history_is_a_no_op() {
        let mut surfaces = surfaces_with_both_panels();
        let mut history = History::default();
        assert!(!history.undo(&mut surfaces));
    }

    #[test]
    fn undo_from_the_first_entry_clears_both_surfaces() {
        let mut surfaces = surfaces_with_both_panels();
        let mut history = History::default();

        paint(&mut surfaces, PanelId::Passage, 10);
        history.snapshot(&surfaces);

        assert!(history.undo(&mut surfaces));
        assert!(surfaces.get(PanelId::Passage).expect("surface").is_blank());
        assert!(surfaces.get(PanelId::Questions).expect("surface").is_blank());
        assert_eq!(history.cursor(), None);

        // Already before the first entry: nothing further to undo.
        assert!(!history.undo(&mut surfaces));
    }

    #[test]
    fn undo_restores_the_previous_entry_and_clears_absent_sides() {
        let mut surfaces = surfaces_with_both_panels();
        let mut history = History::default();

        paint(&mut surfaces, PanelId::Passage, 10);
        history.snapshot(&surfaces);

        paint(&mut surfaces, PanelId::Questions, 30);
        history.snapshot(&surfaces);

        assert!(history.undo(&mut surfaces));
        assert_eq!(shade_at_origin(&surfaces, PanelId::Passage), [10, 10, 10, 255]);
        assert!(surfaces.get(PanelId::Questions).expect("surface").is_blank());
    }

    #[test]
    fn snapshot_after_undo_discards_the_redo_branch() {
        let mut surfaces = surfaces_with_both_panels();
        let mut history = History::default();

        paint(&mut surfaces, PanelId::Passage, 10);
        history.snapshot(&surfaces);
        paint(&mut surfaces, PanelId::Passage, 20);
        history.snapshot(&surfaces);
        assert_eq!(history.len(), 2);

        history.undo(&mut surfaces);
        paint(&mut surfaces, PanelId::Passage, 40);
        history.snapshot(&surfaces);

        // Length stays 2: entry B was replaced by C, not appended after it.
        assert_eq!(history.len(), 2);
        assert_eq!(history.cursor(), Some(1));
    }

    #[test]
    fn snapshot_after_undoing_to_blank_replaces_everything() {
        let mut surfaces = surfaces_with_both_panels();
        let mut history = History::default();

        paint(&mut surfaces, PanelId::Passage, 10);
        history.snapshot(&surfaces);
        history.undo(&mut surfaces);

        paint(&mut surfaces, PanelId::Passage, 50);
        history.snapshot(&surfaces);
        assert_eq!(history.len(), 1);
        assert_eq!(history.cursor(), Some(0));
    }

    #[test]
    fn capacity_evicts_the_oldest_entry() {
        let mut surfaces = surfaces_with_both_panels();
        let mut history = History::new(3);

        for shade in 1..=5u8 {
            paint(&mut surfaces, PanelId::Passage, shade * 10);
            history.snapshot(&surfaces);
        }
        assert_eq!(history.len(), 3);

        // Two undos reach the oldest surviving entry (shade 30); a third
        // steps before it to blank.
        history.undo(&mut surfaces);
        history.undo(&mut surfaces);
        assert_eq!(shade_at_origin(&surfaces, PanelId::Passage), [30, 30, 30, 255]);
        assert!(history.undo(&mut surfaces));
        assert!(surfaces.get(PanelId::Passage).expect("surface").is_blank());
        assert!(!history.undo(&mut surfaces));
    }

    #[test]
    fn n_gestures_need_n_plus_one_undos_to_reach_blank() {
        let mut surfaces = surfaces_with_both_panels();
        let mut history = History::default();
        let gestures = 6;

        for shade in 1..=gestures {
            paint(&mut surfaces, PanelId::Passage, shade * 10);
            history.snapshot(&surfaces);
        }

        for _ in 0..gestures {
            assert!(history.undo(&mut surfaces));
        }
        assert!(surfaces.get(PanelId::Passage).expect("surface").is_blank());

        // The N+1th undo finds nothing further to step back to.
        assert!(!history.undo(&mut surfaces));
        assert!(surfaces.get(PanelId::Passage).expect("surface").is_blank());
    }
}
