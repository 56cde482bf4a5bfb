//! Rasterizes completed text selections as highlight rectangles.
//!
//! Selection rectangles arrive in viewport coordinates, one per visual
//! line fragment. They are filled on a scratch buffer first and the
//! scratch buffer is composited onto the surface with darken, so a
//! selection dragged over an existing highlight of the same color does not
//! deepen it.

use image::RgbaImage;

use crate::geometry::{Color, ViewRect};
use crate::raster;
use crate::surface::{PanelHost, PanelId, PanelMetrics, Surface};

/// Fragments narrower than this are whitespace or empty-line artifacts.
const MIN_RECT_WIDTH: f32 = 1.0;
const MIN_RECT_HEIGHT: f32 = 8.0;
/// Slack when matching a selection against a panel's horizontal bounds.
const PANEL_MATCH_TOLERANCE: f32 = 50.0;

/// Where the selection gesture ended. Selections finished on buttons,
/// inputs or the toolbar itself must not paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOrigin {
    Document,
    InteractiveControl,
}

/// A completed text-selection gesture as reported by the host, captured
/// once per gesture (pointer-up or end of double-click-to-select), not per
/// selection-changed tick.
#[derive(Debug, Clone)]
pub struct SelectionSnapshot {
    pub text: String,
    pub rects: Vec<ViewRect>,
    pub origin: SelectionOrigin,
}

impl SelectionSnapshot {
    fn is_paintable(&self) -> bool {
        self.origin == SelectionOrigin::Document
            && !self.text.trim().is_empty()
            && !self.rects.is_empty()
    }
}

/// Finds the tracked panel whose horizontal bounds contain the first
/// selection rectangle, within tolerance. Passage wins ties by being
/// checked first, matching the panel order on screen.
pub fn resolve_target_panel<H: PanelHost>(
    host: &H,
    first_rect: &ViewRect,
) -> Option<(PanelId, PanelMetrics)> {
    for panel in PanelId::ALL {
        let Some(metrics) = host.metrics(panel) else {
            continue;
        };
        let left_edge = metrics.bounds.left - PANEL_MATCH_TOLERANCE;
        let right_edge = metrics.bounds.right() + PANEL_MATCH_TOLERANCE;
        if first_rect.left >= left_edge && first_rect.right() <= right_edge {
            return Some((panel, metrics));
        }
    }
    None
}

/// Paints the selection onto the surface. Returns whether anything was
/// painted; when it was, the caller snapshots history and tells the host
/// to clear the native selection.
pub fn paint_selection(
    surface: &mut Surface,
    metrics: &PanelMetrics,
    snapshot: &SelectionSnapshot,
    color: Color,
) -> bool {
    if !snapshot.is_paintable() {
        return false;
    }

    let mut scratch = RgbaImage::new(surface.width(), surface.height());
    let origin = metrics.bounds.origin();
    let mut painted = false;

    for rect in &snapshot.rects {
        if rect.width < MIN_RECT_WIDTH || rect.height < MIN_RECT_HEIGHT {
            continue;
        }
        raster::fill_rect(
            &mut scratch,
            rect.left - origin.x,
            rect.top - origin.y,
            rect.width,
            rect.height,
            color,
        );
        painted = true;
    }

    if painted {
        raster::composite_darken(surface.buffer_mut(), &scratch);
    }
    painted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::test_support::FakePanelHost;
    use crate::surface::SurfaceManager;

    fn host() -> FakePanelHost {
        FakePanelHost::new()
            .with_panel(PanelId::Passage, 0.0, 0.0, 400, 600)
            .with_panel(PanelId::Questions, 450.0, 0.0, 400, 600)
    }

    fn snapshot(text: &str, rects: Vec<ViewRect>) -> SelectionSnapshot {
        SelectionSnapshot {
            text: text.to_string(),
            rects,
            origin: SelectionOrigin::Document,
        }
    }

    #[test]
    fn resolves_the_panel_containing_the_first_rect() {
        let host = host();
        let (panel, _) = resolve_target_panel(&host, &ViewRect::new(20.0, 10.0, 200.0, 16.0))
            .expect("panel match");
        assert_eq!(panel, PanelId::Passage);

        let (panel, _) = resolve_target_panel(&host, &ViewRect::new(500.0, 10.0, 200.0, 16.0))
            .expect("panel match");
        assert_eq!(panel, PanelId::Questions);
    }

    #[test]
    fn tolerance_admits_selections_slightly_past_the_edge() {
        let host = host();
        // Questions panel spans 450..850; 40px of slack is within the
        // 50px tolerance.
        let (panel, _) = resolve_target_panel(&host, &ViewRect::new(420.0, 10.0, 460.0, 16.0))
            .expect("panel match");
        assert_eq!(panel, PanelId::Questions);
    }

    #[test]
    fn selections_matching_no_panel_resolve_to_none() {
        let host = FakePanelHost::new().with_panel(PanelId::Passage, 0.0, 0.0, 400, 600);
        assert!(resolve_target_panel(&host, &ViewRect::new(900.0, 0.0, 300.0, 16.0)).is_none());
    }

    #[test]
    fn paints_each_line_fragment_in_surface_space() {
        let host = host();
        let metrics = host.metrics(PanelId::Questions).expect("metrics");
        let mut surfaces = SurfaceManager::new();
        let surface = surfaces.ensure(PanelId::Questions, &metrics).expect("surface");

        let selection = snapshot(
            "two lines",
            vec![
                ViewRect::new(460.0, 10.0, 100.0, 16.0),
                ViewRect::new(460.0, 30.0, 60.0, 16.0),
            ],
        );
        assert!(paint_selection(
            surface,
            &metrics,
            &selection,
            Color::new(0xB3, 0xE5, 0xFC)
        ));

        // 460 viewport = 10 surface-local on the questions panel.
        assert_eq!(surface.buffer().get_pixel(12, 12).0[3], 255);
        assert_eq!(surface.buffer().get_pixel(12, 35).0[3], 255);
        assert_eq!(surface.buffer().get_pixel(200, 12).0[3], 0);
    }

    #[test]
    fn degenerate_fragments_are_skipped() {
        let host = host();
        let metrics = host.metrics(PanelId::Passage).expect("metrics");
        let mut surfaces = SurfaceManager::new();
        let surface = surfaces.ensure(PanelId::Passage, &metrics).expect("surface");

        let selection = snapshot(
            "x",
            vec![
                ViewRect::new(10.0, 10.0, 0.5, 16.0),  // under min width
                ViewRect::new(10.0, 40.0, 100.0, 4.0), // under min height
            ],
        );
        assert!(!paint_selection(
            surface,
            &metrics,
            &selection,
            Color::new(0xB3, 0xE5, 0xFC)
        ));
        assert!(surface.is_blank());
    }

    #[test]
    fn whitespace_only_selections_paint_nothing() {
        let host = host();
        let metrics = host.metrics(PanelId::Passage).expect("metrics");
        let mut surfaces = SurfaceManager::new();
        let surface = surfaces.ensure(PanelId::Passage, &metrics).expect("surface");

        let selection = snapshot("   \n  ", vec![ViewRect::new(10.0, 10.0, 100.0, 16.0)]);
        assert!(!paint_selection(
            surface,
            &metrics,
            &selection,
            Color::new(0xB3, 0xE5, 0xFC)
        ));
    }

    #[test]
    fn control_originated_selections_are_ignored() {
        let host = host();
        let metrics = host.metrics(PanelId::Passage).expect("metrics");
        let mut surfaces = SurfaceManager::new();
        let surface = surfaces.ensure(PanelId::Passage, &metrics).expect("surface");

        let selection = SelectionSnapshot {
            text: "button label".to_string(),
            rects: vec![ViewRect::new(10.0, 10.0, 100.0, 16.0)],
            origin: SelectionOrigin::InteractiveControl,
        };
        assert!(!paint_selection(
            surface,
            &metrics,
            &selection,
            Color::new(0xB3, 0xE5, 0xFC)
        ));
    }

    #[test]
    fn overlapping_selections_of_one_color_do_not_deepen() {
        let host = host();
        let metrics = host.metrics(PanelId::Passage).expect("metrics");
        let mut surfaces = SurfaceManager::new();
        let surface = surfaces.ensure(PanelId::Passage, &metrics).expect("surface");
        let pastel = Color::new(0xB3, 0xE5, 0xFC);

        let selection = snapshot("line", vec![ViewRect::new(10.0, 10.0, 100.0, 16.0)]);
        assert!(paint_selection(surface, &metrics, &selection, pastel));
        let once = surface.buffer().clone();

        assert!(paint_selection(surface, &metrics, &selection, pastel));
        assert_eq!(surface.buffer(), &once);
    }
}
