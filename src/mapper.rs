//! Translates viewport input coordinates into surface-local pixels.
//!
//! The panel's bounding-box origin moves continuously while the user
//! scrolls or the window resizes, so the translation is recomputed from
//! fresh metrics on every event and never cached.

use crate::geometry::{SurfacePoint, ViewPoint};
use crate::surface::{PanelHost, PanelId, PanelMetrics};

/// One normalized input point in viewport coordinates.
///
/// Touch input reads the primary contact only; multi-touch is not handled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub viewport: ViewPoint,
}

impl PointerSample {
    pub const fn mouse(x: f32, y: f32) -> Self {
        Self {
            viewport: ViewPoint::new(x, y),
        }
    }

    pub fn from_touches(touches: &[ViewPoint]) -> Option<Self> {
        touches.first().map(|first| Self { viewport: *first })
    }
}

pub fn to_surface_local(metrics: &PanelMetrics, sample: PointerSample) -> SurfacePoint {
    let origin = metrics.bounds.origin();
    SurfacePoint::new(sample.viewport.x - origin.x, sample.viewport.y - origin.y)
}

/// Resolves a sample against a live panel; `None` when the panel is not
/// mounted, in which case the caller no-ops.
pub fn resolve<H: PanelHost>(
    host: &H,
    panel: PanelId,
    sample: PointerSample,
) -> Option<SurfacePoint> {
    host.metrics(panel)
        .map(|metrics| to_surface_local(&metrics, sample))
}
