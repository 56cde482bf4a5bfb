//! Per-panel raster surfaces and the host panel contract.
//!
//! A surface always matches its panel's full scrollable content size, not
//! just the visible viewport. Surfaces are created lazily on first paint,
//! resized in place when the content box changes, and blanked rather than
//! destroyed on clear.

use image::RgbaImage;

use crate::geometry::ViewRect;
use crate::raster;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelId {
    Passage,
    Questions,
}

impl PanelId {
    pub const ALL: [PanelId; 2] = [PanelId::Passage, PanelId::Questions];
}

/// Live geometry of one tracked panel, reported by the host per event.
///
/// `bounds` is the panel's content box in viewport coordinates; its origin
/// moves as the user scrolls. `content_width`/`content_height` are the full
/// scrollable extent the surface must cover.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelMetrics {
    pub bounds: ViewRect,
    pub content_width: u32,
    pub content_height: u32,
}

impl PanelMetrics {
    pub fn has_area(&self) -> bool {
        self.content_width > 0 && self.content_height > 0
    }
}

/// Contract with the host environment: a live reference to each tracked
/// panel's geometry. `None` means the panel is not mounted yet and the
/// caller must no-op.
pub trait PanelHost {
    fn metrics(&self, panel: PanelId) -> Option<PanelMetrics>;
}

#[derive(Debug, Clone)]
pub struct Surface {
    panel: PanelId,
    buffer: RgbaImage,
}

impl Surface {
    fn new(panel: PanelId, width: u32, height: u32) -> Self {
        Self {
            panel,
            buffer: RgbaImage::new(width, height),
        }
    }

    pub const fn panel(&self) -> PanelId {
        self.panel
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn buffer(&self) -> &RgbaImage {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut RgbaImage {
        &mut self.buffer
    }

    pub fn clear(&mut self) {
        raster::clear(&mut self.buffer);
    }

    pub fn is_blank(&self) -> bool {
        raster::is_blank(&self.buffer)
    }

    /// Reallocates the buffer at the new size, copying prior content at the
    /// origin. Content outside the overlap is cropped; nothing is scaled.
    fn resize_preserving(&mut self, width: u32, height: u32) {
        if width == self.width() && height == self.height() {
            return;
        }

        let mut next = RgbaImage::new(width, height);
        let copy_width = width.min(self.width());
        let copy_height = height.min(self.height());
        for y in 0..copy_height {
            for x in 0..copy_width {
                next.put_pixel(x, y, *self.buffer.get_pixel(x, y));
            }
        }
        self.buffer = next;
    }

    /// Replaces the full contents from a snapshot, cropping at the origin
    /// if the surface has been resized since the snapshot was taken.
    pub(crate) fn restore_from(&mut self, snapshot: &RgbaImage) {
        self.clear();
        let copy_width = self.width().min(snapshot.width());
        let copy_height = self.height().min(snapshot.height());
        for y in 0..copy_height {
            for x in 0..copy_width {
                self.buffer.put_pixel(x, y, *snapshot.get_pixel(x, y));
            }
        }
    }
}

/// Owns one surface per tracked panel.
#[derive(Debug, Default)]
pub struct SurfaceManager {
    passage: Option<Surface>,
    questions: Option<Surface>,
}

impl SurfaceManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, panel: PanelId) -> &Option<Surface> {
        match panel {
            PanelId::Passage => &self.passage,
            PanelId::Questions => &self.questions,
        }
    }

    fn slot_mut(&mut self, panel: PanelId) -> &mut Option<Surface> {
        match panel {
            PanelId::Passage => &mut self.passage,
            PanelId::Questions => &mut self.questions,
        }
    }

    pub fn get(&self, panel: PanelId) -> Option<&Surface> {
        self.slot(panel).as_ref()
    }

    pub fn get_mut(&mut self, panel: PanelId) -> Option<&mut Surface> {
        self.slot_mut(panel).as_mut()
    }

    /// Returns the surface for a panel, creating it on first use sized to
    /// the panel's current content box. A zero-sized panel yields `None`
    /// and the caller retries on a later event.
    pub fn ensure(&mut self, panel: PanelId, metrics: &PanelMetrics) -> Option<&mut Surface> {
        if !metrics.has_area() {
            tracing::debug!(?panel, "panel content box has no area; deferring surface");
            return None;
        }

        let slot = self.slot_mut(panel);
        if slot.is_none() {
            tracing::debug!(
                ?panel,
                width = metrics.content_width,
                height = metrics.content_height,
                "creating surface"
            );
            *slot = Some(Surface::new(
                panel,
                metrics.content_width,
                metrics.content_height,
            ));
        }
        slot.as_mut()
    }

    /// Brings an existing surface back in sync with the panel's content
    /// size, preserving content. No-op for panels without a surface yet or
    /// for a zero-sized content box (deferred until the next sync).
    pub fn sync(&mut self, panel: PanelId, metrics: &PanelMetrics) {
        if !metrics.has_area() {
            return;
        }
        if let Some(surface) = self.slot_mut(panel).as_mut() {
            surface.resize_preserving(metrics.content_width, metrics.content_height);
        }
    }

    pub fn clear(&mut self, panel: PanelId) {
        if let Some(surface) = self.slot_mut(panel).as_mut() {
            surface.clear();
        }
    }

    pub fn clear_all(&mut self) {
        for panel in PanelId::ALL {
            self.clear(panel);
        }
    }
}
