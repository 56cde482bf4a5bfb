//! Freehand stroke gestures: pen, highlighter and eraser.
//!
//! One gesture runs `Idle -> Armed -> Drawing -> Idle`. The style (blend
//! mode, color, width) is captured at pointer-down so a mid-gesture tool
//! switch cannot tear a stroke. Nothing paints and no history entry is
//! produced until cumulative movement clears the jitter threshold, so an
//! accidental tap leaves no mark.

use crate::geometry::{Color, SurfacePoint};
use crate::raster::{self, BlendMode};
use crate::surface::{PanelId, Surface};
use crate::tools::ToolKind;

pub const JITTER_THRESHOLD_PX: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub mode: BlendMode,
    pub color: Color,
    pub width: f32,
}

impl StrokeStyle {
    /// Style for the active tool, or `None` for non-stroke tools.
    pub fn for_tool(tool: ToolKind, color: Color, width: f32) -> Option<Self> {
        tool.blend_mode().map(|mode| Self { mode, color, width })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    /// Pointer is down but movement has not cleared the jitter threshold.
    Armed,
    Drawing,
}

/// One in-flight stroke gesture. Created at pointer-down, dropped at
/// pointer-up or pointer-leave (both end it identically).
#[derive(Debug, Clone, Copy)]
pub struct StrokeGesture {
    panel: PanelId,
    style: StrokeStyle,
    start: SurfacePoint,
    last: SurfacePoint,
    phase: Phase,
    jitter_threshold: f32,
}

/// What a finished gesture asks of the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeOutcome {
    /// The gesture painted; take a history snapshot.
    Painted,
    /// Jitter-suppressed tap; no mark, no history entry.
    Discarded,
}

impl StrokeGesture {
    pub fn begin(panel: PanelId, style: StrokeStyle, at: SurfacePoint) -> Self {
        Self::with_jitter_threshold(panel, style, at, JITTER_THRESHOLD_PX)
    }

    pub fn with_jitter_threshold(
        panel: PanelId,
        style: StrokeStyle,
        at: SurfacePoint,
        jitter_threshold: f32,
    ) -> Self {
        Self {
            panel,
            style,
            start: at,
            last: at,
            phase: Phase::Armed,
            jitter_threshold,
        }
    }

    pub const fn panel(&self) -> PanelId {
        self.panel
    }

    pub fn has_painted(&self) -> bool {
        self.phase == Phase::Drawing
    }

    /// Feeds a pointer move, painting a segment from the previous point
    /// once the gesture is live.
    pub fn update(&mut self, surface: &mut Surface, at: SurfacePoint) {
        match self.phase {
            Phase::Armed => {
                if self.start.distance_to(at) < self.jitter_threshold {
                    return;
                }
                self.phase = Phase::Drawing;
                // The first painted segment spans from the original
                // down-point, so the stroke has no gap at its head.
                self.paint(surface, self.start, at);
                self.last = at;
            }
            Phase::Drawing => {
                self.paint(surface, self.last, at);
                self.last = at;
            }
        }
    }

    /// Ends the gesture (pointer-up or pointer-leave).
    pub fn finish(self) -> StrokeOutcome {
        match self.phase {
            Phase::Drawing => StrokeOutcome::Painted,
            Phase::Armed => StrokeOutcome::Discarded,
        }
    }

    fn paint(&self, surface: &mut Surface, from: SurfacePoint, to: SurfacePoint) {
        raster::stroke_segment(
            surface.buffer_mut(),
            from,
            to,
            self.style.width,
            self.style.color,
            self.style.mode,
        );
    }
}
