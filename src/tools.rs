//! Active tool state: the mode machine, palettes and stroke parameters.

use crate::geometry::Color;
use crate::raster::BlendMode;

/// Pastel highlight palette. These must stay light: with darken
/// compositing a light color never obscures underlying text and never
/// deepens on overlap.
pub const HIGHLIGHT_COLORS: [Color; 9] = [
    Color::from_rgb_u32(0xB3E5FC), // blue
    Color::from_rgb_u32(0xFFF9C4), // yellow
    Color::from_rgb_u32(0xC8E6C9), // green
    Color::from_rgb_u32(0xF8BBD9), // pink
    Color::from_rgb_u32(0xFFE0B2), // orange
    Color::from_rgb_u32(0xE1BEE7), // purple
    Color::from_rgb_u32(0xB2EBF2), // cyan
    Color::from_rgb_u32(0xDCEDC8), // lime
    Color::from_rgb_u32(0xFFCDD2), // red
];

pub const PEN_COLORS: [Color; 5] = [
    Color::from_rgb_u32(0x000000),
    Color::from_rgb_u32(0x1565C0),
    Color::from_rgb_u32(0xC62828),
    Color::from_rgb_u32(0x2E7D32),
    Color::from_rgb_u32(0x5D4037),
];

pub const HIGHLIGHT_DEFAULT_COLOR: Color = HIGHLIGHT_COLORS[0];
pub const PEN_DEFAULT_COLOR: Color = PEN_COLORS[1];

pub const HIGHLIGHT_DEFAULT_WIDTH: f32 = 20.0;
pub const PEN_DEFAULT_WIDTH: f32 = 3.0;
pub const ERASER_DEFAULT_WIDTH: f32 = 50.0;

pub const WIDTH_STEP: f32 = 5.0;
pub const WIDTH_MAX: f32 = 80.0;
const PEN_WIDTH_MIN: f32 = 1.0;
const BROAD_WIDTH_MIN: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Normal,
    TextSelect,
    Pen,
    Highlighter,
    Eraser,
    StickyNote,
}

/// Where a pointer-down is routed for the active tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerRoute {
    Stroke,
    Note,
    /// Normal and text-select pass pointer input through to the document.
    PassThrough,
}

impl ToolKind {
    pub const fn is_stroke_tool(self) -> bool {
        matches!(self, Self::Pen | Self::Highlighter | Self::Eraser)
    }

    pub const fn pointer_route(self) -> PointerRoute {
        match self {
            Self::Pen | Self::Highlighter | Self::Eraser => PointerRoute::Stroke,
            Self::StickyNote => PointerRoute::Note,
            Self::Normal | Self::TextSelect => PointerRoute::PassThrough,
        }
    }

    /// Selection-changed notifications only matter in text-select mode.
    pub const fn handles_selection(self) -> bool {
        matches!(self, Self::TextSelect)
    }

    pub const fn palette(self) -> Option<&'static [Color]> {
        match self {
            Self::Pen => Some(&PEN_COLORS),
            Self::TextSelect | Self::Highlighter => Some(&HIGHLIGHT_COLORS),
            Self::Normal | Self::Eraser | Self::StickyNote => None,
        }
    }

    const fn palette_default(self) -> Option<Color> {
        match self {
            Self::Pen => Some(PEN_DEFAULT_COLOR),
            Self::TextSelect | Self::Highlighter => Some(HIGHLIGHT_DEFAULT_COLOR),
            Self::Normal | Self::Eraser | Self::StickyNote => None,
        }
    }

    pub const fn blend_mode(self) -> Option<BlendMode> {
        match self {
            Self::Pen => Some(BlendMode::SourceOver),
            Self::Highlighter => Some(BlendMode::Darken),
            Self::Eraser => Some(BlendMode::DestinationOut),
            Self::Normal | Self::TextSelect | Self::StickyNote => None,
        }
    }

    const fn width_min(self) -> f32 {
        match self {
            Self::Pen => PEN_WIDTH_MIN,
            _ => BROAD_WIDTH_MIN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolState {
    active: ToolKind,
    color: Color,
    line_width: f32,
}

impl Default for ToolState {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolState {
    pub const fn new() -> Self {
        Self {
            active: ToolKind::Normal,
            color: HIGHLIGHT_DEFAULT_COLOR,
            line_width: HIGHLIGHT_DEFAULT_WIDTH,
        }
    }

    pub const fn active(&self) -> ToolKind {
        self.active
    }

    pub const fn color(&self) -> Color {
        self.color
    }

    pub const fn line_width(&self) -> f32 {
        self.line_width
    }

    /// Switches tools, applying tool-appropriate defaults: width resets,
    /// and the color is coerced into the new tool's palette.
    pub fn select_tool(&mut self, tool: ToolKind) {
        self.active = tool;
        match tool {
            ToolKind::TextSelect | ToolKind::Highlighter => {
                self.line_width = HIGHLIGHT_DEFAULT_WIDTH;
                if !palette_contains(&HIGHLIGHT_COLORS, self.color) {
                    self.color = HIGHLIGHT_DEFAULT_COLOR;
                }
            }
            ToolKind::Pen => {
                self.line_width = PEN_DEFAULT_WIDTH;
                self.color = PEN_DEFAULT_COLOR;
            }
            ToolKind::Eraser => {
                self.line_width = ERASER_DEFAULT_WIDTH;
            }
            ToolKind::Normal | ToolKind::StickyNote => {}
        }
        tracing::debug!(tool = ?tool, width = self.line_width, "tool selected");
    }

    /// Sets the color, correcting any value outside the active palette to
    /// the palette default.
    pub fn set_color(&mut self, color: Color) {
        match self.active.palette() {
            Some(palette) if !palette_contains(palette, color) => {
                self.color = self
                    .active
                    .palette_default()
                    .unwrap_or(HIGHLIGHT_DEFAULT_COLOR);
            }
            _ => self.color = color,
        }
    }

    /// Steps to the next color in the active palette, wrapping around.
    /// Tools without a palette keep their color.
    pub fn cycle_color(&mut self) {
        let Some(palette) = self.active.palette() else {
            return;
        };
        let index = palette.iter().position(|&c| c == self.color);
        self.color = match index {
            Some(i) => palette[(i + 1) % palette.len()],
            None => palette[0],
        };
    }

    pub fn increase_width(&mut self) {
        self.line_width = (self.line_width + WIDTH_STEP).min(WIDTH_MAX);
    }

    pub fn decrease_width(&mut self) {
        self.line_width = (self.line_width - WIDTH_STEP).max(self.active.width_min());
    }
}

fn palette_contains(palette: &[Color], color: Color) -> bool {
    palette.iter().any(|&c| c == color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controller_starts_in_normal_mode() {
        let tools = ToolState::new();
        assert_eq!(tools.active(), ToolKind::Normal);
    }

    #[test]
    fn stroke_tools_route_to_the_stroke_engine() {
        for tool in [ToolKind::Pen, ToolKind::Highlighter, ToolKind::Eraser] {
            assert_eq!(tool.pointer_route(), PointerRoute::Stroke);
            assert!(tool.is_stroke_tool());
        }
        assert_eq!(ToolKind::StickyNote.pointer_route(), PointerRoute::Note);
        assert_eq!(ToolKind::Normal.pointer_route(), PointerRoute::PassThrough);
        assert_eq!(
            ToolKind::TextSelect.pointer_route(),
            PointerRoute::PassThrough
        );
    }

    #[test]
    fn only_text_select_handles_selection_events() {
        assert!(ToolKind::TextSelect.handles_selection());
        for tool in [
            ToolKind::Normal,
            ToolKind::Pen,
            ToolKind::Highlighter,
            ToolKind::Eraser,
            ToolKind::StickyNote,
        ] {
            assert!(!tool.handles_selection());
        }
    }

    #[test]
    fn switching_to_highlighter_resets_pen_only_colors() {
        let mut tools = ToolState::new();
        tools.select_tool(ToolKind::Pen);
        tools.set_color(Color::from_rgb_u32(0x000000));

        tools.select_tool(ToolKind::Highlighter);
        assert_eq!(tools.color(), HIGHLIGHT_DEFAULT_COLOR);
        assert_eq!(tools.line_width(), HIGHLIGHT_DEFAULT_WIDTH);
    }

    #[test]
    fn switching_to_highlighter_keeps_palette_members() {
        let mut tools = ToolState::new();
        tools.select_tool(ToolKind::TextSelect);
        tools.set_color(HIGHLIGHT_COLORS[3]);

        tools.select_tool(ToolKind::Highlighter);
        assert_eq!(tools.color(), HIGHLIGHT_COLORS[3]);
    }

    #[test]
    fn switching_to_pen_resets_width_and_color() {
        let mut tools = ToolState::new();
        tools.select_tool(ToolKind::Eraser);
        assert_eq!(tools.line_width(), ERASER_DEFAULT_WIDTH);

        tools.select_tool(ToolKind::Pen);
        assert_eq!(tools.line_width(), PEN_DEFAULT_WIDTH);
        assert_eq!(tools.color(), PEN_DEFAULT_COLOR);
    }

    #[test]
    fn set_color_outside_the_palette_corrects_to_the_default() {
        let mut tools = ToolState::new();
        tools.select_tool(ToolKind::Highlighter);
        tools.set_color(Color::from_rgb_u32(0x123456));
        assert_eq!(tools.color(), HIGHLIGHT_DEFAULT_COLOR);
    }

    #[test]
    fn cycle_color_wraps_through_the_active_palette() {
        let mut tools = ToolState::new();
        tools.select_tool(ToolKind::Pen);
        assert_eq!(tools.color(), PEN_COLORS[1]);

        tools.cycle_color();
        assert_eq!(tools.color(), PEN_COLORS[2]);

        for _ in 0..4 {
            tools.cycle_color();
        }
        assert_eq!(tools.color(), PEN_COLORS[1]);
    }

    #[test]
    fn cycle_color_without_a_palette_keeps_the_color() {
        let mut tools = ToolState::new();
        tools.select_tool(ToolKind::Eraser);
        let before = tools.color();
        tools.cycle_color();
        assert_eq!(tools.color(), before);
    }

    #[test]
    fn width_nudges_clamp_per_tool() {
        let mut tools = ToolState::new();
        tools.select_tool(ToolKind::Pen);
        tools.decrease_width();
        assert_eq!(tools.line_width(), 1.0);
        tools.decrease_width();
        assert_eq!(tools.line_width(), 1.0);

        tools.select_tool(ToolKind::Highlighter);
        for _ in 0..10 {
            tools.decrease_width();
        }
        assert_eq!(tools.line_width(), 10.0);

        for _ in 0..30 {
            tools.increase_width();
        }
        assert_eq!(tools.line_width(), WIDTH_MAX);
    }

    #[test]
    fn blend_modes_match_tools() {
        assert_eq!(ToolKind::Pen.blend_mode(), Some(BlendMode::SourceOver));
        assert_eq!(ToolKind::Highlighter.blend_mode(), Some(BlendMode::Darken));
        assert_eq!(
            ToolKind::Eraser.blend_mode(),
            Some(BlendMode::DestinationOut)
        );
        assert_eq!(ToolKind::Normal.blend_mode(), None);
    }
}
