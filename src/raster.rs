//! Pixel compositing primitives over raster buffers.
//!
//! Everything paints at full opacity; overlap semantics come entirely from
//! the blend mode. `Darken` keeps the per-channel minimum against pixels
//! that already carry ink, which makes repeated strokes of one color
//! idempotent instead of stacking darker.

use image::{Rgba, RgbaImage};

use crate::geometry::{Color, SurfacePoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// Replace coverage: the painted pixel takes the source color.
    SourceOver,
    /// Per-channel minimum against already-painted pixels; transparent
    /// pixels take the source color as-is.
    Darken,
    /// Remove existing coverage under the brush; the source color is
    /// ignored.
    DestinationOut,
}

const OPAQUE: u8 = 255;

pub(crate) fn blend_pixel(dst: &mut Rgba<u8>, color: Color, mode: BlendMode) {
    match mode {
        BlendMode::SourceOver => {
            *dst = Rgba([color.r, color.g, color.b, OPAQUE]);
        }
        BlendMode::Darken => {
            if dst.0[3] == 0 {
                *dst = Rgba([color.r, color.g, color.b, OPAQUE]);
            } else {
                dst.0[0] = dst.0[0].min(color.r);
                dst.0[1] = dst.0[1].min(color.g);
                dst.0[2] = dst.0[2].min(color.b);
                dst.0[3] = OPAQUE;
            }
        }
        BlendMode::DestinationOut => {
            *dst = Rgba([0, 0, 0, 0]);
        }
    }
}

/// Paints a thick line segment with round caps and joins, rasterized as a
/// capsule coverage test over the segment's bounding box.
pub fn stroke_segment(
    buf: &mut RgbaImage,
    from: SurfacePoint,
    to: SurfacePoint,
    width: f32,
    color: Color,
    mode: BlendMode,
) {
    if buf.width() == 0 || buf.height() == 0 {
        return;
    }

    let half = (width / 2.0).max(0.5);
    let min_x = (from.x.min(to.x) - half).floor().max(0.0) as u32;
    let min_y = (from.y.min(to.y) - half).floor().max(0.0) as u32;
    let max_x = ((from.x.max(to.x) + half).ceil() as i64)
        .clamp(0, i64::from(buf.width()) - 1) as u32;
    let max_y = ((from.y.max(to.y) + half).ceil() as i64)
        .clamp(0, i64::from(buf.height()) - 1) as u32;
    if min_x > max_x || min_y > max_y {
        return;
    }

    let half_sq = half * half;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let center = SurfacePoint::new(x as f32 + 0.5, y as f32 + 0.5);
            if distance_sq_to_segment(center, from, to) <= half_sq {
                blend_pixel(buf.get_pixel_mut(x, y), color, mode);
            }
        }
    }
}

/// Fills an axis-aligned rectangle with source-over semantics, clipped to
/// the buffer.
pub fn fill_rect(buf: &mut RgbaImage, x: f32, y: f32, width: f32, height: f32, color: Color) {
    if buf.width() == 0 || buf.height() == 0 || width <= 0.0 || height <= 0.0 {
        return;
    }

    let left = x.floor().max(0.0) as u32;
    let top = y.floor().max(0.0) as u32;
    let right = (((x + width).ceil() as i64).clamp(0, i64::from(buf.width()))) as u32;
    let bottom = (((y + height).ceil() as i64).clamp(0, i64::from(buf.height()))) as u32;

    for py in top..bottom {
        for px in left..right {
            blend_pixel(buf.get_pixel_mut(px, py), color, BlendMode::SourceOver);
        }
    }
}

/// Composites a scratch buffer onto a surface with darken semantics,
/// skipping scratch pixels that were never painted.
pub fn composite_darken(dst: &mut RgbaImage, src: &RgbaImage) {
    let width = dst.width().min(src.width());
    let height = dst.height().min(src.height());
    for y in 0..height {
        for x in 0..width {
            let pixel = src.get_pixel(x, y);
            if pixel.0[3] == 0 {
                continue;
            }
            let color = Color::new(pixel.0[0], pixel.0[1], pixel.0[2]);
            blend_pixel(dst.get_pixel_mut(x, y), color, BlendMode::Darken);
        }
    }
}

/// Blanks the buffer to fully transparent.
pub fn clear(buf: &mut RgbaImage) {
    for pixel in buf.pixels_mut() {
        *pixel = Rgba([0, 0, 0, 0]);
    }
}

pub fn is_blank(buf: &RgbaImage) -> bool {
    buf.pixels().all(|pixel| pixel.0[3] == 0)
}

fn distance_sq_to_segment(point: SurfacePoint, a: SurfacePoint, b: SurfacePoint) -> f32 {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let length_sq = abx * abx + aby * aby;

    let t = if length_sq <= f32::EPSILON {
        0.0
    } else {
        (((point.x - a.x) * abx + (point.y - a.y) * aby) / length_sq).clamp(0.0, 1.0)
    };

    let cx = a.x + t * abx;
    let cy = a.y + t * aby;
    let dx = point.x - cx;
    let dy = point.y - cy;
    dx * dx + dy * dy
}
