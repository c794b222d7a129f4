//! Shared geometry calculations for annotation glyphs
//!
//! Stamp glyphs are drawn as stroked polylines inside a square box
//! centered on the pointer-down point.

use crate::domain::{Point, StampKind};

/// Stamp glyph constants
pub mod stamp {
    /// Glyph stroke thickness as a fraction of the stamp box size
    pub const THICKNESS_RATIO: f32 = 0.16;
    /// Minimum stamp box size in surface pixels
    pub const MIN_SIZE: f32 = 8.0;

    /// Check mark polyline in unit box coordinates
    pub const CHECK: [(f32, f32); 3] = [(0.08, 0.55), (0.38, 0.85), (0.92, 0.15)];
    /// Cross diagonals in unit box coordinates
    pub const CROSS: [[(f32, f32); 2]; 2] = [[(0.15, 0.15), (0.85, 0.85)], [(0.85, 0.15), (0.15, 0.85)]];
}

/// Polylines making up a stamp glyph, in surface coordinates
///
/// Each inner Vec is one connected polyline.
pub fn stamp_polylines(kind: StampKind, center: Point, size: f32) -> Vec<Vec<Point>> {
    let size = size.max(stamp::MIN_SIZE);
    let origin_x = center.x - size * 0.5;
    let origin_y = center.y - size * 0.5;
    let map = |(u, v): (f32, f32)| Point::new(origin_x + u * size, origin_y + v * size);

    match kind {
        StampKind::Check => vec![stamp::CHECK.iter().copied().map(map).collect()],
        StampKind::Cross => stamp::CROSS
            .iter()
            .map(|line| line.iter().copied().map(map).collect())
            .collect(),
    }
}

/// Stroke thickness for a stamp of the given box size
#[inline]
pub fn stamp_thickness(size: f32) -> f32 {
    (size.max(stamp::MIN_SIZE) * stamp::THICKNESS_RATIO).max(1.0)
}
