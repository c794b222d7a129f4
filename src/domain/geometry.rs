//! Geometric types for the overlay surface and viewport coordinates

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// A point in either viewport or surface space, depending on context
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Displayed box of an element in viewport (CSS) units
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Offset of this box's top-left corner relative to `parent`'s top-left corner
    pub fn offset_from(&self, parent: &BoundingBox) -> Point {
        Point {
            x: self.left - parent.left,
            y: self.top - parent.top,
        }
    }

    /// Translate the box by the given offset
    pub fn translate(&self, dx: f32, dy: f32) -> BoundingBox {
        BoundingBox {
            left: self.left + dx,
            top: self.top + dy,
            ..*self
        }
    }

    /// Whether the box has a usable (positive, finite) area
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }

    /// Inclusive containment check, so points on the right/bottom edge count
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right() && p.y >= self.top && p.y <= self.bottom()
    }
}

/// Backing resolution of a raster surface in device pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackingSize {
    pub width: NonZeroU32,
    pub height: NonZeroU32,
}

impl BackingSize {
    /// Create a backing size, or `None` if either dimension is zero
    pub fn new(width: u32, height: u32) -> Option<Self> {
        Some(Self {
            width: NonZeroU32::new(width)?,
            height: NonZeroU32::new(height)?,
        })
    }

    /// Get the width as u32
    pub fn width(&self) -> u32 {
        self.width.get()
    }

    /// Get the height as u32
    pub fn height(&self) -> u32 {
        self.height.get()
    }
}
