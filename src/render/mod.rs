//! Annotation rendering module
//!
//! This module contains:
//! - Stamp glyph geometry
//! - Raster painting using tiny-skia (strokes, stamps, export)

pub mod geometry;
pub mod image;
