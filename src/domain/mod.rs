//! Pure domain types with minimal dependencies
//!
//! This module contains core types used throughout the application.
//! Types here should have no rendering dependencies (tiny-skia, image)
//! so the surface math can be tested on its own.

pub mod annotation;
pub mod geometry;

pub use annotation::*;
pub use geometry::*;
