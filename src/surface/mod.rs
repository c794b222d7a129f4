//! Overlay surface placement and pointer mapping
//!
//! This module contains:
//! - Surface sizing: aligning the overlay over the sheet image
//! - Pointer input translation: viewport positions to surface pixels

pub mod input;
pub mod sizing;

pub use input::{InputBindings, PointerEvent, PointerPhase, to_surface_coords};
pub use sizing::{DisplayTransform, OverlayLayout, SurfaceSizer};
