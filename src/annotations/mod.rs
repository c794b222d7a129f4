//! Annotation engine and overlay event handling
//!
//! This module provides:
//! - The raster annotation engine (pen, highlighter, check/cross stamps)
//! - The overlay that routes layout and pointer events into it

pub mod engine;
pub mod handlers;

pub use engine::AnnotationEngine;
pub use handlers::{AnnotationOverlay, EventDisposition};
