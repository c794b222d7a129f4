//! Sheet image acquisition
//!
//! This module provides:
//! - The scanned sheet image type with placeholder fallback (image.rs)
//! - Image sources resolving workbook pages to scans

pub mod image;
