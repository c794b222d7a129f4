//! Evaluation session module
//!
//! This module contains:
//! - Per-page session state (marks, page cursor, comment, model answer)
//! - Message types for evaluation interactions
//! - The evaluation view that dispatches them

pub mod messages;
pub mod state;
pub mod view;
