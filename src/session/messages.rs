//! Message types for an evaluation session
//!
//! This module contains:
//! - EvalMsg, every interaction the evaluation view reacts to
//! - Update, what handling a message produced

use serde::{Deserialize, Serialize};

use super::view::ViewportLayout;
use crate::annotations::EventDisposition;
use crate::core::submit::Acknowledgement;
use crate::domain::ToolMode;
use crate::surface::PointerEvent;

/// Evaluation view interactions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "value", rename_all = "kebab-case")]
pub enum EvalMsg {
    /// Pick an annotation tool (`none` clears the selection)
    SelectTool(ToolMode),
    /// Wipe every drawing on the current page
    ClearDrawings,
    /// Raw pointer or touch event over the overlay
    Pointer(PointerEvent),
    /// Viewport was resized and the sheet moved
    ViewportResized(ViewportLayout),
    /// Quick-select mark button
    SelectMark(f64),
    /// Manual mark entry, as typed
    EnterMark(String),
    /// Evaluator comment text
    SetComment(String),
    /// Show/hide the model answer
    ToggleModelAnswer,
    NextPage,
    PreviousPage,
    /// Hand the evaluation to the grading service
    Submit,
}

impl EvalMsg {
    pub fn select_tool(mode: ToolMode) -> Self {
        Self::SelectTool(mode)
    }
}

/// Result of handling one message
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    None,
    /// The pointer event was offered to the overlay
    Pointer(EventDisposition),
    /// The page changed (or stayed put at a boundary)
    Page { moved: bool, current: u32 },
    /// The evaluation was accepted; the view is finished
    Submitted(Acknowledgement),
}
