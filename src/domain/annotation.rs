//! Annotation tool types for marking up answer sheets
//!
//! Annotations are raster-only: strokes and stamps are painted straight onto the
//! overlay surface and no per-annotation record is retained.

use serde::{Deserialize, Serialize};

/// Active annotation tool
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolMode {
    #[default]
    None,
    Pen,
    Highlighter,
    CheckStamp,
    CrossStamp,
}

impl ToolMode {
    /// Stroke kind for continuous drawing tools
    pub fn stroke_kind(self) -> Option<StrokeKind> {
        match self {
            ToolMode::Pen => Some(StrokeKind::Pen),
            ToolMode::Highlighter => Some(StrokeKind::Highlighter),
            _ => None,
        }
    }

    /// Stamp kind for single-shot tools
    pub fn stamp_kind(self) -> Option<StampKind> {
        match self {
            ToolMode::CheckStamp => Some(StampKind::Check),
            ToolMode::CrossStamp => Some(StampKind::Cross),
            _ => None,
        }
    }

    /// Whether any drawing tool is selected
    pub fn is_active(self) -> bool {
        self != ToolMode::None
    }

    /// Label shown on the tool button
    pub fn label(self) -> &'static str {
        match self {
            ToolMode::None => "Clear Tool Selection",
            ToolMode::Pen => "Freehand (Pen)",
            ToolMode::Highlighter => "Highlight (Marker)",
            ToolMode::CheckStamp => "Correct (Stamp)",
            ToolMode::CrossStamp => "Cross (Stamp)",
        }
    }
}

/// Continuous stroke styles
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrokeKind {
    Pen,
    Highlighter,
}

/// Single-shot stamp glyphs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StampKind {
    Check,
    Cross,
}

impl StampKind {
    /// Glyph character used in textual summaries
    pub fn glyph(self) -> char {
        match self {
            StampKind::Check => '✔',
            StampKind::Cross => '✖',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_mode_kinds() {
        assert_eq!(ToolMode::Pen.stroke_kind(), Some(StrokeKind::Pen));
        assert_eq!(ToolMode::Pen.stamp_kind(), None);
        assert_eq!(ToolMode::CrossStamp.stamp_kind(), Some(StampKind::Cross));
        assert_eq!(ToolMode::None.stroke_kind(), None);
        assert!(!ToolMode::None.is_active());
    }

    #[test]
    fn test_tool_labels() {
        assert_eq!(ToolMode::Highlighter.label(), "Highlight (Marker)");
        assert_eq!(ToolMode::None.label(), "Clear Tool Selection");
    }

    #[test]
    fn test_tool_mode_serde_names() {
        let mode: ToolMode = serde_json::from_str("\"check-stamp\"").unwrap();
        assert_eq!(mode, ToolMode::CheckStamp);
        assert_eq!(serde_json::to_string(&ToolMode::Highlighter).unwrap(), "\"highlighter\"");
    }
}
