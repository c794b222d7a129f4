//! Pointer input translation
//!
//! Converts mouse and touch positions in viewport space into overlay
//! surface (backing pixel) coordinates.

use serde::{Deserialize, Serialize};

use super::sizing::DisplayTransform;
use crate::domain::Point;

/// Stage of a pointer interaction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Leave,
}

/// Where a pointer event came from
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PointerSource {
    /// Mouse position in viewport coordinates
    Mouse { client_x: f32, client_y: f32 },
    /// Active touch points in viewport coordinates; may be empty on touch end
    Touch { touches: Vec<Point> },
}

/// A raw pointer or touch event as delivered by the host
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub source: PointerSource,
}

impl PointerEvent {
    pub fn mouse(phase: PointerPhase, client_x: f32, client_y: f32) -> Self {
        Self {
            phase,
            source: PointerSource::Mouse { client_x, client_y },
        }
    }

    pub fn touch(phase: PointerPhase, touches: Vec<Point>) -> Self {
        Self {
            phase,
            source: PointerSource::Touch { touches },
        }
    }

    /// Viewport position of the event; the first touch point stands in for the mouse
    pub fn client_position(&self) -> Option<Point> {
        match &self.source {
            PointerSource::Mouse { client_x, client_y } => Some(Point::new(*client_x, *client_y)),
            PointerSource::Touch { touches } => touches.first().copied(),
        }
    }
}

/// Map a pointer event into surface coordinates
///
/// Returns `None` when the event carries no position or the overlay has no
/// displayed area.
pub fn to_surface_coords(event: &PointerEvent, transform: &DisplayTransform) -> Option<Point> {
    let client = event.client_position()?;
    let (sx, sy) = transform.scale()?;
    let displayed = transform.viewport_box;
    Some(Point::new(
        (client.x - displayed.left) * sx,
        (client.y - displayed.top) * sy,
    ))
}

/// Pointer handler registration for the overlay
///
/// Attach and detach are paired: attaching an already attached binding keeps a
/// single registration, and events are only dispatched while attached.
#[derive(Debug, Default)]
pub struct InputBindings {
    attached: bool,
}

impl InputBindings {
    /// Register the pointer handlers; returns false if they were already registered
    pub fn attach(&mut self) -> bool {
        if self.attached {
            log::debug!("Pointer handlers already attached");
            return false;
        }
        self.attached = true;
        true
    }

    /// Deregister the pointer handlers; returns false if none were registered
    pub fn detach(&mut self) -> bool {
        std::mem::replace(&mut self.attached, false)
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }
}
