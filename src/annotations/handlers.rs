//! Annotation overlay event handlers
//!
//! Wires surface sizing, pointer translation and the annotation engine
//! together. The host forwards layout triggers and raw pointer events here.

use crate::config::AppConfig;
use crate::domain::ToolMode;
use crate::surface::{
    DisplayTransform, InputBindings, OverlayLayout, PointerEvent, PointerPhase, SurfaceSizer,
    to_surface_coords,
};

use super::engine::AnnotationEngine;

/// What the host should do with a pointer event after the overlay saw it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventDisposition {
    /// A drawing tool owns the event; suppress default scrolling/selection
    Consumed,
    /// Let the host handle the event normally
    Ignored,
}

/// Transparent drawing surface laid over a sheet image
pub struct AnnotationOverlay {
    sizer: SurfaceSizer,
    engine: AnnotationEngine,
    bindings: InputBindings,
}

impl AnnotationOverlay {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            sizer: SurfaceSizer::from_config(config),
            engine: AnnotationEngine::new(config.annotation.clone()),
            bindings: InputBindings::default(),
        }
    }

    pub fn engine(&self) -> &AnnotationEngine {
        &self.engine
    }

    pub fn transform(&self) -> Option<&DisplayTransform> {
        self.sizer.transform()
    }

    pub fn is_mounted(&self) -> bool {
        self.bindings.is_attached()
    }

    /// Size the surface and register pointer handlers
    pub fn mount(&mut self, layout: &dyn OverlayLayout) {
        let transform = self.sizer.mount(layout);
        self.engine.resize_backing(transform.backing);
        if !self.bindings.attach() {
            log::warn!("Overlay mounted twice; keeping a single handler set");
        }
    }

    /// Deregister handlers and drop the surface
    pub fn unmount(&mut self) {
        self.bindings.detach();
        self.sizer.unmount();
        self.engine.detach_surface();
    }

    pub fn on_viewport_resize(&mut self, layout: &dyn OverlayLayout) {
        if let Some(transform) = self.sizer.on_viewport_resize(layout) {
            self.engine.resize_backing(transform.backing);
        }
    }

    pub fn on_image_loaded(&mut self, layout: &dyn OverlayLayout) {
        if let Some(transform) = self.sizer.on_image_loaded(layout) {
            self.engine.resize_backing(transform.backing);
        }
    }

    pub fn select_tool(&mut self, mode: ToolMode) {
        log::debug!("Tool selected: {}", mode.label());
        self.engine.set_mode(mode);
    }

    pub fn clear(&mut self) {
        self.engine.clear();
    }

    /// Dispatch a raw pointer or touch event
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> EventDisposition {
        if !self.bindings.is_attached() {
            return EventDisposition::Ignored;
        }
        let Some(transform) = self.sizer.transform().copied() else {
            return EventDisposition::Ignored;
        };

        let owns_event = self.engine.mode().is_active() || self.engine.is_drawing();

        match event.phase {
            PointerPhase::Down => {
                if let Some(at) = to_surface_coords(event, &transform) {
                    self.engine.pointer_down(at);
                }
            }
            PointerPhase::Move => {
                if self.engine.is_drawing()
                    && let Some(at) = to_surface_coords(event, &transform)
                {
                    self.engine.extend(at);
                }
            }
            PointerPhase::Up | PointerPhase::Leave => {
                self.engine.end();
            }
        }

        if owns_event {
            EventDisposition::Consumed
        } else {
            EventDisposition::Ignored
        }
    }
}
