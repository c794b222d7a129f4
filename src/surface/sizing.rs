//! Overlay surface sizing
//!
//! Keeps the annotation overlay pixel-aligned over the displayed sheet image.
//! The math lives in [`compute_transform`]; [`SurfaceSizer`] is the thin adapter
//! that calls it at the mount / viewport-resize / image-load trigger points.

use std::num::NonZeroU32;

use crate::config::AppConfig;
use crate::domain::{BackingSize, BoundingBox, Point};

/// Backing resolution used when neither the image nor the config supplies one
pub const DEFAULT_FALLBACK: BackingSize = BackingSize {
    width: NonZeroU32::new(800).unwrap(),
    height: NonZeroU32::new(600).unwrap(),
};

/// Mapping between the overlay's backing raster and its displayed box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayTransform {
    /// Backing resolution in device pixels (the sheet image's natural size)
    pub backing: BackingSize,
    /// Displayed box of the overlay in viewport coordinates
    pub viewport_box: BoundingBox,
    /// Displayed top-left of the overlay relative to its positioned parent
    pub offset: Point,
}

impl DisplayTransform {
    /// Displayed box relative to the positioned parent (what the overlay's style carries)
    pub fn css_box(&self) -> BoundingBox {
        BoundingBox::new(
            self.offset.x,
            self.offset.y,
            self.viewport_box.width,
            self.viewport_box.height,
        )
    }

    /// Backing pixels per displayed unit along each axis
    ///
    /// Returns `None` while the displayed box has no area (e.g. a hidden image).
    pub fn scale(&self) -> Option<(f32, f32)> {
        if self.viewport_box.is_degenerate() {
            return None;
        }
        Some((
            self.backing.width() as f32 / self.viewport_box.width,
            self.backing.height() as f32 / self.viewport_box.height,
        ))
    }
}

/// Compute the overlay transform for a sheet image displayed at `source_box`
/// inside a positioned parent displayed at `parent_box`
pub fn compute_transform(
    source_box: BoundingBox,
    parent_box: BoundingBox,
    backing: BackingSize,
) -> DisplayTransform {
    DisplayTransform {
        backing,
        viewport_box: source_box,
        offset: source_box.offset_from(&parent_box),
    }
}

/// Read-only view of the rendered layout the overlay sits in
pub trait OverlayLayout {
    /// Natural (intrinsic) pixel size of the sheet image, `None` until it has loaded
    fn natural_size(&self) -> Option<(u32, u32)>;
    /// Displayed box of the sheet image in viewport coordinates
    fn image_box(&self) -> BoundingBox;
    /// Displayed box of the overlay's positioned parent in viewport coordinates
    fn parent_box(&self) -> BoundingBox;
}

/// Events that require the transform to be recomputed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeTrigger {
    Mount,
    ViewportResize,
    ImageLoaded,
}

/// Owns the overlay transform (never the pixel contents)
#[derive(Debug, Clone)]
pub struct SurfaceSizer {
    fallback: BackingSize,
    transform: Option<DisplayTransform>,
}

impl SurfaceSizer {
    pub fn new(fallback: BackingSize) -> Self {
        Self {
            fallback,
            transform: None,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let fallback = BackingSize::new(config.fallback_width, config.fallback_height)
            .unwrap_or_else(|| {
                log::warn!(
                    "Invalid fallback resolution {}x{}, using 800x600",
                    config.fallback_width,
                    config.fallback_height
                );
                DEFAULT_FALLBACK
            });
        Self::new(fallback)
    }

    /// Current transform, `None` while unmounted
    pub fn transform(&self) -> Option<&DisplayTransform> {
        self.transform.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.transform.is_some()
    }

    /// Backing resolution for the image as currently loaded
    pub fn backing_for(&self, layout: &dyn OverlayLayout) -> BackingSize {
        layout
            .natural_size()
            .and_then(|(w, h)| BackingSize::new(w, h))
            .unwrap_or(self.fallback)
    }

    /// Initial sizing when the overlay is mounted
    pub fn mount(&mut self, layout: &dyn OverlayLayout) -> DisplayTransform {
        self.recompute(ResizeTrigger::Mount, layout)
    }

    /// Viewport resize; no-op while unmounted
    pub fn on_viewport_resize(&mut self, layout: &dyn OverlayLayout) -> Option<DisplayTransform> {
        self.is_mounted()
            .then(|| self.recompute(ResizeTrigger::ViewportResize, layout))
    }

    /// Sheet image finished loading; no-op while unmounted
    pub fn on_image_loaded(&mut self, layout: &dyn OverlayLayout) -> Option<DisplayTransform> {
        self.is_mounted()
            .then(|| self.recompute(ResizeTrigger::ImageLoaded, layout))
    }

    pub fn unmount(&mut self) {
        self.transform = None;
    }

    fn recompute(&mut self, trigger: ResizeTrigger, layout: &dyn OverlayLayout) -> DisplayTransform {
        let backing = self.backing_for(layout);
        let transform = compute_transform(layout.image_box(), layout.parent_box(), backing);
        log::debug!(
            "Overlay resized ({:?}): backing {}x{}, displayed {:?}",
            trigger,
            backing.width(),
            backing.height(),
            transform.css_box()
        );
        self.transform = Some(transform);
        transform
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Fixed layout for tests
    #[derive(Clone, Copy, Debug)]
    pub(crate) struct StaticLayout {
        pub natural: Option<(u32, u32)>,
        pub image: BoundingBox,
        pub parent: BoundingBox,
    }

    impl OverlayLayout for StaticLayout {
        fn natural_size(&self) -> Option<(u32, u32)> {
            self.natural
        }

        fn image_box(&self) -> BoundingBox {
            self.image
        }

        fn parent_box(&self) -> BoundingBox {
            self.parent
        }
    }

    fn fallback() -> BackingSize {
        DEFAULT_FALLBACK
    }

    #[test]
    fn test_transform_aligns_with_letterboxed_image() {
        let parent = BoundingBox::new(100.0, 50.0, 1000.0, 700.0);
        let image = BoundingBox::new(250.0, 50.0, 700.0, 700.0);
        let t = compute_transform(image, parent, BackingSize::new(1400, 1400).unwrap());

        assert_eq!(t.css_box(), BoundingBox::new(150.0, 0.0, 700.0, 700.0));
        assert_eq!(t.viewport_box, image);
        assert_eq!(t.scale(), Some((2.0, 2.0)));
    }

    #[test]
    fn test_degenerate_display_has_no_scale() {
        let t = compute_transform(
            BoundingBox::new(0.0, 0.0, 0.0, 0.0),
            BoundingBox::default(),
            fallback(),
        );
        assert_eq!(t.scale(), None);
    }

    #[test]
    fn test_fallback_until_image_loads() {
        let mut sizer = SurfaceSizer::new(fallback());
        let mut layout = StaticLayout {
            natural: None,
            image: BoundingBox::new(0.0, 0.0, 400.0, 300.0),
            parent: BoundingBox::new(0.0, 0.0, 400.0, 300.0),
        };
        assert_eq!(sizer.mount(&layout).backing, fallback());

        layout.natural = Some((1600, 1200));
        let t = sizer.on_image_loaded(&layout).unwrap();
        assert_eq!(t.backing, BackingSize::new(1600, 1200).unwrap());
    }

    #[test]
    fn test_triggers_ignored_while_unmounted() {
        let mut sizer = SurfaceSizer::new(fallback());
        let layout = StaticLayout {
            natural: Some((10, 10)),
            image: BoundingBox::new(0.0, 0.0, 10.0, 10.0),
            parent: BoundingBox::default(),
        };
        assert!(sizer.on_viewport_resize(&layout).is_none());
        assert!(sizer.on_image_loaded(&layout).is_none());

        sizer.mount(&layout);
        sizer.unmount();
        assert!(sizer.on_viewport_resize(&layout).is_none());
        assert!(sizer.transform().is_none());
    }

    #[test]
    fn test_overlay_tracks_image_over_resize_sequence() {
        let mut sizer = SurfaceSizer::new(fallback());
        let layouts = [
            (BoundingBox::new(10.0, 10.0, 800.0, 600.0), BoundingBox::new(0.0, 0.0, 820.0, 620.0)),
            (BoundingBox::new(35.5, 12.25, 533.3, 400.0), BoundingBox::new(5.0, 2.0, 600.0, 420.0)),
            (BoundingBox::new(0.0, 90.0, 320.0, 240.0), BoundingBox::new(0.0, 0.0, 320.0, 420.0)),
        ];
        sizer.mount(&StaticLayout {
            natural: None,
            image: layouts[0].0,
            parent: layouts[0].1,
        });
        for (image, parent) in layouts {
            let layout = StaticLayout {
                natural: Some((1600, 1200)),
                image,
                parent,
            };
            let t = sizer.on_viewport_resize(&layout).unwrap();
            let css = t.css_box();
            // Displayed overlay, placed back into viewport space, equals the image box
            let placed = css.translate(parent.left, parent.top);
            assert!((placed.left - image.left).abs() <= 1.0);
            assert!((placed.top - image.top).abs() <= 1.0);
            assert!((placed.width - image.width).abs() <= 1.0);
            assert!((placed.height - image.height).abs() <= 1.0);
        }
    }

    #[test]
    fn test_invalid_fallback_config_is_repaired() {
        let config = AppConfig {
            fallback_width: 0,
            ..AppConfig::default()
        };
        let sizer = SurfaceSizer::from_config(&config);
        let layout = StaticLayout {
            natural: Some((0, 0)),
            image: BoundingBox::default(),
            parent: BoundingBox::default(),
        };
        assert_eq!(sizer.backing_for(&layout), fallback());
    }
}
