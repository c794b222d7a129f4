//! Raster annotation engine
//!
//! Owns the overlay raster and the tool-mode state machine. Strokes are painted
//! segment by segment as the pointer moves; stamps are painted once and drop the
//! tool back to [`ToolMode::None`]. Every operation is a no-op while no surface
//! is attached.

use tiny_skia::{BlendMode, Pixmap};

use crate::config::{AnnotationStyle, StrokeStyle};
use crate::domain::{BackingSize, Point, StampKind, StrokeKind, ToolMode};
use crate::render;

struct ActiveStroke {
    kind: StrokeKind,
    last: Point,
    /// Translucent strokes are rebuilt from this on every segment
    layer: Option<StrokeLayer>,
}

/// Raster as it was when the stroke began, plus the stroke's own coverage
struct StrokeLayer {
    base: Pixmap,
    coverage: Pixmap,
}

pub struct AnnotationEngine {
    style: AnnotationStyle,
    raster: Option<Pixmap>,
    mode: ToolMode,
    stroke: Option<ActiveStroke>,
}

impl AnnotationEngine {
    pub fn new(style: AnnotationStyle) -> Self {
        Self {
            style,
            raster: None,
            mode: ToolMode::None,
            stroke: None,
        }
    }

    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    pub fn is_drawing(&self) -> bool {
        self.stroke.is_some()
    }

    pub fn raster(&self) -> Option<&Pixmap> {
        self.raster.as_ref()
    }

    /// Select a tool
    ///
    /// A stroke still in flight is aborted: segments already painted stay on the
    /// raster, nothing more is added to it.
    pub fn set_mode(&mut self, mode: ToolMode) {
        if let Some(stroke) = self.stroke.take() {
            log::debug!("Aborting {:?} stroke on switch to {:?}", stroke.kind, mode);
        }
        self.mode = mode;
    }

    /// Make sure the raster matches `size`, keeping existing annotations
    ///
    /// An unchanged size leaves the raster untouched; a changed size resamples it.
    pub fn resize_backing(&mut self, size: BackingSize) {
        let resized = match &self.raster {
            Some(current) if current.width() == size.width() && current.height() == size.height() => {
                return;
            }
            Some(current) => render::image::resample(current, size),
            None => render::image::new_surface(size),
        };
        if resized.is_none() {
            log::error!(
                "Could not allocate {}x{} annotation surface",
                size.width(),
                size.height()
            );
        }
        // Stroke coordinates belong to the old resolution
        self.stroke = None;
        self.raster = resized;
    }

    /// Drop the raster (overlay torn down)
    pub fn detach_surface(&mut self) {
        self.stroke = None;
        self.raster = None;
    }

    /// Pointer-down at a surface point: places a stamp or starts a stroke
    pub fn pointer_down(&mut self, at: Point) -> bool {
        if self.mode.stamp_kind().is_some() {
            self.place_stamp(at)
        } else {
            self.begin(at)
        }
    }

    /// Start a stroke at `at`; only valid in pen or highlighter mode
    pub fn begin(&mut self, at: Point) -> bool {
        let Some(kind) = self.mode.stroke_kind() else {
            return false;
        };
        let Some(raster) = self.raster.as_ref() else {
            return false;
        };
        let layer = match kind {
            StrokeKind::Pen => None,
            StrokeKind::Highlighter => {
                let Some(coverage) = Pixmap::new(raster.width(), raster.height()) else {
                    log::error!("Could not allocate highlighter coverage layer");
                    return false;
                };
                Some(StrokeLayer {
                    base: raster.clone(),
                    coverage,
                })
            }
        };
        self.stroke = Some(ActiveStroke {
            kind,
            last: at,
            layer,
        });
        true
    }

    /// Draw from the last stroke point to `to`
    ///
    /// Highlighter segments go into the stroke's coverage layer, so the whole
    /// stroke keeps a single translucency however often it overlaps itself.
    pub fn extend(&mut self, to: Point) -> bool {
        let (Some(stroke), Some(raster)) = (self.stroke.as_mut(), self.raster.as_mut()) else {
            return false;
        };
        let (style, blend) = stroke_paint(&self.style, stroke.kind);
        match stroke.layer.as_mut() {
            Some(layer) => {
                render::image::cover_segment(&mut layer.coverage, stroke.last, to, style.width);
                render::image::tint_coverage(raster, &layer.base, &layer.coverage, style.color, blend);
            }
            None => render::image::stroke_segment(raster, stroke.last, to, style, blend),
        }
        stroke.last = to;
        true
    }

    /// Finish the active stroke; no-op without one
    pub fn end(&mut self) -> bool {
        self.stroke.take().is_some()
    }

    /// Paint the selected stamp at `at` and leave stamp mode
    pub fn place_stamp(&mut self, at: Point) -> bool {
        let Some(kind) = self.mode.stamp_kind() else {
            return false;
        };
        let Some(raster) = self.raster.as_mut() else {
            return false;
        };
        let color = match kind {
            StampKind::Check => self.style.check_color,
            StampKind::Cross => self.style.cross_color,
        };
        render::image::draw_stamp(raster, kind, at, color, self.style.stamp_size);
        log::debug!("Placed {} stamp at ({:.1}, {:.1})", kind.glyph(), at.x, at.y);
        self.mode = ToolMode::None;
        true
    }

    /// Wipe every annotation; tool mode is left as is
    pub fn clear(&mut self) {
        if let Some(raster) = self.raster.as_mut() {
            render::image::clear(raster);
        }
        self.stroke = None;
    }

    /// Whether the raster holds no annotations (also true with no surface)
    pub fn is_blank(&self) -> bool {
        self.raster.as_ref().is_none_or(render::image::is_blank)
    }

    /// The raster as a PNG blob, `None` with no surface
    pub fn export_png(&self) -> anyhow::Result<Option<Vec<u8>>> {
        self.raster
            .as_ref()
            .map(render::image::encode_png)
            .transpose()
    }
}

fn stroke_paint(style: &AnnotationStyle, kind: StrokeKind) -> (&StrokeStyle, BlendMode) {
    match kind {
        StrokeKind::Pen => (&style.pen, BlendMode::SourceOver),
        StrokeKind::Highlighter => (&style.highlighter, BlendMode::Multiply),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> AnnotationEngine {
        let mut engine = AnnotationEngine::new(AnnotationStyle::default());
        engine.resize_backing(BackingSize::new(400, 300).unwrap());
        engine
    }

    fn alpha_at(engine: &AnnotationEngine, x: u32, y: u32) -> u8 {
        engine.raster().unwrap().pixel(x, y).unwrap().alpha()
    }

    #[test]
    fn test_pen_stroke_is_connected() {
        let mut engine = engine();
        engine.set_mode(ToolMode::Pen);
        assert!(engine.begin(Point::new(10.0, 10.0)));
        for step in [20.0, 30.0, 40.0, 50.0] {
            assert!(engine.extend(Point::new(step, step)));
        }
        assert!(engine.end());

        for t in [10, 15, 22, 27, 33, 38, 44, 50] {
            assert!(alpha_at(&engine, t, t) > 200, "gap at ({t}, {t})");
        }
        assert_eq!(alpha_at(&engine, 60, 10), 0);
        assert_eq!(engine.mode(), ToolMode::Pen);
    }

    #[test]
    fn test_highlighter_is_translucent_and_wide() {
        let mut engine = engine();
        engine.set_mode(ToolMode::Highlighter);
        engine.begin(Point::new(50.0, 100.0));
        engine.extend(Point::new(250.0, 100.0));
        engine.end();

        let center = alpha_at(&engine, 150, 100);
        assert!(center > 0 && center < 255);
        // 30px wide marker reaches well past a 4px pen
        assert!(alpha_at(&engine, 150, 112) > 0);
    }

    #[test]
    fn test_dense_highlighter_stroke_stays_translucent() {
        let mut engine = engine();
        engine.set_mode(ToolMode::Highlighter);
        engine.begin(Point::new(10.0, 50.0));
        let mut x = 12.0;
        while x <= 290.0 {
            engine.extend(Point::new(x, 50.0));
            x += 2.0;
        }
        engine.end();

        // 0.4 alpha, however many round caps overlap here
        let mid = alpha_at(&engine, 150, 50);
        assert!((99..=105).contains(&mid), "alpha {mid}");
        let joint = alpha_at(&engine, 60, 50);
        assert!((99..=105).contains(&joint), "alpha {joint}");
    }

    #[test]
    fn test_highlighter_multiplies_over_ink() {
        let mut engine = engine();
        engine.set_mode(ToolMode::Pen);
        engine.begin(Point::new(50.0, 100.5));
        engine.extend(Point::new(250.0, 100.5));
        engine.end();

        engine.set_mode(ToolMode::Highlighter);
        engine.begin(Point::new(100.0, 100.0));
        engine.extend(Point::new(200.0, 100.0));
        engine.end();

        // Red ink under yellow marker stays red instead of turning orange
        let c = engine.raster().unwrap().pixel(150, 100).unwrap().demultiply();
        assert_eq!(c.alpha(), 255);
        assert!(c.red() >= 235, "red {}", c.red());
        assert!((62..=74).contains(&c.green()), "green {}", c.green());
        assert!((36..=46).contains(&c.blue()), "blue {}", c.blue());
    }

    #[test]
    fn test_aborted_highlighter_keeps_painted_part() {
        let mut engine = engine();
        engine.set_mode(ToolMode::Highlighter);
        engine.begin(Point::new(20.0, 200.0));
        engine.extend(Point::new(120.0, 200.0));
        engine.set_mode(ToolMode::Pen);
        assert!(!engine.is_drawing());
        assert!(alpha_at(&engine, 70, 200) > 0);
        assert_eq!(alpha_at(&engine, 200, 200), 0);
    }

    #[test]
    fn test_stamp_is_single_shot() {
        let mut engine = engine();
        engine.set_mode(ToolMode::CheckStamp);
        assert!(engine.pointer_down(Point::new(100.0, 100.0)));
        assert_eq!(engine.mode(), ToolMode::None);
        assert!(!engine.is_blank());

        let after_first = engine.raster().unwrap().data().to_vec();
        assert!(!engine.pointer_down(Point::new(300.0, 200.0)));
        assert_eq!(engine.raster().unwrap().data(), &after_first[..]);
        assert!(!engine.is_drawing());
    }

    #[test]
    fn test_stamp_ignores_moves() {
        let mut engine = engine();
        engine.set_mode(ToolMode::CrossStamp);
        engine.pointer_down(Point::new(100.0, 100.0));
        let snapshot = engine.raster().unwrap().data().to_vec();
        assert!(!engine.extend(Point::new(200.0, 200.0)));
        assert!(!engine.end());
        assert_eq!(engine.raster().unwrap().data(), &snapshot[..]);
    }

    #[test]
    fn test_clear_keeps_mode() {
        let mut engine = engine();
        engine.set_mode(ToolMode::Pen);
        engine.begin(Point::new(0.0, 0.0));
        engine.extend(Point::new(100.0, 100.0));
        engine.end();
        engine.set_mode(ToolMode::CheckStamp);
        engine.pointer_down(Point::new(200.0, 150.0));
        engine.set_mode(ToolMode::Highlighter);
        engine.begin(Point::new(10.0, 200.0));
        engine.extend(Point::new(300.0, 200.0));

        engine.clear();
        assert!(engine.is_blank());
        assert!(!engine.is_drawing());
        assert_eq!(engine.mode(), ToolMode::Highlighter);
    }

    #[test]
    fn test_mode_switch_aborts_stroke() {
        let mut engine = engine();
        engine.set_mode(ToolMode::Pen);
        engine.begin(Point::new(10.0, 10.0));
        engine.extend(Point::new(50.0, 10.0));
        engine.set_mode(ToolMode::Highlighter);
        assert!(!engine.is_drawing());
        assert!(!engine.extend(Point::new(50.0, 80.0)));
        assert_eq!(alpha_at(&engine, 50, 50), 0);
        assert!(alpha_at(&engine, 30, 10) > 200);
    }

    #[test]
    fn test_end_without_begin_is_noop() {
        let mut engine = engine();
        assert!(!engine.end());
        engine.set_mode(ToolMode::None);
        assert!(!engine.pointer_down(Point::new(5.0, 5.0)));
        assert!(engine.is_blank());
    }

    #[test]
    fn test_no_surface_means_noop() {
        let mut engine = AnnotationEngine::new(AnnotationStyle::default());
        engine.set_mode(ToolMode::Pen);
        assert!(!engine.begin(Point::new(1.0, 1.0)));
        assert!(!engine.extend(Point::new(2.0, 2.0)));
        engine.set_mode(ToolMode::CheckStamp);
        assert!(!engine.place_stamp(Point::new(1.0, 1.0)));
        // Failed stamp does not consume the mode
        assert_eq!(engine.mode(), ToolMode::CheckStamp);
        engine.clear();
        assert!(engine.is_blank());
        assert!(engine.export_png().unwrap().is_none());
    }

    #[test]
    fn test_resize_preserves_annotations() {
        let mut engine = engine();
        engine.set_mode(ToolMode::Pen);
        engine.begin(Point::new(0.0, 150.0));
        engine.extend(Point::new(400.0, 150.0));
        engine.end();
        let before = engine.raster().unwrap().data().to_vec();

        engine.resize_backing(BackingSize::new(400, 300).unwrap());
        assert_eq!(engine.raster().unwrap().data(), &before[..]);

        engine.resize_backing(BackingSize::new(800, 600).unwrap());
        assert_eq!(engine.raster().unwrap().width(), 800);
        assert!(alpha_at(&engine, 400, 300) > 0);
        assert!(!engine.is_blank());
    }
}
