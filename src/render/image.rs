//! Raster rendering for annotations using tiny-skia
//!
//! The overlay surface is a premultiplied RGBA `Pixmap`. These functions paint
//! stroke segments and stamps into it, and convert it to `RgbaImage` for export.

use std::io::Cursor;

use anyhow::Context;
use image::{ImageFormat, RgbaImage};
use tiny_skia::{
    BlendMode, Color, ColorU8, FilterQuality, IntSize, LineCap, LineJoin, Mask, MaskType, Paint,
    PathBuilder, Pixmap, PixmapPaint, Rect, Stroke, Transform,
};

use super::geometry;
use crate::config::{InkColor, StrokeStyle};
use crate::domain::{BackingSize, Point, StampKind};

/// Allocate a transparent surface of the given backing size
pub fn new_surface(size: BackingSize) -> Option<Pixmap> {
    Pixmap::new(size.width(), size.height())
}

fn ink_paint(color: InkColor, blend_mode: BlendMode) -> Paint<'static> {
    let [r, g, b, a] = color.to_rgba_u8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint.blend_mode = blend_mode;
    paint
}

fn round_stroke(width: f32) -> Stroke {
    Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    }
}

/// Draw one straight segment of a freehand stroke
///
/// Zero-length segments are skipped; a stroke only becomes visible once the
/// pointer has moved.
pub fn stroke_segment(
    pixmap: &mut Pixmap,
    from: Point,
    to: Point,
    style: &StrokeStyle,
    blend_mode: BlendMode,
) {
    if from.distance(to) <= f32::EPSILON {
        return;
    }

    let mut pb = PathBuilder::new();
    pb.move_to(from.x, from.y);
    pb.line_to(to.x, to.y);
    let Some(path) = pb.finish() else {
        return;
    };

    let paint = ink_paint(style.color, blend_mode);
    pixmap.stroke_path(
        &path,
        &paint,
        &round_stroke(style.width),
        Transform::identity(),
        None,
    );
}

/// Add one segment to a stroke's coverage layer
///
/// Coverage is painted opaque so overlapping segments saturate instead of
/// accumulating.
pub fn cover_segment(coverage: &mut Pixmap, from: Point, to: Point, width: f32) {
    let style = StrokeStyle {
        color: InkColor::from_rgb8(255, 255, 255),
        width,
    };
    stroke_segment(coverage, from, to, &style, BlendMode::SourceOver);
}

/// Repaint `target` as `base` with `coverage` tinted in `color` on top
pub fn tint_coverage(
    target: &mut Pixmap,
    base: &Pixmap,
    coverage: &Pixmap,
    color: InkColor,
    blend_mode: BlendMode,
) {
    if target.data().len() != base.data().len() || base.data().len() != coverage.data().len() {
        log::warn!("Coverage layer does not match the surface; skipping repaint");
        return;
    }
    let Some(rect) = Rect::from_xywh(0.0, 0.0, target.width() as f32, target.height() as f32)
    else {
        return;
    };
    target.data_mut().copy_from_slice(base.data());
    let mask = Mask::from_pixmap(coverage.as_ref(), MaskType::Alpha);
    target.fill_rect(
        rect,
        &ink_paint(color, blend_mode),
        Transform::identity(),
        Some(&mask),
    );
}

/// Draw a check or cross glyph centered on `center`
pub fn draw_stamp(pixmap: &mut Pixmap, kind: StampKind, center: Point, color: InkColor, size: f32) {
    let mut pb = PathBuilder::new();
    for line in geometry::stamp_polylines(kind, center, size) {
        let mut points = line.into_iter();
        let Some(first) = points.next() else {
            continue;
        };
        pb.move_to(first.x, first.y);
        for p in points {
            pb.line_to(p.x, p.y);
        }
    }
    let Some(path) = pb.finish() else {
        return;
    };

    // Stamps always use normal compositing
    let paint = ink_paint(color, BlendMode::SourceOver);
    pixmap.stroke_path(
        &path,
        &paint,
        &round_stroke(geometry::stamp_thickness(size)),
        Transform::identity(),
        None,
    );
}

/// Wipe the entire surface back to transparent
pub fn clear(pixmap: &mut Pixmap) {
    pixmap.fill(Color::TRANSPARENT);
}

/// Whether every pixel of the surface is fully transparent
pub fn is_blank(pixmap: &Pixmap) -> bool {
    pixmap.pixels().iter().all(|p| p.alpha() == 0)
}

/// Resample the surface contents into a new buffer of `size`
pub fn resample(pixmap: &Pixmap, size: BackingSize) -> Option<Pixmap> {
    let mut target = new_surface(size)?;
    let sx = size.width() as f32 / pixmap.width() as f32;
    let sy = size.height() as f32 / pixmap.height() as f32;
    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..Default::default()
    };
    target.draw_pixmap(
        0,
        0,
        pixmap.as_ref(),
        &paint,
        Transform::from_scale(sx, sy),
        None,
    );
    Some(target)
}

/// Convert a premultiplied surface to a straight-alpha image
pub fn to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut data = Vec::with_capacity(pixmap.data().len());
    for p in pixmap.pixels() {
        let c = p.demultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    RgbaImage::from_raw(pixmap.width(), pixmap.height(), data)
        .unwrap_or_else(|| RgbaImage::new(pixmap.width(), pixmap.height()))
}

/// Encode the surface as a PNG blob
pub fn encode_png(pixmap: &Pixmap) -> anyhow::Result<Vec<u8>> {
    let img = to_rgba_image(pixmap);
    let mut bytes = Cursor::new(Vec::new());
    img.write_to(&mut bytes, ImageFormat::Png)
        .context("encoding annotation raster")?;
    Ok(bytes.into_inner())
}

/// Convert RgbaImage to Pixmap, apply drawing function, and copy back
fn with_pixmap(img: &mut RgbaImage, f: impl FnOnce(&mut Pixmap)) {
    let (w, h) = (img.width(), img.height());
    let Some(size) = IntSize::from_wh(w, h) else {
        return;
    };
    let Some(mut pixmap) = Pixmap::new(size.width(), size.height()) else {
        return;
    };
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(img.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }

    f(&mut pixmap);

    // Copy back
    *img = to_rgba_image(&pixmap);
}

/// Composite the annotation surface over a sheet image, stretched to fit
pub fn composite_onto(img: &mut RgbaImage, overlay: &Pixmap) {
    let sx = img.width() as f32 / overlay.width() as f32;
    let sy = img.height() as f32 / overlay.height() as f32;
    with_pixmap(img, |pixmap| {
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..Default::default()
        };
        pixmap.draw_pixmap(
            0,
            0,
            overlay.as_ref(),
            &paint,
            Transform::from_scale(sx, sy),
            None,
        );
    });
}
