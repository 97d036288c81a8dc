//! Drawing targets
//!
//! [`Canvas2d`] is the minimal immediate-mode surface a frame is replayed
//! onto. [`PixmapCanvas`] rasterizes with tiny-skia.

use std::path::Path;

use glam::DVec2;
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Stroke, Transform};
use tracing::info;

use crate::color::Rgba;
use crate::{RenderError, Result};

/// A 2D drawing context with a fixed pixel size
pub trait Canvas2d {
    /// Width in pixels
    fn width(&self) -> u32;

    /// Height in pixels
    fn height(&self) -> u32;

    /// Fill the whole canvas
    fn clear(&mut self, color: Rgba);

    /// Stroke a straight line
    fn stroke_line(&mut self, from: DVec2, to: DVec2, color: Rgba, width: f32);

    /// Fill a closed polygon
    fn fill_polygon(&mut self, points: &[DVec2], color: Rgba);

    /// Stroke a closed polygon
    fn stroke_polygon(&mut self, points: &[DVec2], color: Rgba, width: f32);

    /// Fill and stroke a circle
    fn draw_circle(&mut self, center: DVec2, radius: f64, fill: Rgba, stroke: Rgba, stroke_width: f32);

    /// Draw centered text. Targets without text support ignore it.
    fn fill_text(&mut self, _position: DVec2, _text: &str, _color: Rgba) {}
}

/// tiny-skia raster canvas
pub struct PixmapCanvas {
    pixmap: Pixmap,
}

impl PixmapCanvas {
    /// Allocate a transparent canvas
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap =
            Pixmap::new(width, height).ok_or(RenderError::CanvasAllocation { width, height })?;
        Ok(Self { pixmap })
    }

    /// Underlying pixmap
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Straight-alpha RGBA of one pixel
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    /// Encode as PNG
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| RenderError::Snapshot(e.to_string()))
    }

    /// Write a PNG snapshot
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.pixmap
            .save_png(path)
            .map_err(|e| RenderError::Snapshot(e.to_string()))?;
        info!("Saved snapshot to {:?}", path);
        Ok(())
    }
}

fn paint(color: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(Color::from_rgba8(color.r, color.g, color.b, color.alpha_u8()));
    paint.anti_alias = true;
    paint
}

fn closed_path(points: &[DVec2]) -> Option<tiny_skia::Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x as f32, first.y as f32);
    for p in rest {
        pb.line_to(p.x as f32, p.y as f32);
    }
    pb.close();
    pb.finish()
}

impl Canvas2d for PixmapCanvas {
    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn clear(&mut self, color: Rgba) {
        self.pixmap
            .fill(Color::from_rgba8(color.r, color.g, color.b, color.alpha_u8()));
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, color: Rgba, width: f32) {
        let mut pb = PathBuilder::new();
        pb.move_to(from.x as f32, from.y as f32);
        pb.line_to(to.x as f32, to.y as f32);
        if let Some(path) = pb.finish() {
            let stroke = Stroke {
                width,
                ..Stroke::default()
            };
            self.pixmap
                .stroke_path(&path, &paint(color), &stroke, Transform::identity(), None);
        }
    }

    fn fill_polygon(&mut self, points: &[DVec2], color: Rgba) {
        if let Some(path) = closed_path(points) {
            self.pixmap.fill_path(
                &path,
                &paint(color),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }

    fn stroke_polygon(&mut self, points: &[DVec2], color: Rgba, width: f32) {
        if let Some(path) = closed_path(points) {
            let stroke = Stroke {
                width,
                ..Stroke::default()
            };
            self.pixmap
                .stroke_path(&path, &paint(color), &stroke, Transform::identity(), None);
        }
    }

    fn draw_circle(&mut self, center: DVec2, radius: f64, fill: Rgba, stroke: Rgba, stroke_width: f32) {
        let Some(path) = PathBuilder::from_circle(center.x as f32, center.y as f32, radius as f32)
        else {
            return;
        };
        self.pixmap.fill_path(
            &path,
            &paint(fill),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
        let outline = Stroke {
            width: stroke_width,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &paint(stroke), &outline, Transform::identity(), None);
    }
}
