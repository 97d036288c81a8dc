//! Frame outputs
//!
//! A frame output receives every frame the editor builds. Outputs that only
//! care about some frames are free to drop the rest.

use tracing::trace;

use crate::canvas::{Canvas2d, PixmapCanvas};
use crate::mesh_renderer::Frame;
use crate::Result;

/// Consumer of built frames
pub trait FrameOutput {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Deliver one frame
    fn present(&mut self, frame: &Frame) -> Result<()>;
}

/// Discards every frame
#[derive(Debug, Default, Clone, Copy)]
pub struct NullOutput;

impl FrameOutput for NullOutput {
    fn name(&self) -> &str {
        "null"
    }

    fn present(&mut self, _frame: &Frame) -> Result<()> {
        Ok(())
    }
}

/// Rasterizes each frame into a tiny-skia canvas of the frame's size
pub struct RasterOutput {
    canvas: Option<PixmapCanvas>,
    presented: u64,
}

impl Default for RasterOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterOutput {
    /// Output without a canvas; one is allocated on the first frame
    pub fn new() -> Self {
        Self {
            canvas: None,
            presented: 0,
        }
    }

    /// Most recently rasterized frame
    pub fn canvas(&self) -> Option<&PixmapCanvas> {
        self.canvas.as_ref()
    }

    /// Number of frames rasterized
    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl FrameOutput for RasterOutput {
    fn name(&self) -> &str {
        "raster"
    }

    fn present(&mut self, frame: &Frame) -> Result<()> {
        let canvas = match self.canvas.take() {
            Some(c) if c.width() == frame.width() && c.height() == frame.height() => c,
            _ => PixmapCanvas::new(frame.width(), frame.height())?,
        };
        let canvas = self.canvas.insert(canvas);
        frame.replay(canvas);
        self.presented += 1;
        trace!("Rasterized frame {}", self.presented);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh_renderer::{MeshRenderer, BACKGROUND_COLOR};
    use dfifty_core::{CoordinateMapper, Project};

    #[test]
    fn test_raster_output_paints_background() {
        let project = Project::new();
        let mapper = CoordinateMapper::new(64, 48).unwrap();
        let frame = MeshRenderer::new()
            .with_grid(false)
            .build_frame(&project, &mapper, None);

        let mut output = RasterOutput::new();
        output.present(&frame).unwrap();
        output.present(&frame).unwrap();
        assert_eq!(output.presented(), 2);

        let canvas = output.canvas().unwrap();
        assert_eq!((canvas.width(), canvas.height()), (64, 48));
        assert_eq!(
            canvas.pixel(3, 3),
            Some([BACKGROUND_COLOR.r, BACKGROUND_COLOR.g, BACKGROUND_COLOR.b, 255])
        );
    }

    #[test]
    fn test_null_output_accepts_anything() {
        let project = Project::with_defaults();
        let mapper = CoordinateMapper::new(10, 10).unwrap();
        let frame = MeshRenderer::new().build_frame(&project, &mapper, None);
        assert!(NullOutput.present(&frame).is_ok());
    }
}
