//! DFifty Render - Frame Building and Rasterization
//!
//! This crate turns a project into pictures:
//! - Mesh triangulation into a per-frame display list
//! - The `Canvas2d` drawing target and a tiny-skia raster implementation
//! - Frame pacing with an explicit start/stop lifecycle
//! - Frame output sinks

use thiserror::Error;

pub mod canvas;
pub mod color;
pub mod mesh_renderer;
pub mod output;
pub mod scheduler;

pub use canvas::{Canvas2d, PixmapCanvas};
pub use color::Rgba;
pub use mesh_renderer::{DrawCommand, Frame, MeshRenderer};
pub use output::{FrameOutput, NullOutput, RasterOutput};
pub use scheduler::{RenderScheduler, StopHandle};

/// Rendering errors
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Canvas allocation failed for {width}x{height}")]
    CanvasAllocation { width: u32, height: u32 },

    #[error("Snapshot failed: {0}")]
    Snapshot(String),
}

/// Result type for rendering operations
pub type Result<T> = std::result::Result<T, RenderError>;
