//! Coordinate conversion between world space and canvas pixels
//!
//! World space is normalized and canvas-centered: (0, 0) is the middle of
//! the canvas and the canvas spans -0.5..0.5 on both axes.

use glam::DVec2;

use crate::grid::{round_half_up, MeshPoint};
use crate::{CoreError, Result};

/// Maps between world coordinates and pixels of one canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    width: f64,
    height: f64,
}

impl CoordinateMapper {
    /// Create a mapper for a canvas of the given pixel size
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidCanvas { width, height });
        }
        Ok(Self {
            width: width as f64,
            height: height as f64,
        })
    }

    /// Canvas width in pixels
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Canvas height in pixels
    pub fn height(&self) -> f64 {
        self.height
    }

    /// World point to whole-pixel screen position
    #[inline]
    pub fn world_to_screen(&self, p: MeshPoint) -> DVec2 {
        DVec2::new(
            round_half_up(self.width * (0.5 + p.x)),
            round_half_up(self.height * (0.5 + p.y)),
        )
    }

    /// Screen position to world point, without rounding
    #[inline]
    pub fn screen_to_world(&self, screen: DVec2) -> MeshPoint {
        MeshPoint::new(screen.x / self.width - 0.5, screen.y / self.height - 0.5)
    }

    /// Round each axis to the nearest multiple of `grid_size`.
    /// A non-positive grid size leaves the point unchanged.
    pub fn apply_snap(p: MeshPoint, grid_size: f64) -> MeshPoint {
        if grid_size.is_nan() || grid_size <= 0.0 {
            return p;
        }
        MeshPoint::new(
            round_half_up(p.x / grid_size) * grid_size,
            round_half_up(p.y / grid_size) * grid_size,
        )
    }
}
