//! Grid topology, mesh generation and bounds
//!
//! Surfaces are rectangular grids of control points stored row-major.
//! A requested "mesh detail" (point count) resolves to a grid shape, and a
//! shape spread over a bounding box yields the initial point set.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::{CoreError, Result};

/// Mesh detail used when none (or zero) is requested
pub const DEFAULT_MESH_DETAIL: u32 = 4;

/// Mesh details with a fixed, hand-picked grid shape
pub const CANONICAL_DETAILS: [u32; 4] = [4, 8, 16, 32];

/// Width/height substituted for an empty or collapsed bounding box axis
const FALLBACK_EXTENT: f64 = 0.4;

/// A control point in world space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MeshPoint {
    /// Horizontal position, 0.0 is the canvas center
    pub x: f64,
    /// Vertical position, 0.0 is the canvas center
    pub y: f64,
}

impl MeshPoint {
    /// Create a new point
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Return this point moved by the given amounts
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// View as a glam vector
    pub fn to_dvec2(self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }
}

impl From<DVec2> for MeshPoint {
    fn from(v: DVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

/// Shape of a surface grid. Both axes always have at least two points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridShape {
    rows: usize,
    cols: usize,
}

impl GridShape {
    /// Create a shape, rejecting grids with fewer than two rows or columns.
    ///
    /// A single row or column would divide by zero when the points are
    /// spread over a bounding box. Shapes whose point count does not fit in
    /// `usize` are rejected as well.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows < 2 || cols < 2 {
            return Err(CoreError::InvalidGeometry(format!(
                "grid needs at least 2x2 points, got {}x{}",
                rows, cols
            )));
        }
        if rows.checked_mul(cols).is_none() {
            return Err(CoreError::InvalidGeometry(format!(
                "grid {}x{} has too many points",
                rows, cols
            )));
        }
        Ok(Self { rows, cols })
    }

    /// Resolve a requested mesh detail to a grid shape.
    ///
    /// 4, 8, 16 and 32 map to 2x2, 2x4, 4x4 and 4x8. Any other detail gets a
    /// square-ish fallback that does not necessarily contain exactly `detail`
    /// points. Rows are clamped to two so the result is always a valid grid.
    pub fn for_detail(detail: u32) -> Self {
        let detail = if detail == 0 {
            DEFAULT_MESH_DETAIL
        } else {
            detail
        };

        let (rows, cols) = match detail {
            4 => (2, 2),
            8 => (2, 4),
            16 => (4, 4),
            32 => (4, 8),
            n => {
                let n = n as f64;
                let root = round_half_up(n.sqrt());
                let cols = round_half_up(n / root).max(2.0);
                ((root as usize).max(2), cols as usize)
            }
        };

        Self { rows, cols }
    }

    /// Infer a shape for a point set whose stored shape is missing or stale
    pub fn for_point_count(count: usize) -> Self {
        Self::for_detail(u32::try_from(count).unwrap_or(u32::MAX))
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of points in the grid
    pub fn point_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Row-major index of the point at (row, col)
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }
}

/// Axis-aligned box in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Left edge
    pub left: f64,
    /// Top edge
    pub top: f64,
    /// Horizontal extent
    pub width: f64,
    /// Vertical extent
    pub height: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            left: -0.2,
            top: -0.2,
            width: FALLBACK_EXTENT,
            height: FALLBACK_EXTENT,
        }
    }
}

impl Bounds {
    /// Create a new box
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Box of the given size centered on the origin, then shifted by the offset
    pub fn centered(width: f64, height: f64, offset_x: f64, offset_y: f64) -> Self {
        Self::new(-width / 2.0 + offset_x, -height / 2.0 + offset_y, width, height)
    }

    /// Bounding box of a point set.
    ///
    /// An empty set yields the default box. A collapsed axis (all points on
    /// one line) gets the fallback extent instead of zero.
    pub fn from_points(points: &[MeshPoint]) -> Self {
        let Some(first) = points.first() else {
            return Self::default();
        };

        let (mut min_x, mut max_x) = (first.x, first.x);
        let (mut min_y, mut max_y) = (first.y, first.y);
        for p in points {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }

        let width = max_x - min_x;
        let height = max_y - min_y;
        Self {
            left: min_x,
            top: min_y,
            width: if width == 0.0 { FALLBACK_EXTENT } else { width },
            height: if height == 0.0 { FALLBACK_EXTENT } else { height },
        }
    }

    /// Right edge
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Spread a grid of points uniformly over a box, row-major.
///
/// Point (r, c) lands at `left + c/(cols-1)*width`, `top + r/(rows-1)*height`,
/// so the four corner points coincide with the box corners.
pub fn generate_grid(shape: GridShape, bounds: Bounds) -> Vec<MeshPoint> {
    let mut points = Vec::with_capacity(shape.point_count());
    let last_col = (shape.cols - 1) as f64;
    let last_row = (shape.rows - 1) as f64;

    for r in 0..shape.rows {
        for c in 0..shape.cols {
            let u = c as f64 / last_col;
            let v = r as f64 / last_row;
            points.push(MeshPoint::new(
                bounds.left + u * bounds.width,
                bounds.top + v * bounds.height,
            ));
        }
    }
    points
}

/// Split every grid cell into two triangles.
///
/// For a cell with corners A=(r,c), B=(r,c+1), C=(r+1,c), D=(r+1,c+1) the
/// triangles are A-B-C and B-D-C. Degenerate shapes yield no triangles.
pub fn cell_triangles(rows: usize, cols: usize) -> Vec<[usize; 3]> {
    let cells = rows.saturating_sub(1) * cols.saturating_sub(1);
    let mut triangles = Vec::with_capacity(cells * 2);

    for r in 0..rows.saturating_sub(1) {
        for c in 0..cols.saturating_sub(1) {
            let a = r * cols + c;
            let b = r * cols + c + 1;
            let cc = (r + 1) * cols + c;
            let d = (r + 1) * cols + c + 1;
            triangles.push([a, b, cc]);
            triangles.push([b, d, cc]);
        }
    }
    triangles
}

/// Indices of the four extreme corners: top-left, top-right, bottom-right,
/// bottom-left. `None` when the point set is too small to have four corners.
pub fn outline_indices(cols: usize, point_count: usize) -> Option<[usize; 4]> {
    if point_count < 4 || cols == 0 || cols > point_count {
        return None;
    }
    let last = point_count - 1;
    Some([0, cols - 1, last, point_count - cols])
}

/// Round to the nearest integer with halves going up (towards +inf)
pub(crate) fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}
