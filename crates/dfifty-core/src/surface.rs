//! Surface - a mapped region defined by an editable grid of control points
//!
//! Presentation attributes are public. The point grid is only reachable
//! read-only from outside the crate; single-point writes go through
//! [`MutationGuard`](crate::MutationGuard) and wholesale replacement through
//! [`Project`](crate::Project).

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::grid::{GridShape, MeshPoint, DEFAULT_MESH_DETAIL};

/// Default fill color of new surfaces
pub const DEFAULT_SURFACE_COLOR: &str = "#00ffc6";

/// Unique identifier for a Surface
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurfaceId(String);

impl SurfaceId {
    /// Generate a fresh random id of the form `s_xxxxxxxxxx`
    pub fn generate() -> Self {
        Self(format!("s_{}", short_token()))
    }

    /// Borrow the id as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SurfaceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SurfaceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// First ten hex digits of a v4 uuid
pub(crate) fn short_token() -> String {
    let mut token = Uuid::new_v4().simple().to_string();
    token.truncate(10);
    token
}

fn default_mesh_detail() -> u32 {
    DEFAULT_MESH_DETAIL
}

fn default_color() -> String {
    DEFAULT_SURFACE_COLOR.to_string()
}

fn default_opacity() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

/// Surface - a quadrilateral mesh of control points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Surface {
    id: SurfaceId,

    /// Display label
    #[serde(default)]
    pub name: String,

    /// Requested point count the grid shape was resolved from
    #[serde(default = "default_mesh_detail")]
    mesh_detail: u32,

    #[serde(default)]
    mesh_rows: usize,

    #[serde(default)]
    mesh_cols: usize,

    /// Row-major control points in world space
    #[serde(default)]
    points: Vec<MeshPoint>,

    /// Fill color as a CSS hex string
    #[serde(default = "default_color")]
    pub color: String,

    /// Fill opacity (0.0 = transparent, 1.0 = opaque)
    #[serde(default = "default_opacity")]
    pub opacity: f64,

    /// Hidden surfaces are neither drawn nor pickable
    #[serde(default = "default_true")]
    pub visible: bool,

    /// Persisted lock; blocks point writes like a freeze
    #[serde(default)]
    pub locked: bool,
}

impl Surface {
    /// Create a surface from an already generated grid
    pub(crate) fn new(
        id: SurfaceId,
        name: impl Into<String>,
        mesh_detail: u32,
        shape: GridShape,
        points: Vec<MeshPoint>,
    ) -> Self {
        debug_assert_eq!(shape.point_count(), points.len());
        Self {
            id,
            name: name.into(),
            mesh_detail,
            mesh_rows: shape.rows(),
            mesh_cols: shape.cols(),
            points,
            color: default_color(),
            opacity: default_opacity(),
            visible: true,
            locked: false,
        }
    }

    /// Unique id
    pub fn id(&self) -> &SurfaceId {
        &self.id
    }

    /// Requested mesh detail
    pub fn mesh_detail(&self) -> u32 {
        self.mesh_detail
    }

    /// Stored row count
    pub fn mesh_rows(&self) -> usize {
        self.mesh_rows
    }

    /// Stored column count
    pub fn mesh_cols(&self) -> usize {
        self.mesh_cols
    }

    /// Stored grid shape, if it describes a valid grid
    pub fn shape(&self) -> Option<GridShape> {
        GridShape::new(self.mesh_rows, self.mesh_cols).ok()
    }

    /// Control points, row-major
    pub fn points(&self) -> &[MeshPoint] {
        &self.points
    }

    /// Single control point
    pub fn point(&self, index: usize) -> Option<MeshPoint> {
        self.points.get(index).copied()
    }

    /// Whether the stored shape matches the point count
    pub fn is_consistent(&self) -> bool {
        self.mesh_rows.checked_mul(self.mesh_cols) == Some(self.points.len())
    }

    pub(crate) fn set_id(&mut self, id: SurfaceId) {
        self.id = id;
    }

    /// Unguarded write of one point. Returns false for an out-of-range index.
    pub(crate) fn write_point(&mut self, index: usize, value: MeshPoint) -> bool {
        match self.points.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Replace the whole grid at once
    pub(crate) fn replace_mesh(&mut self, mesh_detail: u32, shape: GridShape, points: Vec<MeshPoint>) {
        debug_assert_eq!(shape.point_count(), points.len());
        self.mesh_detail = mesh_detail;
        self.mesh_rows = shape.rows();
        self.mesh_cols = shape.cols();
        self.points = points;
    }

    /// Shift every point by the same amount
    pub(crate) fn translate(&mut self, dx: f64, dy: f64) {
        for p in &mut self.points {
            *p = p.offset(dx, dy);
        }
    }

    /// Repair a grid shape that does not describe the stored points.
    ///
    /// Imported surfaces may omit `meshRows`/`meshCols`; in that case the
    /// shape is inferred from the point count.
    pub(crate) fn normalize_shape(&mut self) {
        if self.is_consistent() && self.shape().is_some() {
            return;
        }
        if self.points.is_empty() {
            return;
        }
        let inferred = GridShape::for_point_count(self.points.len());
        warn!(
            "Surface {} has grid {}x{} for {} points, using {}x{}",
            self.id,
            self.mesh_rows,
            self.mesh_cols,
            self.points.len(),
            inferred.rows(),
            inferred.cols()
        );
        self.mesh_rows = inferred.rows();
        self.mesh_cols = inferred.cols();
    }
}
