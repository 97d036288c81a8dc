//! DFifty Core - Surface Model and Mapping Engine
//!
//! This crate contains the core domain model for DFifty, including:
//! - Grid topology, mesh generation and bounds
//! - Surfaces and the lock/freeze registry guarding their points
//! - Coordinate mapping between world space and canvas pixels
//! - Hit testing and the pointer drag state machine
//! - The project aggregate and its exchange document
//! - Projector assignments

#![warn(missing_docs)]

pub use glam::DVec2;
use thiserror::Error;

pub mod coords;
pub mod document;
pub mod drag;
pub mod grid;
pub mod guard;
pub mod hit;
pub mod lock;
pub mod logging;
pub mod project;
pub mod projector;
pub mod surface;

// --- Re-exports grouped by category ---

// Geometry & Meshes
pub use grid::{cell_triangles, generate_grid, outline_indices, Bounds, GridShape, MeshPoint};

// Surfaces & mutation guarding
pub use guard::MutationGuard;
pub use lock::LockRegistry;
pub use surface::{Surface, SurfaceId};

// Interaction
pub use coords::CoordinateMapper;
pub use drag::{DragController, DragState, MoveOutcome};
pub use hit::{HitTester, PointHit, PICK_RADIUS};

// Project & exchange
pub use document::{DocumentMeta, ProjectDocument, PROJECT_FORMAT, PROJECT_FORMAT_VERSION};
pub use project::{Project, SurfaceOptions};
pub use projector::{Projector, ProjectorExport, ProjectorId, ProjectorManager, ProjectorOptions};

// Logging
pub use logging::LogConfig;

/// Core error types
#[derive(Error, Debug)]
pub enum CoreError {
    /// Invalid geometry configuration
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Canvas dimensions cannot be used for coordinate mapping
    #[error("Invalid canvas size: {width}x{height}")]
    InvalidCanvas {
        /// Canvas width in pixels
        width: u32,
        /// Canvas height in pixels
        height: u32,
    },

    /// Import payload without a `surfaces` field
    #[error("Project payload has no `surfaces` field")]
    MissingSurfaces,

    /// Import payload that could not be interpreted
    #[error("Invalid project: {0}")]
    InvalidProject(String),

    /// JSON (de)serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
