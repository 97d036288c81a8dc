//! Projector Management - assigning surfaces to physical outputs
//!
//! A projector is a named output with a native resolution and a list of
//! surfaces it shows. Assignments reference surfaces by id only.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::surface::{short_token, Surface, SurfaceId};

/// Unique identifier for a projector
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectorId(String);

impl ProjectorId {
    /// Generate a fresh random id of the form `p_xxxxxxxxxx`
    pub fn generate() -> Self {
        Self(format!("p_{}", short_token()))
    }

    /// Borrow the id as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProjectorId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for ProjectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A physical output device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projector {
    /// Unique id
    pub id: ProjectorId,
    /// Display label
    pub name: String,
    /// Native width in pixels
    pub width: u32,
    /// Native height in pixels
    pub height: u32,
    /// Surfaces shown on this projector, in assignment order
    pub assigned: Vec<SurfaceId>,
}

/// Options for [`ProjectorManager::add`]
#[derive(Debug, Clone, Default)]
pub struct ProjectorOptions {
    /// Display label, defaults to "Projector"
    pub name: Option<String>,
    /// Native width, defaults to 1920
    pub width: Option<u32>,
    /// Native height, defaults to 1080
    pub height: Option<u32>,
}

/// A projector together with the surfaces assigned to it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectorExport {
    /// The projector itself
    pub projector: Projector,
    /// Assigned surfaces that still exist, in assignment order
    pub surfaces: Vec<Surface>,
}

/// Manages all projectors of a project
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectorManager {
    projectors: Vec<Projector>,
}

impl ProjectorManager {
    /// Create an empty projector manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a projector. Missing options default to "Projector" at 1920x1080.
    pub fn add(&mut self, options: ProjectorOptions) -> &Projector {
        let projector = Projector {
            id: ProjectorId::generate(),
            name: options.name.unwrap_or_else(|| "Projector".to_string()),
            width: options.width.filter(|w| *w > 0).unwrap_or(1920),
            height: options.height.filter(|h| *h > 0).unwrap_or(1080),
            assigned: Vec::new(),
        };
        info!(
            "Added projector {} ({}x{})",
            projector.name, projector.width, projector.height
        );
        let index = self.projectors.len();
        self.projectors.push(projector);
        &self.projectors[index]
    }

    /// Remove a projector
    pub fn remove(&mut self, id: &ProjectorId) -> Option<Projector> {
        self.projectors
            .iter()
            .position(|p| &p.id == id)
            .map(|index| self.projectors.remove(index))
    }

    /// Get a projector by id
    pub fn get(&self, id: &ProjectorId) -> Option<&Projector> {
        self.projectors.iter().find(|p| &p.id == id)
    }

    /// All projectors
    pub fn projectors(&self) -> &[Projector] {
        &self.projectors
    }

    /// Assign a surface to a projector. Unknown projectors and repeated
    /// assignments are ignored.
    pub fn assign_surface(&mut self, projector: &ProjectorId, surface: &SurfaceId) -> bool {
        let Some(p) = self.projectors.iter_mut().find(|p| &p.id == projector) else {
            return false;
        };
        if p.assigned.contains(surface) {
            return false;
        }
        p.assigned.push(surface.clone());
        true
    }

    /// Remove a surface from every projector
    pub fn unassign_everywhere(&mut self, surface: &SurfaceId) {
        for p in &mut self.projectors {
            p.assigned.retain(|id| id != surface);
        }
    }

    /// Resolve a projector's assignments against the given surfaces,
    /// skipping ids that no longer exist.
    pub fn export(&self, id: &ProjectorId, surfaces: &[Surface]) -> Option<ProjectorExport> {
        let projector = self.get(id)?;
        let surfaces = projector
            .assigned
            .iter()
            .filter_map(|sid| surfaces.iter().find(|s| s.id() == sid).cloned())
            .collect();
        Some(ProjectorExport {
            projector: projector.clone(),
            surfaces,
        })
    }
}
