//! Project - the aggregate root
//!
//! Owns the surface collection (insertion order is z-order), the lock/freeze
//! registry and the projector assignments. Every mutation of surface geometry
//! goes through here or through a [`MutationGuard`] handed out by it.

use tracing::{debug, info, warn};

use crate::document::ProjectDocument;
use crate::grid::{generate_grid, Bounds, GridShape, MeshPoint, DEFAULT_MESH_DETAIL};
use crate::guard::MutationGuard;
use crate::lock::LockRegistry;
use crate::projector::{ProjectorExport, ProjectorId, ProjectorManager};
use crate::surface::{Surface, SurfaceId};
use crate::Result;

/// Default surface width in world units
pub const DEFAULT_SURFACE_WIDTH: f64 = 0.35;
/// Default surface height in world units
pub const DEFAULT_SURFACE_HEIGHT: f64 = 0.25;
/// Offset applied to every point of a duplicated surface
pub const DUPLICATE_OFFSET: f64 = 0.05;

/// Options for [`Project::create_default_surface`]
#[derive(Debug, Clone, Default)]
pub struct SurfaceOptions {
    /// Display label, defaults to `Surface <n>`
    pub name: Option<String>,
    /// Requested point count, defaults to 4
    pub mesh_detail: Option<u32>,
    /// Box width, defaults to 0.35
    pub width: Option<f64>,
    /// Box height, defaults to 0.25
    pub height: Option<f64>,
    /// Horizontal shift of the box center
    pub offset_x: f64,
    /// Vertical shift of the box center
    pub offset_y: f64,
    /// Fill color, defaults to `#00ffc6`
    pub color: Option<String>,
    /// Fill opacity, defaults to 1.0
    pub opacity: Option<f64>,
}

/// Project - the collection of surfaces and everything attached to them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Project {
    surfaces: Vec<Surface>,
    locks: LockRegistry,
    projectors: ProjectorManager,
}

impl Project {
    /// Create an empty project
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a project seeded with the two startup surfaces
    pub fn with_defaults() -> Self {
        let mut project = Self::new();
        project.seed_defaults();
        project
    }

    /// Add the startup surfaces if the project is empty
    pub fn seed_defaults(&mut self) {
        if !self.surfaces.is_empty() {
            return;
        }
        self.create_default_surface(SurfaceOptions {
            name: Some("Surface 1".to_string()),
            mesh_detail: Some(4),
            ..Default::default()
        });
        self.create_default_surface(SurfaceOptions {
            name: Some("Surface 2".to_string()),
            mesh_detail: Some(4),
            offset_x: 0.3,
            ..Default::default()
        });
    }

    // --- Surfaces ---

    /// All surfaces in z-order
    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    /// Get a surface by id
    pub fn surface(&self, id: &SurfaceId) -> Option<&Surface> {
        self.surfaces.iter().find(|s| s.id() == id)
    }

    fn surface_mut(&mut self, id: &SurfaceId) -> Option<&mut Surface> {
        self.surfaces.iter_mut().find(|s| s.id() == id)
    }

    fn allocate_id(&self) -> SurfaceId {
        loop {
            let id = SurfaceId::generate();
            if self.surface(&id).is_none() {
                return id;
            }
        }
    }

    /// Create a surface from a grid spread over a box centered on the origin
    pub fn create_default_surface(&mut self, options: SurfaceOptions) -> &Surface {
        let id = self.allocate_id();
        let mesh_detail = options
            .mesh_detail
            .filter(|d| *d > 0)
            .unwrap_or(DEFAULT_MESH_DETAIL);
        let shape = GridShape::for_detail(mesh_detail);

        let width = positive_or(options.width, DEFAULT_SURFACE_WIDTH);
        let height = positive_or(options.height, DEFAULT_SURFACE_HEIGHT);
        let bounds = Bounds::centered(width, height, options.offset_x, options.offset_y);

        let name = options
            .name
            .unwrap_or_else(|| format!("Surface {}", self.surfaces.len() + 1));
        let mut surface = Surface::new(id, name, mesh_detail, shape, generate_grid(shape, bounds));
        if let Some(color) = options.color {
            surface.color = color;
        }
        if let Some(opacity) = options.opacity {
            surface.opacity = opacity.clamp(0.0, 1.0);
        }

        info!(
            "Created surface {} '{}' ({}x{})",
            surface.id(),
            surface.name,
            shape.rows(),
            shape.cols()
        );
        self.push_surface(surface)
    }

    /// Copy a surface under a new id, shifted by (+0.05, +0.05).
    /// Returns `None` if the id is unknown.
    pub fn duplicate_surface(&mut self, id: &SurfaceId) -> Option<&Surface> {
        let mut copy = self.surface(id)?.clone();
        copy.set_id(self.allocate_id());
        copy.name = format!("{} Copy", copy.name);
        copy.translate(DUPLICATE_OFFSET, DUPLICATE_OFFSET);

        info!("Duplicated surface {} as {}", id, copy.id());
        Some(self.push_surface(copy))
    }

    fn push_surface(&mut self, surface: Surface) -> &Surface {
        let index = self.surfaces.len();
        self.surfaces.push(surface);
        &self.surfaces[index]
    }

    /// Remove a surface along with its lock, freeze and projector entries
    pub fn delete_surface(&mut self, id: &SurfaceId) -> Option<Surface> {
        let index = self.surfaces.iter().position(|s| s.id() == id)?;
        let removed = self.surfaces.remove(index);
        self.locks.forget(id);
        self.projectors.unassign_everywhere(id);
        info!("Deleted surface {} '{}'", id, removed.name);
        Some(removed)
    }

    /// Rebuild a surface's grid at a new detail over its current bounding box.
    ///
    /// All per-point edits are discarded. Returns `None` if the id is unknown.
    /// The replacement is wholesale and ignores freeze/lock, which only
    /// guard single-point writes.
    pub fn set_mesh_detail(&mut self, id: &SurfaceId, mesh_detail: u32) -> Option<&Surface> {
        let surface = self.surface_mut(id)?;
        let mesh_detail = if mesh_detail == 0 {
            DEFAULT_MESH_DETAIL
        } else {
            mesh_detail
        };
        let shape = GridShape::for_detail(mesh_detail);
        let bounds = Bounds::from_points(surface.points());
        surface.replace_mesh(mesh_detail, shape, generate_grid(shape, bounds));

        debug!(
            "Surface {} mesh detail {} -> {}x{}",
            id,
            mesh_detail,
            shape.rows(),
            shape.cols()
        );
        Some(&*surface)
    }

    /// Guarded write access to one surface
    pub fn guard(&mut self, id: &SurfaceId) -> Option<MutationGuard<'_>> {
        let locks = &self.locks;
        self.surfaces
            .iter_mut()
            .find(|s| s.id() == id)
            .map(|s| MutationGuard::new(s, locks))
    }

    /// Write one point through the guard. `false` if the surface is unknown,
    /// blocked, or the index is out of range.
    pub fn try_set_point(&mut self, id: &SurfaceId, index: usize, value: MeshPoint) -> bool {
        self.guard(id)
            .is_some_and(|mut guard| guard.try_set_point(index, value))
    }

    /// Rename a surface
    pub fn rename(&mut self, id: &SurfaceId, name: impl Into<String>) -> bool {
        self.update(id, |s| s.name = name.into())
    }

    /// Show or hide a surface
    pub fn set_visible(&mut self, id: &SurfaceId, visible: bool) -> bool {
        self.update(id, |s| s.visible = visible)
    }

    /// Set the persisted lock flag
    pub fn set_locked(&mut self, id: &SurfaceId, locked: bool) -> bool {
        self.update(id, |s| s.locked = locked)
    }

    /// Set the fill color
    pub fn set_color(&mut self, id: &SurfaceId, color: impl Into<String>) -> bool {
        self.update(id, |s| s.color = color.into())
    }

    /// Set the fill opacity, clamped to 0..1
    pub fn set_opacity(&mut self, id: &SurfaceId, opacity: f64) -> bool {
        self.update(id, |s| s.opacity = opacity.clamp(0.0, 1.0))
    }

    fn update(&mut self, id: &SurfaceId, f: impl FnOnce(&mut Surface)) -> bool {
        match self.surface_mut(id) {
            Some(surface) => {
                f(surface);
                true
            }
            None => false,
        }
    }

    // --- Lock / freeze ---

    /// The lock/freeze registry
    pub fn locks(&self) -> &LockRegistry {
        &self.locks
    }

    /// Freeze a surface
    pub fn freeze(&mut self, id: &SurfaceId) {
        self.locks.freeze(id);
    }

    /// Unfreeze a surface
    pub fn unfreeze(&mut self, id: &SurfaceId) {
        self.locks.unfreeze(id);
    }

    /// Add a surface to the lock set
    pub fn lock(&mut self, id: &SurfaceId) {
        self.locks.lock(id);
    }

    /// Remove a surface from the lock set
    pub fn unlock(&mut self, id: &SurfaceId) {
        self.locks.unlock(id);
    }

    /// Is the surface frozen?
    pub fn is_frozen(&self, id: &SurfaceId) -> bool {
        self.locks.is_frozen(id)
    }

    /// Is the surface in the lock set?
    pub fn is_locked(&self, id: &SurfaceId) -> bool {
        self.locks.is_locked(id)
    }

    /// Whether point writes to the surface are currently ignored
    pub fn is_blocked(&self, surface: &Surface) -> bool {
        self.locks.blocks(surface)
    }

    /// Set the snap grid size (0 disables snapping)
    pub fn set_grid_size(&mut self, size: f64) {
        self.locks.set_grid_size(size);
    }

    /// Current snap grid size
    pub fn grid_size(&self) -> f64 {
        self.locks.grid_size()
    }

    // --- Projectors ---

    /// Projector assignments
    pub fn projectors(&self) -> &ProjectorManager {
        &self.projectors
    }

    /// Mutable projector assignments
    pub fn projectors_mut(&mut self) -> &mut ProjectorManager {
        &mut self.projectors
    }

    /// A projector with its assigned surfaces resolved
    pub fn export_projector(&self, id: &ProjectorId) -> Option<ProjectorExport> {
        self.projectors.export(id, &self.surfaces)
    }

    // --- Exchange ---

    /// Snapshot the surfaces into an exchange document
    pub fn to_document(&self) -> ProjectDocument {
        ProjectDocument::new(self.surfaces.clone())
    }

    /// Serialize the project as pretty-printed DFIFTY-PRO JSON
    pub fn export_json(&self) -> Result<String> {
        self.to_document().to_json()
    }

    /// Replace the whole surface collection from a JSON string.
    ///
    /// On any error the project is left untouched. Returns the number of
    /// imported surfaces.
    pub fn import_json(&mut self, json: &str) -> Result<usize> {
        let document = ProjectDocument::from_json(json)?;
        Ok(self.import_document(document))
    }

    /// Replace the whole surface collection from a parsed JSON value
    pub fn import_value(&mut self, value: &serde_json::Value) -> Result<usize> {
        let document = ProjectDocument::from_value(value)?;
        Ok(self.import_document(document))
    }

    /// Replace the whole surface collection from a document
    pub fn import_document(&mut self, document: ProjectDocument) -> usize {
        if !document.is_native_format() {
            warn!(
                "Importing document with format '{}' as {}",
                document.format,
                crate::PROJECT_FORMAT
            );
        }

        let mut surfaces = document.surfaces;
        for surface in &mut surfaces {
            surface.normalize_shape();
        }
        self.surfaces = surfaces;
        self.locks
            .retain_known(self.surfaces.iter().map(|s| s.id()));

        info!("Imported {} surfaces", self.surfaces.len());
        self.surfaces.len()
    }
}

fn positive_or(value: Option<f64>, default: f64) -> f64 {
    value
        .filter(|v| v.is_finite() && *v > 0.0)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: MeshPoint, b: MeshPoint) -> bool {
        (a.x - b.x).abs() < 1e-12 && (a.y - b.y).abs() < 1e-12
    }

    #[test]
    fn test_default_surface_points() {
        let mut project = Project::new();
        let surface = project.create_default_surface(SurfaceOptions {
            mesh_detail: Some(4),
            ..Default::default()
        });

        let expected = [
            MeshPoint::new(-0.175, -0.125),
            MeshPoint::new(0.175, -0.125),
            MeshPoint::new(-0.175, 0.125),
            MeshPoint::new(0.175, 0.125),
        ];
        assert_eq!(surface.points().len(), 4);
        for (p, e) in surface.points().iter().zip(expected) {
            assert!(approx(*p, e), "{:?} != {:?}", p, e);
        }
        assert_eq!(surface.name, "Surface 1");
    }

    #[test]
    fn test_create_with_offset_and_options() {
        let mut project = Project::new();
        let surface = project.create_default_surface(SurfaceOptions {
            mesh_detail: Some(8),
            width: Some(0.5),
            height: Some(0.2),
            offset_x: 0.1,
            offset_y: -0.1,
            color: Some("#ff0000".into()),
            opacity: Some(2.0),
            ..Default::default()
        });
        assert_eq!((surface.mesh_rows(), surface.mesh_cols()), (2, 4));
        assert!(approx(surface.points()[0], MeshPoint::new(-0.15, -0.2)));
        assert!(approx(surface.points()[7], MeshPoint::new(0.35, 0.0)));
        assert_eq!(surface.color, "#ff0000");
        assert_eq!(surface.opacity, 1.0);
    }

    #[test]
    fn test_non_positive_size_uses_defaults() {
        let mut project = Project::new();
        let surface = project.create_default_surface(SurfaceOptions {
            width: Some(0.0),
            height: Some(-1.0),
            mesh_detail: Some(0),
            ..Default::default()
        });
        assert_eq!(surface.mesh_detail(), 4);
        let b = Bounds::from_points(surface.points());
        assert!((b.width - DEFAULT_SURFACE_WIDTH).abs() < 1e-12);
        assert!((b.height - DEFAULT_SURFACE_HEIGHT).abs() < 1e-12);
    }

    #[test]
    fn test_seed_defaults_once() {
        let mut project = Project::with_defaults();
        assert_eq!(project.surfaces().len(), 2);
        assert_eq!(project.surfaces()[1].name, "Surface 2");
        assert!(approx(
            project.surfaces()[1].points()[0],
            MeshPoint::new(0.125, -0.125)
        ));
        project.seed_defaults();
        assert_eq!(project.surfaces().len(), 2);
    }

    #[test]
    fn test_duplicate_unknown_is_none() {
        let mut project = Project::new();
        assert!(project.duplicate_surface(&SurfaceId::from("s_nope")).is_none());
        assert!(project.surfaces().is_empty());
    }

    #[test]
    fn test_delete_prunes_registry() {
        let mut project = Project::new();
        let id = project.create_default_surface(SurfaceOptions::default()).id().clone();
        project.freeze(&id);
        project.lock(&id);

        assert!(project.delete_surface(&id).is_some());
        assert!(!project.is_frozen(&id));
        assert!(!project.is_locked(&id));
        assert!(project.delete_surface(&id).is_none());
    }

    #[test]
    fn test_set_mesh_detail_unknown_is_none() {
        let mut project = Project::new();
        assert!(project
            .set_mesh_detail(&SurfaceId::from("s_nope"), 16)
            .is_none());
    }

    #[test]
    fn test_attribute_setters() {
        let mut project = Project::new();
        let id = project.create_default_surface(SurfaceOptions::default()).id().clone();
        assert!(project.rename(&id, "Wall"));
        assert!(project.set_visible(&id, false));
        assert!(project.set_color(&id, "#123456"));
        assert!(project.set_opacity(&id, -1.0));
        let s = project.surface(&id).unwrap();
        assert_eq!(s.name, "Wall");
        assert!(!s.visible);
        assert_eq!(s.color, "#123456");
        assert_eq!(s.opacity, 0.0);

        assert!(!project.rename(&SurfaceId::from("s_nope"), "x"));
    }
}
