//! Point picking
//!
//! Scans editable surfaces in z-order and returns the first control point
//! whose on-screen position lies within the pick radius. This is first
//! match, not nearest.

use glam::DVec2;

use crate::coords::CoordinateMapper;
use crate::project::Project;
use crate::surface::SurfaceId;

/// Pick radius in pixels
pub const PICK_RADIUS: f64 = 10.0;

/// A control point under the pointer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointHit {
    /// Surface that owns the point
    pub surface_id: SurfaceId,
    /// Index into the surface's points
    pub index: usize,
}

/// First-match hit tester
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitTester {
    radius: f64,
}

impl Default for HitTester {
    fn default() -> Self {
        Self::new()
    }
}

impl HitTester {
    /// Hit tester with the standard pick radius
    pub fn new() -> Self {
        Self {
            radius: PICK_RADIUS,
        }
    }

    /// Hit tester with a custom radius in pixels
    pub fn with_radius(radius: f64) -> Self {
        Self { radius }
    }

    /// Pick radius in pixels
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Find the first point within the radius of `screen`.
    ///
    /// Hidden, frozen and locked surfaces are skipped.
    pub fn find_hit(
        &self,
        project: &Project,
        mapper: &CoordinateMapper,
        screen: DVec2,
    ) -> Option<PointHit> {
        project
            .surfaces()
            .iter()
            .filter(|s| s.visible && !project.is_blocked(s))
            .find_map(|surface| {
                surface
                    .points()
                    .iter()
                    .position(|p| mapper.world_to_screen(*p).distance(screen) <= self.radius)
                    .map(|index| PointHit {
                        surface_id: surface.id().clone(),
                        index,
                    })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::SurfaceOptions;

    fn setup() -> (Project, CoordinateMapper) {
        let mut project = Project::new();
        project.create_default_surface(SurfaceOptions {
            mesh_detail: Some(4),
            ..Default::default()
        });
        (project, CoordinateMapper::new(1600, 900).unwrap())
    }

    #[test]
    fn test_hit_first_point() {
        let (project, mapper) = setup();
        // point 0 at (-0.175, -0.125) -> (520, 338)
        let hit = HitTester::new()
            .find_hit(&project, &mapper, DVec2::new(523.0, 340.0))
            .unwrap();
        assert_eq!(hit.index, 0);
        assert_eq!(&hit.surface_id, project.surfaces()[0].id());
    }

    #[test]
    fn test_radius_is_inclusive() {
        let (project, mapper) = setup();
        let tester = HitTester::new();
        assert!(tester
            .find_hit(&project, &mapper, DVec2::new(530.0, 338.0))
            .is_some());
        assert!(tester
            .find_hit(&project, &mapper, DVec2::new(530.5, 338.0))
            .is_none());
    }

    #[test]
    fn test_frozen_and_locked_skipped() {
        let (mut project, mapper) = setup();
        let id = project.surfaces()[0].id().clone();
        let at = DVec2::new(520.0, 338.0);

        project.freeze(&id);
        assert!(HitTester::new().find_hit(&project, &mapper, at).is_none());
        project.unfreeze(&id);

        project.set_locked(&id, true);
        assert!(HitTester::new().find_hit(&project, &mapper, at).is_none());
        project.set_locked(&id, false);

        project.lock(&id);
        assert!(HitTester::new().find_hit(&project, &mapper, at).is_none());
        project.unlock(&id);

        assert!(HitTester::new().find_hit(&project, &mapper, at).is_some());
    }

    #[test]
    fn test_hidden_surface_skipped() {
        let (mut project, mapper) = setup();
        let id = project.surfaces()[0].id().clone();
        project.set_visible(&id, false);
        assert!(HitTester::new()
            .find_hit(&project, &mapper, DVec2::new(520.0, 338.0))
            .is_none());
    }

    #[test]
    fn test_first_surface_wins() {
        let (mut project, mapper) = setup();
        let first = project.surfaces()[0].id().clone();
        project.duplicate_surface(&first);
        // both surfaces have points within 400 px of the center
        let hit = HitTester::with_radius(400.0)
            .find_hit(&project, &mapper, DVec2::new(800.0, 450.0))
            .unwrap();
        assert_eq!(hit.surface_id, first);
    }
}
