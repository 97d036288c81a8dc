//! Mutation guard for single-point writes
//!
//! A guard borrows one surface together with the lock registry. Writes to a
//! frozen or locked surface are accepted but have no effect, and the caller
//! learns about it only through the returned flag.

use tracing::trace;

use crate::grid::MeshPoint;
use crate::lock::LockRegistry;
use crate::surface::Surface;

/// Guarded write access to one surface's points
#[derive(Debug)]
pub struct MutationGuard<'a> {
    surface: &'a mut Surface,
    locks: &'a LockRegistry,
}

impl<'a> MutationGuard<'a> {
    /// Guard a surface against the given registry
    pub fn new(surface: &'a mut Surface, locks: &'a LockRegistry) -> Self {
        Self { surface, locks }
    }

    /// Whether writes through this guard are currently ignored
    pub fn is_blocked(&self) -> bool {
        self.locks.blocks(self.surface)
    }

    /// Write one point.
    ///
    /// Returns `true` if the value was stored. A frozen or locked surface,
    /// or an index past the end, leaves the points untouched and returns
    /// `false`.
    pub fn try_set_point(&mut self, index: usize, value: MeshPoint) -> bool {
        if self.is_blocked() {
            trace!(
                "Ignoring write to point {} of blocked surface {}",
                index,
                self.surface.id()
            );
            return false;
        }
        self.surface.write_point(index, value)
    }

    /// The guarded surface
    pub fn surface(&self) -> &Surface {
        self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{generate_grid, Bounds, GridShape};
    use crate::surface::SurfaceId;

    fn sample() -> Surface {
        let shape = GridShape::for_detail(4);
        Surface::new(
            SurfaceId::from("s_g"),
            "Guarded",
            4,
            shape,
            generate_grid(shape, Bounds::default()),
        )
    }

    #[test]
    fn test_write_applies_when_unblocked() {
        let mut surface = sample();
        let locks = LockRegistry::new();
        let mut guard = MutationGuard::new(&mut surface, &locks);
        assert!(!guard.is_blocked());
        assert!(guard.try_set_point(2, MeshPoint::new(0.3, 0.3)));
        assert_eq!(surface.point(2), Some(MeshPoint::new(0.3, 0.3)));
    }

    #[test]
    fn test_write_ignored_when_frozen() {
        let mut surface = sample();
        let before = surface.points().to_vec();
        let mut locks = LockRegistry::new();
        locks.freeze(surface.id());

        let mut guard = MutationGuard::new(&mut surface, &locks);
        assert!(!guard.try_set_point(0, MeshPoint::new(9.0, 9.0)));
        assert_eq!(surface.points(), before.as_slice());
    }

    #[test]
    fn test_write_ignored_when_locked_flag_or_lock_set() {
        let mut surface = sample();
        let before = surface.points().to_vec();
        surface.locked = true;
        let mut locks = LockRegistry::new();
        {
            let mut guard = MutationGuard::new(&mut surface, &locks);
            assert!(!guard.try_set_point(1, MeshPoint::new(9.0, 9.0)));
        }
        assert_eq!(surface.points(), before.as_slice());

        surface.locked = false;
        locks.lock(surface.id());
        {
            let mut guard = MutationGuard::new(&mut surface, &locks);
            assert!(!guard.try_set_point(1, MeshPoint::new(9.0, 9.0)));
        }
        assert_eq!(surface.points(), before.as_slice());

        locks.unlock(surface.id());
        let mut guard = MutationGuard::new(&mut surface, &locks);
        assert!(guard.try_set_point(1, MeshPoint::new(9.0, 9.0)));
    }

    #[test]
    fn test_out_of_range_write() {
        let mut surface = sample();
        let locks = LockRegistry::new();
        let mut guard = MutationGuard::new(&mut surface, &locks);
        assert!(!guard.try_set_point(4, MeshPoint::default()));
    }
}
