//! Lock / freeze registry and snap grid settings
//!
//! Freeze is a transient, per-session block. The lock set mirrors the
//! persisted `Surface::locked` flag for collaborators that lock by id.
//! Both are keyed by surface id and pruned by the project when a surface
//! goes away.

use std::collections::HashSet;

use crate::surface::{Surface, SurfaceId};

/// Snap grid size (world units) used when none is configured
pub const DEFAULT_GRID_SIZE: f64 = 0.25;

/// Registry of frozen and locked surfaces plus the snap grid size
#[derive(Debug, Clone, PartialEq)]
pub struct LockRegistry {
    frozen: HashSet<SurfaceId>,
    locked: HashSet<SurfaceId>,
    grid_size: f64,
}

impl Default for LockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LockRegistry {
    /// Create an empty registry with the default snap grid
    pub fn new() -> Self {
        Self {
            frozen: HashSet::new(),
            locked: HashSet::new(),
            grid_size: DEFAULT_GRID_SIZE,
        }
    }

    /// Freeze a surface
    pub fn freeze(&mut self, id: &SurfaceId) {
        self.frozen.insert(id.clone());
    }

    /// Unfreeze a surface
    pub fn unfreeze(&mut self, id: &SurfaceId) {
        self.frozen.remove(id);
    }

    /// Add a surface to the lock set
    pub fn lock(&mut self, id: &SurfaceId) {
        self.locked.insert(id.clone());
    }

    /// Remove a surface from the lock set
    pub fn unlock(&mut self, id: &SurfaceId) {
        self.locked.remove(id);
    }

    /// Is the surface frozen?
    pub fn is_frozen(&self, id: &SurfaceId) -> bool {
        self.frozen.contains(id)
    }

    /// Is the surface in the lock set?
    pub fn is_locked(&self, id: &SurfaceId) -> bool {
        self.locked.contains(id)
    }

    /// Whether point writes to this surface must be ignored
    pub fn blocks(&self, surface: &Surface) -> bool {
        surface.locked || self.is_frozen(surface.id()) || self.is_locked(surface.id())
    }

    /// Set the snap grid size. Non-finite or negative values turn snapping off.
    pub fn set_grid_size(&mut self, size: f64) {
        self.grid_size = if size.is_finite() && size > 0.0 {
            size
        } else {
            0.0
        };
    }

    /// Current snap grid size, 0.0 when snapping is off
    pub fn grid_size(&self) -> f64 {
        self.grid_size
    }

    /// Drop every entry for a surface
    pub fn forget(&mut self, id: &SurfaceId) {
        self.frozen.remove(id);
        self.locked.remove(id);
    }

    /// Keep only entries whose surface still exists
    pub fn retain_known<'a>(&mut self, known: impl IntoIterator<Item = &'a SurfaceId>) {
        let known: HashSet<&SurfaceId> = known.into_iter().collect();
        self.frozen.retain(|id| known.contains(id));
        self.locked.retain(|id| known.contains(id));
    }

    /// Number of frozen surfaces
    pub fn frozen_count(&self) -> usize {
        self.frozen.len()
    }

    /// Number of surfaces in the lock set
    pub fn locked_count(&self) -> usize {
        self.locked.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_freeze_and_lock_sets() {
        let mut reg = LockRegistry::new();
        let a = SurfaceId::from("s_a");
        let b = SurfaceId::from("s_b");

        reg.freeze(&a);
        reg.lock(&b);
        assert!(reg.is_frozen(&a));
        assert!(!reg.is_locked(&a));
        assert!(reg.is_locked(&b));

        reg.unfreeze(&a);
        reg.unlock(&b);
        assert!(!reg.is_frozen(&a));
        assert!(!reg.is_locked(&b));
    }

    #[test]
    fn test_grid_size() {
        let mut reg = LockRegistry::new();
        assert_eq!(reg.grid_size(), DEFAULT_GRID_SIZE);

        reg.set_grid_size(0.1);
        assert_eq!(reg.grid_size(), 0.1);

        reg.set_grid_size(-1.0);
        assert_eq!(reg.grid_size(), 0.0);

        reg.set_grid_size(f64::NAN);
        assert_eq!(reg.grid_size(), 0.0);
    }

    #[test]
    fn test_forget_and_retain() {
        let mut reg = LockRegistry::new();
        let a = SurfaceId::from("s_a");
        let b = SurfaceId::from("s_b");
        reg.freeze(&a);
        reg.lock(&a);
        reg.freeze(&b);

        reg.forget(&a);
        assert!(!reg.is_frozen(&a));
        assert!(!reg.is_locked(&a));
        assert_eq!(reg.frozen_count(), 1);

        reg.retain_known(std::iter::empty());
        assert_eq!(reg.frozen_count(), 0);
        assert_eq!(reg.locked_count(), 0);
    }
}
