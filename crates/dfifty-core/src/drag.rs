//! Pointer drag state machine
//!
//! `Idle --down(hit)--> Dragging --move--> Dragging --up--> Idle`.
//! Only one drag exists at a time. While idle, pointer moves just update the
//! hover indicator.

use glam::DVec2;
use tracing::debug;

use crate::coords::CoordinateMapper;
use crate::hit::{HitTester, PointHit};
use crate::project::Project;

/// Current drag state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    /// No point is being dragged
    #[default]
    Idle,
    /// A point is being dragged
    Dragging(PointHit),
}

/// What a pointer move did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The dragged point was written
    PointMoved,
    /// The surface is frozen or locked; nothing changed
    WriteIgnored,
    /// The dragged surface no longer exists
    SurfaceMissing,
    /// Not dragging; only the hover indicator was updated
    Hover,
}

/// Drives point edits from pointer events
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
    hover: Option<PointHit>,
    tester: HitTester,
}

impl DragController {
    /// Idle controller with the standard pick radius
    pub fn new() -> Self {
        Self::default()
    }

    /// Idle controller using a custom hit tester
    pub fn with_tester(tester: HitTester) -> Self {
        Self {
            tester,
            ..Self::default()
        }
    }

    /// Current state
    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Point under the pointer while idle
    pub fn hover(&self) -> Option<&PointHit> {
        self.hover.as_ref()
    }

    /// Whether a drag is in progress
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Start a drag if a point is under the pointer.
    ///
    /// A miss leaves the state unchanged. Returns whether a drag started.
    pub fn pointer_down(
        &mut self,
        project: &Project,
        mapper: &CoordinateMapper,
        screen: DVec2,
    ) -> bool {
        match self.tester.find_hit(project, mapper, screen) {
            Some(hit) => {
                debug!("Drag start on {} point {}", hit.surface_id, hit.index);
                self.hover = None;
                self.state = DragState::Dragging(hit);
                true
            }
            None => false,
        }
    }

    /// Move the dragged point to the snapped pointer position, or update the
    /// hover indicator when idle
    pub fn pointer_move(
        &mut self,
        project: &mut Project,
        mapper: &CoordinateMapper,
        screen: DVec2,
    ) -> MoveOutcome {
        let DragState::Dragging(hit) = &self.state else {
            self.hover = self.tester.find_hit(project, mapper, screen);
            return MoveOutcome::Hover;
        };

        if project.surface(&hit.surface_id).is_none() {
            return MoveOutcome::SurfaceMissing;
        }

        let world = CoordinateMapper::apply_snap(mapper.screen_to_world(screen), project.grid_size());
        if project.try_set_point(&hit.surface_id, hit.index, world) {
            MoveOutcome::PointMoved
        } else {
            MoveOutcome::WriteIgnored
        }
    }

    /// End any drag
    pub fn pointer_up(&mut self) {
        if let DragState::Dragging(hit) = &self.state {
            debug!("Drag end on {} point {}", hit.surface_id, hit.index);
        }
        self.state = DragState::Idle;
    }
}
