//! Editor session
//!
//! Wires the project to pointer input, frame building, frame output and
//! autosave. Without a usable canvas the session stays inert: pointer events
//! and frames are ignored while the project itself remains editable.

use std::time::Instant;

use dfifty_core::{CoordinateMapper, DVec2, DragController, MoveOutcome, Project};
use dfifty_io::AutosaveSink;
use dfifty_render::{Frame, FrameOutput, MeshRenderer, NullOutput};
use tracing::{info, warn};

/// One running editor
pub struct EditorSession {
    project: Project,
    mapper: Option<CoordinateMapper>,
    drag: DragController,
    renderer: MeshRenderer,
    output: Box<dyn FrameOutput>,
    autosave: Option<AutosaveSink>,
    last_frame: Option<Frame>,
}

impl EditorSession {
    /// Start a session on a canvas of the given size.
    ///
    /// `None` or a zero-sized canvas leaves the session inert.
    pub fn new(project: Project, canvas: Option<(u32, u32)>) -> Self {
        let mapper = match canvas {
            Some((w, h)) => match CoordinateMapper::new(w, h) {
                Ok(mapper) => Some(mapper),
                Err(e) => {
                    warn!("Editor canvas unusable, rendering disabled: {}", e);
                    None
                }
            },
            None => {
                warn!("No editor canvas, rendering disabled");
                None
            }
        };
        if let Some(m) = &mapper {
            info!("Editor canvas {}x{}", m.width(), m.height());
        }

        Self {
            project,
            mapper,
            drag: DragController::new(),
            renderer: MeshRenderer::new(),
            output: Box::new(NullOutput),
            autosave: None,
            last_frame: None,
        }
    }

    /// Send frames to `output`
    pub fn with_output(mut self, output: Box<dyn FrameOutput>) -> Self {
        info!("Frame output: {}", output.name());
        self.output = output;
        self
    }

    /// Autosave through `autosave`
    pub fn with_autosave(mut self, autosave: AutosaveSink) -> Self {
        self.autosave = Some(autosave);
        self
    }

    /// Whether frames and pointer events are processed
    pub fn is_active(&self) -> bool {
        self.mapper.is_some()
    }

    /// The edited project
    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Mutable access to the edited project
    pub fn project_mut(&mut self) -> &mut Project {
        &mut self.project
    }

    /// Pointer pressed at a canvas position
    pub fn pointer_down(&mut self, screen: DVec2) -> bool {
        match &self.mapper {
            Some(mapper) => self.drag.pointer_down(&self.project, mapper, screen),
            None => false,
        }
    }

    /// Pointer moved to a canvas position
    pub fn pointer_move(&mut self, screen: DVec2) -> Option<MoveOutcome> {
        let mapper = self.mapper.as_ref()?;
        Some(self.drag.pointer_move(&mut self.project, mapper, screen))
    }

    /// Pointer released anywhere
    pub fn pointer_up(&mut self) {
        self.drag.pointer_up();
    }

    /// Build a frame and hand it to the output. Inert sessions do nothing.
    pub fn render_frame(&mut self) -> anyhow::Result<Option<&Frame>> {
        let Some(mapper) = &self.mapper else {
            return Ok(None);
        };
        let frame = self
            .renderer
            .build_frame(&self.project, mapper, self.drag.hover());
        self.output.present(&frame)?;
        Ok(Some(&*self.last_frame.insert(frame)))
    }

    /// Most recently built frame
    pub fn last_frame(&self) -> Option<&Frame> {
        self.last_frame.as_ref()
    }

    /// Periodic housekeeping; returns whether an autosave happened
    pub fn tick(&mut self, now: Instant) -> bool {
        match &mut self.autosave {
            Some(autosave) => autosave.tick(&self.project, now),
            None => false,
        }
    }

    /// Save immediately through the autosave sink, if any
    pub fn flush(&mut self) -> anyhow::Result<()> {
        if let Some(autosave) = &mut self.autosave {
            autosave.save_now(&self.project)?;
        }
        Ok(())
    }
}
