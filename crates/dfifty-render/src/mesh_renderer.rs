//! Mesh Renderer - Triangulates surfaces into a per-frame display list
//!
//! Every unit cell `A=(r,c) B=(r,c+1) C=(r+1,c) D=(r+1,c+1)` is split along
//! the B-C diagonal into `A-B-C` and `B-D-C`. The frame is a flat list of
//! draw commands that can be replayed onto any [`Canvas2d`].

use dfifty_core::{
    cell_triangles, outline_indices, CoordinateMapper, GridShape, PointHit, Project, Surface,
};
use glam::DVec2;
use tracing::trace;

use crate::canvas::Canvas2d;
use crate::color::Rgba;

/// Frame background
pub const BACKGROUND_COLOR: Rgba = Rgba::rgb(0x05, 0x05, 0x07);
/// Spacing of the reference grid in pixels
pub const GRID_SPACING: f64 = 40.0;
/// Handle radius in pixels
pub const HANDLE_RADIUS: f64 = 6.0;
/// Handle radius while hovered
pub const HOVER_HANDLE_RADIUS: f64 = 8.0;
/// Outline color of locked surfaces
pub const LOCKED_OUTLINE_COLOR: Rgba = Rgba::rgb(0xff, 0xd5, 0x6b);
/// Handle fill of frozen or locked surfaces
pub const BLOCKED_HANDLE_COLOR: Rgba = Rgba::rgb(0xdd, 0xdd, 0xdd);

const FALLBACK_SURFACE_COLOR: Rgba = Rgba::rgb(0x00, 0xff, 0xc6);
const GRID_LINE_ALPHA: f32 = 0.05;
const OUTLINE_WIDTH: f32 = 2.0;
const HANDLE_STROKE_WIDTH: f32 = 1.2;
const LABEL_GAP: f64 = 9.0;

/// One drawing operation in screen pixels
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole canvas
    Clear(Rgba),
    /// Straight line
    Line {
        from: DVec2,
        to: DVec2,
        color: Rgba,
        width: f32,
    },
    /// Filled triangle
    Triangle { points: [DVec2; 3], color: Rgba },
    /// Closed polygon outline
    Outline {
        points: Vec<DVec2>,
        color: Rgba,
        width: f32,
    },
    /// Filled and stroked circle
    Handle {
        center: DVec2,
        radius: f64,
        fill: Rgba,
        stroke: Rgba,
        stroke_width: f32,
    },
    /// Centered text label
    Label {
        position: DVec2,
        text: String,
        color: Rgba,
    },
}

/// A fully built frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl Frame {
    /// Frame width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Draw commands in painting order
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of filled triangles
    pub fn triangle_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Triangle { .. }))
            .count()
    }

    /// Paint every command onto a canvas
    pub fn replay(&self, canvas: &mut dyn Canvas2d) {
        for command in &self.commands {
            match command {
                DrawCommand::Clear(color) => canvas.clear(*color),
                DrawCommand::Line {
                    from,
                    to,
                    color,
                    width,
                } => canvas.stroke_line(*from, *to, *color, *width),
                DrawCommand::Triangle { points, color } => canvas.fill_polygon(points, *color),
                DrawCommand::Outline {
                    points,
                    color,
                    width,
                } => canvas.stroke_polygon(points, *color, *width),
                DrawCommand::Handle {
                    center,
                    radius,
                    fill,
                    stroke,
                    stroke_width,
                } => canvas.draw_circle(*center, *radius, *fill, *stroke, *stroke_width),
                DrawCommand::Label {
                    position,
                    text,
                    color,
                } => canvas.fill_text(*position, text, *color),
            }
        }
    }
}

/// Builds frames from a project
#[derive(Debug, Clone)]
pub struct MeshRenderer {
    show_grid: bool,
    show_labels: bool,
}

impl Default for MeshRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshRenderer {
    /// Renderer with reference grid and index labels
    pub fn new() -> Self {
        Self {
            show_grid: true,
            show_labels: true,
        }
    }

    /// Toggle the 40 px reference grid
    pub fn with_grid(mut self, show: bool) -> Self {
        self.show_grid = show;
        self
    }

    /// Toggle the point index labels
    pub fn with_labels(mut self, show: bool) -> Self {
        self.show_labels = show;
        self
    }

    /// Build the display list for one frame
    pub fn build_frame(
        &self,
        project: &Project,
        mapper: &CoordinateMapper,
        hover: Option<&PointHit>,
    ) -> Frame {
        let width = mapper.width();
        let height = mapper.height();
        let mut commands = vec![DrawCommand::Clear(BACKGROUND_COLOR)];

        if self.show_grid {
            push_reference_grid(&mut commands, width, height);
        }

        for surface in project.surfaces() {
            if !surface.visible || surface.points().is_empty() {
                continue;
            }
            let blocked = project.is_blocked(surface);
            self.push_surface(&mut commands, surface, mapper, blocked, hover);
        }

        trace!("Built frame with {} commands", commands.len());
        Frame {
            width: width as u32,
            height: height as u32,
            commands,
        }
    }

    fn push_surface(
        &self,
        commands: &mut Vec<DrawCommand>,
        surface: &Surface,
        mapper: &CoordinateMapper,
        blocked: bool,
        hover: Option<&PointHit>,
    ) {
        let screen: Vec<DVec2> = surface
            .points()
            .iter()
            .map(|p| mapper.world_to_screen(*p))
            .collect();
        let shape = surface
            .shape()
            .unwrap_or_else(|| GridShape::for_point_count(screen.len()));
        let base = Rgba::parse_hex(&surface.color).unwrap_or(FALLBACK_SURFACE_COLOR);

        // Mesh fill
        if shape.point_count() <= screen.len() {
            let fill = base.with_alpha(surface.opacity as f32);
            for [a, b, c] in cell_triangles(shape.rows(), shape.cols()) {
                commands.push(DrawCommand::Triangle {
                    points: [screen[a], screen[b], screen[c]],
                    color: fill,
                });
            }
        }

        // Outline
        if let Some(corners) = outline_indices(shape.cols(), screen.len()) {
            commands.push(DrawCommand::Outline {
                points: corners.iter().map(|&i| screen[i]).collect(),
                color: if surface.locked {
                    LOCKED_OUTLINE_COLOR
                } else {
                    base
                },
                width: OUTLINE_WIDTH,
            });
        }

        // Handles
        for (index, center) in screen.iter().enumerate() {
            let hovered =
                hover.is_some_and(|h| &h.surface_id == surface.id() && h.index == index);
            let radius = if hovered {
                HOVER_HANDLE_RADIUS
            } else {
                HANDLE_RADIUS
            };
            commands.push(DrawCommand::Handle {
                center: *center,
                radius,
                fill: if blocked {
                    BLOCKED_HANDLE_COLOR
                } else {
                    Rgba::WHITE
                },
                stroke: Rgba::BLACK,
                stroke_width: HANDLE_STROKE_WIDTH,
            });
            if self.show_labels {
                commands.push(DrawCommand::Label {
                    position: DVec2::new(center.x, center.y - (radius + LABEL_GAP)),
                    text: index.to_string(),
                    color: Rgba::WHITE,
                });
            }
        }
    }
}

fn push_reference_grid(commands: &mut Vec<DrawCommand>, width: f64, height: f64) {
    let color = Rgba::WHITE.with_alpha(GRID_LINE_ALPHA);
    let mut x = 0.0;
    while x < width {
        commands.push(DrawCommand::Line {
            from: DVec2::new(x, 0.0),
            to: DVec2::new(x, height),
            color,
            width: 1.0,
        });
        x += GRID_SPACING;
    }
    let mut y = 0.0;
    while y < height {
        commands.push(DrawCommand::Line {
            from: DVec2::new(0.0, y),
            to: DVec2::new(width, y),
            color,
            width: 1.0,
        });
        y += GRID_SPACING;
    }
}
