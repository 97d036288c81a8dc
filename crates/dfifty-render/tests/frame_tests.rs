use dfifty_core::{CoordinateMapper, DVec2, DragController, Project, SurfaceOptions};
use dfifty_render::{
    mesh_renderer::BLOCKED_HANDLE_COLOR, DrawCommand, FrameOutput, MeshRenderer, PixmapCanvas,
    RasterOutput,
};

fn mapper() -> CoordinateMapper {
    CoordinateMapper::new(400, 300).unwrap()
}

#[test]
fn test_frame_reflects_drag() {
    let mut project = Project::new();
    project.create_default_surface(SurfaceOptions::default());
    project.set_grid_size(0.0);
    let mapper = mapper();
    let renderer = MeshRenderer::new().with_grid(false).with_labels(false);

    let before = renderer.build_frame(&project, &mapper, None);

    let mut drag = DragController::new();
    let corner = mapper.world_to_screen(project.surfaces()[0].points()[0]);
    assert!(drag.pointer_down(&project, &mapper, corner));
    drag.pointer_move(&mut project, &mapper, DVec2::new(20.0, 20.0));
    drag.pointer_up();

    let after = renderer.build_frame(&project, &mapper, None);
    assert_ne!(before, after);
    assert_eq!(before.triangle_count(), after.triangle_count());

    let first_handle = after.commands().iter().find_map(|c| match c {
        DrawCommand::Handle { center, .. } => Some(*center),
        _ => None,
    });
    assert_eq!(first_handle, Some(DVec2::new(20.0, 20.0)));
}

#[test]
fn test_rasterized_surface_fill() {
    let mut project = Project::new();
    project.create_default_surface(SurfaceOptions {
        color: Some("#ff0000".into()),
        ..Default::default()
    });
    let frame = MeshRenderer::new()
        .with_grid(false)
        .build_frame(&project, &mapper(), None);

    let mut canvas = PixmapCanvas::new(400, 300).unwrap();
    frame.replay(&mut canvas);

    // inside the upper-left triangle, away from the anti-aliased diagonal
    assert_eq!(canvas.pixel(150, 130), Some([255, 0, 0, 255]));
    // corners of the canvas keep the background
    assert_eq!(canvas.pixel(1, 1), Some([5, 5, 7, 255]));
}

#[test]
fn test_handle_fill_tracks_freeze() {
    let mut project = Project::with_defaults();
    let frozen = project.surfaces()[1].id().clone();
    project.freeze(&frozen);

    let frame = MeshRenderer::new().build_frame(&project, &mapper(), None);
    let fills: Vec<_> = frame
        .commands()
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Handle { fill, .. } => Some(*fill),
            _ => None,
        })
        .collect();
    assert_eq!(fills.len(), 8);
    assert!(fills[..4].iter().all(|f| *f != BLOCKED_HANDLE_COLOR));
    assert!(fills[4..].iter().all(|f| *f == BLOCKED_HANDLE_COLOR));
}

#[test]
fn test_snapshot_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frame.png");

    let frame = MeshRenderer::new().build_frame(&Project::with_defaults(), &mapper(), None);
    let mut output = RasterOutput::new();
    output.present(&frame).unwrap();
    output.canvas().unwrap().save_png(&path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[1..4], b"PNG");
}
