use std::time::{Duration, Instant};

use dfifty_core::{MeshPoint, Project};
use dfifty_io::{load_project, save_project, AutosaveSink, FileSink};
use tempfile::TempDir;

#[test]
fn test_autosave_file_loads_as_project() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("autosave_project.json");
    let mut project = Project::with_defaults();
    let mut autosave = AutosaveSink::new(Box::new(FileSink::new(&path)), Duration::from_secs(10));

    let t0 = Instant::now();
    autosave.tick(&project, t0);
    let id = project.surfaces()[0].id().clone();
    assert!(project.try_set_point(&id, 0, MeshPoint::new(-0.3, -0.3)));
    assert!(autosave.tick(&project, t0 + Duration::from_secs(10)));

    let loaded = load_project(&path).unwrap();
    assert_eq!(loaded.surfaces(), project.surfaces());
}

#[test]
fn test_freeze_state_is_session_only() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("show.ron");
    let mut project = Project::with_defaults();
    let frozen = project.surfaces()[0].id().clone();
    let locked = project.surfaces()[1].id().clone();
    project.freeze(&frozen);
    project.set_locked(&locked, true);

    save_project(&project, &path).unwrap();
    let loaded = load_project(&path).unwrap();

    assert!(!loaded.is_frozen(&frozen));
    // the lock attribute is part of the surface and survives
    assert!(loaded.surface(&locked).unwrap().locked);
}
