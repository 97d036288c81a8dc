//! Project I/O - High-level API
//!
//! Saving snapshots the project into a DFIFTY-PRO document; loading checks
//! the format tag and version before the surfaces replace the project's own.

use std::path::Path;

use dfifty_core::{Project, ProjectDocument, PROJECT_FORMAT, PROJECT_FORMAT_VERSION};
use tracing::info;

use crate::error::{IoError, Result};
use crate::project_format::{read_document, write_document};

/// Save a project to `path`. The extension selects JSON or RON.
pub fn save_project(project: &Project, path: &Path) -> Result<()> {
    write_document(&project.to_document(), path)?;
    info!(
        "Saved {} surfaces to {:?}",
        project.surfaces().len(),
        path
    );
    Ok(())
}

/// Load a project file into a fresh project
pub fn load_project(path: &Path) -> Result<Project> {
    let mut project = Project::new();
    load_into(&mut project, path)?;
    Ok(project)
}

/// Replace the surfaces of an existing project from a file.
///
/// Projector setup is kept. On error the project is left untouched.
/// Returns the number of loaded surfaces.
pub fn load_into(project: &mut Project, path: &Path) -> Result<usize> {
    let document = read_document(path)?;
    validate(&document)?;
    let count = project.import_document(document);
    info!("Loaded {} surfaces from {:?}", count, path);
    Ok(count)
}

fn validate(document: &ProjectDocument) -> Result<()> {
    if !document.is_native_format() {
        return Err(IoError::FormatMismatch {
            expected: PROJECT_FORMAT.to_string(),
            found: document.format.clone(),
        });
    }
    if document.version != PROJECT_FORMAT_VERSION {
        return Err(IoError::VersionMismatch {
            expected: PROJECT_FORMAT_VERSION,
            found: document.version,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dfifty_core::{CoreError, ProjectorOptions};
    use tempfile::TempDir;

    #[test]
    fn project_json_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("show.json");
        let original = Project::with_defaults();

        save_project(&original, &path).unwrap();
        let loaded = load_project(&path).unwrap();
        assert_eq!(loaded.surfaces(), original.surfaces());
    }

    #[test]
    fn project_ron_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("show.dfifty");
        let mut original = Project::with_defaults();
        let id = original.surfaces()[0].id().clone();
        original.set_mesh_detail(&id, 32);
        original.set_color(&id, "#ff00ff");

        save_project(&original, &path).unwrap();
        let loaded = load_project(&path).unwrap();
        assert_eq!(loaded.surfaces(), original.surfaces());
    }

    #[test]
    fn test_version_mismatch() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("old.json");
        std::fs::write(
            &path,
            r#"{"format": "DFIFTY-PRO", "version": 7, "surfaces": []}"#,
        )
        .unwrap();

        let result = load_project(&path);
        assert!(matches!(
            result,
            Err(IoError::VersionMismatch {
                expected: 1,
                found: 7
            })
        ));
    }

    #[test]
    fn test_format_mismatch_leaves_project() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("foreign.json");
        std::fs::write(&path, r#"{"format": "OTHER", "surfaces": []}"#).unwrap();

        let mut project = Project::with_defaults();
        let result = load_into(&mut project, &path);
        assert!(matches!(result, Err(IoError::FormatMismatch { .. })));
        assert_eq!(project.surfaces().len(), 2);
    }

    #[test]
    fn test_missing_surfaces() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.json");
        std::fs::write(&path, r#"{"format": "DFIFTY-PRO", "version": 1}"#).unwrap();

        assert!(matches!(
            load_project(&path),
            Err(IoError::Core(CoreError::MissingSurfaces))
        ));
    }

    #[test]
    fn test_load_into_keeps_projectors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("show.json");
        save_project(&Project::with_defaults(), &path).unwrap();

        let mut project = Project::new();
        project.projectors_mut().add(ProjectorOptions::default());
        assert_eq!(load_into(&mut project, &path).unwrap(), 2);
        assert_eq!(project.projectors().projectors().len(), 1);
    }

    #[test]
    fn test_unsupported_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("show.txt");
        let result = save_project(&Project::new(), &path);
        assert!(matches!(result, Err(IoError::UnsupportedFormat(_))));
    }
}
