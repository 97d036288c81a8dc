//! On-disk project files.
//!
//! A project file holds a DFIFTY-PRO document. `.json` files are the exact
//! exchange format produced by `Project::export_json`; `.ron` and `.dfifty`
//! files carry the same document as RON.

use std::fs;
use std::path::Path;

use dfifty_core::ProjectDocument;
use tracing::debug;

use crate::error::{IoError, Result};

/// Maximum allowed project file size (50 MB).
pub const MAX_PROJECT_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Serialization used for a project file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// DFIFTY-PRO JSON
    Json,
    /// Rusty Object Notation
    Ron,
}

impl FileFormat {
    /// Pick the format from the file extension. No extension means RON.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("ron");

        match extension.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "ron" | "dfifty" => Ok(Self::Ron),
            _ => Err(IoError::UnsupportedFormat(extension.to_string())),
        }
    }
}

/// Read a document from disk
pub fn read_document(path: &Path) -> Result<ProjectDocument> {
    read_document_with_limit(path, MAX_PROJECT_FILE_SIZE)
}

/// Read a document, rejecting files larger than `limit` bytes
pub fn read_document_with_limit(path: &Path, limit: u64) -> Result<ProjectDocument> {
    let format = FileFormat::from_path(path)?;

    let size = fs::metadata(path)?.len();
    if size > limit {
        return Err(IoError::FileTooLarge { size, limit });
    }

    let content = fs::read_to_string(path)?;
    debug!("Read {} bytes from {:?}", content.len(), path);
    match format {
        FileFormat::Json => Ok(ProjectDocument::from_json(&content)?),
        FileFormat::Ron => Ok(ron::from_str(&content)?),
    }
}

/// Write a document to disk
pub fn write_document(document: &ProjectDocument, path: &Path) -> Result<()> {
    let content = match FileFormat::from_path(path)? {
        FileFormat::Json => document.to_json()?,
        FileFormat::Ron => {
            let config = ron::ser::PrettyConfig::default();
            ron::ser::to_string_pretty(document, config)?
        }
    };
    fs::write(path, content)?;
    debug!("Wrote project document to {:?}", path);
    Ok(())
}
