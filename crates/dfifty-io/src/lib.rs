//! DFifty I/O - Project Persistence
//!
//! This crate moves projects between memory and disk:
//! - Project files in DFIFTY-PRO JSON or RON
//! - File size limits and format/version checks on load
//! - Persistence sinks and interval-driven autosave

pub mod autosave;
pub mod error;
pub mod project;
pub mod project_format;

pub use autosave::{AutosaveSink, FileSink, NullSink, PersistenceSink};
pub use error::{IoError, Result};
pub use project::{load_into, load_project, save_project};
pub use project_format::{read_document, write_document, FileFormat, MAX_PROJECT_FILE_SIZE};
