//! Error types for project persistence.

use dfifty_core::CoreError;

/// Result type alias for project I/O operations.
pub type Result<T> = std::result::Result<T, IoError>;

/// Error type for project I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// RON parse error
    #[error("RON parse error: {0}")]
    RonParse(#[from] ron::error::SpannedError),

    /// RON serialization error
    #[error("RON error: {0}")]
    Ron(#[from] ron::Error),

    /// File extension not recognized
    #[error("Unsupported project file format: {0}")]
    UnsupportedFormat(String),

    /// File exceeds the size limit
    #[error("Project file too large: {size} bytes (limit {limit} bytes)")]
    FileTooLarge {
        /// Actual file size in bytes
        size: u64,
        /// Allowed size in bytes
        limit: u64,
    },

    /// Document version this build cannot read
    #[error("Project version mismatch: expected {expected}, found {found}")]
    VersionMismatch {
        /// Supported version
        expected: u32,
        /// Version in the file
        found: u32,
    },

    /// Document format tag is not DFIFTY-PRO
    #[error("Project format mismatch: expected {expected}, found {found}")]
    FormatMismatch {
        /// Supported format tag
        expected: String,
        /// Format tag in the file
        found: String,
    },

    /// Error from the surface model
    #[error(transparent)]
    Core(#[from] CoreError),
}
