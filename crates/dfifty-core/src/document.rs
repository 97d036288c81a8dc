//! The DFIFTY-PRO exchange document
//!
//! This is the JSON shape projects are exported to and imported from:
//! `{ format, version, surfaces, meta: { exportedAt } }`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::surface::Surface;
use crate::{CoreError, Result};

/// Format tag written into every exported document
pub const PROJECT_FORMAT: &str = "DFIFTY-PRO";

/// Current document version
pub const PROJECT_FORMAT_VERSION: u32 = 1;

fn default_format() -> String {
    PROJECT_FORMAT.to_string()
}

fn default_version() -> u32 {
    PROJECT_FORMAT_VERSION
}

/// Top-level exchange document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDocument {
    /// Format tag, `DFIFTY-PRO`
    #[serde(default = "default_format")]
    pub format: String,
    /// Document version
    #[serde(default = "default_version")]
    pub version: u32,
    /// Surfaces in z-order
    pub surfaces: Vec<Surface>,
    /// Export metadata
    #[serde(default)]
    pub meta: DocumentMeta,
}

/// Metadata stamped at export time
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DocumentMeta {
    /// When the document was produced
    #[serde(rename = "exportedAt", default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,
}

impl ProjectDocument {
    /// Wrap surfaces in a document stamped with the current time
    pub fn new(surfaces: Vec<Surface>) -> Self {
        Self {
            format: default_format(),
            version: PROJECT_FORMAT_VERSION,
            surfaces,
            meta: DocumentMeta {
                exported_at: Some(Utc::now()),
            },
        }
    }

    /// Interpret an already parsed JSON value.
    ///
    /// Only the `surfaces` field is required; format, version and meta fall
    /// back to their defaults when absent.
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        let has_surfaces = value
            .as_object()
            .is_some_and(|obj| obj.get("surfaces").is_some_and(|s| !s.is_null()));
        if !has_surfaces {
            return Err(CoreError::MissingSurfaces);
        }
        Ok(Self::deserialize(value)?)
    }

    /// Parse a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Whether the format tag matches what this build writes
    pub fn is_native_format(&self) -> bool {
        self.format == PROJECT_FORMAT
    }
}
