//! User configuration
//!
//! Stored as JSON in the platform config directory. Missing fields take
//! their defaults so older files keep loading.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use dfifty_core::lock::DEFAULT_GRID_SIZE;
use dfifty_core::LogConfig;
use serde::{Deserialize, Serialize};

fn default_canvas_width() -> u32 {
    1600
}

fn default_canvas_height() -> u32 {
    900
}

fn default_grid_size() -> f64 {
    DEFAULT_GRID_SIZE
}

fn default_autosave_secs() -> u64 {
    10
}

fn default_autosave_path() -> PathBuf {
    PathBuf::from(dfifty_io::autosave::DEFAULT_AUTOSAVE_FILE)
}

fn default_target_fps() -> u32 {
    60
}

fn default_true() -> bool {
    true
}

/// User configuration settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserConfig {
    /// Editor canvas width in pixels
    #[serde(default = "default_canvas_width")]
    pub canvas_width: u32,
    /// Editor canvas height in pixels
    #[serde(default = "default_canvas_height")]
    pub canvas_height: u32,
    /// Snap grid size in world units, 0 disables snapping
    #[serde(default = "default_grid_size")]
    pub grid_size: f64,
    /// Seconds between autosaves, 0 disables autosave
    #[serde(default = "default_autosave_secs")]
    pub autosave_interval_secs: u64,
    /// Autosave target file
    #[serde(default = "default_autosave_path")]
    pub autosave_path: PathBuf,
    /// Target frame rate
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,
    /// Seed the two startup surfaces when no project is given
    #[serde(default = "default_true")]
    pub seed_default_surfaces: bool,
    /// Last opened project path
    #[serde(default)]
    pub last_project: Option<PathBuf>,
    /// Logging settings
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            canvas_width: default_canvas_width(),
            canvas_height: default_canvas_height(),
            grid_size: default_grid_size(),
            autosave_interval_secs: default_autosave_secs(),
            autosave_path: default_autosave_path(),
            target_fps: default_target_fps(),
            seed_default_surfaces: true,
            last_project: None,
            log: LogConfig::default(),
        }
    }
}

impl UserConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("DFifty");
            p.push("config.json");
            p
        })
    }

    /// Load configuration from disk, falling back to defaults
    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Load from a specific file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        fs::read_to_string(path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<(), std::io::Error> {
        match Self::config_path() {
            Some(path) => self.save_to(&path),
            None => Ok(()),
        }
    }

    /// Save to a specific file
    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
    }

    /// Autosave interval, `None` when disabled
    pub fn autosave_interval(&self) -> Option<Duration> {
        (self.autosave_interval_secs > 0).then(|| Duration::from_secs(self.autosave_interval_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = UserConfig::default();
        assert_eq!((config.canvas_width, config.canvas_height), (1600, 900));
        assert_eq!(config.grid_size, 0.25);
        assert_eq!(config.autosave_interval(), Some(Duration::from_secs(10)));
        assert_eq!(config.autosave_path, PathBuf::from("autosave_project.json"));
        assert!(config.seed_default_surfaces);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"canvas_width": 800, "autosave_interval_secs": 0}"#).unwrap();

        let config = UserConfig::load_from(&path);
        assert_eq!(config.canvas_width, 800);
        assert_eq!(config.canvas_height, 900);
        assert_eq!(config.autosave_interval(), None);
        assert_eq!(config.log, LogConfig::default());
    }

    #[test]
    fn test_invalid_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(UserConfig::load_from(&path), UserConfig::default());
        assert_eq!(
            UserConfig::load_from(&dir.path().join("missing.json")),
            UserConfig::default()
        );
    }

    #[test]
    fn test_save_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let mut config = UserConfig::default();
        config.target_fps = 30;
        config.last_project = Some(PathBuf::from("show.json"));

        config.save_to(&path).unwrap();
        assert_eq!(UserConfig::load_from(&path), config);
    }
}
