//! Logging configuration
//!
//! Describes where and how verbosely DFifty logs. The subscriber itself is
//! installed by the application; this module only owns the settings and the
//! log directory housekeeping.

use std::fs;
use std::io;
use std::path::PathBuf;

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

const LOG_FILE_PREFIX: &str = "dfifty_";
const LOG_FILE_EXTENSION: &str = "log";

fn default_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_max_log_files() -> usize {
    10
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Minimum level: trace, debug, info, warn or error
    #[serde(default = "default_level")]
    pub level: String,
    /// Log to stderr
    #[serde(default = "default_true")]
    pub console_output: bool,
    /// Log to a timestamped file in `log_dir`
    #[serde(default)]
    pub file_output: bool,
    /// Directory for log files
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    /// Number of log files kept by [`LogConfig::cleanup_old_logs`]
    #[serde(default = "default_max_log_files")]
    pub max_log_files: usize,
    #[serde(skip)]
    session_stamp: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            console_output: true,
            file_output: false,
            log_dir: default_log_dir(),
            max_log_files: default_max_log_files(),
            session_stamp: None,
        }
    }
}

impl LogConfig {
    /// Configuration logging into the given directory
    pub fn with_log_dir(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
            ..Self::default()
        }
    }

    /// Parse the configured level, falling back to INFO
    pub fn parse_level(&self) -> LevelFilter {
        match self.level.trim().to_ascii_lowercase().as_str() {
            "trace" => LevelFilter::TRACE,
            "debug" => LevelFilter::DEBUG,
            "info" => LevelFilter::INFO,
            "warn" | "warning" => LevelFilter::WARN,
            "error" => LevelFilter::ERROR,
            "off" => LevelFilter::OFF,
            _ => LevelFilter::INFO,
        }
    }

    /// Create the log directory if file output is enabled
    pub fn ensure_log_directory(&self) -> io::Result<()> {
        if self.file_output {
            fs::create_dir_all(&self.log_dir)?;
        }
        Ok(())
    }

    /// Path of this session's log file.
    ///
    /// The timestamp is fixed the first time the path is requested on a
    /// given config value, so repeated calls agree.
    pub fn current_log_path(&self) -> PathBuf {
        let stamp = self
            .session_stamp
            .clone()
            .unwrap_or_else(|| Local::now().format("%Y%m%d_%H%M%S").to_string());
        self.log_dir
            .join(format!("{LOG_FILE_PREFIX}{stamp}.{LOG_FILE_EXTENSION}"))
    }

    /// Pin the session timestamp used by [`LogConfig::current_log_path`]
    pub fn pin_session(&mut self) {
        if self.session_stamp.is_none() {
            self.session_stamp = Some(Local::now().format("%Y%m%d_%H%M%S").to_string());
        }
    }

    /// Delete the oldest log files so that at most `max_log_files - 1`
    /// remain, leaving room for the file about to be created.
    ///
    /// Returns the number of deleted files. A missing directory is not an
    /// error.
    pub fn cleanup_old_logs(&self) -> io::Result<usize> {
        let entries = match fs::read_dir(&self.log_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e),
        };

        let mut logs: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| is_log_file(path))
            .collect();

        let keep = self.max_log_files.saturating_sub(1);
        if logs.len() <= keep {
            return Ok(0);
        }

        // names embed a sortable timestamp
        logs.sort();
        let excess = logs.len() - keep;
        let mut removed = 0;
        for path in logs.into_iter().take(excess) {
            fs::remove_file(&path)?;
            removed += 1;
        }
        Ok(removed)
    }
}

fn is_log_file(path: &std::path::Path) -> bool {
    path.extension().is_some_and(|ext| ext == LOG_FILE_EXTENSION)
        && path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(LOG_FILE_PREFIX))
}
