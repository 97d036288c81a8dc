//! Persistence sinks and periodic autosave
//!
//! A sink receives the exported project JSON. [`AutosaveSink`] throttles
//! writes to a fixed interval; a forced save bypasses the throttle.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use dfifty_core::Project;
use tracing::{debug, warn};

use crate::error::Result;

/// File name used by [`FileSink::default`]
pub const DEFAULT_AUTOSAVE_FILE: &str = "autosave_project.json";

/// Interval between autosaves
pub const DEFAULT_AUTOSAVE_INTERVAL: Duration = Duration::from_secs(10);

/// Destination for exported project JSON
pub trait PersistenceSink {
    /// Store one snapshot
    fn persist(&mut self, json: &str) -> Result<()>;
}

/// Discards every snapshot
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl PersistenceSink for NullSink {
    fn persist(&mut self, _json: &str) -> Result<()> {
        Ok(())
    }
}

/// Overwrites one file with each snapshot
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl Default for FileSink {
    fn default() -> Self {
        Self::new(DEFAULT_AUTOSAVE_FILE)
    }
}

impl FileSink {
    /// Sink writing to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Target file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistenceSink for FileSink {
    fn persist(&mut self, json: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, json)?;
        debug!("Autosaved {} bytes to {:?}", json.len(), self.path);
        Ok(())
    }
}

/// Throttles snapshots of a project to a sink
pub struct AutosaveSink {
    sink: Box<dyn PersistenceSink>,
    interval: Duration,
    last_save: Option<Instant>,
    saves: u64,
}

impl AutosaveSink {
    /// Autosave into `sink` at most once per `interval`
    pub fn new(sink: Box<dyn PersistenceSink>, interval: Duration) -> Self {
        Self {
            sink,
            interval,
            last_save: None,
            saves: 0,
        }
    }

    /// Autosave that discards everything
    pub fn disabled() -> Self {
        Self::new(Box::new(NullSink), DEFAULT_AUTOSAVE_INTERVAL)
    }

    /// Interval between saves
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of successful saves
    pub fn save_count(&self) -> u64 {
        self.saves
    }

    /// Save if the interval has elapsed since the last save.
    ///
    /// The first call only arms the timer. Returns whether a save happened.
    /// A failed save is logged and retried once the interval elapses again.
    pub fn tick(&mut self, project: &Project, now: Instant) -> bool {
        let Some(last) = self.last_save else {
            self.last_save = Some(now);
            return false;
        };
        if now.duration_since(last) < self.interval {
            return false;
        }
        self.last_save = Some(now);
        match self.save_now(project) {
            Ok(()) => true,
            Err(e) => {
                warn!("Autosave failed: {}", e);
                false
            }
        }
    }

    /// Save immediately
    pub fn save_now(&mut self, project: &Project) -> Result<()> {
        let json = project.export_json()?;
        self.sink.persist(&json)?;
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::TempDir;

    #[derive(Clone, Default)]
    struct MemorySink(Rc<RefCell<Vec<String>>>);

    impl PersistenceSink for MemorySink {
        fn persist(&mut self, json: &str) -> Result<()> {
            self.0.borrow_mut().push(json.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_tick_respects_interval() {
        let memory = MemorySink::default();
        let mut autosave = AutosaveSink::new(Box::new(memory.clone()), Duration::from_secs(10));
        let project = Project::with_defaults();
        let t0 = Instant::now();

        assert!(!autosave.tick(&project, t0));
        assert!(!autosave.tick(&project, t0 + Duration::from_secs(9)));
        assert!(autosave.tick(&project, t0 + Duration::from_secs(10)));
        assert!(!autosave.tick(&project, t0 + Duration::from_secs(15)));
        assert!(autosave.tick(&project, t0 + Duration::from_secs(20)));

        assert_eq!(autosave.save_count(), 2);
        let saved = memory.0.borrow();
        assert_eq!(saved.len(), 2);
        assert!(saved[0].contains("DFIFTY-PRO"));
    }

    #[test]
    fn test_file_sink_writes_export() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(DEFAULT_AUTOSAVE_FILE);
        let mut autosave = AutosaveSink::new(Box::new(FileSink::new(&path)), DEFAULT_AUTOSAVE_INTERVAL);

        let project = Project::with_defaults();
        autosave.save_now(&project).unwrap();

        let mut restored = Project::new();
        let json = fs::read_to_string(&path).unwrap();
        assert_eq!(restored.import_json(&json).unwrap(), 2);
    }

    #[test]
    fn test_failed_save_is_not_counted() {
        let dir = TempDir::new().unwrap();
        // a directory cannot be overwritten as a file
        let mut autosave = AutosaveSink::new(
            Box::new(FileSink::new(dir.path())),
            Duration::from_secs(1),
        );
        let project = Project::new();
        let t0 = Instant::now();
        autosave.tick(&project, t0);
        assert!(!autosave.tick(&project, t0 + Duration::from_secs(2)));
        assert_eq!(autosave.save_count(), 0);
    }

    #[test]
    fn test_null_sink() {
        let mut autosave = AutosaveSink::disabled();
        autosave.save_now(&Project::with_defaults()).unwrap();
        assert_eq!(autosave.save_count(), 1);
    }
}
