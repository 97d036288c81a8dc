//! Subscriber installation for the editor binary
//!
//! Console output goes to stderr so stdout stays free for piping. The file
//! sink, when enabled, writes through a non-blocking worker whose guard must
//! outlive every log call.

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use dfifty_core::LogConfig;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{
    filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

/// Keeps the file writer flushing until dropped
pub struct LogGuard {
    _worker: WorkerGuard,
    path: PathBuf,
}

impl LogGuard {
    /// File the session logs to
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

/// `RUST_LOG` wins over the configured level
fn level_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(config.parse_level().into())
        .from_env_lossy()
}

/// Prepare the log directory, rotate old files and open this session's file
fn open_session_file(config: &LogConfig) -> Result<(NonBlocking, LogGuard)> {
    config
        .ensure_log_directory()
        .with_context(|| format!("Failed to create log directory {:?}", config.log_dir))?;
    match config.cleanup_old_logs() {
        Ok(0) => {}
        Ok(n) => eprintln!("Removed {} old log files", n),
        Err(e) => eprintln!("Warning: could not rotate logs in {:?}: {}", config.log_dir, e),
    }

    let path = config.current_log_path();
    let file =
        File::create(&path).with_context(|| format!("Failed to create log file {:?}", path))?;
    let (writer, worker) = tracing_appender::non_blocking(file);
    Ok((
        writer,
        LogGuard {
            _worker: worker,
            path,
        },
    ))
}

/// Install the global subscriber described by `config`.
///
/// Returns the file guard when file output is on; hold it for the whole run.
pub fn init(config: &LogConfig) -> Result<Option<LogGuard>> {
    let mut config = config.clone();
    config.pin_session();

    let console = config.console_output.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_filter(level_filter(&config))
    });

    let (file, guard) = if config.file_output {
        let (writer, guard) = open_session_file(&config)?;
        let layer = fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_filter(level_filter(&config));
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init()
        .context("A global tracing subscriber is already installed")?;

    tracing::info!(level = %config.level, "Logging initialized");
    if let Some(guard) = &guard {
        tracing::info!(path = ?guard.path(), "Writing log file");
    }
    Ok(guard)
}
