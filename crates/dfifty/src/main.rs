//! DFifty - Projection Mapping Surface Editor
//!
//! Headless front end: opens or seeds a project, runs the frame loop with
//! autosave and can write the last frame as a PNG snapshot.

#![warn(missing_docs)]

mod cli;
mod config;
mod interrupt;
mod logging_setup;
mod session;

use std::path::Path;
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use dfifty_core::Project;
use dfifty_io::{load_project, save_project, AutosaveSink, FileSink};
use dfifty_render::{PixmapCanvas, RenderScheduler};
use tracing::{error, info, warn};

use crate::cli::CliArgs;
use crate::config::UserConfig;
use crate::session::EditorSession;

fn main() -> Result<()> {
    let mut config = UserConfig::load();
    let _log_guard = logging_setup::init(&config.log)?;

    info!("==========================================");
    info!("===       DFifty Session Started       ===");
    info!("==========================================");

    let args = CliArgs::from_env();
    let project = open_project(&args, &mut config)?;

    let mut session = EditorSession::new(
        project,
        Some((config.canvas_width, config.canvas_height)),
    );
    match config.autosave_interval() {
        Some(interval) if !args.no_autosave => {
            info!(
                "Autosaving to {:?} every {}s",
                config.autosave_path,
                interval.as_secs()
            );
            let sink = FileSink::new(&config.autosave_path);
            session = session.with_autosave(AutosaveSink::new(Box::new(sink), interval));
        }
        _ => info!("Autosave disabled"),
    }

    let mut scheduler = RenderScheduler::new(config.target_fps);
    scheduler.start(Instant::now());
    interrupt::stop_on_interrupt(scheduler.stop_handle());

    run(&mut session, &mut scheduler, args.frames)?;
    finish(&mut session, &args)?;

    info!("DFifty session ended");
    Ok(())
}

fn open_project(args: &CliArgs, config: &mut UserConfig) -> Result<Project> {
    let mut project = match &args.project {
        Some(path) => {
            let project = load_project(path)
                .with_context(|| format!("Failed to open project {:?}", path))?;
            config.last_project = Some(path.clone());
            if let Err(e) = config.save() {
                error!("Failed to save config: {}", e);
            }
            project
        }
        None if config.seed_default_surfaces => Project::with_defaults(),
        None => Project::new(),
    };
    project.set_grid_size(config.grid_size);
    info!("Project has {} surfaces", project.surfaces().len());
    Ok(project)
}

/// Render until the frame limit is reached or the scheduler is stopped
fn run(
    session: &mut EditorSession,
    scheduler: &mut RenderScheduler,
    frame_limit: Option<u64>,
) -> Result<()> {
    loop {
        if frame_limit.is_some_and(|limit| scheduler.frame_count() >= limit) {
            scheduler.stop();
            break;
        }

        let now = Instant::now();
        if scheduler.poll(now) {
            session.render_frame()?;
            session.tick(now);
        }

        match scheduler.time_until_next(Instant::now()) {
            Some(wait) => thread::sleep(wait),
            None => break,
        }
    }
    Ok(())
}

/// Exit path: save, snapshot and final autosave
fn finish(session: &mut EditorSession, args: &CliArgs) -> Result<()> {
    if let Some(path) = &args.save {
        save_project(session.project(), path)
            .with_context(|| format!("Failed to save project to {:?}", path))?;
    }
    if let Some(path) = &args.snapshot {
        write_snapshot(session, path)?;
    }
    session.flush().context("Final autosave failed")
}

fn write_snapshot(session: &EditorSession, path: &Path) -> Result<()> {
    let Some(frame) = session.last_frame() else {
        warn!("No frame rendered, skipping snapshot");
        return Ok(());
    };
    let mut canvas = PixmapCanvas::new(frame.width(), frame.height())?;
    frame.replay(&mut canvas);
    canvas
        .save_png(path)
        .with_context(|| format!("Failed to write snapshot {:?}", path))
}
