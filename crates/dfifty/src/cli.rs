//! Command line arguments

use std::path::PathBuf;

use clap::Parser;

/// Parsed command line
#[derive(Parser, Debug, Clone, Default, PartialEq)]
#[command(
    name = "dfifty",
    version,
    about = "DFifty - Projection Mapping Surface Editor"
)]
pub struct CliArgs {
    /// Project file to open (.json, .ron or .dfifty)
    pub project: Option<PathBuf>,

    /// Stop after this many frames; run until interrupted when absent
    #[arg(long, value_name = "N")]
    pub frames: Option<u64>,

    /// Write the last frame as PNG on exit
    #[arg(long, value_name = "PNG")]
    pub snapshot: Option<PathBuf>,

    /// Save the project to this file on exit
    #[arg(long, value_name = "PATH")]
    pub save: Option<PathBuf>,

    /// Disable periodic autosave
    #[arg(long)]
    pub no_autosave: bool,
}

impl CliArgs {
    /// Parse the process arguments
    pub fn from_env() -> Self {
        Self::parse().resolved()
    }

    /// A snapshot without a frame limit is taken after the first frame
    pub fn resolved(mut self) -> Self {
        if self.snapshot.is_some() && self.frames.is_none() {
            self.frames = Some(1);
        }
        self
    }
}
