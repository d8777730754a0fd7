//! Cutline - command-line timeline editor
//!
//! Loads a project file, applies one edit and saves it back.

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use cutline_core::RationalTime;
use cutline_timeline::TrackKind;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "cutline", version, about = "Edit Cutline timeline projects")]
pub struct Cli {
    /// Config file (defaults to <config dir>/cutline/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a project, optionally seeded from a video file
    New {
        file: PathBuf,
        #[arg(long)]
        name: Option<String>,
        /// Video to seed the timeline with
        #[arg(long, requires = "duration")]
        media: Option<String>,
        /// Media length, e.g. `90`, `12.5`, `1:30`
        #[arg(long, requires = "media")]
        duration: Option<RationalTime>,
    },
    /// Show tracks, clips and markers
    Info { file: PathBuf },
    /// Append a track of the given kind
    AddTrack { file: PathBuf, kind: TrackKind },
    /// Split a clip at an absolute time
    Split {
        file: PathBuf,
        clip_id: Uuid,
        at: RationalTime,
    },
    /// Duplicate a clip after itself
    Duplicate { file: PathBuf, clip_id: Uuid },
    /// Move a clip to a new start time
    Move {
        file: PathBuf,
        clip_id: Uuid,
        #[arg(allow_hyphen_values = true)]
        start: RationalTime,
    },
    /// Delete a clip
    Delete { file: PathBuf, clip_id: Uuid },
    /// Add or remove ruler markers
    Marker {
        file: PathBuf,
        action: MarkerAction,
        time: RationalTime,
    },
    /// Estimate the export size
    ExportEstimate {
        /// Platform preset, e.g. `youtube` or `tiktok`
        #[arg(long)]
        preset: Option<String>,
        #[arg(long)]
        duration: RationalTime,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerAction {
    Add,
    Remove,
}

fn init_logging(verbose: u8) -> Result<()> {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;
    info!("Cutline {} starting", env!("CARGO_PKG_VERSION"));

    let config = config::EditorConfig::load(cli.config.as_deref())?;
    let stdout = std::io::stdout();
    commands::run(cli.command, &config, &mut stdout.lock())
}
