//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Selene command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "selene", about = "Selene planet renderer")]
pub struct CliArgs {
    /// Directory holding the tile assets.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Maximum tile subdivisions per frame.
    #[arg(long)]
    pub subdivide_limit: Option<u32>,

    /// Deepest tile level the tree may reach.
    #[arg(long)]
    pub max_level: Option<u8>,

    /// Fetch worker threads (0 = size for the host).
    #[arg(long)]
    pub threads: Option<usize>,

    /// Number of frames to simulate.
    #[arg(long)]
    pub frames: Option<u32>,

    /// Tint tiles by subdivision level.
    #[arg(long)]
    pub level_colors: Option<bool>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref dir) = args.data_dir {
            self.planet.data_dir = dir.clone();
        }
        if let Some(limit) = args.subdivide_limit {
            self.lod.subdivide_limit = limit;
        }
        if let Some(level) = args.max_level {
            self.lod.max_level = level;
        }
        if let Some(threads) = args.threads {
            self.fetch.threads = threads;
        }
        if let Some(frames) = args.frames {
            self.demo.frames = frames;
        }
        if let Some(colors) = args.level_colors {
            self.debug.level_colors = colors;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
