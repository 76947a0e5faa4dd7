use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod config;
mod convert;
mod info;
mod menu;
mod quickstart;
mod validate;
mod visualize;

/// trajviz - Taxi Trajectory Converter and Visualizer
#[derive(Parser)]
#[command(name = "trajviz")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a trip table CSV into per-taxi trajectory files
    Convert {
        /// Input trip table CSV path
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output trajectory directory (defaults to trajectory_data)
        #[arg(value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Seconds between consecutive polyline points
        #[arg(short = 'i', long)]
        interval_secs: Option<i64>,

        /// Convert trips flagged MISSING_DATA instead of skipping them
        #[arg(long)]
        keep_missing: bool,
    },

    /// Load a trajectory directory and explore it interactively
    Visualize {
        /// Trajectory directory produced by `convert`
        #[arg(value_name = "DIR", default_value = "trajectory_data")]
        dir: PathBuf,

        /// Directory where rendered charts are written
        #[arg(short = 'o', long, default_value = "charts")]
        out_dir: PathBuf,

        /// Cache file path used by the save-to-cache menu action
        #[arg(long, default_value = "trajviz_state.json")]
        cache: PathBuf,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Overview charts down-sample to at most this many points
        #[arg(long)]
        max_points: Option<usize>,

        /// Color points by location label
        #[arg(long)]
        color_by_label: bool,
    },

    /// Restore a cached visualization state and explore it interactively
    QuickStart {
        /// Cache file written by the visualize menu
        #[arg(value_name = "CACHE", default_value = "trajviz_state.json")]
        cache: PathBuf,

        /// Directory where rendered charts are written
        #[arg(short = 'o', long, default_value = "charts")]
        out_dir: PathBuf,
    },

    /// Display statistics about a trajectory directory or cache file
    Info {
        /// Trajectory directory or cache file path
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },

    /// Validate trajectory directory integrity
    Validate {
        /// Trajectory directory path
        #[arg(value_name = "DIR", default_value = "trajectory_data")]
        dir: PathBuf,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Convert {
            input,
            output,
            config,
            interval_secs,
            keep_missing,
        } => convert::run(input, output, config, interval_secs, keep_missing),
        Commands::Visualize {
            dir,
            out_dir,
            cache,
            config,
            max_points,
            color_by_label,
        } => visualize::run(dir, out_dir, cache, config, max_points, color_by_label),
        Commands::QuickStart { cache, out_dir } => quickstart::run(cache, out_dir),
        Commands::Info { path } => info::run(path),
        Commands::Validate { dir, config } => validate::run(dir, config),
    }
}
