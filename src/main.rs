//! # trajviz
//!
//! A command-line tool for converting taxi trip tables into per-taxi
//! trajectory files and exploring them as charts.
//!
//! ## Usage
//!
//! ```bash
//! # Convert a trip table into trajectory files
//! trajviz convert trips.csv trajectory_data
//!
//! # Explore the trajectory files interactively
//! trajviz visualize trajectory_data
//!
//! # Restart from a saved cache, skipping the directory scan
//! trajviz quick-start trajviz_state.json
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
