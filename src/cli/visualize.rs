use anyhow::{Context, Result};
use log::info;
use std::io;
use std::path::PathBuf;

use trajviz::state::load_directory;

use crate::cli::config::Config;
use crate::cli::menu;

/// Load a trajectory directory and explore it interactively
pub fn run(
    dir: PathBuf,
    out_dir: PathBuf,
    cache: PathBuf,
    config: Option<PathBuf>,
    max_points: Option<usize>,
    color_by_label: bool,
) -> Result<()> {
    let mut render = Config::load(config.as_deref())?.render_config();
    if let Some(max_points) = max_points {
        render.max_points = max_points;
    }
    if color_by_label {
        render.color_by_label = true;
    }

    info!("Loading trajectories from {}...", dir.display());
    let mut state = load_directory(&dir, render)
        .with_context(|| format!("Failed to load trajectory directory: {}", dir.display()))?;

    if state.is_empty() {
        anyhow::bail!("No trajectory data found in {}", dir.display());
    }

    println!(
        "Loaded {} GPS points from {} taxis",
        state.num_points(),
        state.num_taxis()
    );

    let stdin = io::stdin();
    let mut input = stdin.lock();
    menu::run(&mut state, &mut input, &out_dir, &cache)
}
