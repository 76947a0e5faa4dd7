use anyhow::{Context, Result};
use std::io;
use std::path::PathBuf;

use trajviz::cache::load_cache;

use crate::cli::menu;

/// Restore a cached visualization state and explore it interactively
pub fn run(cache: PathBuf, out_dir: PathBuf) -> Result<()> {
    let mut state = load_cache(&cache)
        .with_context(|| format!("Failed to load cache file: {}", cache.display()))?;

    println!(
        "Loaded {} GPS points from {} taxis (cache: {})",
        state.num_points(),
        state.num_taxis(),
        cache.display()
    );

    let stdin = io::stdin();
    let mut input = stdin.lock();
    menu::run(&mut state, &mut input, &out_dir, &cache)
}
