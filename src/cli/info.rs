use anyhow::{Context, Result};
use std::path::PathBuf;

use trajviz::cache::load_cache;
use trajviz::state::{load_directory, RenderConfig};
use trajviz::stats::dataset_stats;

/// Display statistics about a trajectory directory or cache file
pub fn run(path: PathBuf) -> Result<()> {
    let state = if path.is_file() {
        load_cache(&path)
            .with_context(|| format!("Failed to load cache file: {}", path.display()))?
    } else if path.is_dir() {
        load_directory(&path, RenderConfig::default())
            .with_context(|| format!("Failed to load trajectory directory: {}", path.display()))?
    } else {
        anyhow::bail!("Path does not exist: {}", path.display());
    };

    println!("Source: {}", path.display());
    println!();
    print!("{}", dataset_stats(&state));

    Ok(())
}
