use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use trajviz::convert::convert_csv;

use crate::cli::config::Config;

/// Convert a trip table CSV into per-taxi trajectory files
pub fn run(
    input: PathBuf,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    interval_secs: Option<i64>,
    keep_missing: bool,
) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }

    let output = output.unwrap_or_else(|| PathBuf::from("trajectory_data"));

    let mut convert_config = Config::load(config.as_deref())?.convert_config();
    if let Some(interval) = interval_secs {
        convert_config.point_interval_secs = interval;
    }
    if keep_missing {
        convert_config.keep_missing = true;
    }

    info!("trajviz Converter - trip table to trajectory files");
    info!("==================================================");
    info!("Input:  {}", input.display());
    info!("Output: {}", output.display());
    info!("Point interval: {}s", convert_config.point_interval_secs);
    if convert_config.keep_missing {
        info!("Keeping trips flagged MISSING_DATA");
    }

    info!("Starting conversion...");
    let stats = convert_csv(&input, &output, &convert_config).context("Conversion failed")?;

    info!("Conversion complete!");
    info!("  Taxis: {}", stats.taxis);
    info!("  Trips converted: {}", stats.trips_converted);
    info!("  Trips skipped: {}", stats.trips_skipped);
    info!("  Points written: {}", stats.points_written);

    println!("Converted {stats}");
    println!("Trajectory files written to '{}'", output.display());

    Ok(())
}
