//! The interactive exploration menu shared by `visualize` and `quick-start`.

use anyhow::{Context, Result};
use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;

use trajviz::cache;
use trajviz::plot::{self, PlotError};
use trajviz::state::VisualizationState;
use trajviz::stats::dataset_stats;

const MENU: &str = "\
==================================================
Taxi Trajectory Explorer
==================================================
1. Dataset statistics
2. Plot all trajectories
3. Plot all trajectories (colored by label)
4. Plot a specific taxi
5. Hourly label activity
6. Top 10 most active taxis
7. Save visualization state to cache
8. Exit";

/// Run the menu loop, reading selections from `input` until exit or EOF.
///
/// Charts are written under `out_dir`; the save action writes `cache_path`.
pub fn run(
    state: &mut VisualizationState,
    input: &mut dyn BufRead,
    out_dir: &Path,
    cache_path: &Path,
) -> Result<()> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create chart directory: {}", out_dir.display()))?;

    loop {
        println!("\n{MENU}");
        print!("\nSelect option (1-8): ");
        std::io::stdout().flush()?;

        let Some(choice) = read_line(input)? else {
            break;
        };

        match choice.as_str() {
            "1" => print!("\n{}", dataset_stats(state)),
            "2" => {
                let previous = state.render.color_by_label;
                state.render.color_by_label = false;
                let path = out_dir.join("overview.svg");
                render_chart(plot::render_overview(state, &path), path);
                state.render.color_by_label = previous;
            }
            "3" => {
                let previous = state.render.color_by_label;
                state.render.color_by_label = true;
                let path = out_dir.join("overview_labels.svg");
                render_chart(plot::render_overview(state, &path), path);
                state.render.color_by_label = previous;
            }
            "4" => {
                print!("Enter taxi ID: ");
                std::io::stdout().flush()?;
                let Some(raw) = read_line(input)? else {
                    break;
                };
                match raw.parse::<u64>() {
                    Ok(taxi_id) => {
                        let path = out_dir.join(format!("taxi_{taxi_id}.svg"));
                        render_chart(plot::render_taxi(state, taxi_id, &path), path);
                    }
                    Err(_) => println!("Invalid taxi ID"),
                }
            }
            "5" => {
                let path = out_dir.join("hourly_activity.svg");
                render_chart(plot::render_hourly_activity(state, &path), path);
            }
            "6" => {
                println!("\nTop 10 most active taxis:");
                for (taxi_id, count) in state.top_active(10) {
                    println!("  taxi {taxi_id}: {count} GPS points");
                }
            }
            "7" => match cache::save_cache(state, cache_path) {
                Ok(()) => println!("Saved to '{}'", cache_path.display()),
                Err(e) => println!("Failed to save cache: {e}"),
            },
            "8" => {
                println!("Goodbye!");
                break;
            }
            _ => println!("Invalid option. Please select 1-8."),
        }
    }

    Ok(())
}

/// Read one trimmed line. `None` means EOF.
fn read_line(input: &mut dyn BufRead) -> Result<Option<String>> {
    let mut buffer = String::new();
    if input.read_line(&mut buffer)? == 0 {
        return Ok(None);
    }
    Ok(Some(buffer.trim().to_string()))
}

fn render_chart(result: Result<(), PlotError>, path: std::path::PathBuf) {
    match result {
        Ok(()) => println!("Chart written to '{}'", path.display()),
        Err(e) => println!("Could not render chart: {e}"),
    }
}
