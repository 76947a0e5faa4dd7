//! Chart rendering for visualization states.
//!
//! All charts are written as SVG files: a scatter overview of every
//! trajectory, a single-taxi path view, and an hourly label activity chart.

use std::path::Path;

use plotters::prelude::*;

use crate::state::VisualizationState;
use crate::stats::hourly_label_counts;
use crate::track::{Label, TrackPoint};

/// Errors raised while rendering a chart.
#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    /// There is nothing to draw.
    #[error("nothing to draw: {0}")]
    Empty(String),

    /// The drawing backend failed.
    #[error("chart backend error: {0}")]
    Backend(String),
}

fn backend_err(e: impl std::fmt::Display) -> PlotError {
    PlotError::Backend(e.to_string())
}

fn label_color(label: Label) -> RGBColor {
    match label {
        Label::TaxiStand => RGBColor(31, 119, 180),
        Label::TaxiCentral => RGBColor(214, 39, 40),
        Label::TaxiStreet => RGBColor(44, 160, 44),
        Label::Unknown => RGBColor(128, 128, 128),
    }
}

/// Deterministic down-sampling stride so overview charts stay within the
/// configured point budget.
fn sample_stride(total: usize, max_points: usize) -> usize {
    if max_points == 0 || total <= max_points {
        1
    } else {
        total.div_ceil(max_points)
    }
}

/// Render a scatter overview of every trajectory in the state.
pub fn render_overview(state: &VisualizationState, path: &Path) -> Result<(), PlotError> {
    let bounds = state
        .bounds()
        .ok_or_else(|| PlotError::Empty("state holds no points".to_string()))?
        .padded(0.05);

    let total = state.num_points();
    let stride = sample_stride(total, state.render.max_points);

    let root = SVGBackend::new(path, (state.render.width, state.render.height))
        .into_drawing_area();
    root.fill(&WHITE).map_err(backend_err)?;

    let title = if state.render.color_by_label {
        "Taxi Trajectories (colored by location type)"
    } else {
        "Taxi Trajectories"
    };

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 30))
        .margin(10)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(bounds.min_lon..bounds.max_lon, bounds.min_lat..bounds.max_lat)
        .map_err(backend_err)?;

    chart
        .configure_mesh()
        .x_desc("Longitude")
        .y_desc("Latitude")
        .draw()
        .map_err(backend_err)?;

    if state.render.color_by_label {
        for label in Label::ALL {
            let color = label_color(label);
            let points: Vec<(f64, f64)> = state
                .tracks()
                .flat_map(|t| t.points())
                .filter(|p| p.label == label)
                .step_by(stride)
                .map(|p| (p.lon, p.lat))
                .collect();
            if points.is_empty() {
                continue;
            }

            let count = points.len();
            chart
                .draw_series(
                    points
                        .into_iter()
                        .map(|xy| Circle::new(xy, 1, color.filled())),
                )
                .map_err(backend_err)?
                .label(format!("{} ({count} points)", label.name()))
                .legend(move |(x, y)| Circle::new((x + 5, y), 3, color.filled()));
        }

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.7))
            .border_style(&BLACK.mix(0.3))
            .position(SeriesLabelPosition::UpperRight)
            .draw()
            .map_err(backend_err)?;
    } else {
        let color = RGBColor(31, 119, 180);
        chart
            .draw_series(
                state
                    .tracks()
                    .flat_map(|t| t.points())
                    .step_by(stride)
                    .map(|p| Circle::new((p.lon, p.lat), 1, color.filled())),
            )
            .map_err(backend_err)?;
    }

    root.present().map_err(backend_err)
}

/// Render one taxi's path as a connected line with point markers.
pub fn render_taxi(
    state: &VisualizationState,
    taxi_id: u64,
    path: &Path,
) -> Result<(), PlotError> {
    let track = state
        .track(taxi_id)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| PlotError::Empty(format!("no data for taxi {taxi_id}")))?;

    let bounds = track
        .bounds()
        .ok_or_else(|| PlotError::Empty(format!("no data for taxi {taxi_id}")))?
        .padded(0.05);

    let root = SVGBackend::new(path, (state.render.width, state.render.height))
        .into_drawing_area();
    root.fill(&WHITE).map_err(backend_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Taxi {taxi_id} Trajectory"), ("sans-serif", 30))
        .margin(10)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(bounds.min_lon..bounds.max_lon, bounds.min_lat..bounds.max_lat)
        .map_err(backend_err)?;

    chart
        .configure_mesh()
        .x_desc("Longitude")
        .y_desc("Latitude")
        .draw()
        .map_err(backend_err)?;

    if state.render.color_by_label {
        for label in Label::ALL {
            let color = label_color(label);
            let points: Vec<&TrackPoint> =
                track.points().iter().filter(|p| p.label == label).collect();
            if points.is_empty() {
                continue;
            }

            let count = points.len();
            chart
                .draw_series(
                    points
                        .into_iter()
                        .map(|p| Circle::new((p.lon, p.lat), 3, color.filled())),
                )
                .map_err(backend_err)?
                .label(format!("{} ({count} points)", label.name()))
                .legend(move |(x, y)| Circle::new((x + 5, y), 3, color.filled()));
        }

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.7))
            .border_style(&BLACK.mix(0.3))
            .position(SeriesLabelPosition::UpperRight)
            .draw()
            .map_err(backend_err)?;
    } else {
        let color = RGBColor(214, 39, 40);
        chart
            .draw_series(LineSeries::new(
                track.points().iter().map(|p| (p.lon, p.lat)),
                &color,
            ))
            .map_err(backend_err)?;
        chart
            .draw_series(
                track
                    .points()
                    .iter()
                    .map(|p| Circle::new((p.lon, p.lat), 2, color.filled())),
            )
            .map_err(backend_err)?;
    }

    root.present().map_err(backend_err)
}

/// Render point counts per hour of day, one line per location label.
pub fn render_hourly_activity(state: &VisualizationState, path: &Path) -> Result<(), PlotError> {
    if state.num_points() == 0 {
        return Err(PlotError::Empty("state holds no points".to_string()));
    }

    let counts = hourly_label_counts(state);
    let y_max = counts
        .iter()
        .flat_map(|row| row.iter())
        .copied()
        .max()
        .unwrap_or(0)
        .max(1) as f64;

    let root = SVGBackend::new(path, (state.render.width, state.render.height))
        .into_drawing_area();
    root.fill(&WHITE).map_err(backend_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Location Types by Hour of Day", ("sans-serif", 30))
        .margin(10)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(0.0..23.0, 0.0..y_max * 1.1)
        .map_err(backend_err)?;

    chart
        .configure_mesh()
        .x_desc("Hour of day")
        .y_desc("Points")
        .x_label_formatter(&|v| format!("{v:.0}"))
        .y_label_formatter(&|v| format!("{v:.0}"))
        .draw()
        .map_err(backend_err)?;

    for label in Label::ALL {
        let idx = label.id() as usize;
        if counts.iter().all(|row| row[idx] == 0) {
            continue;
        }

        let color = label_color(label);
        chart
            .draw_series(LineSeries::new(
                counts
                    .iter()
                    .enumerate()
                    .map(|(hour, row)| (hour as f64, row[idx] as f64)),
                &color,
            ))
            .map_err(backend_err)?
            .label(label.name())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color)
            });
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.7))
        .border_style(&BLACK.mix(0.3))
        .position(SeriesLabelPosition::UpperRight)
        .draw()
        .map_err(backend_err)?;

    root.present().map_err(backend_err)
}
