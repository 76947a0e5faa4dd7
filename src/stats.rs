//! Dataset statistics over a visualization state.

use std::fmt;

use chrono::{NaiveDateTime, Timelike};

use crate::state::VisualizationState;
use crate::track::{Bounds, Label};

/// Summary statistics for a loaded dataset.
#[derive(Debug, Clone)]
pub struct DatasetStats {
    /// Total GPS points.
    pub total_points: usize,
    /// Distinct taxis.
    pub num_taxis: usize,
    /// Earliest and latest sample times.
    pub time_range: Option<(NaiveDateTime, NaiveDateTime)>,
    /// Bounding box over every point.
    pub bounds: Option<Bounds>,
    /// Point count per label, in `Label::ALL` order.
    pub label_counts: [usize; Label::ALL.len()],
    /// The ten most active taxis, descending by point count.
    pub top_taxis: Vec<(u64, usize)>,
}

/// Compute summary statistics for a state.
pub fn dataset_stats(state: &VisualizationState) -> DatasetStats {
    let mut label_counts = [0usize; Label::ALL.len()];
    for track in state.tracks() {
        for point in track.points() {
            label_counts[point.label.id() as usize] += 1;
        }
    }

    DatasetStats {
        total_points: state.num_points(),
        num_taxis: state.num_taxis(),
        time_range: state.time_range(),
        bounds: state.bounds(),
        label_counts,
        top_taxis: state.top_active(10),
    }
}

/// Point counts per hour of day and label, indexed `[hour][label id]`.
/// Feeds the hourly activity chart.
pub fn hourly_label_counts(state: &VisualizationState) -> [[u64; Label::ALL.len()]; 24] {
    let mut counts = [[0u64; Label::ALL.len()]; 24];
    for track in state.tracks() {
        for point in track.points() {
            counts[point.time.hour() as usize][point.label.id() as usize] += 1;
        }
    }
    counts
}

impl fmt::Display for DatasetStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dataset Statistics")?;
        writeln!(f, "==================")?;
        writeln!(f, "Total points: {}", self.total_points)?;
        writeln!(f, "Taxis: {}", self.num_taxis)?;

        if let Some((start, end)) = self.time_range {
            writeln!(f, "Time range: {start} to {end}")?;
        }
        if let Some(bounds) = self.bounds {
            writeln!(
                f,
                "Longitude range: {:.6} to {:.6}",
                bounds.min_lon, bounds.max_lon
            )?;
            writeln!(
                f,
                "Latitude range: {:.6} to {:.6}",
                bounds.min_lat, bounds.max_lat
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Label distribution:")?;
        for label in Label::ALL {
            let count = self.label_counts[label.id() as usize];
            if self.total_points > 0 {
                let percentage = count as f64 / self.total_points as f64 * 100.0;
                writeln!(f, "  {}: {} points ({:.1}%)", label.name(), count, percentage)?;
            } else {
                writeln!(f, "  {}: 0 points", label.name())?;
            }
        }

        if !self.top_taxis.is_empty() {
            writeln!(f)?;
            writeln!(f, "Most active taxis:")?;
            for (taxi_id, count) in &self.top_taxis {
                writeln!(f, "  taxi {taxi_id}: {count} points")?;
            }
        }

        Ok(())
    }
}
