//! The in-memory visualization state and the trajectory directory loader.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::plt;
use crate::track::{apply_labels, Bounds, TaxiTrack, TrackPoint};

/// Rendering configuration carried inside the visualization state so that a
/// cached state restores with the same view parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Chart width in pixels.
    pub width: u32,
    /// Chart height in pixels.
    pub height: u32,
    /// Overview charts down-sample to at most this many points.
    pub max_points: usize,
    /// Color points by location label instead of a single hue.
    pub color_by_label: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            width: 1500,
            height: 1000,
            max_points: 100_000,
            color_by_label: false,
        }
    }
}

/// Errors raised while loading a trajectory directory.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// I/O failure scanning the directory tree.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The given path is not a directory.
    #[error("{0} is not a directory")]
    NotADirectory(std::path::PathBuf),
}

/// Everything the rendering step consumes: all tracks plus the render
/// configuration. Serializable wholesale into the cache file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualizationState {
    /// Render settings used for all charts produced from this state.
    pub render: RenderConfig,
    tracks: BTreeMap<u64, TaxiTrack>,
}

impl VisualizationState {
    /// An empty state with the given render settings.
    pub fn new(render: RenderConfig) -> VisualizationState {
        VisualizationState {
            render,
            tracks: BTreeMap::new(),
        }
    }

    /// Insert or replace a taxi's track.
    pub fn insert_track(&mut self, track: TaxiTrack) {
        self.tracks.insert(track.taxi_id, track);
    }

    /// All tracks, ordered by taxi id.
    pub fn tracks(&self) -> impl Iterator<Item = &TaxiTrack> {
        self.tracks.values()
    }

    /// Look up one taxi's track.
    pub fn track(&self, taxi_id: u64) -> Option<&TaxiTrack> {
        self.tracks.get(&taxi_id)
    }

    /// Taxi ids present in the state, ascending.
    pub fn taxi_ids(&self) -> Vec<u64> {
        self.tracks.keys().copied().collect()
    }

    /// Number of taxis.
    pub fn num_taxis(&self) -> usize {
        self.tracks.len()
    }

    /// Total number of points across all tracks.
    pub fn num_points(&self) -> usize {
        self.tracks.values().map(TaxiTrack::len).sum()
    }

    /// Whether the state holds no tracks.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Bounding box over every point in the state.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut merged: Option<Bounds> = None;
        for track in self.tracks.values() {
            if let Some(bounds) = track.bounds() {
                match merged.as_mut() {
                    Some(m) => {
                        m.include(bounds.min_lon, bounds.min_lat);
                        m.include(bounds.max_lon, bounds.max_lat);
                    }
                    None => merged = Some(bounds),
                }
            }
        }
        merged
    }

    /// Earliest and latest sample times across all tracks.
    pub fn time_range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let mut merged: Option<(NaiveDateTime, NaiveDateTime)> = None;
        for track in self.tracks.values() {
            if let Some((start, end)) = track.time_range() {
                merged = Some(match merged {
                    Some((lo, hi)) => (lo.min(start), hi.max(end)),
                    None => (start, end),
                });
            }
        }
        merged
    }

    /// The `n` taxis with the most points, descending.
    pub fn top_active(&self, n: usize) -> Vec<(u64, usize)> {
        let mut counts: Vec<(u64, usize)> = self
            .tracks
            .iter()
            .map(|(id, track)| (*id, track.len()))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        counts.truncate(n);
        counts
    }
}

/// Read every `taxi_*` directory under `dir` into a visualization state.
///
/// Unreadable or empty trajectory files are logged and skipped; a taxi with
/// no valid points is dropped entirely. The rendered state therefore
/// reflects exactly the readable path files on disk at load time.
pub fn load_directory(dir: &Path, render: RenderConfig) -> Result<VisualizationState, StateError> {
    if !dir.is_dir() {
        return Err(StateError::NotADirectory(dir.to_path_buf()));
    }

    let mut taxi_dirs: Vec<(u64, std::path::PathBuf)> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name();
        let Some(id_part) = name.to_string_lossy().strip_prefix("taxi_").map(str::to_owned)
        else {
            continue;
        };
        match id_part.parse::<u64>() {
            Ok(taxi_id) => taxi_dirs.push((taxi_id, entry.path())),
            Err(_) => warn!("ignoring directory with unparseable taxi id: {:?}", name),
        }
    }
    taxi_dirs.sort();

    let mut state = VisualizationState::new(render);
    let total = taxi_dirs.len();

    for (index, (taxi_id, taxi_dir)) in taxi_dirs.into_iter().enumerate() {
        info!("[{}/{}] processing taxi {}", index + 1, total, taxi_id);

        match load_taxi(taxi_id, &taxi_dir)? {
            Some(track) => state.insert_track(track),
            None => warn!("no valid trajectory files in {}", taxi_dir.display()),
        }
    }

    info!(
        "loaded {} GPS points from {} taxis",
        state.num_points(),
        state.num_taxis()
    );

    Ok(state)
}

/// Read one taxi directory. Returns `None` when no usable points are found.
fn load_taxi(taxi_id: u64, taxi_dir: &Path) -> Result<Option<TaxiTrack>, StateError> {
    // Trip files live under Trajectory/, with a fallback to the taxi
    // directory itself for flat layouts.
    let trajectory_dir = taxi_dir.join("Trajectory");
    let scan_dir = if trajectory_dir.is_dir() {
        trajectory_dir
    } else {
        taxi_dir.to_path_buf()
    };

    let mut points: Vec<TrackPoint> = Vec::new();
    let mut files: Vec<std::path::PathBuf> = fs::read_dir(&scan_dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "plt"))
        .collect();
    files.sort();

    for file in files {
        match plt::read_trip_file(&file) {
            Ok(trip_points) if trip_points.is_empty() => {
                warn!("empty trajectory file {}", file.display());
            }
            Ok(trip_points) => points.extend(trip_points),
            Err(e) => warn!("error reading {}: {}", file.display(), e),
        }
    }

    if points.is_empty() {
        return Ok(None);
    }

    let mut track = TaxiTrack::from_points(taxi_id, points);

    let labels_file = taxi_dir.join("labels.txt");
    if labels_file.is_file() {
        match plt::read_labels_file(&labels_file) {
            Ok(spans) => apply_labels(track.points_mut(), &spans),
            Err(e) => warn!("error reading {}: {}", labels_file.display(), e),
        }
    }

    Ok(Some(track))
}
