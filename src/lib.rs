//! # trajviz - Taxi Trajectory Conversion and Visualization
//!
//! `trajviz` turns a taxi trip table (Porto dataset CSV layout) into a
//! per-taxi tree of plain-text trajectory files, loads those files back into
//! an in-memory visualization state, and renders the state to SVG charts.
//! The full state can be cached to a versioned file and restored later,
//! skipping the directory scan.
//!
//! ## Pipeline
//!
//! ```text
//! trips.csv --convert--> trajectory_data/ --visualize--> charts/*.svg
//!                             |                               ^
//!                             +------ cache save/load --------+
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use trajviz::convert::{convert_csv, ConvertConfig};
//! use trajviz::state::{load_directory, RenderConfig};
//! use trajviz::{cache, plot};
//!
//! // Convert the trip table into per-taxi trajectory files.
//! let stats = convert_csv(
//!     Path::new("trips.csv"),
//!     Path::new("trajectory_data"),
//!     &ConvertConfig::default(),
//! )?;
//! println!("converted: {stats}");
//!
//! // Load the files into a visualization state and render an overview.
//! let state = load_directory(Path::new("trajectory_data"), RenderConfig::default())?;
//! plot::render_overview(&state, Path::new("overview.svg"))?;
//!
//! // Cache the state for fast restarts.
//! cache::save_cache(&state, Path::new("trajviz_state.json"))?;
//! let restored = cache::load_cache(Path::new("trajviz_state.json"))?;
//! assert_eq!(restored, state);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## File Layouts
//!
//! The converter writes one directory per taxi:
//!
//! ```text
//! trajectory_data/
//! ├── taxi_001/
//! │   ├── Trajectory/
//! │   │   ├── 20130701083000.plt    # one file per trip, named by start time
//! │   │   └── ...
//! │   └── labels.txt                # time interval -> location type
//! └── taxi_002/...
//! ```
//!
//! Each `.plt` file carries six fixed header lines followed by one
//! `lat,lon,0,alt,days,date,time` row per point. The cache file is a JSON
//! envelope tagged with [`cache::CACHE_FORMAT_VERSION`]; loading a cache
//! written by an incompatible version is an explicit error, never a silent
//! empty state.
//!
//! ## Architecture
//!
//! - [`record`]: trip table row parsing (CSV + embedded JSON polylines)
//! - [`track`]: core trajectory types and labels
//! - [`plt`]: the plain-text trajectory and labels file formats
//! - [`convert`]: CSV to trajectory-directory conversion
//! - [`state`]: the visualization state and directory loader
//! - [`stats`]: dataset statistics
//! - [`cache`]: versioned state cache
//! - [`plot`]: SVG chart rendering
//! - [`validator`]: trajectory directory integrity checks

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod cache;
pub mod convert;
pub mod plot;
pub mod plt;
pub mod record;
pub mod state;
pub mod stats;
pub mod track;
pub mod validator;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::cache::{load_cache, save_cache, CacheError, CACHE_FORMAT_VERSION};
    pub use crate::convert::{convert_csv, ConvertConfig, ConvertError, ConvertStats};
    pub use crate::plot::{render_hourly_activity, render_overview, render_taxi, PlotError};
    pub use crate::plt::{PltError, PLT_HEADER, PLT_HEADER_LINES};
    pub use crate::record::{RecordError, TripRecord};
    pub use crate::state::{load_directory, RenderConfig, StateError, VisualizationState};
    pub use crate::stats::{dataset_stats, hourly_label_counts, DatasetStats};
    pub use crate::track::{
        Bounds, GpsPoint, Label, LabelSpan, TaxiTrack, TrackPoint, PORTO_BOUNDS,
        POINT_INTERVAL_SECS,
    };
    pub use crate::validator::{
        validate_directory, CheckStatus, ValidateOptions, ValidationCheck, ValidationError,
        ValidationReport,
    };
}
