//! The converter: trip table CSV in, per-taxi trajectory file tree out.
//!
//! Rows are grouped by `TAXI_ID`; each taxi gets a
//! `taxi_<id>/Trajectory/<start-time>.plt` file per trip plus a
//! `labels.txt` covering the trip intervals. Grouping and trip ordering are
//! deterministic, so re-running on the same input reproduces the same bytes.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use chrono::{Duration, NaiveDateTime};
use log::{debug, info};

use crate::plt::{self, PltError};
use crate::record::{RecordError, TripRecord};
use crate::track::{GpsPoint, LabelSpan, POINT_INTERVAL_SECS};

/// Converter settings.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Seconds between consecutive polyline points.
    pub point_interval_secs: i64,
    /// Convert trips flagged `MISSING_DATA = True` instead of skipping them.
    pub keep_missing: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        ConvertConfig {
            point_interval_secs: POINT_INTERVAL_SECS,
            keep_missing: false,
        }
    }
}

/// Statistics from a completed conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertStats {
    /// Number of distinct taxis that produced at least one trajectory file.
    pub taxis: usize,
    /// Trips written out.
    pub trips_converted: usize,
    /// Trips skipped (empty polyline or flagged missing data).
    pub trips_skipped: usize,
    /// Total GPS points written.
    pub points_written: usize,
}

impl fmt::Display for ConvertStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} trips from {} taxis, {} points written, {} trips skipped",
            self.trips_converted, self.taxis, self.points_written, self.trips_skipped
        )
    }
}

/// Errors that can occur during conversion.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// I/O error creating directories or files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input table could not be read or a row failed to deserialize.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A row carried an uninterpretable value.
    #[error("record error: {0}")]
    Record(#[from] RecordError),

    /// A trajectory or labels file could not be written.
    #[error("trajectory file error: {0}")]
    Plt(#[from] PltError),
}

/// One trip ready to be written: start time, decoded polyline, label span.
struct PreparedTrip {
    trip_id: u64,
    start: NaiveDateTime,
    points: Vec<GpsPoint>,
    span: LabelSpan,
}

/// Convert a trip table into a trajectory directory.
///
/// Creates `output_dir` if needed. One `taxi_<id>` subdirectory is produced
/// per distinct taxi id with at least one usable trip.
pub fn convert_csv(
    input: &Path,
    output_dir: &Path,
    config: &ConvertConfig,
) -> Result<ConvertStats, ConvertError> {
    let mut reader = csv::Reader::from_path(input)?;
    let mut stats = ConvertStats::default();

    // Group usable trips by taxi id. BTreeMap keeps the output order (and
    // therefore the produced bytes) stable across runs.
    let mut by_taxi: BTreeMap<u64, Vec<PreparedTrip>> = BTreeMap::new();

    for row in reader.deserialize() {
        let record: TripRecord = row?;

        if record.missing_data && !config.keep_missing {
            debug!("skipping trip {}: flagged missing data", record.trip_id);
            stats.trips_skipped += 1;
            continue;
        }

        let points = record.parse_polyline()?;
        if points.is_empty() {
            debug!("skipping trip {}: empty polyline", record.trip_id);
            stats.trips_skipped += 1;
            continue;
        }

        let start = record.start_time()?;
        let end = start + Duration::seconds(points.len() as i64 * config.point_interval_secs);
        let span = LabelSpan {
            start,
            end,
            label: record.label(),
        };

        by_taxi.entry(record.taxi_id).or_default().push(PreparedTrip {
            trip_id: record.trip_id,
            start,
            points,
            span,
        });
    }

    fs::create_dir_all(output_dir)?;

    for (taxi_id, mut trips) in by_taxi {
        trips.sort_by_key(|t| (t.start, t.trip_id));

        let taxi_dir = output_dir.join(format!("taxi_{taxi_id:03}"));
        let trajectory_dir = taxi_dir.join("Trajectory");
        fs::create_dir_all(&trajectory_dir)?;

        let mut spans = Vec::with_capacity(trips.len());
        for trip in &trips {
            let filename = format!("{}.plt", trip.start.format("%Y%m%d%H%M%S"));
            plt::write_trip_file(
                &trajectory_dir.join(filename),
                trip.start,
                &trip.points,
                config.point_interval_secs,
            )?;
            spans.push(trip.span);

            stats.trips_converted += 1;
            stats.points_written += trip.points.len();
        }

        plt::write_labels_file(&taxi_dir.join("labels.txt"), &spans)?;

        info!("created trajectory files for taxi {taxi_id}");
        stats.taxis += 1;
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const HEADER: &str =
        "TRIP_ID,CALL_TYPE,ORIGIN_CALL,ORIGIN_STAND,TAXI_ID,TIMESTAMP,DAY_TYPE,MISSING_DATA,POLYLINE";

    fn write_input(dir: &Path, rows: &[&str]) -> std::path::PathBuf {
        let path = dir.join("trips.csv");
        let mut body = String::from(HEADER);
        for row in rows {
            body.push('\n');
            body.push_str(row);
        }
        body.push('\n');
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_one_directory_per_taxi() {
        let dir = tempdir().unwrap();
        let input = write_input(
            dir.path(),
            &[
                "10,C,,,1,1372636858,A,False,\"[[-8.61,41.14],[-8.62,41.15]]\"",
                "11,C,,,1,1372640000,A,False,\"[[-8.63,41.16]]\"",
                "12,B,,15,2,1372636000,A,False,\"[[-8.60,41.13]]\"",
            ],
        );
        let out = dir.path().join("trajectory_data");

        let stats = convert_csv(&input, &out, &ConvertConfig::default()).unwrap();
        assert_eq!(stats.taxis, 2);
        assert_eq!(stats.trips_converted, 3);
        assert_eq!(stats.trips_skipped, 0);
        assert_eq!(stats.points_written, 4);

        assert!(out.join("taxi_001/Trajectory").is_dir());
        assert!(out.join("taxi_002/Trajectory").is_dir());
        assert!(out.join("taxi_001/labels.txt").is_file());

        let plt_files: Vec<_> = fs::read_dir(out.join("taxi_001/Trajectory"))
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(plt_files.len(), 2);
    }

    #[test]
    fn test_points_are_time_ordered_in_output() {
        let dir = tempdir().unwrap();
        let input = write_input(
            dir.path(),
            &["10,A,7,,1,1372636858,A,False,\"[[-8.61,41.14],[-8.62,41.15],[-8.63,41.16]]\""],
        );
        let out = dir.path().join("out");
        convert_csv(&input, &out, &ConvertConfig::default()).unwrap();

        let trajectory_dir = out.join("taxi_001/Trajectory");
        let entry = fs::read_dir(&trajectory_dir).unwrap().next().unwrap().unwrap();
        let points = crate::plt::read_trip_file(&entry.path()).unwrap();

        assert_eq!(points.len(), 3);
        assert!(points.windows(2).all(|w| w[0].time < w[1].time));
        assert_eq!((points[1].time - points[0].time).num_seconds(), 15);
    }

    #[test]
    fn test_skips_empty_polylines_and_missing_data() {
        let dir = tempdir().unwrap();
        let input = write_input(
            dir.path(),
            &[
                "10,C,,,1,1372636858,A,False,\"[]\"",
                "11,C,,,1,1372640000,A,True,\"[[-8.63,41.16]]\"",
                "12,C,,,2,1372641000,A,False,\"[[-8.60,41.13]]\"",
            ],
        );
        let out = dir.path().join("out");

        let stats = convert_csv(&input, &out, &ConvertConfig::default()).unwrap();
        assert_eq!(stats.trips_converted, 1);
        assert_eq!(stats.trips_skipped, 2);
        assert_eq!(stats.taxis, 1);
        assert!(!out.join("taxi_001").exists());
    }

    #[test]
    fn test_conversion_is_idempotent() {
        let dir = tempdir().unwrap();
        let input = write_input(
            dir.path(),
            &[
                "10,C,,,1,1372636858,A,False,\"[[-8.61,41.14],[-8.62,41.15]]\"",
                "12,B,,15,2,1372636000,A,False,\"[[-8.60,41.13]]\"",
            ],
        );
        let out = dir.path().join("out");

        convert_csv(&input, &out, &ConvertConfig::default()).unwrap();
        let file = out.join("taxi_001/labels.txt");
        let first = fs::read(&file).unwrap();

        convert_csv(&input, &out, &ConvertConfig::default()).unwrap();
        assert_eq!(fs::read(&file).unwrap(), first);
    }

    #[test]
    fn test_header_only_input_succeeds_with_no_output() {
        let dir = tempdir().unwrap();
        let input = write_input(dir.path(), &[]);
        let out = dir.path().join("out");

        let stats = convert_csv(&input, &out, &ConvertConfig::default()).unwrap();
        assert_eq!(stats.taxis, 0);
        assert!(out.is_dir());
        assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
    }

    #[test]
    fn test_unreadable_input_is_an_error() {
        let dir = tempdir().unwrap();
        let result = convert_csv(
            &dir.path().join("nope.csv"),
            &dir.path().join("out"),
            &ConvertConfig::default(),
        );
        assert!(result.is_err());
    }
}
