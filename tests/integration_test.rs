//! Integration tests for trajviz
//!
//! These tests verify the full pipeline from trip table CSV to trajectory
//! files, loaded visualization state, rendered charts, and the state cache.

use std::fs;
use tempfile::tempdir;
use trajviz::cache::{load_cache, save_cache, CacheError};
use trajviz::convert::{convert_csv, ConvertConfig};
use trajviz::plot::{render_hourly_activity, render_overview, render_taxi};
use trajviz::state::{load_directory, RenderConfig};
use trajviz::stats::dataset_stats;
use trajviz::track::Label;
use trajviz::validator::{validate_directory, ValidateOptions};

const CSV_HEADER: &str =
    "TRIP_ID,CALL_TYPE,ORIGIN_CALL,ORIGIN_STAND,TAXI_ID,TIMESTAMP,DAY_TYPE,MISSING_DATA,POLYLINE";

fn write_csv(path: &std::path::Path, rows: &[&str]) {
    let mut content = String::from(CSV_HEADER);
    for row in rows {
        content.push('\n');
        content.push_str(row);
    }
    content.push('\n');
    fs::write(path, content).unwrap();
}

/// Test the complete convert-load-cache cycle
#[test]
fn test_full_pipeline() {
    let dir = tempdir().unwrap();
    let csv_path = dir.path().join("trips.csv");
    let traj_dir = dir.path().join("trajectory_data");
    let cache_path = dir.path().join("state.json");

    write_csv(
        &csv_path,
        &[
            r#"1372636858620000589,C,,,20000589,1372636858,A,False,"[[-8.618643,41.141412],[-8.618499,41.141376],[-8.620326,41.14251]]""#,
            r#"1372637303620000596,B,,7,20000596,1372637303,A,False,"[[-8.639847,41.159826],[-8.640351,41.159871]]""#,
            r#"1372636951620000589,A,2002,,20000589,1372636951,A,False,"[[-8.612964,41.140359],[-8.613378,41.14035]]""#,
        ],
    );

    let stats = convert_csv(&csv_path, &traj_dir, &ConvertConfig::default()).unwrap();
    assert_eq!(stats.taxis, 2);
    assert_eq!(stats.trips_converted, 3);
    assert_eq!(stats.trips_skipped, 0);
    assert_eq!(stats.points_written, 7);

    // One directory per taxi, Geolife-style layout inside.
    assert!(traj_dir.join("taxi_20000589/Trajectory").is_dir());
    assert!(traj_dir.join("taxi_20000589/labels.txt").is_file());
    assert!(traj_dir.join("taxi_20000596/Trajectory").is_dir());

    let state = load_directory(&traj_dir, RenderConfig::default()).unwrap();
    assert_eq!(state.num_taxis(), 2);
    assert_eq!(state.num_points(), 7);
    assert_eq!(state.taxi_ids(), vec![20000589, 20000596]);

    // Points arrive time-ordered even though the trips interleave in the CSV.
    let track = state.track(20000589).unwrap();
    assert_eq!(track.len(), 5);
    for pair in track.points().windows(2) {
        assert!(pair[0].time <= pair[1].time);
    }

    // Call types carry through as location labels.
    assert_eq!(track.points()[0].label, Label::TaxiStreet);
    assert_eq!(track.points()[4].label, Label::TaxiCentral);
    let stand_track = state.track(20000596).unwrap();
    assert_eq!(stand_track.points()[0].label, Label::TaxiStand);

    // Cache round-trip restores the identical state.
    save_cache(&state, &cache_path).unwrap();
    let restored = load_cache(&cache_path).unwrap();
    assert_eq!(restored, state);
}

/// Test that re-running the converter produces identical output
#[test]
fn test_conversion_is_repeatable() {
    let dir = tempdir().unwrap();
    let csv_path = dir.path().join("trips.csv");

    write_csv(
        &csv_path,
        &[
            r#"1,A,100,,7,1372636858,A,False,"[[-8.61,41.14],[-8.62,41.15]]""#,
            r#"2,B,,12,7,1372640000,A,False,"[[-8.63,41.16]]""#,
        ],
    );

    let out_a = dir.path().join("run_a");
    let out_b = dir.path().join("run_b");
    convert_csv(&csv_path, &out_a, &ConvertConfig::default()).unwrap();
    convert_csv(&csv_path, &out_b, &ConvertConfig::default()).unwrap();

    let labels_a = fs::read_to_string(out_a.join("taxi_007/labels.txt")).unwrap();
    let labels_b = fs::read_to_string(out_b.join("taxi_007/labels.txt")).unwrap();
    assert_eq!(labels_a, labels_b);

    for entry in fs::read_dir(out_a.join("taxi_007/Trajectory")).unwrap() {
        let entry = entry.unwrap();
        let twin = out_b.join("taxi_007/Trajectory").join(entry.file_name());
        assert_eq!(
            fs::read(entry.path()).unwrap(),
            fs::read(&twin).unwrap(),
            "trajectory file differs between runs: {:?}",
            entry.file_name()
        );
    }
}

/// Test that missing-data and empty-polyline trips are skipped
#[test]
fn test_unusable_trips_are_skipped() {
    let dir = tempdir().unwrap();
    let csv_path = dir.path().join("trips.csv");
    let traj_dir = dir.path().join("out");

    write_csv(
        &csv_path,
        &[
            r#"1,A,,,5,1372636858,A,True,"[[-8.61,41.14]]""#,
            r#"2,B,,,5,1372637000,A,False,"[]""#,
            r#"3,C,,,5,1372637100,A,False,"[[-8.62,41.15],[-8.63,41.16]]""#,
        ],
    );

    let stats = convert_csv(&csv_path, &traj_dir, &ConvertConfig::default()).unwrap();
    assert_eq!(stats.trips_converted, 1);
    assert_eq!(stats.trips_skipped, 2);
    assert_eq!(stats.points_written, 2);

    let state = load_directory(&traj_dir, RenderConfig::default()).unwrap();
    assert_eq!(state.num_points(), 2);
}

/// Test that a header-only trip table converts to an empty directory
#[test]
fn test_header_only_input() {
    let dir = tempdir().unwrap();
    let csv_path = dir.path().join("trips.csv");
    let traj_dir = dir.path().join("out");

    write_csv(&csv_path, &[]);

    let stats = convert_csv(&csv_path, &traj_dir, &ConvertConfig::default()).unwrap();
    assert_eq!(stats.taxis, 0);
    assert_eq!(stats.trips_converted, 0);

    let state = load_directory(&traj_dir, RenderConfig::default()).unwrap();
    assert!(state.is_empty());
}

/// Test that loading a missing cache reports NotFound
#[test]
fn test_cache_not_found() {
    let dir = tempdir().unwrap();
    let err = load_cache(&dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, CacheError::NotFound(_)));
}

/// Test chart rendering from a state built through the full pipeline
#[test]
fn test_render_charts() {
    let dir = tempdir().unwrap();
    let csv_path = dir.path().join("trips.csv");
    let traj_dir = dir.path().join("out");

    write_csv(
        &csv_path,
        &[
            r#"1,A,9,,3,1372636858,A,False,"[[-8.61,41.14],[-8.62,41.15],[-8.63,41.2]]""#,
            r#"2,B,,4,8,1372650000,A,False,"[[-8.55,41.1],[-8.56,41.11]]""#,
        ],
    );
    convert_csv(&csv_path, &traj_dir, &ConvertConfig::default()).unwrap();

    let render = RenderConfig {
        color_by_label: true,
        ..RenderConfig::default()
    };
    let state = load_directory(&traj_dir, render).unwrap();

    let overview = dir.path().join("overview.svg");
    let taxi = dir.path().join("taxi_3.svg");
    let hourly = dir.path().join("hourly.svg");

    render_overview(&state, &overview).unwrap();
    render_taxi(&state, 3, &taxi).unwrap();
    render_hourly_activity(&state, &hourly).unwrap();

    for path in [&overview, &taxi, &hourly] {
        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("<svg"), "not an SVG: {}", path.display());
    }
}

/// Test dataset statistics over a converted directory
#[test]
fn test_dataset_statistics() {
    let dir = tempdir().unwrap();
    let csv_path = dir.path().join("trips.csv");
    let traj_dir = dir.path().join("out");

    write_csv(
        &csv_path,
        &[
            r#"1,A,9,,3,1372636858,A,False,"[[-8.61,41.14],[-8.62,41.15]]""#,
            r#"2,B,,4,8,1372650000,A,False,"[[-8.55,41.1],[-8.56,41.11],[-8.57,41.12]]""#,
        ],
    );
    convert_csv(&csv_path, &traj_dir, &ConvertConfig::default()).unwrap();
    let state = load_directory(&traj_dir, RenderConfig::default()).unwrap();

    let stats = dataset_stats(&state);
    assert_eq!(stats.total_points, 5);
    assert_eq!(stats.num_taxis, 2);
    assert_eq!(stats.label_counts[Label::TaxiCentral.id() as usize], 2);
    assert_eq!(stats.label_counts[Label::TaxiStand.id() as usize], 3);
    assert_eq!(stats.top_taxis, vec![(8, 3), (3, 2)]);

    let bounds = stats.bounds.unwrap();
    assert!(bounds.min_lon <= -8.62 && bounds.max_lon >= -8.55);
}

/// Test that a converted directory passes validation
#[test]
fn test_converted_output_validates() {
    let dir = tempdir().unwrap();
    let csv_path = dir.path().join("trips.csv");
    let traj_dir = dir.path().join("out");

    write_csv(
        &csv_path,
        &[r#"1,A,9,,3,1372636858,A,False,"[[-8.61,41.14],[-8.62,41.15]]""#],
    );
    convert_csv(&csv_path, &traj_dir, &ConvertConfig::default()).unwrap();

    let report = validate_directory(&traj_dir, &ValidateOptions::default()).unwrap();
    assert!(!report.has_failures(), "report: {report}");
    assert!(!report.has_warnings(), "report: {report}");
}
