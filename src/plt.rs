//! Reading and writing the plain-text trajectory file layout.
//!
//! Each trip becomes one `.plt` file: six fixed header lines followed by one
//! positional row per GPS point,
//! `lat,lon,0,<altitude>,<days since 1899-12-30>,<YYYY-MM-DD>,<HH:MM:SS>`.
//! Alongside the trajectory files, each taxi directory carries a
//! `labels.txt` with one `start end mode` interval per trip.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::track::{GpsPoint, Label, LabelSpan, TrackPoint};

/// Fixed header written at the top of every trajectory file.
pub const PLT_HEADER: [&str; 6] = [
    "Geolife trajectory",
    "WGS 84",
    "Altitude is in Feet",
    "Reserved 3",
    "0,2,255,My Track,0,0,2,8421376",
    "0",
];

/// Number of header lines to skip when reading.
pub const PLT_HEADER_LINES: usize = PLT_HEADER.len();

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";
const LABEL_DATETIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Errors raised while reading or writing trajectory files.
#[derive(Debug, thiserror::Error)]
pub enum PltError {
    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A data line that does not follow the positional layout.
    #[error("line {line}: {message}")]
    Malformed {
        /// 1-based line number within the file.
        line: usize,
        /// What was wrong with the line.
        message: String,
    },
}

fn days_since_1899(time: NaiveDateTime) -> i64 {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30).expect("valid epoch date");
    time.date().signed_duration_since(epoch).num_days()
}

/// Write one trip as a trajectory file body.
///
/// Point `i` is stamped `start + i * interval_secs`, matching the fixed
/// sampling interval of the trip table polylines.
pub fn write_trip<W: Write>(
    writer: &mut W,
    start: NaiveDateTime,
    points: &[GpsPoint],
    interval_secs: i64,
) -> Result<(), PltError> {
    for line in PLT_HEADER {
        writeln!(writer, "{line}")?;
    }

    for (i, point) in points.iter().enumerate() {
        let time = start + Duration::seconds(i as i64 * interval_secs);
        writeln!(
            writer,
            "{},{},0,0,{},{},{}",
            point.lat,
            point.lon,
            days_since_1899(time),
            time.format(DATE_FORMAT),
            time.format(TIME_FORMAT),
        )?;
    }

    Ok(())
}

/// Write one trip to a file at `path`.
pub fn write_trip_file(
    path: &Path,
    start: NaiveDateTime,
    points: &[GpsPoint],
    interval_secs: i64,
) -> Result<(), PltError> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_trip(&mut writer, start, points, interval_secs)?;
    writer.flush()?;
    Ok(())
}

/// Read the points of a trajectory file.
///
/// Labels are not stored in `.plt` files, so every point comes back
/// `Unknown`; callers apply `labels.txt` intervals afterwards.
pub fn read_trip<R: BufRead>(reader: R) -> Result<Vec<TrackPoint>, PltError> {
    let mut points = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if index < PLT_HEADER_LINES {
            continue;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let fields: Vec<&str> = trimmed.split(',').collect();
        if fields.len() < 7 {
            return Err(PltError::Malformed {
                line: index + 1,
                message: format!("expected 7 fields, found {}", fields.len()),
            });
        }

        let lat: f64 = fields[0].parse().map_err(|_| PltError::Malformed {
            line: index + 1,
            message: format!("invalid latitude {:?}", fields[0]),
        })?;
        let lon: f64 = fields[1].parse().map_err(|_| PltError::Malformed {
            line: index + 1,
            message: format!("invalid longitude {:?}", fields[1]),
        })?;
        let stamp = format!("{} {}", fields[5], fields[6]);
        let time = NaiveDateTime::parse_from_str(&stamp, "%Y-%m-%d %H:%M:%S").map_err(|_| {
            PltError::Malformed {
                line: index + 1,
                message: format!("invalid timestamp {stamp:?}"),
            }
        })?;

        points.push(TrackPoint {
            lon,
            lat,
            time,
            label: Label::Unknown,
        });
    }

    Ok(points)
}

/// Read a trajectory file from disk.
pub fn read_trip_file(path: &Path) -> Result<Vec<TrackPoint>, PltError> {
    let reader = BufReader::new(File::open(path)?);
    read_trip(reader)
}

/// Write a `labels.txt` body.
pub fn write_labels<W: Write>(writer: &mut W, spans: &[LabelSpan]) -> Result<(), PltError> {
    for span in spans {
        writeln!(
            writer,
            "{} {} {}",
            span.start.format(LABEL_DATETIME_FORMAT),
            span.end.format(LABEL_DATETIME_FORMAT),
            span.label.name(),
        )?;
    }
    Ok(())
}

/// Write a `labels.txt` file at `path`.
pub fn write_labels_file(path: &Path, spans: &[LabelSpan]) -> Result<(), PltError> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_labels(&mut writer, spans)?;
    writer.flush()?;
    Ok(())
}

/// Read a `labels.txt` body. Lines that do not parse are skipped, matching
/// the tolerant reader the format grew up with.
pub fn read_labels<R: BufRead>(reader: R) -> Result<Vec<LabelSpan>, PltError> {
    let mut spans = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 5 {
            continue;
        }

        let start_raw = format!("{} {}", parts[0], parts[1]);
        let end_raw = format!("{} {}", parts[2], parts[3]);
        let (start, end) = match (
            NaiveDateTime::parse_from_str(&start_raw, LABEL_DATETIME_FORMAT),
            NaiveDateTime::parse_from_str(&end_raw, LABEL_DATETIME_FORMAT),
        ) {
            (Ok(start), Ok(end)) => (start, end),
            _ => continue,
        };

        spans.push(LabelSpan {
            start,
            end,
            label: Label::from_name(parts[4]),
        });
    }

    Ok(spans)
}

/// Read a `labels.txt` file from disk.
pub fn read_labels_file(path: &Path) -> Result<Vec<LabelSpan>, PltError> {
    let reader = BufReader::new(File::open(path)?);
    read_labels(reader)
}
