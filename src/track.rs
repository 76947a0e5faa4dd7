//! Core trajectory types: GPS points, per-taxi tracks, and location labels.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Seconds between consecutive polyline samples in the Porto trip table.
pub const POINT_INTERVAL_SECS: i64 = 15;

/// Geographic bounding box used by the Porto dataset sanity checks.
pub const PORTO_BOUNDS: Bounds = Bounds {
    min_lon: -8.7,
    max_lon: -8.5,
    min_lat: 41.0,
    max_lat: 41.3,
};

/// Location type assigned to trajectory points, derived from the trip's
/// `CALL_TYPE` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Label {
    /// Point falls outside every labelled time interval.
    #[default]
    Unknown,
    /// Trip dispatched from a taxi stand (`CALL_TYPE = B`).
    TaxiStand,
    /// Trip dispatched from the central (`CALL_TYPE = A`).
    TaxiCentral,
    /// Trip hailed on the street (any other `CALL_TYPE`).
    TaxiStreet,
}

impl Label {
    /// All labels in id order.
    pub const ALL: [Label; 4] = [
        Label::Unknown,
        Label::TaxiStand,
        Label::TaxiCentral,
        Label::TaxiStreet,
    ];

    /// Numeric label id as written by the original label encoding.
    pub fn id(self) -> u8 {
        match self {
            Label::Unknown => 0,
            Label::TaxiStand => 1,
            Label::TaxiCentral => 2,
            Label::TaxiStreet => 3,
        }
    }

    /// Name as it appears in `labels.txt`.
    pub fn name(self) -> &'static str {
        match self {
            Label::Unknown => "unknown",
            Label::TaxiStand => "taxi_stand",
            Label::TaxiCentral => "taxi_central",
            Label::TaxiStreet => "taxi_street",
        }
    }

    /// Parse a `labels.txt` mode name. Unrecognized names map to `Unknown`.
    pub fn from_name(name: &str) -> Label {
        match name {
            "taxi_stand" => Label::TaxiStand,
            "taxi_central" => Label::TaxiCentral,
            "taxi_street" => Label::TaxiStreet,
            _ => Label::Unknown,
        }
    }

    /// Map a trip table `CALL_TYPE` value to a label.
    pub fn from_call_type(call_type: &str) -> Label {
        match call_type {
            "A" => Label::TaxiCentral,
            "B" => Label::TaxiStand,
            _ => Label::TaxiStreet,
        }
    }
}

/// A raw longitude/latitude pair from a trip polyline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsPoint {
    /// Longitude in decimal degrees (WGS 84).
    pub lon: f64,
    /// Latitude in decimal degrees (WGS 84).
    pub lat: f64,
}

/// A single timestamped, labelled trajectory point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    /// Longitude in decimal degrees.
    pub lon: f64,
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Sample time.
    pub time: NaiveDateTime,
    /// Location label, `Unknown` unless a labels file covers this time.
    pub label: Label,
}

/// A labelled time interval from a `labels.txt` file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelSpan {
    /// Interval start (inclusive).
    pub start: NaiveDateTime,
    /// Interval end (inclusive).
    pub end: NaiveDateTime,
    /// Label applied to points inside the interval.
    pub label: Label,
}

/// Assign labels to points by time-interval containment.
///
/// Points covered by no span keep their current label.
pub fn apply_labels(points: &mut [TrackPoint], spans: &[LabelSpan]) {
    for span in spans {
        for point in points.iter_mut() {
            if point.time >= span.start && point.time <= span.end {
                point.label = span.label;
            }
        }
    }
}

/// Geographic bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Western edge.
    pub min_lon: f64,
    /// Eastern edge.
    pub max_lon: f64,
    /// Southern edge.
    pub min_lat: f64,
    /// Northern edge.
    pub max_lat: f64,
}

impl Bounds {
    /// A degenerate box containing exactly one point.
    pub fn from_point(lon: f64, lat: f64) -> Bounds {
        Bounds {
            min_lon: lon,
            max_lon: lon,
            min_lat: lat,
            max_lat: lat,
        }
    }

    /// Grow the box to include a point.
    pub fn include(&mut self, lon: f64, lat: f64) {
        self.min_lon = self.min_lon.min(lon);
        self.max_lon = self.max_lon.max(lon);
        self.min_lat = self.min_lat.min(lat);
        self.max_lat = self.max_lat.max(lat);
    }

    /// Whether the point lies inside the box (edges inclusive).
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.min_lon && lon <= self.max_lon && lat >= self.min_lat && lat <= self.max_lat
    }

    /// Expand each side by `frac` of the box's span. Used to keep chart
    /// points off the axes.
    pub fn padded(self, frac: f64) -> Bounds {
        let lon_pad = ((self.max_lon - self.min_lon) * frac).max(1e-4);
        let lat_pad = ((self.max_lat - self.min_lat) * frac).max(1e-4);
        Bounds {
            min_lon: self.min_lon - lon_pad,
            max_lon: self.max_lon + lon_pad,
            min_lat: self.min_lat - lat_pad,
            max_lat: self.max_lat + lat_pad,
        }
    }
}

/// All trajectory points for one taxi, time-ordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxiTrack {
    /// Taxi identifier from the trip table.
    pub taxi_id: u64,
    points: Vec<TrackPoint>,
}

impl TaxiTrack {
    /// Build a track from unordered points. Points are sorted by time.
    pub fn from_points(taxi_id: u64, mut points: Vec<TrackPoint>) -> TaxiTrack {
        points.sort_by_key(|p| p.time);
        TaxiTrack { taxi_id, points }
    }

    /// Time-ordered points.
    pub fn points(&self) -> &[TrackPoint] {
        &self.points
    }

    /// Mutable access for label application.
    pub(crate) fn points_mut(&mut self) -> &mut [TrackPoint] {
        &mut self.points
    }

    /// Number of points in the track.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the track holds no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Earliest and latest sample times.
    pub fn time_range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => Some((first.time, last.time)),
            _ => None,
        }
    }

    /// Bounding box of the track.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut points = self.points.iter();
        let first = points.next()?;
        let mut bounds = Bounds::from_point(first.lon, first.lat);
        for p in points {
            bounds.include(p.lon, p.lat);
        }
        Some(bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(secs: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2013, 7, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
            + chrono::Duration::seconds(secs as i64)
    }

    fn point(secs: u32) -> TrackPoint {
        TrackPoint {
            lon: -8.6,
            lat: 41.1,
            time: at(secs),
            label: Label::Unknown,
        }
    }

    #[test]
    fn test_track_sorts_points_by_time() {
        let track = TaxiTrack::from_points(7, vec![point(30), point(0), point(15)]);
        let times: Vec<_> = track.points().iter().map(|p| p.time).collect();
        assert_eq!(times, vec![at(0), at(15), at(30)]);
        assert_eq!(track.time_range(), Some((at(0), at(30))));
    }

    #[test]
    fn test_apply_labels_by_interval() {
        let mut points = vec![point(0), point(15), point(60)];
        let spans = [LabelSpan {
            start: at(0),
            end: at(20),
            label: Label::TaxiCentral,
        }];
        apply_labels(&mut points, &spans);
        assert_eq!(points[0].label, Label::TaxiCentral);
        assert_eq!(points[1].label, Label::TaxiCentral);
        assert_eq!(points[2].label, Label::Unknown);
    }

    #[test]
    fn test_call_type_mapping() {
        assert_eq!(Label::from_call_type("A"), Label::TaxiCentral);
        assert_eq!(Label::from_call_type("B"), Label::TaxiStand);
        assert_eq!(Label::from_call_type("C"), Label::TaxiStreet);
        assert_eq!(Label::from_call_type("Z"), Label::TaxiStreet);
        assert_eq!(Label::from_name("taxi_stand"), Label::TaxiStand);
        assert_eq!(Label::from_name("garbage"), Label::Unknown);
    }

    #[test]
    fn test_bounds_include_and_contains() {
        let mut bounds = Bounds::from_point(-8.6, 41.1);
        bounds.include(-8.65, 41.2);
        assert!(bounds.contains(-8.62, 41.15));
        assert!(!bounds.contains(-8.4, 41.15));
        assert!(PORTO_BOUNDS.contains(-8.618643, 41.141412));
        assert!(!PORTO_BOUNDS.contains(-9.0, 41.141412));
    }
}
