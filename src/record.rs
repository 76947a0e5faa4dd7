//! Trip table row parsing.
//!
//! The input CSV follows the Porto taxi dataset layout: one row per trip,
//! with the GPS trace embedded as a JSON `POLYLINE` column of
//! `[lon, lat]` pairs sampled every 15 seconds starting at `TIMESTAMP`.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer};

use crate::track::{GpsPoint, Label};

/// Errors raised while interpreting a trip row.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// The `POLYLINE` column is not a valid JSON array of coordinate pairs.
    #[error("malformed POLYLINE for trip {trip_id}: {source}")]
    BadPolyline {
        /// Trip identifier of the offending row.
        trip_id: u64,
        /// Underlying JSON parse error.
        source: serde_json::Error,
    },

    /// The `TIMESTAMP` column is outside the representable datetime range.
    #[error("TIMESTAMP {0} is out of range")]
    BadTimestamp(i64),
}

/// One row of the trip table.
///
/// Column names match the dataset export, hence the serde renames.
#[derive(Debug, Clone, Deserialize)]
pub struct TripRecord {
    /// Unique trip identifier.
    #[serde(rename = "TRIP_ID")]
    pub trip_id: u64,

    /// Dispatch type: `A` (central), `B` (stand), `C` (street).
    #[serde(rename = "CALL_TYPE")]
    pub call_type: String,

    /// Caller id for central-dispatched trips.
    #[serde(rename = "ORIGIN_CALL")]
    pub origin_call: Option<u64>,

    /// Stand id for stand-dispatched trips.
    #[serde(rename = "ORIGIN_STAND")]
    pub origin_stand: Option<u64>,

    /// Taxi (entity) identifier. All rows with the same id form one track.
    #[serde(rename = "TAXI_ID")]
    pub taxi_id: u64,

    /// Trip start time as unix seconds.
    #[serde(rename = "TIMESTAMP")]
    pub timestamp: i64,

    /// Day type flag (`A`/`B`/`C`), unused by the converter.
    #[serde(rename = "DAY_TYPE")]
    pub day_type: String,

    /// Whether the trace is known to be incomplete. The exporter writes
    /// Python-style `True`/`False`.
    #[serde(rename = "MISSING_DATA", deserialize_with = "python_bool")]
    pub missing_data: bool,

    /// GPS trace as a JSON array of `[lon, lat]` pairs. Parsed lazily via
    /// [`TripRecord::parse_polyline`].
    #[serde(rename = "POLYLINE")]
    pub polyline: String,
}

impl TripRecord {
    /// Decode the embedded polyline. An empty or `[]` column yields an
    /// empty vector rather than an error.
    pub fn parse_polyline(&self) -> Result<Vec<GpsPoint>, RecordError> {
        let raw = self.polyline.trim();
        if raw.is_empty() || raw == "[]" {
            return Ok(Vec::new());
        }
        let pairs: Vec<[f64; 2]> =
            serde_json::from_str(raw).map_err(|source| RecordError::BadPolyline {
                trip_id: self.trip_id,
                source,
            })?;
        Ok(pairs
            .into_iter()
            .map(|[lon, lat]| GpsPoint { lon, lat })
            .collect())
    }

    /// Trip start time decoded from the unix timestamp.
    pub fn start_time(&self) -> Result<NaiveDateTime, RecordError> {
        DateTime::from_timestamp(self.timestamp, 0)
            .map(|dt| dt.naive_utc())
            .ok_or(RecordError::BadTimestamp(self.timestamp))
    }

    /// Location label implied by the trip's call type.
    pub fn label(&self) -> Label {
        Label::from_call_type(self.call_type.trim())
    }
}

/// Accept the `True`/`False` booleans the dataset exporter writes, along
/// with the usual lowercase spellings.
fn python_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim() {
        "True" | "true" | "TRUE" | "1" => Ok(true),
        "False" | "false" | "FALSE" | "0" | "" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "invalid MISSING_DATA value: {other:?}"
        ))),
    }
}
