/// Core data types for the customer station report service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no logic and no I/O — only types and their error displays.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Record types
// ---------------------------------------------------------------------------

/// A single remote weather monitoring station, owned by a customer.
///
/// Fetched from `wxmon.stations` by customer. The aggregation layer never
/// mutates a `Station`; enrichment results are attached on the surrounding
/// `StationReport`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    /// Stable station identifier, unique across customers.
    pub id: String,
    pub customer_id: String,
    pub name: String,
    /// WGS84 latitude.
    pub latitude: f64,
    /// WGS84 longitude.
    pub longitude: f64,
    /// Inactive stations are excluded at fetch time.
    pub active: bool,
}

/// One timestamped telemetry sample transmitted by a station.
///
/// Measurement fields may individually be absent — a station with a failed
/// anemometer still transmits temperature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transmission {
    /// Owning station. Must match a station in the current batch.
    pub station_id: String,
    /// Sample time, UTC.
    pub sent_at: DateTime<Utc>,
    pub temperature_c: Option<f64>,
    pub relative_humidity_pct: Option<f64>,
    pub wind_speed_mps: Option<f64>,
    pub battery_voltage: Option<f64>,
}

/// One predictive weather record issued for a station.
///
/// Forecasts cover a 72-hour horizon and are reissued every 15 minutes
/// without purging, so per-station history grows large; anything iterating
/// a forecast batch must do so in a single pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    /// Owning station. Must match a station in the current batch.
    pub station_id: String,
    /// Issuance time, UTC.
    pub issued_at: DateTime<Utc>,
    pub high_temperature_c: Option<f64>,
    pub low_temperature_c: Option<f64>,
    pub precipitation_mm: Option<f64>,
    pub summary: String,
}

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// A station together with the records attached to it by one aggregation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationReport {
    pub station: Station,
    /// Latest transmission on record for this station, regardless of the
    /// reporting window. Absent when the station has never transmitted.
    pub most_recent_transmission: Option<Transmission>,
    /// Transmissions within the trailing window, ascending by `sent_at`.
    pub transmissions: Vec<Transmission>,
    /// Full forecast history from the batch fetch, ascending by `issued_at`.
    pub forecasts: Vec<Forecast>,
    /// Latest forecast from that same batch. Absent when the batch held
    /// nothing for this station.
    pub most_recent_forecast: Option<Forecast>,
}

impl StationReport {
    /// Wraps a freshly fetched station with nothing attached yet.
    pub fn new(station: Station) -> Self {
        Self {
            station,
            most_recent_transmission: None,
            transmissions: Vec::new(),
            forecasts: Vec::new(),
            most_recent_forecast: None,
        }
    }
}

/// The complete result of one aggregation run for one customer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerReport {
    pub customer_id: String,
    /// Instant the run started; also the end bound of the transmission window.
    pub generated_at: DateTime<Utc>,
    pub stations: Vec<StationReport>,
    /// Records rejected during the run. Empty on a clean run.
    pub violations: Vec<IntegrityViolation>,
}

// ---------------------------------------------------------------------------
// Integrity violations
// ---------------------------------------------------------------------------

/// Which record stream a rejected group came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum RecordKind {
    Transmission,
    Forecast,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKind::Transmission => write!(f, "transmission"),
            RecordKind::Forecast => write!(f, "forecast"),
        }
    }
}

/// A group of fetched records whose `station_id` matched no station in the
/// current batch. The records are rejected rather than attached under a
/// wrong key; the rest of the run is unaffected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntegrityViolation {
    pub record_kind: RecordKind,
    /// The identifier that failed to resolve.
    pub station_id: String,
    /// How many records were rejected with it.
    pub record_count: usize,
}

impl std::fmt::Display for IntegrityViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} record(s) reference unknown station '{}'",
            self.record_count, self.record_kind, self.station_id
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise while fetching records from a record source.
///
/// A `SourceError` aborts the whole run for the customer: the report
/// contract is fully enriched or not returned at all.
#[derive(Debug)]
pub enum SourceError {
    /// The underlying database query failed.
    Query(postgres::Error),
    /// A fetched row could not be converted into a typed record.
    Decode(String),
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceError::Query(e) => write!(f, "record source query failed: {}", e),
            SourceError::Decode(msg) => write!(f, "record decode failed: {}", msg),
        }
    }
}

impl std::error::Error for SourceError {}

impl From<postgres::Error> for SourceError {
    fn from(e: postgres::Error) -> Self {
        SourceError::Query(e)
    }
}
