/// Record source boundary: the four fetch operations the aggregator consumes.
///
/// The aggregation core only ever talks to a `RecordSource`, so tests can
/// inject an in-memory fake and the production binary can inject a
/// `PgRecordSource` holding a scoped PostgreSQL connection. No module-level
/// connection state exists anywhere in this crate.
///
/// Expected schema (see sql/ migration scripts):
///   wxmon.stations       (station_id, customer_id, name, latitude, longitude, active)
///   wxmon.transmissions  (station_id, sent_at, temperature_c, relative_humidity_pct,
///                         wind_speed_mps, battery_voltage)
///   wxmon.forecasts      (station_id, issued_at, high_temperature_c,
///                         low_temperature_c, precipitation_mm, summary)

use chrono::{DateTime, Utc};
use postgres::{Client, Row};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::db::{self, DbConfigError};
use crate::model::{Forecast, SourceError, Station, Transmission};

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// The four queries the station aggregator is built on. Pure fetch — no
/// grouping, no sorting, no aggregation behind this boundary.
pub trait RecordSource {
    /// All active stations belonging to a customer. An unknown customer
    /// yields an empty list, not an error.
    fn stations_for_customer(&mut self, customer_id: &str) -> Result<Vec<Station>, SourceError>;

    /// The single latest transmission for a station, regardless of age.
    /// Cheaper than fetching a window when only the head is needed.
    fn most_recent_transmission(
        &mut self,
        station_id: &str,
    ) -> Result<Option<Transmission>, SourceError>;

    /// Forecast history for every listed station in one batched call.
    /// The result is unordered and spans all requested stations.
    fn forecasts_for_stations(
        &mut self,
        station_ids: &[String],
    ) -> Result<Vec<Forecast>, SourceError>;

    /// Transmissions for one station with `sent_at` in `[start, end]`,
    /// both bounds inclusive.
    fn transmissions_in_window(
        &mut self,
        station_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Transmission>, SourceError>;
}

// ---------------------------------------------------------------------------
// PostgreSQL implementation
// ---------------------------------------------------------------------------

/// Record source backed by a PostgreSQL connection.
///
/// The connection is owned, not shared: callers acquire one per run (or per
/// server) via `connect` and drop it when done.
pub struct PgRecordSource {
    client: Client,
}

impl PgRecordSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Connects using `DATABASE_URL` and verifies the `wxmon` schema exists
    /// before any query runs.
    pub fn connect() -> Result<Self, DbConfigError> {
        let client = db::connect_and_verify(&["wxmon"])?;
        Ok(Self::new(client))
    }
}

impl RecordSource for PgRecordSource {
    fn stations_for_customer(&mut self, customer_id: &str) -> Result<Vec<Station>, SourceError> {
        let rows = self.client.query(
            "SELECT station_id, customer_id, name, latitude, longitude, active
             FROM wxmon.stations
             WHERE customer_id = $1 AND active
             ORDER BY station_id",
            &[&customer_id],
        )?;

        Ok(rows.iter().map(station_from_row).collect())
    }

    fn most_recent_transmission(
        &mut self,
        station_id: &str,
    ) -> Result<Option<Transmission>, SourceError> {
        let rows = self.client.query(
            "SELECT station_id, sent_at, temperature_c, relative_humidity_pct,
                    wind_speed_mps, battery_voltage
             FROM wxmon.transmissions
             WHERE station_id = $1
             ORDER BY sent_at DESC
             LIMIT 1",
            &[&station_id],
        )?;

        Ok(rows.first().map(transmission_from_row))
    }

    fn forecasts_for_stations(
        &mut self,
        station_ids: &[String],
    ) -> Result<Vec<Forecast>, SourceError> {
        let rows = self.client.query(
            "SELECT station_id, issued_at, high_temperature_c, low_temperature_c,
                    precipitation_mm, summary
             FROM wxmon.forecasts
             WHERE station_id = ANY($1)",
            &[&station_ids],
        )?;

        Ok(rows.iter().map(forecast_from_row).collect())
    }

    fn transmissions_in_window(
        &mut self,
        station_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Transmission>, SourceError> {
        let rows = self.client.query(
            "SELECT station_id, sent_at, temperature_c, relative_humidity_pct,
                    wind_speed_mps, battery_voltage
             FROM wxmon.transmissions
             WHERE station_id = $1 AND sent_at >= $2 AND sent_at <= $3",
            &[&station_id, &start, &end],
        )?;

        Ok(rows.iter().map(transmission_from_row).collect())
    }
}

// ---------------------------------------------------------------------------
// Row decoding
// ---------------------------------------------------------------------------

fn station_from_row(row: &Row) -> Station {
    Station {
        id: row.get(0),
        customer_id: row.get(1),
        name: row.get(2),
        latitude: row.get(3),
        longitude: row.get(4),
        active: row.get(5),
    }
}

fn transmission_from_row(row: &Row) -> Transmission {
    Transmission {
        station_id: row.get(0),
        sent_at: row.get(1),
        temperature_c: numeric_to_f64(row.get(2)),
        relative_humidity_pct: numeric_to_f64(row.get(3)),
        wind_speed_mps: numeric_to_f64(row.get(4)),
        battery_voltage: numeric_to_f64(row.get(5)),
    }
}

fn forecast_from_row(row: &Row) -> Forecast {
    Forecast {
        station_id: row.get(0),
        issued_at: row.get(1),
        high_temperature_c: numeric_to_f64(row.get(2)),
        low_temperature_c: numeric_to_f64(row.get(3)),
        precipitation_mm: numeric_to_f64(row.get(4)),
        summary: row.get(5),
    }
}

/// Measurement columns are NUMERIC; convert to f64 for the domain model.
fn numeric_to_f64(value: Option<Decimal>) -> Option<f64> {
    value.and_then(|d| d.to_f64())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_to_f64_converts_and_passes_none_through() {
        assert_eq!(numeric_to_f64(None), None);

        let value = Decimal::new(1842, 2); // 18.42
        let converted = numeric_to_f64(Some(value)).expect("should convert");
        assert!((converted - 18.42).abs() < 1e-9);
    }

    #[test]
    #[ignore] // Only run when a database is available
    fn test_pg_source_round_trip() {
        let mut source = PgRecordSource::connect().expect("connect should succeed");
        let stations = source
            .stations_for_customer("CUST-DEMO")
            .expect("query should succeed");
        for station in &stations {
            assert!(station.active, "fetch must filter to active stations");
        }
    }
}
