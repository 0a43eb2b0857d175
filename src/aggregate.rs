/// Station aggregation: merges the flat record streams fetched from a record
/// source into per-station reports for one customer.
///
/// The pipeline is a fixed sequence — stations, most-recent transmission per
/// station, one batched forecast fetch, windowed transmissions per station —
/// because every later step resolves station identity against the set
/// established by the first. Grouping produces disjoint per-station slices,
/// so no record is ever attached twice or under another station's key.
///
/// Fetch failures abort the run (`SourceError`); records that reference an
/// unknown station are rejected and reported without aborting anything else.

use std::collections::HashMap;

use chrono::{Duration, Utc};

use crate::analysis::groupings::{group_by_key, most_recent, sort_by_time};
use crate::config::AggregationConfig;
use crate::model::{
    CustomerReport, IntegrityViolation, RecordKind, SourceError, StationReport, Transmission,
};
use crate::source::RecordSource;

// ---------------------------------------------------------------------------
// Result builder
// ---------------------------------------------------------------------------

/// Builds the enriched station collection for one customer.
///
/// For a fixed record source state the result is deterministic: stations
/// arrive in fetch order, attached lists ascend by timestamp, and violations
/// are reported sorted by station identifier.
pub fn build_customer_report(
    source: &mut dyn RecordSource,
    customer_id: &str,
    config: &AggregationConfig,
) -> Result<CustomerReport, SourceError> {
    let generated_at = Utc::now();

    let stations = source.stations_for_customer(customer_id)?;

    // A customer without stations is an empty report, and nothing further
    // is fetched on its behalf.
    if stations.is_empty() {
        return Ok(CustomerReport {
            customer_id: customer_id.to_string(),
            generated_at,
            stations: Vec::new(),
            violations: Vec::new(),
        });
    }

    let mut reports: Vec<StationReport> = stations.into_iter().map(StationReport::new).collect();

    // Identifier → position in `reports`, built once. Every grouped record
    // resolves its owner through this map.
    let index_by_id: HashMap<String, usize> = reports
        .iter()
        .enumerate()
        .map(|(idx, report)| (report.station.id.clone(), idx))
        .collect();

    let station_ids: Vec<String> = reports
        .iter()
        .map(|report| report.station.id.clone())
        .collect();

    let mut violations: Vec<IntegrityViolation> = Vec::new();

    // Step 2: latest transmission on record, one dedicated query per
    // station. A station that has never transmitted simply stays absent.
    for report in reports.iter_mut() {
        report.most_recent_transmission = source.most_recent_transmission(&report.station.id)?;
    }

    // Step 3: forecast history for the whole batch in a single call.
    let forecasts = source.forecasts_for_stations(&station_ids)?;

    // Step 4: group, then per station select the most recent forecast from
    // the in-memory group and attach the group sorted ascending. No second
    // fetch — the batch already holds everything needed.
    for (station_id, mut group) in group_by_key(forecasts, |f| &f.station_id) {
        match index_by_id.get(&station_id) {
            Some(&idx) => {
                let report = &mut reports[idx];
                report.most_recent_forecast = most_recent(&group, |f| f.issued_at).cloned();
                sort_by_time(&mut group, |f| f.issued_at);
                report.forecasts = group;
            }
            None => violations.push(IntegrityViolation {
                record_kind: RecordKind::Forecast,
                station_id,
                record_count: group.len(),
            }),
        }
    }

    // Step 5: transmission history over the trailing window, fetched per
    // station with explicit bounds, combined, and grouped like the forecasts.
    let window_end = generated_at;
    let window_start = window_end - Duration::days(config.transmission_window_days);

    let mut windowed: Vec<Transmission> = Vec::new();
    for station_id in &station_ids {
        windowed.extend(source.transmissions_in_window(station_id, window_start, window_end)?);
    }

    for (station_id, mut group) in group_by_key(windowed, |t| &t.station_id) {
        match index_by_id.get(&station_id) {
            Some(&idx) => {
                sort_by_time(&mut group, |t| t.sent_at);
                reports[idx].transmissions = group;
            }
            None => violations.push(IntegrityViolation {
                record_kind: RecordKind::Transmission,
                station_id,
                record_count: group.len(),
            }),
        }
    }

    // Group iteration order is arbitrary; sort so reruns report violations
    // identically.
    violations.sort_by(|a, b| {
        a.station_id
            .cmp(&b.station_id)
            .then(a.record_kind.cmp(&b.record_kind))
    });

    for violation in &violations {
        eprintln!("Integrity violation for customer {}: {}", customer_id, violation);
    }

    Ok(CustomerReport {
        customer_id: customer_id.to_string(),
        generated_at,
        stations: reports,
        violations,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

// Behavior is exercised end to end in tests/aggregation_pipeline.rs against
// an in-memory record source; the grouping and selection primitives carry
// their own unit tests in analysis::groupings.
