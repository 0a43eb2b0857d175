/// wxmon_service: customer weather-station report aggregation service.
///
/// Assembles, for a given customer, every active monitoring station enriched
/// with its most recent telemetry transmission, its forecast history, its
/// most recent forecast, and its transmission history over a trailing window.
///
/// # Module structure
///
/// ```text
/// wxmon_service
/// ├── model     — shared data types (Station, Transmission, Forecast, …)
/// ├── config    — service configuration loader (wxmon.toml)
/// ├── db        — PostgreSQL connection and schema validation
/// ├── source    — record source boundary: the four fetch operations,
/// │               with a PostgreSQL implementation
/// ├── analysis
/// │   └── groupings — partitions flat record lists by station and selects
/// │                   most-recent records
/// ├── aggregate — station aggregator and customer report builder
/// └── endpoint  — HTTP API serving assembled customer reports
/// ```

/// Public modules
pub mod aggregate;
pub mod analysis;
pub mod config;
pub mod db;
pub mod endpoint;
pub mod model;
pub mod source;
