use wxmon_service::aggregate::build_customer_report;
use wxmon_service::config::AggregationConfig;
use wxmon_service::source::PgRecordSource;

fn main() {
    let customer_id = std::env::args()
        .nth(1)
        .expect("usage: fetch_customer_report CUSTOMER_ID");

    println!("Connecting and verifying wxmon schema...");

    let mut source = PgRecordSource::connect().expect("Failed to connect");

    println!("✓ Connected successfully");

    let report = build_customer_report(&mut source, &customer_id, &AggregationConfig::default())
        .expect("Failed to build report");

    println!("✓ Report for {}: {} station(s)", report.customer_id, report.stations.len());

    for station_report in &report.stations {
        println!(
            "  - {} ({}): {} transmission(s) in window, {} forecast(s), latest sample {}",
            station_report.station.id,
            station_report.station.name,
            station_report.transmissions.len(),
            station_report.forecasts.len(),
            station_report
                .most_recent_transmission
                .as_ref()
                .map(|t| t.sent_at.to_rfc3339())
                .unwrap_or_else(|| "never".to_string()),
        );
    }

    if !report.violations.is_empty() {
        println!("✗ {} integrity violation(s):", report.violations.len());
        for violation in &report.violations {
            println!("  - {}", violation);
        }
    }
}
