//! Customer Station Report Service
//!
//! One-shot mode assembles the enriched station hierarchy for a single
//! customer and prints it as JSON:
//!
//!   cargo run --release -- CUST-042
//!
//! Endpoint mode serves reports over HTTP instead:
//!
//!   cargo run --release -- --endpoint 8080
//!
//! Environment:
//!   DATABASE_URL - PostgreSQL connection string
//!
//! Configuration:
//!   wxmon.toml (optional) - transmission window and endpoint port

use std::env;

use wxmon_service::aggregate::build_customer_report;
use wxmon_service::config::{self, DEFAULT_CONFIG_PATH};
use wxmon_service::endpoint;
use wxmon_service::source::PgRecordSource;

fn main() {
    println!("🌦 Customer Station Report Service");
    println!("==================================\n");

    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();
    let mut customer_id: Option<String> = None;
    let mut endpoint_port: Option<u16> = None;
    let mut config_path = DEFAULT_CONFIG_PATH.to_string();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--endpoint" => {
                if i + 1 < args.len() {
                    endpoint_port = args[i + 1].parse().ok();
                    i += 2;
                } else {
                    eprintln!("Error: --endpoint requires a port number");
                    std::process::exit(1);
                }
            }
            "--config" => {
                if i + 1 < args.len() {
                    config_path = args[i + 1].clone();
                    i += 2;
                } else {
                    eprintln!("Error: --config requires a file path");
                    std::process::exit(1);
                }
            }
            arg if !arg.starts_with('-') && customer_id.is_none() => {
                customer_id = Some(arg.to_string());
                i += 1;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                eprintln!(
                    "Usage: {} [CUSTOMER_ID] [--endpoint PORT] [--config PATH]",
                    args[0]
                );
                std::process::exit(1);
            }
        }
    }

    let app_config = config::load_config(&config_path);

    // Acquire a connection scoped to this invocation
    let source = match PgRecordSource::connect() {
        Ok(source) => source,
        Err(e) => {
            eprintln!("\n❌ Database connection failed: {}\n", e);
            std::process::exit(1);
        }
    };

    // Endpoint mode: serve reports until interrupted
    if let Some(port) = endpoint_port {
        println!("🚀 Starting HTTP endpoint server...");
        if let Err(e) =
            endpoint::start_endpoint_server(port, Box::new(source), app_config.aggregation)
        {
            eprintln!("❌ Endpoint server error: {}", e);
            std::process::exit(1);
        }
        return;
    }

    // One-shot mode: build and print a single customer report
    let customer_id = match customer_id {
        Some(id) => id,
        None => {
            eprintln!("Error: provide a CUSTOMER_ID or --endpoint PORT");
            eprintln!(
                "Usage: {} [CUSTOMER_ID] [--endpoint PORT] [--config PATH]",
                args[0]
            );
            std::process::exit(1);
        }
    };

    println!("📊 Building report for customer {}...", customer_id);
    println!(
        "   Transmission window: {} days\n",
        app_config.aggregation.transmission_window_days
    );

    let mut source = source;
    let report = match build_customer_report(&mut source, &customer_id, &app_config.aggregation) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("\n❌ Report build failed: {}\n", e);
            std::process::exit(1);
        }
    };

    println!("✓ {} station(s) assembled", report.stations.len());
    for station_report in &report.stations {
        println!(
            "   {} - {} transmission(s) in window, {} forecast(s)",
            station_report.station.id,
            station_report.transmissions.len(),
            station_report.forecasts.len()
        );
    }
    if !report.violations.is_empty() {
        println!("⚠ {} integrity violation(s) reported", report.violations.len());
    }
    println!();

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("❌ Failed to serialize report: {}", e);
            std::process::exit(1);
        }
    }
}
