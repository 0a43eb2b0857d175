/// HTTP endpoint for querying assembled customer reports.
///
/// Provides a simple REST API for external tools to pull the enriched
/// station hierarchy without linking against this crate.
///
/// Endpoints:
/// - GET /customer/{customer_id}/stations - Full report for a customer
/// - GET /health - Service health check

use crate::aggregate::build_customer_report;
use crate::config::AggregationConfig;
use crate::source::RecordSource;

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

/// Extracts the customer identifier from a `/customer/{id}/stations` path.
/// Returns `None` for any other shape, including a missing identifier.
fn parse_customer_path(url: &str) -> Option<&str> {
    let rest = url.strip_prefix("/customer/")?;
    let customer_id = rest.strip_suffix("/stations")?;
    if customer_id.is_empty() || customer_id.contains('/') {
        return None;
    }
    Some(customer_id)
}

// ---------------------------------------------------------------------------
// HTTP server
// ---------------------------------------------------------------------------

/// Start the endpoint server on the specified port, serving reports built
/// against the given record source.
pub fn start_endpoint_server(
    port: u16,
    mut source: Box<dyn RecordSource>,
    aggregation: AggregationConfig,
) -> Result<(), String> {
    let server = tiny_http::Server::http(format!("0.0.0.0:{}", port))
        .map_err(|e| format!("Failed to start HTTP server: {}", e))?;

    println!("HTTP endpoint listening on http://0.0.0.0:{}", port);
    println!("   GET /customer/{{customer_id}}/stations - Full customer report");
    println!("   GET /health - Service health check\n");

    for request in server.incoming_requests() {
        let url = request.url().to_string();

        let response = if url == "/health" {
            handle_health()
        } else if let Some(customer_id) = parse_customer_path(&url) {
            handle_customer_query(source.as_mut(), customer_id, &aggregation)
        } else {
            create_response(
                404,
                serde_json::json!({
                    "error": "Not found",
                    "available_endpoints": ["/health", "/customer/{customer_id}/stations"]
                }),
            )
        };

        if let Err(e) = request.respond(response) {
            eprintln!("Failed to send response: {}", e);
        }
    }

    Ok(())
}

/// Handle /health endpoint
fn handle_health() -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    create_response(
        200,
        serde_json::json!({
            "status": "ok",
            "service": "wxmon_service",
            "version": "0.1.0"
        }),
    )
}

/// Handle /customer/{customer_id}/stations endpoint
fn handle_customer_query(
    source: &mut dyn RecordSource,
    customer_id: &str,
    aggregation: &AggregationConfig,
) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    match build_customer_report(source, customer_id, aggregation) {
        Ok(report) => match serde_json::to_value(&report) {
            Ok(body) => create_response(200, body),
            Err(e) => create_response(
                500,
                serde_json::json!({ "error": format!("serialization failed: {}", e) }),
            ),
        },
        // A failed run returns no partial data, only the failure.
        Err(e) => create_response(
            502,
            serde_json::json!({
                "error": e.to_string(),
                "customer_id": customer_id
            }),
        ),
    }
}

/// Create HTTP response with JSON body
fn create_response(
    status_code: u16,
    json: serde_json::Value,
) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let body = serde_json::to_string_pretty(&json).unwrap_or_else(|_| "{}".to_string());
    let bytes = body.into_bytes();

    tiny_http::Response::from_data(bytes)
        .with_status_code(tiny_http::StatusCode::from(status_code))
        .with_header(
            tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                .expect("static header is valid"),
        )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_customer_path_accepts_well_formed_path() {
        assert_eq!(parse_customer_path("/customer/CUST-042/stations"), Some("CUST-042"));
    }

    #[test]
    fn test_parse_customer_path_rejects_other_shapes() {
        assert_eq!(parse_customer_path("/customer//stations"), None);
        assert_eq!(parse_customer_path("/customer/CUST-042"), None);
        assert_eq!(parse_customer_path("/customer/CUST-042/stations/extra"), None);
        assert_eq!(parse_customer_path("/customers/CUST-042/stations"), None);
        assert_eq!(parse_customer_path("/health"), None);
    }
}
