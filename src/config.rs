/// Service configuration loader - parses wxmon.toml
///
/// Keeps operational knobs out of the code: the trailing transmission
/// window and the endpoint port both have sensible defaults, so the file
/// is optional and may specify either section alone.

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "wxmon.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub aggregation: AggregationConfig,
    #[serde(default)]
    pub endpoint: EndpointConfig,
}

/// Aggregation parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct AggregationConfig {
    /// Length of the trailing transmission window, in days, ending at the
    /// instant the run starts. Both bounds are inclusive.
    #[serde(default = "default_window_days")]
    pub transmission_window_days: i64,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            transmission_window_days: default_window_days(),
        }
    }
}

fn default_window_days() -> i64 {
    2
}

/// HTTP endpoint parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

fn default_port() -> u16 {
    8080
}

/// Loads configuration from the given path, falling back to defaults when
/// the file does not exist.
///
/// # Panics
/// Panics if the file exists but cannot be read or parsed. The service
/// should not run against a config it half-understood.
pub fn load_config(path: &str) -> AppConfig {
    if !Path::new(path).exists() {
        return AppConfig::default();
    }

    let contents =
        fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path, e));

    toml::from_str(&contents).unwrap_or_else(|e| panic!("Failed to parse {}: {}", path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_file_missing() {
        let config = load_config("does_not_exist.toml");
        assert_eq!(config.aggregation.transmission_window_days, 2);
        assert_eq!(config.endpoint.port, 8080);
    }

    #[test]
    fn test_parse_full_config() {
        let config: AppConfig = toml::from_str(
            r#"
            [aggregation]
            transmission_window_days = 7

            [endpoint]
            port = 9001
            "#,
        )
        .expect("config should parse");

        assert_eq!(config.aggregation.transmission_window_days, 7);
        assert_eq!(config.endpoint.port, 9001);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [aggregation]
            transmission_window_days = 5
            "#,
        )
        .expect("config should parse");

        assert_eq!(config.aggregation.transmission_window_days, 5);
        assert_eq!(config.endpoint.port, 8080, "missing section should default");
    }
}
