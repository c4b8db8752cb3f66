//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `LUMIERE_DATA_DIR` - Directory for persisted slots (default: .lumiere)
//! - `LUMIERE_LATITUDE` - Latitude reported by the location resolver
//! - `LUMIERE_LONGITUDE` - Longitude reported alongside it (default: 0)
//! - `LUMIERE_LOCATION_TIMEOUT_MS` - Location lookup deadline (default: 5000)
//! - `LUMIERE_SETTLEMENT_DELAY_MS` - Simulated payment settlement delay (default: 2000)
//! - `GEMINI_API_KEY` (or `API_KEY`) - Enables the recommendation service
//! - `GEMINI_MODEL` - Model name (default: gemini-3-flash-preview)

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

use crate::location::Coordinates;

const DEFAULT_DATA_DIR: &str = ".lumiere";
const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_LOCATION_TIMEOUT_MS: u64 = 5000;
const DEFAULT_SETTLEMENT_DELAY_MS: u64 = 2000;
const RECOMMENDATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Directory holding the durable key-value slots
    pub data_dir: PathBuf,
    /// Position reported to the location resolver, if any
    pub coordinates: Option<Coordinates>,
    /// How long the location lookup may take before the fallback wins
    pub location_timeout: Duration,
    /// Delay between placing an order and its settlement
    pub settlement_delay: Duration,
    /// Recommendation service, absent when no key is set
    pub gemini: Option<GeminiConfig>,
}

/// Gemini API configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: SecretString,
    pub model: String,
    pub timeout: Duration,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            coordinates: None,
            location_timeout: Duration::from_millis(DEFAULT_LOCATION_TIMEOUT_MS),
            settlement_delay: Duration::from_millis(DEFAULT_SETTLEMENT_DELAY_MS),
            gemini: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let latitude: Option<f64> = parse_opt(&get, "LUMIERE_LATITUDE")?;
        let longitude: f64 = parse_opt(&get, "LUMIERE_LONGITUDE")?.unwrap_or(0.0);
        let coordinates = latitude.map(|latitude| Coordinates { latitude, longitude });

        let location_timeout = parse_opt(&get, "LUMIERE_LOCATION_TIMEOUT_MS")?
            .map_or(defaults.location_timeout, Duration::from_millis);
        let settlement_delay = parse_opt(&get, "LUMIERE_SETTLEMENT_DELAY_MS")?
            .map_or(defaults.settlement_delay, Duration::from_millis);

        let gemini = get("GEMINI_API_KEY").or_else(|| get("API_KEY")).map(|key| GeminiConfig {
            api_key: SecretString::from(key),
            model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            timeout: RECOMMENDATION_TIMEOUT,
        });

        Ok(Self {
            data_dir: get("LUMIERE_DATA_DIR").map_or(defaults.data_dir, PathBuf::from),
            coordinates,
            location_timeout,
            settlement_delay,
            gemini,
        })
    }
}

fn parse_opt<T: FromStr>(get: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    get(key)
        .map(|raw| raw.trim().parse::<T>().map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.data_dir, PathBuf::from(".lumiere"));
        assert!(config.coordinates.is_none());
        assert_eq!(config.settlement_delay, Duration::from_secs(2));
        assert!(config.gemini.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = StorefrontConfig::from_lookup(lookup(&[
            ("LUMIERE_LATITUDE", "28.61"),
            ("LUMIERE_SETTLEMENT_DELAY_MS", "10"),
            ("API_KEY", "k-123"),
        ])).unwrap();
        assert_eq!(config.coordinates.map(|c| c.latitude), Some(28.61));
        assert_eq!(config.settlement_delay, Duration::from_millis(10));
        assert_eq!(config.gemini.map(|g| g.model), Some(DEFAULT_MODEL.to_string()));
    }

    #[test]
    fn test_invalid_number() {
        let err = StorefrontConfig::from_lookup(lookup(&[("LUMIERE_LOCATION_TIMEOUT_MS", "soon")])).unwrap_err();
        assert!(err.to_string().contains("LUMIERE_LOCATION_TIMEOUT_MS"));
    }
}
