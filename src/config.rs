//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local development.

use crate::db::keys;
use std::env;
use std::path::PathBuf;

/// Zoom used when focusing a location, when `MAP_ZOOM_LEVEL` is unset.
pub const DEFAULT_ZOOM_LEVEL: u8 = 13;
const MAX_ZOOM_LEVEL: u8 = 20;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Map UI origin allowed by CORS
    pub frontend_url: String,
    /// Directory holding the saved slots
    pub data_dir: PathBuf,
    /// Slot name for the activity list
    pub storage_key: String,
    /// Zoom level for focusing the map on an activity
    pub map_zoom_level: u8,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            port: 8080,
            frontend_url: "http://localhost:5173".to_string(),
            data_dir: PathBuf::from("data"),
            storage_key: keys::WORKOUTS.to_string(),
            map_zoom_level: DEFAULT_ZOOM_LEVEL,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let port = match env::var("PORT") {
            Ok(v) => v
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT", v))?,
            Err(_) => 8080,
        };

        let map_zoom_level = match env::var("MAP_ZOOM_LEVEL") {
            Ok(v) => v
                .trim()
                .parse::<u8>()
                .ok()
                .filter(|zoom| *zoom <= MAX_ZOOM_LEVEL)
                .ok_or(ConfigError::Invalid("MAP_ZOOM_LEVEL", v))?,
            Err(_) => DEFAULT_ZOOM_LEVEL,
        };

        let storage_key = env::var("STORAGE_KEY")
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|_| keys::WORKOUTS.to_string());
        if storage_key.is_empty() {
            return Err(ConfigError::Invalid("STORAGE_KEY", storage_key));
        }

        Ok(Self {
            port,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            storage_key,
            map_zoom_level,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1:?}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test touching the process environment, so no cross-test races.
    #[test]
    fn test_config_from_env() {
        env::set_var("PORT", "9090");
        env::set_var("MAP_ZOOM_LEVEL", "15");
        env::set_var("DATA_DIR", "/tmp/workouts-test");
        env::remove_var("STORAGE_KEY");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.port, 9090);
        assert_eq!(config.map_zoom_level, 15);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/workouts-test"));
        assert_eq!(config.storage_key, "workouts");

        env::set_var("MAP_ZOOM_LEVEL", "42");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid("MAP_ZOOM_LEVEL", _))
        ));

        env::remove_var("PORT");
        env::remove_var("MAP_ZOOM_LEVEL");
        env::remove_var("DATA_DIR");
    }
}
