//! Runtime configuration from environment variables

use std::path::PathBuf;
use tracing::Level;

pub const DEFAULT_MODEL_DIR: &str = "model";
pub const DEFAULT_DRIVERS_CSV: &str = "model/DATA/filtered_drivers_info.csv";
pub const DEFAULT_SCHEDULE_CSV: &str = "model/DATA/schedule.csv";
pub const DEFAULT_SEASON: i32 = 2024;

/// Server and data locations
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub model_dir: PathBuf,
    pub drivers_csv: PathBuf,
    pub schedule_csv: PathBuf,
    pub season: i32,
    pub log_level: Level,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            drivers_csv: PathBuf::from(DEFAULT_DRIVERS_CSV),
            schedule_csv: PathBuf::from(DEFAULT_SCHEDULE_CSV),
            season: DEFAULT_SEASON,
            log_level: Level::INFO,
        }
    }
}

impl AppConfig {
    /// Read `HOST`, `PORT`, `MODEL_DIR`, `DRIVERS_CSV`, `SCHEDULE_CSV`,
    /// `SEASON` and `LOG_LEVEL`, keeping defaults for anything unset or unparsable
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            model_dir: lookup("MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_dir),
            drivers_csv: lookup("DRIVERS_CSV")
                .map(PathBuf::from)
                .unwrap_or(defaults.drivers_csv),
            schedule_csv: lookup("SCHEDULE_CSV")
                .map(PathBuf::from)
                .unwrap_or(defaults.schedule_csv),
            season: lookup("SEASON")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.season),
            log_level: lookup("LOG_LEVEL")
                .and_then(|l| l.parse().ok())
                .unwrap_or(defaults.log_level),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.model_dir, PathBuf::from("model"));
        assert_eq!(config.season, 2024);
        assert_eq!(config.log_level, Level::INFO);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "9000"),
            ("MODEL_DIR", "/opt/model"),
            ("SEASON", "2025"),
            ("LOG_LEVEL", "debug"),
        ]);
        assert_eq!(config.bind_addr(), "0.0.0.0:9000");
        assert_eq!(config.model_dir, PathBuf::from("/opt/model"));
        assert_eq!(config.season, 2025);
        assert_eq!(config.log_level, Level::DEBUG);
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = config_from(&[("PORT", "eighty"), ("LOG_LEVEL", "loud")]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_level, Level::INFO);
    }
}
