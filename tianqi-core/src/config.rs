use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::model::{DEFAULT_HOURLY_COUNT, TemperatureUnit};

/// Most recently viewed cities kept in the history list.
pub const MAX_HISTORY_CITIES: usize = 8;

/// One remembered city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryCity {
    pub adcode: String,
    pub name: String,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// unit = "celsius"
/// last_city = "110000"
///
/// [[history]]
/// adcode = "110000"
/// name = "北京"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// AMap web-service API key.
    pub api_key: Option<String>,

    /// Preferred temperature unit for display.
    #[serde(default)]
    pub unit: TemperatureUnit,

    /// Number of synthesized hourly points per snapshot.
    #[serde(default = "default_hourly_count")]
    pub hourly_count: usize,

    /// Adcode of the last successfully shown city.
    #[serde(default)]
    pub last_city: Option<String>,

    /// Recently viewed cities, most recent first.
    #[serde(default)]
    pub history: Vec<HistoryCity>,
}

fn default_hourly_count() -> usize {
    DEFAULT_HOURLY_COUNT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            unit: TemperatureUnit::default(),
            hourly_count: DEFAULT_HOURLY_COUNT,
            last_city: None,
            history: Vec::new(),
        }
    }
}

impl Config {
    /// The configured API key, or a hint on how to set one.
    pub fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().filter(|key| !key.is_empty()).ok_or_else(|| {
            anyhow!(
                "No AMap API key configured.\n\
                 Hint: run `tianqi configure` and enter your web-service key."
            )
        })
    }

    /// Record a viewed city: de-duplicate by adcode, move to the front,
    /// cap the list and remember it as the last city.
    pub fn remember_city(&mut self, adcode: &str, name: &str) {
        self.history.retain(|entry| entry.adcode != adcode);
        self.history.insert(
            0,
            HistoryCity { adcode: adcode.to_string(), name: name.to_string() },
        );
        self.history.truncate(MAX_HISTORY_CITIES);
        self.last_city = Some(adcode.to_string());
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "tianqi", "tianqi-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_errors_with_hint() {
        let cfg = Config::default();
        let err = cfg.api_key().unwrap_err();
        assert!(err.to_string().contains("Hint: run `tianqi configure`"));

        let cfg = Config { api_key: Some(String::new()), ..Config::default() };
        assert!(cfg.api_key().is_err());
    }

    #[test]
    fn defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.unit, TemperatureUnit::Celsius);
        assert_eq!(cfg.hourly_count, 24);
        assert!(cfg.history.is_empty());
        assert!(cfg.last_city.is_none());
    }

    #[test]
    fn remember_city_moves_to_front_and_dedupes() {
        let mut cfg = Config::default();
        cfg.remember_city("110000", "北京");
        cfg.remember_city("310000", "上海");
        cfg.remember_city("110000", "北京");

        assert_eq!(cfg.history.len(), 2);
        assert_eq!(cfg.history[0].adcode, "110000");
        assert_eq!(cfg.history[1].adcode, "310000");
        assert_eq!(cfg.last_city.as_deref(), Some("110000"));
    }

    #[test]
    fn history_is_capped() {
        let mut cfg = Config::default();
        for i in 0..12 {
            cfg.remember_city(&format!("{:06}", i), &format!("city-{i}"));
        }
        assert_eq!(cfg.history.len(), MAX_HISTORY_CITIES);
        // Most recent first, oldest dropped.
        assert_eq!(cfg.history[0].name, "city-11");
        assert_eq!(cfg.history[7].name, "city-4");
    }

    #[test]
    fn config_roundtrips_through_toml() {
        let mut cfg = Config::default();
        cfg.api_key = Some("KEY".into());
        cfg.unit = TemperatureUnit::Fahrenheit;
        cfg.remember_city("110000", "北京");

        let text = toml::to_string_pretty(&cfg).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.api_key.as_deref(), Some("KEY"));
        assert_eq!(back.unit, TemperatureUnit::Fahrenheit);
        assert_eq!(back.history, cfg.history);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: Config = toml::from_str("api_key = \"KEY\"").unwrap();
        assert_eq!(cfg.unit, TemperatureUnit::Celsius);
        assert_eq!(cfg.hourly_count, 24);
        assert!(cfg.history.is_empty());
    }
}
