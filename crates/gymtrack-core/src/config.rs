//! Configuration management for gymtrack

use crate::error::{GymError, Result};
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage settings
    pub storage: StorageConfig,
    /// Display settings
    pub display: DisplayConfig,
}

/// Storage-related configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the session files; platform default when unset
    pub data_dir: Option<PathBuf>,
}

/// Display-related configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Unit label for set weights
    pub weight_unit: String,
    /// Unit label for set distances
    pub distance_unit: String,
    /// chrono format string for dates
    pub date_format: String,
    /// chrono format string for times of day
    pub time_format: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            weight_unit: "kg".to_string(),
            distance_unit: "m".to_string(),
            date_format: "%Y-%m-%d".to_string(),
            time_format: "%H:%M".to_string(),
        }
    }
}

impl DisplayConfig {
    /// Render a weight with its unit, dropping a trailing `.0`
    pub fn format_weight(&self, weight: f64) -> String {
        format!("{} {}", trim_number(weight), self.weight_unit)
    }

    /// Render a distance with its unit
    pub fn format_distance(&self, distance: f64) -> String {
        format!("{} {}", trim_number(distance), self.distance_unit)
    }
}

fn trim_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

impl Config {
    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load from a file that must exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(GymError::FileNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
            .map_err(|e| e.with_context(format!("Invalid config file {}", path.display())))
    }

    /// Load from a file, falling back to defaults when it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(GymError::FileNotFound(_)) => {
                tracing::debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Write to a file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Check that display settings are usable
    pub fn validate(&self) -> Result<()> {
        let display = &self.display;
        for (field, value) in [
            ("weight_unit", &display.weight_unit),
            ("distance_unit", &display.distance_unit),
            ("date_format", &display.date_format),
            ("time_format", &display.time_format),
        ] {
            if value.trim().is_empty() {
                return Err(GymError::Config(format!("display.{} must not be empty", field)));
            }
        }
        for (field, format) in [
            ("date_format", &display.date_format),
            ("time_format", &display.time_format),
        ] {
            if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
                return Err(GymError::Config(format!(
                    "display.{} is not a valid strftime format: {:?}",
                    field, format
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.storage.data_dir, None);
        assert_eq!(config.display.weight_unit, "kg");
        assert_eq!(config.display.distance_unit, "m");
        assert_eq!(config.display.date_format, "%Y-%m-%d");
        assert_eq!(config.display.time_format, "%H:%M");
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[display]"));

        let config2 = Config::from_toml_str(&toml).unwrap();
        assert_eq!(config, config2);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::from_toml_str(
            r#"
            [storage]
            data_dir = "/tmp/gym"

            [display]
            weight_unit = "lb"
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.data_dir, Some(PathBuf::from("/tmp/gym")));
        assert_eq!(config.display.weight_unit, "lb");
        assert_eq!(config.display.distance_unit, "m");
    }

    #[test]
    fn test_empty_unit_rejected() {
        let err = Config::from_toml_str("[display]\nweight_unit = \"\"").unwrap_err();
        assert!(matches!(err, GymError::Config(_)));
    }

    #[test]
    fn test_invalid_date_format_rejected() {
        let err = Config::from_toml_str("[display]\ndate_format = \"%Y-%!\"").unwrap_err();
        assert!(matches!(err, GymError::Config(_)));
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_toml_str("[display\n").unwrap_err();
        assert!(matches!(err, GymError::Toml(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        assert!(matches!(Config::load(&path), Err(GymError::FileNotFound(_))));
        assert_eq!(Config::load_or_default(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.display.distance_unit = "km".to_string();
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn test_format_units() {
        let display = DisplayConfig::default();
        assert_eq!(display.format_weight(100.0), "100 kg");
        assert_eq!(display.format_weight(52.5), "52.5 kg");
        assert_eq!(display.format_distance(400.0), "400 m");
    }
}
