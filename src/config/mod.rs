//! Lane configuration (.fw/provenance.toml)
//!
//! All paths the lane touches are injected here rather than derived from
//! the tool's own location. Relative paths resolve against the invocation
//! directory (the firmware repo root); the built-in defaults reproduce the
//! project's historical layout.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::identity::DEFAULT_MIN_PREFIX_LEN;

/// Default location of the lane config file
pub const CONFIG_PATH: &str = ".fw/provenance.toml";

/// Error types for config operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Lane configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneConfig {
    /// Version store location (the firmware's version header)
    pub store_path: PathBuf,

    /// Directory receiving the version.json build-metadata record
    pub output_dir: PathBuf,

    /// Hardware target identifier stamped into the metadata
    pub target: String,

    /// Build description used when the caller supplies none
    pub description: String,

    /// Minimum accepted length of a device-reported digest prefix, in hex
    /// characters. Shorter claims are rejected before comparison.
    pub min_prefix_len: usize,
}

impl Default for LaneConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("include/version.h"),
            output_dir: PathBuf::from("build/esp32s3"),
            target: "esp32s3".to_string(),
            description: "ESP32 filament dryer firmware".to_string(),
            min_prefix_len: DEFAULT_MIN_PREFIX_LEN,
        }
    }
}

impl LaneConfig {
    /// Load and parse config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse config from a TOML string
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let config: LaneConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to built-in defaults
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store_path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "'store_path' must not be empty".to_string(),
            ));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "'output_dir' must not be empty".to_string(),
            ));
        }
        if self.target.is_empty() {
            return Err(ConfigError::Validation(
                "'target' must not be empty".to_string(),
            ));
        }
        if self.min_prefix_len == 0 {
            return Err(ConfigError::Validation(
                "'min_prefix_len' must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_reproduce_historical_layout() {
        let config = LaneConfig::default();
        assert_eq!(config.store_path, PathBuf::from("include/version.h"));
        assert_eq!(config.output_dir, PathBuf::from("build/esp32s3"));
        assert_eq!(config.target, "esp32s3");
        assert_eq!(config.min_prefix_len, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config = LaneConfig::from_toml(
            r#"
            target = "esp32c3"
            min_prefix_len = 12
            "#,
        )
        .unwrap();

        assert_eq!(config.target, "esp32c3");
        assert_eq!(config.min_prefix_len, 12);
        assert_eq!(config.store_path, PathBuf::from("include/version.h"));
    }

    #[test]
    fn test_rejects_zero_min_prefix_len() {
        let err = LaneConfig::from_toml("min_prefix_len = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_rejects_empty_target() {
        let err = LaneConfig::from_toml(r#"target = """#).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_or_default_with_missing_file() {
        let dir = TempDir::new().unwrap();
        let config = LaneConfig::load_or_default(&dir.path().join("provenance.toml")).unwrap();
        assert_eq!(config.target, "esp32s3");
    }

    #[test]
    fn test_load_or_default_reads_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("provenance.toml");
        fs::write(&path, r#"output_dir = "out/fw""#).unwrap();

        let config = LaneConfig::load_or_default(&path).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("out/fw"));
    }
}
