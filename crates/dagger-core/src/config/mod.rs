//! Configuration management for dagger.
//!
//! Configuration is loaded from the platform config directory (for example
//! `~/.config/dagger/config.toml` on Linux) with sensible defaults, so the
//! tool works without any config file at all.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for dagger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Interrogator (tagging model) settings
    pub interrogator: InterrogatorConfig,

    /// File traversal settings
    pub processing: ProcessingConfig,

    /// Dart generation settings
    pub dart: DartConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories, falling back to
    /// `~/.dagger/config.toml` if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "dagger", "dagger")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".dagger").join("config.toml")
            })
    }

    /// Get the resolved model directory path (with ~ expansion).
    pub fn model_dir(&self) -> PathBuf {
        let path_str = self.general.model_dir.to_string_lossy();
        let expanded = shellexpand::tilde(&path_str);
        PathBuf::from(expanded.into_owned())
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.interrogator.model, "wd14-convnextv2.v1");
        assert!((config.interrogator.threshold - 0.35).abs() < f32::EPSILON);
        assert_eq!(config.processing.caption_ext, ".txt");
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[general]"));
        assert!(toml.contains("[interrogator]"));
        assert!(toml.contains("[dart]"));
    }

    #[test]
    fn test_load_from_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = Config::default();
        std::fs::write(&path, config.to_toml().unwrap()).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.interrogator.model, config.interrogator.model);
        assert_eq!(loaded.dart.max_new_tokens, config.dart.max_new_tokens);
    }

    #[test]
    fn test_load_from_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[interrogator]\nthreshold = 0.5\n").unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert!((loaded.interrogator.threshold - 0.5).abs() < f32::EPSILON);
        // Untouched sections come from defaults
        assert_eq!(loaded.interrogator.model, "wd14-convnextv2.v1");
        assert_eq!(loaded.processing.caption_ext, ".txt");
    }
}
