//! Sub-configuration structs with defaults matching the CLI flag defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory where model files are stored
    pub model_dir: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("~/.dagger/models"),
        }
    }
}

/// Interrogator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InterrogatorConfig {
    /// Registry name of the tagging model to use
    pub model: String,

    /// Minimum confidence for a tag to be kept (inclusive)
    pub threshold: f32,

    /// Force CPU execution even when a GPU provider is available
    pub cpu_only: bool,
}

impl Default for InterrogatorConfig {
    fn default() -> Self {
        Self {
            model: "wd14-convnextv2.v1".to_string(),
            threshold: 0.35,
            cpu_only: false,
        }
    }
}

/// File traversal and caption output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Supported input extensions (lowercase, without dot)
    pub supported_formats: Vec<String>,

    /// Extension appended to the image stem for caption files
    pub caption_ext: String,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            supported_formats: vec![
                "png".to_string(),
                "jpg".to_string(),
                "jpeg".to_string(),
                "webp".to_string(),
            ],
            caption_ext: ".txt".to_string(),
        }
    }
}

/// Dart generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DartConfig {
    /// Minimum tag confidence for inclusion in the Dart prompt
    pub prompt_threshold: f32,

    /// Sampling temperature
    pub temperature: f32,

    /// Nucleus sampling cutoff
    pub top_p: f32,

    /// Top-k sampling cutoff (0 disables)
    pub top_k: usize,

    /// Maximum number of generated tokens
    pub max_new_tokens: usize,
}

impl Default for DartConfig {
    fn default() -> Self {
        Self {
            prompt_threshold: 0.8,
            temperature: 1.0,
            top_p: 1.0,
            top_k: 100,
            max_new_tokens: 250,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
