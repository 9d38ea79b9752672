//! Error types for the dagger interrogation pipeline.
//!
//! Errors are organized by stage so messages carry actionable context
//! (file paths, model names, specific issues).

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for dagger operations.
#[derive(Error, Debug)]
pub enum DaggerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Interrogation (tagging model) errors
    #[error("Interrogation error: {0}")]
    Interrogate(#[from] InterrogateError),

    /// Dart prompt generation errors
    #[error("Generation error: {0}")]
    Generate(#[from] GenerateError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors from the image interrogation stage.
#[derive(Error, Debug)]
pub enum InterrogateError {
    /// The requested model name is not in the registry
    #[error("Unknown model '{name}'. Valid models: {valid}")]
    UnknownModel { name: String, valid: String },

    /// Model files are missing or failed to load
    #[error("Model error: {message}")]
    Model { message: String },

    /// Label file parsing failed
    #[error("Label file error for {path:?}: {message}")]
    Labels { path: PathBuf, message: String },

    /// Image decoding failed
    #[error("Decode error for {path:?}: {message}")]
    Decode { path: PathBuf, message: String },

    /// ONNX inference failed
    #[error("Inference failed for {path:?}: {message}")]
    Inference { path: PathBuf, message: String },
}

/// Errors from the Dart text-generation stage.
#[derive(Error, Debug)]
pub enum GenerateError {
    /// Model or tokenizer files are missing or failed to load
    #[error("Dart model error: {message}")]
    Model { message: String },

    /// Tokenization of the composed prompt failed
    #[error("Tokenization failed: {message}")]
    Tokenize { message: String },

    /// Decoder inference failed
    #[error("Dart inference failed: {message}")]
    Inference { message: String },
}

/// Convenience type alias for dagger results.
pub type Result<T> = std::result::Result<T, DaggerError>;
