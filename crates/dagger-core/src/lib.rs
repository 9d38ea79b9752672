//! Dagger Core - WD14 image interrogation and Dart prompt expansion.
//!
//! Dagger runs a WD14-family tagging model over images to produce
//! confidence-scored danbooru tags, post-processes them into caption
//! strings, and can feed the high-confidence subset into the Dart v2
//! text-generation model to synthesize an expanded tag prompt.
//!
//! # Architecture
//!
//! ```text
//! Image → Preprocess (448 NHWC BGR) → WD14 ONNX → (tag, confidence) pairs
//!       → threshold / exclusion / escaping → caption file or stdout
//!       → [high-confidence tags → Dart decoder → expanded prompt]
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use dagger_core::{Config, Interrogator, PostprocessOptions};
//!
//! let config = Config::load()?;
//! let interrogator = Interrogator::load(&config.model_dir(), "wd14-convnextv2.v1", false)?;
//! let result = interrogator.interrogate_path("./image.png".as_ref())?;
//! let tags = dagger_core::tags::postprocess_tags(&result.tags, &PostprocessOptions::default());
//! println!("{}", dagger_core::tags::join_tags(&tags));
//! ```

// Module declarations
pub mod config;
pub mod dart;
pub mod error;
pub mod interrogator;
pub mod output;
pub mod pipeline;
pub mod tags;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use dart::{DartGenerator, GenerationConfig, PromptOptions};
pub use error::{ConfigError, DaggerError, GenerateError, InterrogateError, Result};
pub use interrogator::Interrogator;
pub use output::{CaptionFormat, CaptionWriter};
pub use pipeline::FileDiscovery;
pub use tags::{postprocess_tags, PostprocessOptions, TagFilter};
pub use types::{BatchStats, InterrogationResult, ScoredTag, TagCategory};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
