//! Dart v2 prompt expansion.
//!
//! Takes the high-confidence tags from interrogation, composes the Dart v2
//! conditioning prompt, and runs the autoregressive decoder to produce an
//! expanded tag list.

mod generator;
mod sampling;

pub use generator::DartGenerator;
pub use sampling::sample_token;

use serde::{Deserialize, Serialize};

use crate::config::DartConfig;
use crate::types::ScoredTag;

/// HuggingFace repository for the Dart v2 model.
pub const DART_REPO: &str = "p1atdev/dart-v2-moe-sft";

/// Remote file paths within the Dart repository.
pub const DART_MODEL_REMOTE: &str = "onnx/model.onnx";
pub const DART_TOKENIZER_REMOTE: &str = "tokenizer.json";

/// Local file names under `<model_dir>/dart/`.
pub const DART_MODEL_LOCAL_NAME: &str = "model.onnx";
pub const DART_TOKENIZER_LOCAL_NAME: &str = "tokenizer.json";

/// Local subdirectory for Dart model files.
pub const DART_LOCAL_DIR: &str = "dart";

/// Content rating condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Sfw,
    #[default]
    General,
    Sensitive,
    Nsfw,
    Questionable,
    Explicit,
}

impl Rating {
    /// Wire name used inside the prompt's special tokens.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sfw => "sfw",
            Self::General => "general",
            Self::Sensitive => "sensitive",
            Self::Nsfw => "nsfw",
            Self::Questionable => "questionable",
            Self::Explicit => "explicit",
        }
    }
}

/// Aspect ratio condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AspectRatio {
    UltraWide,
    Wide,
    #[default]
    Square,
    Tall,
    UltraTall,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UltraWide => "ultra_wide",
            Self::Wide => "wide",
            Self::Square => "square",
            Self::Tall => "tall",
            Self::UltraTall => "ultra_tall",
        }
    }
}

/// Target length of the generated tag list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Length {
    VeryShort,
    Short,
    #[default]
    Medium,
    Long,
    VeryLong,
}

impl Length {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryShort => "very_short",
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
            Self::VeryLong => "very_long",
        }
    }
}

/// How strictly generation should preserve the input tags' subject identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IdentityLevel {
    #[default]
    None,
    Lax,
    Strict,
}

impl IdentityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Lax => "lax",
            Self::Strict => "strict",
        }
    }
}

/// Conditioning options for prompt composition.
#[derive(Debug, Clone, Default)]
pub struct PromptOptions {
    /// Copyright (franchise) condition, empty for none
    pub copyright: String,

    /// Character condition, empty for none
    pub character: String,

    pub rating: Rating,
    pub aspect_ratio: AspectRatio,
    pub length: Length,
    pub identity: IdentityLevel,
}

/// Sampling parameters for the decoder loop.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: usize,
    pub max_new_tokens: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            top_p: 1.0,
            top_k: 100,
            max_new_tokens: 250,
        }
    }
}

impl From<&DartConfig> for GenerationConfig {
    fn from(config: &DartConfig) -> Self {
        Self {
            temperature: config.temperature,
            top_p: config.top_p,
            top_k: config.top_k,
            max_new_tokens: config.max_new_tokens,
        }
    }
}

/// Compose the Dart v2 conditioning prompt.
///
/// The `<general>` payload is the comma-joined tag list; an empty tag list
/// still produces a valid prompt.
pub fn compose_prompt(options: &PromptOptions, general_tags: &str) -> String {
    format!(
        "<|bos|>\
         <copyright>{copyright}</copyright>\
         <character>{character}</character>\
         <|rating:{rating}|><|aspect_ratio:{aspect_ratio}|><|length:{length}|>\
         <general>{general}<|identity:{identity}|><|input_end|>",
        copyright = options.copyright,
        character = options.character,
        rating = options.rating.as_str(),
        aspect_ratio = options.aspect_ratio.as_str(),
        length = options.length.as_str(),
        general = general_tags,
        identity = options.identity.as_str(),
    )
}

/// Select the tags eligible for the Dart prompt: confidence at or above the
/// prompt threshold, keeping interrogation order.
pub fn prompt_tags(tags: &[ScoredTag], prompt_threshold: f32) -> Vec<ScoredTag> {
    tags.iter()
        .filter(|t| t.confidence >= prompt_threshold)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::join_tags;

    #[test]
    fn test_compose_prompt_full() {
        let options = PromptOptions {
            copyright: "mihoyo".to_string(),
            character: "seele_vollerei".to_string(),
            rating: Rating::General,
            aspect_ratio: AspectRatio::Tall,
            length: Length::Long,
            identity: IdentityLevel::None,
        };
        let prompt = compose_prompt(&options, "1girl, blue hair");
        assert_eq!(
            prompt,
            "<|bos|><copyright>mihoyo</copyright><character>seele_vollerei</character>\
             <|rating:general|><|aspect_ratio:tall|><|length:long|>\
             <general>1girl, blue hair<|identity:none|><|input_end|>"
        );
    }

    #[test]
    fn test_compose_prompt_empty_tags_still_valid() {
        let prompt = compose_prompt(&PromptOptions::default(), "");
        assert!(prompt.contains("<general><|identity:none|>"));
        assert!(prompt.starts_with("<|bos|>"));
        assert!(prompt.ends_with("<|input_end|>"));
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(Rating::Questionable.as_str(), "questionable");
        assert_eq!(AspectRatio::UltraWide.as_str(), "ultra_wide");
        assert_eq!(Length::VeryLong.as_str(), "very_long");
        assert_eq!(IdentityLevel::Strict.as_str(), "strict");
    }

    #[test]
    fn test_prompt_tags_threshold_inclusive() {
        let tags = vec![
            ScoredTag::new("keep", 0.8),
            ScoredTag::new("drop", 0.79),
            ScoredTag::new("also_keep", 0.95),
        ];
        let selected = prompt_tags(&tags, 0.8);
        assert_eq!(join_tags(&selected), "keep, also_keep");
    }

    #[test]
    fn test_generation_config_from_dart_config() {
        let dart = crate::config::DartConfig::default();
        let config = GenerationConfig::from(&dart);
        assert!((config.temperature - 1.0).abs() < f32::EPSILON);
        assert_eq!(config.top_k, 100);
        assert_eq!(config.max_new_tokens, 250);
    }
}
