//! CLI enum types for the tag command.
//!
//! Thin `ValueEnum` wrappers over the core Dart enums so clap stays out of
//! the core crate.

use clap::ValueEnum;
use dagger_core::dart::{AspectRatio, IdentityLevel, Length, Rating};
use dagger_core::CaptionFormat;

/// Supported stdout output formats in file mode.
#[derive(Clone, Copy, Debug, ValueEnum, Default)]
pub enum OutputFormat {
    /// Comma-separated tag names
    #[default]
    Text,
    /// JSON array of scored tags
    Json,
}

impl From<OutputFormat> for CaptionFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => CaptionFormat::Text,
            OutputFormat::Json => CaptionFormat::Json,
        }
    }
}

/// Content rating condition for Dart.
#[derive(Clone, Copy, Debug, ValueEnum, Default)]
pub enum RatingArg {
    Sfw,
    #[default]
    General,
    Sensitive,
    Nsfw,
    Questionable,
    Explicit,
}

impl From<RatingArg> for Rating {
    fn from(arg: RatingArg) -> Self {
        match arg {
            RatingArg::Sfw => Rating::Sfw,
            RatingArg::General => Rating::General,
            RatingArg::Sensitive => Rating::Sensitive,
            RatingArg::Nsfw => Rating::Nsfw,
            RatingArg::Questionable => Rating::Questionable,
            RatingArg::Explicit => Rating::Explicit,
        }
    }
}

/// Aspect ratio condition for Dart.
#[derive(Clone, Copy, Debug, ValueEnum, Default)]
pub enum AspectRatioArg {
    UltraWide,
    Wide,
    Square,
    #[default]
    Tall,
    UltraTall,
}

impl From<AspectRatioArg> for AspectRatio {
    fn from(arg: AspectRatioArg) -> Self {
        match arg {
            AspectRatioArg::UltraWide => AspectRatio::UltraWide,
            AspectRatioArg::Wide => AspectRatio::Wide,
            AspectRatioArg::Square => AspectRatio::Square,
            AspectRatioArg::Tall => AspectRatio::Tall,
            AspectRatioArg::UltraTall => AspectRatio::UltraTall,
        }
    }
}

/// Target length of the Dart expansion.
#[derive(Clone, Copy, Debug, ValueEnum, Default)]
pub enum LengthArg {
    VeryShort,
    Short,
    Medium,
    #[default]
    Long,
    VeryLong,
}

impl From<LengthArg> for Length {
    fn from(arg: LengthArg) -> Self {
        match arg {
            LengthArg::VeryShort => Length::VeryShort,
            LengthArg::Short => Length::Short,
            LengthArg::Medium => Length::Medium,
            LengthArg::Long => Length::Long,
            LengthArg::VeryLong => Length::VeryLong,
        }
    }
}

/// Identity preservation level for Dart.
#[derive(Clone, Copy, Debug, ValueEnum, Default)]
pub enum IdentityArg {
    #[default]
    None,
    Lax,
    Strict,
}

impl From<IdentityArg> for IdentityLevel {
    fn from(arg: IdentityArg) -> Self {
        match arg {
            IdentityArg::None => IdentityLevel::None,
            IdentityArg::Lax => IdentityLevel::Lax,
            IdentityArg::Strict => IdentityLevel::Strict,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dart_condition_defaults() {
        // `--dart` without extra flags uses rating=general, aspect_ratio=tall,
        // length=long, identity=none.
        assert!(matches!(RatingArg::default(), RatingArg::General));
        assert!(matches!(AspectRatioArg::default(), AspectRatioArg::Tall));
        assert!(matches!(LengthArg::default(), LengthArg::Long));
        assert!(matches!(IdentityArg::default(), IdentityArg::None));
    }

    #[test]
    fn test_output_format_maps_to_core() {
        assert_eq!(CaptionFormat::from(OutputFormat::Text), CaptionFormat::Text);
        assert_eq!(CaptionFormat::from(OutputFormat::Json), CaptionFormat::Json);
    }
}
