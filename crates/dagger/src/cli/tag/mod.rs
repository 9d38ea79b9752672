//! The `dagger tag` command: interrogate images, write captions, and
//! optionally expand high-confidence tags with Dart.

mod batch;
pub mod types;

pub use types::{AspectRatioArg, IdentityArg, LengthArg, OutputFormat, RatingArg};

use clap::{ArgGroup, Args};
use std::path::PathBuf;

use dagger_core::dart::{compose_prompt, prompt_tags, DartGenerator, GenerationConfig, PromptOptions, DART_LOCAL_DIR};
use dagger_core::tags::{join_tags, postprocess_tags, PostprocessOptions, TagFilter};
use dagger_core::{CaptionWriter, Config, Interrogator};

use batch::process_dir;

/// Arguments for the `tag` command.
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("input").required(true).args(["dir", "file"])))]
pub struct TagArgs {
    /// Predictions for all images in the directory
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Predictions for one file
    #[arg(long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Prediction threshold (defaults to the configured 0.35)
    #[arg(long)]
    pub threshold: Option<f32>,

    /// Extension to add to caption files in dir mode (default is .txt)
    #[arg(long)]
    pub ext: Option<String>,

    /// Overwrite caption file if it exists
    #[arg(long)]
    pub overwrite: bool,

    /// Use CPU only
    #[arg(long)]
    pub cpu: bool,

    /// Use the raw output of the model (no escaping or underscore replacement)
    #[arg(long)]
    pub rawtag: bool,

    /// Enable recursive file search
    #[arg(long)]
    pub recursive: bool,

    /// Tags to exclude (comma-separated list, repeatable)
    #[arg(long = "exclude-tag", value_name = "t1,t2,t3")]
    pub exclude_tags: Vec<String>,

    /// Model name to use for prediction (defaults to the configured model)
    #[arg(long)]
    pub model: Option<String>,

    /// Output format in file mode
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Expand high-confidence tags with the Dart model (file mode only)
    #[arg(long)]
    pub dart: bool,

    /// Copyright (franchise) condition for Dart
    #[arg(long, default_value = "")]
    pub copyright: String,

    /// Character condition for Dart
    #[arg(long, default_value = "")]
    pub character: String,

    /// Content rating condition for Dart
    #[arg(long, value_enum, default_value_t = RatingArg::General)]
    pub rating: RatingArg,

    /// Aspect ratio condition for Dart
    #[arg(long, value_enum, default_value_t = AspectRatioArg::Tall)]
    pub aspect_ratio: AspectRatioArg,

    /// Target length of the Dart expansion
    #[arg(long, value_enum, default_value_t = LengthArg::Long)]
    pub length: LengthArg,

    /// Identity preservation level for Dart
    #[arg(long, value_enum, default_value_t = IdentityArg::None)]
    pub identity: IdentityArg,

    /// Maximum number of generated tokens (defaults to the configured 250)
    #[arg(long)]
    pub max_new_tokens: Option<usize>,

    /// Sampling temperature (defaults to the configured 1.0)
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Nucleus sampling cutoff (defaults to the configured 1.0)
    #[arg(long)]
    pub top_p: Option<f32>,

    /// Top-k sampling cutoff (defaults to the configured 100)
    #[arg(long)]
    pub top_k: Option<usize>,
}

impl TagArgs {
    /// Resolve post-processing options from flags and config.
    fn postprocess_options(&self, config: &Config) -> PostprocessOptions {
        PostprocessOptions {
            threshold: self.threshold.unwrap_or(config.interrogator.threshold),
            escape: !self.rawtag,
            filter: TagFilter::parse(&self.exclude_tags),
        }
    }

    /// Resolve Dart sampling parameters from flags and config.
    fn generation_config(&self, config: &Config) -> GenerationConfig {
        let mut generation = GenerationConfig::from(&config.dart);
        if let Some(temperature) = self.temperature {
            generation.temperature = temperature;
        }
        if let Some(top_p) = self.top_p {
            generation.top_p = top_p;
        }
        if let Some(top_k) = self.top_k {
            generation.top_k = top_k;
        }
        if let Some(max_new_tokens) = self.max_new_tokens {
            generation.max_new_tokens = max_new_tokens;
        }
        generation
    }
}

/// Execute the tag command against the configuration resolved at startup.
pub async fn execute(args: TagArgs, config: Config) -> anyhow::Result<()> {
    let model = args
        .model
        .clone()
        .unwrap_or_else(|| config.interrogator.model.clone());
    let cpu_only = args.cpu || config.interrogator.cpu_only;

    // Fails fast on unknown model names, before any image is touched.
    let interrogator = Interrogator::load(&config.model_dir(), &model, cpu_only)?;
    let opts = args.postprocess_options(&config);

    // The input ArgGroup guarantees exactly one of --dir/--file.
    match (args.dir.clone(), args.file.clone()) {
        (Some(dir), _) => process_dir(&interrogator, &config, &args, &opts, &dir),
        (None, Some(file)) => process_file(&interrogator, &config, &args, &opts, &file),
        (None, None) => anyhow::bail!("Either --dir or --file is required"),
    }
}

/// Interrogate a single file, print its tags, and optionally expand them
/// with Dart.
fn process_file(
    interrogator: &Interrogator,
    config: &Config,
    args: &TagArgs,
    opts: &PostprocessOptions,
    file: &std::path::Path,
) -> anyhow::Result<()> {
    let result = interrogator.interrogate_path(file)?;
    let tags = postprocess_tags(&result.tags, opts);
    tracing::info!("Number of tags after filtering: {}", tags.len());

    if let Some(rating) = result.top_rating() {
        tracing::debug!("Predicted rating: {} ({:.3})", rating.name, rating.confidence);
    }
    for tag in &tags {
        tracing::debug!("{} : {:.3}", tag.name, tag.confidence);
    }

    let stdout = std::io::stdout();
    let mut writer = CaptionWriter::new(stdout.lock(), args.format.into());
    writer.write(&tags)?;
    writer.flush()?;

    if args.dart {
        let high_confidence = prompt_tags(&tags, config.dart.prompt_threshold);
        let dart_input = join_tags(&high_confidence);
        tracing::info!(
            "Expanding {} high-confidence tag(s) with Dart",
            high_confidence.len()
        );

        let options = PromptOptions {
            copyright: args.copyright.clone(),
            character: args.character.clone(),
            rating: args.rating.into(),
            aspect_ratio: args.aspect_ratio.into(),
            length: args.length.into(),
            identity: args.identity.into(),
        };
        let prompt = compose_prompt(&options, &dart_input);
        tracing::debug!("Dart prompt: {prompt}");

        let generator = DartGenerator::load(&config.model_dir().join(DART_LOCAL_DIR))?;
        let generated = generator.generate(&prompt, &args.generation_config(config))?;

        let expanded = if dart_input.is_empty() {
            generated
        } else if generated.is_empty() {
            dart_input
        } else {
            format!("{dart_input}, {generated}")
        };
        println!("{expanded}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postprocess_options_defaults_from_config() {
        let args = TagArgs {
            dir: None,
            file: Some(PathBuf::from("x.png")),
            threshold: None,
            ext: None,
            overwrite: false,
            cpu: false,
            rawtag: false,
            recursive: false,
            exclude_tags: vec![],
            model: None,
            format: OutputFormat::Text,
            dart: false,
            copyright: String::new(),
            character: String::new(),
            rating: RatingArg::General,
            aspect_ratio: AspectRatioArg::Tall,
            length: LengthArg::Long,
            identity: IdentityArg::None,
            max_new_tokens: None,
            temperature: None,
            top_p: None,
            top_k: None,
        };
        let config = Config::default();

        let opts = args.postprocess_options(&config);
        assert!((opts.threshold - 0.35).abs() < f32::EPSILON);
        assert!(opts.escape);
        assert!(opts.filter.is_empty());

        let generation = args.generation_config(&config);
        assert_eq!(generation.max_new_tokens, 250);
        assert_eq!(generation.top_k, 100);
    }

    #[test]
    fn test_flag_overrides_win_over_config() {
        let args = TagArgs {
            dir: None,
            file: Some(PathBuf::from("x.png")),
            threshold: Some(0.5),
            ext: None,
            overwrite: false,
            cpu: false,
            rawtag: true,
            recursive: false,
            exclude_tags: vec!["a,b".to_string()],
            model: None,
            format: OutputFormat::Text,
            dart: false,
            copyright: String::new(),
            character: String::new(),
            rating: RatingArg::General,
            aspect_ratio: AspectRatioArg::Tall,
            length: LengthArg::Long,
            identity: IdentityArg::None,
            max_new_tokens: Some(64),
            temperature: Some(0.9),
            top_p: Some(0.95),
            top_k: Some(50),
        };
        let config = Config::default();

        let opts = args.postprocess_options(&config);
        assert!((opts.threshold - 0.5).abs() < f32::EPSILON);
        assert!(!opts.escape);
        assert!(opts.filter.is_excluded("a"));

        let generation = args.generation_config(&config);
        assert_eq!(generation.max_new_tokens, 64);
        assert!((generation.temperature - 0.9).abs() < f32::EPSILON);
        assert!((generation.top_p - 0.95).abs() < f32::EPSILON);
        assert_eq!(generation.top_k, 50);
    }
}
