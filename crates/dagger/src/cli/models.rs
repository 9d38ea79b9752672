//! The `dagger models` command for managing model files.

use clap::{Args, Subcommand};
use std::path::Path;

use dagger_core::dart::{
    DART_LOCAL_DIR, DART_MODEL_LOCAL_NAME, DART_MODEL_REMOTE, DART_REPO,
    DART_TOKENIZER_LOCAL_NAME, DART_TOKENIZER_REMOTE,
};
use dagger_core::interrogator::{
    find_model, Interrogator, ModelSpec, LABELS_LOCAL_NAME, LABELS_REMOTE, MODELS,
    MODEL_LOCAL_NAME, MODEL_REMOTE,
};
use dagger_core::Config;

/// Arguments for the `models` command.
#[derive(Args, Debug)]
pub struct ModelsArgs {
    #[command(subcommand)]
    pub command: ModelsCommand,
}

/// Subcommands for model management.
#[derive(Subcommand, Debug)]
pub enum ModelsCommand {
    /// Download model files (WD14 tagger and optionally Dart)
    Download {
        /// Tagger model to download (defaults to the configured model)
        #[arg(long)]
        model: Option<String>,

        /// Download every registered tagger model
        #[arg(long)]
        all: bool,

        /// Also download the Dart text-generation model
        #[arg(long)]
        dart: bool,
    },

    /// List installed models
    List,

    /// Show model directory path
    Path,
}

/// Execute the models command against the configuration resolved at startup.
pub async fn execute(args: ModelsArgs, config: Config) -> anyhow::Result<()> {
    match args.command {
        ModelsCommand::Download { model, all, dart } => {
            let client = reqwest::Client::new();

            let specs: Vec<&'static ModelSpec> = if all {
                MODELS.iter().collect()
            } else {
                let name = model.unwrap_or_else(|| config.interrogator.model.clone());
                vec![find_model(&name)?]
            };

            for spec in specs {
                download_tagger(spec, &config, &client).await?;
            }

            if dart {
                download_dart(&config, &client).await?;
            }

            tracing::info!("All downloads complete.");
        }

        ModelsCommand::List => {
            let model_dir = config.model_dir();

            if !model_dir.exists() {
                println!("No models installed.");
                println!("Run `dagger models download` to download the default model.");
                return Ok(());
            }

            println!("Installed models:");
            println!("  Directory: {}\n", model_dir.display());

            println!("  Taggers:");
            for spec in MODELS {
                let status = if Interrogator::model_installed(&model_dir, spec) {
                    "ready"
                } else {
                    "not installed"
                };
                let default_marker = if spec.name == config.interrogator.model {
                    "  (default)"
                } else {
                    ""
                };
                println!("    - {:24} {:14}{}", spec.name, status, default_marker);
            }

            let dart_dir = model_dir.join(DART_LOCAL_DIR);
            let dart_status = if dart_dir.join(DART_MODEL_LOCAL_NAME).exists()
                && dart_dir.join(DART_TOKENIZER_LOCAL_NAME).exists()
            {
                "ready"
            } else {
                "not installed"
            };
            println!("\n  Dart:");
            println!("    - {:24} {}", DART_LOCAL_DIR, dart_status);
        }

        ModelsCommand::Path => {
            let model_dir = config.model_dir();
            println!("{}", model_dir.display());
        }
    }

    Ok(())
}

/// Download one tagger model's ONNX file and label file. Skips files that
/// are already present.
async fn download_tagger(
    spec: &ModelSpec,
    config: &Config,
    client: &reqwest::Client,
) -> anyhow::Result<()> {
    let variant_dir = config.model_dir().join(spec.name);

    let files = [
        (MODEL_REMOTE, variant_dir.join(MODEL_LOCAL_NAME)),
        (LABELS_REMOTE, variant_dir.join(LABELS_LOCAL_NAME)),
    ];

    for (remote, dest) in files {
        if dest.exists() {
            tracing::info!("{} already exists at {:?}", spec.label, dest);
            continue;
        }

        std::fs::create_dir_all(&variant_dir)?;

        let url = format!("https://huggingface.co/{}/resolve/main/{}", spec.repo, remote);

        tracing::info!("Downloading {} ({})...", spec.label, remote);
        tracing::info!("  Source: {}", url);
        tracing::info!("  Destination: {:?}", dest);

        download_file(client, &url, &dest).await?;

        let file_size = std::fs::metadata(&dest)?.len();
        tracing::info!(
            "  {} complete ({:.1} MB)",
            remote,
            file_size as f64 / (1024.0 * 1024.0)
        );
    }

    Ok(())
}

/// Download the Dart decoder and tokenizer. Skips files that are already
/// present.
async fn download_dart(config: &Config, client: &reqwest::Client) -> anyhow::Result<()> {
    let dart_dir = config.model_dir().join(DART_LOCAL_DIR);

    let files = [
        (DART_MODEL_REMOTE, dart_dir.join(DART_MODEL_LOCAL_NAME)),
        (
            DART_TOKENIZER_REMOTE,
            dart_dir.join(DART_TOKENIZER_LOCAL_NAME),
        ),
    ];

    for (remote, dest) in files {
        if dest.exists() {
            tracing::info!("Dart file already exists at {:?}", dest);
            continue;
        }

        std::fs::create_dir_all(&dart_dir)?;

        let url = format!("https://huggingface.co/{DART_REPO}/resolve/main/{remote}");

        tracing::info!("Downloading Dart ({remote})...");
        tracing::info!("  Source: {}", url);
        tracing::info!("  Destination: {:?}", dest);

        download_file(client, &url, &dest).await?;
        tracing::info!("  {} complete", remote);
    }

    Ok(())
}

/// Download a file from a URL to a local path, streaming to disk.
async fn download_file(client: &reqwest::Client, url: &str, dest: &Path) -> anyhow::Result<()> {
    use futures_util::StreamExt;
    use tokio::io::AsyncWriteExt;

    let response = client
        .get(url)
        .send()
        .await?
        .error_for_status()
        .map_err(|e| anyhow::anyhow!("Download failed: {e}"))?;

    let total_size = response.content_length();
    if let Some(size) = total_size {
        tracing::info!("  Size: {:.1} MB", size as f64 / (1024.0 * 1024.0));
    }

    let mut file = tokio::fs::File::create(dest).await?;
    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        downloaded += chunk.len() as u64;

        if let Some(total) = total_size {
            if downloaded % (50 * 1024 * 1024) < chunk.len() as u64 {
                tracing::info!(
                    "  Progress: {:.0}%",
                    downloaded as f64 / total as f64 * 100.0
                );
            }
        }
    }

    file.flush().await?;
    Ok(())
}
