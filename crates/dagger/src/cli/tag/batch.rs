//! Directory batch processing: discover images, interrogate each one, and
//! write a caption file next to it.

use std::path::Path;
use std::time::Instant;

use dagger_core::pipeline::{caption_disposition, caption_path, write_caption, CaptionDisposition, FileDiscovery};
use dagger_core::tags::{join_tags, postprocess_tags, PostprocessOptions};
use dagger_core::types::BatchStats;
use dagger_core::{Config, Interrogator};

use super::TagArgs;

/// Process every supported image under `dir`. Per-file failures are logged
/// and counted; the batch keeps going.
pub fn process_dir(
    interrogator: &Interrogator,
    config: &Config,
    args: &TagArgs,
    opts: &PostprocessOptions,
    dir: &Path,
) -> anyhow::Result<()> {
    let discovery = FileDiscovery::new(config.processing.clone(), args.recursive);
    let files = discovery.discover(dir);

    if files.is_empty() {
        tracing::warn!("No supported image files found in {:?}", dir);
        return Ok(());
    }

    let ext = args
        .ext
        .clone()
        .unwrap_or_else(|| config.processing.caption_ext.clone());

    tracing::info!("Found {} image file(s) in {:?}", files.len(), dir);

    let started = Instant::now();
    let mut stats = BatchStats::default();
    let pb = create_progress_bar(files.len() as u64);

    for file in &files {
        pb.set_message(
            file.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );

        let dest = caption_path(file, &ext);
        if let CaptionDisposition::Skip = caption_disposition(&dest, args.overwrite) {
            tracing::debug!("Skipping {:?}: caption already exists", file);
            stats.skipped += 1;
            pb.inc(1);
            continue;
        }

        match interrogator.interrogate_path(file) {
            Ok(result) => {
                let tags = postprocess_tags(&result.tags, opts);
                let caption = join_tags(&tags);
                match write_caption(&dest, &caption) {
                    Ok(()) => {
                        tracing::debug!("Wrote {} tag(s) to {:?}", tags.len(), dest);
                        stats.processed += 1;
                    }
                    Err(e) => {
                        tracing::error!("Failed to write caption for {:?}: {e}", file);
                        stats.failed += 1;
                    }
                }
            }
            Err(e) => {
                tracing::error!("Failed to interrogate {:?}: {e}", file);
                stats.failed += 1;
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("done");

    let elapsed = started.elapsed();
    let rate = if elapsed.as_secs_f64() > 0.0 {
        files.len() as f64 / elapsed.as_secs_f64()
    } else {
        0.0
    };
    print_summary(&stats, elapsed, rate);

    Ok(())
}

/// Create a progress bar for batch processing.
fn create_progress_bar(total: u64) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
            )
            .unwrap()
            .progress_chars("##-"),
    );
    pb.set_message("starting...");
    pb
}

/// Print a formatted summary table after batch processing.
fn print_summary(stats: &BatchStats, elapsed: std::time::Duration, rate: f64) {
    let total = stats.processed + stats.failed + stats.skipped;

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Captioned:    {:>8}", stats.processed);
    if stats.failed > 0 {
        eprintln!("    Failed:       {:>8}", stats.failed);
    }
    if stats.skipped > 0 {
        eprintln!("    Skipped:      {:>8}", stats.skipped);
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Total:        {:>8}", total);
    eprintln!("    Duration:     {:>7.1}s", elapsed.as_secs_f64());
    eprintln!("    Rate:         {:>7.1} img/sec", rate);
    eprintln!("  ====================================");
}
