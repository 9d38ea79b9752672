//! Caption file placement and skip-if-exists handling.

use std::path::{Path, PathBuf};

/// Whether a caption file should be written or the image skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionDisposition {
    /// No caption exists yet, or `--overwrite` was passed
    Write,
    /// Caption exists and overwriting is disabled
    Skip,
}

/// Compute the caption path for an image: same directory, same stem, with
/// the configured extension appended (default `.txt`).
pub fn caption_path(image_path: &Path, ext: &str) -> PathBuf {
    let stem = image_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    image_path.with_file_name(format!("{stem}{ext}"))
}

/// Decide whether to write a caption, honoring skip-if-exists.
pub fn caption_disposition(caption_path: &Path, overwrite: bool) -> CaptionDisposition {
    if caption_path.is_file() && !overwrite {
        CaptionDisposition::Skip
    } else {
        CaptionDisposition::Write
    }
}

/// Write the caption string to disk.
pub fn write_caption(caption_path: &Path, content: &str) -> std::io::Result<()> {
    std::fs::write(caption_path, content)
}
