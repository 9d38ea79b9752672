//! File discovery for finding images in directories.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::ProcessingConfig;

/// Discovers image files in directories.
pub struct FileDiscovery {
    config: ProcessingConfig,
    recursive: bool,
}

impl FileDiscovery {
    /// Create a new file discovery instance.
    ///
    /// Subdirectories are only descended into when `recursive` is set.
    pub fn new(config: ProcessingConfig, recursive: bool) -> Self {
        Self { config, recursive }
    }

    /// Discover all supported image files under a directory.
    pub fn discover(&self, dir: &Path) -> Vec<PathBuf> {
        let max_depth = if self.recursive { usize::MAX } else { 1 };

        let mut files: Vec<PathBuf> = WalkDir::new(dir)
            .max_depth(max_depth)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file() && self.is_supported(e.path()))
            .map(|e| e.path().to_path_buf())
            .collect();

        // Sort by path for deterministic ordering
        files.sort();
        files
    }

    /// Check if a file has a supported extension.
    pub fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext_lower = ext.to_lowercase();
                self.config
                    .supported_formats
                    .iter()
                    .any(|fmt| fmt.to_lowercase() == ext_lower)
            })
            .unwrap_or(false)
    }
}
