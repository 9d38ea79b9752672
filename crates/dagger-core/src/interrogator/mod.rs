//! Image interrogation: WD14 model loading, preprocessing and inference.
//!
//! The [`Interrogator`] pairs an ONNX session with its label file and turns
//! an image into ranked (tag, confidence) pairs, split into ratings and
//! content tags.

mod labels;
mod preprocess;
mod registry;
mod session;

pub use labels::{load_labels, Label};
pub use preprocess::preprocess;
pub use registry::{
    find_model, ModelSpec, DEFAULT_MODEL, LABELS_LOCAL_NAME, LABELS_REMOTE, MODELS,
    MODEL_LOCAL_NAME, MODEL_REMOTE,
};
pub use session::TaggerSession;

use std::path::{Path, PathBuf};

use image::DynamicImage;

use crate::error::InterrogateError;
use crate::types::{InterrogationResult, ScoredTag, TagCategory};

/// A loaded WD14 tagging model.
#[derive(Debug)]
pub struct Interrogator {
    spec: &'static ModelSpec,
    session: TaggerSession,
    labels: Vec<Label>,
}

impl Interrogator {
    /// Load a registered model from `<model_dir>/<name>/`.
    ///
    /// Fails with a download hint when the model files are not installed.
    pub fn load(model_dir: &Path, name: &str, cpu_only: bool) -> Result<Self, InterrogateError> {
        let spec = find_model(name)?;
        let variant_dir = model_dir.join(spec.name);
        let model_path = variant_dir.join(MODEL_LOCAL_NAME);
        let labels_path = variant_dir.join(LABELS_LOCAL_NAME);

        for path in [&model_path, &labels_path] {
            if !path.exists() {
                return Err(InterrogateError::Model {
                    message: format!(
                        "Model file not found at {path:?}. Run `dagger models download --model {name}` first."
                    ),
                });
            }
        }

        let session = TaggerSession::load(&model_path, cpu_only)?;
        let labels = load_labels(&labels_path)?;

        tracing::info!(
            "Loaded {} ({} labels{})",
            spec.label,
            labels.len(),
            if cpu_only { ", CPU only" } else { "" }
        );

        Ok(Self {
            spec,
            session,
            labels,
        })
    }

    /// The spec of the loaded model.
    pub fn spec(&self) -> &'static ModelSpec {
        self.spec
    }

    /// Interrogate a decoded image.
    ///
    /// Probabilities are paired with labels by row index; rating rows go to
    /// `ratings`, everything else to `tags`.
    pub fn interrogate(
        &self,
        image: &DynamicImage,
        path: &Path,
    ) -> Result<InterrogationResult, InterrogateError> {
        let tensor = preprocess(image, self.spec.input_size);
        let probs = self.session.run(&tensor, path)?;

        if probs.len() != self.labels.len() {
            return Err(InterrogateError::Inference {
                path: path.to_path_buf(),
                message: format!(
                    "Model produced {} probabilities for {} labels",
                    probs.len(),
                    self.labels.len()
                ),
            });
        }

        let mut ratings = Vec::new();
        let mut tags = Vec::new();
        for (label, &confidence) in self.labels.iter().zip(probs.iter()) {
            let tag = ScoredTag::with_category(label.name.clone(), confidence, label.category);
            match label.category {
                TagCategory::Rating => ratings.push(tag),
                _ => tags.push(tag),
            }
        }

        Ok(InterrogationResult { ratings, tags })
    }

    /// Decode an image file and interrogate it.
    pub fn interrogate_path(&self, path: &Path) -> Result<InterrogationResult, InterrogateError> {
        let image = image::open(path).map_err(|e| InterrogateError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        self.interrogate(&image, path)
    }

    /// Check whether a registered model's files are installed.
    pub fn model_installed(model_dir: &Path, spec: &ModelSpec) -> bool {
        let variant_dir = model_dir.join(spec.name);
        variant_dir.join(MODEL_LOCAL_NAME).exists() && variant_dir.join(LABELS_LOCAL_NAME).exists()
    }

    /// Path to a registered model's directory.
    pub fn variant_dir(model_dir: &Path, spec: &ModelSpec) -> PathBuf {
        model_dir.join(spec.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_unknown_model_fails_before_touching_disk() {
        let err = Interrogator::load(Path::new("/nonexistent"), "no-such-model", false)
            .unwrap_err();
        assert!(matches!(err, InterrogateError::UnknownModel { .. }));
    }

    #[test]
    fn test_load_missing_files_mentions_download() {
        let dir = tempfile::tempdir().unwrap();
        let err = Interrogator::load(dir.path(), DEFAULT_MODEL, false).unwrap_err();
        assert!(err.to_string().contains("dagger models download"));
    }

    #[test]
    fn test_model_installed_requires_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let spec = find_model(DEFAULT_MODEL).unwrap();
        assert!(!Interrogator::model_installed(dir.path(), spec));

        let variant_dir = dir.path().join(spec.name);
        std::fs::create_dir_all(&variant_dir).unwrap();
        std::fs::write(variant_dir.join(MODEL_LOCAL_NAME), b"stub").unwrap();
        assert!(!Interrogator::model_installed(dir.path(), spec));

        std::fs::write(variant_dir.join(LABELS_LOCAL_NAME), b"stub").unwrap();
        assert!(Interrogator::model_installed(dir.path(), spec));
    }
}
