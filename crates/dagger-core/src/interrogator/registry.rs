//! Registry of known WD14 tagging models.
//!
//! Each entry maps a CLI model name to its HuggingFace repository and the
//! remote files the `models download` command fetches.

use crate::error::InterrogateError;

/// A WD14 model variant available for interrogation.
#[derive(Debug)]
pub struct ModelSpec {
    /// Registry name used by `--model` and for the local model subdirectory
    pub name: &'static str,

    /// Human-readable label for listings
    pub label: &'static str,

    /// HuggingFace repository
    pub repo: &'static str,

    /// Square input size expected by the model
    pub input_size: u32,
}

/// Remote file names within each model repository.
pub const MODEL_REMOTE: &str = "model.onnx";
pub const LABELS_REMOTE: &str = "selected_tags.csv";

/// Local file names under `<model_dir>/<spec.name>/`.
pub const MODEL_LOCAL_NAME: &str = "model.onnx";
pub const LABELS_LOCAL_NAME: &str = "selected_tags.csv";

/// Default model when neither the CLI nor the config names one.
pub const DEFAULT_MODEL: &str = "wd14-convnextv2.v1";

/// All known WD14 tagger variants.
///
/// The v1/v2 split follows SmilingWolf's repository naming; all variants
/// share the 448x448 NHWC input contract and the `selected_tags.csv`
/// label layout.
pub const MODELS: &[ModelSpec] = &[
    ModelSpec {
        name: "wd14-vit.v1",
        label: "WD14 ViT v1",
        repo: "SmilingWolf/wd-v1-4-vit-tagger",
        input_size: 448,
    },
    ModelSpec {
        name: "wd14-vit.v2",
        label: "WD14 ViT v2",
        repo: "SmilingWolf/wd-v1-4-vit-tagger-v2",
        input_size: 448,
    },
    ModelSpec {
        name: "wd14-convnext.v1",
        label: "WD14 ConvNeXt v1",
        repo: "SmilingWolf/wd-v1-4-convnext-tagger",
        input_size: 448,
    },
    ModelSpec {
        name: "wd14-convnext.v2",
        label: "WD14 ConvNeXt v2",
        repo: "SmilingWolf/wd-v1-4-convnext-tagger-v2",
        input_size: 448,
    },
    ModelSpec {
        name: "wd14-convnextv2.v1",
        label: "WD14 ConvNeXtV2 v1",
        repo: "SmilingWolf/wd-v1-4-convnextv2-tagger-v2",
        input_size: 448,
    },
    ModelSpec {
        name: "wd14-swinv2.v1",
        label: "WD14 SwinV2 v1",
        repo: "SmilingWolf/wd-v1-4-swinv2-tagger-v2",
        input_size: 448,
    },
    ModelSpec {
        name: "wd14-moat.v1",
        label: "WD14 MOAT v1",
        repo: "SmilingWolf/wd-v1-4-moat-tagger-v2",
        input_size: 448,
    },
];

/// Look up a model spec by registry name.
///
/// Fails fast with the list of valid names, before any image is touched.
pub fn find_model(name: &str) -> Result<&'static ModelSpec, InterrogateError> {
    MODELS
        .iter()
        .find(|spec| spec.name == name)
        .ok_or_else(|| InterrogateError::UnknownModel {
            name: name.to_string(),
            valid: MODELS
                .iter()
                .map(|spec| spec.name)
                .collect::<Vec<_>>()
                .join(", "),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model_is_registered() {
        assert!(find_model(DEFAULT_MODEL).is_ok());
    }

    #[test]
    fn test_find_model_known_names() {
        for spec in MODELS {
            let found = find_model(spec.name).unwrap();
            assert_eq!(found.repo, spec.repo);
        }
    }

    #[test]
    fn test_find_model_unknown_name_lists_valid() {
        let err = find_model("wd14-nonexistent").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("wd14-nonexistent"));
        assert!(msg.contains("wd14-convnextv2.v1"));
    }

    #[test]
    fn test_registry_names_are_unique() {
        let mut names: Vec<_> = MODELS.iter().map(|spec| spec.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), MODELS.len());
    }
}
