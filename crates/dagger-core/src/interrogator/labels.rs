//! Parsing of the WD14 `selected_tags.csv` label file.
//!
//! The file has a header row and four columns: `tag_id,name,category,count`.
//! Row order matters: row N labels output logit N.

use std::path::Path;

use serde::Deserialize;

use crate::error::InterrogateError;
use crate::types::TagCategory;

/// One label row, in model output order.
#[derive(Debug, Clone)]
pub struct Label {
    /// Raw danbooru tag name
    pub name: String,

    /// Category from the CSV (rating / general / character)
    pub category: TagCategory,
}

/// Raw CSV row shape.
#[derive(Debug, Deserialize)]
struct LabelRow {
    #[allow(dead_code)]
    tag_id: u64,
    name: String,
    category: u32,
    #[allow(dead_code)]
    count: u64,
}

/// Load labels from a `selected_tags.csv` file, preserving row order.
pub fn load_labels(path: &Path) -> Result<Vec<Label>, InterrogateError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| InterrogateError::Labels {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut labels = Vec::new();
    for row in reader.deserialize::<LabelRow>() {
        let row = row.map_err(|e| InterrogateError::Labels {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        labels.push(Label {
            name: row.name,
            category: TagCategory::from_code(row.category),
        });
    }

    if labels.is_empty() {
        return Err(InterrogateError::Labels {
            path: path.to_path_buf(),
            message: "label file contains no rows".to_string(),
        });
    }

    tracing::debug!("Loaded {} labels from {:?}", labels.len(), path);
    Ok(labels)
}
