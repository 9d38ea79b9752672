//! Core data types for the dagger interrogation pipeline.

use serde::{Deserialize, Serialize};

/// Tag category as recorded in the WD14 `selected_tags.csv` label file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagCategory {
    /// General content tags (category 0)
    General,
    /// Character tags (category 4)
    Character,
    /// Rating tags (category 9): general/sensitive/questionable/explicit
    Rating,
}

impl TagCategory {
    /// Map the numeric category column from `selected_tags.csv`.
    ///
    /// Unknown category codes are treated as general tags; the WD14 label
    /// files only use 0, 4 and 9.
    pub fn from_code(code: u32) -> Self {
        match code {
            9 => Self::Rating,
            4 => Self::Character,
            _ => Self::General,
        }
    }
}

/// A tag paired with the model's confidence for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredTag {
    /// Tag name in raw danbooru form (underscores, unescaped parentheses)
    pub name: String,

    /// Model confidence from 0.0 to 1.0
    pub confidence: f32,

    /// Label category from the model's label file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<TagCategory>,
}

impl ScoredTag {
    /// Create a new scored tag without a category.
    pub fn new(name: impl Into<String>, confidence: f32) -> Self {
        Self {
            name: name.into(),
            confidence,
            category: None,
        }
    }

    /// Create a new scored tag with a category.
    pub fn with_category(name: impl Into<String>, confidence: f32, category: TagCategory) -> Self {
        Self {
            name: name.into(),
            confidence,
            category: Some(category),
        }
    }
}

/// The full output of interrogating one image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterrogationResult {
    /// Rating predictions (mutually competitive; highest wins)
    pub ratings: Vec<ScoredTag>,

    /// General and character tag predictions, unfiltered
    pub tags: Vec<ScoredTag>,
}

impl InterrogationResult {
    /// The rating with the highest confidence, if any rating rows exist.
    pub fn top_rating(&self) -> Option<&ScoredTag> {
        self.ratings
            .iter()
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
    }
}

/// Summary counters for a directory run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchStats {
    /// Images interrogated and captioned
    pub processed: usize,

    /// Images skipped because the caption file already existed
    pub skipped: usize,

    /// Images that failed to decode or interrogate
    pub failed: usize,
}
