//! Tag post-processing: threshold filtering, exclusion matching, and the
//! danbooru → prompt string rewrites (escaping, underscore replacement).
//!
//! All functions here are pure so the whole module is unit-testable without
//! any model on disk.

use std::collections::HashSet;

use crate::types::ScoredTag;

/// Emoticon tags whose underscores are structural and must not be replaced
/// with spaces.
const KAOMOJIS: &[&str] = &[
    "0_0",
    "(o)_(o)",
    "+_+",
    "+_-",
    "._.",
    "<o>_<o>",
    "<|>_<|>",
    "=_=",
    ">_<",
    "3_3",
    "6_9",
    ">_o",
    "@_@",
    "^_^",
    "o_o",
    "u_u",
    "x_x",
    "|_|",
    "||_||",
];

/// Escape a raw danbooru tag for use in a prompt: `(` and `)` become
/// `\(` and `\)`.
pub fn escape_tag(tag: &str) -> String {
    tag.replace('(', "\\(").replace(')', "\\)")
}

/// Reverse the prompt-style rewrites, recovering the raw danbooru form:
/// spaces become underscores and escaped parentheses are unescaped.
pub fn reverse_escape_tag(tag: &str) -> String {
    tag.replace(' ', "_").replace("\\(", "(").replace("\\)", ")")
}

/// Replace underscores with spaces unless the tag is a kaomoji.
fn replace_underscore(tag: &str) -> String {
    if KAOMOJIS.contains(&tag) {
        tag.to_string()
    } else {
        tag.replace('_', " ")
    }
}

/// Set of tags to drop from interrogation output.
///
/// Accepts user input in either raw danbooru form (`long_hair`) or
/// prompt form (`long hair`, `hatsune \(miku\)`); matching is
/// case-insensitive on the raw form.
#[derive(Debug, Clone, Default)]
pub struct TagFilter {
    excluded: HashSet<String>,
}

impl TagFilter {
    /// Build a filter from repeated `--exclude-tag` values, each of which
    /// may be a comma-separated list.
    pub fn parse(values: &[String]) -> Self {
        let mut excluded = HashSet::new();
        for value in values {
            for tag in value.split(',') {
                let tag = tag.trim();
                if tag.is_empty() {
                    continue;
                }
                excluded.insert(tag.to_lowercase());
                excluded.insert(reverse_escape_tag(tag).to_lowercase());
            }
        }
        Self { excluded }
    }

    /// True when the raw tag name is excluded.
    pub fn is_excluded(&self, raw_name: &str) -> bool {
        self.excluded.contains(&raw_name.to_lowercase())
    }

    /// Number of distinct exclusion entries (raw + reverse-escaped forms).
    pub fn len(&self) -> usize {
        self.excluded.len()
    }

    /// True when no exclusions are configured.
    pub fn is_empty(&self) -> bool {
        self.excluded.is_empty()
    }
}

/// Options controlling [`postprocess_tags`].
#[derive(Debug, Clone)]
pub struct PostprocessOptions {
    /// Minimum confidence, inclusive.
    pub threshold: f32,

    /// Apply prompt-style rewrites (underscore → space, parenthesis escaping).
    /// Disabled by `--rawtag`.
    pub escape: bool,

    /// Tags to drop, matched on the raw name.
    pub filter: TagFilter,
}

impl Default for PostprocessOptions {
    fn default() -> Self {
        Self {
            threshold: 0.35,
            escape: true,
            filter: TagFilter::default(),
        }
    }
}

/// Filter, sort and rewrite interrogation output into caption-ready tags.
///
/// Tags below the threshold or in the exclusion set are dropped; survivors
/// are sorted by confidence descending and, unless `escape` is off, rewritten
/// from raw danbooru form to prompt form.
pub fn postprocess_tags(scored: &[ScoredTag], opts: &PostprocessOptions) -> Vec<ScoredTag> {
    let mut kept: Vec<ScoredTag> = scored
        .iter()
        .filter(|t| t.confidence >= opts.threshold)
        .filter(|t| !opts.filter.is_excluded(&t.name))
        .cloned()
        .collect();

    kept.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    if opts.escape {
        for tag in &mut kept {
            tag.name = escape_tag(&replace_underscore(&tag.name));
        }
    }

    kept
}

/// Join tag names into the comma-separated caption string.
pub fn join_tags(tags: &[ScoredTag]) -> String {
    tags.iter()
        .map(|t| t.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(pairs: &[(&str, f32)]) -> Vec<ScoredTag> {
        pairs
            .iter()
            .map(|(name, conf)| ScoredTag::new(*name, *conf))
            .collect()
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let tags = scored(&[("keep", 0.35), ("drop", 0.349)]);
        let out = postprocess_tags(&tags, &PostprocessOptions::default());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "keep");
    }

    #[test]
    fn test_sorted_by_confidence_descending() {
        let tags = scored(&[("low", 0.4), ("high", 0.9), ("mid", 0.6)]);
        let out = postprocess_tags(&tags, &PostprocessOptions::default());
        let names: Vec<_> = out.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_escape_parentheses() {
        let tags = scored(&[("hatsune_miku_(cosplay)", 0.9)]);
        let out = postprocess_tags(&tags, &PostprocessOptions::default());
        assert_eq!(out[0].name, "hatsune miku \\(cosplay\\)");
    }

    #[test]
    fn test_rawtag_disables_rewrites() {
        let tags = scored(&[("long_hair", 0.9), ("smile_(happy)", 0.8)]);
        let opts = PostprocessOptions {
            escape: false,
            ..Default::default()
        };
        let out = postprocess_tags(&tags, &opts);
        assert_eq!(out[0].name, "long_hair");
        assert_eq!(out[1].name, "smile_(happy)");
    }

    #[test]
    fn test_kaomoji_keeps_underscore() {
        let tags = scored(&[("^_^", 0.9), ("0_0", 0.8), ("long_hair", 0.7)]);
        let out = postprocess_tags(&tags, &PostprocessOptions::default());
        let names: Vec<_> = out.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["^_^", "0_0", "long hair"]);
    }

    #[test]
    fn test_filter_parses_comma_lists_and_repeats() {
        let filter = TagFilter::parse(&["a,b".to_string(), " c ".to_string()]);
        assert!(filter.is_excluded("a"));
        assert!(filter.is_excluded("b"));
        assert!(filter.is_excluded("c"));
        assert!(!filter.is_excluded("d"));
    }

    #[test]
    fn test_filter_accepts_escaped_prompt_form() {
        // User passes the prompt form; the raw danbooru tag must match.
        let filter = TagFilter::parse(&["hatsune miku \\(cosplay\\)".to_string()]);
        assert!(filter.is_excluded("hatsune_miku_(cosplay)"));
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let filter = TagFilter::parse(&["Long_Hair".to_string()]);
        assert!(filter.is_excluded("long_hair"));
        assert!(filter.is_excluded("LONG_HAIR"));
    }

    #[test]
    fn test_filter_drops_from_output() {
        let tags = scored(&[("1girl", 0.95), ("long_hair", 0.9)]);
        let opts = PostprocessOptions {
            filter: TagFilter::parse(&["long hair".to_string()]),
            ..Default::default()
        };
        let out = postprocess_tags(&tags, &opts);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "1girl");
    }

    #[test]
    fn test_filter_empty_entries_ignored() {
        let filter = TagFilter::parse(&[",,a,".to_string()]);
        assert!(filter.is_excluded("a"));
        assert_eq!(filter.len(), 1);
    }

    #[test]
    fn test_reverse_escape_roundtrip() {
        assert_eq!(
            reverse_escape_tag("hatsune miku \\(cosplay\\)"),
            "hatsune_miku_(cosplay)"
        );
        assert_eq!(escape_tag("hatsune_miku_(cosplay)"), "hatsune_miku_\\(cosplay\\)");
    }

    #[test]
    fn test_join_tags() {
        let tags = scored(&[("1girl", 0.9), ("smile", 0.8)]);
        assert_eq!(join_tags(&tags), "1girl, smile");
        assert_eq!(join_tags(&[]), "");
    }
}
