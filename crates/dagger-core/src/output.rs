//! Output formatting for interrogation results.
//!
//! File-mode output goes to stdout (or a file) either as the plain
//! comma-separated caption string or as a JSON array of scored tags.

use std::io::{self, Write};

use crate::tags::join_tags;
use crate::types::ScoredTag;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionFormat {
    /// Comma-separated tag names (caption file format)
    Text,
    /// JSON array of {name, confidence, category} objects
    Json,
}

impl CaptionFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// A writer that serializes post-processed tags in the selected format.
pub struct CaptionWriter<W: Write> {
    writer: W,
    format: CaptionFormat,
}

impl<W: Write> CaptionWriter<W> {
    /// Create a new caption writer.
    pub fn new(writer: W, format: CaptionFormat) -> Self {
        Self { writer, format }
    }

    /// Write one image's tags.
    pub fn write(&mut self, tags: &[ScoredTag]) -> io::Result<()> {
        match self.format {
            CaptionFormat::Text => {
                writeln!(self.writer, "{}", join_tags(tags))?;
            }
            CaptionFormat::Json => {
                serde_json::to_writer_pretty(&mut self.writer, tags).map_err(io::Error::other)?;
                writeln!(self.writer)?;
            }
        }
        Ok(())
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tags() -> Vec<ScoredTag> {
        vec![ScoredTag::new("1girl", 0.95), ScoredTag::new("smile", 0.8)]
    }

    #[test]
    fn test_write_text() {
        let mut buffer = Vec::new();
        let mut writer = CaptionWriter::new(&mut buffer, CaptionFormat::Text);
        writer.write(&sample_tags()).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert_eq!(output, "1girl, smile\n");
    }

    #[test]
    fn test_write_json() {
        let mut buffer = Vec::new();
        let mut writer = CaptionWriter::new(&mut buffer, CaptionFormat::Json);
        writer.write(&sample_tags()).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        let parsed: Vec<ScoredTag> = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].name, "1girl");
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(CaptionFormat::parse("text"), Some(CaptionFormat::Text));
        assert_eq!(CaptionFormat::parse("TXT"), Some(CaptionFormat::Text));
        assert_eq!(CaptionFormat::parse("json"), Some(CaptionFormat::Json));
        assert_eq!(CaptionFormat::parse("yaml"), None);
    }
}
