//! File traversal and caption output for directory runs.

mod caption;
mod discovery;

pub use caption::{caption_disposition, caption_path, write_caption, CaptionDisposition};
pub use discovery::FileDiscovery;
