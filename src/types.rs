/// Core domain types for index documents, links, and assembled segments.
use std::path::{Path, PathBuf};

use crate::extract;

/// The two assembly strategies for an index document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssembleMode {
    /// Rewrite index links to same-document fragments and anchor each
    /// referenced document.
    InlineAnchors,
    /// Replace the index text with an outline placeholder expanded by the
    /// renderer.
    TableOfContents,
}

/// One contiguous unit of the assembled output: the index preamble or one
/// referenced document.
#[derive(Debug, Clone)]
pub struct ContentSegment {
    /// Anchor emitted ahead of the body; present only in anchor mode.
    pub anchor_name: Option<String>,
    /// Verbatim markdown body of the segment.
    pub body: String,
    /// Human-readable origin of the segment.
    pub source_label: String,
}

/// Everything known about an index document at assembly time.
/// Created once per run; immutable after construction.
#[derive(Debug)]
pub struct IndexContext {
    /// Parent directory of `index_path`. Referenced files resolve against it.
    pub base_folder: PathBuf,
    /// Path of the index document itself.
    pub index_path: PathBuf,
    /// Ordered links extracted from `raw_text`.
    pub links: Vec<Link>,
    /// Verbatim text of the index document.
    pub raw_text: String,
}

/// A single outgoing link recovered from an index document.
/// Both fields are non-empty by construction: the extractor drops incomplete
/// links instead of materializing them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Visible text of the link.
    pub label: String,
    /// Raw target string as written in the source markup.
    pub reference: String,
}

impl IndexContext {
    /// Build a context from the index document's path and raw text.
    /// Links are extracted eagerly so the context never changes afterwards.
    pub fn new(index_path: &Path, raw_text: String) -> Self {
        let base_folder = index_path.parent().unwrap_or(Path::new("")).to_path_buf();
        let links = extract::extract_links(&raw_text);
        return Self {
            base_folder,
            index_path: index_path.to_path_buf(),
            links,
            raw_text,
        };
    }

    /// Base name of the folder containing the index document.
    /// Serves as the title line of the table-of-contents preamble.
    pub fn base_name(&self) -> String {
        return self
            .base_folder
            .file_name()
            .map(|name| return name.to_string_lossy().into_owned())
            .unwrap_or_default();
    }
}
