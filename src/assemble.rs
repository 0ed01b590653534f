//! Index assembly: merge an index document with its referenced siblings.

use std::fmt::Write as _;
use std::path::Path;

use crate::diagnostics;
use crate::types::{AssembleMode, ContentSegment, IndexContext};

/// Emitted after every segment so the layout engine starts each referenced
/// document on a fresh page.
pub const PAGE_BREAK: &str = "<div style=\"page-break-after: always;\"></div>";

/// Placeholder the renderer expands into a navigable outline.
pub const TOC_MARKER: &str = "[[toc]]";

/// The file-reading collaborator for assembly. Yields the file's text, or
/// `None` when the path cannot be read.
pub trait ReadSource {
    fn read(&self, path: &Path) -> Option<String>;
}

/// Production reader backed by the local filesystem.
pub struct FsReader;

impl ReadSource for FsReader {
    fn read(&self, path: &Path) -> Option<String> {
        return std::fs::read_to_string(path).ok();
    }
}

/// An index document is the manifest file named exactly `index.md`.
pub fn is_index_document(path: &Path) -> bool {
    return path.file_name().is_some_and(|name| return name == "index.md");
}

/// Merge the index document with every readable referenced document into one
/// markdown string.
///
/// Referenced files that cannot be read are reported on stderr and
/// contribute no segment; assembly always completes. Reads happen in link
/// order so diagnostics match reference order.
pub fn assemble(ctx: &IndexContext, mode: AssembleMode, reader: &dyn ReadSource) -> String {
    return serialize_segments(&assemble_segments(ctx, mode, reader));
}

/// Produce the ordered segments for one assembly run without serializing.
/// The first segment is always the preamble; the rest follow link order.
pub fn assemble_segments(
    ctx: &IndexContext,
    mode: AssembleMode,
    reader: &dyn ReadSource,
) -> Vec<ContentSegment> {
    return match mode {
        AssembleMode::InlineAnchors => build_inline_anchor_segments(ctx, reader),
        AssembleMode::TableOfContents => build_table_of_contents_segments(ctx, reader),
    };
}

/// Preamble carries the index folder's base name and the outline
/// placeholder; each referenced document follows verbatim. No anchors are
/// produced in this mode.
fn build_table_of_contents_segments(
    ctx: &IndexContext,
    reader: &dyn ReadSource,
) -> Vec<ContentSegment> {
    let mut segments = Vec::with_capacity(ctx.links.len().saturating_add(1));
    segments.push(ContentSegment {
        anchor_name: None,
        body: format!("{}\n\n{TOC_MARKER}", ctx.base_name()),
        source_label: ctx.base_name(),
    });
    append_referenced_segments(ctx, reader, false, &mut segments);
    return segments;
}

/// Preamble carries the index's own text with every link target rewritten to
/// an in-document fragment; each referenced document gets an anchor named
/// after its reference.
fn build_inline_anchor_segments(
    ctx: &IndexContext,
    reader: &dyn ReadSource,
) -> Vec<ContentSegment> {
    let mut segments = Vec::with_capacity(ctx.links.len().saturating_add(1));
    segments.push(ContentSegment {
        anchor_name: None,
        body: rewrite_references_to_fragments(&ctx.raw_text, ctx),
        source_label: ctx.base_name(),
    });
    append_referenced_segments(ctx, reader, true, &mut segments);
    return segments;
}

/// Rewrite every occurrence of each link's reference into `#reference`.
/// The replacement is global per reference, applied in link order. A
/// reference that occurs inside a longer occurrence is rewritten there too.
fn rewrite_references_to_fragments(raw_text: &str, ctx: &IndexContext) -> String {
    let mut text = raw_text.to_string();
    for link in &ctx.links {
        text = text.replace(&link.reference, &format!("#{}", link.reference));
    }
    return text;
}

/// Read each referenced document in link order and append its segment.
/// Unreadable targets are warned about and skipped.
fn append_referenced_segments(
    ctx: &IndexContext,
    reader: &dyn ReadSource,
    with_anchors: bool,
    segments: &mut Vec<ContentSegment>,
) {
    for link in &ctx.links {
        let file_path = ctx.base_folder.join(&link.reference);
        let Some(body) = reader.read(&file_path) else {
            diagnostics::warn_missing_reference(&ctx.index_path, &file_path);
            continue;
        };
        segments.push(ContentSegment {
            anchor_name: with_anchors.then(|| return link.reference.clone()),
            body,
            source_label: link.label.clone(),
        });
    }
}

/// Serialize segments into one document: the anchor line when present, the
/// body, then the page-break marker; segments join with a plain newline.
pub fn serialize_segments(segments: &[ContentSegment]) -> String {
    let mut parts = Vec::with_capacity(segments.len());
    for segment in segments {
        let mut part = String::new();
        if let Some(anchor) = &segment.anchor_name {
            let _ = writeln!(part, "<a name=\"{anchor}\"></a>");
        }
        part.push_str(&segment.body);
        part.push('\n');
        part.push_str(PAGE_BREAK);
        part.push('\n');
        parts.push(part);
    }
    return parts.join("\n");
}
