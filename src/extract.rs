use pulldown_cmark::{Event, Parser, Tag, TagEnd};

use crate::types::Link;

/// Scan progress for the link currently being assembled.
/// Threaded through the event loop as a plain value, never shared state.
enum LinkScan {
    /// A label was already emitted for the open link; later text runs in the
    /// same link are ignored.
    Emitted,
    /// A link opened with this target; waiting for its first text run.
    LinkOpen(String),
    /// Not inside a link, or the open link had no usable target.
    NoOpenLink,
}

/// Extract every outgoing link of a markdown document, in source order.
///
/// Links are not deduplicated: a reference used twice yields two entries.
/// A link missing either a target or visible text contributes nothing, and
/// malformed input never fails; unparsable constructs are simply skipped.
pub fn extract_links(text: &str) -> Vec<Link> {
    let mut links = Vec::new();
    let mut scan = LinkScan::NoOpenLink;
    let mut image_depth = 0_u32;

    for event in Parser::new(text) {
        match event {
            Event::Start(Tag::Link { dest_url, .. }) => {
                scan = if dest_url.is_empty() {
                    LinkScan::NoOpenLink
                } else {
                    LinkScan::LinkOpen(dest_url.to_string())
                };
            }
            Event::End(TagEnd::Link) => scan = LinkScan::NoOpenLink,
            Event::Start(Tag::Image { .. }) => image_depth = image_depth.saturating_add(1),
            Event::End(TagEnd::Image) => image_depth = image_depth.saturating_sub(1),
            Event::Text(run) | Event::Code(run) => {
                // Alt text inside an image never becomes a label.
                if image_depth == 0 {
                    scan = advance_on_text_run(scan, &run, &mut links);
                }
            }
            _ => {}
        }
    }

    links
}

/// Feed one text run into the scan state, emitting a link when the run
/// provides the label for an open target.
fn advance_on_text_run(scan: LinkScan, run: &str, links: &mut Vec<Link>) -> LinkScan {
    match scan {
        LinkScan::LinkOpen(reference) => {
            if run.is_empty() {
                return LinkScan::LinkOpen(reference);
            }
            links.push(Link {
                label: run.to_string(),
                reference,
            });
            LinkScan::Emitted
        }
        other => other,
    }
}
