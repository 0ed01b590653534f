//! Merged markdown → HTML body, with image rewriting and outline expansion.

use std::collections::HashMap;
use std::fmt::Write as _;

use pulldown_cmark::{CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};
use regex::{Captures, Regex};

use crate::assemble::TOC_MARKER;

/// One collected heading, in document order.
struct OutlineEntry {
    level: u32,
    slug: String,
    text: String,
}

/// Extensions enabled for both the collection and render passes.
fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
}

/// Render merged markdown to an HTML body.
///
/// Every image destination (markdown image nodes and `src` attributes of
/// `<img>` tags embedded in raw HTML) is routed through `rewrite_image`,
/// the strategy the caller binds to the source document's path. Headings
/// receive stable slug ids and every outline placeholder paragraph becomes
/// a nested outline linking to them.
pub fn render_html(markdown: &str, rewrite_image: &dyn Fn(&str) -> String) -> String {
    let outline = collect_outline(markdown);
    let mut slugs = outline.iter().map(|entry| entry.slug.clone());
    let src_pattern = Regex::new(r#"(<img\b[^>]*\bsrc=")([^"]*)(")"#).expect("valid regex");

    let events = Parser::new_ext(markdown, parser_options()).map(|event| match event {
        Event::Start(Tag::Heading {
            level,
            classes,
            attrs,
            ..
        }) => {
            let id = slugs.next().map(CowStr::from);
            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            })
        }
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: rewrite_image(&dest_url).into(),
            title,
            id,
        }),
        Event::Html(raw) => {
            Event::Html(rewrite_embedded_img_sources(&raw, &src_pattern, rewrite_image).into())
        }
        Event::InlineHtml(raw) => {
            Event::InlineHtml(rewrite_embedded_img_sources(&raw, &src_pattern, rewrite_image).into())
        }
        other => other,
    });

    let mut body = String::with_capacity(markdown.len().saturating_mul(2));
    html::push_html(&mut body, events);

    expand_toc_markers(&body, &outline)
}

/// Escape text for embedding in HTML element content or attribute values.
pub(crate) fn escape_html_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}

/// Rewrite the `src` attribute of every `<img>` tag in a raw HTML fragment
/// through the same strategy markdown image nodes go through.
fn rewrite_embedded_img_sources(
    raw: &str,
    src_pattern: &Regex,
    rewrite_image: &dyn Fn(&str) -> String,
) -> String {
    src_pattern
        .replace_all(raw, |cap: &Captures<'_>| {
            format!("{}{}{}", &cap[1], rewrite_image(&cap[2]), &cap[3])
        })
        .into_owned()
}

/// Collect headings in document order and assign GitHub-style slugs,
/// suffixing repeats with `-1`, `-2`, ...
fn collect_outline(markdown: &str) -> Vec<OutlineEntry> {
    let mut entries = Vec::new();
    let mut seen: HashMap<String, u32> = HashMap::new();
    let mut open_heading: Option<(u32, String)> = None;

    for event in Parser::new_ext(markdown, parser_options()) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                open_heading = Some((heading_depth(level), String::new()));
            }
            Event::Text(run) | Event::Code(run) => {
                if let Some((_, text)) = open_heading.as_mut() {
                    text.push_str(&run);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, text)) = open_heading.take() {
                    let slug = unique_slug(&slugify(&text), &mut seen);
                    entries.push(OutlineEntry { level, slug, text });
                }
            }
            _ => {}
        }
    }
    entries
}

fn heading_depth(level: HeadingLevel) -> u32 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// GitHub-style slug: lowercase, alphanumeric runs joined by single hyphens.
fn slugify(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Make a slug unique within the document by counting repeats.
fn unique_slug(base: &str, seen: &mut HashMap<String, u32>) -> String {
    let count = seen.entry(base.to_string()).or_insert(0);
    let slug = if *count == 0 {
        base.to_string()
    } else {
        format!("{base}-{count}")
    };
    *count = count.saturating_add(1);
    slug
}

/// Replace every rendered outline placeholder paragraph with the generated
/// outline.
fn expand_toc_markers(body: &str, outline: &[OutlineEntry]) -> String {
    let marker = format!("<p>{TOC_MARKER}</p>");
    if !body.contains(&marker) {
        return body.to_string();
    }
    body.replace(&marker, &render_outline(outline))
}

/// Render collected headings as a nested list of fragment links.
fn render_outline(outline: &[OutlineEntry]) -> String {
    let Some(top) = outline.iter().map(|entry| entry.level).min() else {
        return String::new();
    };

    let mut out = String::from("<nav class=\"toc\">");
    let mut depth = top.saturating_sub(1);
    for entry in outline {
        while depth < entry.level {
            out.push_str("<ul>");
            depth = depth.saturating_add(1);
        }
        while depth > entry.level {
            out.push_str("</ul>");
            depth = depth.saturating_sub(1);
        }
        let _ = write!(
            out,
            "<li><a href=\"#{}\">{}</a></li>",
            entry.slug,
            escape_html_text(&entry.text)
        );
    }
    while depth >= top {
        out.push_str("</ul>");
        depth = depth.saturating_sub(1);
    }
    out.push_str("</nav>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passthrough(src: &str) -> String {
        src.to_string()
    }

    fn to_file_uri(src: &str) -> String {
        crate::imgpath::resolve_image_reference(src, "/docs/index.md")
    }

    #[test]
    fn markdown_image_source_goes_through_the_strategy() {
        let html = render_html("![logo](images/logo.png)", &to_file_uri);
        assert!(
            html.contains("src=\"file:///docs/images/logo.png\""),
            "unexpected html: {html}"
        );
    }

    #[test]
    fn raw_html_img_source_goes_through_the_strategy() {
        let html = render_html(
            "<div>\n<img src=\"images/logo.png\" alt=\"x\">\n</div>\n",
            &to_file_uri,
        );
        assert!(
            html.contains("src=\"file:///docs/images/logo.png\""),
            "unexpected html: {html}"
        );
    }

    #[test]
    fn remote_image_sources_stay_remote() {
        let html = render_html("![ext](https://example.com/a.png)", &to_file_uri);
        assert!(html.contains("src=\"https://example.com/a.png\""));
    }

    #[test]
    fn headings_receive_slug_ids() {
        let html = render_html("# Getting Started\n\n## More Help\n", &passthrough);
        assert!(html.contains("<h1 id=\"getting-started\">"));
        assert!(html.contains("<h2 id=\"more-help\">"));
    }

    #[test]
    fn duplicate_headings_get_counted_slugs() {
        let html = render_html("# Setup\n\n# Setup\n", &passthrough);
        assert!(html.contains("<h1 id=\"setup\">"));
        assert!(html.contains("<h1 id=\"setup-1\">"));
    }

    #[test]
    fn toc_marker_expands_to_an_outline_in_order() {
        let markdown = "[[toc]]\n\n# One\n\n## One A\n\n# Two\n";
        let html = render_html(markdown, &passthrough);

        assert!(!html.contains("[[toc]]"));
        let one = html.find("<a href=\"#one\">One</a>").unwrap();
        let one_a = html.find("<a href=\"#one-a\">One A</a>").unwrap();
        let two = html.find("<a href=\"#two\">Two</a>").unwrap();
        assert!(one < one_a && one_a < two);
    }

    #[test]
    fn document_without_marker_is_untouched() {
        let html = render_html("# Plain\n\nbody text\n", &passthrough);
        assert!(!html.contains("<nav"));
        assert!(html.contains("<h1 id=\"plain\">Plain</h1>"));
    }

    #[test]
    fn outline_nesting_follows_heading_levels() {
        let html = render_html("[[toc]]\n\n# Top\n\n## Sub\n", &passthrough);
        assert!(html.contains(
            "<nav class=\"toc\"><ul><li><a href=\"#top\">Top</a></li>\
             <ul><li><a href=\"#sub\">Sub</a></li></ul></ul></nav>"
        ));
    }

    #[test]
    fn page_break_markup_passes_through_verbatim() {
        let markdown = "text\n\n<div style=\"page-break-after: always;\"></div>\n";
        let html = render_html(markdown, &passthrough);
        assert!(html.contains("<div style=\"page-break-after: always;\"></div>"));
    }

    #[test]
    fn slugify_drops_punctuation_and_case() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Spaced   Out  "), "spaced-out");
        assert_eq!(slugify("Chapter 1"), "chapter-1");
        assert_eq!(slugify("!!!"), "");
    }
}
