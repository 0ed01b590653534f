//! CLI commands for mdbind: export, merge, links.

use std::path::Path;

use crate::assemble::{self, FsReader};
use crate::config::Config;
use crate::error::Error;
use crate::extract;
use crate::imgpath;
use crate::page;
use crate::render;
use crate::types::{AssembleMode, IndexContext};

/// Full pipeline: merge, render, wrap, write the HTML page.
///
/// # Errors
///
/// Returns errors from config loading, reading the input document,
/// stylesheet composition, or writing the output file.
pub fn export(input: &Path, output: &Path, toc_flag: bool) -> Result<(), Error> {
    let config = Config::load(Path::new("."))?;
    let raw_text = read_document(input)?;

    let (merged, summary) = if assemble::is_index_document(input) {
        let ctx = IndexContext::new(input, raw_text);
        let segments = assemble::assemble_segments(&ctx, config.assemble_mode(toc_flag), &FsReader);
        let bound: Vec<&str> = segments
            .iter()
            .skip(1)
            .map(|segment| segment.source_label.as_str())
            .collect();
        let summary = format!("{} sections: {}", bound.len(), bound.join(", "));
        (assemble::serialize_segments(&segments), summary)
    } else {
        (raw_text, "1 document".to_string())
    };

    let containing = input.to_string_lossy();
    let html_body = render::render_html(&merged, &|src| {
        return imgpath::resolve_image_reference(src, &containing);
    });
    let style = page::compose_style(config.stylesheet())?;
    let html = page::wrap_page(&document_title(input), &style, &html_body);

    std::fs::write(output, html)?;
    println!("Wrote {} ({summary})", output.display());
    return Ok(());
}

/// Merge an index with its referenced documents and print the markdown.
///
/// # Errors
///
/// Returns errors from config loading or reading the input document.
pub fn merge(input: &Path, toc_flag: bool) -> Result<(), Error> {
    let config = Config::load(Path::new("."))?;
    let merged = merged_markdown(input, config.assemble_mode(toc_flag))?;
    print!("{merged}");
    return Ok(());
}

/// Print the links extracted from a document, in source order.
///
/// # Errors
///
/// Returns `Error::DocumentNotFound` if the input cannot be read.
pub fn links(input: &Path) -> Result<(), Error> {
    let raw_text = read_document(input)?;
    let links = extract::extract_links(&raw_text);
    for link in &links {
        println!("{} -> {}", link.label, link.reference);
    }
    let count = links.len();
    println!("{count} links");
    return Ok(());
}

/// Produce the merged markdown for the input document.
/// Index documents are assembled with their referenced siblings; any other
/// document merges to its own text.
fn merged_markdown(input: &Path, mode: AssembleMode) -> Result<String, Error> {
    let raw_text = read_document(input)?;
    if !assemble::is_index_document(input) {
        return Ok(raw_text);
    }
    let ctx = IndexContext::new(input, raw_text);
    return Ok(assemble::assemble(&ctx, mode, &FsReader));
}

/// Read the input document. Failure here is fatal: there is nothing
/// sensible to substitute for a missing input.
fn read_document(path: &Path) -> Result<String, Error> {
    return std::fs::read_to_string(path).map_err(|_err| {
        return Error::DocumentNotFound {
            path: path.to_path_buf(),
        };
    });
}

/// Page title: the input file's base name.
fn document_title(input: &Path) -> String {
    return input
        .file_name()
        .map(|name| return name.to_string_lossy().into_owned())
        .unwrap_or_else(|| return input.display().to_string());
}
