use std::path::Path;

use crate::error::Error;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Warn about a link whose target file is absent. Non-fatal: the segment is
/// skipped and assembly continues with the remaining links.
pub fn warn_missing_reference(index: &Path, target: &Path) {
    eprintln!(
        "warning: {}: referenced file not found: {}",
        index.display(),
        target.display()
    );
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and how to fix it.
pub fn render_error(e: &Error) -> String {
    match e {
        Error::DocumentNotFound { path } => format!("\
# Error: Cannot Read Document

`{}` does not exist or is not readable.

## Fix

Check the input path. An index document must be named `index.md`.
", path.display()),

        Error::StylesheetNotFound { path } => format!("\
# Error: Stylesheet Not Found

`{}` does not exist.

## Fix

Check the `stylesheet` path in `.mdbind.toml`, or remove the key to use
the built-in print stylesheet.
", path.display()),

        Error::Io(e) => format!("\
# Error: I/O

{e}
"),

        Error::TomlDe(e) => format!("\
# Error: Invalid TOML

{e}

## Fix

Correct `.mdbind.toml`; it is read whenever it exists, never skipped.
"),
    }
}
