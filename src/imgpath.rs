//! Image reference canonicalization for a local file-loading renderer.

use percent_encoding::percent_decode_str;

/// Rewrite an image reference into a form a file-loading layout engine can
/// resolve: an absolute `file:` URI with the slash count its path form
/// requires, an already-qualified remote URI, or, when the reference cannot
/// be classified, the original input unchanged.
///
/// Handles relative paths, POSIX-absolute paths, Windows drive-letter paths,
/// UNC paths, `file://`/`file:///` URIs, remote URIs, and references
/// containing spaces, quotes, `#`, or percent-escapes. Never fails.
pub fn resolve_image_reference(image_ref: &str, containing_doc: &str) -> String {
    let href = normalize_reference(image_ref);

    match classify(&href) {
        RefForm::FileUri => {
            if href.starts_with("file:///") {
                return href;
            }
            match href.strip_prefix("file://") {
                Some(tail) => format!("file:///{tail}"),
                // `file:` with fewer than two slashes cannot be classified;
                // pass it through.
                None => href,
            }
        }
        // A qualified non-file URI is already renderer-consumable.
        RefForm::OtherUri => image_ref.to_string(),
        RefForm::Pathlike => {
            let resolved = resolve_against_document(&href, containing_doc);
            prefix_file_scheme(&normalize_separators_and_fragments(&resolved))
        }
    }
}

/// The three shapes a normalized reference can take.
enum RefForm {
    /// `file:` scheme in any slash form.
    FileUri,
    /// Some other scheme, `http:`/`https:` typically.
    OtherUri,
    /// No scheme at all: a relative or OS-native absolute path.
    Pathlike,
}

fn classify(href: &str) -> RefForm {
    match leading_scheme(href) {
        Some("file:") => RefForm::FileUri,
        Some(_) => RefForm::OtherUri,
        None => RefForm::Pathlike,
    }
}

/// Undo URL escaping, drop stray quote characters, and normalize the
/// separator and fragment forms.
fn normalize_reference(image_ref: &str) -> String {
    let decoded = percent_decode_str(image_ref).decode_utf8_lossy();
    let unquoted: String = decoded.chars().filter(|c| !matches!(c, '"' | '\'')).collect();
    normalize_separators_and_fragments(&unquoted)
}

/// Backslashes become forward slashes; a literal `#` would truncate the path
/// at a fragment boundary, so it is re-escaped.
fn normalize_separators_and_fragments(path: &str) -> String {
    path.replace('\\', "/").replace('#', "%23")
}

/// The scheme (including the trailing colon) when the reference starts with
/// one. A single character before the colon is a drive letter, not a scheme.
fn leading_scheme(reference: &str) -> Option<&str> {
    let colon = reference.find(':')?;
    if colon < 2 {
        return None;
    }
    let head = reference.get(..colon)?;
    let mut chars = head.chars();
    if !chars.next()?.is_ascii_alphabetic() {
        return None;
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-')) {
        reference.get(..=colon)
    } else {
        None
    }
}

/// A reference is filesystem-absolute when it starts with `/` (POSIX or UNC
/// form) or with a drive letter such as `C:/`.
fn is_filesystem_absolute(reference: &str) -> bool {
    reference.starts_with('/') || is_drive_letter_path(reference)
}

fn is_drive_letter_path(reference: &str) -> bool {
    let mut chars = reference.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(letter), Some(':'), Some('/')) if letter.is_ascii_alphabetic()
    )
}

/// Join a relative reference onto the containing document's directory.
/// Absolute references pass through the resolution step untouched.
fn resolve_against_document(reference: &str, containing_doc: &str) -> String {
    if is_filesystem_absolute(reference) {
        return reference.to_string();
    }
    let doc = normalize_separators_and_fragments(containing_doc);
    let dir = match doc.rfind('/') {
        Some(idx) => doc.get(..idx).unwrap_or(""),
        None => "",
    };
    collapse_dot_segments(&format!("{dir}/{reference}"))
}

/// Collapse `.` and `..` segments without touching the filesystem.
/// Preserves leading `..` when there is nothing left to pop, and the empty
/// leading segments of absolute and UNC forms.
fn collapse_dot_segments(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        push_collapsed_segment(&mut segments, segment);
    }
    segments.join("/")
}

/// Handle a single path segment during normalization.
/// Pops the previous segment for `..` when possible, keeps it otherwise.
fn push_collapsed_segment<'a>(segments: &mut Vec<&'a str>, segment: &'a str) {
    match segment {
        "." => {}
        ".." => {
            let can_pop = matches!(
                segments.last(),
                Some(&prev) if !prev.is_empty() && prev != ".."
            );
            if can_pop {
                segments.pop();
            } else {
                segments.push(segment);
            }
        }
        other => segments.push(other),
    }
}

/// Qualify a resolved filesystem path as a `file:` URI with the slash count
/// its form requires.
fn prefix_file_scheme(path: &str) -> String {
    if path.starts_with("//") {
        // UNC share: file://server/share/...
        format!("file:{path}")
    } else if path.starts_with('/') {
        format!("file://{path}")
    } else {
        format!("file:///{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_path_resolves_against_document_directory() {
        assert_eq!(
            resolve_image_reference("images/a.png", "/docs/index.md"),
            "file:///docs/images/a.png"
        );
    }

    #[test]
    fn parent_segments_collapse_during_resolution() {
        assert_eq!(
            resolve_image_reference("../shared/a.png", "/docs/guide/index.md"),
            "file:///docs/shared/a.png"
        );
    }

    #[test]
    fn posix_absolute_path_gets_double_slash_prefix() {
        assert_eq!(
            resolve_image_reference("/var/img/a.png", "/docs/index.md"),
            "file:///var/img/a.png"
        );
    }

    #[test]
    fn drive_letter_path_gets_triple_slash_prefix() {
        assert_eq!(
            resolve_image_reference("C:\\img\\a.png", "/docs/index.md"),
            "file:///C:/img/a.png"
        );
    }

    #[test]
    fn unc_path_keeps_its_host_segment() {
        assert_eq!(
            resolve_image_reference("\\\\server\\share\\b.png", "/docs/index.md"),
            "file://server/share/b.png"
        );
    }

    #[test]
    fn remote_uri_passes_through_unmodified() {
        assert_eq!(
            resolve_image_reference("https://example.com/a.png", "/docs/index.md"),
            "https://example.com/a.png"
        );
        assert_eq!(
            resolve_image_reference("http://example.com/a%20b.png", "/docs/index.md"),
            "http://example.com/a%20b.png"
        );
    }

    #[test]
    fn double_slash_file_uri_is_normalized_to_triple() {
        assert_eq!(
            resolve_image_reference("file:///docs/a.png", "/docs/index.md"),
            "file:///docs/a.png"
        );
        assert_eq!(
            resolve_image_reference("file://docs/a.png", "/docs/index.md"),
            "file:///docs/a.png"
        );
    }

    #[test]
    fn single_slash_file_form_passes_through() {
        assert_eq!(
            resolve_image_reference("file:/docs/a.png", "/docs/index.md"),
            "file:/docs/a.png"
        );
    }

    #[test]
    fn quotes_are_stripped_and_spaces_survive() {
        assert_eq!(
            resolve_image_reference("\"my picture.png\"", "/docs/index.md"),
            "file:///docs/my picture.png"
        );
    }

    #[test]
    fn fragment_characters_are_escaped() {
        assert_eq!(
            resolve_image_reference("img#1.png", "/docs/index.md"),
            "file:///docs/img%231.png"
        );
    }

    #[test]
    fn percent_escapes_are_decoded_before_resolution() {
        assert_eq!(
            resolve_image_reference("my%20picture.png", "/docs/index.md"),
            "file:///docs/my picture.png"
        );
    }

    #[test]
    fn document_path_with_backslashes_is_normalized() {
        assert_eq!(
            resolve_image_reference("a.png", "C:\\docs\\index.md"),
            "file:///C:/docs/a.png"
        );
    }

    #[test]
    fn resolution_is_idempotent() {
        let doc = "/docs/index.md";
        for input in [
            "images/a.png",
            "/var/img/a.png",
            "C:\\img\\a.png",
            "my%20picture.png",
            "img#1.png",
            "https://example.com/a.png",
            "file:///docs/a.png",
        ] {
            let once = resolve_image_reference(input, doc);
            let twice = resolve_image_reference(&once, doc);
            assert_eq!(twice, once, "not idempotent for {input}");
        }
    }

    #[test]
    fn file_outputs_keep_the_correct_slash_count() {
        let doc = "/docs/index.md";
        for input in ["images/a.png", "/a.png", "C:\\a.png", "\\\\host\\share\\a.png"] {
            let out = resolve_image_reference(input, doc);
            assert!(out.starts_with("file:"), "missing scheme for {input}: {out}");
            assert!(
                !out.starts_with("file:////"),
                "too many slashes for {input}: {out}"
            );
            let unc = out.starts_with("file://") && !out.starts_with("file:///");
            let triple = out.starts_with("file:///");
            assert!(unc || triple, "bare file:/ produced for {input}: {out}");
        }
    }
}
