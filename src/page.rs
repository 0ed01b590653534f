use std::path::Path;

use crate::error::Error;
use crate::render;

/// Built-in print stylesheet, always emitted first.
const DEFAULT_STYLE: &str = "\
body {
  font-family: -apple-system, 'Segoe UI', Helvetica, Arial, sans-serif;
  font-size: 14px;
  line-height: 1.6;
  max-width: 50em;
  margin: 0 auto;
  padding: 1em 2em;
  word-wrap: break-word;
}
h1, h2 { border-bottom: 1px solid #eaecef; padding-bottom: 0.3em; }
h1, h2, h3, h4, h5, h6 { margin-top: 1.5em; margin-bottom: 0.6em; }
a { color: #0366d6; text-decoration: none; }
img { max-width: 100%; }
pre {
  background-color: #f6f8fa;
  padding: 1em;
  overflow: auto;
  border-radius: 3px;
}
code { font-family: 'SFMono-Regular', Consolas, 'Liberation Mono', monospace; }
table { border-collapse: collapse; }
table th, table td { border: 1px solid #dfe2e5; padding: 0.4em 0.8em; }
blockquote {
  color: #6a737d;
  border-left: 0.25em solid #dfe2e5;
  padding-left: 1em;
  margin-left: 0;
}
nav.toc ul { list-style: none; padding-left: 1.2em; }
@media print {
  a { color: inherit; }
  pre, blockquote, table, img { page-break-inside: avoid; }
}
";

/// Compose the page stylesheet: the built-in sheet, then the configured
/// extra sheet when present.
///
/// # Errors
///
/// Returns `Error::StylesheetNotFound` if a configured sheet cannot be read.
pub fn compose_style(extra_sheet: Option<&Path>) -> Result<String, Error> {
    let mut style = String::from(DEFAULT_STYLE);
    if let Some(path) = extra_sheet {
        let extra = std::fs::read_to_string(path).map_err(|_err| Error::StylesheetNotFound {
            path: path.to_path_buf(),
        })?;
        style.push('\n');
        style.push_str(&extra);
    }
    Ok(style)
}

/// Wrap a rendered body into a standalone HTML document the layout engine
/// can load directly.
pub fn wrap_page(title: &str, style: &str, body: &str) -> String {
    format!(
        "\
<!DOCTYPE html>
<html>
<head>
<meta charset=\"utf-8\">
<title>{title}</title>
<style>
{style}
</style>
</head>
<body>
{body}
</body>
</html>
",
        title = render::escape_html_text(title),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_carries_title_style_and_body() {
        let page = wrap_page("index.md", "body { color: red; }", "<h1>Hi</h1>");
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>index.md</title>"));
        assert!(page.contains("body { color: red; }"));
        assert!(page.contains("<h1>Hi</h1>"));
    }

    #[test]
    fn title_is_html_escaped() {
        let page = wrap_page("a<b>.md", "", "");
        assert!(page.contains("<title>a&lt;b&gt;.md</title>"));
    }

    #[test]
    fn default_style_is_always_first() {
        let style = compose_style(None).unwrap();
        assert!(style.starts_with("body {"));
    }

    #[test]
    fn missing_extra_stylesheet_is_a_classified_error() {
        let result = compose_style(Some(Path::new("/definitely/not/here.css")));
        assert!(matches!(result, Err(Error::StylesheetNotFound { .. })));
    }
}
