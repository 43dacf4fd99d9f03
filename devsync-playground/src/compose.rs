//! Preview composition: three buffers in, one executable document out.
//!
//! The template is fixed. Buffer text is embedded verbatim; the author is the only
//! reader of the result, so nothing is escaped.

use std::fmt;

use crate::buffer::Buffers;

/// A document produced by [`compose`]. Never patched in place, only recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct ComposedDocument(String);

impl ComposedDocument {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for ComposedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ComposedDocument {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Merge markup, style and script into a single document.
///
/// Style goes into the head, markup into the body, the script last in the body.
/// Pure: identical inputs always give an identical document.
pub fn compose(markup: &str, style: &str, script: &str) -> ComposedDocument {
    let mut out = String::with_capacity(markup.len() + style.len() + script.len() + 128);
    out.push_str("<html>\n");
    out.push_str("  <head>\n");
    out.push_str("    <style>");
    out.push_str(style);
    out.push_str("</style>\n");
    out.push_str("  </head>\n");
    out.push_str("  <body>\n");
    out.push_str("    ");
    out.push_str(markup);
    out.push('\n');
    out.push_str("    <script>");
    out.push_str(script);
    out.push_str("</script>\n");
    out.push_str("  </body>\n");
    out.push_str("</html>\n");
    ComposedDocument(out)
}

impl Buffers {
    /// Compose the current buffer values.
    pub fn compose(&self) -> ComposedDocument {
        compose(&self.markup, &self.style, &self.script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_template_layout() {
        let doc = compose("<h1>Hi</h1>", "body{color:red}", "console.log(1)");
        let s = doc.as_str();

        let head_start = s.find("<head>").unwrap();
        let head_end = s.find("</head>").unwrap();
        let style_at = s.find("<style>body{color:red}</style>").unwrap();
        assert!(head_start < style_at && style_at < head_end);

        let body_start = s.find("<body>").unwrap();
        let body_end = s.find("</body>").unwrap();
        let markup_at = s.find("<h1>Hi</h1>").unwrap();
        let script_at = s.find("<script>console.log(1)</script>").unwrap();
        assert!(body_start < markup_at);
        assert!(markup_at < script_at);
        assert!(script_at < body_end);

        assert_eq!(s.matches("<h1>Hi</h1>").count(), 1);
        assert_eq!(s.matches("body{color:red}").count(), 1);
        assert_eq!(s.matches("console.log(1)").count(), 1);
    }

    #[test]
    fn test_compose_is_idempotent() {
        let a = compose("<p>x</p>", "p{}", "let a = 1;");
        let b = compose("<p>x</p>", "p{}", "let a = 1;");
        assert_eq!(a, b);
    }

    #[test]
    fn test_no_escaping_is_applied() {
        let doc = compose("<b>&amp;\"</b>", "a::after{content:\"<\"}", "if (a < b && c) {}");
        assert!(doc.as_str().contains("<b>&amp;\"</b>"));
        assert!(doc.as_str().contains("a::after{content:\"<\"}"));
        assert!(doc.as_str().contains("if (a < b && c) {}"));
    }

    #[test]
    fn test_empty_buffers_still_produce_the_template() {
        let doc = compose("", "", "");
        assert!(doc.as_str().contains("<style></style>"));
        assert!(doc.as_str().contains("<script></script>"));
    }
}
