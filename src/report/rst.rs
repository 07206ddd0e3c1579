//! Minimal reStructuredText writer.
//!
//! Lines are never wrapped. Every call appends complete lines terminated by
//! `\n` to an in-memory buffer.

/// Field values shorter than this (together with the name) stay inline.
const INLINE_FIELD_LIMIT: usize = 60;

/// Extra indentation of a field body placed on its own line.
const FIELD_BODY_INDENT: usize = 3;

/// Builder for a single reStructuredText document.
#[derive(Debug, Default)]
pub struct RstWriter {
    output: String,
}

impl RstWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Section heading decorated with `ch`, optionally overlined.
    pub fn heading(&mut self, text: &str, ch: char, overline: bool) {
        let decoration: String = std::iter::repeat(ch).take(text.chars().count()).collect();
        if overline {
            self.line(&decoration, 0);
        }
        self.line(text, 0);
        self.line(&decoration, 0);
    }

    pub fn newline(&mut self) {
        self.output.push('\n');
    }

    /// `.. name:: arg`
    pub fn directive(&mut self, name: &str, arg: &str) {
        self.line(&format!(".. {}:: {}", name, arg), 0);
    }

    /// Field list entry `:name: value`.
    ///
    /// Continuation lines of a multi-line value are indented under the body.
    pub fn field(&mut self, name: &str, value: &str, indent: usize) {
        let body_indent = indent + FIELD_BODY_INDENT;
        let mut lines = value.lines();

        if name.chars().count() + value.chars().count() < INLINE_FIELD_LIMIT {
            let first = lines.next().unwrap_or_default();
            self.line(&format!(":{}: {}", name, first), indent);
        } else {
            self.line(&format!(":{}:", name), indent);
            self.newline();
        }
        for line in lines {
            self.line(line, body_indent);
        }
    }

    /// Free text paragraph line(s).
    pub fn content(&mut self, text: &str, indent: usize) {
        for line in text.lines() {
            self.line(line, indent);
        }
    }

    pub fn finish(self) -> String {
        self.output
    }

    fn line(&mut self, text: &str, indent: usize) {
        if !text.is_empty() {
            self.output.push_str(&" ".repeat(indent));
            self.output.push_str(text);
        }
        self.output.push('\n');
    }
}

/// Inline hyperlink: `` `label <url>`_ ``.
pub fn link(label: &str, url: &str) -> String {
    format!("`{} <{}>`_", label, url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_overline() {
        let mut doc = RstWriter::new();
        doc.heading("Species", '#', true);
        assert_eq!(doc.finish(), "#######\nSpecies\n#######\n");
    }

    #[test]
    fn test_heading_underline_only() {
        let mut doc = RstWriter::new();
        doc.heading("Mouse", '-', false);
        assert_eq!(doc.finish(), "Mouse\n-----\n");
    }

    #[test]
    fn test_short_field_is_inline() {
        let mut doc = RstWriter::new();
        doc.field("full name", "Creative Commons Zero", 3);
        assert_eq!(doc.finish(), "   :full name: Creative Commons Zero\n");
    }

    #[test]
    fn test_long_field_moves_body_to_next_line() {
        let value = "https://creativecommons.org/publicdomain/zero/1.0/legalcode.txt";
        let mut doc = RstWriter::new();
        doc.field("legal code", value, 3);
        assert_eq!(
            doc.finish(),
            format!("   :legal code:\n\n      {}\n", value)
        );
    }

    #[test]
    fn test_multiline_field_keeps_indentation() {
        let mut doc = RstWriter::new();
        doc.field("howToCite", "Doe J.\nAtlas paper", 3);
        assert_eq!(doc.finish(), "   :howToCite: Doe J.\n      Atlas paper\n");

        let value = "A long citation line that does not fit inline at all\nsecond line";
        let mut doc = RstWriter::new();
        doc.field("howToCite", value, 3);
        assert_eq!(
            doc.finish(),
            "   :howToCite:\n\n      A long citation line that does not fit inline at all\n      second line\n"
        );
    }

    #[test]
    fn test_directive_and_content() {
        let mut doc = RstWriter::new();
        doc.directive("admonition", "metadata sheet");
        doc.newline();
        doc.content("------------", 3);
        assert_eq!(
            doc.finish(),
            ".. admonition:: metadata sheet\n\n   ------------\n"
        );
    }

    #[test]
    fn test_link() {
        assert_eq!(
            link("Mouse", "https://example.org/species.html#Mouse"),
            "`Mouse <https://example.org/species.html#Mouse>`_"
        );
    }
}
