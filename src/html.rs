//! HTML paragraph and plain text parsers.
//!
//! Both formats carry one reference per block with no field structure: the
//! whole block becomes the title and the display text.
//!
//! # Example
//!
//! ```
//! use bibnorm::{HtmlParser, PlainTextParser, ReferenceParser};
//!
//! let html = "<p>SILVA, J. <i>Obra</i>. 2020.</p>\n<p>SOUZA, M. Outra. 2021.</p>";
//! let references = HtmlParser::new().parse(html).unwrap();
//! assert_eq!(references[0].title, "SILVA, J. <i>Obra</i>. 2020.");
//!
//! let text = "First reference\n\nSecond reference";
//! let references = PlainTextParser::new()
//!     .with_preserve_formatting(true)
//!     .parse(text)
//!     .unwrap();
//! assert_eq!(
//!     references[1].formatted_reference.as_deref(),
//!     Some("<p>Second reference</p>")
//! );
//! ```

mod split;

use crate::regex::static_regex;
use crate::{CitationStyle, ImportSource, Reference, ReferenceParser, Result};
use split::BlankLineSplit;
use tracing::debug;

static_regex!(PARAGRAPH, r"(?s)<p>(.*?)</p>");

fn block_reference(
    title: &str,
    formatted: String,
    style: CitationStyle,
    source: ImportSource,
) -> Reference {
    Reference {
        title: title.to_string(),
        formatted_reference: Some(formatted),
        style,
        import_source: Some(source),
        ..Default::default()
    }
}

/// Parser for `<p>...</p>` blocks in an HTML fragment.
///
/// Inner markup such as `<i>` is kept in the title; only the paragraph tags
/// are removed. Text outside paragraphs is ignored.
#[derive(Debug, Clone, Default)]
pub struct HtmlParser {
    style: CitationStyle,
    preserve_formatting: bool,
}

impl HtmlParser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the style given to every parsed reference.
    #[must_use]
    pub fn with_style(mut self, style: CitationStyle) -> Self {
        self.style = style;
        self
    }

    /// Keeps the tagged paragraph as the formatted reference.
    #[must_use]
    pub fn with_preserve_formatting(mut self, preserve_formatting: bool) -> Self {
        self.preserve_formatting = preserve_formatting;
        self
    }
}

impl ReferenceParser for HtmlParser {
    fn parse(&self, input: &str) -> Result<Vec<Reference>> {
        let references: Vec<Reference> = PARAGRAPH
            .captures_iter(input)
            .filter_map(|captures| {
                let paragraph = captures.get(0)?.as_str();
                let title = captures.get(1)?.as_str().trim();
                let formatted = if self.preserve_formatting {
                    paragraph.to_string()
                } else {
                    title.to_string()
                };
                Some(block_reference(title, formatted, self.style, ImportSource::Html))
            })
            .collect();

        debug!(paragraphs = references.len(), "scanned HTML input");
        Ok(references)
    }
}

/// Parser for plain text with one reference per paragraph.
///
/// Paragraphs are separated by one or more blank lines.
#[derive(Debug, Clone, Default)]
pub struct PlainTextParser {
    style: CitationStyle,
    preserve_formatting: bool,
}

impl PlainTextParser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the style given to every parsed reference.
    #[must_use]
    pub fn with_style(mut self, style: CitationStyle) -> Self {
        self.style = style;
        self
    }

    /// Wraps each block in `<p>` tags in the formatted reference.
    #[must_use]
    pub fn with_preserve_formatting(mut self, preserve_formatting: bool) -> Self {
        self.preserve_formatting = preserve_formatting;
        self
    }
}

impl ReferenceParser for PlainTextParser {
    fn parse(&self, input: &str) -> Result<Vec<Reference>> {
        Ok(BlankLineSplit::new(input)
            .map(|(line_number, block)| {
                let block = block.trim();
                debug!(line_number, "plain text reference block");
                let formatted = if self.preserve_formatting {
                    format!("<p>{block}</p>")
                } else {
                    block.to_string()
                };
                block_reference(block, formatted, self.style, ImportSource::PlainText)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_html_paragraphs() {
        let input = "<div>\n<p>  One  </p><p>Two\nlines</p>\nstray text</div>";
        let references = HtmlParser::new().parse(input).unwrap();
        let titles: Vec<_> = references.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["One", "Two\nlines"]);
        assert_eq!(references[0].formatted_reference.as_deref(), Some("One"));
        assert_eq!(references[0].import_source, Some(ImportSource::Html));
    }

    #[test]
    fn test_html_preserve_formatting() {
        let input = "<p>A <b>bold</b> ref</p>";
        let references = HtmlParser::new()
            .with_preserve_formatting(true)
            .parse(input)
            .unwrap();
        assert_eq!(references[0].title, "A <b>bold</b> ref");
        assert_eq!(
            references[0].formatted_reference.as_deref(),
            Some("<p>A <b>bold</b> ref</p>")
        );
    }

    #[test]
    fn test_html_non_greedy() {
        let references = HtmlParser::new().parse("<p>a</p> x <p>b</p>").unwrap();
        assert_eq!(references.len(), 2);
    }

    #[test]
    fn test_html_without_paragraphs() {
        assert!(HtmlParser::new().parse("<div>none</div>").unwrap().is_empty());
    }

    #[test]
    fn test_plain_text_blocks() {
        let input = "Ref one\n\nRef two\n  \n\nRef three";
        let references = PlainTextParser::new()
            .with_style(CitationStyle::Vancouver)
            .parse(input)
            .unwrap();
        let titles: Vec<_> = references.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["Ref one", "Ref two", "Ref three"]);
        assert_eq!(references[2].formatted_reference.as_deref(), Some("Ref three"));
        assert_eq!(references[2].style, CitationStyle::Vancouver);
        assert_eq!(references[2].import_source, Some(ImportSource::PlainText));
    }

    #[test]
    fn test_plain_text_multiline_block() {
        let input = "SILVA, J.\nObra completa.\n2020.\n";
        let references = PlainTextParser::new()
            .with_preserve_formatting(true)
            .parse(input)
            .unwrap();
        assert_eq!(references.len(), 1);
        assert_eq!(
            references[0].formatted_reference.as_deref(),
            Some("<p>SILVA, J.\nObra completa.\n2020.</p>")
        );
    }
}
