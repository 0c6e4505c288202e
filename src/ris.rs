//! RIS format parser implementation.
//!
//! RIS records start with a `TY` line and end with an `ER` line; every line in
//! between is a two-character tag, exactly two spaces, a dash, a space and the
//! value.
//!
//! # Example
//!
//! ```
//! use bibnorm::{ReferenceParser, ReferenceType, RisParser};
//!
//! let input = "TY  - JOUR
//! TI  - Example Title
//! AU  - Smith, John
//! AU  - Doe, Jane
//! SP  - 10
//! EP  - 20
//! ER  - ";
//!
//! let references = RisParser::new().parse(input).unwrap();
//! assert_eq!(references[0].title, "Example Title");
//! assert_eq!(references[0].authors, "Smith, John; Doe, Jane");
//! assert_eq!(references[0].pages.as_deref(), Some("10-20"));
//! assert_eq!(references[0].reference_type, ReferenceType::Article);
//! ```

mod parse;
mod structure;
mod tags;

pub use tags::RisTag;

use crate::{CitationStyle, Reference, ReferenceParser, Result};
use parse::ris_parse;

/// Parser for RIS format references.
#[derive(Debug, Clone, Default)]
pub struct RisParser {
    style: CitationStyle,
}

impl RisParser {
    /// Creates a new RIS parser instance.
    ///
    /// # Examples
    ///
    /// ```
    /// use bibnorm::RisParser;
    /// let parser = RisParser::new();
    /// ```
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
}

impl ReferenceParser for RisParser {
    /// Parses a string containing one or more references in RIS format.
    ///
    /// Never fails: input without any `TY` record yields an empty vector.
    /// Records without a title are returned with an empty title.
    fn parse(&self, input: &str) -> Result<Vec<Reference>> {
        Ok(ris_parse(input)
            .into_iter()
            .map(|raw| raw.into_reference(self.style))
            .collect())
    }
}
