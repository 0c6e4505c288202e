//! BibTeX format parser implementation.
//!
//! # Example
//!
//! ```
//! use bibnorm::{BibtexParser, ReferenceParser, ReferenceType};
//!
//! let input = r#"@inproceedings{lamport1978,
//!   author    = {Leslie Lamport},
//!   title     = {Time, Clocks, and the Ordering of Events in a {Distributed} System},
//!   booktitle = {Communications of the ACM},
//!   year      = {1978}
//! }"#;
//!
//! let references = BibtexParser::new().parse(input).unwrap();
//! assert_eq!(
//!     references[0].title,
//!     "Time, Clocks, and the Ordering of Events in a Distributed System"
//! );
//! assert_eq!(references[0].reference_type, ReferenceType::Conference);
//! assert_eq!(references[0].source_key.as_deref(), Some("lamport1978"));
//! ```

mod scan;
mod structure;

pub use structure::MISSING_TITLE;

use crate::{CitationStyle, Reference, ReferenceParser, Result};
use scan::scan_entries;
use tracing::debug;

/// Parser for BibTeX entries.
#[derive(Debug, Clone, Default)]
pub struct BibtexParser {
    style: CitationStyle,
}

impl BibtexParser {
    /// Creates a new BibTeX parser instance.
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

impl ReferenceParser for BibtexParser {
    /// Parses every `@type{key, ...}` entry in the input.
    ///
    /// `@comment`, `@preamble` and `@string` blocks are skipped. Never fails.
    fn parse(&self, input: &str) -> Result<Vec<Reference>> {
        let entries = scan_entries(input);
        debug!(entries = entries.len(), "scanned BibTeX input");
        Ok(entries
            .into_iter()
            .map(|entry| entry.into_reference(self.style))
            .collect())
    }
}
