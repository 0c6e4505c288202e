//! Import, normalize, validate and format bibliographic references.
//!
//! `bibnorm` turns heterogeneous bibliographic input into one canonical
//! [`Reference`] record and renders that record back into citation text.
//!
//! # Key Features
//!
//! - **Multiple Format Support**: Import references from:
//!   - CSV with English and Portuguese column aliases
//!   - JSON (arrays, single-array wrappers or bare objects)
//!   - BibTeX
//!   - RIS (Research Information Systems)
//!   - HTML paragraphs and plain text blocks
//!
//! - **Citation Styles**: ABNT, APA, Vancouver and MLA, each with
//!   required-field validation and a deterministic short-form renderer.
//!   ABNT additionally has a type-aware long form for books, articles,
//!   conference papers, theses and websites.
//!
//! # Basic Usage
//!
//! ```rust
//! use bibnorm::{ReferenceParser, RisParser};
//!
//! let input = "TY  - JOUR\nTI  - Example Article\nAU  - Smith, John\nER  - \n";
//!
//! let parser = RisParser::new();
//! let references = parser.parse(input).unwrap();
//! assert_eq!(references[0].title, "Example Article");
//! ```
//!
//! # Bulk Import
//!
//! ```rust
//! use bibnorm::ingest::{ingest, ImportFormat, IngestOptions};
//!
//! let input = b"titulo,autores,ano\nDom Casmurro,Machado de Assis,1899";
//! let report = ingest(ImportFormat::Csv, input, &IngestOptions::default()).unwrap();
//! assert_eq!(report.valid_count, 1);
//! assert_eq!(report.records[0].authors, "Machado de Assis");
//! ```
//!
//! # Formatting
//!
//! ```rust
//! use bibnorm::{format_record, Reference};
//!
//! let mut reference = Reference::new("T");
//! reference.authors = "A".to_string();
//! reference.publisher = Some("P".to_string());
//! reference.year = Some("2020".to_string());
//!
//! assert_eq!(format_record(&reference, "abnt", false), "A. T. P, 2020.");
//! ```
//!
//! # Error Handling
//!
//! Only structurally invalid input aborts an import. Everything else (a row
//! without a title, a malformed year) is collected per record:
//!
//! ```rust
//! use bibnorm::{parse, ReferenceError};
//!
//! match parse("json", b"{not valid", "abnt", false) {
//!     Err(e) if e.is_invalid_input() => eprintln!("Rejected upload: {}", e),
//!     Err(e) => eprintln!("Other error: {}", e),
//!     Ok(report) => println!("Imported {} references", report.valid_count),
//! }
//! ```
//!
//! # Thread Safety
//!
//! Parsers and formatters hold no shared mutable state; every parser is
//! `Send + Sync` and can be shared between threads.

use thiserror::Error;

#[cfg(feature = "csv")]
extern crate csv as csv_crate;

pub mod bibtex;
pub mod correction;
#[cfg(feature = "csv")]
pub mod csv;
pub mod field_map;
pub mod format;
pub mod html;
pub mod ingest;
pub mod json;
pub mod reference;
pub mod ris;
pub mod type_map;
pub mod validate;

mod regex;
mod utils;

// Reexports
pub use bibtex::BibtexParser;
#[cfg(feature = "csv")]
pub use csv::CsvParser;
pub use format::{format_reference, format_reference_typed};
pub use html::{HtmlParser, PlainTextParser};
pub use ingest::{ImportFormat, ImportReport, IngestOptions};
pub use json::JsonParser;
pub use reference::{CitationStyle, ImportSource, Reference, ReferenceType};
pub use ris::RisParser;
pub use validate::{ValidationReport, is_valid_reference, validate_reference};

/// A specialized Result type for reference operations.
pub type Result<T> = std::result::Result<T, ReferenceError>;

/// Errors that abort an import or a parse.
///
/// Per-record problems are never reported through this type; they end up in
/// [`ImportReport::rejected`] and [`ImportReport::warnings`].
#[derive(Error, Debug)]
pub enum ReferenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

impl ReferenceError {
    /// Whether the error belongs to the invalid-input class, i.e. the caller
    /// sent something that can never be parsed.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            ReferenceError::InvalidInput(_)
                | ReferenceError::Json(_)
                | ReferenceError::UnsupportedFormat(_)
        )
    }
}

#[cfg(feature = "csv")]
impl From<csv_crate::Error> for ReferenceError {
    fn from(err: csv_crate::Error) -> Self {
        ReferenceError::InvalidInput(err.to_string())
    }
}

/// Trait for implementing reference parsers.
pub trait ReferenceParser {
    /// Parse a string containing zero or more references.
    ///
    /// Input that simply contains no references yields an empty vector, not
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError` if the input is structurally malformed.
    fn parse(&self, input: &str) -> Result<Vec<Reference>>;
}

/// Parses uploaded bytes in the named format.
///
/// `format` accepts the names understood by [`ImportFormat`]'s `FromStr`
/// implementation; an unknown name fails with
/// [`ReferenceError::UnsupportedFormat`]. An unknown `style` falls back to ABNT.
pub fn parse(
    format: &str,
    raw: &[u8],
    style: &str,
    preserve_formatting: bool,
) -> Result<ImportReport> {
    let format: ImportFormat = format.parse()?;
    let options = IngestOptions::new()
        .with_style(CitationStyle::from_name(style).unwrap_or_default())
        .with_preserve_formatting(preserve_formatting);
    ingest::ingest(format, raw, &options)
}

/// Checks a record against the required fields of `style`.
pub fn validate_record(record: &Reference, style: &str) -> ValidationReport {
    validate_reference(record, style)
}

/// Renders a record, using the type-aware long form when `type_aware` is set.
pub fn format_record(record: &Reference, style: &str, type_aware: bool) -> String {
    if type_aware {
        format_reference_typed(record, style)
    } else {
        format_reference(record, style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reference_error_display() {
        let error = ReferenceError::InvalidInput("Invalid line".to_string());
        assert_eq!(error.to_string(), "Invalid input: Invalid line");
    }

    #[test]
    fn test_invalid_input_class() {
        assert!(ReferenceError::UnsupportedFormat("docx".into()).is_invalid_input());
        let io = std::io::Error::other("disk");
        assert!(!ReferenceError::from(io).is_invalid_input());
    }

    #[test]
    fn test_bibtex_round_trip_to_abnt() {
        let input = b"@book{k1, title={T}, author={A}, publisher={P}, year={2020}}";
        let report = parse("bibtex", input, "abnt", false).unwrap();
        assert_eq!(report.records.len(), 1);
        assert_eq!(format_record(&report.records[0], "abnt", false), "A. T. P, 2020.");
    }

    #[test]
    fn test_plaintext_blocks() {
        let report = parse("plaintext", b"Ref one\n\nRef two\n\n\nRef three", "abnt", false).unwrap();
        let titles: Vec<_> = report.records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["Ref one", "Ref two", "Ref three"]);
    }

    #[test]
    fn test_malformed_json() {
        let result = parse("json", b"{not valid", "abnt", false);
        assert!(matches!(result, Err(ReferenceError::Json(_))));
    }

    #[test]
    fn test_unsupported_format() {
        let result = parse("docx", b"anything", "abnt", false);
        assert!(matches!(result, Err(ReferenceError::UnsupportedFormat(_))));
    }

    #[cfg(feature = "csv")]
    #[test]
    fn test_portuguese_csv_headers() {
        let report = parse("csv", b"titulo,autores,ano\nO Cortico,Aluisio Azevedo,1890", "abnt", false)
            .unwrap();
        let record = &report.records[0];
        assert_eq!(record.title, "O Cortico");
        assert_eq!(record.authors, "Aluisio Azevedo");
        assert_eq!(record.year.as_deref(), Some("1890"));
    }

    #[test]
    fn test_validate_record_apa() {
        let mut record = Reference::new("X");
        record.authors = "Y".to_string();
        record.year = Some("2020".to_string());
        assert!(validate_record(&record, "apa").valid);

        record.year = Some("20".to_string());
        let report = validate_record(&record, "apa");
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].field, "year");
    }
}
