//! CSV format parser implementation.
//!
//! This module parses header-driven CSV files. Column names are resolved
//! through the [`FieldMapper`] alias table, so both English and Portuguese
//! headers work out of the box.
//!
//! # Example
//!
//! ```
//! use bibnorm::{CsvParser, ReferenceParser};
//!
//! let input = "titulo,autores,editora,ano\nVidas Secas,Graciliano Ramos,José Olympio,1938";
//!
//! let references = CsvParser::new().parse(input).unwrap();
//! assert_eq!(references[0].title, "Vidas Secas");
//! assert_eq!(references[0].publisher.as_deref(), Some("José Olympio"));
//! ```

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::warn;

use crate::field_map::{CanonicalField, FieldMapper, RawRecord};
use crate::{CitationStyle, ImportSource, Reference, ReferenceParser, Result};

/// Configuration for CSV parsing.
///
/// # Examples
///
/// ```
/// use bibnorm::csv::CsvConfig;
/// use bibnorm::field_map::CanonicalField;
///
/// let mut config = CsvConfig::new();
/// config
///     .add_header_aliases(CanonicalField::Title, ["Nome da obra"])
///     .set_delimiter(b';');
/// ```
#[derive(Debug, Clone)]
pub struct CsvConfig {
    /// Header alias resolution
    mapper: FieldMapper,
    /// Delimiter to use for parsing the CSV. Sniffed from the header row
    /// when unset
    delimiter: Option<u8>,
    /// Whether to trim whitespace around cells
    trim: bool,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvConfig {
    /// Creates a new CSV configuration with default settings
    #[must_use]
    pub fn new() -> Self {
        Self {
            mapper: FieldMapper::new(),
            delimiter: None,
            trim: true,
        }
    }

    /// Adds header aliases for a field on top of the defaults
    pub fn add_header_aliases<I, S>(&mut self, field: CanonicalField, aliases: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.mapper.add_aliases(field, aliases);
        self
    }

    /// Sets the delimiter character
    pub fn set_delimiter(&mut self, delimiter: u8) -> &mut Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Sets whether cells are trimmed
    pub fn set_trim(&mut self, trim: bool) -> &mut Self {
        self.trim = trim;
        self
    }
}

/// Parser for CSV-formatted reference data.
///
/// The first row is always the header row. Every following row becomes one
/// reference; rows may have fewer or more cells than the header.
#[derive(Debug, Clone, Default)]
pub struct CsvParser {
    config: CsvConfig,
    style: CitationStyle,
}

impl CsvParser {
    /// Creates a new CSV parser with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new CSV parser with custom configuration
    #[must_use]
    pub fn with_config(mut self, config: CsvConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the style given to rows without a style column
    #[must_use]
    pub fn with_style(mut self, style: CitationStyle) -> Self {
        self.style = style;
        self
    }

    /// The configured delimiter, or the one the header row suggests,
    /// falling back to a comma
    fn delimiter_for(&self, input: &str) -> u8 {
        self.config.delimiter.unwrap_or_else(|| {
            let header = input.lines().next().unwrap_or_default();
            self.config.mapper.sniff_delimiter(header).unwrap_or(b',')
        })
    }

    /// Parses a record into a Reference using the current header mapping
    fn parse_record(&self, headers: &StringRecord, record: &StringRecord) -> Reference {
        let mut raw = RawRecord::new();
        for (header, value) in headers.iter().zip(record.iter()) {
            raw.push(header, value);
        }

        let mut reference = self.config.mapper.to_reference(raw, self.style);
        reference.import_source = Some(ImportSource::Csv);
        reference
    }
}

impl ReferenceParser for CsvParser {
    fn parse(&self, input: &str) -> Result<Vec<Reference>> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter_for(input))
            .has_headers(true)
            .flexible(true)
            .trim(if self.config.trim { Trim::All } else { Trim::None })
            .from_reader(input.as_bytes());

        let headers = reader.headers()?.clone();

        let mut references = Vec::new();
        for (index, result) in reader.records().enumerate() {
            match result {
                Ok(record) => references.push(self.parse_record(&headers, &record)),
                Err(e) => warn!(row = index + 1, error = %e, "skipping unreadable CSV row"),
            }
        }

        Ok(references)
    }
}
