//! Bulk import: format selection, parsing, filtering and reporting.
//!
//! [`ingest`] runs one uploaded file through the matching parser, drops the
//! records that cannot be persisted, fills in the display text and reports
//! what happened to every record.
//!
//! # Example
//!
//! ```
//! use bibnorm::ingest::{ingest, ImportFormat, IngestOptions};
//! use bibnorm::CitationStyle;
//!
//! let input = b"TY  - BOOK\nTI  - Iracema\nAU  - Alencar, Jose de\nPY  - 1865\nER  - \n\
//! TY  - BOOK\nAU  - Anonymous\nER  - \n";
//!
//! let format = ImportFormat::resolve(None, Some("export.ris"), input).unwrap();
//! let options = IngestOptions::new().with_style(CitationStyle::Apa);
//! let report = ingest(format, input, &options).unwrap();
//!
//! assert_eq!(report.received_count, 2);
//! assert_eq!(report.valid_count, 1);
//! assert_eq!(report.rejected[0].index, 1);
//! assert_eq!(
//!     report.records[0].formatted_reference.as_deref(),
//!     Some("Alencar, Jose de (1865). Iracema.")
//! );
//! ```

use crate::regex::static_regex;
use crate::validate::year_format_error;
use crate::{
    BibtexParser, CitationStyle, HtmlParser, JsonParser, PlainTextParser, Reference,
    ReferenceError, ReferenceParser, Result, RisParser, is_valid_reference, validate_reference,
};
#[cfg(feature = "csv")]
use crate::csv::{CsvConfig, CsvParser};
use crate::field_map::{CanonicalField, FieldMapper};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

static_regex!(BIBTEX_ENTRY, r"(?m)^\s*@[A-Za-z]+\s*\{");

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportFormat {
    Csv,
    Json,
    Bibtex,
    Ris,
    Html,
    PlainText,
}

impl ImportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportFormat::Csv => "csv",
            ImportFormat::Json => "json",
            ImportFormat::Bibtex => "bibtex",
            ImportFormat::Ris => "ris",
            ImportFormat::Html => "html",
            ImportFormat::PlainText => "plaintext",
        }
    }

    /// Looks a format up by name or file extension, ignoring case.
    fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "csv" => Some(ImportFormat::Csv),
            "json" => Some(ImportFormat::Json),
            "bibtex" | "bib" => Some(ImportFormat::Bibtex),
            "ris" => Some(ImportFormat::Ris),
            "html" | "htm" => Some(ImportFormat::Html),
            "plaintext" | "txt" | "text" => Some(ImportFormat::PlainText),
            _ => None,
        }
    }

    /// Format implied by a file name such as `refs.bib`.
    pub fn from_extension(file_name: &str) -> Option<Self> {
        let (_, extension) = file_name.rsplit_once('.')?;
        Self::from_name(extension)
    }

    /// Guesses the format from the content itself.
    ///
    /// Falls back to plain text, which accepts anything.
    pub fn detect(content: &str) -> Self {
        let trimmed = content.trim_start_matches('\u{feff}').trim();

        if trimmed.starts_with('[') || trimmed.starts_with('{') {
            ImportFormat::Json
        } else if trimmed.starts_with("TY  -") || trimmed.contains("\nTY  -") {
            ImportFormat::Ris
        } else if BIBTEX_ENTRY.is_match(trimmed) {
            ImportFormat::Bibtex
        } else if trimmed.contains("<p>") {
            ImportFormat::Html
        } else if looks_like_csv_header(trimmed.lines().next().unwrap_or_default()) {
            ImportFormat::Csv
        } else {
            ImportFormat::PlainText
        }
    }

    /// Picks the format of an upload.
    ///
    /// A declared name wins and must be known; otherwise the file extension
    /// is tried, then the content.
    ///
    /// # Errors
    ///
    /// [`ReferenceError::UnsupportedFormat`] for an unknown declared name.
    pub fn resolve(declared: Option<&str>, file_name: Option<&str>, content: &[u8]) -> Result<Self> {
        if let Some(declared) = declared {
            return declared.parse();
        }
        if let Some(format) = file_name.and_then(Self::from_extension) {
            return Ok(format);
        }
        let format = Self::detect(&String::from_utf8_lossy(content));
        debug!(format = %format, "detected input format from content");
        Ok(format)
    }
}

/// A delimited header row that names the title column under a known alias.
///
/// Uses the same delimiter sniffing as the CSV parser, so whatever is
/// detected here also parses there.
fn looks_like_csv_header(line: &str) -> bool {
    let mapper = FieldMapper::new();
    mapper.sniff_delimiter(line).is_some_and(|delimiter| {
        let delimiter = char::from(delimiter);
        line.contains(delimiter)
            && line.split(delimiter).any(|cell| {
                mapper.resolve(cell.trim().trim_matches('"')) == Some(CanonicalField::Title)
            })
    })
}

impl FromStr for ImportFormat {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s).ok_or_else(|| ReferenceError::UnsupportedFormat(s.trim().to_string()))
    }
}

impl fmt::Display for ImportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for one import.
///
/// # Examples
///
/// ```
/// use bibnorm::ingest::IngestOptions;
/// use bibnorm::CitationStyle;
///
/// let options = IngestOptions::new()
///     .with_style(CitationStyle::Vancouver)
///     .with_strict(true)
///     .with_type_aware(false);
/// ```
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Style given to records that do not name one
    pub style: CitationStyle,
    /// Keep the source markup of HTML and plain text blocks
    pub preserve_formatting: bool,
    /// Render `formattedReference` with the type-aware long form
    pub type_aware: bool,
    /// Reject records failing the style's required-field check
    pub strict: bool,
    #[cfg(feature = "csv")]
    pub csv: CsvConfig,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            style: CitationStyle::default(),
            preserve_formatting: false,
            type_aware: true,
            strict: false,
            #[cfg(feature = "csv")]
            csv: CsvConfig::default(),
        }
    }
}

impl IngestOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_style(mut self, style: CitationStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_preserve_formatting(mut self, preserve_formatting: bool) -> Self {
        self.preserve_formatting = preserve_formatting;
        self
    }

    #[must_use]
    pub fn with_type_aware(mut self, type_aware: bool) -> Self {
        self.type_aware = type_aware;
        self
    }

    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    #[cfg(feature = "csv")]
    #[must_use]
    pub fn with_csv_config(mut self, csv: CsvConfig) -> Self {
        self.csv = csv;
        self
    }
}

/// Something worth reporting about one parsed record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordIssue {
    /// Position of the record in parser output, from zero
    pub index: usize,
    pub message: String,
}

/// Outcome of one import.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    /// Records that passed filtering, in input order
    pub records: Vec<Reference>,
    /// Number of records the parser produced
    pub received_count: usize,
    /// Number of records kept
    pub valid_count: usize,
    pub rejected: Vec<RecordIssue>,
    /// Problems with kept records, such as a malformed year
    pub warnings: Vec<RecordIssue>,
    /// Summary for display
    pub message: String,
}

/// Decodes raw upload bytes. JSON must be valid UTF-8; other formats are
/// decoded lossily.
fn decode(format: ImportFormat, raw: &[u8]) -> Result<Cow<'_, str>> {
    let raw = raw.strip_prefix(UTF8_BOM).unwrap_or(raw);
    match format {
        ImportFormat::Json => std::str::from_utf8(raw)
            .map(Cow::Borrowed)
            .map_err(|e| ReferenceError::InvalidInput(format!("JSON input is not UTF-8: {e}"))),
        _ => Ok(String::from_utf8_lossy(raw)),
    }
}

fn parser_for(format: ImportFormat, options: &IngestOptions) -> Result<Box<dyn ReferenceParser>> {
    let style = options.style;
    let preserve = options.preserve_formatting;
    Ok(match format {
        ImportFormat::Csv => csv_parser(options)?,
        ImportFormat::Json => Box::new(JsonParser::new().with_style(style)),
        ImportFormat::Bibtex => Box::new(BibtexParser::new().with_style(style)),
        ImportFormat::Ris => Box::new(RisParser::new().with_style(style)),
        ImportFormat::Html => Box::new(
            HtmlParser::new()
                .with_style(style)
                .with_preserve_formatting(preserve),
        ),
        ImportFormat::PlainText => Box::new(
            PlainTextParser::new()
                .with_style(style)
                .with_preserve_formatting(preserve),
        ),
    })
}

#[cfg(feature = "csv")]
fn csv_parser(options: &IngestOptions) -> Result<Box<dyn ReferenceParser>> {
    Ok(Box::new(
        CsvParser::new()
            .with_config(options.csv.clone())
            .with_style(options.style),
    ))
}

#[cfg(not(feature = "csv"))]
fn csv_parser(_options: &IngestOptions) -> Result<Box<dyn ReferenceParser>> {
    Err(ReferenceError::UnsupportedFormat(
        "csv (built without the csv feature)".to_string(),
    ))
}

/// Imports raw file bytes in the given format.
///
/// Records with a blank title are rejected. With
/// [`strict`](IngestOptions::strict), records failing
/// [`validate_reference`] for their own style are rejected too; otherwise a
/// malformed year is only a warning. Kept records get their
/// `formattedReference` filled in when it is empty.
///
/// # Errors
///
/// Only structurally invalid input fails: malformed JSON, an unsupported JSON
/// shape or a format unavailable in this build. A file with no references is
/// an empty report.
pub fn ingest(format: ImportFormat, raw: &[u8], options: &IngestOptions) -> Result<ImportReport> {
    let text = decode(format, raw)?;
    let parsed = parser_for(format, options)?.parse(&text)?;

    let mut report = ImportReport {
        received_count: parsed.len(),
        ..Default::default()
    };

    for (index, mut reference) in parsed.into_iter().enumerate() {
        if !is_valid_reference(&reference) {
            debug!(index, "rejecting record without title");
            report.rejected.push(RecordIssue {
                index,
                message: "título ausente".to_string(),
            });
            continue;
        }

        if options.strict {
            let validation = validate_reference(&reference, reference.style.as_str());
            if !validation.valid {
                debug!(index, errors = validation.errors.len(), "rejecting record in strict mode");
                report.rejected.push(RecordIssue {
                    index,
                    message: validation.errors.iter().join("; "),
                });
                continue;
            }
        } else if let Some(error) = year_format_error(&reference) {
            report.warnings.push(RecordIssue {
                index,
                message: error.to_string(),
            });
        }

        reference.ensure_formatted(options.type_aware);
        report.records.push(reference);
    }

    report.valid_count = report.records.len();
    report.message = if report.received_count == 0 {
        "Nenhuma referência encontrada no arquivo".to_string()
    } else {
        format!(
            "{} de {} referências importadas",
            report.valid_count, report.received_count
        )
    };

    info!(
        format = %format,
        received = report.received_count,
        valid = report.valid_count,
        rejected = report.rejected.len(),
        warnings = report.warnings.len(),
        "import finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ImportSource, ReferenceType};
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case("csv", ImportFormat::Csv)]
    #[case("JSON", ImportFormat::Json)]
    #[case("bib", ImportFormat::Bibtex)]
    #[case("bibtex", ImportFormat::Bibtex)]
    #[case(" ris ", ImportFormat::Ris)]
    #[case("htm", ImportFormat::Html)]
    #[case("txt", ImportFormat::PlainText)]
    #[case("plaintext", ImportFormat::PlainText)]
    fn test_format_from_str(#[case] name: &str, #[case] expected: ImportFormat) {
        assert_eq!(name.parse::<ImportFormat>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_format() {
        let error = "docx".parse::<ImportFormat>().unwrap_err();
        assert!(matches!(error, ReferenceError::UnsupportedFormat(ref f) if f == "docx"));
        assert!(error.is_invalid_input());
    }

    #[rstest]
    #[case("refs.bib", Some(ImportFormat::Bibtex))]
    #[case("EXPORT.RIS", Some(ImportFormat::Ris))]
    #[case("archive.tar.json", Some(ImportFormat::Json))]
    #[case("notes.docx", None)]
    #[case("README", None)]
    fn test_from_extension(#[case] file_name: &str, #[case] expected: Option<ImportFormat>) {
        assert_eq!(ImportFormat::from_extension(file_name), expected);
    }

    #[rstest]
    #[case("[{\"title\": \"x\"}]", ImportFormat::Json)]
    #[case("  {\"references\": []}", ImportFormat::Json)]
    #[case("TY  - JOUR\nER  - ", ImportFormat::Ris)]
    #[case("% header\n@article{k, title={T}}", ImportFormat::Bibtex)]
    #[case("<html><p>Ref</p></html>", ImportFormat::Html)]
    #[case("titulo,autores\nX,Y", ImportFormat::Csv)]
    #[case("Title;Year\nX;2000", ImportFormat::Csv)]
    #[case("SILVA, J. Obra. 2020.\n\nSOUZA, M. Outra.", ImportFormat::PlainText)]
    #[case("mail me at someone@example.com", ImportFormat::PlainText)]
    fn test_detect(#[case] content: &str, #[case] expected: ImportFormat) {
        assert_eq!(ImportFormat::detect(content), expected);
    }

    #[test]
    fn test_resolve_precedence() {
        let content = b"TY  - JOUR\nER  - ";
        assert_eq!(
            ImportFormat::resolve(Some("bibtex"), Some("x.ris"), content).unwrap(),
            ImportFormat::Bibtex
        );
        assert_eq!(
            ImportFormat::resolve(None, Some("x.json"), content).unwrap(),
            ImportFormat::Json
        );
        assert_eq!(
            ImportFormat::resolve(None, None, content).unwrap(),
            ImportFormat::Ris
        );
        assert!(ImportFormat::resolve(Some("xls"), None, content).is_err());
    }

    #[cfg(feature = "csv")]
    #[test]
    fn test_detected_semicolon_csv_imports() {
        let content = b"Title;Year\nX;2000";
        let format = ImportFormat::resolve(None, None, content).unwrap();
        assert_eq!(format, ImportFormat::Csv);

        let report = ingest(format, content, &IngestOptions::default()).unwrap();
        assert_eq!(report.received_count, 1);
        assert_eq!(report.valid_count, 1);
        assert!(report.rejected.is_empty());
        assert_eq!(report.records[0].title, "X");
        assert_eq!(report.records[0].year.as_deref(), Some("2000"));
    }

    #[test]
    fn test_json_counts() {
        let input = br#"[{"title": "A"}, {"title": "B"}, {"title": "C"}]"#;
        let report = ingest(ImportFormat::Json, input, &IngestOptions::default()).unwrap();
        assert_eq!(report.received_count, 3);
        assert_eq!(report.valid_count, 3);
        assert!(report.rejected.is_empty());
        assert_eq!(report.message, "3 de 3 referências importadas");
    }

    #[test]
    fn test_blank_titles_rejected() {
        let input = br#"[{"title": "A"}, {"title": "  "}, 7]"#;
        let report = ingest(ImportFormat::Json, input, &IngestOptions::default()).unwrap();
        assert_eq!(report.received_count, 3);
        assert_eq!(report.valid_count, 1);
        let indices: Vec<_> = report.rejected.iter().map(|r| r.index).collect();
        assert_eq!(indices, [1, 2]);
    }

    #[test]
    fn test_bibtex_keeps_untitled_entries() {
        let input = b"@misc{a, author={X}}";
        let report = ingest(ImportFormat::Bibtex, input, &IngestOptions::default()).unwrap();
        assert_eq!(report.valid_count, 1);
        assert_eq!(report.records[0].title, crate::bibtex::MISSING_TITLE);
    }

    #[test]
    fn test_empty_result() {
        let report = ingest(ImportFormat::Ris, b"nothing here", &IngestOptions::default()).unwrap();
        assert!(report.records.is_empty());
        assert_eq!(report.received_count, 0);
        assert_eq!(report.message, "Nenhuma referência encontrada no arquivo");
    }

    #[test]
    fn test_year_warning_without_rejection() {
        let input = br#"[{"title": "A", "year": "19xx"}]"#;
        let report = ingest(ImportFormat::Json, input, &IngestOptions::default()).unwrap();
        assert_eq!(report.valid_count, 1);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].index, 0);
    }

    #[test]
    fn test_strict_mode() {
        let input = br#"[
            {"title": "A", "authors": "X", "year": "2020"},
            {"title": "B", "year": "20"}
        ]"#;
        let options = IngestOptions::new()
            .with_style(CitationStyle::Apa)
            .with_strict(true);
        let report = ingest(ImportFormat::Json, input, &options).unwrap();
        assert_eq!(report.valid_count, 1);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].index, 1);
        assert!(report.rejected[0].message.starts_with("authors: "));
        assert!(report.rejected[0].message.contains("year: "));
    }

    #[test]
    fn test_formatted_reference_filled() {
        let input = b"@article{k, title={T}, author={Ana Lima}, journal={J}, year={2001}}";
        let report = ingest(ImportFormat::Bibtex, input, &IngestOptions::default()).unwrap();
        assert_eq!(report.records[0].reference_type, ReferenceType::Article);
        assert_eq!(
            report.records[0].formatted_reference.as_deref(),
            Some("LIMA, Ana. T. J, 2001.")
        );

        let options = IngestOptions::new().with_type_aware(false);
        let report = ingest(ImportFormat::Bibtex, input, &options).unwrap();
        assert_eq!(
            report.records[0].formatted_reference.as_deref(),
            Some("Ana Lima. T. 2001.")
        );
    }

    #[test]
    fn test_existing_formatted_reference_kept() {
        let input = br#"[{"title": "T", "formattedReference": "Custom text"}]"#;
        let report = ingest(ImportFormat::Json, input, &IngestOptions::default()).unwrap();
        assert_eq!(report.records[0].formatted_reference.as_deref(), Some("Custom text"));
    }

    #[test]
    fn test_bom_and_lossy_decoding() {
        let mut input = UTF8_BOM.to_vec();
        input.extend_from_slice(b"Ref \xFF one\n\nRef two");
        let report = ingest(ImportFormat::PlainText, &input, &IngestOptions::default()).unwrap();
        assert_eq!(report.valid_count, 2);
        assert!(report.records[0].title.starts_with("Ref "));
        assert_eq!(report.records[0].import_source, Some(ImportSource::PlainText));

        let mut json = UTF8_BOM.to_vec();
        json.extend_from_slice(br#"[{"title": "T"}]"#);
        assert_eq!(
            ingest(ImportFormat::Json, &json, &IngestOptions::default())
                .unwrap()
                .valid_count,
            1
        );
    }

    #[test]
    fn test_json_must_be_utf8() {
        let result = ingest(ImportFormat::Json, b"[\"\xFF\"]", &IngestOptions::default());
        assert!(matches!(result, Err(ReferenceError::InvalidInput(_))));
    }

    #[test]
    fn test_report_serialization() {
        let report = ingest(ImportFormat::Json, br#"[{"title": "T"}]"#, &IngestOptions::default())
            .unwrap();
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["receivedCount"], 1);
        assert_eq!(value["validCount"], 1);
        assert_eq!(value["records"][0]["title"], "T");
    }
}
