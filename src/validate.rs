//! Per-style required-field validation.
//!
//! # Example
//!
//! ```
//! use bibnorm::{validate_reference, Reference};
//!
//! let mut reference = Reference::new("Quarto de Despejo");
//! reference.authors = "Carolina Maria de Jesus".to_string();
//! reference.year = Some("1960".to_string());
//!
//! let report = validate_reference(&reference, "abnt");
//! assert!(!report.valid);
//! assert_eq!(report.errors[0].field, "publisher");
//! ```

use crate::regex::static_regex;
use crate::utils::{non_blank, non_blank_str};
use crate::{CitationStyle, Reference};
use serde::Serialize;
use std::fmt;

static_regex!(YEAR, r"^[0-9]{4}$");

/// Kind of a field error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationErrorKind {
    /// Required field absent or blank
    Missing,
    /// Field present but badly formed
    Format,
}

/// A problem with one field of a reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Canonical field name, as serialized (`title`, `year`, ...)
    pub field: &'static str,
    pub message: String,
    pub kind: ValidationErrorKind,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Outcome of validating a reference against a style.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<FieldError>,
}

/// Field names required by each style, in report order.
fn required_fields(style: CitationStyle) -> &'static [&'static str] {
    match style {
        CitationStyle::Abnt => &["title", "authors", "publisher", "year"],
        CitationStyle::Apa => &["title", "authors", "year"],
        CitationStyle::Vancouver => &["title", "authors", "journal", "year"],
        CitationStyle::Mla => &["title", "authors", "publisher", "year"],
    }
}

fn field_value<'a>(reference: &'a Reference, field: &str) -> Option<&'a str> {
    match field {
        "title" => non_blank_str(&reference.title),
        "authors" => non_blank_str(&reference.authors),
        "publisher" => non_blank(&reference.publisher),
        "journal" => non_blank(&reference.journal),
        "year" => non_blank(&reference.year),
        _ => None,
    }
}

/// Whether `year` is exactly four ASCII digits.
pub(crate) fn is_well_formed_year(year: &str) -> bool {
    YEAR.is_match(year)
}

/// Error for a present year that is not four digits, if any.
pub(crate) fn year_format_error(reference: &Reference) -> Option<FieldError> {
    let year = non_blank(&reference.year)?;
    (!is_well_formed_year(year)).then(|| FieldError {
        field: "year",
        message: format!("ano deve ter 4 dígitos, encontrado \"{year}\""),
        kind: ValidationErrorKind::Format,
    })
}

/// Checks a reference against the required fields of `style`.
///
/// An unknown style name is checked against the ABNT set. A present year
/// that is not four digits adds one format error.
pub fn validate_reference(reference: &Reference, style: &str) -> ValidationReport {
    let style = CitationStyle::from_name(style).unwrap_or_default();

    let mut errors: Vec<FieldError> = required_fields(style)
        .iter()
        .filter(|field| field_value(reference, field).is_none())
        .map(|&field| FieldError {
            field,
            message: format!("campo obrigatório ausente para {style}"),
            kind: ValidationErrorKind::Missing,
        })
        .collect();
    errors.extend(year_format_error(reference));

    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}

/// Whether a reference may be persisted at all: its title is not blank.
pub fn is_valid_reference(reference: &Reference) -> bool {
    reference.has_title()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn complete() -> Reference {
        Reference {
            title: "T".to_string(),
            authors: "A".to_string(),
            year: Some("2020".to_string()),
            publisher: Some("P".to_string()),
            journal: Some("J".to_string()),
            ..Default::default()
        }
    }

    #[rstest]
    #[case("abnt")]
    #[case("apa")]
    #[case("vancouver")]
    #[case("mla")]
    #[case("chicago")]
    fn test_complete_record_valid(#[case] style: &str) {
        assert!(validate_reference(&complete(), style).valid);
    }

    #[rstest]
    #[case("abnt", &["authors", "publisher", "year"])]
    #[case("apa", &["authors", "year"])]
    #[case("vancouver", &["authors", "journal", "year"])]
    #[case("mla", &["authors", "publisher", "year"])]
    #[case("unknown", &["authors", "publisher", "year"])]
    fn test_missing_fields(#[case] style: &str, #[case] expected: &[&str]) {
        let report = validate_reference(&Reference::new("T"), style);
        let fields: Vec<_> = report.errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, expected);
        assert!(report
            .errors
            .iter()
            .all(|e| e.kind == ValidationErrorKind::Missing));
    }

    #[test]
    fn test_blank_counts_as_missing() {
        let mut reference = complete();
        reference.authors = "   ".to_string();
        reference.publisher = Some(" ".to_string());
        let report = validate_reference(&reference, "abnt");
        let fields: Vec<_> = report.errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, ["authors", "publisher"]);
    }

    #[rstest]
    #[case("20", false)]
    #[case("2020", true)]
    #[case("2020a", false)]
    #[case("٢٠٢٠", false)]
    #[case(" 2020 ", true)]
    fn test_year_format(#[case] year: &str, #[case] valid: bool) {
        let mut reference = complete();
        reference.year = Some(year.to_string());
        let report = validate_reference(&reference, "apa");
        assert_eq!(report.valid, valid);
        if !valid {
            assert_eq!(report.errors.len(), 1);
            assert_eq!(report.errors[0].kind, ValidationErrorKind::Format);
        }
    }

    #[test]
    fn test_is_valid_reference() {
        assert!(is_valid_reference(&Reference::new("X")));
        assert!(!is_valid_reference(&Reference::new(" \t")));
    }
}
