//! Rendering of references as citation text.
//!
//! There are two entry points:
//!
//! - [`format_reference`] renders the short form of any style;
//! - [`format_reference_typed`] renders the ABNT long form, which depends on
//!   the reference type, and falls back to the short form for other styles.
//!
//! Both are pure and total. A fragment whose field is blank is left out
//! together with its punctuation.
//!
//! # Example
//!
//! ```
//! use bibnorm::{format_reference, format_reference_typed, Reference, ReferenceType};
//!
//! let mut reference = Reference::new("O Alienista");
//! reference.authors = "Machado de Assis".to_string();
//! reference.publisher = Some("Garnier".to_string());
//! reference.year = Some("1882".to_string());
//! reference.reference_type = ReferenceType::Book;
//!
//! assert_eq!(
//!     format_reference(&reference, "apa"),
//!     "Machado de Assis (1882). O Alienista. Garnier."
//! );
//! assert_eq!(
//!     format_reference_typed(&reference, "abnt"),
//!     "ASSIS, Machado de. O Alienista. Garnier, 1882."
//! );
//! ```

mod abnt;

use crate::CitationStyle;
use crate::Reference;
use crate::utils::{non_blank, non_blank_str};

/// Rendering of a reference without a usable title.
pub const INVALID_REFERENCE: &str = "Referência inválida";

/// Renders the short form of `reference` in `style`.
///
/// An unrecognized style name renders `{title} ({authors}, {year})`.
pub fn format_reference(reference: &Reference, style: &str) -> String {
    let Some(title) = non_blank_str(&reference.title) else {
        return INVALID_REFERENCE.to_string();
    };

    let rendered = match CitationStyle::from_name(style) {
        Some(CitationStyle::Abnt) => format_abnt(reference, title),
        Some(CitationStyle::Apa) => format_apa(reference, title),
        Some(CitationStyle::Vancouver) => format_vancouver(reference, title),
        Some(CitationStyle::Mla) => format_mla(reference, title),
        None => format_fallback(reference, title),
    };
    rendered.trim_end().to_string()
}

/// Renders the type-aware long form of `reference`.
///
/// Only ABNT has a long form; other styles render the short form.
pub fn format_reference_typed(reference: &Reference, style: &str) -> String {
    match CitationStyle::from_name(style) {
        Some(CitationStyle::Abnt) => match non_blank_str(&reference.title) {
            Some(title) => abnt::format_long(reference, title),
            None => INVALID_REFERENCE.to_string(),
        },
        _ => format_reference(reference, style),
    }
}

/// Concatenates the fragments whose field is present. Each fragment is
/// `(field, before, after)` and keeps its punctuation verbatim.
fn render(fragments: &[(Option<&str>, &str, &str)]) -> String {
    fragments
        .iter()
        .filter_map(|(field, before, after)| field.map(|value| format!("{before}{value}{after}")))
        .collect()
}

fn authors(reference: &Reference) -> Option<&str> {
    non_blank_str(&reference.authors)
}

fn format_abnt(reference: &Reference, title: &str) -> String {
    render(&[
        (authors(reference), "", ". "),
        (Some(title), "", ". "),
        (non_blank(&reference.publisher), "", ", "),
        (non_blank(&reference.year), "", "."),
    ])
}

fn format_apa(reference: &Reference, title: &str) -> String {
    render(&[
        (authors(reference), "", " "),
        (non_blank(&reference.year), "(", "). "),
        (Some(title), "", ". "),
        (non_blank(&reference.publisher), "", "."),
    ])
}

fn format_vancouver(reference: &Reference, title: &str) -> String {
    let mut locator = non_blank(&reference.year).unwrap_or_default().to_string();
    if let Some(volume) = non_blank(&reference.volume) {
        if !locator.is_empty() {
            locator.push(';');
        }
        locator.push_str(volume);
    }
    if let Some(issue) = non_blank(&reference.issue) {
        locator.push_str(&format!("({issue})"));
    }
    if let Some(pages) = non_blank(&reference.pages) {
        if !locator.is_empty() {
            locator.push(':');
        }
        locator.push_str(pages);
    }

    render(&[
        (authors(reference), "", ". "),
        (Some(title), "", ". "),
        (non_blank(&reference.journal), "", ". "),
        (non_blank_str(&locator), "", "."),
    ])
}

fn format_mla(reference: &Reference, title: &str) -> String {
    render(&[
        (authors(reference), "", ". "),
        (Some(title), "\"", ".\" "),
        (non_blank(&reference.publisher), "", ", "),
        (non_blank(&reference.year), "", "."),
    ])
}

fn format_fallback(reference: &Reference, title: &str) -> String {
    let details: Vec<&str> = [authors(reference), non_blank(&reference.year)]
        .into_iter()
        .flatten()
        .collect();
    if details.is_empty() {
        title.to_string()
    } else {
        format!("{title} ({})", details.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn full() -> Reference {
        Reference {
            title: "T".to_string(),
            authors: "A".to_string(),
            year: Some("2020".to_string()),
            publisher: Some("P".to_string()),
            journal: Some("J".to_string()),
            volume: Some("5".to_string()),
            issue: Some("2".to_string()),
            pages: Some("10-20".to_string()),
            ..Default::default()
        }
    }

    #[rstest]
    #[case("abnt", "A. T. P, 2020.")]
    #[case("apa", "A (2020). T. P.")]
    #[case("vancouver", "A. T. J. 2020;5(2):10-20.")]
    #[case("mla", "A. \"T.\" P, 2020.")]
    #[case("chicago", "T (A, 2020)")]
    #[case("ABNT", "A. T. P, 2020.")]
    fn test_short_form(#[case] style: &str, #[case] expected: &str) {
        assert_eq!(format_reference(&full(), style), expected);
    }

    #[rstest]
    #[case("abnt", "T.")]
    #[case("apa", "T.")]
    #[case("vancouver", "T.")]
    #[case("mla", "\"T.\"")]
    #[case("other", "T")]
    fn test_title_only(#[case] style: &str, #[case] expected: &str) {
        assert_eq!(format_reference(&Reference::new("T"), style), expected);
    }

    #[test]
    fn test_vancouver_separators() {
        let mut reference = Reference::new("T");
        reference.volume = Some("5".to_string());
        reference.pages = Some("1-9".to_string());
        assert_eq!(format_reference(&reference, "vancouver"), "T. 5:1-9.");

        reference.volume = None;
        reference.year = Some("2001".to_string());
        assert_eq!(format_reference(&reference, "vancouver"), "T. 2001:1-9.");
    }

    #[test]
    fn test_blank_title() {
        let mut reference = full();
        reference.title = "  ".to_string();
        assert_eq!(format_reference(&reference, "abnt"), INVALID_REFERENCE);
        assert_eq!(format_reference_typed(&reference, "abnt"), INVALID_REFERENCE);
    }

    #[test]
    fn test_fragment_punctuation_kept_verbatim() {
        let mut reference = Reference::new("Uma obra.");
        reference.authors = "Silva, J.".to_string();
        reference.publisher = Some("P".to_string());
        assert_eq!(format_reference(&reference, "abnt"), "Silva, J.. Uma obra.. P,");
        assert_eq!(format_reference(&reference, "mla"), "Silva, J.. \"Uma obra..\" P,");
    }

    #[rstest]
    #[case("abnt", "A. T. P,")]
    #[case("apa", "A T. P.")]
    #[case("mla", "A. \"T.\" P,")]
    fn test_publisher_without_year(#[case] style: &str, #[case] expected: &str) {
        let mut reference = full();
        reference.year = None;
        assert_eq!(format_reference(&reference, style), expected);
    }

    #[rstest]
    #[case("abnt", "T. 2020.")]
    #[case("apa", "(2020). T.")]
    #[case("mla", "\"T.\" 2020.")]
    fn test_year_without_authors_or_publisher(#[case] style: &str, #[case] expected: &str) {
        let mut reference = Reference::new("T");
        reference.year = Some("2020".to_string());
        assert_eq!(format_reference(&reference, style), expected);
    }

    #[test]
    fn test_fallback_partial() {
        let mut reference = Reference::new("T");
        reference.year = Some("1999".to_string());
        assert_eq!(format_reference(&reference, "harvard"), "T (1999)");
    }

    #[test]
    fn test_typed_falls_back_to_short_form() {
        assert_eq!(
            format_reference_typed(&full(), "apa"),
            format_reference(&full(), "apa")
        );
    }

    #[test]
    fn test_pure() {
        let reference = full();
        assert_eq!(
            format_reference(&reference, "mla"),
            format_reference(&reference, "mla")
        );
    }
}
