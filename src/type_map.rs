//! Static lookup tables from format-specific type codes to [`ReferenceType`].

use crate::ReferenceType;
use std::collections::HashMap;
use std::sync::LazyLock;

const BIBTEX_TYPES: &[(&str, ReferenceType)] = &[
    ("article", ReferenceType::Article),
    ("book", ReferenceType::Book),
    ("booklet", ReferenceType::Book),
    ("inbook", ReferenceType::Book),
    ("incollection", ReferenceType::Book),
    ("inproceedings", ReferenceType::Conference),
    ("conference", ReferenceType::Conference),
    ("proceedings", ReferenceType::Conference),
    ("manual", ReferenceType::Manual),
    ("mastersthesis", ReferenceType::Thesis),
    ("phdthesis", ReferenceType::Thesis),
    ("techreport", ReferenceType::Report),
    ("unpublished", ReferenceType::Other),
    ("misc", ReferenceType::Other),
];

const RIS_TYPES: &[(&str, ReferenceType)] = &[
    ("JOUR", ReferenceType::Article),
    ("JFULL", ReferenceType::Article),
    ("BOOK", ReferenceType::Book),
    ("CHAP", ReferenceType::Book),
    ("CONF", ReferenceType::Conference),
    ("CPAPER", ReferenceType::Conference),
    ("THES", ReferenceType::Thesis),
    ("RPRT", ReferenceType::Report),
    ("ELEC", ReferenceType::Website),
    ("ICOMM", ReferenceType::Website),
    ("GEN", ReferenceType::Other),
    ("UNPB", ReferenceType::Other),
];

static BIBTEX_MAP: LazyLock<HashMap<&'static str, ReferenceType>> =
    LazyLock::new(|| BIBTEX_TYPES.iter().copied().collect());

static RIS_MAP: LazyLock<HashMap<&'static str, ReferenceType>> =
    LazyLock::new(|| RIS_TYPES.iter().copied().collect());

/// Maps a BibTeX entry type (`article`, `inproceedings`, ...) to a reference type.
///
/// Matching ignores case; unknown entry types map to [`ReferenceType::Other`].
pub fn from_bibtex(entry_type: &str) -> ReferenceType {
    BIBTEX_MAP
        .get(entry_type.trim().to_lowercase().as_str())
        .copied()
        .unwrap_or_default()
}

/// Maps a RIS `TY` code (`JOUR`, `BOOK`, ...) to a reference type.
///
/// Matching ignores case; unknown codes map to [`ReferenceType::Other`].
pub fn from_ris(code: &str) -> ReferenceType {
    RIS_MAP
        .get(code.trim().to_uppercase().as_str())
        .copied()
        .unwrap_or_default()
}

/// Maps a free-text type label from CSV or JSON input.
///
/// Accepts the canonical English names and the legacy Portuguese labels.
pub fn from_label(label: &str) -> ReferenceType {
    let label = label.trim().to_lowercase();
    [
        ReferenceType::Article,
        ReferenceType::Book,
        ReferenceType::Conference,
        ReferenceType::Thesis,
        ReferenceType::Report,
        ReferenceType::Website,
        ReferenceType::Manual,
        ReferenceType::Other,
    ]
    .into_iter()
    .find(|t| t.as_str() == label || t.legacy_label() == label)
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("article", ReferenceType::Article)]
    #[case("Book", ReferenceType::Book)]
    #[case("incollection", ReferenceType::Book)]
    #[case("inproceedings", ReferenceType::Conference)]
    #[case("manual", ReferenceType::Manual)]
    #[case("phdthesis", ReferenceType::Thesis)]
    #[case("techreport", ReferenceType::Report)]
    #[case("misc", ReferenceType::Other)]
    #[case("software", ReferenceType::Other)]
    fn test_from_bibtex(#[case] input: &str, #[case] expected: ReferenceType) {
        assert_eq!(from_bibtex(input), expected);
    }

    #[rstest]
    #[case("JOUR", ReferenceType::Article)]
    #[case("JFULL", ReferenceType::Article)]
    #[case("CHAP", ReferenceType::Book)]
    #[case("CPAPER", ReferenceType::Conference)]
    #[case("THES", ReferenceType::Thesis)]
    #[case("RPRT", ReferenceType::Report)]
    #[case("ELEC", ReferenceType::Website)]
    #[case("UNPB", ReferenceType::Other)]
    #[case("PAT", ReferenceType::Other)]
    fn test_from_ris(#[case] input: &str, #[case] expected: ReferenceType) {
        assert_eq!(from_ris(input), expected);
    }

    #[rstest]
    #[case("article", ReferenceType::Article)]
    #[case("Livro", ReferenceType::Book)]
    #[case("dissertacao", ReferenceType::Thesis)]
    #[case("site", ReferenceType::Website)]
    #[case("poem", ReferenceType::Other)]
    fn test_from_label(#[case] input: &str, #[case] expected: ReferenceType) {
        assert_eq!(from_label(input), expected);
    }
}
