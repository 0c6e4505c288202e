//! The canonical reference record and its enumerations.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Citation style a reference is rendered and validated against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CitationStyle {
    #[default]
    Abnt,
    Apa,
    Vancouver,
    Mla,
}

impl CitationStyle {
    /// All supported styles.
    pub const ALL: [CitationStyle; 4] = [
        CitationStyle::Abnt,
        CitationStyle::Apa,
        CitationStyle::Vancouver,
        CitationStyle::Mla,
    ];

    /// Looks a style up by name, ignoring case and surrounding whitespace.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "abnt" => Some(CitationStyle::Abnt),
            "apa" => Some(CitationStyle::Apa),
            "vancouver" => Some(CitationStyle::Vancouver),
            "mla" => Some(CitationStyle::Mla),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CitationStyle::Abnt => "abnt",
            CitationStyle::Apa => "apa",
            CitationStyle::Vancouver => "vancouver",
            CitationStyle::Mla => "mla",
        }
    }
}

impl fmt::Display for CitationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of work a reference points at.
///
/// Stored data written by older front ends uses Portuguese labels; those are
/// accepted on input and map one-to-one onto the variants here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceType {
    #[serde(alias = "artigo")]
    Article,
    #[serde(alias = "livro")]
    Book,
    #[serde(alias = "conferencia")]
    Conference,
    #[serde(alias = "dissertacao")]
    Thesis,
    #[serde(alias = "relatorio")]
    Report,
    #[serde(alias = "site")]
    Website,
    Manual,
    #[default]
    #[serde(alias = "outro")]
    Other,
}

impl ReferenceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceType::Article => "article",
            ReferenceType::Book => "book",
            ReferenceType::Conference => "conference",
            ReferenceType::Thesis => "thesis",
            ReferenceType::Report => "report",
            ReferenceType::Website => "website",
            ReferenceType::Manual => "manual",
            ReferenceType::Other => "other",
        }
    }

    /// The Portuguese label used by legacy stored records.
    pub fn legacy_label(&self) -> &'static str {
        match self {
            ReferenceType::Article => "artigo",
            ReferenceType::Book => "livro",
            ReferenceType::Conference => "conferencia",
            ReferenceType::Thesis => "dissertacao",
            ReferenceType::Report => "relatorio",
            ReferenceType::Website => "site",
            ReferenceType::Manual => "manual",
            ReferenceType::Other => "outro",
        }
    }
}

impl fmt::Display for ReferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format a reference was imported from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportSource {
    Csv,
    Json,
    Bibtex,
    Ris,
    Html,
    PlainText,
}

impl ImportSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportSource::Csv => "csv",
            ImportSource::Json => "json",
            ImportSource::Bibtex => "bibtex",
            ImportSource::Ris => "ris",
            ImportSource::Html => "html",
            ImportSource::PlainText => "plaintext",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "csv" => Some(ImportSource::Csv),
            "json" => Some(ImportSource::Json),
            "bibtex" => Some(ImportSource::Bibtex),
            "ris" => Some(ImportSource::Ris),
            "html" => Some(ImportSource::Html),
            "plaintext" => Some(ImportSource::PlainText),
            _ => None,
        }
    }
}

/// A single normalized bibliographic reference.
///
/// Field names serialize exactly as stored records expect them
/// (`formattedReference`, `importSource`, `sourceKey`, `accessDate`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Reference {
    /// Title of the work
    pub title: String,
    pub subtitle: Option<String>,
    /// Free-text author list, `;` or `,` delimited
    pub authors: String,
    /// Publication year, expected to be four digits
    pub year: Option<String>,
    pub publisher: Option<String>,
    /// Journal name
    pub journal: Option<String>,
    pub volume: Option<String>,
    pub issue: Option<String>,
    /// Page range
    pub pages: Option<String>,
    /// Digital Object Identifier
    pub doi: Option<String>,
    pub url: Option<String>,
    pub access_date: Option<String>,
    pub institution: Option<String>,
    /// Conference or event name
    pub event: Option<String>,
    #[serde(rename = "type")]
    pub reference_type: ReferenceType,
    pub style: CitationStyle,
    /// Cached rendering, filled lazily
    pub formatted_reference: Option<String>,
    pub import_source: Option<ImportSource>,
    /// BibTeX citation key
    pub source_key: Option<String>,
    /// Columns or keys that map to no canonical field
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub extra_fields: HashMap<String, String>,
}

impl Reference {
    /// Creates a reference with the given title and defaults everywhere else.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Whether the title is present after trimming.
    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }

    /// Fills `formatted_reference` from the record's own style when a title is
    /// present and no rendering is cached yet.
    ///
    /// Edits made after the first call are not picked up; clear the field to
    /// force a new rendering.
    pub fn ensure_formatted(&mut self, type_aware: bool) {
        let empty = self
            .formatted_reference
            .as_deref()
            .is_none_or(|f| f.trim().is_empty());
        if empty && self.has_title() {
            let rendered = crate::format_record(self, self.style.as_str(), type_aware);
            self.formatted_reference = Some(rendered);
        }
    }
}
