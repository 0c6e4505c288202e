//! Resolution of format-native keys onto canonical reference fields.
//!
//! CSV headers and JSON keys come in many spellings, in English and in
//! Portuguese. [`FieldMapper`] resolves them through an alias table and
//! builds a [`Reference`] from a [`RawRecord`].
//!
//! # Example
//!
//! ```
//! use bibnorm::field_map::{FieldMapper, RawRecord};
//! use bibnorm::CitationStyle;
//!
//! let mut raw = RawRecord::new();
//! raw.push("Titulo", "Memórias Póstumas de Brás Cubas");
//! raw.push("Ano", "1881");
//! raw.push("Acervo", "Biblioteca Nacional");
//!
//! let reference = FieldMapper::new().to_reference(raw, CitationStyle::Abnt);
//! assert_eq!(reference.year.as_deref(), Some("1881"));
//! assert_eq!(reference.extra_fields["Acervo"], "Biblioteca Nacional");
//! ```

use crate::reference::ImportSource;
use crate::type_map;
use crate::{CitationStyle, Reference};
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::debug;

/// Canonical reference fields a raw key can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    Title,
    Subtitle,
    Authors,
    Year,
    Publisher,
    Journal,
    Volume,
    Issue,
    Pages,
    Doi,
    Url,
    AccessDate,
    Institution,
    Event,
    Type,
    Style,
    FormattedReference,
    ImportSource,
    SourceKey,
}

/// Delimiters a header row is tried against, in order of preference.
const CANDIDATE_DELIMITERS: [u8; 3] = [b',', b';', b'\t'];

/// Default aliases for every canonical field. Lookups are case-insensitive.
pub(crate) const DEFAULT_ALIASES: &[(CanonicalField, &[&str])] = &[
    (CanonicalField::Title, &["title", "titulo", "título"]),
    (CanonicalField::Subtitle, &["subtitle", "subtitulo", "subtítulo"]),
    (CanonicalField::Authors, &["authors", "author", "autores", "autor"]),
    (CanonicalField::Year, &["year", "ano"]),
    (CanonicalField::Publisher, &["publisher", "editora"]),
    (
        CanonicalField::Journal,
        &["journal", "revista", "periodico", "periódico"],
    ),
    (CanonicalField::Volume, &["volume", "vol"]),
    (CanonicalField::Issue, &["issue", "number", "numero", "número"]),
    (CanonicalField::Pages, &["pages", "paginas", "páginas"]),
    (CanonicalField::Doi, &["doi"]),
    (CanonicalField::Url, &["url", "link"]),
    (
        CanonicalField::AccessDate,
        &["accessdate", "access_date", "dataacesso", "data_acesso"],
    ),
    (
        CanonicalField::Institution,
        &["institution", "instituicao", "instituição"],
    ),
    (CanonicalField::Event, &["event", "evento"]),
    (CanonicalField::Type, &["type", "tipo"]),
    (CanonicalField::Style, &["style", "estilo"]),
    (
        CanonicalField::FormattedReference,
        &["formattedreference", "referenciaformatada"],
    ),
    (CanonicalField::ImportSource, &["importsource"]),
    (CanonicalField::SourceKey, &["sourcekey"]),
];

static DEFAULT_REVERSE_MAP: LazyLock<HashMap<String, CanonicalField>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    for (field, aliases) in DEFAULT_ALIASES {
        for alias in *aliases {
            map.insert(alias.to_lowercase(), *field);
        }
    }
    map
});

/// An ordered list of format-native key/value pairs, not yet field-mapped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    pub(crate) fields: Vec<(String, String)>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a key/value pair. Later pairs win over earlier ones that
    /// resolve to the same field.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.push((key.into(), value.into()));
    }
}

/// Resolves raw keys onto canonical fields.
///
/// Starts from the default alias table; extra aliases can be added per
/// parser.
#[derive(Debug, Clone, Default)]
pub struct FieldMapper {
    /// Aliases registered on top of the defaults
    custom: HashMap<String, CanonicalField>,
}

impl FieldMapper {
    /// Creates a mapper using only the default alias table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds aliases for a field. Custom aliases take precedence over defaults.
    pub fn add_aliases<I, S>(&mut self, field: CanonicalField, aliases: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for alias in aliases {
            self.custom.insert(normalize_key(alias.as_ref()), field);
        }
        self
    }

    /// Finds the canonical field for a raw key, if any.
    pub fn resolve(&self, key: &str) -> Option<CanonicalField> {
        let key = normalize_key(key);
        self.custom
            .get(&key)
            .or_else(|| DEFAULT_REVERSE_MAP.get(&key))
            .copied()
    }

    /// Picks the delimiter that splits a header row into the most
    /// recognized column names. `None` when no candidate yields any.
    ///
    /// Comma, semicolon and tab are tried; ties go to the earlier one.
    pub fn sniff_delimiter(&self, header: &str) -> Option<u8> {
        let header = header.trim_start_matches('\u{feff}');
        let mut best: Option<(u8, usize)> = None;
        for delimiter in CANDIDATE_DELIMITERS {
            let recognized = header
                .split(char::from(delimiter))
                .filter(|cell| self.resolve(cell.trim().trim_matches('"')).is_some())
                .count();
            if recognized > 0 && best.is_none_or(|(_, count)| recognized > count) {
                best = Some((delimiter, recognized));
            }
        }
        best.map(|(delimiter, _)| delimiter)
    }

    /// Builds a reference from a raw record.
    ///
    /// Empty values are skipped. Keys that resolve to no field are kept
    /// verbatim in `extra_fields`. A missing or unrecognized `style` falls back
    /// to `default_style`.
    pub fn to_reference(&self, raw: RawRecord, default_style: CitationStyle) -> Reference {
        let mut reference = Reference {
            style: default_style,
            ..Default::default()
        };

        for (key, value) in raw.fields {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }

            let Some(field) = self.resolve(&key) else {
                reference.extra_fields.insert(key, value.to_string());
                continue;
            };

            let owned = || Some(value.to_string());
            match field {
                CanonicalField::Title => reference.title = value.to_string(),
                CanonicalField::Subtitle => reference.subtitle = owned(),
                CanonicalField::Authors => reference.authors = value.to_string(),
                CanonicalField::Year => reference.year = owned(),
                CanonicalField::Publisher => reference.publisher = owned(),
                CanonicalField::Journal => reference.journal = owned(),
                CanonicalField::Volume => reference.volume = owned(),
                CanonicalField::Issue => reference.issue = owned(),
                CanonicalField::Pages => reference.pages = owned(),
                CanonicalField::Doi => reference.doi = owned(),
                CanonicalField::Url => reference.url = owned(),
                CanonicalField::AccessDate => reference.access_date = owned(),
                CanonicalField::Institution => reference.institution = owned(),
                CanonicalField::Event => reference.event = owned(),
                CanonicalField::Type => reference.reference_type = type_map::from_label(value),
                CanonicalField::Style => match CitationStyle::from_name(value) {
                    Some(style) => reference.style = style,
                    None => debug!(style = value, "unknown style, keeping default"),
                },
                CanonicalField::FormattedReference => reference.formatted_reference = owned(),
                CanonicalField::ImportSource => {
                    reference.import_source = ImportSource::from_name(value)
                }
                CanonicalField::SourceKey => reference.source_key = owned(),
            }
        }

        reference
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}
