//! Conversion of scanned BibTeX entries into references.

use crate::bibtex::scan::RawBibtexEntry;
use crate::type_map;
use crate::utils::non_blank_str;
use crate::{CitationStyle, ImportSource, Reference};

/// Title given to entries that have none.
pub const MISSING_TITLE: &str = "Sem título";

impl RawBibtexEntry {
    /// First non-blank value of a field.
    fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .filter(|(n, _)| n == name)
            .find_map(|(_, v)| non_blank_str(v))
    }

    fn get_owned(&self, name: &str) -> Option<String> {
        self.get(name).map(String::from)
    }

    /// Convert into a reference rendered in `style`.
    ///
    /// Unlike the other formats, an entry without a title is kept and titled
    /// [`MISSING_TITLE`].
    pub(crate) fn into_reference(self, style: CitationStyle) -> Reference {
        let authors = self
            .get("author")
            .or_else(|| self.get("editor"))
            .map(join_bibtex_names)
            .unwrap_or_default();

        Reference {
            title: self.get("title").unwrap_or(MISSING_TITLE).to_string(),
            subtitle: self.get_owned("subtitle"),
            authors,
            year: self.get_owned("year"),
            publisher: self.get_owned("publisher"),
            journal: self.get_owned("journal"),
            volume: self.get_owned("volume"),
            issue: self.get_owned("number"),
            pages: self.get("pages").map(|p| p.replace("--", "-")),
            doi: self.get_owned("doi"),
            url: self.get_owned("url"),
            access_date: self.get_owned("urldate"),
            institution: self
                .get_owned("school")
                .or_else(|| self.get_owned("institution")),
            event: self.get_owned("booktitle"),
            reference_type: type_map::from_bibtex(&self.entry_type),
            style,
            import_source: Some(ImportSource::Bibtex),
            source_key: non_blank_str(&self.cite_key).map(String::from),
            ..Default::default()
        }
    }
}

/// BibTeX separates names with ` and `; the canonical list uses `"; "`.
fn join_bibtex_names(names: &str) -> String {
    names
        .split(" and ")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("; ")
}
