//! RIS format data structures.
//!
//! [`RawRisData`] accumulates one `TY`..`ER` record tag by tag. Most tags
//! overwrite; authors append; start and end pages merge into one range no
//! matter which of the two arrives first.

use crate::ris::tags::RisTag;
use crate::type_map;
use crate::{CitationStyle, ImportSource, Reference};

/// Structured raw data for one RIS record.
#[derive(Debug, Clone, Default)]
pub(crate) struct RawRisData {
    /// Value of the `TY` tag that opened the record.
    pub(crate) type_code: String,
    pub(crate) title: Option<String>,
    pub(crate) authors: Option<String>,
    pub(crate) year: Option<String>,
    pub(crate) publisher: Option<String>,
    pub(crate) journal: Option<String>,
    pub(crate) volume: Option<String>,
    pub(crate) issue: Option<String>,
    pub(crate) pages: Option<String>,
    pub(crate) doi: Option<String>,
    pub(crate) url: Option<String>,
    pub(crate) access_date: Option<String>,
    /// Lines inside the record that were not tag lines, with line numbers.
    pub(crate) ignored_lines: Vec<(usize, String)>,
}

impl RawRisData {
    /// Create a record opened by a `TY` line.
    pub(crate) fn new(type_code: &str) -> Self {
        Self {
            type_code: type_code.to_string(),
            ..Default::default()
        }
    }

    /// Apply one tag line to the record.
    pub(crate) fn add_data(&mut self, tag: RisTag, content: &str) {
        if content.is_empty() {
            return;
        }
        let value = || Some(content.to_string());
        match tag {
            RisTag::Title => self.title = value(),
            RisTag::TitleAlternative => {
                if self.title.is_none() {
                    self.title = value();
                }
            }
            RisTag::Author => self.add_author(content),
            RisTag::Journal => self.journal = value(),
            RisTag::Year => {
                self.year = content.split('/').next().map(str::trim).map(String::from)
            }
            RisTag::AccessDate => self.access_date = value(),
            RisTag::Publisher => self.publisher = value(),
            RisTag::Volume => self.volume = value(),
            RisTag::Issue => self.issue = value(),
            RisTag::StartPage => self.set_start_page(content),
            RisTag::EndPage => self.set_end_page(content),
            RisTag::Doi => self.doi = value(),
            RisTag::Url => self.url = value(),
            RisTag::Type | RisTag::EndOfReference | RisTag::Other => {}
        }
    }

    /// Repeated author tags are joined with `"; "`.
    fn add_author(&mut self, author: &str) {
        match &mut self.authors {
            Some(authors) => {
                authors.push_str("; ");
                authors.push_str(author);
            }
            None => self.authors = Some(author.to_string()),
        }
    }

    /// `SP`: keeps any end page already recorded by `EP`.
    fn set_start_page(&mut self, start: &str) {
        self.pages = Some(match self.pages.as_deref().and_then(|p| p.rsplit_once('-')) {
            Some((_, end)) => format!("{}-{}", start, end),
            None => start.to_string(),
        });
    }

    /// `EP`: replaces the part after the last `-`, or appends `-end`.
    fn set_end_page(&mut self, end: &str) {
        self.pages = Some(match self.pages.as_deref() {
            None => format!("-{}", end),
            Some(pages) => match pages.rsplit_once('-') {
                Some((start, _)) => format!("{}-{}", start, end),
                None => format!("{}-{}", pages, end),
            },
        });
    }

    /// Record a non-tag line seen while the record was open.
    pub(crate) fn add_ignored_line(&mut self, line_number: usize, line: String) {
        self.ignored_lines.push((line_number, line));
    }

    /// Convert into a reference rendered in `style`.
    ///
    /// A missing title yields an empty one; such records are filtered out by
    /// the caller.
    pub(crate) fn into_reference(self, style: CitationStyle) -> Reference {
        Reference {
            title: self.title.unwrap_or_default(),
            authors: self.authors.unwrap_or_default(),
            year: self.year,
            publisher: self.publisher,
            journal: self.journal,
            volume: self.volume,
            issue: self.issue,
            pages: self.pages,
            doi: self.doi,
            url: self.url,
            access_date: self.access_date,
            reference_type: type_map::from_ris(&self.type_code),
            style,
            import_source: Some(ImportSource::Ris),
            ..Default::default()
        }
    }
}
