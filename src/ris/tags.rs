//! RIS tags that carry a reference field.
//!
//! Several RIS codes feed the same field (`AU` and `A1`, the three journal
//! codes, `PY` and `Y1`), so they share one variant. Codes without a field
//! map to [`RisTag::Other`].
//! See: http://en.wikipedia.org/wiki/RIS_(file_format)

/// A RIS tag, by the reference field it fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RisTag {
    /// Opens a record; the value is the reference type code
    Type,
    Title,
    /// Title used only when no `TI` line is present
    TitleAlternative,
    /// Repeats accumulate
    Author,
    /// Last one wins
    Journal,
    /// Only the part before the first `/` is kept
    Year,
    AccessDate,
    Volume,
    Issue,
    StartPage,
    EndPage,
    Doi,
    Url,
    Publisher,
    /// Closes a record
    EndOfReference,
    Other,
}

const CODES: &[(&str, RisTag)] = &[
    ("TY", RisTag::Type),
    ("TI", RisTag::Title),
    ("T1", RisTag::TitleAlternative),
    ("AU", RisTag::Author),
    ("A1", RisTag::Author),
    ("JO", RisTag::Journal),
    ("JF", RisTag::Journal),
    ("JA", RisTag::Journal),
    ("PY", RisTag::Year),
    ("Y1", RisTag::Year),
    ("Y2", RisTag::AccessDate),
    ("VL", RisTag::Volume),
    ("IS", RisTag::Issue),
    ("SP", RisTag::StartPage),
    ("EP", RisTag::EndPage),
    ("DO", RisTag::Doi),
    ("UR", RisTag::Url),
    ("PB", RisTag::Publisher),
    ("ER", RisTag::EndOfReference),
];

impl RisTag {
    /// Looks up a two-character code. Codes are case-sensitive.
    pub fn from_code(code: &str) -> Self {
        CODES
            .iter()
            .find(|(c, _)| *c == code)
            .map_or(RisTag::Other, |(_, tag)| *tag)
    }
}
