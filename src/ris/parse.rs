//! RIS format parsing implementation.
//!
//! This module handles the low-level parsing of RIS formatted text.

use crate::ris::structure::RawRisData;
use crate::ris::tags::RisTag;
use tracing::debug;

/// Parse the content of a RIS formatted file, returning one raw record per
/// `TY` line.
///
/// `TY` opens a record, emitting any record still open; `ER` emits the open
/// record. Lines outside a record and lines that are not tag lines are
/// skipped. A record left open at the end of the input is still emitted.
pub(crate) fn ris_parse<S: AsRef<str>>(ris_text: S) -> Vec<RawRisData> {
    let mut citations = Vec::new();
    let mut current: Option<RawRisData> = None;

    for (index, line) in ris_text.as_ref().lines().enumerate() {
        let line_number = index + 1;
        let line = line.trim_end();

        // Skip empty lines
        if line.is_empty() {
            continue;
        }

        let Some((tag, content)) = parse_ris_line(line) else {
            if let Some(open) = current.as_mut() {
                open.add_ignored_line(line_number, line.to_string());
            }
            continue;
        };

        match tag {
            RisTag::Type => {
                if let Some(done) = current.replace(RawRisData::new(content)) {
                    emit(&mut citations, done);
                }
            }
            RisTag::EndOfReference => {
                if let Some(done) = current.take() {
                    emit(&mut citations, done);
                }
            }
            tag => match current.as_mut() {
                Some(open) => open.add_data(tag, content),
                None => debug!(line = line_number, code = &line[..2], "tag outside of a record"),
            },
        }
    }

    // Add the last citation even without a closing ER
    if let Some(done) = current {
        emit(&mut citations, done);
    }

    citations
}

fn emit(citations: &mut Vec<RawRisData>, record: RawRisData) {
    if !record.ignored_lines.is_empty() {
        debug!(
            ignored = record.ignored_lines.len(),
            first_line = record.ignored_lines[0].0,
            "skipped non-tag lines in RIS record"
        );
    }
    citations.push(record);
}

/// Parse a single RIS line of the form `XX  - value`.
///
/// The tag is an uppercase letter followed by an uppercase letter or digit,
/// and the separator is exactly two spaces, a dash and a space. A bare
/// `XX  -` (as commonly written for `ER`) is accepted with empty content.
fn parse_ris_line(line: &str) -> Option<(RisTag, &str)> {
    let bytes = line.as_bytes();
    if bytes.len() < 5 {
        return None;
    }

    let valid_tag = bytes[0].is_ascii_uppercase()
        && (bytes[1].is_ascii_uppercase() || bytes[1].is_ascii_digit());
    if !valid_tag || &bytes[2..5] != b"  -" {
        return None;
    }

    // The first five bytes are ASCII, so these slices fall on char boundaries.
    let rest = &line[5..];
    let content = match rest.strip_prefix(' ') {
        Some(content) => content,
        None if rest.is_empty() => rest,
        None => return None,
    };

    Some((RisTag::from_code(&line[..2]), content.trim()))
}
