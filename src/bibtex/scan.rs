//! Index-based BibTeX scanner.
//!
//! Brace nesting is tracked with an integer depth, so scanning is linear in
//! the input size whatever the input looks like.

use tracing::warn;

/// Entry blocks that carry no reference.
const NON_ENTRY_TYPES: &[&str] = &["comment", "preamble", "string"];

/// One `@type{key, fields}` block, with field names lower-cased and values
/// stripped of their delimiters.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct RawBibtexEntry {
    pub(crate) entry_type: String,
    pub(crate) cite_key: String,
    pub(crate) fields: Vec<(String, String)>,
}

/// Scans `text` for entries.
///
/// Text between entries is ignored. An entry whose outer brace never closes
/// ends the scan.
pub(crate) fn scan_entries(text: &str) -> Vec<RawBibtexEntry> {
    let bytes = text.as_bytes();
    let mut entries = Vec::new();
    let mut pos = 0;

    while let Some(offset) = text[pos..].find('@') {
        let at = pos + offset;
        let type_start = at + 1;
        let type_end = skip_while(bytes, type_start, is_identifier_byte);
        let open = skip_while(bytes, type_end, |b| b.is_ascii_whitespace());

        if type_end == type_start || bytes.get(open) != Some(&b'{') {
            pos = type_start;
            continue;
        }

        let Some(close) = matching_brace(bytes, open) else {
            warn!(offset = at, "unterminated BibTeX entry, stopping scan");
            break;
        };
        pos = close + 1;

        let entry_type = text[type_start..type_end].to_lowercase();
        if NON_ENTRY_TYPES.contains(&entry_type.as_str()) {
            continue;
        }

        let body = &text[open + 1..close];
        let (cite_key, rest) = match body.split_once(',') {
            Some((key, rest)) => (key.trim(), rest),
            None => (body.trim(), ""),
        };

        entries.push(RawBibtexEntry {
            entry_type,
            cite_key: cite_key.to_string(),
            fields: scan_fields(rest),
        });
    }

    entries
}

/// Scans `name = value` pairs separated by commas.
///
/// Values may be `{braced}` (nested braces allowed), `"quoted"` or bare
/// tokens such as numbers and macro names.
fn scan_fields(body: &str) -> Vec<(String, String)> {
    let bytes = body.as_bytes();
    let mut fields = Vec::new();
    let mut i = 0;

    loop {
        i = skip_while(bytes, i, |b| b.is_ascii_whitespace() || b == b',');
        if i >= bytes.len() {
            break;
        }

        let name_end = skip_while(bytes, i, is_identifier_byte);
        let eq = skip_while(bytes, name_end, |b| b.is_ascii_whitespace());
        if name_end == i || bytes.get(eq) != Some(&b'=') {
            // Not a field; resynchronise on the next comma.
            i = skip_while(bytes, i + 1, |b| b != b',');
            continue;
        }
        let name = body[i..name_end].to_lowercase();

        let start = skip_while(bytes, eq + 1, |b| b.is_ascii_whitespace());
        let (value, next) = match bytes.get(start) {
            Some(b'{') => match matching_brace(bytes, start) {
                Some(close) => (&body[start + 1..close], close + 1),
                None => (&body[start + 1..], bytes.len()),
            },
            Some(b'"') => {
                let close = closing_quote(bytes, start + 1);
                (&body[start + 1..close], close + 1)
            }
            Some(_) => {
                let end = skip_while(bytes, start, |b| b != b',');
                (&body[start..end], end)
            }
            None => ("", bytes.len()),
        };

        fields.push((name, clean_value(value)));
        i = next;
    }

    fields
}

/// Index of the brace closing the one at `open`.
fn matching_brace(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate().skip(open) {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Index of the first `"` outside braces at or after `from`, or the end of input.
fn closing_quote(bytes: &[u8], from: usize) -> usize {
    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate().skip(from) {
        match b {
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            b'"' if depth == 0 => return i,
            _ => {}
        }
    }
    bytes.len()
}

fn skip_while(bytes: &[u8], from: usize, predicate: impl Fn(u8) -> bool) -> usize {
    let mut i = from;
    while i < bytes.len() && predicate(bytes[i]) {
        i += 1;
    }
    i
}

fn is_identifier_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b':' | b'.')
}

/// Removes protective braces and folds line breaks and runs of whitespace.
fn clean_value(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace(['{', '}'], "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn field<'a>(entry: &'a RawBibtexEntry, name: &str) -> Option<&'a str> {
        entry
            .fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_scan_single_entry() {
        let entries = scan_entries("@book{k1, title={T}, author={A}, publisher={P}, year={2020}}");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].entry_type, "book");
        assert_eq!(entries[0].cite_key, "k1");
        assert_eq!(
            entries[0].fields,
            vec![
                ("title".to_string(), "T".to_string()),
                ("author".to_string(), "A".to_string()),
                ("publisher".to_string(), "P".to_string()),
                ("year".to_string(), "2020".to_string()),
            ]
        );
    }

    #[test]
    fn test_nested_braces() {
        let entries = scan_entries("@article{x, Title = {The {RNA} World}, year={2001}}");
        assert_eq!(field(&entries[0], "title"), Some("The RNA World"));
        assert_eq!(field(&entries[0], "year"), Some("2001"));
    }

    #[test]
    fn test_deeper_nesting() {
        let entries = scan_entries("@misc{x, title={a {b {c}} d}}");
        assert_eq!(field(&entries[0], "title"), Some("a b c d"));
    }

    #[rstest]
    #[case("@misc{x, year = 2020, title = {T}}", "year", "2020")]
    #[case("@misc{x, title = \"Quoted {Value}\"}", "title", "Quoted Value")]
    #[case("@misc{x, title = {Multi\n    line}}", "title", "Multi line")]
    #[case("@MISC{x, TITLE={Upper}}", "title", "Upper")]
    fn test_value_forms(#[case] input: &str, #[case] name: &str, #[case] expected: &str) {
        let entries = scan_entries(input);
        assert_eq!(field(&entries[0], name), Some(expected));
    }

    #[test]
    fn test_multiple_entries_and_noise() {
        let input = r#"% exported bibliography
@comment{ignore me}
@string{jgr = "Journal of Geophysical Research"}
@article{a1,
  author = {Smith, John and Doe, Jane},
  title = {First},
}

Some stray text with an email@example.com

@inproceedings{c1, title={Second}}
"#;
        let entries = scan_entries(input);
        let keys: Vec<_> = entries.iter().map(|e| e.cite_key.as_str()).collect();
        assert_eq!(keys, ["a1", "c1"]);
        assert_eq!(field(&entries[0], "author"), Some("Smith, John and Doe, Jane"));
    }

    #[test]
    fn test_entry_without_fields() {
        let entries = scan_entries("@misc{lonely}");
        assert_eq!(entries[0].cite_key, "lonely");
        assert!(entries[0].fields.is_empty());
    }

    #[test]
    fn test_unterminated_entry() {
        let entries = scan_entries("@book{ok, title={A}}\n@book{broken, title={B}");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].cite_key, "ok");
    }

    #[test]
    fn test_garbage_between_fields() {
        let entries = scan_entries("@misc{x, !!!, title={Kept}}");
        assert_eq!(field(&entries[0], "title"), Some("Kept"));
    }
}
