/// Returns the trimmed value when it is present and not blank.
pub fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Returns the trimmed string when it is not blank.
pub fn non_blank_str(value: &str) -> Option<&str> {
    Some(value.trim()).filter(|s| !s.is_empty())
}

/// Splits a free-text author list into individual names.
///
/// Semicolons always separate authors. Without semicolons, ` and ` / ` & `
/// separate authors, and commas only do when every comma-separated part is a
/// multi-word name (so `"Smith, John"` stays a single author).
pub fn split_authors(authors: &str) -> Vec<&str> {
    let authors = authors.trim();
    if authors.is_empty() {
        return Vec::new();
    }

    let parts: Vec<&str> = if authors.contains(';') {
        authors.split(';').collect()
    } else if authors.contains(" and ") || authors.contains(" & ") {
        authors
            .split(" and ")
            .flat_map(|s| s.split(" & "))
            .collect()
    } else if authors.contains(',')
        && authors
            .split(',')
            .all(|part| part.trim().split_whitespace().count() > 1)
    {
        authors.split(',').collect()
    } else {
        vec![authors]
    };

    parts
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Helper function to parse author names in various formats
///
/// Returns `(family, given)`. Handles "Lastname, Firstname", "Lastname FN"
/// (trailing initials) and "Firstname Middle Lastname".
pub fn parse_author_name(name: &str) -> (String, String) {
    let name = name.trim();
    if let Some((family, given)) = name.split_once(',') {
        return (family.trim().to_string(), given.trim().to_string());
    }

    let parts: Vec<&str> = name.split_whitespace().collect();
    match parts.as_slice() {
        [] => (String::new(), String::new()),
        [single] => (single.to_string(), String::new()),
        [family, initials] if is_initials(initials) => (family.to_string(), initials.to_string()),
        [given @ .., family] => (family.to_string(), given.join(" ")),
    }
}

/// Whether a token looks like a run of initials such as `JJ` or `J.R.`.
///
/// Longer capital runs count only when dotted, so `DOE` stays a name.
fn is_initials(token: &str) -> bool {
    let letters: Vec<char> = token.chars().filter(|c| *c != '.').collect();
    let short_or_dotted = letters.len() <= 2 || token.contains('.');
    !letters.is_empty() && short_or_dotted && letters.iter().all(|c| c.is_uppercase())
}
