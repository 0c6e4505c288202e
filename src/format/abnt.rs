//! ABNT long form, laid out by reference type.

use crate::utils::{non_blank, parse_author_name, split_authors};
use crate::{Reference, ReferenceType};
use itertools::Itertools;

/// Closes a segment with a single period.
fn sentence(text: &str) -> String {
    format!("{}.", text.trim_end_matches('.'))
}

/// Joins the present parts with `", "` into one sentence.
fn joined_sentence(parts: &[Option<&str>]) -> Option<String> {
    let present: Vec<&str> = parts.iter().flatten().copied().collect();
    (!present.is_empty()).then(|| sentence(&present.join(", ")))
}

/// Inverts every author to `SURNAME, Given` and joins them with `"; "`.
fn abnt_authors(authors: &str) -> Option<String> {
    let names = split_authors(authors)
        .into_iter()
        .map(|name| {
            let (family, given) = parse_author_name(name);
            if given.is_empty() {
                family.to_uppercase()
            } else {
                format!("{}, {}", family.to_uppercase(), given)
            }
        })
        .filter(|name| !name.is_empty())
        .join("; ");
    (!names.is_empty()).then_some(names)
}

pub(super) fn format_long(reference: &Reference, title: &str) -> String {
    let mut segments: Vec<String> = Vec::new();
    segments.extend(abnt_authors(&reference.authors).map(|a| sentence(&a)));

    let publisher = non_blank(&reference.publisher);
    let year = non_blank(&reference.year);

    match reference.reference_type {
        ReferenceType::Article => {
            segments.push(sentence(title));
            let volume = non_blank(&reference.volume).map(|v| format!("v. {v}"));
            let issue = non_blank(&reference.issue).map(|n| format!("n. {n}"));
            let pages = non_blank(&reference.pages).map(|p| format!("p. {p}"));
            segments.extend(joined_sentence(&[
                non_blank(&reference.journal),
                volume.as_deref(),
                issue.as_deref(),
                pages.as_deref(),
                year,
            ]));
        }
        ReferenceType::Conference => {
            segments.push(sentence(title));
            segments.extend(non_blank(&reference.event).map(|e| sentence(&format!("In: {e}"))));
            segments.extend(joined_sentence(&[publisher, year]));
        }
        ReferenceType::Thesis => {
            segments.push(sentence(title));
            segments.extend(year.map(sentence));
            segments.extend(non_blank(&reference.institution).map(sentence));
        }
        ReferenceType::Website => {
            segments.push(sentence(title));
        }
        ReferenceType::Book | ReferenceType::Manual | ReferenceType::Report | ReferenceType::Other => {
            match non_blank(&reference.subtitle) {
                Some(subtitle) => segments.push(sentence(&format!("{title}: {subtitle}"))),
                None => segments.push(sentence(title)),
            }
            segments.extend(joined_sentence(&[publisher, year]));
        }
    }

    if reference.reference_type != ReferenceType::Website {
        segments.extend(non_blank(&reference.doi).map(|d| format!("DOI: {d}.")));
    }
    segments.extend(non_blank(&reference.url).map(|u| format!("Disponível em: {u}.")));
    segments.extend(non_blank(&reference.access_date).map(|d| sentence(&format!("Acesso em: {d}"))));

    segments.join(" ")
}
