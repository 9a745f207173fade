// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Turning caller text into a tantivy query.
//!
//! Callers paste text straight out of LLM answers and bullet lists, so the
//! query is cleaned first: list enumerators go, quotes go. What remains is
//! matched as an exact phrase against block content.

use crate::error::Result;
use crate::index::BlockTextIndex;
use tantivy::query::{BooleanQuery, ConstScoreQuery, Occur, PhraseQuery, Query, TermQuery};
use tantivy::schema::IndexRecordOption;
use tantivy::Term;

/// Strip one leading enumerator of each kind, in order: `"1. "`, `"1.1 "`,
/// `"* "`, `"- "`. Then trim and remove every `"`.
///
/// ```
/// use provloc::search::preprocess_query_text;
///
/// assert_eq!(preprocess_query_text("1. Deeply rooted"), "Deeply rooted");
/// assert_eq!(preprocess_query_text("- \"quoted\" text "), "quoted text");
/// ```
pub fn preprocess_query_text(text: &str) -> String {
    let mut rest = text;
    for strip in ENUMERATORS {
        if let Some(stripped) = strip(rest) {
            rest = stripped;
        }
    }
    rest.trim().replace('"', "")
}

type Stripper = fn(&str) -> Option<&str>;

const ENUMERATORS: [Stripper; 4] = [strip_numbered, strip_section_numbered, strip_star, strip_dash];

/// `^\d+\.\s+`
fn strip_numbered(text: &str) -> Option<&str> {
    let rest = strip_digits(text)?;
    let rest = rest.strip_prefix('.')?;
    strip_whitespace(rest)
}

/// `^\d+\.\d+\s+`
fn strip_section_numbered(text: &str) -> Option<&str> {
    let rest = strip_digits(text)?;
    let rest = rest.strip_prefix('.')?;
    let rest = strip_digits(rest)?;
    strip_whitespace(rest)
}

/// `^\*+\s+`
fn strip_star(text: &str) -> Option<&str> {
    strip_bullet(text, '*')
}

/// `^-+\s+`
fn strip_dash(text: &str) -> Option<&str> {
    strip_bullet(text, '-')
}

fn strip_bullet(text: &str, marker: char) -> Option<&str> {
    let rest = text.trim_start_matches(marker);
    if rest.len() == text.len() {
        return None;
    }
    strip_whitespace(rest)
}

/// One or more ASCII digits. `\d` in the enumerator patterns means ASCII here:
/// OCR'd list numbers are never in other scripts.
fn strip_digits(text: &str) -> Option<&str> {
    let rest = text.trim_start_matches(|c: char| c.is_ascii_digit());
    (rest.len() < text.len()).then_some(rest)
}

/// One or more whitespace characters.
fn strip_whitespace(text: &str) -> Option<&str> {
    let rest = text.trim_start();
    (rest.len() < text.len()).then_some(rest)
}

/// Build the exact-phrase query for already-preprocessed `text`.
///
/// Returns `None` when the analyzer yields no tokens: such a query can match
/// nothing. With `page_number`, the phrase is ANDed with a zero-scored filter so
/// BM25 scores are the same with or without the page restriction.
pub fn build_phrase_query(
    index: &BlockTextIndex,
    text: &str,
    page_number: Option<u32>,
) -> Result<Option<Box<dyn Query>>> {
    let mut terms = index.content_terms(text)?;

    let phrase: Box<dyn Query> = match terms.len() {
        0 => return Ok(None),
        1 => Box::new(TermQuery::new(
            terms.remove(0),
            IndexRecordOption::WithFreqs,
        )),
        _ => Box::new(PhraseQuery::new(terms)),
    };

    let Some(page_number) = page_number else {
        return Ok(Some(phrase));
    };

    let page_term = Term::from_field_u64(index.fields().page_number, u64::from(page_number));
    let page_filter: Box<dyn Query> = Box::new(ConstScoreQuery::new(
        Box::new(TermQuery::new(page_term, IndexRecordOption::Basic)),
        0.0,
    ));

    Ok(Some(Box::new(BooleanQuery::new(vec![
        (Occur::Must, phrase),
        (Occur::Must, page_filter),
    ]))))
}
