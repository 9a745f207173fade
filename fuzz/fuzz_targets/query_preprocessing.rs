// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for query cleanup and search.
//!
//! Arbitrary caller text goes through enumerator stripping, the tantivy
//! analyzer and a phrase search. None of it may panic, and results must come
//! back sorted by page.

#![no_main]

use libfuzzer_sys::fuzz_target;
use provloc::search::preprocess_query_text;
use provloc::testing::{make_page, make_pages};
use provloc::{DocumentProvenanceLocator, SearchOptions};
use std::sync::OnceLock;

fn locator() -> &'static DocumentProvenanceLocator {
    static LOCATOR: OnceLock<DocumentProvenanceLocator> = OnceLock::new();
    LOCATOR.get_or_init(|| {
        let pages = make_pages(vec![
            make_page(&[&["1.", "The", "tree", "is", "deeply", "rooted"], &["in", "the", "soil."]]),
            make_page(&[&["*", "Annual", "report", "2023"], &["-", "\"quoted\"", "text"]]),
        ]);
        DocumentProvenanceLocator::build("fuzz.pdf", pages).expect("fixture document builds")
    })
}

fuzz_target!(|data: &[u8]| {
    let query = String::from_utf8_lossy(data);
    let query: String = query.chars().take(200).collect();

    let cleaned = preprocess_query_text(&query);
    assert!(!cleaned.contains('"'), "quotes survived: {:?}", cleaned);
    assert!(cleaned.len() <= query.len());

    for options in [SearchOptions::default(), SearchOptions::unrefined(), SearchOptions::on_page(2)] {
        let results = locator().search(&query, options).expect("phrase search never errors");
        assert!(results.windows(2).all(|w| w[0].page_number <= w[1].page_number));
    }

    // Raw queries may be rejected but must not panic
    let _ = locator().search_raw(&query);
});
