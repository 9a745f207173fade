//! Shared test utilities and fixtures.

#![allow(dead_code)]

use provloc::testing::{make_page, make_page_with_blocks, make_pages};
use provloc::{DocumentProvenanceLocator, OcrPageResult, ProvenanceSource, TextBlock};
use std::collections::BTreeMap;

// Re-export canonical test utilities from provloc::testing
pub use provloc::testing::{make_empty_page, make_word, single_page};

// ============================================================================
// SAMPLE DOCUMENT
// ============================================================================

/// Page 1: two blocks. "deeply rooted" and "the tree" both appear here.
pub fn page_one() -> OcrPageResult {
    make_page_with_blocks(&[
        &[&["The", "tree", "is", "deeply", "rooted", "in", "the", "soil."]],
        &[&["Annual", "report", "2023"]],
    ])
}

/// Page 2: one two-line block. "the tree" again, but not "rooted".
pub fn page_two() -> OcrPageResult {
    make_page(&[&["Roots", "grow", "deep"], &["the", "tree", "stands"]])
}

/// Page 3: one short block with "deeply rooted".
pub fn page_three() -> OcrPageResult {
    make_page(&[&["A", "deeply", "rooted", "belief"]])
}

/// The three sample pages, numbered 1 to 3.
pub fn sample_pages() -> BTreeMap<u32, Option<OcrPageResult>> {
    make_pages(vec![page_one(), page_two(), page_three()])
}

/// A locator over the sample pages.
pub fn sample_locator() -> DocumentProvenanceLocator {
    DocumentProvenanceLocator::build("sample.pdf", sample_pages()).expect("sample document builds")
}

// ============================================================================
// RESULT HELPERS
// ============================================================================

/// Page numbers of a result list, in order.
pub fn pages_of(sources: &[ProvenanceSource]) -> Vec<u32> {
    sources.iter().map(|s| s.page_number).collect()
}

/// Texts of the representative block of each result.
pub fn source_texts(sources: &[ProvenanceSource]) -> Vec<String> {
    sources
        .iter()
        .map(|s| s.source_block().map(|b| b.text.clone()).unwrap_or_default())
        .collect()
}

/// Texts of a block list, in order.
pub fn texts(blocks: &[TextBlock]) -> Vec<&str> {
    blocks.iter().map(|b| b.text.as_str()).collect()
}

/// Assert that blocks are in reading order (top, then x0).
pub fn assert_reading_order(blocks: &[TextBlock]) {
    for pair in blocks.windows(2) {
        let a = pair[0].bounding_box.reading_order_key();
        let b = pair[1].bounding_box.reading_order_key();
        assert!(
            a <= b,
            "'{}' at {:?} comes before '{}' at {:?}",
            pair[0].text,
            a,
            pair[1].text,
            b
        );
    }
}
