//! End-to-end properties over random synthetic documents.

use crate::common::{assert_reading_order, pages_of};
use proptest::prelude::*;
use provloc::testing::{make_page, make_pages};
use provloc::{normalized_ratio, DocumentProvenanceLocator, Granularity, OcrPageResult, SearchOptions};

/// Mostly letters, with the odd punctuation-only word OCR emits on its own.
fn word_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        6 => prop::string::string_regex("[a-z]{2,8}").unwrap(),
        1 => prop::sample::select(vec!["&", "—", "-", "/", "§"]).prop_map(str::to_string),
    ]
}

fn line_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(word_strategy(), 1..8)
}

/// Pages of one block each, 1 to 3 lines per block.
fn document_strategy() -> impl Strategy<Value = Vec<Vec<Vec<String>>>> {
    prop::collection::vec(prop::collection::vec(line_strategy(), 1..4), 1..4)
}

fn build_pages(document: &[Vec<Vec<String>>]) -> Vec<OcrPageResult> {
    document
        .iter()
        .map(|lines| {
            let lines: Vec<Vec<&str>> = lines.iter().map(|l| l.iter().map(String::as_str).collect()).collect();
            let refs: Vec<&[&str]> = lines.iter().map(Vec::as_slice).collect();
            make_page(&refs)
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Any run of consecutive words from a line is found on its page and
    /// refined to words that each match a query token.
    #[test]
    fn prop_verbatim_phrase_is_found(
        document in document_strategy(),
        pick in (any::<prop::sample::Index>(), any::<prop::sample::Index>(), any::<prop::sample::Index>(), 1usize..4),
    ) {
        let (page_pick, line_pick, start_pick, len) = pick;
        let page_idx = page_pick.index(document.len());
        let line = &document[page_idx][line_pick.index(document[page_idx].len())];
        let start = start_pick.index(line.len());
        let end = (start + len).min(line.len());
        let query = line[start..end].join(" ");
        // Punctuation alone has no terms to search for
        prop_assume!(line[start..end].iter().any(|w| w.chars().any(char::is_alphanumeric)));

        let locator = DocumentProvenanceLocator::build("random", make_pages(build_pages(&document))).unwrap();
        let results = locator.search(&query, SearchOptions::default()).unwrap();

        let page_number = page_idx as u32 + 1;
        let hit = results.iter().find(|s| s.page_number == page_number);
        prop_assert!(hit.is_some(), "{:?} not found on page {}", query, page_number);

        let location = hit.unwrap().text_location.as_ref().unwrap();
        prop_assert_eq!(location.granularity, Granularity::Word);
        prop_assert!(!location.source_blocks.is_empty());
        for word in &location.source_blocks {
            prop_assert!(line[start..end].iter().any(|token| normalized_ratio(token, &word.text) > 87.5));
        }
        assert_reading_order(&location.source_blocks);

        let pages = pages_of(&results);
        prop_assert!(pages.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn prop_page_count_and_geo_indexes(document in document_strategy()) {
        let locator = DocumentProvenanceLocator::build("random", make_pages(build_pages(&document))).unwrap();
        prop_assert_eq!(locator.page_count(), document.len());
        prop_assert_eq!(locator.geo_index_count(), 3 * document.len());
    }
}
