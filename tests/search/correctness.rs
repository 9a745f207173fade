//! Full-text search correctness: what is found, on which page, and what is not.

use crate::common::{pages_of, sample_locator, source_texts};
use provloc::geometry::NormBBox;
use provloc::{
    DocumentProvenanceLocator, Granularity, LocatorError, OcrPageResult, SearchOptions, TextBlock,
};
use std::collections::BTreeMap;

#[test]
fn test_verbatim_query_on_one_page() {
    let locator = sample_locator();
    let results = locator.search("Annual report", SearchOptions::default()).unwrap();

    assert_eq!(pages_of(&results), vec![1]);
    assert_eq!(results[0].document_name, "sample.pdf");
    assert_eq!(source_texts(&results), vec!["Annual report"]);
}

#[test]
fn test_absent_query_returns_nothing() {
    let locator = sample_locator();
    assert!(locator.search("purple elephant", SearchOptions::default()).unwrap().is_empty());
    assert!(locator.search("tree rooted", SearchOptions::default()).unwrap().is_empty());
}

#[test]
fn test_empty_and_punctuation_queries() {
    let locator = sample_locator();
    assert!(locator.search("", SearchOptions::default()).unwrap().is_empty());
    assert!(locator.search("   ", SearchOptions::default()).unwrap().is_empty());
    assert!(locator.search("...", SearchOptions::default()).unwrap().is_empty());
    assert!(locator.search("\"\"", SearchOptions::default()).unwrap().is_empty());
}

#[test]
fn test_results_sorted_by_page() {
    let locator = sample_locator();
    let results = locator.search("the tree", SearchOptions::default()).unwrap();
    assert_eq!(pages_of(&results), vec![1, 2]);

    let results = locator.search("deeply rooted", SearchOptions::default()).unwrap();
    assert_eq!(pages_of(&results), vec![1, 3]);
}

#[test]
fn test_page_filter() {
    let locator = sample_locator();
    let results = locator.search("deeply rooted", SearchOptions::on_page(3)).unwrap();
    assert_eq!(pages_of(&results), vec![3]);

    assert!(locator.search("Annual report", SearchOptions::on_page(2)).unwrap().is_empty());
    // A page the document does not have filters everything out
    assert!(locator.search("deeply rooted", SearchOptions::on_page(42)).unwrap().is_empty());
}

#[test]
fn test_page_filter_does_not_change_scores() {
    let locator = sample_locator();
    let unfiltered = locator.search("deeply rooted", SearchOptions::unrefined()).unwrap();
    let filtered = locator
        .search(
            "deeply rooted",
            SearchOptions {
                page_number: Some(3),
                ..SearchOptions::unrefined()
            },
        )
        .unwrap();

    let page_three = unfiltered.iter().find(|s| s.page_number == 3).unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].score(), page_three.score());
}

#[test]
fn test_query_cleanup() {
    let locator = sample_locator();
    for query in ["1. Annual report", "1.2 Annual report", "* Annual report", "- \"Annual report\"", "  ANNUAL REPORT  "] {
        let results = locator.search(query, SearchOptions::default()).unwrap();
        assert_eq!(pages_of(&results), vec![1], "query {:?}", query);
    }
}

#[test]
fn test_location_keeps_caller_query() {
    let locator = sample_locator();
    let results = locator.search("1. Annual report", SearchOptions::default()).unwrap();
    let location = results[0].text_location.as_ref().unwrap();
    assert_eq!(location.text, "1. Annual report");
    assert!(location.score > 0.0);
}

#[test]
fn test_unrefined_search_returns_blocks() {
    let locator = sample_locator();
    let results = locator.search("deeply rooted", SearchOptions::unrefined()).unwrap();

    assert_eq!(results.len(), 2);
    for source in &results {
        let location = source.text_location.as_ref().unwrap();
        assert_eq!(location.granularity, Granularity::Block);
        assert_eq!(location.source_blocks.len(), 1);
        assert_eq!(location.source_blocks[0].granularity, Granularity::Block);
    }
    assert_eq!(
        source_texts(&results),
        vec!["The tree is deeply rooted in the soil.", "A deeply rooted belief"]
    );
}

fn page_without_words() -> BTreeMap<u32, Option<OcrPageResult>> {
    let bbox = NormBBox::new(0.1, 0.1, 0.6, 0.2);
    let page = OcrPageResult {
        provider_name: "blocks-only".to_string(),
        page_text: "orphan block text".to_string(),
        block_level_blocks: vec![TextBlock::new("orphan block text", Granularity::Block, bbox)],
        ..Default::default()
    };
    let mut pages = BTreeMap::new();
    pages.insert(1, Some(page));
    pages
}

#[test]
fn test_require_exact_match_drops_unrefinable_hits() {
    let locator = DocumentProvenanceLocator::build("blocks-only", page_without_words()).unwrap();
    assert!(locator.search("orphan", SearchOptions::default()).unwrap().is_empty());

    let lenient = SearchOptions {
        require_exact_match: false,
        ..SearchOptions::default()
    };
    let results = locator.search("orphan", lenient).unwrap();
    assert_eq!(results.len(), 1);
    let location = results[0].text_location.as_ref().unwrap();
    assert_eq!(location.granularity, Granularity::Block);
    assert_eq!(results[0].text(), "orphan block text");
}

#[test]
fn test_search_raw() {
    let locator = sample_locator();

    let mut texts = locator.search_raw("rooted").unwrap();
    texts.sort();
    assert_eq!(texts, vec!["A deeply rooted belief", "The tree is deeply rooted in the soil."]);

    let texts = locator.search_raw("content:annual AND content:2023").unwrap();
    assert_eq!(texts, vec!["Annual report 2023"]);
}

#[test]
fn test_search_raw_invalid_syntax() {
    let locator = sample_locator();
    let err = locator.search_raw("no_such_field:rooted").unwrap_err();
    assert!(matches!(err, LocatorError::InvalidQuerySyntax(_)));
}

#[test]
fn test_hit_limit() {
    let mut pages = BTreeMap::new();
    for page_number in 1..=5 {
        pages.insert(page_number, Some(provloc::testing::make_page(&[&["shared", "phrase"]])));
    }
    let config = provloc::LocatorConfig {
        hit_limit: 2,
        ..Default::default()
    };
    let locator = DocumentProvenanceLocator::build_with_config("limited", pages, config).unwrap();
    assert_eq!(locator.search("shared phrase", SearchOptions::default()).unwrap().len(), 2);
    assert_eq!(locator.search_raw("shared").unwrap().len(), 2);
}
