//! Word-level refinement through the locator.

use crate::common::{page_one, pages_of, sample_locator, texts};
use provloc::testing::{make_page, make_pages};
use provloc::{
    normalized_ratio, DocumentProvenanceLocator, ExhaustivePairs, Granularity, SearchOptions,
};

#[test]
fn test_single_token_refines_to_one_word() {
    let locator = sample_locator();
    let results = locator.search("rooted", SearchOptions::default()).unwrap();
    assert_eq!(pages_of(&results), vec![1, 3]);

    for source in &results {
        let location = source.text_location.as_ref().unwrap();
        assert_eq!(location.source_blocks.len(), 1);
        assert_eq!(location.granularity, Granularity::Word);
        assert!(normalized_ratio(&location.source_blocks[0].text, "rooted") > 87.5);
        assert_eq!(source.source_block().unwrap().granularity, Granularity::Word);
    }
}

#[test]
fn test_two_tokens_refine_to_adjacent_words() {
    let locator = sample_locator();
    let results = locator.search("deeply rooted", SearchOptions::on_page(1)).unwrap();
    assert_eq!(results.len(), 1);

    let location = results[0].text_location.as_ref().unwrap();
    assert_eq!(texts(&location.source_blocks), vec!["deeply", "rooted"]);
    assert!(location.source_blocks[0].bounding_box.x0 < location.source_blocks[1].bounding_box.x0);

    let merged = location.merged_source_block.as_ref().unwrap();
    assert_eq!(merged.text, "deeply rooted");
    assert_eq!(merged.granularity, Granularity::Block);
    for word in &location.source_blocks {
        assert!(merged.bounding_box.contains(&word.bounding_box));
    }
}

#[test]
fn test_repeated_token_picks_closest_occurrence() {
    let locator = sample_locator();
    let results = locator.search("the tree", SearchOptions::on_page(1)).unwrap();
    let location = results[0].text_location.as_ref().unwrap();
    // "The tree", not the later "the" on the same line
    assert_eq!(texts(&location.source_blocks), vec!["The", "tree"]);
}

#[test]
fn test_refinement_across_lines() {
    let locator = sample_locator();
    let results = locator.search("deep the tree", SearchOptions::on_page(2)).unwrap();
    assert_eq!(results.len(), 1);
    let location = results[0].text_location.as_ref().unwrap();
    assert_eq!(texts(&location.source_blocks), vec!["deep", "the", "tree"]);
    assert_eq!(location.merged_source_block.as_ref().unwrap().text, "deep the tree");
}

#[test]
fn test_refinement_tolerates_ocr_noise() {
    let mut page = make_page(&[&["the", "quick", "brown", "fox"]]);
    // Word-level OCR disagrees with the block text by one letter
    page.word_level_blocks[1].text = "quiick".to_string();

    let locator = DocumentProvenanceLocator::build("noisy", make_pages(vec![page])).unwrap();
    let results = locator.search("quick brown", SearchOptions::default()).unwrap();
    assert_eq!(results.len(), 1);

    let location = results[0].text_location.as_ref().unwrap();
    assert_eq!(texts(&location.source_blocks), vec!["quiick", "brown"]);
}

#[test]
fn test_refinement_rejects_heavy_noise() {
    let mut page = make_page(&[&["the", "quick", "brown", "fox"]]);
    page.word_level_blocks[2].text = "br0wm".to_string();

    let locator = DocumentProvenanceLocator::build("noisy", make_pages(vec![page])).unwrap();
    assert!(locator.search("quick brown", SearchOptions::default()).unwrap().is_empty());
}

#[test]
fn test_punctuation_words_survive_refinement() {
    for words in [["Smith", "&", "Sons"], ["Revenue", "—", "2023"]] {
        let query = words.join(" ");
        let pages = make_pages(vec![make_page(&[&words[..]])]);
        let locator = DocumentProvenanceLocator::build("punctuation", pages).unwrap();

        let unrefined = locator.search(&query, SearchOptions::unrefined()).unwrap();
        let refined = locator.search(&query, SearchOptions::default()).unwrap();
        assert_eq!(unrefined.len(), 1, "query {:?}", query);
        assert_eq!(refined.len(), 1, "query {:?}", query);

        let location = refined[0].text_location.as_ref().unwrap();
        assert_eq!(location.granularity, Granularity::Word);
        assert_eq!(texts(&location.source_blocks), words.to_vec());
        assert_eq!(location.merged_source_block.as_ref().unwrap().text, query);
    }
}

#[test]
fn test_punctuation_missing_from_ocr_words() {
    // Block text keeps the ampersand but the word list lost it
    let mut page = make_page(&[&["Smith", "Sons", "Ltd"]]);
    page.block_level_blocks[0].text = "Smith & Sons Ltd".to_string();

    let locator = DocumentProvenanceLocator::build("lossy", make_pages(vec![page])).unwrap();
    let results = locator.search("Smith & Sons", SearchOptions::default()).unwrap();
    assert_eq!(results.len(), 1);
    let location = results[0].text_location.as_ref().unwrap();
    assert_eq!(texts(&location.source_blocks), vec!["Smith", "Sons"]);
}

#[test]
fn test_enumerator_is_not_a_refinement_token() {
    let locator = sample_locator();
    let results = locator.search("1. deeply rooted", SearchOptions::on_page(1)).unwrap();
    assert_eq!(results.len(), 1);

    let location = results[0].text_location.as_ref().unwrap();
    assert_eq!(texts(&location.source_blocks), vec!["deeply", "rooted"]);
    assert_eq!(location.text, "1. deeply rooted");
}

#[test]
fn test_refine_query_to_word_level_directly() {
    let locator = sample_locator();
    let block = page_one().block_level_blocks[0].clone();

    let refined = locator.refine_query_to_word_level("soil", 1, &block).unwrap();
    assert_eq!(texts(&refined.words), vec!["soil."]);

    assert!(locator.refine_query_to_word_level("report", 1, &block).is_none());
}

#[test]
fn test_exhaustive_selector_agrees_on_simple_text() {
    let greedy = sample_locator();
    let exhaustive = sample_locator().with_path_selector(ExhaustivePairs);

    for query in ["deeply rooted", "the tree", "Annual report 2023", "rooted"] {
        assert_eq!(
            greedy.search(query, SearchOptions::default()).unwrap(),
            exhaustive.search(query, SearchOptions::default()).unwrap(),
            "query {:?}",
            query
        );
    }
}
