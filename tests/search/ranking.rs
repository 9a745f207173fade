//! `search_n_best` ordering modes.

use crate::common::{pages_of, sample_locator, source_texts};
use provloc::{Granularity, LocatorError, SearchBestMode};

#[test]
fn test_shortest_text_first() {
    let locator = sample_locator();
    let best = locator.search_n_best("deeply rooted", 2, SearchBestMode::ShortestText).unwrap();
    assert_eq!(pages_of(&best), vec![3, 1]);
    assert_eq!(source_texts(&best)[0], "A deeply rooted belief");
}

#[test]
fn test_longest_text_first() {
    let locator = sample_locator();
    let best = locator.search_n_best("deeply rooted", 2, SearchBestMode::LongestText).unwrap();
    assert_eq!(pages_of(&best), vec![1, 3]);
}

#[test]
fn test_highest_score_first() {
    let locator = sample_locator();
    let best = locator.search_n_best("the tree", 3, SearchBestMode::HighestScore).unwrap();
    assert!(!best.is_empty() && best.len() <= 3);
    for pair in best.windows(2) {
        assert!(pair[0].score() >= pair[1].score());
    }
}

#[test]
fn test_n_truncates() {
    let locator = sample_locator();
    let best = locator.search_n_best("deeply rooted", 1, SearchBestMode::default()).unwrap();
    assert_eq!(pages_of(&best), vec![3]);

    assert!(locator.search_n_best("deeply rooted", 0, SearchBestMode::default()).unwrap().is_empty());
}

#[test]
fn test_n_best_is_block_level() {
    let locator = sample_locator();
    for source in locator.search_n_best("rooted", 5, SearchBestMode::LongestText).unwrap() {
        let location = source.text_location.unwrap();
        assert_eq!(location.granularity, Granularity::Block);
    }
}

#[test]
fn test_mode_names() {
    for mode in [SearchBestMode::ShortestText, SearchBestMode::LongestText, SearchBestMode::HighestScore] {
        assert_eq!(mode.to_string().parse::<SearchBestMode>().unwrap(), mode);
    }
    let err = "fastest".parse::<SearchBestMode>().unwrap_err();
    assert!(matches!(err, LocatorError::UnknownSearchMode(name) if name == "fastest"));
}
