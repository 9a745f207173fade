//! Building the same document twice gives the same answers.

use crate::common::{page_one, sample_locator};
use provloc::{Granularity, SearchBestMode, SearchOptions};

const QUERIES: [&str; 6] = ["the tree", "deeply rooted", "rooted", "Annual report 2023", "deep the tree", "absent"];

#[test]
fn test_search_is_deterministic_across_builds() {
    let first = sample_locator();
    let second = sample_locator();

    for query in QUERIES {
        for options in [SearchOptions::default(), SearchOptions::unrefined()] {
            assert_eq!(
                first.search(query, options).unwrap(),
                second.search(query, options).unwrap(),
                "query {:?}",
                query
            );
        }
        assert_eq!(
            first.search_n_best(query, 3, SearchBestMode::HighestScore).unwrap(),
            second.search_n_best(query, 3, SearchBestMode::HighestScore).unwrap()
        );
    }
}

#[test]
fn test_repeated_queries_are_stable() {
    let locator = sample_locator();
    for query in QUERIES {
        let expected = locator.search(query, SearchOptions::default()).unwrap();
        for _ in 0..3 {
            assert_eq!(locator.search(query, SearchOptions::default()).unwrap(), expected);
        }
    }
}

#[test]
fn test_spatial_queries_are_deterministic() {
    let first = sample_locator();
    let second = sample_locator();
    let page = page_one();

    for word in &page.word_level_blocks {
        for granularity in Granularity::ALL {
            assert_eq!(
                first.k_nearest(&word.bounding_box, 1, 3, granularity),
                second.k_nearest(&word.bounding_box, 1, 3, granularity)
            );
            assert_eq!(
                first.intersecting(&word.bounding_box, 1, granularity),
                second.intersecting(&word.bounding_box, 1, granularity)
            );
        }
    }
}
