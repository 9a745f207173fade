// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for word-level refinement.
//!
//! Builds candidate words from arbitrary text and geometry, then checks that
//! whatever path the selectors return only uses candidate words, keeps reading
//! order and is covered by the merged box.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use provloc::{
    refine_block_to_word_level, ExhaustivePairs, Granularity, GreedyNearestPair, NormBBox, PathSelector, TextBlock,
};

#[derive(Debug, Arbitrary)]
struct Word {
    text: String,
    x0: u8,
    top: u8,
}

#[derive(Debug, Arbitrary)]
struct RefineInput {
    words: Vec<Word>,
    query: String,
}

fn to_block(word: &Word) -> TextBlock {
    let x0 = f64::from(word.x0) / 256.0;
    let top = f64::from(word.top) / 256.0;
    let width = word.text.chars().count().min(20) as f64 * 0.005;
    TextBlock::new(word.text.clone(), Granularity::Word, NormBBox::new(x0, top, x0 + width, top + 0.01))
}

fuzz_target!(|input: RefineInput| {
    if input.words.len() > 64 || input.query.chars().count() > 80 {
        return;
    }

    let candidates: Vec<TextBlock> = input.words.iter().map(to_block).collect();
    let source = TextBlock::new("", Granularity::Block, NormBBox::new(0.0, 0.0, 1.0, 1.0));

    let selectors: [&dyn PathSelector; 2] = [&GreedyNearestPair, &ExhaustivePairs];
    for selector in selectors {
        let Some(refined) = refine_block_to_word_level(&source, &candidates, &input.query, 87.5, selector) else {
            continue;
        };

        assert!(!refined.words.is_empty());
        for word in &refined.words {
            assert!(candidates.contains(word), "{:?} is not a candidate", word);
            assert!(refined.merged.bounding_box.contains(&word.bounding_box));
        }
        for pair in refined.words.windows(2) {
            assert!(pair[0].bounding_box.reading_order_key() <= pair[1].bounding_box.reading_order_key());
        }
    }
});
