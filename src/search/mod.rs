// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query-time pipeline: clean the query, find blocks, narrow to words, rank.
//!
//! ```text
//! "1. deeply rooted"
//!        │ query::preprocess_query_text
//!        ▼
//! "deeply rooted" ──query::build_phrase_query──▶ tantivy (BM25 block hits)
//!                                                      │
//!                              refine::refine_block_to_word_level (per hit)
//!                                                      │
//!                                   ranking::take_n_best (search_n_best only)
//! ```

pub mod query;
pub mod ranking;
pub mod refine;

pub use query::{build_phrase_query, preprocess_query_text};
pub use ranking::{compare_sources, take_n_best, SearchBestMode};
pub use refine::{
    merge_words, refine_block_to_word_level, AlignmentGraph, ExhaustivePairs, GreedyNearestPair,
    PathSelector, RefinedMatch,
};
