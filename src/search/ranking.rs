// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Re-ranking for `search_n_best`.
//!
//! The full-text index orders hits by BM25, but "best" provenance usually means
//! the tightest block: a citation that points at a heading beats one that points
//! at the whole page body. The mode decides which.

use crate::error::LocatorError;
use crate::types::ProvenanceSource;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// How `search_n_best` orders candidates before taking the top `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SearchBestMode {
    /// Shortest representative block text first.
    #[default]
    ShortestText,
    /// Longest representative block text first.
    LongestText,
    /// Highest full-text score first.
    HighestScore,
}

impl SearchBestMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchBestMode::ShortestText => "shortest_text",
            SearchBestMode::LongestText => "longest_text",
            SearchBestMode::HighestScore => "highest_score",
        }
    }
}

impl fmt::Display for SearchBestMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchBestMode {
    type Err = LocatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shortest_text" => Ok(SearchBestMode::ShortestText),
            "longest_text" => Ok(SearchBestMode::LongestText),
            "highest_score" => Ok(SearchBestMode::HighestScore),
            other => Err(LocatorError::UnknownSearchMode(other.to_string())),
        }
    }
}

/// Character length of the representative block's text, `0` without one.
fn source_text_len(source: &ProvenanceSource) -> usize {
    source.source_block().map_or(0, |b| b.text.chars().count())
}

/// Compare two sources under `mode`. `Ordering::Less` means `a` ranks first.
///
/// Equal keys compare `Equal`, so a stable sort keeps the incoming order
/// (page ascending, then score) among ties.
pub fn compare_sources(a: &ProvenanceSource, b: &ProvenanceSource, mode: SearchBestMode) -> Ordering {
    match mode {
        SearchBestMode::ShortestText => source_text_len(a).cmp(&source_text_len(b)),
        SearchBestMode::LongestText => source_text_len(b).cmp(&source_text_len(a)),
        SearchBestMode::HighestScore => b.score().partial_cmp(&a.score()).unwrap_or(Ordering::Equal),
    }
}

/// Stable-sort `sources` by `mode` and keep the first `n`.
pub fn take_n_best(mut sources: Vec<ProvenanceSource>, n: usize, mode: SearchBestMode) -> Vec<ProvenanceSource> {
    sources.sort_by(|a, b| compare_sources(a, b, mode));
    sources.truncate(n);
    sources
}
