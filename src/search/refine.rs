// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Word-level refinement: narrowing a block hit to the words that produced it.
//!
//! The full-text index answers "which block contains this phrase". Provenance
//! needs "which words", and OCR words are noisy, so each query token is matched
//! fuzzily against the words inside the block. A token usually matches more
//! than one word ("the" is everywhere), so the matches are reconciled with an
//! alignment graph:
//!
//! ```text
//!   candidates (reading order):  0:The 1:tree 2:is 3:deeply 4:rooted 5:the
//!   query "the tree":            the → {0, 5}   tree → {1}
//!
//!   edges (i → j, j > i, weight (j-i)²):   0 → 1 (1)
//!   start/end pairs:                        (0, 1)
//!   path:                                   [0, 1] → "The tree"
//! ```
//!
//! Squared gaps make a path through adjacent words far cheaper than one that
//! jumps across the block, which keeps matches in reading order.
//!
//! # Path selection
//!
//! Which `(start, end)` pair to route between is a [`PathSelector`] decision:
//!
//! | Selector              | Strategy                                          |
//! |-----------------------|---------------------------------------------------|
//! | [`GreedyNearestPair`] | closest pair (by index gap) with any path wins     |
//! | [`ExhaustivePairs`]   | every pair routed, lowest total weight wins        |
//!
//! Greedy is the default. It can settle on a worse path than exhaustive search
//! when the closest pair is only connected through a detour.

use crate::contracts::check_path_increasing;
use crate::fuzzy::ratio_exceeds;
use crate::geometry::NormBBox;
use crate::types::{Granularity, TextBlock};
use crate::utils::{normalize, word_tokenize};
use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap};
use std::fmt;
use tracing::trace;

// =============================================================================
// ALIGNMENT GRAPH
// =============================================================================

/// Directed graph over candidate word positions with integer edge weights.
///
/// Nodes are candidate indices in `0..size`. Edges only point forward.
#[derive(Debug, Clone)]
pub struct AlignmentGraph {
    is_node: Vec<bool>,
    adjacency: Vec<Vec<(usize, u64)>>,
}

impl AlignmentGraph {
    pub fn new(size: usize) -> Self {
        Self {
            is_node: vec![false; size],
            adjacency: vec![Vec::new(); size],
        }
    }

    pub fn add_node(&mut self, node: usize) {
        self.is_node[node] = true;
    }

    /// Add `from → to`. Re-adding an existing edge replaces its weight.
    pub fn add_edge(&mut self, from: usize, to: usize, weight: u64) {
        self.is_node[from] = true;
        self.is_node[to] = true;
        let edges = &mut self.adjacency[from];
        match edges.iter_mut().find(|(target, _)| *target == to) {
            Some(edge) => edge.1 = weight,
            None => edges.push((to, weight)),
        }
    }

    #[inline]
    pub fn contains_node(&self, node: usize) -> bool {
        self.is_node.get(node).copied().unwrap_or(false)
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// Dijkstra from `start` to `end`: the node sequence and its total weight.
    ///
    /// `None` when either endpoint is not in the graph or `end` is unreachable.
    /// Among equal-weight paths, the one settled first (lowest node index on the
    /// frontier) wins, so results are deterministic.
    pub fn shortest_path(&self, start: usize, end: usize) -> Option<(u64, Vec<usize>)> {
        if !self.contains_node(start) || !self.contains_node(end) {
            return None;
        }

        let size = self.is_node.len();
        let mut dist: Vec<Option<u64>> = vec![None; size];
        let mut prev: Vec<Option<usize>> = vec![None; size];
        let mut settled = vec![false; size];
        let mut heap = BinaryHeap::new();

        dist[start] = Some(0);
        heap.push(Reverse((0u64, start)));

        while let Some(Reverse((cost, node))) = heap.pop() {
            if settled[node] {
                continue;
            }
            settled[node] = true;

            if node == end {
                let mut path = vec![end];
                let mut current = end;
                while let Some(p) = prev[current] {
                    path.push(p);
                    current = p;
                }
                path.reverse();
                return Some((cost, path));
            }

            for &(next, weight) in &self.adjacency[node] {
                let candidate = cost + weight;
                if dist[next].map_or(true, |d| candidate < d) {
                    dist[next] = Some(candidate);
                    prev[next] = Some(node);
                    heap.push(Reverse((candidate, next)));
                }
            }
        }

        None
    }
}

// =============================================================================
// PATH SELECTION
// =============================================================================

/// Chooses the alignment path between first-token and last-token matches.
pub trait PathSelector: fmt::Debug + Send + Sync {
    /// Pick a path through `graph`. `starts` and `ends` are ascending.
    fn select_path(&self, graph: &AlignmentGraph, starts: &[usize], ends: &[usize]) -> Option<Vec<usize>>;
}

/// `(start, end)` pairs with `start < end`, closest first.
///
/// Generated start-ascending then end-ascending; the stable sort keeps that
/// order among pairs with equal gaps.
fn candidate_pairs(starts: &[usize], ends: &[usize]) -> Vec<(usize, usize)> {
    let mut pairs: Vec<(usize, usize)> = starts
        .iter()
        .flat_map(|&s| ends.iter().filter(move |&&e| s < e).map(move |&e| (s, e)))
        .collect();
    pairs.sort_by_key(|&(s, e)| e - s);
    pairs
}

/// Route the closest pair first and accept the first path found.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyNearestPair;

impl PathSelector for GreedyNearestPair {
    fn select_path(&self, graph: &AlignmentGraph, starts: &[usize], ends: &[usize]) -> Option<Vec<usize>> {
        candidate_pairs(starts, ends)
            .into_iter()
            .find_map(|(s, e)| graph.shortest_path(s, e))
            .map(|(_, path)| path)
    }
}

/// Route every pair and keep the lowest total weight. Ties go to the earlier
/// pair in closest-first order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExhaustivePairs;

impl PathSelector for ExhaustivePairs {
    fn select_path(&self, graph: &AlignmentGraph, starts: &[usize], ends: &[usize]) -> Option<Vec<usize>> {
        let mut best: Option<(u64, Vec<usize>)> = None;
        for (s, e) in candidate_pairs(starts, ends) {
            if let Some((weight, path)) = graph.shortest_path(s, e) {
                if best.as_ref().map_or(true, |(w, _)| weight < *w) {
                    best = Some((weight, path));
                }
            }
        }
        best.map(|(_, path)| path)
    }
}

// =============================================================================
// REFINEMENT
// =============================================================================

/// A refined match: the merged block plus the words it was built from, in
/// path order.
#[derive(Debug, Clone, PartialEq)]
pub struct RefinedMatch {
    pub merged: TextBlock,
    pub words: Vec<TextBlock>,
}

/// Narrow `source_block` to the candidate words matching `query`.
///
/// `candidates` are the word blocks intersecting `source_block`, in any order;
/// they are put in reading order here. A word matches a token when their
/// normalized [`ratio`](crate::fuzzy::ratio) strictly exceeds `threshold`.
///
/// Returns `None` when the query has no tokens or no alignment path exists.
pub fn refine_block_to_word_level(
    source_block: &TextBlock,
    candidates: &[TextBlock],
    query: &str,
    threshold: f64,
    selector: &dyn PathSelector,
) -> Option<RefinedMatch> {
    let mut ordered: Vec<&TextBlock> = candidates.iter().collect();
    ordered.sort_by(|a, b| {
        a.bounding_box
            .reading_order_key()
            .partial_cmp(&b.bounding_box.reading_order_key())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let normalized_words: Vec<String> = ordered.iter().map(|w| normalize(&w.text)).collect();

    // A token that normalizes to nothing ("&", "—") carries no terms for the
    // full-text index either, so it is skipped when no word matches it
    let matches: Vec<BTreeSet<usize>> = word_tokenize(query)
        .into_iter()
        .map(normalize)
        .filter_map(|token| {
            let matched: BTreeSet<usize> = normalized_words
                .iter()
                .enumerate()
                .filter(|(_, word)| ratio_exceeds(&token, word, threshold))
                .map(|(i, _)| i)
                .collect();
            (!token.is_empty() || !matched.is_empty()).then_some(matched)
        })
        .collect();

    if matches.is_empty() {
        return None;
    }

    if let [matched] = matches.as_slice() {
        let position = *matched.first()?;
        let word = ordered[position].clone();
        trace!(position, text = %word.text, "single-token refinement");
        return Some(RefinedMatch {
            merged: word.clone(),
            words: vec![word],
        });
    }

    let mut graph = AlignmentGraph::new(ordered.len());
    for &node in &matches[0] {
        graph.add_node(node);
    }
    for window in matches.windows(2) {
        for &from in &window[0] {
            for &to in window[1].range(from + 1..) {
                let gap = (to - from) as u64;
                graph.add_edge(from, to, gap * gap);
            }
        }
    }

    let starts: Vec<usize> = matches[0].iter().copied().collect();
    let ends: Vec<usize> = matches[matches.len() - 1].iter().copied().collect();
    trace!(
        tokens = matches.len(),
        starts = starts.len(),
        ends = ends.len(),
        edges = graph.edge_count(),
        "alignment graph built"
    );

    let path = selector.select_path(&graph, &starts, &ends)?;
    check_path_increasing(&path);
    let words: Vec<TextBlock> = path.iter().map(|&i| ordered[i].clone()).collect();

    Some(RefinedMatch {
        merged: merge_words(source_block, &words)?,
        words,
    })
}

/// Merge words into one block-granularity block carrying `source_block`'s
/// metadata. `None` for an empty slice.
pub fn merge_words(source_block: &TextBlock, words: &[TextBlock]) -> Option<TextBlock> {
    let bounding_box = NormBBox::combine(words.iter().map(|w| &w.bounding_box))?;

    let mut text = String::new();
    for (i, word) in words.iter().enumerate() {
        text.push_str(&word.text);
        let is_last = i + 1 == words.len();
        if !is_last && !word.text.ends_with(char::is_whitespace) {
            text.push(' ');
        }
    }

    Some(TextBlock::new(text, Granularity::Block, bounding_box).with_metadata(source_block.metadata.clone()))
}
