// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Normalized indel similarity with an early-exit optimization.
//!
//! Indel distance counts insertions and deletions only (a substitution costs two).
//! It is `len(a) + len(b) - 2·LCS(a, b)`, and the similarity ratio is
//!
//! ```text
//! ratio(a, b) = 100 · (1 - indel(a, b) / (len(a) + len(b)))
//!             = 200 · LCS(a, b) / (len(a) + len(b))
//! ```
//!
//! The key insight for the early exit: `LCS(a, b) <= min(len(a), len(b))`, so the
//! lengths alone bound the best achievable ratio. "a" against "abcdefgh" can never
//! clear 87.5 and is rejected before any DP row is allocated.

use crate::utils::normalize;

/// Length of the longest common subsequence, in characters.
///
/// Classic two-row DP, O(|a|·|b|) time and O(|b|) space.
pub fn lcs_len(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut prev = vec![0usize; b_chars.len() + 1];
    let mut curr = vec![0usize; b_chars.len() + 1];

    for ac in a.chars() {
        for (j, bc) in b_chars.iter().enumerate() {
            curr[j + 1] = if ac == *bc {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_chars.len()]
}

/// Insertions plus deletions needed to turn `a` into `b`.
pub fn indel_distance(a: &str, b: &str) -> usize {
    a.chars().count() + b.chars().count() - 2 * lcs_len(a, b)
}

/// Indel similarity on a 0-100 scale, comparing the strings as given.
///
/// Two empty strings are identical and score `100.0`. After normalization that
/// is how a punctuation-only token ("&", "—") matches a punctuation-only word.
pub fn ratio(a: &str, b: &str) -> f64 {
    let total = a.chars().count() + b.chars().count();
    if total == 0 {
        return 100.0;
    }
    200.0 * lcs_len(a, b) as f64 / total as f64
}

/// [`ratio`] after running both sides through [`normalize`].
pub fn normalized_ratio(a: &str, b: &str) -> f64 {
    ratio(&normalize(a), &normalize(b))
}

/// Does `ratio(a, b)` strictly exceed `threshold`?
///
/// Bounded comparison with an early exit: if even a perfect LCS
/// (`min(len(a), len(b))`) can't beat the threshold, skip the DP.
/// Callers pass already-normalized strings.
pub fn ratio_exceeds(a: &str, b: &str, threshold: f64) -> bool {
    let a_len = a.chars().count();
    let b_len = b.chars().count();
    let total = a_len + b_len;

    if total == 0 {
        return 100.0 > threshold;
    }

    // Early-exit: the shorter string bounds the LCS
    let best_possible = 200.0 * a_len.min(b_len) as f64 / total as f64;
    if best_possible <= threshold {
        return false;
    }

    200.0 * lcs_len(a, b) as f64 / total as f64 > threshold
}
