// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Runtime contracts for the locator's structural invariants.
//!
//! This module provides debug-mode assertions that verify:
//!
//! 1. **Zero cost in release builds** (everything is `debug_assert!`)
//! 2. **Early failure** during development and in the test suite
//!
//! # INVARIANTS (DO NOT REMOVE THESE CHECKS)
//!
//! | Contract function               | Invariant                                         |
//! |---------------------------------|---------------------------------------------------|
//! | `check_bbox_normalized`         | `x1 >= x0` and `bottom >= top` before indexing    |
//! | `check_reading_order_sorted`    | spatial results sorted by `(top, x0)`             |
//! | `check_sources_sorted_by_page`  | search results ascending by page                  |
//! | `check_path_increasing`         | alignment paths move forward in reading order     |
//! | `check_locator_well_formed`     | every page has OCR, text and spatial indexes      |
//!
//! # Usage
//!
//! ```ignore
//! use provloc::contracts::*;
//!
//! // In debug builds, this panics if the invariant is violated
//! check_reading_order_sorted(&blocks);
//!
//! // In release builds, this is a no-op
//! ```

use crate::geometry::NormBBox;
use crate::locator::DocumentProvenanceLocator;
use crate::types::{ProvenanceSource, TextBlock};

// ============================================================================
// GEOMETRY CONTRACTS
// ============================================================================

/// Check that a box has ordered corners.
///
/// # Panics (debug builds only)
/// Panics if `x0 > x1` or `top > bottom`. NaN coordinates pass: they are
/// unordered, not reversed.
#[inline]
pub fn check_bbox_normalized(bbox: &NormBBox) {
    debug_assert!(
        !(bbox.x0 > bbox.x1) && !(bbox.top > bbox.bottom),
        "Contract violation: NormBBox.Normalized - {:?} has reversed corners",
        bbox
    );
}

/// Check that blocks are in reading order: top ascending, then x0 ascending.
///
/// # Panics (debug builds only)
/// Panics if any adjacent pair is out of order.
#[inline]
pub fn check_reading_order_sorted(blocks: &[TextBlock]) {
    for (i, pair) in blocks.windows(2).enumerate() {
        let a = pair[0].bounding_box.reading_order_key();
        let b = pair[1].bounding_box.reading_order_key();
        debug_assert!(
            !(a > b),
            "Contract violation: ReadingOrder.Sorted - blocks[{}] {:?} ('{}') after blocks[{}] {:?} ('{}')",
            i,
            a,
            pair[0].text,
            i + 1,
            b,
            pair[1].text
        );
    }
}

// ============================================================================
// SEARCH CONTRACTS
// ============================================================================

/// Check that search results are ascending by page number.
///
/// # Panics (debug builds only)
/// Panics if a result's page precedes the one before it.
#[inline]
pub fn check_sources_sorted_by_page(sources: &[ProvenanceSource]) {
    for (i, pair) in sources.windows(2).enumerate() {
        debug_assert!(
            pair[0].page_number <= pair[1].page_number,
            "Contract violation: Results.SortedByPage - results[{}] page {} > results[{}] page {}",
            i,
            pair[0].page_number,
            i + 1,
            pair[1].page_number
        );
    }
}

/// Check that an alignment path visits candidates strictly left to right.
///
/// # Panics (debug builds only)
/// Panics if the path is empty or any step does not increase.
#[inline]
pub fn check_path_increasing(path: &[usize]) {
    debug_assert!(!path.is_empty(), "Contract violation: Path.NonEmpty - empty alignment path");
    for pair in path.windows(2) {
        debug_assert!(
            pair[0] < pair[1],
            "Contract violation: Path.Increasing - step {} -> {} in {:?}",
            pair[0],
            pair[1],
            path
        );
    }
}

// ============================================================================
// LOCATOR CONTRACTS
// ============================================================================

/// Check that a freshly built locator covers every page exactly once.
///
/// # Panics (debug builds only)
/// Panics if a page has no spatial index, the spatial index count is not
/// three per page, or the text index holds a different number of blocks than
/// the pages do.
#[inline]
pub fn check_locator_well_formed(locator: &DocumentProvenanceLocator) {
    if !cfg!(debug_assertions) {
        return;
    }

    let mut expected_blocks = 0;
    for page_number in locator.page_numbers() {
        debug_assert!(
            locator.page_geo_index(page_number).is_some(),
            "Contract violation: Locator.WellFormed - page {} has no spatial index",
            page_number
        );
        expected_blocks += locator.page(page_number).map_or(0, |p| p.block_level_blocks.len());
    }

    debug_assert_eq!(
        locator.geo_index_count(),
        locator.page_count() * 3,
        "Contract violation: Locator.WellFormed - expected three spatial indexes per page"
    );
    debug_assert_eq!(
        locator.indexed_block_count(),
        expected_blocks,
        "Contract violation: Locator.WellFormed - text index and block lists disagree"
    );
}
