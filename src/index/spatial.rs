// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Per-page R-trees over normalized block boxes.
//!
//! One tree per `(page, granularity)`. Trees store only a box and the block's
//! position in its page list; the locator hydrates positions back into blocks.
//!
//! # Build
//!
//! Bulk loading (OMT packing) instead of one insert per box: a dense page has
//! thousands of word boxes and repeated inserts rebalance the tree every time.
//!
//! # Queries
//!
//! | Query          | Semantics                                            |
//! |----------------|------------------------------------------------------|
//! | `intersecting` | closed-interval overlap, touching boxes count        |
//! | `nearest`      | k smallest rectangle distances, ties by position     |
//!
//! rstar only does nearest-neighbour search against points, so box-to-box kNN
//! grows a search envelope around the query until it provably holds the k
//! nearest boxes: any box within Euclidean distance `r` of the query lies inside
//! the query expanded by `r` on every side.

use crate::contracts::check_bbox_normalized;
use crate::geometry::NormBBox;
use rstar::{RTree, RTreeObject, AABB};

/// Doublings before giving up on envelope growth and scanning the whole tree.
/// Only reachable with non-finite coordinates.
const MAX_EXPANSIONS: usize = 64;

/// Starting margin for kNN envelope growth, in normalized units.
const INITIAL_RADIUS: f64 = 1.0 / 128.0;

/// A block box tagged with its position in the page's block list.
#[derive(Debug, Clone, Copy)]
struct IndexedBox {
    position: usize,
    bbox: NormBBox,
}

impl RTreeObject for IndexedBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        to_envelope(&self.bbox)
    }
}

#[inline]
fn to_envelope(bbox: &NormBBox) -> AABB<[f64; 2]> {
    AABB::from_corners([bbox.x0, bbox.top], [bbox.x1, bbox.bottom])
}

/// Squared rectangle distance: zero when the boxes overlap or touch.
#[inline]
pub fn rect_distance_2(a: &NormBBox, b: &NormBBox) -> f64 {
    let dx = (a.x0 - b.x1).max(b.x0 - a.x1).max(0.0);
    let dy = (a.top - b.bottom).max(b.top - a.bottom).max(0.0);
    dx * dx + dy * dy
}

/// Immutable spatial index over one granularity of one page.
#[derive(Debug)]
pub struct SpatialIndex {
    tree: RTree<IndexedBox>,
    /// Union of every stored box, `None` when empty.
    bounds: Option<NormBBox>,
}

impl SpatialIndex {
    /// Bulk-load an index. Position `i` in the iterator becomes the id of box `i`.
    ///
    /// Reversed corners are normalized before insertion.
    pub fn bulk_load<'a, I>(bboxes: I) -> Self
    where
        I: IntoIterator<Item = &'a NormBBox>,
    {
        let boxes: Vec<IndexedBox> = bboxes
            .into_iter()
            .enumerate()
            .map(|(position, bbox)| {
                let bbox = bbox.normalized();
                check_bbox_normalized(&bbox);
                IndexedBox { position, bbox }
            })
            .collect();

        let bounds = NormBBox::combine(boxes.iter().map(|b| &b.bbox));

        Self {
            tree: RTree::bulk_load(boxes),
            bounds,
        }
    }

    pub fn empty() -> Self {
        Self {
            tree: RTree::new(),
            bounds: None,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Positions of every box intersecting `query`, ascending.
    pub fn intersecting(&self, query: &NormBBox) -> Vec<usize> {
        let envelope = to_envelope(&query.normalized());
        let mut positions: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|b| b.position)
            .collect();
        positions.sort_unstable();
        positions
    }

    /// Positions of the `k` boxes closest to `query`, nearest first.
    ///
    /// Distance is the rectangle distance (zero for overlapping boxes); equal
    /// distances are ordered by position so results are deterministic.
    pub fn nearest(&self, query: &NormBBox, k: usize) -> Vec<usize> {
        let Some(bounds) = self.bounds else {
            return Vec::new();
        };
        if k == 0 {
            return Vec::new();
        }

        let query = query.normalized();
        let mut radius = INITIAL_RADIUS;

        for _ in 0..MAX_EXPANSIONS {
            let search = NormBBox::new(
                query.x0 - radius,
                query.top - radius,
                query.x1 + radius,
                query.bottom + radius,
            );
            let covers_all = search.contains(&bounds);

            let mut hits: Vec<(f64, usize)> = self
                .tree
                .locate_in_envelope_intersecting(&to_envelope(&search))
                .map(|b| (rect_distance_2(&query, &b.bbox), b.position))
                .collect();

            let radius_2 = radius * radius;
            let within = hits.iter().filter(|(d, _)| *d <= radius_2).count();

            if within >= k || covers_all {
                sort_by_distance(&mut hits);
                hits.truncate(k);
                return hits.into_iter().map(|(_, position)| position).collect();
            }

            radius *= 2.0;
        }

        // Non-finite coordinates: fall back to a full scan
        let mut hits: Vec<(f64, usize)> = self
            .tree
            .iter()
            .map(|b| (rect_distance_2(&query, &b.bbox), b.position))
            .collect();
        sort_by_distance(&mut hits);
        hits.truncate(k);
        hits.into_iter().map(|(_, position)| position).collect()
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::empty()
    }
}

fn sort_by_distance(hits: &mut [(f64, usize)]) {
    hits.sort_by(|a, b| {
        a.0.partial_cmp(&b.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.1.cmp(&b.1))
    });
}
