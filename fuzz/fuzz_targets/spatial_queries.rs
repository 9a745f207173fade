// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for the per-page R-trees.
//!
//! Arbitrary boxes, including reversed and out-of-page ones, are bulk loaded
//! and queried. kNN must agree with a linear scan.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use provloc::index::{rect_distance_2, SpatialIndex};
use provloc::NormBBox;

#[derive(Debug, Arbitrary)]
struct SpatialInput {
    boxes: Vec<(i8, i8, i8, i8)>,
    query: (i8, i8, i8, i8),
    k: u8,
}

fn to_bbox((x0, top, x1, bottom): (i8, i8, i8, i8)) -> NormBBox {
    let scale = |v: i8| f64::from(v) / 100.0;
    NormBBox::new(scale(x0), scale(top), scale(x1), scale(bottom))
}

fuzz_target!(|input: SpatialInput| {
    let boxes: Vec<NormBBox> = input.boxes.iter().copied().map(to_bbox).collect();
    let query = to_bbox(input.query);
    let k = usize::from(input.k);

    let index = SpatialIndex::bulk_load(&boxes);
    assert_eq!(index.len(), boxes.len());

    let nearest = index.nearest(&query, k);
    assert_eq!(nearest.len(), k.min(boxes.len()));

    let mut expected: Vec<(f64, usize)> = boxes
        .iter()
        .enumerate()
        .map(|(i, b)| (rect_distance_2(&query.normalized(), &b.normalized()), i))
        .collect();
    expected.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    let expected: Vec<usize> = expected.into_iter().take(k).map(|(_, i)| i).collect();
    assert_eq!(nearest, expected);

    for position in index.intersecting(&query) {
        assert!(position < boxes.len());
        assert_eq!(rect_distance_2(&query.normalized(), &boxes[position].normalized()), 0.0);
    }
});
