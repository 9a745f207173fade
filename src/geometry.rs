// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Normalized page geometry.
//!
//! Every coordinate here lives in `[0, 1]`, relative to the page size, so boxes from
//! different OCR providers and raster resolutions compare directly.
//!
//! # Invariants
//!
//! - **NormBBox**: `x0 <= x1 ∧ top <= bottom` for anything that goes into a spatial
//!   index. OCR output occasionally violates this, so the index calls
//!   [`NormBBox::normalized`] before insertion instead of trusting the provider.
//! - Equality compares the four coordinates by value, with `-0.0` folded onto `0.0`
//!   and every NaN equal to every other. That keeps `Eq` reflexive and `Hash`
//!   consistent with it, which matters because blocks are deduplicated by
//!   `(text, box)` and a query box is dropped from its own neighbours.

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::ops::{Add, BitAnd};

/// An axis-aligned box normalized to the page size.
///
/// `(x0, top)` is the upper-left corner and `(x1, bottom)` the lower-right one;
/// y grows downwards like it does on a rasterized page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NormBBox {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
}

impl NormBBox {
    pub const fn new(x0: f64, top: f64, x1: f64, bottom: f64) -> Self {
        Self {
            x0,
            top,
            x1,
            bottom,
        }
    }

    /// `(x0, top, x1, bottom)`.
    #[inline]
    pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
        (self.x0, self.top, self.x1, self.bottom)
    }

    /// Reorder reversed coordinates so that `x0 <= x1` and `top <= bottom`.
    ///
    /// Some providers emit boxes with swapped corners. The spatial index refuses
    /// nothing, it just silently answers wrong, so every box is run through this
    /// before insertion and before being used as a query envelope.
    #[inline]
    pub fn normalized(&self) -> Self {
        Self {
            x0: self.x0.min(self.x1),
            top: self.top.min(self.bottom),
            x1: self.x0.max(self.x1),
            bottom: self.top.max(self.bottom),
        }
    }

    /// True when corners are ordered and every coordinate is inside the unit square.
    pub fn is_valid(&self) -> bool {
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        self.x0 <= self.x1
            && self.top <= self.bottom
            && in_unit(self.x0)
            && in_unit(self.top)
            && in_unit(self.x1)
            && in_unit(self.bottom)
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    #[inline]
    pub fn x_center(&self) -> f64 {
        (self.x0 + self.x1) / 2.0
    }

    #[inline]
    pub fn y_center(&self) -> f64 {
        (self.top + self.bottom) / 2.0
    }

    pub fn centroid(&self) -> Point {
        Point {
            x: self.x_center(),
            y: self.y_center(),
        }
    }

    /// Length of the shared horizontal extent, `0.0` when the boxes don't overlap.
    pub fn x_overlap(&self, other: &NormBBox) -> f64 {
        (self.x1.min(other.x1) - self.x0.max(other.x0)).max(0.0)
    }

    /// Length of the shared vertical extent, `0.0` when the boxes don't overlap.
    pub fn y_overlap(&self, other: &NormBBox) -> f64 {
        (self.bottom.min(other.bottom) - self.top.max(other.top)).max(0.0)
    }

    /// Area of the intersection. Touching boxes have zero overlap.
    pub fn overlap_area(&self, other: &NormBBox) -> f64 {
        self.x_overlap(other) * self.y_overlap(other)
    }

    /// Intersection over union, `0.0` for two degenerate boxes.
    pub fn iou(&self, other: &NormBBox) -> f64 {
        let intersection = self.overlap_area(other);
        let union = self.area() + other.area() - intersection;
        if union <= 0.0 {
            0.0
        } else {
            intersection / union
        }
    }

    /// Does `other` lie entirely inside `self` (edges inclusive)?
    pub fn contains(&self, other: &NormBBox) -> bool {
        self.x0 <= other.x0
            && self.top <= other.top
            && self.x1 >= other.x1
            && self.bottom >= other.bottom
    }

    pub fn contains_point(&self, point: &Point) -> bool {
        (self.x0..=self.x1).contains(&point.x) && (self.top..=self.bottom).contains(&point.y)
    }

    /// Closed-interval intersection: touching boxes intersect in a degenerate box.
    pub fn intersection(&self, other: &NormBBox) -> Option<NormBBox> {
        let x0 = self.x0.max(other.x0);
        let top = self.top.max(other.top);
        let x1 = self.x1.min(other.x1);
        let bottom = self.bottom.min(other.bottom);

        if x0 > x1 || top > bottom {
            return None;
        }

        Some(NormBBox::new(x0, top, x1, bottom))
    }

    /// Smallest box covering both.
    pub fn union(&self, other: &NormBBox) -> NormBBox {
        NormBBox {
            x0: self.x0.min(other.x0),
            top: self.top.min(other.top),
            x1: self.x1.max(other.x1),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Union of any number of boxes, `None` for an empty iterator.
    pub fn combine<'a, I>(bboxes: I) -> Option<NormBBox>
    where
        I: IntoIterator<Item = &'a NormBBox>,
    {
        bboxes
            .into_iter()
            .copied()
            .reduce(|acc, bbox| acc + bbox)
    }

    /// Box spanned by a four-vertex polygon (top-left and bottom-right corners).
    ///
    /// Returns `None` for polygons that don't have exactly four vertices.
    pub fn from_bounding_poly(poly: &BoundingPoly) -> Option<NormBBox> {
        match poly.normalized_vertices.as_slice() {
            [top_left, _, bottom_right, _] => Some(NormBBox::new(
                top_left.x,
                top_left.y,
                bottom_right.x,
                bottom_right.y,
            )),
            _ => None,
        }
    }

    /// Reading-order key: top first, then left.
    #[inline]
    pub fn reading_order_key(&self) -> (f64, f64) {
        (self.top, self.x0)
    }
}

/// Bit pattern shared by all coordinates that compare equal.
#[inline]
fn canonical_bits(v: f64) -> u64 {
    if v == 0.0 {
        0
    } else if v.is_nan() {
        f64::NAN.to_bits()
    } else {
        v.to_bits()
    }
}

impl NormBBox {
    #[inline]
    fn canonical(&self) -> [u64; 4] {
        [
            canonical_bits(self.x0),
            canonical_bits(self.top),
            canonical_bits(self.x1),
            canonical_bits(self.bottom),
        ]
    }
}

impl PartialEq for NormBBox {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for NormBBox {}

impl Hash for NormBBox {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl Add for NormBBox {
    type Output = NormBBox;

    fn add(self, other: NormBBox) -> NormBBox {
        self.union(&other)
    }
}

impl BitAnd for NormBBox {
    type Output = Option<NormBBox>;

    fn bitand(self, other: NormBBox) -> Option<NormBBox> {
        self.intersection(&other)
    }
}

/// A normalized point on the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Rotate by `angle_degrees` around `origin` (`x' = dx·cos − dy·sin`,
    /// `y' = dx·sin + dy·cos`). With y growing downwards a positive angle turns
    /// clockwise on the page.
    pub fn rotated_around(&self, angle_degrees: f64, origin: &Point) -> Point {
        let (sin, cos) = angle_degrees.to_radians().sin_cos();
        let dx = self.x - origin.x;
        let dy = self.y - origin.y;

        Point {
            x: dx * cos - dy * sin + origin.x,
            y: dx * sin + dy * cos + origin.y,
        }
    }
}

/// A polygon in normalized coordinates, vertices clockwise from the top-left.
///
/// Providers that report skewed text (scans, photos) give a polygon in addition to
/// the axis-aligned box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingPoly {
    pub normalized_vertices: Vec<Point>,
}

impl BoundingPoly {
    /// Mean of the vertices, `None` for an empty polygon.
    pub fn centroid(&self) -> Option<Point> {
        if self.normalized_vertices.is_empty() {
            return None;
        }

        let n = self.normalized_vertices.len() as f64;
        let (sum_x, sum_y) = self
            .normalized_vertices
            .iter()
            .fold((0.0, 0.0), |(x, y), v| (x + v.x, y + v.y));

        Some(Point {
            x: sum_x / n,
            y: sum_y / n,
        })
    }

    /// Angle in degrees between the top edge and the horizontal.
    ///
    /// Positive when the top-right corner sits higher than the top-left one.
    /// A vertical top edge reports `±90`. Only defined for four vertices.
    pub fn skew_angle(&self) -> Option<f64> {
        let [top_left, top_right, _, _] = self.normalized_vertices.as_slice() else {
            return None;
        };

        let rise = top_left.y - top_right.y;
        let run = top_right.x - top_left.x;

        if run == 0.0 {
            return Some(if rise > 0.0 { 90.0 } else { -90.0 });
        }

        Some((rise / run).atan().to_degrees())
    }

    /// Corner to pivot on when straightening the polygon: bottom-left when the
    /// top edge slopes down to the right, top-right otherwise.
    pub fn rotation_point(&self) -> Option<Point> {
        let [top_left, top_right, _, bottom_left] = self.normalized_vertices.as_slice() else {
            return None;
        };

        Some(if top_right.y > top_left.y {
            *bottom_left
        } else {
            *top_right
        })
    }

    /// Copy rotated by `angle_degrees` around `origin`. Only defined for four vertices.
    pub fn rotated_around(&self, angle_degrees: f64, origin: &Point) -> Option<BoundingPoly> {
        if self.normalized_vertices.len() != 4 {
            return None;
        }

        Some(BoundingPoly {
            normalized_vertices: self
                .normalized_vertices
                .iter()
                .map(|v| v.rotated_around(angle_degrees, origin))
                .collect(),
        })
    }

    /// Copy rotated by `angle_degrees` around its own centroid.
    pub fn rotated_around_centroid(&self, angle_degrees: f64) -> Option<BoundingPoly> {
        let centroid = self.centroid()?;
        self.rotated_around(angle_degrees, &centroid)
    }

    /// Rotate by the skew angle around [`rotation_point`](Self::rotation_point) so
    /// the top edge is horizontal. Returns the straightened polygon's box and the
    /// polygon itself.
    pub fn deskewed(&self) -> Option<(NormBBox, BoundingPoly)> {
        let angle = self.skew_angle()?;
        let pivot = self.rotation_point()?;
        let straight = self.rotated_around(angle, &pivot)?;
        let bbox = NormBBox::from_bounding_poly(&straight)?;
        Some((bbox, straight))
    }
}
