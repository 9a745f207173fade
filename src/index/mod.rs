// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Index construction: the two structures every query goes through.
//!
//! - **Text**: a tantivy index over block text, one document per block
//! - **Spatial**: one R-tree per page and granularity over block boxes
//!
//! Both are built once and never mutated. Each stores only coordinates
//! (page number and position in the page's block list); the blocks themselves
//! stay in the OCR results the locator holds.

pub mod spatial;
pub mod text;

pub use spatial::{rect_distance_2, SpatialIndex};
pub use text::{BlockFields, BlockHit, BlockTextIndex, BlockTextIndexBuilder};
