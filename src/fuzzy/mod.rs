// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzzy matching: OCR-error tolerance via indel similarity.
//!
//! OCR mangles words in small, local ways ("rooted" becomes "r00ted" or "rooted,").
//! Refinement compares every query token against every candidate word on a block,
//! so the comparison needs to be cheap and to give up early on hopeless pairs.

mod indel;

pub use indel::*;
