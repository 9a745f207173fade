// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Locator tuning knobs.
//!
//! The defaults are what production uses. They are exposed as constants so tests
//! and benches agree with the library on what "default" means.
//!
//! # Usage
//!
//! ```
//! use provloc::config::{LocatorConfig, DEFAULT_HIT_LIMIT};
//!
//! let config = LocatorConfig::default();
//! assert_eq!(config.hit_limit, DEFAULT_HIT_LIMIT);
//! ```

use serde::{Deserialize, Serialize};

/// Maximum number of full-text hits a single query returns.
///
/// Caps the work done per query; a phrase that shows up in more than this many
/// blocks is not a useful provenance query anyway.
pub const DEFAULT_HIT_LIMIT: usize = 100;

/// Fuzzy similarity a word must strictly exceed (0-100 scale) to count as a match
/// for a query token during word-level refinement.
///
/// Tolerates roughly one OCR error in an eight-letter word.
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 87.5;

/// Heap handed to the tantivy writer, in bytes. tantivy refuses budgets below 15MB
/// per indexing thread, and the locator builds with a single thread.
pub const DEFAULT_WRITER_MEMORY_BUDGET: usize = 15_000_000;

/// Configuration for building and querying a locator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    pub hit_limit: usize,
    pub fuzzy_threshold: f64,
    pub writer_memory_budget: usize,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            hit_limit: DEFAULT_HIT_LIMIT,
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            writer_memory_budget: DEFAULT_WRITER_MEMORY_BUDGET,
        }
    }
}
