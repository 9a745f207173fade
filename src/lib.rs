// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Provenance location for OCR'd documents.
//!
//! Given a piece of text (usually quoted by an LLM), find the exact blocks,
//! words and bounding boxes on the page it came from. The locator combines
//! ranked full-text search over block text, R-tree queries over normalized
//! boxes, and a fuzzy alignment that narrows a block hit to the words that
//! produced it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌───────────────────┐     ┌────────────────────┐
//! │  types.rs   │────▶│    locator.rs     │────▶│  search/ranking    │
//! │ (TextBlock, │     │ (build, search,   │     │  (search_n_best)   │
//! │ OcrPageRes.)│     │  k_nearest, ...)  │     └────────────────────┘
//! └─────────────┘     └───────────────────┘
//!        │              │        │       │
//!        ▼              ▼        ▼       ▼
//! ┌────────────┐ ┌──────────┐ ┌───────┐ ┌─────────────────────────┐
//! │geometry.rs │ │index/text│ │index/ │ │ search/query + refine   │
//! │ (NormBBox) │ │ (tantivy)│ │spatial│ │ (phrase query, fuzzy    │
//! └────────────┘ └──────────┘ │(rstar)│ │  alignment graph)       │
//!                             └───────┘ └─────────────────────────┘
//!
//! document.rs: DocumentNode owns pages and caches one locator (lazy, Arc)
//! ```
//!
//! # Module Map
//!
//! | Module      | Responsibility                                   |
//! |-------------|--------------------------------------------------|
//! | `geometry`  | normalized boxes, polygons, box algebra          |
//! | `types`     | OCR block hierarchy and provenance records       |
//! | `index`     | tantivy block index, per-page R-trees            |
//! | `search`    | query cleanup, refinement, re-ranking            |
//! | `fuzzy`     | indel similarity ratio                           |
//! | `locator`   | the build-once, query-many locator               |
//! | `document`  | document/page holders with a cached locator      |
//! | `contracts` | debug-build invariant checks                     |
//!
//! # Usage
//!
//! ```
//! use provloc::{DocumentNode, SearchBestMode};
//! use provloc::testing::make_page;
//!
//! let mut document = DocumentNode::new("report.pdf", 1);
//! document
//!     .add_ocr_result(1, "ocr", make_page(&[&["The", "tree", "is", "deeply", "rooted"]]))
//!     .unwrap();
//!
//! let locator = document.locator().unwrap();
//! let sources = locator.search("deeply rooted", Default::default()).unwrap();
//! assert_eq!(sources.len(), 1);
//! assert_eq!(sources[0].source_block().unwrap().text, "deeply rooted");
//!
//! let best = locator.search_n_best("rooted", 3, SearchBestMode::HighestScore).unwrap();
//! assert!(best.len() <= 3);
//! ```

// Module declarations
pub mod config;
pub mod contracts;
pub mod document;
pub mod error;
pub mod fuzzy;
pub mod geometry;
pub mod index;
pub mod locator;
pub mod search;
pub mod testing;
pub mod types;
mod utils;

// Re-exports for public API
pub use config::LocatorConfig;
pub use document::{DocumentNode, PageNode, ResultContainer};
pub use error::{LocatorError, Result};
pub use fuzzy::{normalized_ratio, ratio};
pub use geometry::{BoundingPoly, NormBBox, Point};
pub use locator::{DocumentProvenanceLocator, PageGeoIndex, SearchOptions};
pub use search::{
    preprocess_query_text, refine_block_to_word_level, ExhaustivePairs, GreedyNearestPair, PathSelector,
    RefinedMatch, SearchBestMode,
};
pub use types::{
    sort_reading_order, BlockMetadata, Granularity, OcrPageResult, PageTextLocation, ProvenanceSource, TextBlock,
    TextSpan,
};
pub use utils::normalize;
