// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The provenance locator: build once over a document's OCR, query many times.
//!
//! # Build
//!
//! ```text
//! BTreeMap<page, Option<OcrPageResult>>
//!        │  any None? ──▶ MissingOcrResults (nothing is built)
//!        ▼
//! ┌──────────────────────────────┐   ┌──────────────────────────────────┐
//! │ BlockTextIndex               │   │ geo_index: page → PageGeoIndex    │
//! │ one doc per block-level block│   │ word / line / block R-trees       │
//! └──────────────────────────────┘   └──────────────────────────────────┘
//! ```
//!
//! # Query
//!
//! Every index stores `(page_number, position)` coordinates, and `block_mapping`
//! turns them back into the caller's `TextBlock`s. After build nothing is
//! mutated: the locator is `Send + Sync` and can be shared through an `Arc`
//! with no locking.

use crate::config::LocatorConfig;
use crate::contracts::{check_locator_well_formed, check_reading_order_sorted, check_sources_sorted_by_page};
use crate::error::{LocatorError, Result};
use crate::geometry::NormBBox;
use crate::index::{BlockTextIndex, BlockTextIndexBuilder, SpatialIndex};
use crate::search::{
    build_phrase_query, preprocess_query_text, refine_block_to_word_level, take_n_best, GreedyNearestPair,
    PathSelector, RefinedMatch, SearchBestMode,
};
use crate::types::{sort_reading_order, Granularity, OcrPageResult, PageTextLocation, ProvenanceSource, TextBlock};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, info, instrument, trace};

// =============================================================================
// OPTIONS
// =============================================================================

/// Knobs for a single [`DocumentProvenanceLocator::search`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Restrict hits to one page.
    pub page_number: Option<u32>,
    /// Narrow each block hit to the words that match the query.
    pub refine_to_word: bool,
    /// With `refine_to_word`, drop hits that cannot be narrowed.
    pub require_exact_match: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            page_number: None,
            refine_to_word: true,
            require_exact_match: true,
        }
    }
}

impl SearchOptions {
    /// Default options restricted to `page_number`.
    pub fn on_page(page_number: u32) -> Self {
        Self {
            page_number: Some(page_number),
            ..Self::default()
        }
    }

    /// Block-level hits only, no refinement.
    pub fn unrefined() -> Self {
        Self {
            refine_to_word: false,
            ..Self::default()
        }
    }
}

// =============================================================================
// PER-PAGE SPATIAL INDEX
// =============================================================================

/// The three spatial indexes of one page.
#[derive(Debug, Default)]
pub struct PageGeoIndex {
    word: SpatialIndex,
    line: SpatialIndex,
    block: SpatialIndex,
}

impl PageGeoIndex {
    fn build(page: &OcrPageResult) -> Self {
        let load = |g: Granularity| SpatialIndex::bulk_load(page.blocks(g).iter().map(|b| &b.bounding_box));
        Self {
            word: load(Granularity::Word),
            line: load(Granularity::Line),
            block: load(Granularity::Block),
        }
    }

    #[inline]
    pub fn get(&self, granularity: Granularity) -> &SpatialIndex {
        match granularity {
            Granularity::Word => &self.word,
            Granularity::Line => &self.line,
            Granularity::Block => &self.block,
        }
    }
}

// =============================================================================
// LOCATOR
// =============================================================================

/// Finds where a piece of text came from in an OCR'd document.
#[derive(Debug)]
pub struct DocumentProvenanceLocator {
    document_name: String,
    search_index: BlockTextIndex,
    block_mapping: BTreeMap<u32, OcrPageResult>,
    geo_index: BTreeMap<u32, PageGeoIndex>,
    config: LocatorConfig,
    selector: Box<dyn PathSelector>,
}

impl DocumentProvenanceLocator {
    /// Build with [`LocatorConfig::default`].
    pub fn build(document_name: impl Into<String>, pages: BTreeMap<u32, Option<OcrPageResult>>) -> Result<Self> {
        Self::build_with_config(document_name, pages, LocatorConfig::default())
    }

    /// Index every page. Fails before any indexing if a page has no OCR result.
    #[instrument(skip_all, fields(pages = pages.len()))]
    pub fn build_with_config(
        document_name: impl Into<String>,
        pages: BTreeMap<u32, Option<OcrPageResult>>,
        config: LocatorConfig,
    ) -> Result<Self> {
        let started = Instant::now();
        let document_name = document_name.into();

        if pages.is_empty() {
            return Err(LocatorError::EmptyDocument);
        }
        if let Some((&page_number, _)) = pages.iter().find(|(_, ocr)| ocr.is_none()) {
            return Err(LocatorError::MissingOcrResults { page_number });
        }

        let block_mapping: BTreeMap<u32, OcrPageResult> = pages
            .into_iter()
            .filter_map(|(page_number, ocr)| ocr.map(|ocr| (page_number, ocr)))
            .collect();

        let mut builder = BlockTextIndexBuilder::new(config.writer_memory_budget)?;
        let mut geo_index = BTreeMap::new();
        let mut word_count = 0usize;

        for (&page_number, page) in &block_mapping {
            for (position, block) in page.block_level_blocks.iter().enumerate() {
                builder.add_block(page_number, position, block)?;
            }
            geo_index.insert(page_number, PageGeoIndex::build(page));
            word_count += page.word_level_blocks.len();

            debug!(
                page_number,
                words = page.word_level_blocks.len(),
                lines = page.line_level_blocks.len(),
                blocks = page.block_level_blocks.len(),
                "indexed page"
            );
        }

        let search_index = builder.commit()?;

        let locator = Self {
            document_name,
            search_index,
            block_mapping,
            geo_index,
            config,
            selector: Box::new(GreedyNearestPair),
        };
        check_locator_well_formed(&locator);

        info!(
            document = %locator.document_name,
            pages = locator.page_count(),
            blocks = locator.search_index.num_documents(),
            words = word_count,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "built provenance locator"
        );

        Ok(locator)
    }

    /// Swap the word-alignment strategy used by refinement.
    pub fn with_path_selector(mut self, selector: impl PathSelector + 'static) -> Self {
        self.selector = Box::new(selector);
        self
    }

    #[inline]
    pub fn document_name(&self) -> &str {
        &self.document_name
    }

    #[inline]
    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    /// Number of pages in `block_mapping`.
    #[inline]
    pub fn page_count(&self) -> usize {
        self.block_mapping.len()
    }

    /// Number of spatial indexes across all pages: one per granularity, empty
    /// or not.
    pub fn geo_index_count(&self) -> usize {
        self.geo_index.len() * Granularity::ALL.len()
    }

    /// Number of block-level blocks in the full-text index.
    #[inline]
    pub fn indexed_block_count(&self) -> usize {
        self.search_index.num_documents()
    }

    pub fn page_numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.block_mapping.keys().copied()
    }

    /// The OCR result a page was built from.
    #[inline]
    pub fn page(&self, page_number: u32) -> Option<&OcrPageResult> {
        self.block_mapping.get(&page_number)
    }

    #[inline]
    pub fn page_geo_index(&self, page_number: u32) -> Option<&PageGeoIndex> {
        self.geo_index.get(&page_number)
    }

    fn expect_page(&self, page_number: u32) -> (&OcrPageResult, &PageGeoIndex) {
        match (self.block_mapping.get(&page_number), self.geo_index.get(&page_number)) {
            (Some(page), Some(geo)) => (page, geo),
            _ => panic!(
                "page {} is not indexed in document '{}' (pages: {:?})",
                page_number,
                self.document_name,
                self.block_mapping.keys().collect::<Vec<_>>()
            ),
        }
    }

    fn block_at(&self, page_number: u32, position: usize) -> Option<&TextBlock> {
        self.block_mapping.get(&page_number)?.block_level_blocks.get(position)
    }

    // -------------------------------------------------------------------------
    // Full-text search
    // -------------------------------------------------------------------------

    /// Find where `query` appears, most relevant first within each page.
    ///
    /// The result is ordered by page number; within a page, hits keep their
    /// full-text score order.
    #[instrument(skip(self), fields(document = %self.document_name))]
    pub fn search(&self, query: &str, options: SearchOptions) -> Result<Vec<ProvenanceSource>> {
        let cleaned = preprocess_query_text(query);
        let Some(text_query) = build_phrase_query(&self.search_index, &cleaned, options.page_number)? else {
            debug!("query has no indexable terms");
            return Ok(Vec::new());
        };

        let hits = self.search_index.search(text_query.as_ref(), self.config.hit_limit)?;
        let hit_count = hits.len();

        let mut results = Vec::with_capacity(hits.len());
        for hit in hits {
            let Some(block) = self.block_at(hit.page_number, hit.block_page_idx) else {
                continue;
            };

            let refined = if options.refine_to_word {
                self.refine_query_to_word_level(&cleaned, hit.page_number, block)
            } else {
                None
            };

            let (merged, source_blocks, granularity) = match refined {
                Some(RefinedMatch { merged, words }) => (merged, words, Granularity::Word),
                None if options.refine_to_word && options.require_exact_match => {
                    trace!(page_number = hit.page_number, position = hit.block_page_idx, "dropped unrefined hit");
                    continue;
                }
                None => (block.clone(), vec![block.clone()], Granularity::Block),
            };

            results.push(ProvenanceSource {
                document_name: self.document_name.clone(),
                page_number: hit.page_number,
                text_location: Some(PageTextLocation {
                    source_blocks,
                    text: query.to_string(),
                    score: hit.score,
                    granularity,
                    merged_source_block: Some(merged),
                }),
            });
        }

        results.sort_by_key(|source| source.page_number);
        check_sources_sorted_by_page(&results);

        debug!(hits = hit_count, results = results.len(), "search complete");
        Ok(results)
    }

    /// The `n` best block-level hits for `query` under `mode`.
    pub fn search_n_best(&self, query: &str, n: usize, mode: SearchBestMode) -> Result<Vec<ProvenanceSource>> {
        let results = self.search(query, SearchOptions::unrefined())?;
        Ok(take_n_best(results, n, mode))
    }

    /// Run a query in tantivy's query language as-is and return matching block
    /// texts, highest score first.
    pub fn search_raw(&self, raw_query: &str) -> Result<Vec<String>> {
        let query = self.search_index.parse_query(raw_query)?;
        let hits = self.search_index.search(query.as_ref(), self.config.hit_limit)?;

        Ok(hits
            .into_iter()
            .filter_map(|hit| self.block_at(hit.page_number, hit.block_page_idx))
            .map(|block| block.text.clone())
            .collect())
    }

    // -------------------------------------------------------------------------
    // Spatial queries
    // -------------------------------------------------------------------------

    /// The `k` blocks nearest to `bbox`, in reading order, minus any block whose
    /// box equals `bbox`.
    ///
    /// # Panics
    ///
    /// If `page_number` was not indexed.
    pub fn k_nearest(&self, bbox: &NormBBox, page_number: u32, k: usize, granularity: Granularity) -> Vec<TextBlock> {
        let (page, geo) = self.expect_page(page_number);
        let positions = geo.get(granularity).nearest(bbox, k);
        hydrate(page.blocks(granularity), &positions, bbox)
    }

    /// Every block intersecting `bbox`, in reading order, minus any block whose
    /// box equals `bbox`. Touching boxes count as intersecting.
    ///
    /// # Panics
    ///
    /// If `page_number` was not indexed.
    pub fn intersecting(&self, bbox: &NormBBox, page_number: u32, granularity: Granularity) -> Vec<TextBlock> {
        let (page, geo) = self.expect_page(page_number);
        let positions = geo.get(granularity).intersecting(bbox);
        hydrate(page.blocks(granularity), &positions, bbox)
    }

    /// Narrow `enclosing_block` to the words on `page_number` that match `query`.
    ///
    /// `query` is tokenized as given. [`search`](Self::search) passes the text after
    /// [`preprocess_query_text`], so a leading list enumerator (`1.`, `*`, `-`) or a
    /// double quote never becomes a token; direct callers wanting the same should
    /// preprocess first.
    ///
    /// # Panics
    ///
    /// If `page_number` was not indexed.
    pub fn refine_query_to_word_level(
        &self,
        query: &str,
        page_number: u32,
        enclosing_block: &TextBlock,
    ) -> Option<RefinedMatch> {
        let (page, geo) = self.expect_page(page_number);
        let words = page.words();
        let candidates: Vec<TextBlock> = geo
            .get(Granularity::Word)
            .intersecting(&enclosing_block.bounding_box)
            .into_iter()
            .filter_map(|position| words.get(position).cloned())
            .collect();

        refine_block_to_word_level(
            enclosing_block,
            &candidates,
            query,
            self.config.fuzzy_threshold,
            self.selector.as_ref(),
        )
    }
}

/// Positions to blocks, reading order, self-box excluded.
fn hydrate(blocks: &[TextBlock], positions: &[usize], query_bbox: &NormBBox) -> Vec<TextBlock> {
    let mut hydrated: Vec<TextBlock> = positions.iter().filter_map(|&p| blocks.get(p).cloned()).collect();
    sort_reading_order(&mut hydrated);
    hydrated.retain(|block| block.bounding_box != *query_bbox);
    check_reading_order_sorted(&hydrated);
    hydrated
}
