// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Document and page holders with a lazily built, cached locator.
//!
//! A [`DocumentNode`] owns the per-page OCR results. The locator built from them
//! is expensive, so it is built on first use and cached. The cache is only
//! dropped when someone asks for it:
//!
//! ```text
//!            locator() / refresh_locator()
//!   Empty ─────────────────────────────────▶ Cached(Arc<Locator>)
//!     ▲                                            │
//!     └──────────── invalidate_locator() ──────────┘
//! ```
//!
//! Adding OCR results does not invalidate: callers that change pages after the
//! first query call [`DocumentNode::invalidate_locator`] (or
//! [`DocumentNode::refresh_locator`]) themselves. Serialization skips the cache
//! and leaves it untouched; a deserialized node starts empty.
//!
//! Readers share the cached locator through an `Arc`, so an invalidation never
//! pulls a locator out from under a running query.

use crate::config::LocatorConfig;
use crate::error::{LocatorError, Result};
use crate::locator::{DocumentProvenanceLocator, SearchOptions};
use crate::types::{OcrPageResult, ProvenanceSource};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

// =============================================================================
// RESULT CONTAINER
// =============================================================================

/// Task results for one page, keyed by provider, in contribution order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultContainer<T> {
    results: Vec<(String, T)>,
}

impl<T> Default for ResultContainer<T> {
    fn default() -> Self {
        Self { results: Vec::new() }
    }
}

impl<T> ResultContainer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The first contributed result, if any.
    pub fn result(&self) -> Option<&T> {
        self.results.first().map(|(_, result)| result)
    }

    pub fn get(&self, provider: &str) -> Option<&T> {
        self.results.iter().find(|(p, _)| p == provider).map(|(_, result)| result)
    }

    pub fn contains(&self, provider: &str) -> bool {
        self.results.iter().any(|(p, _)| p == provider)
    }

    /// Add `provider`'s result. A provider contributes at most once; the second
    /// attempt hands the result back.
    pub fn insert(&mut self, provider: impl Into<String>, result: T) -> std::result::Result<(), T> {
        let provider = provider.into();
        if self.contains(&provider) {
            return Err(result);
        }
        self.results.push((provider, result));
        Ok(())
    }

    pub fn remove(&mut self, provider: &str) -> Option<T> {
        let position = self.results.iter().position(|(p, _)| p == provider)?;
        Some(self.results.remove(position).1)
    }

    pub fn providers(&self) -> impl Iterator<Item = &str> + '_ {
        self.results.iter().map(|(p, _)| p.as_str())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

// =============================================================================
// PAGE NODE
// =============================================================================

/// One page of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageNode {
    /// 1-based.
    pub page_number: u32,
    #[serde(default)]
    pub ocr_results: ResultContainer<OcrPageResult>,
}

impl PageNode {
    pub fn new(page_number: u32) -> Self {
        Self {
            page_number,
            ocr_results: ResultContainer::new(),
        }
    }

    /// The OCR result the locator indexes for this page.
    #[inline]
    pub fn ocr_result(&self) -> Option<&OcrPageResult> {
        self.ocr_results.result()
    }
}

// =============================================================================
// DOCUMENT NODE
// =============================================================================

/// A document's pages plus its cached provenance locator.
#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentNode {
    pub name: String,
    pub pages: Vec<PageNode>,
    #[serde(default)]
    pub locator_config: LocatorConfig,
    #[serde(skip)]
    locator: RwLock<Option<Arc<DocumentProvenanceLocator>>>,
}

impl DocumentNode {
    /// A document with `page_count` empty pages numbered from 1.
    pub fn new(name: impl Into<String>, page_count: u32) -> Self {
        Self {
            name: name.into(),
            pages: (1..=page_count).map(PageNode::new).collect(),
            locator_config: LocatorConfig::default(),
            locator: RwLock::new(None),
        }
    }

    pub fn with_locator_config(mut self, config: LocatorConfig) -> Self {
        self.locator_config = config;
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn page(&self, page_number: u32) -> Option<&PageNode> {
        self.pages.iter().find(|p| p.page_number == page_number)
    }

    pub fn page_mut(&mut self, page_number: u32) -> Option<&mut PageNode> {
        self.pages.iter_mut().find(|p| p.page_number == page_number)
    }

    /// Contribute one provider's OCR result for a page.
    pub fn add_ocr_result(&mut self, page_number: u32, provider: impl Into<String>, result: OcrPageResult) -> Result<()> {
        let page_count = self.pages.len();
        let page = self
            .page_mut(page_number)
            .ok_or(LocatorError::PageOutOfRange { page_number, page_count })?;

        let provider = provider.into();
        page.ocr_results
            .insert(provider.clone(), result)
            .map_err(|_| LocatorError::DuplicateProviderResult { provider, page_number })
    }

    /// The cached locator, building it first if there is none.
    pub fn locator(&self) -> Result<Arc<DocumentProvenanceLocator>> {
        if let Some(locator) = self.locator.read().as_ref() {
            return Ok(Arc::clone(locator));
        }

        let mut slot = self.locator.write();
        // Another reader may have built it while we waited for the write lock
        if let Some(locator) = slot.as_ref() {
            return Ok(Arc::clone(locator));
        }

        let locator = Arc::new(self.build_locator()?);
        *slot = Some(Arc::clone(&locator));
        Ok(locator)
    }

    /// Rebuild the locator from the current pages and cache it.
    ///
    /// On failure the previous cache is left as it was.
    pub fn refresh_locator(&self) -> Result<Arc<DocumentProvenanceLocator>> {
        let mut slot = self.locator.write();
        let locator = Arc::new(self.build_locator()?);
        *slot = Some(Arc::clone(&locator));
        debug!(document = %self.name, "refreshed locator");
        Ok(locator)
    }

    /// Drop the cached locator. The next [`locator`](Self::locator) rebuilds it.
    pub fn invalidate_locator(&self) {
        if self.locator.write().take().is_some() {
            debug!(document = %self.name, "invalidated locator");
        }
    }

    pub fn has_locator(&self) -> bool {
        self.locator.read().is_some()
    }

    /// Search one page, the way a page would search its own document.
    pub fn page_search(
        &self,
        page_number: u32,
        query: &str,
        refine_to_word: bool,
        require_exact_match: bool,
    ) -> Result<Vec<ProvenanceSource>> {
        self.locator()?.search(
            query,
            SearchOptions {
                page_number: Some(page_number),
                refine_to_word,
                require_exact_match,
            },
        )
    }

    fn build_locator(&self) -> Result<DocumentProvenanceLocator> {
        if self.pages.is_empty() {
            return Err(LocatorError::EmptyDocument);
        }

        let pages: BTreeMap<u32, Option<OcrPageResult>> = self
            .pages
            .iter()
            .map(|page| (page.page_number, page.ocr_result().cloned()))
            .collect();

        DocumentProvenanceLocator::build_with_config(self.name.clone(), pages, self.locator_config.clone())
    }
}
