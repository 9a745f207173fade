// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The OCR block hierarchy and the provenance records built from it.
//!
//! OCR providers segment a page at three granularities: words, lines and blocks.
//! The locator never mutates any of it; it indexes what it is handed and points
//! back into it when answering queries.
//!
//! # Invariants
//!
//! - **TextBlock**: equality and hashing use `(text, bounding_box)` only. Two blocks
//!   with the same text at different positions are different blocks; confidence or
//!   polygon differences don't matter.
//! - **OcrPageResult**: each list keeps the provider's order. The position of a block
//!   in its list is its identity inside the page, and the indexes store exactly that.
//! - **ProvenanceSource**: `source_block()` prefers the merged block, so a refined hit
//!   reports the tight word-level box rather than the enclosing block.

use crate::geometry::{BoundingPoly, NormBBox};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

// =============================================================================
// GRANULARITY
// =============================================================================

/// The three levels at which OCR text is segmented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Word,
    Line,
    Block,
}

impl Granularity {
    /// All granularities, finest first.
    pub const ALL: [Granularity; 3] = [Granularity::Word, Granularity::Line, Granularity::Block];

    pub fn as_str(self) -> &'static str {
        match self {
            Granularity::Word => "word",
            Granularity::Line => "line",
            Granularity::Block => "block",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// TEXT BLOCKS
// =============================================================================

/// A `[start, end)` character span into the page text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSpan {
    pub start: usize,
    pub end: usize,
    pub level: Granularity,
}

/// Provider-reported extras. All optional because no two providers agree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockMetadata {
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub layout_category: Option<String>,
}

/// A run of OCR text with its geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBlock {
    pub text: String,
    pub granularity: Granularity,
    pub bounding_box: NormBBox,
    #[serde(default)]
    pub bounding_poly: Option<BoundingPoly>,
    #[serde(default)]
    pub spans: Vec<TextSpan>,
    #[serde(default)]
    pub metadata: BlockMetadata,
}

impl TextBlock {
    pub fn new(text: impl Into<String>, granularity: Granularity, bounding_box: NormBBox) -> Self {
        Self {
            text: text.into(),
            granularity,
            bounding_box,
            bounding_poly: None,
            spans: Vec::new(),
            metadata: BlockMetadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: BlockMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_bounding_poly(mut self, poly: BoundingPoly) -> Self {
        self.bounding_poly = Some(poly);
        self
    }

    pub fn with_spans(mut self, spans: Vec<TextSpan>) -> Self {
        self.spans = spans;
        self
    }

    #[inline]
    pub fn has_vertices(&self) -> bool {
        self.bounding_poly.is_some()
    }

    /// Copy with box and polygon straightened to zero skew.
    ///
    /// `None` without a four-vertex polygon.
    pub fn deskewed(&self) -> Option<TextBlock> {
        let (bounding_box, poly) = self.bounding_poly.as_ref()?.deskewed()?;
        Some(TextBlock {
            bounding_box,
            bounding_poly: Some(poly),
            ..self.clone()
        })
    }
}

impl PartialEq for TextBlock {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text && self.bounding_box == other.bounding_box
    }
}

impl Eq for TextBlock {}

impl Hash for TextBlock {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
        self.bounding_box.hash(state);
    }
}

/// Sort blocks top-to-bottom, then left-to-right.
///
/// The sort is stable, so blocks sharing a `(top, x0)` keep their input order.
pub fn sort_reading_order(blocks: &mut [TextBlock]) {
    blocks.sort_by(|a, b| {
        a.bounding_box
            .reading_order_key()
            .partial_cmp(&b.bounding_box.reading_order_key())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

// =============================================================================
// OCR PAGE RESULT
// =============================================================================

/// One provider's OCR output for one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrPageResult {
    #[serde(default)]
    pub provider_name: String,
    /// The text for the entire page in reading order.
    pub page_text: String,
    #[serde(default)]
    pub word_level_blocks: Vec<TextBlock>,
    #[serde(default)]
    pub line_level_blocks: Vec<TextBlock>,
    #[serde(default)]
    pub block_level_blocks: Vec<TextBlock>,
}

impl OcrPageResult {
    /// The block list for one granularity.
    #[inline]
    pub fn blocks(&self, granularity: Granularity) -> &[TextBlock] {
        match granularity {
            Granularity::Word => &self.word_level_blocks,
            Granularity::Line => &self.line_level_blocks,
            Granularity::Block => &self.block_level_blocks,
        }
    }

    #[inline]
    pub fn words(&self) -> &[TextBlock] {
        &self.word_level_blocks
    }

    #[inline]
    pub fn lines(&self) -> &[TextBlock] {
        &self.line_level_blocks
    }
}

// =============================================================================
// PROVENANCE
// =============================================================================

/// Where a piece of text sits on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageTextLocation {
    pub source_blocks: Vec<TextBlock>,
    /// The query text. Often shorter than the matched blocks' text.
    pub text: String,
    pub score: f32,
    pub granularity: Granularity,
    #[serde(default)]
    pub merged_source_block: Option<TextBlock>,
}

/// A piece of verbatim text tied back to its document, page and geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceSource {
    pub document_name: String,
    pub page_number: u32,
    #[serde(default)]
    pub text_location: Option<PageTextLocation>,
}

impl ProvenanceSource {
    /// The representative block: merged if present, else the first source block.
    pub fn source_block(&self) -> Option<&TextBlock> {
        let location = self.text_location.as_ref()?;
        location
            .merged_source_block
            .as_ref()
            .or_else(|| location.source_blocks.first())
    }

    /// Source block texts joined by newlines.
    pub fn text(&self) -> String {
        match &self.text_location {
            Some(location) => location
                .source_blocks
                .iter()
                .map(|b| b.text.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
            None => String::new(),
        }
    }

    /// Ranking score of the hit, `0.0` without a location.
    pub fn score(&self) -> f32 {
        self.text_location.as_ref().map_or(0.0, |l| l.score)
    }
}
