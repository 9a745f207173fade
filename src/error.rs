// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error types for locator construction and querying.
//!
//! Only a few failures are worth a `Result`:
//!
//! - a page without OCR output (the locator is all-or-nothing),
//! - tantivy failing to build or search its in-memory index,
//! - a raw query the tantivy parser rejects.
//!
//! "No match" is not an error. It comes back as an empty `Vec` or a `None`
//! refinement. Asking for a page the locator never indexed is a caller bug and
//! panics instead.

use thiserror::Error;

/// Everything that can go wrong building or querying a locator.
#[derive(Debug, Error)]
pub enum LocatorError {
    /// A page has no OCR results, so no locator can be built for its document.
    #[error("page {page_number} does not have OCR results")]
    MissingOcrResults { page_number: u32 },

    /// The document has no pages at all.
    #[error("cannot build a locator for a document without pages")]
    EmptyDocument,

    /// The full-text index failed while building, committing or searching.
    #[error("full-text index error: {0}")]
    Index(#[from] tantivy::TantivyError),

    /// A raw query could not be parsed.
    #[error("invalid query syntax: {0}")]
    InvalidQuerySyntax(#[from] tantivy::query::QueryParserError),

    /// A provider contributed a second result for the same page.
    #[error("provider '{provider}' already has a result for page {page_number}")]
    DuplicateProviderResult { provider: String, page_number: u32 },

    /// A page number outside the document.
    #[error("page {page_number} is out of range for a document with {page_count} pages")]
    PageOutOfRange { page_number: u32, page_count: usize },

    /// A ranking mode name that `search_n_best` does not know.
    #[error("unknown search mode '{0}', expected shortest_text, longest_text or highest_score")]
    UnknownSearchMode(String),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, LocatorError>;
