// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Full-text index over block-level OCR text.
//!
//! Only block-granularity text is indexed. Words and lines exist for geometry,
//! not for ranking: indexing them too would triple the postings and return the
//! same evidence three times.
//!
//! # Schema
//!
//! | Field            | Type | Options                 | Purpose                      |
//! |------------------|------|-------------------------|------------------------------|
//! | `page_number`    | u64  | indexed, stored, fast   | page filter, hydration       |
//! | `block_type`     | str  | stored                  | granularity of the document  |
//! | `block_page_idx` | u64  | stored                  | position in the page's list  |
//! | `content`        | text | indexed (positions), stored | phrase search            |
//!
//! The index lives in RAM and is frozen after [`BlockTextIndexBuilder::commit`].
//! `BlockTextIndex` only hands out searchers, so it is safe to share across
//! threads with no locking.

use crate::error::Result;
use crate::types::{Granularity, TextBlock};
use tantivy::collector::TopDocs;
use tantivy::query::{Query, QueryParser};
use tantivy::schema::{Field, Schema, Value, FAST, INDEXED, STORED, STRING, TEXT};
use tantivy::tokenizer::TokenStream;
use tantivy::{doc, Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term};

const PAGE_NUMBER: &str = "page_number";
const BLOCK_TYPE: &str = "block_type";
const BLOCK_PAGE_IDX: &str = "block_page_idx";
const CONTENT: &str = "content";

/// Field handles for the block schema.
#[derive(Debug, Clone, Copy)]
pub struct BlockFields {
    pub page_number: Field,
    pub block_type: Field,
    pub block_page_idx: Field,
    pub content: Field,
}

impl BlockFields {
    fn build_schema() -> (Schema, Self) {
        let mut builder = Schema::builder();
        let page_number = builder.add_u64_field(PAGE_NUMBER, INDEXED | STORED | FAST);
        let block_type = builder.add_text_field(BLOCK_TYPE, STRING | STORED);
        let block_page_idx = builder.add_u64_field(BLOCK_PAGE_IDX, STORED);
        let content = builder.add_text_field(CONTENT, TEXT | STORED);

        let fields = Self {
            page_number,
            block_type,
            block_page_idx,
            content,
        };
        (builder.build(), fields)
    }
}

/// One ranked hit: a score and the coordinates needed to find the block again.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockHit {
    pub score: f32,
    pub page_number: u32,
    pub block_page_idx: usize,
}

/// Accumulates block documents until `commit` freezes them.
pub struct BlockTextIndexBuilder {
    index: Index,
    writer: IndexWriter,
    fields: BlockFields,
    documents: usize,
}

impl BlockTextIndexBuilder {
    /// Create an empty in-RAM index with a single-threaded writer.
    ///
    /// One indexing thread keeps the build deterministic: a single segment, with
    /// documents in insertion order.
    pub fn new(writer_memory_budget: usize) -> Result<Self> {
        let (schema, fields) = BlockFields::build_schema();
        let index = Index::create_in_ram(schema);
        let writer: IndexWriter = index.writer_with_num_threads(1, writer_memory_budget)?;

        Ok(Self {
            index,
            writer,
            fields,
            documents: 0,
        })
    }

    /// Add one block. `position` is the block's index in its page's block list.
    pub fn add_block(&mut self, page_number: u32, position: usize, block: &TextBlock) -> Result<()> {
        self.writer.add_document(doc!(
            self.fields.page_number => u64::from(page_number),
            self.fields.block_type => Granularity::Block.as_str(),
            self.fields.block_page_idx => position as u64,
            self.fields.content => block.text.as_str(),
        ))?;
        self.documents += 1;
        Ok(())
    }

    /// Commit everything and open a reader. Nothing can be added afterwards.
    pub fn commit(mut self) -> Result<BlockTextIndex> {
        self.writer.commit()?;
        self.writer.wait_merging_threads()?;

        let reader: IndexReader = self
            .index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;

        Ok(BlockTextIndex {
            index: self.index,
            reader,
            fields: self.fields,
            documents: self.documents,
        })
    }
}

/// The committed, read-only block index.
pub struct BlockTextIndex {
    index: Index,
    reader: IndexReader,
    fields: BlockFields,
    documents: usize,
}

impl BlockTextIndex {
    #[inline]
    pub fn fields(&self) -> &BlockFields {
        &self.fields
    }

    /// Number of block documents indexed.
    #[inline]
    pub fn num_documents(&self) -> usize {
        self.documents
    }

    /// Run `text` through the content field's analyzer and return its terms.
    ///
    /// Queries must be tokenized exactly like the indexed text or phrase matching
    /// silently fails on case and punctuation.
    pub fn content_terms(&self, text: &str) -> Result<Vec<Term>> {
        let mut analyzer = self.index.tokenizer_for_field(self.fields.content)?;
        let mut stream = analyzer.token_stream(text);
        let mut terms = Vec::new();
        while stream.advance() {
            terms.push(Term::from_field_text(self.fields.content, &stream.token().text));
        }
        Ok(terms)
    }

    /// Parse a query in tantivy's query language, with `content` as default field.
    pub fn parse_query(&self, raw_query: &str) -> Result<Box<dyn Query>> {
        let parser = QueryParser::for_index(&self.index, vec![self.fields.content]);
        Ok(parser.parse_query(raw_query)?)
    }

    /// Top `limit` hits for `query`, highest score first.
    pub fn search(&self, query: &dyn Query, limit: usize) -> Result<Vec<BlockHit>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let searcher = self.reader.searcher();
        let top_docs = searcher.search(query, &TopDocs::with_limit(limit))?;

        let mut hits = Vec::with_capacity(top_docs.len());
        for (score, address) in top_docs {
            let doc: TantivyDocument = searcher.doc(address)?;
            let page_number = doc
                .get_first(self.fields.page_number)
                .and_then(|v| v.as_u64());
            let block_page_idx = doc
                .get_first(self.fields.block_page_idx)
                .and_then(|v| v.as_u64());

            if let (Some(page_number), Some(block_page_idx)) = (page_number, block_page_idx) {
                hits.push(BlockHit {
                    score,
                    page_number: page_number as u32,
                    block_page_idx: block_page_idx as usize,
                });
            }
        }

        Ok(hits)
    }
}

impl std::fmt::Debug for BlockTextIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockTextIndex")
            .field("documents", &self.documents)
            .finish_non_exhaustive()
    }
}
